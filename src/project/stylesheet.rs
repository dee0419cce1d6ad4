//! The project stylesheet file and its lock.
//!
//! Saves from the editor and the compile protocol both write this file. The
//! compile holds the lock for its whole strip/run/restore cycle; editor saves
//! use [`StylesheetFile::try_write`] and are deferred while it is held.

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// Handle to a project's stylesheet path. Clones share one lock.
#[derive(Debug, Clone)]
pub struct StylesheetFile {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl StylesheetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the file lock is free.
    ///
    /// A lock poisoned by a panicking holder is still handed out; the file
    /// itself is rewritten in full on every write.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take the lock if nobody holds it.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, ()>> {
        match self.lock.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Whether a compile (or another writer) currently holds the lock.
    pub fn is_busy(&self) -> bool {
        self.try_lock().is_none()
    }

    /// Write `text`, waiting for the lock.
    pub fn write(&self, text: &str) -> Result<()> {
        let guard = self.lock();
        self.write_locked(&guard, text)
    }

    /// Write `text` unless the lock is held, in which case
    /// [`Error::StylesheetBusy`] is returned and nothing is written.
    pub fn try_write(&self, text: &str) -> Result<()> {
        let guard = self.try_lock().ok_or(Error::StylesheetBusy)?;
        self.write_locked(&guard, text)
    }

    /// Write `text` while the caller already holds the lock.
    ///
    /// Writes a sibling temp file and renames it over the target, creating the
    /// `styles/` folder if needed.
    pub fn write_locked(&self, _guard: &MutexGuard<'_, ()>, text: &str) -> Result<()> {
        let write_err = |source| Error::FileWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp_path = self.path.with_extension("css.tmp");
        fs::write(&temp_path, text).map_err(write_err)?;
        fs::rename(&temp_path, &self.path).map_err(write_err)?;

        debug!("Wrote stylesheet {} ({} bytes)", self.path.display(), text.len());
        Ok(())
    }

    /// Current file contents.
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| Error::FileRead {
            path: self.path.clone(),
            source,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
