//! Temporary namespace stripping around a compile.
//!
//! Pandoc reads `styles/epub-styles.css` straight from disk, and the EPUB has
//! no element carrying the book's root class. While a compile runs the file
//! holds the stripped variant; the canonical text is written back when the
//! guard is released or dropped, whatever the compile's outcome.

use crate::css::strip_namespace;
use crate::error::Result;
use crate::project::StylesheetFile;
use log::{debug, warn};
use std::sync::MutexGuard;

/// Holds the stylesheet lock and the canonical text to restore.
pub struct NamespaceGuard<'a> {
    file: &'a StylesheetFile,
    lock: MutexGuard<'a, ()>,
    canonical: String,
    restored: bool,
}

impl<'a> NamespaceGuard<'a> {
    /// Lock the stylesheet and write the stripped variant of `canonical`.
    ///
    /// Blocks while another writer holds the lock. If writing the stripped
    /// text fails the canonical text is written back before returning.
    pub fn acquire(file: &'a StylesheetFile, canonical: &str, root_class: &str) -> Result<Self> {
        let lock = file.lock();
        let guard = Self {
            file,
            lock,
            canonical: canonical.to_string(),
            restored: false,
        };

        let stripped = strip_namespace(canonical, root_class);
        guard.file.write_locked(&guard.lock, &stripped)?;
        debug!("Stylesheet stripped of '.{}' for compile", root_class);
        Ok(guard)
    }

    /// Write the canonical text back and release the lock.
    pub fn release(mut self) -> Result<()> {
        self.restored = true;
        self.file.write_locked(&self.lock, &self.canonical)
    }
}

impl Drop for NamespaceGuard<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.file.write_locked(&self.lock, &self.canonical) {
            warn!("Failed to restore stylesheet after compile: {}", e);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
