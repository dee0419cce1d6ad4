//! EPUB compilation
//!
//! A compile is one protocol run on a worker thread:
//!
//! 1. lock the stylesheet and write the namespace-stripped text
//! 2. run Pandoc over the chapters
//! 3. write the canonical text back, on every exit path
//!
//! The UI polls a [`CompileHandle`] each frame for the outcome, the same way
//! the chapter watcher is polled.

pub mod guard;
pub mod pandoc;

pub use guard::NamespaceGuard;
pub use pandoc::{probe_compiler, resolve_compiler, CompileRequest};

use crate::error::{Error, Result};
use crate::project::StylesheetFile;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Everything a compile needs, captured at the moment it starts.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub file: StylesheetFile,
    /// Canonical stylesheet text to restore afterwards
    pub canonical: String,
    pub root_class: String,
    pub request: CompileRequest,
    pub timeout: Option<Duration>,
}

impl CompileJob {
    /// Run the whole protocol on the current thread.
    ///
    /// A compiler error takes precedence over a failed restore; the restore
    /// failure is still logged.
    pub fn run(&self, cancel: &AtomicBool) -> Result<PathBuf> {
        let guard = NamespaceGuard::acquire(&self.file, &self.canonical, &self.root_class)?;
        let outcome = pandoc::run(&self.request, self.timeout, cancel);
        let restored = guard.release();

        match (outcome, restored) {
            (Ok(path), Ok(())) => Ok(path),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore_err)) => {
                warn!("Failed to restore stylesheet after compile: {}", restore_err);
                Err(e)
            }
        }
    }
}

/// A compile running on a worker thread.
pub struct CompileHandle {
    receiver: Receiver<Result<PathBuf>>,
    cancel: Arc<AtomicBool>,
}

impl CompileHandle {
    /// Start `job` on a new thread.
    pub fn spawn(job: CompileJob) -> Self {
        let (tx, rx) = channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        thread::spawn(move || {
            let outcome = job.run(&worker_cancel);
            if let Err(e) = &outcome {
                info!("Compile did not complete: {}", e);
            }
            let _ = tx.send(outcome);
        });

        Self {
            receiver: rx,
            cancel,
        }
    }

    /// The outcome once the worker is done, `None` while it is still running.
    pub fn poll(&self) -> Option<Result<PathBuf>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::Application(
                "Compile worker stopped unexpectedly".to_string(),
            ))),
        }
    }

    /// Ask the worker to kill the compiler. The outcome still arrives through
    /// [`poll`](Self::poll).
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelling(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
