//! File system watcher for the Chapters folder.
//!
//! Chapter files are edited in other programs. The watcher reports changes to
//! Markdown files so the session can reload the chapter list and refresh the
//! preview.

use crate::error::Result;
use log::debug;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

/// Changes the session cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterEvent {
    /// A chapter file was created, modified or removed
    Changed(PathBuf),
    /// The watcher encountered an error
    Error(String),
}

/// Watches one project's `Chapters/` folder.
pub struct ChapterWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<ChapterEvent>,
}

impl ChapterWatcher {
    /// Start watching `chapters_dir` (not recursive).
    pub fn new(chapters_dir: &Path) -> Result<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                Self::handle_event(result, &tx);
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )?;
        watcher.watch(chapters_dir, RecursiveMode::NonRecursive)?;

        debug!("Watching {}", chapters_dir.display());
        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    fn handle_event(result: std::result::Result<Event, notify::Error>, tx: &Sender<ChapterEvent>) {
        match result {
            Ok(event) => {
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                for path in event.paths.into_iter().filter(|p| is_chapter_file(p)) {
                    let _ = tx.send(ChapterEvent::Changed(path));
                }
            }
            Err(e) => {
                let _ = tx.send(ChapterEvent::Error(e.to_string()));
            }
        }
    }

    /// All events since the last poll. Non-blocking.
    pub fn poll_events(&self) -> Vec<ChapterEvent> {
        self.receiver.try_iter().collect()
    }
}

/// Whether a path names a visible Markdown file.
pub fn is_chapter_file(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    !name.starts_with('.') && name.ends_with(".md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_chapter_file() {
        assert!(is_chapter_file(Path::new("/book/Chapters/01.md")));
        assert!(!is_chapter_file(Path::new("/book/Chapters/.01.md.swp")));
        assert!(!is_chapter_file(Path::new("/book/Chapters/.draft.md")));
        assert!(!is_chapter_file(Path::new("/book/Chapters/notes.txt")));
    }

    #[test]
    fn test_watcher_starts_on_existing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let watcher = ChapterWatcher::new(dir.path()).unwrap();
        assert!(watcher.poll_events().is_empty());
    }

    #[test]
    fn test_watcher_fails_on_missing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(ChapterWatcher::new(&dir.path().join("missing")).is_err());
    }
}
