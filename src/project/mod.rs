//! Book project on disk
//!
//! A project is a folder with a fixed layout:
//!
//! ```text
//! <project>/
//!   Chapters/*.md              manuscript, one file per chapter
//!   styles/epub-styles.css     the stylesheet being edited
//!   metadata/book-info.json    title/author metadata for Pandoc
//!   images/COVER.png           cover image for Pandoc
//! ```
//!
//! Only `Chapters/` with at least one Markdown file is required. A missing
//! stylesheet is created from [`DEFAULT_STYLESHEET`] on the first save.

mod assets;
mod loader;
mod stylesheet;
mod watcher;

pub use assets::resolve_asset;
pub use loader::{list_chapters, load_chapters, load_project, Chapter, Project};
pub use stylesheet::StylesheetFile;
pub use watcher::{ChapterEvent, ChapterWatcher};

use std::path::{Path, PathBuf};

/// Stylesheet text used when the project has none yet.
pub const DEFAULT_STYLESHEET: &str = "/* New Stylesheet */";

/// Fixed paths inside a project folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder name, used for the window title and the EPUB file name.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn chapters_dir(&self) -> PathBuf {
        self.root.join("Chapters")
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.root.join("styles").join("epub-styles.css")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join("metadata").join("book-info.json")
    }

    pub fn cover_path(&self) -> PathBuf {
        self.root.join("images").join("COVER.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = ProjectLayout::new("/books/My Novel");
        assert_eq!(layout.name(), "My Novel");
        assert_eq!(layout.chapters_dir(), PathBuf::from("/books/My Novel/Chapters"));
        assert_eq!(
            layout.stylesheet_path(),
            PathBuf::from("/books/My Novel/styles/epub-styles.css")
        );
        assert_eq!(
            layout.metadata_path(),
            PathBuf::from("/books/My Novel/metadata/book-info.json")
        );
        assert_eq!(
            layout.cover_path(),
            PathBuf::from("/books/My Novel/images/COVER.png")
        );
    }
}
