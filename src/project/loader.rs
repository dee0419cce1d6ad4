//! Reading a project folder into memory.

use super::{ProjectLayout, DEFAULT_STYLESHEET};
use crate::error::{Error, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One Markdown chapter, identified by its position in [`Project::chapters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// File name, shown in the chapter list
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Everything read from disk when a project is opened.
#[derive(Debug, Clone)]
pub struct Project {
    pub layout: ProjectLayout,
    pub stylesheet: String,
    pub chapters: Vec<Chapter>,
    /// Whether the stylesheet file existed or the default text was used
    pub stylesheet_existed: bool,
}

/// Chapter files in `dir`: `.md` only, hidden files skipped, sorted by name.
///
/// Does not descend into subfolders.
pub fn list_chapters(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::ProjectInvalid {
            path: dir.to_path_buf(),
            reason: "Chapters folder not found".to_string(),
        });
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::FileRead {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || !name.ends_with(".md") {
            continue;
        }
        paths.push(entry.into_path());
    }

    Ok(paths)
}

fn read_chapter(path: PathBuf) -> Result<Chapter> {
    let content = fs::read_to_string(&path).map_err(|source| Error::FileRead {
        path: path.clone(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Chapter {
        name,
        path,
        content,
    })
}

/// Read every chapter of a project.
///
/// Fails with [`Error::ProjectInvalid`] when there are no chapters.
pub fn load_chapters(layout: &ProjectLayout) -> Result<Vec<Chapter>> {
    let paths = list_chapters(&layout.chapters_dir())?;
    if paths.is_empty() {
        return Err(Error::ProjectInvalid {
            path: layout.root().to_path_buf(),
            reason: "no .md files found in the Chapters folder".to_string(),
        });
    }
    paths.into_iter().map(read_chapter).collect()
}

/// Open the project at `root`.
pub fn load_project(root: &Path) -> Result<Project> {
    let layout = ProjectLayout::new(root);
    let chapters = load_chapters(&layout)?;

    let stylesheet_path = layout.stylesheet_path();
    let (stylesheet, stylesheet_existed) = if stylesheet_path.is_file() {
        let text = fs::read_to_string(&stylesheet_path).map_err(|source| Error::FileRead {
            path: stylesheet_path.clone(),
            source,
        })?;
        (text, true)
    } else {
        debug!(
            "No stylesheet at {}, starting from the default",
            stylesheet_path.display()
        );
        (DEFAULT_STYLESHEET.to_string(), false)
    };

    info!(
        "Loaded project '{}' with {} chapter(s)",
        layout.name(),
        chapters.len()
    );

    Ok(Project {
        layout,
        stylesheet,
        chapters,
        stylesheet_existed,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
