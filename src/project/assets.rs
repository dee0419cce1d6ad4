//! Resolving image and other asset paths referenced from chapters.

use super::ProjectLayout;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Find the file a chapter-relative asset path refers to.
///
/// The path is tried relative to `Chapters/` first, then relative to the
/// project root; the first existing file wins. A leading `/` or `./` is
/// ignored. Paths that would leave the project folder are rejected, as are
/// absolute paths with a drive or root prefix.
pub fn resolve_asset(layout: &ProjectLayout, requested: &str) -> Option<PathBuf> {
    let requested = requested.trim().trim_start_matches('/');
    if requested.is_empty() {
        return None;
    }

    [Path::new("Chapters"), Path::new("")]
        .iter()
        .filter_map(|base| contained_join(base, Path::new(requested)))
        .map(|relative| layout.root().join(relative))
        .find(|candidate| candidate.is_file())
}

/// Lexically join `relative` onto `base`, returning `None` if a `..` walks
/// above the project root or the path is absolute.
fn contained_join(base: &Path, relative: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&OsStr> = base
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();

    for component in relative.components() {
        match component {
            Component::Normal(name) => parts.push(name),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.iter().collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ProjectLayout) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Chapters/art")).unwrap();
        fs::create_dir_all(root.join("images")).unwrap();
        fs::write(root.join("Chapters/art/map.png"), b"png").unwrap();
        fs::write(root.join("images/COVER.png"), b"png").unwrap();
        fs::write(root.join("images/both.png"), b"root").unwrap();
        fs::create_dir_all(root.join("Chapters/images")).unwrap();
        fs::write(root.join("Chapters/images/both.png"), b"chapters").unwrap();
        let layout = ProjectLayout::new(root);
        (dir, layout)
    }

    #[test]
    fn test_resolves_under_chapters() {
        let (_dir, layout) = setup();
        let path = resolve_asset(&layout, "art/map.png").unwrap();
        assert!(path.ends_with("Chapters/art/map.png"));
    }

    #[test]
    fn test_falls_back_to_root() {
        let (_dir, layout) = setup();
        let path = resolve_asset(&layout, "images/COVER.png").unwrap();
        assert!(path.ends_with("images/COVER.png"));
        assert!(!path.to_string_lossy().contains("Chapters"));
    }

    #[test]
    fn test_chapters_wins_over_root() {
        let (_dir, layout) = setup();
        let path = resolve_asset(&layout, "/images/both.png").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"chapters");
    }

    #[test]
    fn test_parent_from_chapters_stays_inside() {
        let (_dir, layout) = setup();
        let path = resolve_asset(&layout, "../images/COVER.png").unwrap();
        assert!(path.ends_with("images/COVER.png"));
    }

    #[test]
    fn test_escaping_paths_rejected() {
        let (_dir, layout) = setup();
        assert_eq!(resolve_asset(&layout, "../../etc/passwd"), None);
        assert_eq!(resolve_asset(&layout, "../.."), None);
    }

    #[test]
    fn test_missing_and_empty() {
        let (_dir, layout) = setup();
        assert_eq!(resolve_asset(&layout, "nope.png"), None);
        assert_eq!(resolve_asset(&layout, ""), None);
        assert_eq!(resolve_asset(&layout, "/"), None);
    }
}
