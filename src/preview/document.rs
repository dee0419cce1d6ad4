//! The standalone preview page
//!
//! Every chapter is rendered into its own `<section>` carrying both the root
//! class and its `chapter-N` class, so global rules (`.root p`) and chapter
//! rules (`.root.chapter-N p`) apply exactly as written. The composed
//! stylesheet goes into a single `<style>` element.

use super::markdown::{render_chapter, AssetLinker};
use crate::css::scope::chapter_class;
use crate::error::{Error, Result};
use crate::project::Chapter;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs for one preview page.
pub struct PreviewPage<'a> {
    pub title: &'a str,
    pub root_class: &'a str,
    /// Stylesheet text with any preview-only overlay already appended
    pub stylesheet: &'a str,
    /// `(chapter index, chapter)` pairs to include, in order
    pub chapters: Vec<(usize, &'a Chapter)>,
    /// Browser reload interval; `None` disables auto refresh
    pub refresh_secs: Option<u32>,
}

impl PreviewPage<'_> {
    /// Render the full HTML document.
    pub fn render(&self, linker: &dyn AssetLinker) -> String {
        let mut sections = String::new();
        for (index, chapter) in &self.chapters {
            sections.push_str(&format!(
                "<section class=\"{} {}\" data-chapter=\"{}\">\n{}</section>\n",
                html_escape(self.root_class),
                chapter_class(*index),
                html_escape(&chapter.name),
                render_chapter(&chapter.content, linker)
            ));
        }

        let refresh = self
            .refresh_secs
            .filter(|secs| *secs > 0)
            .map(|secs| format!("    <meta http-equiv=\"refresh\" content=\"{}\">\n", secs))
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Quire">
{refresh}    <title>{title}</title>
    <style>
{base_css}
    </style>
    <style id="live-css">
{css}
    </style>
</head>
<body>
{sections}</body>
</html>"#,
            refresh = refresh,
            title = html_escape(self.title),
            base_css = BASE_CSS,
            css = escape_style_text(self.stylesheet),
            sections = sections,
        )
    }
}

/// Layout for the preview page itself; the book's own stylesheet follows it.
const BASE_CSS: &str = r#"body {
    margin: 0 auto;
    max-width: 42em;
    padding: 2em 1.5em;
}
section + section {
    border-top: 1px dashed #bbbbbb;
    margin-top: 3em;
    padding-top: 2em;
}
img {
    max-width: 100%;
}"#;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Keep user CSS from closing the `<style>` element early.
fn escape_style_text(css: &str) -> String {
    css.replace("</", "<\\/")
}

/// Path of the preview file for a project in the system temp folder.
pub fn preview_path(project_name: &str) -> PathBuf {
    let safe: String = project_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    std::env::temp_dir().join(format!("quire-preview-{}.html", safe))
}

/// Write the preview HTML to `path`.
pub fn write_preview(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote preview {} ({} bytes)", path.display(), html.len());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::markdown::RouteLinker;

    fn chapter(name: &str, content: &str) -> Chapter {
        Chapter {
            name: name.to_string(),
            path: PathBuf::from(name),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_sections_carry_root_and_chapter_classes() {
        let one = chapter("01.md", "# One");
        let three = chapter("03.md", "# Three");
        let page = PreviewPage {
            title: "Novel",
            root_class: "book-content",
            stylesheet: ".book-content p { color: red; }",
            chapters: vec![(0, &one), (2, &three)],
            refresh_secs: None,
        };
        let html = page.render(&RouteLinker::default());

        assert!(html.contains("<section class=\"book-content chapter-1\""));
        assert!(html.contains("<section class=\"book-content chapter-3\""));
        assert!(html.contains("<h1>Three</h1>"));
        assert!(html.contains(".book-content p { color: red; }"));
        assert!(!html.contains("http-equiv"));
    }

    #[test]
    fn test_refresh_meta() {
        let page = PreviewPage {
            title: "Novel",
            root_class: "book-content",
            stylesheet: "",
            chapters: Vec::new(),
            refresh_secs: Some(3),
        };
        let html = page.render(&RouteLinker::default());
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"3\">"));
    }

    #[test]
    fn test_style_cannot_close_early() {
        let page = PreviewPage {
            title: "<Novel>",
            root_class: "book-content",
            stylesheet: "p::after { content: \"</style><script>\"; }",
            chapters: Vec::new(),
            refresh_secs: None,
        };
        let html = page.render(&RouteLinker::default());
        assert!(!html.contains("</style><script>"));
        assert!(html.contains("<title>&lt;Novel&gt;</title>"));
    }

    #[test]
    fn test_preview_path_is_sanitized() {
        let path = preview_path("My Book: Part 1");
        assert!(path.ends_with("quire-preview-My_Book__Part_1.html"));
    }

    #[test]
    fn test_write_preview() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preview.html");
        write_preview(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
