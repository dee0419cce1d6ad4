//! Chapter Markdown to HTML
//!
//! Chapters reference images two ways: Obsidian-style embeds (`![[name]]`,
//! always looked up under `images/`) and ordinary Markdown images with a
//! relative target. Both are rewritten through an [`AssetLinker`] before
//! comrak renders the text, so the preview can load them from the project.

use crate::project::{resolve_asset, ProjectLayout};
use comrak::{markdown_to_html, Options};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use url::Url;

/// Route prefix used when assets are served rather than linked as files.
pub const ASSET_ROUTE: &str = "/project-assets";

/// Turns a project-relative asset path into a URL the preview can load.
pub trait AssetLinker {
    fn link(&self, relative: &str) -> String;
}

/// Links under a URL route, e.g. `/project-assets/images/map.png`.
#[derive(Debug, Clone)]
pub struct RouteLinker {
    prefix: String,
}

impl Default for RouteLinker {
    fn default() -> Self {
        Self::new(ASSET_ROUTE)
    }
}

impl RouteLinker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }
}

impl AssetLinker for RouteLinker {
    fn link(&self, relative: &str) -> String {
        format!("{}/{}", self.prefix, relative)
    }
}

/// Links straight to files on disk with `file://` URLs.
///
/// Paths that do not resolve to a file inside the project fall back to the
/// asset route, which shows as a broken image instead of a wrong one.
#[derive(Debug, Clone)]
pub struct FileLinker {
    layout: ProjectLayout,
    fallback: RouteLinker,
}

impl FileLinker {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            fallback: RouteLinker::default(),
        }
    }
}

impl AssetLinker for FileLinker {
    fn link(&self, relative: &str) -> String {
        resolve_asset(&self.layout, relative)
            .and_then(|path| Url::from_file_path(path).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| self.fallback.link(relative))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rewriting
// ─────────────────────────────────────────────────────────────────────────────

fn embed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"!\[\[([^\]|]+)(?:\|[^\]]*)?\]\]").expect("valid embed pattern")
    })
}

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"!\[([^\]]*)\]\(\s*(<[^>]*>|[^)\s]+)(\s+"[^"]*")?\s*\)"#)
            .expect("valid image pattern")
    })
}

/// Whether an image target points outside the project.
fn is_external(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    ["http://", "https://", "//", "data:"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Markdown link destination, bracketed when it contains whitespace.
fn destination(url: &str) -> String {
    if url.chars().any(char::is_whitespace) {
        format!("<{}>", url)
    } else {
        url.to_string()
    }
}

/// Rewrite embeds and relative image targets through `linker`.
pub fn rewrite_assets(markdown: &str, linker: &dyn AssetLinker) -> String {
    // Plain images first so the embeds' generated targets are not rewritten twice.
    let images = image_pattern().replace_all(markdown, |caps: &Captures| {
        let alt = &caps[1];
        let raw = &caps[2];
        let title = caps.get(3).map_or("", |m| m.as_str());
        let target = raw.trim_start_matches('<').trim_end_matches('>').trim();

        if target.is_empty() || is_external(target) {
            return caps[0].to_string();
        }

        let relative = target.trim_start_matches("./").trim_start_matches('/');
        let url = linker.link(relative);
        format!("![{}]({}{})", alt, destination(&url), title)
    });

    embed_pattern()
        .replace_all(&images, |caps: &Captures| {
            let name = caps[1].trim();
            let url = linker.link(&format!("images/{}", name));
            format!("![{}]({})", name, destination(&url))
        })
        .into_owned()
}

/// Render one chapter to an HTML fragment.
pub fn render_chapter(markdown: &str, linker: &dyn AssetLinker) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.extension.superscript = true;

    // Chapters may carry raw HTML (e.g. <div class="scene-break">).
    options.render.unsafe_ = true;

    markdown_to_html(&rewrite_assets(markdown, linker), &options)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_becomes_image() {
        let out = rewrite_assets("Before ![[map.png]] after", &RouteLinker::default());
        assert_eq!(out, "Before ![map.png](/project-assets/images/map.png) after");
    }

    #[test]
    fn test_embed_size_suffix_dropped() {
        let out = rewrite_assets("![[map.png|300]]", &RouteLinker::default());
        assert_eq!(out, "![map.png](/project-assets/images/map.png)");
    }

    #[test]
    fn test_embed_with_space_is_bracketed() {
        let out = rewrite_assets("![[old map.png]]", &RouteLinker::default());
        assert_eq!(out, "![old map.png](</project-assets/images/old map.png>)");
    }

    #[test]
    fn test_relative_image_rewritten() {
        let linker = RouteLinker::default();
        assert_eq!(
            rewrite_assets("![Map](./art/map.png)", &linker),
            "![Map](/project-assets/art/map.png)"
        );
        assert_eq!(
            rewrite_assets("![Map](/images/map.png \"The map\")", &linker),
            "![Map](/project-assets/images/map.png \"The map\")"
        );
        assert_eq!(
            rewrite_assets("![Map](<images/big map.png>)", &linker),
            "![Map](</project-assets/images/big map.png>)"
        );
    }

    #[test]
    fn test_external_images_untouched() {
        let linker = RouteLinker::default();
        for md in [
            "![a](http://example.com/a.png)",
            "![a](https://example.com/a.png)",
            "![a](//cdn.example.com/a.png)",
            "![a](data:image/png;base64,AAAA)",
        ] {
            assert_eq!(rewrite_assets(md, &linker), md);
        }
    }

    #[test]
    fn test_links_are_not_images() {
        let md = "[chapter two](02.md)";
        assert_eq!(rewrite_assets(md, &RouteLinker::default()), md);
    }

    #[test]
    fn test_render_chapter_html() {
        let html = render_chapter("# Title\n\n![[cover.png]]\n", &RouteLinker::default());
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("src=\"/project-assets/images/cover.png\""));
    }

    #[test]
    fn test_file_linker_uses_file_urls() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/map.png"), b"png").unwrap();
        let linker = FileLinker::new(ProjectLayout::new(dir.path()));

        let link = linker.link("images/map.png");
        assert!(link.starts_with("file://"));
        assert!(link.ends_with("images/map.png"));

        assert_eq!(linker.link("missing.png"), "/project-assets/missing.png");
    }
}
