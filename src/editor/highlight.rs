//! CSS syntax highlighting for the raw stylesheet editor
//!
//! Uses syntect's bundled CSS grammar and themes and turns the result into an
//! egui [`LayoutJob`] that a `TextEdit` layouter can hand to the font system.
//! The last job is cached so an unchanged frame does not re-highlight.

use eframe::egui::text::{LayoutJob, TextFormat};
use eframe::egui::{Color32, FontId, Stroke};
use log::{debug, warn};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// syntect theme used in dark mode
pub const DARK_THEME: &str = "base16-ocean.dark";
/// syntect theme used in light mode
pub const LIGHT_THEME: &str = "InspiredGitHub";

/// Highlighter with loaded syntect sets and a one-entry result cache.
pub struct CssHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    cache: Option<CachedJob>,
}

struct CachedJob {
    text: String,
    dark_mode: bool,
    font_size: f32,
    job: LayoutJob,
}

impl Default for CssHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CssHighlighter {
    /// Load syntect's default syntaxes and themes. Relatively expensive; keep
    /// one instance for the lifetime of the app.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            cache: None,
        }
    }

    fn theme(&self, dark_mode: bool) -> Option<&Theme> {
        let name = if dark_mode { DARK_THEME } else { LIGHT_THEME };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Layout job for `text`, reusing the cached job when nothing changed.
    pub fn layout_job(&mut self, text: &str, dark_mode: bool, font_size: f32) -> LayoutJob {
        if let Some(cached) = &self.cache {
            if cached.text == text && cached.dark_mode == dark_mode && cached.font_size == font_size
            {
                return cached.job.clone();
            }
        }

        let job = self.highlight(text, dark_mode, font_size);
        self.cache = Some(CachedJob {
            text: text.to_string(),
            dark_mode,
            font_size,
            job: job.clone(),
        });
        job
    }

    /// Highlight without touching the cache.
    pub fn highlight(&self, text: &str, dark_mode: bool, font_size: f32) -> LayoutJob {
        let font_id = FontId::monospace(font_size);
        let fallback_color = if dark_mode {
            Color32::LIGHT_GRAY
        } else {
            Color32::DARK_GRAY
        };

        let syntax = self.syntax_set.find_syntax_by_extension("css");
        let (Some(syntax), Some(theme)) = (syntax, self.theme(dark_mode)) else {
            return plain_job(text, font_id, fallback_color);
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut job = LayoutJob::default();

        for line in LinesWithEndings::from(text) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    for (style, piece) in ranges {
                        job.append(piece, 0.0, text_format(style, font_id.clone()));
                    }
                }
                Err(e) => {
                    warn!("Failed to highlight stylesheet line: {}", e);
                    job.append(
                        line,
                        0.0,
                        TextFormat::simple(font_id.clone(), fallback_color),
                    );
                }
            }
        }

        job
    }
}

fn plain_job(text: &str, font_id: FontId, color: Color32) -> LayoutJob {
    LayoutJob::simple(text.to_string(), font_id, color, f32::INFINITY)
}

fn text_format(style: Style, font_id: FontId) -> TextFormat {
    let fg = style.foreground;
    let color = Color32::from_rgba_unmultiplied(fg.r, fg.g, fg.b, fg.a);
    let mut format = TextFormat::simple(font_id, color);
    format.italics = style.font_style.contains(FontStyle::ITALIC);
    if style.font_style.contains(FontStyle::UNDERLINE) {
        format.underline = Stroke::new(1.0, color);
    }
    format
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
