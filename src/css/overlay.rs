//! Centering overlays
//!
//! Four independent flags produce a fixed set of centering rules. The same
//! fragment is used two ways:
//!
//! - chapter scope: appended to a throwaway copy of the stylesheet for the
//!   preview and discarded afterwards
//! - global scope ("quick center"): appended to the canonical stylesheet by
//!   the session and committed like any other edit

use super::scope::{self, qualify_each, Scope};
use std::collections::BTreeMap;

/// Which element groups to center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CenteringFlags {
    pub headings: bool,
    pub paragraphs: bool,
    pub images: bool,
    pub blockquotes: bool,
}

impl CenteringFlags {
    /// Whether any flag is set.
    pub fn any(&self) -> bool {
        self.headings || self.paragraphs || self.images || self.blockquotes
    }
}

/// `(elements, declarations)` for each flag, in output order.
const HEADINGS_RULE: (&str, &str) = ("h1, h2, h3", "text-align: center;");
const PARAGRAPHS_RULE: (&str, &str) = ("p", "text-align: center;");
const IMAGES_RULE: (&str, &str) = ("img", "display: block; margin: 0 auto;");
const BLOCKQUOTES_RULE: (&str, &str) = ("blockquote", "text-align: center;");

/// Generate the centering rules for `flags` below `root_selector`.
///
/// Returns an empty string when no flag is set; callers must not append an
/// empty block in that case.
pub fn generate(flags: &CenteringFlags, root_selector: &str) -> String {
    let enabled = [
        (flags.headings, HEADINGS_RULE),
        (flags.paragraphs, PARAGRAPHS_RULE),
        (flags.images, IMAGES_RULE),
        (flags.blockquotes, BLOCKQUOTES_RULE),
    ];

    enabled
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, (elements, declarations))| {
            format!("{} {{ {} }}", qualify_each(root_selector, elements), declarations)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append an overlay fragment to a copy of the stylesheet.
///
/// The input is never modified; an empty overlay returns the stylesheet as is.
pub fn compose(stylesheet: &str, overlay: &str) -> String {
    if overlay.trim().is_empty() {
        return stylesheet.to_string();
    }
    format!("{}\n\n{}\n", stylesheet.trim_end(), overlay)
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-chapter settings
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory centering flags keyed by chapter index.
///
/// Not persisted: a project reload starts with every chapter uncentered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterCentering {
    flags: BTreeMap<usize, CenteringFlags>,
}

impl ChapterCentering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags for a chapter (all off when never set).
    pub fn get(&self, chapter: usize) -> CenteringFlags {
        self.flags.get(&chapter).copied().unwrap_or_default()
    }

    /// Replace the flags for a chapter.
    pub fn set(&mut self, chapter: usize, flags: CenteringFlags) {
        if flags.any() {
            self.flags.insert(chapter, flags);
        } else {
            self.flags.remove(&chapter);
        }
    }

    /// Forget settings for chapters that no longer exist.
    pub fn retain_chapters(&mut self, chapter_count: usize) {
        self.flags.retain(|index, _| *index < chapter_count);
    }

    /// Overlay CSS for every chapter with at least one flag set.
    pub fn overlay(&self, root_class: &str) -> String {
        self.flags
            .iter()
            .map(|(index, flags)| {
                generate(flags, &scope::root_selector(root_class, Scope::Chapter(*index)))
            })
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
