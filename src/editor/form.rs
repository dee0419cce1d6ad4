//! Visual style form <-> stylesheet bridge
//!
//! The form edits a fixed set of five properties on one selector at a time.
//! Loading re-parses the current text and reads the properties back; applying
//! re-parses, changes only the tracked properties and serializes again. The
//! text stays the source of truth in both directions.

use crate::css::scope::{self, Scope};
use crate::css::{parse, serialize};
use log::warn;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Colour shown in the picker when the text colour is not a plain hex value.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
/// Colour shown in the picker when the background is not a plain hex value.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

// ─────────────────────────────────────────────────────────────────────────────
// Selector keys
// ─────────────────────────────────────────────────────────────────────────────

/// What the form is editing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StyleTarget {
    /// The book root element itself
    #[default]
    BookRoot,
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Blockquote,
    Image,
    Bold,
    Italic,
    InlineCode,
    Link,
    /// Any selector typed by the user, written for global scope
    Custom(String),
}

impl StyleTarget {
    /// The fixed targets offered in the selector list.
    pub const FIXED: [StyleTarget; 11] = [
        StyleTarget::BookRoot,
        StyleTarget::Heading1,
        StyleTarget::Heading2,
        StyleTarget::Heading3,
        StyleTarget::Paragraph,
        StyleTarget::Blockquote,
        StyleTarget::Image,
        StyleTarget::Bold,
        StyleTarget::Italic,
        StyleTarget::InlineCode,
        StyleTarget::Link,
    ];

    /// Element selector below the root. `None` for the root itself.
    fn element(&self) -> Option<&str> {
        match self {
            StyleTarget::BookRoot | StyleTarget::Custom(_) => None,
            StyleTarget::Heading1 => Some("h1"),
            StyleTarget::Heading2 => Some("h2"),
            StyleTarget::Heading3 => Some("h3"),
            StyleTarget::Paragraph => Some("p"),
            StyleTarget::Blockquote => Some("blockquote"),
            StyleTarget::Image => Some("img"),
            StyleTarget::Bold => Some("strong"),
            StyleTarget::Italic => Some("em"),
            StyleTarget::InlineCode => Some("code"),
            StyleTarget::Link => Some("a"),
        }
    }

    /// Whether text alignment can be edited for this target.
    ///
    /// Inline elements ignore `text-align`, so the field is disabled for them.
    pub fn supports_text_align(&self) -> bool {
        !matches!(
            self,
            StyleTarget::Bold | StyleTarget::Italic | StyleTarget::InlineCode
        )
    }

    /// Whether rules can be written for this target.
    ///
    /// Fixed targets always can; a custom selector must pass
    /// [`is_valid_selector`].
    pub fn is_writable(&self) -> bool {
        match self {
            StyleTarget::Custom(selector) => is_valid_selector(selector),
            _ => true,
        }
    }

    /// Full selector text for this target in `scope`.
    pub fn selector(&self, root_class: &str, scope: Scope) -> String {
        match self {
            StyleTarget::Custom(selector) => scope::scope_selector(selector, root_class, scope),
            fixed => scope::resolve_selector(root_class, fixed.element(), scope),
        }
    }

    /// Label for the selector list.
    pub fn label(&self) -> &str {
        match self {
            StyleTarget::BookRoot => "Book (root)",
            StyleTarget::Heading1 => "Heading 1",
            StyleTarget::Heading2 => "Heading 2",
            StyleTarget::Heading3 => "Heading 3",
            StyleTarget::Paragraph => "Paragraph",
            StyleTarget::Blockquote => "Blockquote",
            StyleTarget::Image => "Image",
            StyleTarget::Bold => "Bold",
            StyleTarget::Italic => "Italic",
            StyleTarget::InlineCode => "Inline code",
            StyleTarget::Link => "Link",
            StyleTarget::Custom(selector) => selector.as_str(),
        }
    }
}

impl fmt::Display for StyleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fields
// ─────────────────────────────────────────────────────────────────────────────

/// The five properties the form tracks, as raw text.
///
/// An empty field means "property absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub font_family: String,
    pub font_size: String,
    pub color: String,
    pub background_color: String,
    pub text_align: String,
}

impl FormFields {
    /// Colour for the picker widget: the raw value when it is `#rrggbb`,
    /// otherwise [`DEFAULT_TEXT_COLOR`].
    pub fn color_picker_value(&self) -> &str {
        picker_safe(&self.color, DEFAULT_TEXT_COLOR)
    }

    /// Background for the picker widget, see [`color_picker_value`](Self::color_picker_value).
    pub fn background_picker_value(&self) -> &str {
        picker_safe(&self.background_color, DEFAULT_BACKGROUND_COLOR)
    }

    /// `(property, field)` pairs in form order.
    fn tracked(&self) -> [(&'static str, &str); 5] {
        [
            ("font-family", self.font_family.as_str()),
            ("font-size", self.font_size.as_str()),
            ("color", self.color.as_str()),
            ("background-color", self.background_color.as_str()),
            ("text-align", self.text_align.as_str()),
        ]
    }
}

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex pattern"))
}

/// Whether `selector` survives a write and re-parse unchanged: not blank, and
/// free of block delimiters, declaration separators and comment markers.
pub fn is_valid_selector(selector: &str) -> bool {
    let selector = selector.trim();
    !selector.is_empty()
        && !selector.contains(|c| matches!(c, '{' | '}' | ';'))
        && !selector.contains("/*")
        && !selector.contains("*/")
}

/// Whether `value` is a strict six-digit hex colour.
pub fn is_hex_color(value: &str) -> bool {
    hex_pattern().is_match(value)
}

fn picker_safe<'a>(value: &'a str, fallback: &'static str) -> &'a str {
    let value = value.trim();
    if is_hex_color(value) {
        value
    } else {
        fallback
    }
}

/// Parse a `#rrggbb` value into RGB bytes.
pub fn hex_to_rgb(value: &str) -> Option<[u8; 3]> {
    if !is_hex_color(value) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&value[range], 16).ok();
    Some([channel(1..3)?, channel(3..5)?, channel(5..7)?])
}

/// Format RGB bytes as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

// ─────────────────────────────────────────────────────────────────────────────
// Load / apply
// ─────────────────────────────────────────────────────────────────────────────

/// Read the tracked properties of `target` in `scope` from the stylesheet.
///
/// A selector that does not exist, or cannot exist, yields all-empty fields.
pub fn load_fields(
    stylesheet: &str,
    root_class: &str,
    target: &StyleTarget,
    scope: Scope,
) -> FormFields {
    if !target.is_writable() {
        return FormFields::default();
    }
    let rules = parse(stylesheet);
    let selector = target.selector(root_class, scope);
    let Some(declarations) = rules.get(&selector) else {
        return FormFields::default();
    };

    let read = |property: &str| declarations.get(property).unwrap_or_default().to_string();
    FormFields {
        font_family: read("font-family"),
        font_size: read("font-size"),
        color: read("color"),
        background_color: read("background-color"),
        text_align: read("text-align"),
    }
}

/// Write the form's fields into the stylesheet and return the new text.
///
/// Non-empty fields are set (trimmed), empty fields remove their property and
/// every untracked property is left as it was. For targets without text
/// alignment the `text-align` property is not touched at all. A target that
/// is not [writable](StyleTarget::is_writable) returns the text unchanged.
pub fn apply_fields(
    stylesheet: &str,
    root_class: &str,
    target: &StyleTarget,
    scope: Scope,
    fields: &FormFields,
) -> String {
    if !target.is_writable() {
        warn!("Not applying style to invalid selector '{}'", target.label());
        return stylesheet.to_string();
    }
    let mut rules = parse(stylesheet);
    let selector = target.selector(root_class, scope);
    let declarations = rules.entry(&selector);

    for (property, value) in fields.tracked() {
        if property == "text-align" && !target.supports_text_align() {
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            declarations.remove(property);
        } else {
            declarations.set(property, value);
        }
    }

    serialize(&rules)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "book-content";

    #[test]
    fn test_load_fields_absent_selector_is_empty() {
        let fields = load_fields("", ROOT, &StyleTarget::Paragraph, Scope::Global);
        assert_eq!(fields, FormFields::default());
    }

    #[test]
    fn test_load_fields_reads_tracked_properties() {
        let css = ".book-content h1 { font-family: Georgia, serif; color: #112233; text-align: center; margin: 0; }";
        let fields = load_fields(css, ROOT, &StyleTarget::Heading1, Scope::Global);
        assert_eq!(fields.font_family, "Georgia, serif");
        assert_eq!(fields.color, "#112233");
        assert_eq!(fields.text_align, "center");
        assert_eq!(fields.font_size, "");
    }

    #[test]
    fn test_load_fields_chapter_scope() {
        let css = ".book-content p { color: red; }\n.book-content.chapter-3 p { color: blue; }";
        let global = load_fields(css, ROOT, &StyleTarget::Paragraph, Scope::Global);
        let chapter = load_fields(css, ROOT, &StyleTarget::Paragraph, Scope::Chapter(2));
        assert_eq!(global.color, "red");
        assert_eq!(chapter.color, "blue");
    }

    #[test]
    fn test_picker_safe_values() {
        let fields = FormFields {
            color: "red".to_string(),
            background_color: "#AbCdEf".to_string(),
            ..FormFields::default()
        };
        assert_eq!(fields.color_picker_value(), DEFAULT_TEXT_COLOR);
        assert_eq!(fields.background_picker_value(), "#AbCdEf");

        let fields = FormFields {
            color: "#fff".to_string(),
            background_color: "rgb(0, 0, 0)".to_string(),
            ..FormFields::default()
        };
        assert_eq!(fields.color_picker_value(), DEFAULT_TEXT_COLOR);
        assert_eq!(fields.background_picker_value(), DEFAULT_BACKGROUND_COLOR);
    }

    #[test]
    fn test_hex_conversion() {
        assert_eq!(hex_to_rgb("#ff8000"), Some([255, 128, 0]));
        assert_eq!(hex_to_rgb("ff8000"), None);
        assert_eq!(hex_to_rgb("var(--x)"), None);
        assert_eq!(rgb_to_hex([255, 128, 0]), "#ff8000");
    }

    #[test]
    fn test_apply_sets_and_removes_and_keeps_untracked() {
        let css = ".book-content p { color: red; margin: 1em; font-size: 12px; }";
        let fields = FormFields {
            color: "  blue ".to_string(),
            font_size: String::new(),
            ..FormFields::default()
        };
        let out = apply_fields(css, ROOT, &StyleTarget::Paragraph, Scope::Global, &fields);
        let rules = parse(&out);
        let p = rules.get(".book-content p").unwrap();
        assert_eq!(p.get("color"), Some("blue"));
        assert_eq!(p.get("margin"), Some("1em"));
        assert_eq!(p.get("font-size"), None);
    }

    #[test]
    fn test_apply_then_load_round_trip() {
        let fields = FormFields {
            font_family: "Garamond".to_string(),
            font_size: "1.2em".to_string(),
            color: "#333333".to_string(),
            background_color: "#fafafa".to_string(),
            text_align: "justify".to_string(),
        };
        let out = apply_fields("", ROOT, &StyleTarget::Blockquote, Scope::Chapter(1), &fields);
        let loaded = load_fields(&out, ROOT, &StyleTarget::Blockquote, Scope::Chapter(1));
        assert_eq!(loaded, fields);
        assert!(out.contains(".book-content.chapter-2 blockquote {"));
    }

    #[test]
    fn test_apply_one_changed_field_keeps_the_others() {
        let css = ".book-content h2 {\n  font-family: Georgia, serif;\n  font-size: 1.4em;\n  color: #222222;\n  background-color: #fafafa;\n  text-align: center;\n  margin: 2em 0;\n}\n";
        let before = load_fields(css, ROOT, &StyleTarget::Heading2, Scope::Global);

        let mut edited = before.clone();
        edited.font_size = "1.6em".to_string();
        let out = apply_fields(css, ROOT, &StyleTarget::Heading2, Scope::Global, &edited);
        let after = load_fields(&out, ROOT, &StyleTarget::Heading2, Scope::Global);

        assert_eq!(after.font_size, "1.6em");
        assert_eq!(after.font_family, before.font_family);
        assert_eq!(after.color, before.color);
        assert_eq!(after.background_color, before.background_color);
        assert_eq!(after.text_align, before.text_align);
        assert_eq!(after, edited);
        let rules = parse(&out);
        assert_eq!(rules.get(".book-content h2").unwrap().get("margin"), Some("2em 0"));
    }

    #[test]
    fn test_invalid_custom_selectors() {
        for selector in ["", "   ", "p {", "p } q", "a; b", "p /* x */"] {
            assert!(!is_valid_selector(selector), "{:?}", selector);
            assert!(!StyleTarget::Custom(selector.to_string()).is_writable());
        }
        assert!(is_valid_selector(".book-content > p:first-child, .note"));
        assert!(StyleTarget::Paragraph.is_writable());
    }

    #[test]
    fn test_apply_invalid_custom_selector_leaves_text() {
        let css = ".book-content p {\n  color: #333333;\n}\n";
        let fields = FormFields {
            color: "red".to_string(),
            ..FormFields::default()
        };
        for selector in ["", "p {", "p }"] {
            let target = StyleTarget::Custom(selector.to_string());
            let out = apply_fields(css, ROOT, &target, Scope::Global, &fields);
            assert_eq!(out, css, "{:?}", selector);
            assert_eq!(load_fields(&out, ROOT, &target, Scope::Global), FormFields::default());
        }
    }

    #[test]
    fn test_apply_valid_custom_selector_round_trips() {
        let target = StyleTarget::Custom(".book-content .epigraph".to_string());
        let fields = FormFields {
            color: "red".to_string(),
            ..FormFields::default()
        };
        let out = apply_fields("", ROOT, &target, Scope::Global, &fields);
        let loaded = load_fields(&out, ROOT, &target, Scope::Global);
        assert_eq!(loaded.color, "red");
    }

    #[test]
    fn test_apply_inline_target_leaves_text_align() {
        let css = ".book-content strong { text-align: right; color: red; }";
        let fields = FormFields {
            color: "green".to_string(),
            text_align: String::new(),
            ..FormFields::default()
        };
        let out = apply_fields(css, ROOT, &StyleTarget::Bold, Scope::Global, &fields);
        let rules = parse(&out);
        let strong = rules.get(".book-content strong").unwrap();
        assert_eq!(strong.get("text-align"), Some("right"));
        assert_eq!(strong.get("color"), Some("green"));
    }

    #[test]
    fn test_inline_targets_disable_text_align() {
        for target in StyleTarget::FIXED.iter() {
            let inline = matches!(
                target,
                StyleTarget::Bold | StyleTarget::Italic | StyleTarget::InlineCode
            );
            assert_eq!(target.supports_text_align(), !inline, "{}", target);
        }
    }

    #[test]
    fn test_apply_all_empty_drops_selector() {
        let css = ".book-content a { color: red; }";
        let out = apply_fields(css, ROOT, &StyleTarget::Link, Scope::Global, &FormFields::default());
        assert!(!out.contains(".book-content a"));
    }

    #[test]
    fn test_custom_target_is_scoped() {
        let target = StyleTarget::Custom(".book-content .epigraph".to_string());
        assert_eq!(target.selector(ROOT, Scope::Global), ".book-content .epigraph");
        assert_eq!(
            target.selector(ROOT, Scope::Chapter(0)),
            ".book-content.chapter-1 .epigraph"
        );
    }

    #[test]
    fn test_root_target_selector() {
        assert_eq!(StyleTarget::BookRoot.selector(ROOT, Scope::Global), ".book-content");
        assert_eq!(
            StyleTarget::BookRoot.selector(ROOT, Scope::Chapter(3)),
            ".book-content.chapter-4"
        );
    }
}
