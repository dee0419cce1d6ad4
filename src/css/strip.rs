//! Root-class removal for the EPUB compiler
//!
//! The editor scopes every rule under the book's root class because the
//! preview wraps the manuscript in an element carrying that class. Pandoc's
//! EPUB output has no such wrapper, so before compiling:
//!
//! - `.root <descendant>` loses its `.root ` prefix
//! - `.root {` (the root rule itself) becomes `body {`
//!
//! Anything else that merely starts with the root class, such as
//! `.root-extra` or the chapter-qualified `.root.chapter-2`, is left alone.

use log::warn;
use regex::{Captures, Regex};

/// Remove the root-class namespace from stylesheet text.
///
/// The class name is user input and is matched literally. Applying this twice
/// gives the same result as applying it once.
pub fn strip_namespace(text: &str, root_class: &str) -> String {
    let root_class = root_class.trim();
    if root_class.is_empty() {
        return text.to_string();
    }

    let pattern = format!(r"\.{}(\s*\{{|\s+)", regex::escape(root_class));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Could not build namespace pattern for '{}': {}", root_class, e);
            return text.to_string();
        }
    };

    re.replace_all(text, |caps: &Captures| {
        let tail = &caps[1];
        if tail.ends_with('{') {
            format!("body{}", tail)
        } else {
            String::new()
        }
    })
    .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_descendant_rule() {
        assert_eq!(
            strip_namespace(".book-content p { color: red; }", "book-content"),
            "p { color: red; }"
        );
    }

    #[test]
    fn test_strip_root_rule_to_body() {
        assert_eq!(
            strip_namespace(".book-content { margin: 0; }", "book-content"),
            "body { margin: 0; }"
        );
        assert_eq!(
            strip_namespace(".book-content{margin:0}", "book-content"),
            "body{margin:0}"
        );
    }

    #[test]
    fn test_strip_comma_lists_and_newlines() {
        let css = ".book-content h1,\n.book-content h2 {\n  text-align: center;\n}";
        assert_eq!(
            strip_namespace(css, "book-content"),
            "h1,\nh2 {\n  text-align: center;\n}"
        );
    }

    #[test]
    fn test_strip_leaves_longer_class_names() {
        let css = ".book-content-wide p { margin: 0; }";
        assert_eq!(strip_namespace(css, "book-content"), css);
    }

    #[test]
    fn test_strip_leaves_chapter_qualified_rules() {
        let css = ".book-content.chapter-1 p { color: red; }";
        assert_eq!(strip_namespace(css, "book-content"), css);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let css = ".book-content { margin: 0; }\n.book-content p { color: red; }\n";
        let once = strip_namespace(css, "book-content");
        let twice = strip_namespace(&once, "book-content");
        assert_eq!(once, twice);
        assert_eq!(once, "body { margin: 0; }\np { color: red; }\n");
    }

    #[test]
    fn test_strip_treats_class_name_literally() {
        // `.` and `+` would be regex metacharacters if not escaped.
        let css = ".my.book+ p { color: red; }\n.myXbook p { color: blue; }";
        assert_eq!(
            strip_namespace(css, "my.book+"),
            "p { color: red; }\n.myXbook p { color: blue; }"
        );
    }

    #[test]
    fn test_strip_with_empty_root_class_is_noop() {
        let css = ".a p { color: red; }";
        assert_eq!(strip_namespace(css, "  "), css);
    }

    #[test]
    fn test_strip_never_mutates_input() {
        let canonical = String::from(".book-content p { color: red; }");
        let _ = strip_namespace(&canonical, "book-content");
        assert_eq!(canonical, ".book-content p { color: red; }");
    }
}
