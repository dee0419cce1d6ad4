//! Stylesheet text <-> rule model
//!
//! The model is deliberately small: an ordered list of selectors, each with an
//! ordered list of `property: value` pairs. It is rebuilt from the text every
//! time it is needed and never treated as the source of truth.
//!
//! # Limitations
//!
//! Blocks are matched with a single non-nesting pattern. Everything before the
//! first `{` is the selector and everything up to the next `}` is the body, so
//! `@media` blocks and a literal `}` inside a value (e.g. in `content: "}"`)
//! produce truncated or odd rules. Comments are dropped before matching. Free
//! text outside blocks does not survive a parse/serialize cycle; only
//! [`HEADER_COMMENT`] is written back.

use regex::Regex;
use std::sync::OnceLock;

/// Comment written at the top of every serialized stylesheet.
pub const HEADER_COMMENT: &str = "/* Quire stylesheet: edited with the visual form or by hand */";

// ─────────────────────────────────────────────────────────────────────────────
// Declarations
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered `property -> value` pairs for one selector.
///
/// Setting an existing property replaces its value in place, so the original
/// position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    entries: Vec<(String, String)>,
}

impl Declarations {
    /// Create an empty declaration list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a property.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property, replacing any earlier value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Remove a property entirely. Returns the old value if it was present.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over `(property, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RuleSet
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered `selector -> declarations` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<(String, Declarations)>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the declarations for an exact selector string.
    pub fn get(&self, selector: &str) -> Option<&Declarations> {
        self.rules
            .iter()
            .find(|(name, _)| name == selector)
            .map(|(_, declarations)| declarations)
    }

    /// Get the declarations for a selector, inserting an empty entry at the
    /// end if it does not exist yet.
    pub fn entry(&mut self, selector: &str) -> &mut Declarations {
        let index = match self.rules.iter().position(|(name, _)| name == selector) {
            Some(index) => index,
            None => {
                self.rules.push((selector.to_string(), Declarations::new()));
                self.rules.len() - 1
            }
        };
        &mut self.rules[index].1
    }

    /// Replace the whole declaration list of a selector.
    ///
    /// An existing selector keeps its position; its previous declarations are
    /// discarded, not merged.
    pub fn replace(&mut self, selector: &str, declarations: Declarations) {
        *self.entry(selector) = declarations;
    }

    /// Remove a selector. Returns its declarations if it was present.
    pub fn remove(&mut self, selector: &str) -> Option<Declarations> {
        let index = self.rules.iter().position(|(name, _)| name == selector)?;
        Some(self.rules.remove(index).1)
    }

    /// Iterate over `(selector, declarations)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declarations)> {
        self.rules
            .iter()
            .map(|(selector, declarations)| (selector.as_str(), declarations))
    }

    /// All selector strings in insertion order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(selector, _)| selector.as_str())
    }

    /// Copy of this rule set without selectors that have no declarations.
    pub fn without_empty(&self) -> RuleSet {
        RuleSet {
            rules: self
                .rules
                .iter()
                .filter(|(_, declarations)| !declarations.is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid comment pattern"))
}

fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([^{}]+)\{([^}]*)\}").expect("valid block pattern"))
}

/// Parse stylesheet text into a [`RuleSet`].
///
/// Never fails. Text that contains no recognizable block yields an empty set.
/// When a selector appears in several blocks, the last block's declarations
/// replace the earlier ones completely.
pub fn parse(text: &str) -> RuleSet {
    let text = comment_pattern().replace_all(text, "");
    let mut rules = RuleSet::new();

    for captures in block_pattern().captures_iter(&text) {
        let selector = captures[1].trim();
        if selector.is_empty() {
            continue;
        }
        rules.replace(selector, parse_declarations(&captures[2]));
    }

    rules
}

/// Parse the inside of a `{ ... }` block.
///
/// Declarations are split on `;`, then on the first `:` only, so values such
/// as `url(http://x)` keep their colons.
pub fn parse_declarations(body: &str) -> Declarations {
    let mut declarations = Declarations::new();

    for declaration in body.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }
        declarations.set(property, value);
    }

    declarations
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a [`RuleSet`] back into stylesheet text.
///
/// Output is deterministic: header comment, then one block per non-empty
/// selector in insertion order with two-space indented declarations and one
/// blank line between blocks.
pub fn serialize(rules: &RuleSet) -> String {
    let mut output = String::from(HEADER_COMMENT);
    output.push('\n');

    for (selector, declarations) in rules.iter() {
        if declarations.is_empty() {
            continue;
        }
        output.push('\n');
        output.push_str(selector);
        output.push_str(" {\n");
        for (property, value) in declarations.iter() {
            output.push_str(&format!("  {}: {};\n", property, value));
        }
        output.push_str("}\n");
    }

    output
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_rule() {
        let rules = parse(".book-content p { color: red; font-size: 1.1em; }");
        let p = rules.get(".book-content p").unwrap();
        assert_eq!(p.get("color"), Some("red"));
        assert_eq!(p.get("font-size"), Some("1.1em"));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_parse_trims_selector_and_values() {
        let rules = parse("\n\n   h1   {\n   color :  blue  ;\n}\n");
        assert_eq!(rules.get("h1").unwrap().get("color"), Some("blue"));
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let rules = parse("a { background: url(http://example.com/x.png); transition: color 0:30; }");
        let a = rules.get("a").unwrap();
        assert_eq!(a.get("background"), Some("url(http://example.com/x.png)"));
        assert_eq!(a.get("transition"), Some("color 0:30"));
    }

    #[test]
    fn test_parse_discards_empty_property_or_value() {
        let rules = parse("p { : red; color: ; margin: 0; ; nonsense }");
        let p = rules.get("p").unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("margin"), Some("0"));
    }

    #[test]
    fn test_parse_duplicate_property_last_wins() {
        let rules = parse("p { color: red; margin: 0; color: green; }");
        let p = rules.get("p").unwrap();
        assert_eq!(p.get("color"), Some("green"));
        // Replaced in place, so color is still first.
        assert_eq!(p.iter().next(), Some(("color", "green")));
    }

    #[test]
    fn test_parse_repeated_selector_replaces_not_merges() {
        let rules = parse(
            ".book-content h1 { font-size: 2em; } .book-content h1 { color: blue; }",
        );
        assert_eq!(rules.len(), 1);
        let h1 = rules.get(".book-content h1").unwrap();
        assert_eq!(h1.get("color"), Some("blue"));
        assert_eq!(h1.get("font-size"), None);
    }

    #[test]
    fn test_parse_ignores_comments_outside_blocks() {
        let rules = parse("/* header */\n.a { color: red; }\n/* between */\n.b { color: blue; }");
        let selectors: Vec<&str> = rules.selectors().collect();
        assert_eq!(selectors, vec![".a", ".b"]);
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        assert!(parse("").is_empty());
        assert!(parse("this is not css at all").is_empty());
        assert!(parse("{{{{").is_empty());
        assert!(parse("{ color: red; }").is_empty());
    }

    #[test]
    fn test_parse_literal_brace_in_body_truncates() {
        // Documented limitation: the body stops at the first `}`.
        let rules = parse(r#"p::after { content: "}"; color: red; }"#);
        let after = rules.get("p::after").unwrap();
        assert_eq!(after.get("content"), Some("\""));
        assert_eq!(after.get("color"), None);
    }

    #[test]
    fn test_parse_comma_list_is_one_selector() {
        let rules = parse("h1, h2, h3 { text-align: center; }");
        assert!(rules.get("h1, h2, h3").is_some());
    }

    #[test]
    fn test_serialize_format() {
        let mut rules = RuleSet::new();
        rules.entry("body").set("margin", "0");
        rules.entry(".a p").set("color", "red");
        rules.entry(".a p").set("font-size", "1em");

        let text = serialize(&rules);
        let expected = format!(
            "{}\n\nbody {{\n  margin: 0;\n}}\n\n.a p {{\n  color: red;\n  font-size: 1em;\n}}\n",
            HEADER_COMMENT
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_serialize_drops_empty_selectors() {
        let mut rules = RuleSet::new();
        rules.entry(".empty");
        rules.entry(".full").set("color", "red");

        let text = serialize(&rules);
        assert!(!text.contains(".empty"));
        assert!(text.contains(".full"));
    }

    #[test]
    fn test_serialize_then_parse_restores_non_empty_rules() {
        let mut rules = RuleSet::new();
        rules.entry(".book-content").set("margin", "0 auto");
        rules.entry(".book-content h1").set("font-family", "\"Georgia\", serif");
        rules.entry(".book-content h1").set("color", "#112233");
        rules.entry(".book-content .unused");
        rules
            .entry(".book-content.chapter-2 p")
            .set("background", "url(images/paper.png)");

        assert_eq!(parse(&serialize(&rules)), rules.without_empty());
    }

    #[test]
    fn test_round_trip_is_stable() {
        let raw = "/* mine */ .x{color:red;;margin : 0 }  stray text  .y { a: b }";
        let first = parse(raw);
        let second = parse(&serialize(&first));
        assert_eq!(first, second);
        assert_eq!(serialize(&first), serialize(&second));
    }

    #[test]
    fn test_declarations_remove() {
        let mut declarations = Declarations::new();
        declarations.set("color", "red");
        declarations.set("margin", "0");
        assert_eq!(declarations.remove("color"), Some("red".to_string()));
        assert_eq!(declarations.remove("color"), None);
        assert_eq!(declarations.len(), 1);
    }

    #[test]
    fn test_rule_set_entry_keeps_position() {
        let mut rules = RuleSet::new();
        rules.entry("a").set("x", "1");
        rules.entry("b").set("x", "2");
        rules.replace("a", parse_declarations("y: 3"));

        let selectors: Vec<&str> = rules.selectors().collect();
        assert_eq!(selectors, vec!["a", "b"]);
        assert_eq!(rules.get("a").unwrap().get("x"), None);
        assert_eq!(rules.get("a").unwrap().get("y"), Some("3"));
    }
}
