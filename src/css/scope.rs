//! Selector scoping
//!
//! A rule is either global (applies to the whole book) or scoped to one
//! chapter. Chapter scope is stored in the stylesheet text by qualifying the
//! root class with a chapter class, e.g. `.book-content.chapter-2 p`. The
//! preview wraps every chapter in an element carrying both classes.
//!
//! Selectors are always built structurally from `(root class, element, scope)`
//! so a root class containing characters like `-` or `.` never needs to be
//! matched back out of a string here.

/// Where a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// The whole book
    #[default]
    Global,
    /// A single chapter, identified by its 0-based position
    Chapter(usize),
}

impl Scope {
    /// Chapter index for chapter scope.
    pub fn chapter(&self) -> Option<usize> {
        match self {
            Scope::Global => None,
            Scope::Chapter(index) => Some(*index),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }
}

/// Class name that marks a chapter container.
///
/// Numbered from 1, matching how chapters are listed: index 0 is `chapter-1`.
pub fn chapter_class(index: usize) -> String {
    format!("chapter-{}", index + 1)
}

/// Selector for the book root in the given scope.
///
/// `.book-content` for global scope, `.book-content.chapter-2` for the
/// second chapter (`Scope::Chapter(1)`).
pub fn root_selector(root_class: &str, scope: Scope) -> String {
    match scope {
        Scope::Global => format!(".{}", root_class),
        Scope::Chapter(index) => format!(".{}.{}", root_class, chapter_class(index)),
    }
}

/// Selector for an element (or comma list of elements) below the root.
///
/// `None` targets the root itself. Every part of a comma list is qualified,
/// so `h1, h2` becomes `.book-content h1, .book-content h2`.
pub fn resolve_selector(root_class: &str, element: Option<&str>, scope: Scope) -> String {
    let root = root_selector(root_class, scope);
    match element {
        None => root,
        Some(element) => qualify_each(&root, element),
    }
}

/// Prefix every comma-separated part of `selectors` with `root` as ancestor.
pub fn qualify_each(root: &str, selectors: &str) -> String {
    selectors
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| format!("{} {}", root, part))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Move an arbitrary selector written for global scope into `scope`.
///
/// Parts that start with the root class token get the chapter class inserted
/// directly after it; parts that do not mention the root are nested below the
/// scoped root. Global scope returns the selector unchanged.
pub fn scope_selector(selector: &str, root_class: &str, scope: Scope) -> String {
    if scope.is_global() {
        return selector.trim().to_string();
    }

    let global_root = root_selector(root_class, Scope::Global);
    let scoped_root = root_selector(root_class, scope);

    selector
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix(&global_root) {
            Some(rest) if !rest.starts_with(is_class_name_char) => {
                format!("{}{}", scoped_root, rest)
            }
            _ => format!("{} {}", scoped_root, part),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_class_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
