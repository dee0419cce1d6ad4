//! Stylesheet engine for Quire
//!
//! Everything that reads or rewrites CSS text lives here:
//!
//! - `model.rs` - raw text <-> [`RuleSet`] (parse and serialize)
//! - `scope.rs` - global vs chapter-scoped selector resolution
//! - `overlay.rs` - centering rules synthesized from per-chapter flags
//! - `strip.rs` - root-class removal for the EPUB compiler
//!
//! None of these functions fail. Malformed CSS degrades to an empty or
//! partial model; the worst case is a preview that shows fewer styles.

pub mod model;
pub mod overlay;
pub mod scope;
pub mod strip;

pub use model::{parse, serialize, Declarations, RuleSet};
pub use overlay::{CenteringFlags, ChapterCentering};
pub use scope::Scope;
pub use strip::strip_namespace;
