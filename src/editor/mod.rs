//! Stylesheet editing for Quire
//!
//! - `form.rs` - the visual form that edits five properties of one selector
//! - `history.rs` - undo/redo snapshots of the stylesheet text
//! - `debounce.rs` - idle detection before typed text becomes a snapshot
//! - `highlight.rs` - CSS highlighting for the raw text editor

pub mod debounce;
pub mod form;
pub mod highlight;
pub mod history;

pub use debounce::Debouncer;
pub use form::{apply_fields, load_fields, FormFields, StyleTarget};
pub use highlight::CssHighlighter;
pub use history::HistoryStack;
