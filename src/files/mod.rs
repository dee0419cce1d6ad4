//! Native dialogs for Quire
//!
//! Picking the project folder and, when Pandoc cannot be found, its
//! executable.

pub mod dialogs;
