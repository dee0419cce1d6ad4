//! Configuration module for Quire
//!
//! User preferences and their JSON persistence in the platform config folder.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
