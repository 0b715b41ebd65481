//! Engine configuration
//!
//! Provides types and parsing for `bandpaint.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
