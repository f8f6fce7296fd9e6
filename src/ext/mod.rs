//! Extension traits for built-in Rust types.
pub mod path;

pub use path::PathExt;
