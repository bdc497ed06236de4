//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, checking an output path for a gzip extension or printing an
//! array shape as `4x4x4` are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod path_ext;
mod shape_ext;

// Flatten
pub use path_ext::PathExt;
pub use shape_ext::ShapeExt;
