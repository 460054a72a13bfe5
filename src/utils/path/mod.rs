//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`)
//! - [`module`]: ES module specifiers between generated files (`import_specifier`)

pub mod fs;
pub mod module;

pub use fs::{normalize_path, resolve_path};
pub use module::import_specifier;
