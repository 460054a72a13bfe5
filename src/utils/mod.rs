//! Shared utilities.

pub mod exec;
pub mod fs;
pub mod path;
pub mod plural;
