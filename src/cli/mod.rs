//! Command-line interface module.

mod args;
pub mod build;
pub mod routes;

pub use args::{BuildArgs, Cli, Commands, RoutesArgs};
