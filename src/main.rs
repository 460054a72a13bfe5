//! fnsplit - split framework routes into deployable serverless functions.

mod bundle;
mod cli;
mod compile;
mod config;
mod logger;
mod route;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ProjectConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_project(&config).map(|_| ()),
        Commands::Routes { args } => cli::routes::explain_routes(args, &config),
    }
}
