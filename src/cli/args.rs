//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Split framework routes into deployable functions
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: fnsplit.toml)
    #[arg(short = 'C', long, global = true, default_value = "fnsplit.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Group routes, bundle functions and write the routing config
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Show which routing rules a request path hits
    #[command(visible_alias = "r")]
    Routes {
        #[command(flatten)]
        args: RoutesArgs,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Remove the whole output directory before building
    #[arg(short, long)]
    pub clean: bool,

    /// Route manifest path (overrides `build.manifest`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Output directory (overrides `output.dir`)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Routes command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RoutesArgs {
    /// Request paths to evaluate (e.g. `/blog/hello`)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Routing config to read (default: `{output.dir}/config.json`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub document: Option<PathBuf>,
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_args() {
        let cli = Cli::parse_from(["fnsplit", "build", "-c", "-m", "routes.json", "-V"]);
        assert!(cli.is_build());
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert!(build_args.clean);
        assert!(build_args.verbose);
        assert_eq!(build_args.manifest, Some(PathBuf::from("routes.json")));
        assert_eq!(build_args.output, None);
    }

    #[test]
    fn test_parse_routes_args() {
        let cli = Cli::parse_from(["fnsplit", "-C", "app.toml", "routes", "/", "/blog/x"]);
        assert_eq!(cli.config, PathBuf::from("app.toml"));
        let Commands::Routes { args } = cli.command else {
            panic!("expected routes");
        };
        assert_eq!(args.paths, ["/", "/blog/x"]);
    }

    #[test]
    fn test_routes_requires_path() {
        assert!(Cli::try_parse_from(["fnsplit", "routes"]).is_err());
    }
}
