//! Project configuration management for `fnsplit.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── adapter    # [adapter]
//! │   ├── build      # [build]
//! │   ├── bundler    # [bundler]
//! │   └── output     # [output]
//! ├── types/         # ConfigError, diagnostics, field paths
//! └── mod.rs         # ProjectConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{AdapterConfig, BuildConfig, BundlerConfig, OutputConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing fnsplit.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project root directory - parent of config file
    #[serde(skip)]
    pub root: PathBuf,

    /// Remove the whole output dir before building (`--clean`)
    #[serde(skip)]
    pub clean: bool,

    #[serde(default)]
    pub adapter: AdapterConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub bundler: BundlerConfig,
}

impl ProjectConfig {
    /// Load configuration for the given command.
    ///
    /// Searches upward from cwd for the config file; the project root is
    /// the config file's parent directory. Without a config file, defaults
    /// apply relative to cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, root) = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                (config, root)
            }
            None => {
                log!(
                    "config";
                    "'{}' not found, using defaults",
                    cli.config.display()
                );
                (Self::default(), cwd)
            }
        };

        config.apply_command_options(cli);
        config.normalize_paths(&root);

        if cli.is_build() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    /// Adapter defaults merged under every route's config.
    pub fn defaults(&self) -> crate::route::FunctionConfig {
        self.adapter.to_function_config()
    }

    /// Get path relative to the project root (for log lines)
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Routes { .. } => {}
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.manifest, args.manifest.as_ref());
        Self::update_option(&mut self.output.dir, args.output.as_ref());
        self.clean = args.clean;
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    fn normalize_paths(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);

        self.build.normalize(&root);
        self.output.normalize(&root);
        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for a build.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.adapter.validate(&mut diag);
        self.build.validate(&mut diag);
        self.bundler.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = ProjectConfig::parse_with_ignored("[adapter\nruntime = \"edge\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[adapter]\nruntime = \"edge\"\nsplit = true\n[unknown_section]\nfield = 1";
        let (config, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.adapter.runtime.as_deref(), Some("edge"));
        assert!(ignored.iter().any(|f| f == "adapter.split"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[adapter]\nmemory = 1024\n[output]\ndir = \"out\"\n[bundler]\ncommand = [\"npx\", \"esbuild\"]";
        let (_, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_cli_overrides_apply_before_normalize() {
        let cli = Cli::parse_from([
            "fnsplit",
            "build",
            "--manifest",
            "custom/routes.json",
            "--output",
            "dist",
            "--clean",
        ]);
        let mut config = test_parse_config("[output]\ndir = \"ignored\"\n");

        config.apply_command_options(&cli);
        config.normalize_paths(Path::new("/project"));

        assert!(config.clean);
        assert_eq!(config.build.manifest, PathBuf::from("/project/custom/routes.json"));
        assert_eq!(config.output.dir, PathBuf::from("/project/dist"));
    }

    #[test]
    fn test_defaults_come_from_adapter() {
        let config = test_parse_config("[adapter]\nruntime = \"edge\"\nmemory = 256\n");
        let defaults = config.defaults();
        assert_eq!(defaults.runtime.as_deref(), Some("edge"));
        assert_eq!(defaults.memory, Some(256));
    }

    #[test]
    fn test_root_relative() {
        let config = ProjectConfig {
            root: PathBuf::from("/project"),
            ..Default::default()
        };
        assert_eq!(
            config.root_relative("/project/.open-runtimes/config.json"),
            PathBuf::from(".open-runtimes/config.json")
        );
    }
}
