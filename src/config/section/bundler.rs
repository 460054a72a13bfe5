//! `[bundler]` section configuration.
//!
//! ```toml
//! [bundler]
//! command = ["esbuild"]       # or ["npx", "esbuild"]
//! platform = "browser"
//! format = "esm"
//! target = "es2020"
//! sourcemap = "linked"
//! banner = "import { Buffer } from 'node:buffer';"
//! ```
//!
//! `banner` defaults to the Node globals shim (`global.fs`, `global.path`,
//! `global.crypto`, `globalThis.global`). Set it to `""` to bundle without one.

use crate::bundle::Target;
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

const PACKAGE_RUNNERS: &[&str] = &["npx", "bunx", "pnpx", "yarn", "dlx"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    pub command: Vec<String>,
    pub platform: String,
    pub format: String,
    pub target: String,
    pub sourcemap: String,
    pub banner: Option<String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        let target = Target::default();
        Self {
            command: vec!["esbuild".into()],
            platform: target.platform,
            format: target.format,
            target: target.target,
            sourcemap: target.sourcemap,
            banner: target.banner,
        }
    }
}

pub struct BundlerFields {
    pub command: FieldPath,
}

impl BundlerConfig {
    pub const FIELDS: BundlerFields = BundlerFields {
        command: FieldPath::new("bundler.command"),
    };

    pub fn target(&self) -> Target {
        Target {
            platform: self.platform.clone(),
            format: self.format.clone(),
            target: self.target.clone(),
            sourcemap: self.sourcemap.clone(),
            banner: self.banner.clone().filter(|banner| !banner.is_empty()),
        }
    }

    /// # Checks
    /// - `command` must not be empty
    /// - `command[0]` must be installed (package runners only get a hint)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(cmd) = self.command.first() else {
            diag.error(
                Self::FIELDS.command,
                format!("{} is empty", Self::FIELDS.command),
            );
            return;
        };

        if which::which(cmd).is_ok() {
            return;
        }

        if PACKAGE_RUNNERS.contains(&cmd.as_str()) {
            if let Some(package) = self.command.get(1) {
                diag.hint(
                    Self::FIELDS.command,
                    format!("`{package}` via `{cmd}`, ensure the package is installed"),
                );
            }
        } else {
            diag.error_with_hint(
                Self::FIELDS.command,
                format!("`{cmd}` not found"),
                format!("install the command or update {}", Self::FIELDS.command),
            );
        }
    }
}
