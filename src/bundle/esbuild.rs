//! Bundling through the `esbuild` CLI.

use super::{BundleRequest, Bundler};
use crate::debug;
use crate::utils::exec::{Cmd, FilterRule};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Warnings esbuild prints for externals it leaves unresolved.
static ESBUILD_FILTER: FilterRule = FilterRule::new(&["▲ [WARNING]"]);

/// Runs the configured bundler command (`["esbuild"]`, `["npx", "esbuild"]`, ...).
pub struct EsbuildBundler {
    command: Vec<String>,
    cwd: PathBuf,
}

impl EsbuildBundler {
    pub fn new(command: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            command,
            cwd: cwd.into(),
        }
    }

    fn command(&self, request: &BundleRequest) -> Cmd {
        let target = &request.target;

        let mut cmd = Cmd::from_slice(&self.command[..])
            .arg(&request.entry)
            .arg("--bundle")
            .arg(format!("--outfile={}", request.outfile.display()))
            .arg(format!("--platform={}", target.platform))
            .arg(format!("--format={}", target.format))
            .arg(format!("--target={}", target.target))
            .arg(format!("--sourcemap={}", target.sourcemap))
            .args(request.external.iter().map(|dep| format!("--external:{dep}")));

        if let Some(banner) = &target.banner {
            cmd = cmd.arg(format!("--banner:js={banner}"));
        }

        cmd.cwd(&self.cwd).filter(&ESBUILD_FILTER)
    }
}

impl Bundler for EsbuildBundler {
    fn bundle(&self, request: &BundleRequest) -> Result<()> {
        let cmd = self.command(request);
        debug!("bundle"; "{}: {}", request.unit, cmd.argv().join(" "));

        cmd.run()
            .with_context(|| format!("esbuild failed for {}", request.entry.display()))?;
        Ok(())
    }
}
