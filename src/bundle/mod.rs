//! Function unit emission.
//!
//! # Module Structure
//!
//! ```text
//! bundle/
//! ├── entry.rs     # entry.js / manifest.js rendering
//! ├── entry.js     # embedded entry template
//! ├── esbuild.rs   # EsbuildBundler (spawns the bundler CLI)
//! └── mod.rs       # Bundler trait + emit_units (this file)
//! ```
//!
//! One unit per group, bundled concurrently:
//!
//! ```text
//! {tmp}/fn-0/entry.js ──► bundler ──► {output}/functions/fn-0/index.js
//! {tmp}/fn-1/entry.js ──► bundler ──► {output}/functions/fn-1/index.js
//! ```

pub mod entry;
pub mod esbuild;

pub use esbuild::EsbuildBundler;

use crate::compile::{CompileError, Group};
use crate::debug;
use crate::logger::ProgressLine;
use crate::utils::{fs::write_file, path::import_specifier};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Node globals the server bundle expects when it runs outside Node.
pub const NODE_GLOBALS_BANNER: &str = "global.fs = require(\"fs\");\n\
global.path = require(\"path\");\n\
global.crypto = require(\"crypto\");\n\
globalThis.global = globalThis;";

/// Output settings shared by every unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub platform: String,
    pub format: String,
    pub target: String,
    pub sourcemap: String,
    /// Prepended to every bundle
    pub banner: Option<String>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            platform: "browser".into(),
            format: "esm".into(),
            target: "es2020".into(),
            sourcemap: "linked".into(),
            banner: Some(NODE_GLOBALS_BANNER.into()),
        }
    }
}

/// Everything the bundler needs for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// `fn-{i}`
    pub unit: String,
    pub entry: PathBuf,
    pub outfile: PathBuf,
    /// Modules left as runtime imports
    pub external: Vec<String>,
    pub target: Target,
}

/// External bundling tool.
///
/// Called from rayon workers, one request per unit.
pub trait Bundler: Sync {
    fn bundle(&self, request: &BundleRequest) -> Result<()>;
}

/// Where units are staged and written.
#[derive(Debug, Clone)]
pub struct UnitLayout {
    /// Per-unit entry artifacts go to `{tmp_dir}/fn-{i}/`
    pub tmp_dir: PathBuf,
    /// Bundles go to `{functions_dir}/fn-{i}/index.js`
    pub functions_dir: PathBuf,
    /// Application server module imported by every entry
    pub server_entry: PathBuf,
}

impl UnitLayout {
    pub fn unit_dir(&self, group: &Group) -> PathBuf {
        self.tmp_dir.join(group.name())
    }

    pub fn outfile(&self, group: &Group) -> PathBuf {
        self.functions_dir.join(group.name()).join("index.js")
    }
}

/// Write `entry.js` and `manifest.js` for a group, returning the entry path.
pub fn prepare_unit(group: &Group, layout: &UnitLayout) -> Result<PathBuf> {
    let dir = layout.unit_dir(group);
    let entry_path = dir.join(entry::ENTRY_FILE);

    let server = import_specifier(&dir, &layout.server_entry);
    write_file(&entry_path, entry::render_entry(&server))?;

    let manifest = entry::render_manifest(group)
        .with_context(|| format!("Failed to render manifest for `{}`", group.name()))?;
    write_file(&dir.join(entry::MANIFEST_FILE), manifest)?;

    Ok(entry_path)
}

fn emit_unit(group: &Group, layout: &UnitLayout, target: &Target, bundler: &dyn Bundler) -> Result<()> {
    let entry = prepare_unit(group, layout)?;
    let request = BundleRequest {
        unit: group.name(),
        entry,
        outfile: layout.outfile(group),
        external: group.config.external_deps().to_vec(),
        target: target.clone(),
    };

    debug!("bundle"; "{} ({} routes, {})", request.unit, group.routes.len(), group.runtime);
    bundler.bundle(&request)
}

/// Emit one bundled unit per group.
///
/// Groups run concurrently; the first failure is returned as
/// [`CompileError::BuildArtifact`] naming the unit.
pub fn emit_units(
    groups: &[Group],
    layout: &UnitLayout,
    target: &Target,
    bundler: &dyn Bundler,
    progress: Option<&ProgressLine>,
) -> Result<(), CompileError> {
    groups.par_iter().try_for_each(|group| {
        emit_unit(group, layout, target, bundler).map_err(|source| {
            CompileError::BuildArtifact {
                unit: group.name(),
                source,
            }
        })?;
        if let Some(progress) = progress {
            progress.inc("functions");
        }
        Ok(())
    })
}

/// Convenience for callers holding an absolute output root.
pub fn functions_dir(output: &Path) -> PathBuf {
    output.join("functions")
}

// ============================================================================
// tests
// ============================================================================
