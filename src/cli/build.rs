//! Deployment build orchestration.
//!
//! Build pipeline phases:
//! - **Compile** - Load the route manifest, group routes, assemble routing
//! - **Clean** - Clear previous output and staged entries
//! - **Bundle** - One function per group, in parallel
//! - **Static** - Copy client assets, then prerendered pages
//! - **Finalize** - Write `config.json`
//!
//! Any failure aborts before `config.json` is written.

use crate::{
    bundle::{self, Bundler, EsbuildBundler, UnitLayout},
    compile::{self, CompileError, Compiled},
    config::ProjectConfig,
    debug, log,
    logger::ProgressLine,
    route::{RouteManifest, Runtime, runtime::infer_default_runtime},
    utils::{fs as out, plural::plural_count},
};
use anyhow::{Context, Result};

/// Counts reported at the end of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub routes: usize,
    pub functions: usize,
    pub static_files: usize,
}

/// Build with the configured bundler and the local Node.js default runtime.
pub fn build_project(config: &ProjectConfig) -> Result<BuildSummary> {
    let bundler = EsbuildBundler::new(config.bundler.command.clone(), &config.root);
    build_with(config, &bundler, infer_default_runtime)
}

/// Build pipeline with injectable collaborators.
pub fn build_with<F>(config: &ProjectConfig, bundler: &dyn Bundler, probe: F) -> Result<BuildSummary>
where
    F: FnMut() -> Result<Runtime, CompileError>,
{
    let manifest = RouteManifest::from_path(&config.build.manifest)?;
    let compiled = compile::compile(
        &manifest,
        &config.defaults(),
        &config.output.app_path(),
        probe,
    )?;
    log_groups(&manifest, &compiled);

    clean_output(config)?;

    emit_functions(config, &compiled, bundler)?;
    let static_files = copy_static(config)?;

    let routing_file = config.output.routing_file();
    let json = compiled
        .document
        .to_json()
        .context("Failed to serialize routing config")?;
    out::write_file(&routing_file, json)?;

    let summary = BuildSummary {
        routes: compiled.document.routes.len(),
        functions: compiled.groups().len(),
        static_files,
    };
    log!(
        "build";
        "{}, {} written to {}",
        plural_count(summary.functions, "function"),
        plural_count(summary.routes, "routing rule"),
        config.root_relative(&routing_file).display()
    );

    Ok(summary)
}

fn log_groups(manifest: &RouteManifest, compiled: &Compiled) {
    let dynamic = manifest.dynamic_routes().count();
    log!(
        "compile";
        "{} into {}",
        plural_count(dynamic, "route"),
        plural_count(compiled.groups().len(), "function")
    );

    for group in compiled.groups() {
        debug!(
            "compile";
            "{} [{}] {}",
            group.name(),
            group.runtime,
            group
                .routes
                .iter()
                .map(|route| route.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

/// Remove the previous build's artifacts and staged entries.
///
/// `--clean` removes the whole output dir, otherwise only what a build writes.
fn clean_output(config: &ProjectConfig) -> Result<()> {
    let output = &config.output;

    if config.clean {
        out::remove_dir_if_exists(&output.dir)?;
    } else {
        out::remove_dir_if_exists(&output.functions_dir())?;
        out::remove_dir_if_exists(&output.dir.join("static"))?;
        let routing_file = output.routing_file();
        if routing_file.exists() {
            std::fs::remove_file(&routing_file)
                .with_context(|| format!("Failed to remove {}", routing_file.display()))?;
        }
    }

    out::remove_dir_if_exists(&output.tmp)
}

fn emit_functions(config: &ProjectConfig, compiled: &Compiled, bundler: &dyn Bundler) -> Result<()> {
    let groups = compiled.groups();
    if groups.is_empty() {
        return Ok(());
    }

    let layout = UnitLayout {
        tmp_dir: config.output.tmp.clone(),
        functions_dir: config.output.functions_dir(),
        server_entry: config.build.server.clone(),
    };

    let progress = ProgressLine::new("bundle", &[("functions", groups.len())]);
    bundle::emit_units(
        groups,
        &layout,
        &config.bundler.target(),
        bundler,
        Some(&progress),
    )?;
    progress.finish();

    Ok(())
}

/// Copy client assets and prerendered pages to `{output}/static{base}`.
///
/// Prerendered pages are copied last and win over client files at the same path.
fn copy_static(config: &ProjectConfig) -> Result<usize> {
    let static_dir = config.output.static_dir();

    let copied = out::copy_dir(&config.build.client, &static_dir)?
        + out::copy_dir(&config.build.prerendered, &static_dir)?;

    debug!("static"; "{} copied to {}", plural_count(copied, "file"), static_dir.display());
    Ok(copied)
}

// ============================================================================
// tests
// ============================================================================
