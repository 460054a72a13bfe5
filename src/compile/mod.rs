//! Route grouping and routing config compiler.
//!
//! # Module Structure
//!
//! ```text
//! compile/
//! ├── error.rs     # CompileError
//! ├── group.rs     # fingerprint grouping + conflict detection
//! ├── pattern.rs   # route pattern → routing src
//! ├── routing.rs   # RoutingDocument assembly
//! └── mod.rs       # compile() (this file)
//! ```
//!
//! `compile()` is pure: it reads the manifest and returns groups plus the
//! routing document. Bundling and file writes happen in `cli::build`.

mod error;
pub mod group;
pub mod pattern;
pub mod routing;

pub use error::CompileError;
pub use group::{Group, Grouping};
pub use routing::{RoutingDocument, RoutingRule};

use crate::route::{FunctionConfig, RouteManifest, Runtime};

/// Result of compiling a route manifest.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub grouping: Grouping,
    pub document: RoutingDocument,
}

impl Compiled {
    pub fn groups(&self) -> &[Group] {
        &self.grouping.groups
    }
}

/// Compile routes into function groups and the routing document.
///
/// - `defaults`: adapter-level config applied under each route's config
/// - `app_path`: framework asset dir relative to the site root (`_app`)
/// - `probe`: infers the platform default runtime if a route needs it
pub fn compile<F>(
    manifest: &RouteManifest,
    defaults: &FunctionConfig,
    app_path: &str,
    probe: F,
) -> Result<Compiled, CompileError>
where
    F: FnMut() -> Result<Runtime, CompileError>,
{
    let grouping = group::group_routes(manifest.dynamic_routes(), defaults, probe)?;
    let document = routing::assemble(&manifest.prerendered, &grouping, app_path);

    Ok(Compiled { grouping, document })
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Prerendered, PrerenderedPage, Route};

    fn manifest(routes: Vec<Route>) -> RouteManifest {
        RouteManifest {
            routes,
            prerendered: Prerendered {
                pages: vec![PrerenderedPage {
                    path: "/about".into(),
                    file: "about.html".into(),
                }],
                redirects: vec![],
            },
        }
    }

    fn unreachable_probe() -> Result<Runtime, CompileError> {
        panic!("default runtime should not be probed")
    }

    #[test]
    fn test_compile_end_to_end() {
        let defaults = FunctionConfig {
            runtime: Some("nodejs18.x".into()),
            ..Default::default()
        };
        let manifest = manifest(vec![
            Route::new("/about", "^/about/?$").prerendered(),
            Route::new("/", "^/$"),
            Route::new("/api/[x]", "^/api/([^/]+?)/?$").with_config(FunctionConfig {
                runtime: Some("edge".into()),
                ..Default::default()
            }),
        ]);

        let compiled = compile(&manifest, &defaults, "_app", unreachable_probe).unwrap();

        assert_eq!(compiled.groups().len(), 2);
        assert_eq!(compiled.groups()[0].runtime, Runtime::Node18);
        assert_eq!(compiled.groups()[1].runtime, Runtime::Edge);
        assert_eq!(compiled.document.overrides["about.html"].path, "about");
        assert_eq!(compiled.document.dispatch_rules().count(), 2);
    }

    #[test]
    fn test_compile_aborts_on_conflict() {
        let manifest = manifest(vec![
            Route::new("/api/a", "^/api/.+$").with_config(FunctionConfig {
                memory: Some(512),
                ..Default::default()
            }),
            Route::new("/api/b", "^/api/.+$").with_config(FunctionConfig {
                memory: Some(1024),
                ..Default::default()
            }),
        ]);

        let err = compile(&manifest, &FunctionConfig::default(), "_app", || {
            Ok(Runtime::Node18)
        })
        .unwrap_err();

        let message = format!("{err}");
        assert!(message.contains("/api/a"));
        assert!(message.contains("/api/b"));
    }

    #[test]
    fn test_compile_is_repeatable() {
        // no state survives between builds
        let manifest = manifest(vec![Route::new("/", "^/$"), Route::new("/x", "^/x$")]);
        let defaults = FunctionConfig::default();
        let probe = || Ok(Runtime::Node16);

        let first = compile(&manifest, &defaults, "_app", probe).unwrap();
        let second = compile(&manifest, &defaults, "_app", probe).unwrap();

        assert_eq!(first.document, second.document);
        assert_eq!(first.grouping, second.grouping);
    }

    #[test]
    fn test_all_prerendered_skips_probe() {
        let manifest = manifest(vec![Route::new("/about", "^/about/?$").prerendered()]);

        let compiled =
            compile(&manifest, &FunctionConfig::default(), "_app", unreachable_probe).unwrap();

        assert!(compiled.groups().is_empty());
        assert_eq!(compiled.document.dispatch_rules().count(), 0);
    }
}
