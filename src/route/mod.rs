//! Route manifest supplied by the framework build.
//!
//! # Module Structure
//!
//! ```text
//! route/
//! ├── config.rs    # FunctionConfig, merging, fingerprint
//! ├── runtime.rs   # Runtime whitelist + default resolution
//! └── mod.rs       # Route, RouteManifest (this file)
//! ```
//!
//! The manifest is produced once per build and never mutated afterwards.

pub mod config;
pub mod runtime;

pub use config::{FunctionConfig, IsrConfig, Regions};
pub use runtime::Runtime;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// One framework-discovered endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique route id (e.g., `/blog/[slug]`)
    pub id: String,
    /// Anchored regex over request paths, in its literal textual form
    pub pattern: String,
    /// Response was computed at build time and is served as a static file
    #[serde(default)]
    pub prerender: bool,
    /// Per-route deployment config
    #[serde(default)]
    pub config: Option<FunctionConfig>,
}

#[cfg(test)]
impl Route {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            prerender: false,
            config: None,
        }
    }

    pub fn with_config(mut self, config: FunctionConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn prerendered(mut self) -> Self {
        self.prerender = true;
        self
    }
}

/// A page rendered at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerenderedPage {
    /// Request path (e.g., `/about` or `/docs/`)
    pub path: String,
    /// Artifact file relative to the static dir (e.g., `about.html`)
    pub file: String,
}

/// A redirect resolved at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerenderedRedirect {
    pub path: String,
    pub location: String,
    pub status: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prerendered {
    pub pages: Vec<PrerenderedPage>,
    pub redirects: Vec<PrerenderedRedirect>,
}

/// Everything the framework build hands over: routes in discovery order plus
/// the prerendered output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteManifest {
    pub routes: Vec<Route>,
    pub prerendered: Prerendered,
}

impl RouteManifest {
    /// Parse manifest from a JSON string.
    pub fn from_str(content: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(content)?;
        Ok(manifest)
    }

    /// Load manifest written by the framework build.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route manifest `{}`", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid route manifest `{}`", path.display()))
    }

    /// Routes that need a function (everything not prerendered), input order kept.
    pub fn dynamic_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|route| !route.prerender)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parse() {
        let manifest = RouteManifest::from_str(
            r#"{
                "routes": [
                    { "id": "/", "pattern": "^/$", "prerender": true, "config": null },
                    { "id": "/blog/[slug]", "pattern": "^/blog/([^/]+?)/?$",
                      "config": { "runtime": "edge", "maxDuration": 10, "regions": "iad1" } }
                ],
                "prerendered": {
                    "pages": [{ "path": "/", "file": "index.html" }],
                    "redirects": [{ "path": "/old", "location": "/new", "status": 301 }]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.routes.len(), 2);
        assert!(manifest.routes[0].prerender);
        assert!(!manifest.routes[1].prerender);

        let config = manifest.routes[1].config.as_ref().unwrap();
        assert_eq!(config.runtime.as_deref(), Some("edge"));
        assert_eq!(config.max_duration, Some(10));
        assert_eq!(config.regions, Some(Regions::One("iad1".into())));

        assert_eq!(manifest.prerendered.pages[0].file, "index.html");
        assert_eq!(manifest.prerendered.redirects[0].status, 301);
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest = RouteManifest::from_str(r#"{ "routes": [] }"#).unwrap();
        assert!(manifest.routes.is_empty());
        assert!(manifest.prerendered.pages.is_empty());
        assert!(manifest.prerendered.redirects.is_empty());
    }

    #[test]
    fn test_dynamic_routes_keep_order() {
        let manifest = RouteManifest {
            routes: vec![
                Route::new("/a", "^/a$"),
                Route::new("/b", "^/b$").prerendered(),
                Route::new("/c", "^/c$"),
            ],
            prerendered: Prerendered::default(),
        };

        let ids: Vec<_> = manifest.dynamic_routes().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["/a", "/c"]);
    }

    #[test]
    fn test_manifest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RouteManifest::from_path(&dir.path().join("routes.json")).unwrap_err();
        assert!(format!("{err}").contains("routes.json"));
    }
}
