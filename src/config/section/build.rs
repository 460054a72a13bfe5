//! `[build]` section configuration.
//!
//! Paths to what the framework build produced. Relative paths resolve
//! against the config file's directory.
//!
//! ```toml
//! [build]
//! manifest = "build/routes.json"
//! server = "build/server/index.js"
//! client = "build/client"
//! prerendered = "build/prerendered"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Route manifest written by the framework build
    pub manifest: PathBuf,
    /// Application server module imported by every function entry
    pub server: PathBuf,
    /// Client assets, copied to the static output
    pub client: PathBuf,
    /// Prerendered pages, copied to the static output
    pub prerendered: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            manifest: "build/routes.json".into(),
            server: "build/server/index.js".into(),
            client: "build/client".into(),
            prerendered: "build/prerendered".into(),
        }
    }
}

pub struct BuildFields {
    pub manifest: FieldPath,
}

impl BuildConfig {
    pub const FIELDS: BuildFields = BuildFields {
        manifest: FieldPath::new("build.manifest"),
    };

    pub fn normalize(&mut self, root: &Path) {
        use crate::utils::path::resolve_path;

        self.manifest = resolve_path(&self.manifest, root);
        self.server = resolve_path(&self.server, root);
        self.client = resolve_path(&self.client, root);
        self.prerendered = resolve_path(&self.prerendered, root);
    }

    /// The manifest must exist; client/prerendered dirs may be absent.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.manifest.is_file() {
            diag.error_with_hint(
                Self::FIELDS.manifest,
                format!("route manifest not found: {}", self.manifest.display()),
                "run the framework build first, or pass --manifest",
            );
        }
    }
}
