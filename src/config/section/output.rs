//! `[output]` section configuration.
//!
//! ```toml
//! [output]
//! dir = ".open-runtimes"                  # deployment output root
//! tmp = ".svelte-kit/open-runtimes-tmp"   # per-function entry staging
//! app_dir = "_app"                        # framework asset dir
//! base = ""                               # site base path, e.g. "/docs"
//! ```
//!
//! Output tree:
//!
//! ```text
//! {dir}/
//! ├── config.json            # routing document
//! ├── functions/fn-{i}/      # one bundle per group
//! └── static{base}/          # client assets + prerendered pages
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub tmp: PathBuf,
    pub app_dir: String,
    pub base: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".open-runtimes".into(),
            tmp: ".svelte-kit/open-runtimes-tmp".into(),
            app_dir: "_app".into(),
            base: String::new(),
        }
    }
}

pub const ROUTING_FILE: &str = "config.json";

impl OutputConfig {
    pub fn normalize(&mut self, root: &Path) {
        use crate::utils::path::resolve_path;

        self.dir = resolve_path(&self.dir, root);
        self.tmp = resolve_path(&self.tmp, root);
    }

    /// Framework asset path relative to the site root (`docs/_app`).
    pub fn app_path(&self) -> String {
        [self.base.as_str(), self.app_dir.as_str()]
            .iter()
            .map(|part| part.trim_matches('/'))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn static_dir(&self) -> PathBuf {
        let base = self.base.trim_matches('/');
        let dir = self.dir.join("static");
        if base.is_empty() { dir } else { dir.join(base) }
    }

    pub fn functions_dir(&self) -> PathBuf {
        crate::bundle::functions_dir(&self.dir)
    }

    pub fn routing_file(&self) -> PathBuf {
        self.dir.join(ROUTING_FILE)
    }
}
