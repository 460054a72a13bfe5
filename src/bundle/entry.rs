//! Function entry artifacts.
//!
//! Each group gets two generated files in its temp directory:
//!
//! ```text
//! {tmp}/fn-0/
//! ├── entry.js      # imports the app server + ./manifest.js
//! └── manifest.js   # routes handled by this function
//! ```

use crate::compile::Group;
use serde::Serialize;
use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Import specifiers of the generated entry.
pub struct EntryVars {
    /// App server module, relative to the entry file
    pub server: String,
    /// Manifest module, relative to the entry file
    pub manifest: String,
}

impl TemplateVars for EntryVars {
    fn apply(&self, content: &str) -> String {
        content
            .replace("'SERVER'", &format!("'{}'", self.server))
            .replace("'MANIFEST'", &format!("'{}'", self.manifest))
    }
}

pub const ENTRY: Template<EntryVars> = Template::new(include_str!("entry.js"));

pub const ENTRY_FILE: &str = "entry.js";
pub const MANIFEST_FILE: &str = "manifest.js";

#[derive(Serialize)]
struct ManifestRoute<'a> {
    id: &'a str,
    pattern: &'a str,
}

#[derive(Serialize)]
struct FunctionManifest<'a> {
    name: String,
    runtime: &'static str,
    routes: Vec<ManifestRoute<'a>>,
}

/// Render the entry module for a function.
pub fn render_entry(server: &str) -> String {
    ENTRY.render(&EntryVars {
        server: server.to_string(),
        manifest: format!("./{MANIFEST_FILE}"),
    })
}

/// Render `manifest.js` listing the routes a group handles.
pub fn render_manifest(group: &Group) -> serde_json::Result<String> {
    let manifest = FunctionManifest {
        name: group.name(),
        runtime: group.runtime.as_str(),
        routes: group
            .routes
            .iter()
            .map(|route| ManifestRoute {
                id: &route.id,
                pattern: &route.pattern,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&manifest)?;
    Ok(format!("export const manifest = {json};\n"))
}

// ============================================================================
// tests
// ============================================================================
