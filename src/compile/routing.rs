//! Routing document assembly.
//!
//! Rules are matched top to bottom, first terminal match wins:
//!
//! ```text
//! 1. prerendered redirects          { src, headers: { Location }, status }
//! 2. prerendered canonical pairs    { src: p, dest: p' } + { src: p', status: 308 }
//! 3. immutable asset cache          { src: /_app/immutable/.+, headers: { cache-control } }
//! 4. filesystem phase marker        { handle: "filesystem" }
//! 5. function dispatch              { src: /.*, dest: /fn-0 }  (single group)
//!                                   { src: <rewritten>, dest: /fn-N } (per pattern)
//! ```
//!
//! The single catch-all and per-pattern dispatch are mutually exclusive.

use super::group::{Grouping, unit_name};
use super::pattern::rewrite_pattern;
use crate::route::Prerendered;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Routing document schema version.
pub const ROUTING_VERSION: u8 = 3;

/// Matches every request path.
pub const CATCH_ALL: &str = "/.*";

pub const IMMUTABLE_CACHE_CONTROL: &str = "public, immutable, max-age=31536000";

/// One routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutingRule {
    /// `status` response with a `Location` header
    Redirect {
        src: String,
        headers: BTreeMap<String, String>,
        status: u16,
    },
    /// Serve `dest` for `src` (canonical path or function dispatch)
    Rewrite { src: String, dest: String },
    /// Attach response headers, keep matching
    Headers {
        src: String,
        headers: BTreeMap<String, String>,
    },
    /// Platform phase marker
    Handle { handle: Phase },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Serve static files before falling through to the rules below
    Filesystem,
}

impl RoutingRule {
    pub fn redirect(src: impl Into<String>, location: impl Into<String>, status: u16) -> Self {
        Self::Redirect {
            src: src.into(),
            headers: BTreeMap::from([("Location".to_string(), location.into())]),
            status,
        }
    }

    pub fn rewrite(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self::Rewrite {
            src: src.into(),
            dest: dest.into(),
        }
    }

    pub fn header(src: impl Into<String>, name: &str, value: impl Into<String>) -> Self {
        Self::Headers {
            src: src.into(),
            headers: BTreeMap::from([(name.to_string(), value.into())]),
        }
    }

    pub const fn filesystem() -> Self {
        Self::Handle {
            handle: Phase::Filesystem,
        }
    }

    pub fn src(&self) -> Option<&str> {
        match self {
            Self::Redirect { src, .. } | Self::Rewrite { src, .. } | Self::Headers { src, .. } => {
                Some(src)
            }
            Self::Handle { .. } => None,
        }
    }

    /// Whether matching this rule ends routing.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Redirect { .. } | Self::Rewrite { .. })
    }
}

/// Served path of a prerendered artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub path: String,
}

/// Platform-consumed routing config (`config.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDocument {
    pub version: u8,
    pub routes: Vec<RoutingRule>,
    /// Artifact file → served path
    #[serde(default)]
    pub overrides: BTreeMap<String, Override>,
}

/// A rule hit while evaluating a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    /// Position in `routes`
    pub index: usize,
    pub rule: &'a RoutingRule,
}

impl RoutingDocument {
    /// Serialize with tab indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Dispatch rules (rewrites to a function).
    #[cfg(test)]
    pub fn dispatch_rules(&self) -> impl Iterator<Item = &RoutingRule> {
        self.routes.iter().filter(|rule| {
            matches!(rule, RoutingRule::Rewrite { dest, .. } if dest.starts_with("/fn-"))
        })
    }

    /// Evaluate `path` top to bottom. Returns every header rule passed on the
    /// way and ends with the first terminal rule, if any matches.
    ///
    /// `src` is matched against the whole path, as the platform does.
    pub fn explain(&self, path: &str) -> Result<Vec<RuleMatch<'_>>, regex::Error> {
        let mut matches = Vec::new();

        for (index, rule) in self.routes.iter().enumerate() {
            let Some(src) = rule.src() else {
                continue;
            };
            if !anchored(src)?.is_match(path) {
                continue;
            }

            matches.push(RuleMatch { index, rule });
            if rule.is_terminal() {
                break;
            }
        }

        Ok(matches)
    }
}

fn anchored(src: &str) -> Result<Regex, regex::Error> {
    let start = if src.starts_with('^') { "" } else { "^" };
    let end = if src.ends_with('$') { "" } else { "$" };
    Regex::new(&format!("{start}{src}{end}"))
}

/// Assemble the routing document.
///
/// `app_path` is the framework's asset directory relative to the site root
/// (e.g. `_app` or `base/_app`).
pub fn assemble(prerendered: &Prerendered, grouping: &Grouping, app_path: &str) -> RoutingDocument {
    let mut routes = Vec::new();
    let mut overrides = BTreeMap::new();

    for redirect in &prerendered.redirects {
        routes.push(RoutingRule::redirect(
            &redirect.path,
            &redirect.location,
            redirect.status,
        ));
    }

    for page in &prerendered.pages {
        let path = page.path.as_str();
        let mut served = path.strip_prefix('/').unwrap_or(path);

        if path != "/" {
            // exactly one of `/x` and `/x/` serves the content
            let counterpart = match path.strip_suffix('/') {
                Some(without_slash) => {
                    served = served.strip_suffix('/').unwrap_or(served);
                    without_slash.to_string()
                }
                None => format!("{path}/"),
            };

            routes.push(RoutingRule::rewrite(path, &counterpart));
            routes.push(RoutingRule::redirect(counterpart, path, 308));
        }

        overrides.insert(
            page.file.clone(),
            Override {
                path: served.to_string(),
            },
        );
    }

    routes.push(RoutingRule::header(
        format!("/{app_path}/immutable/.+"),
        "cache-control",
        IMMUTABLE_CACHE_CONTROL,
    ));
    routes.push(RoutingRule::filesystem());

    routes.extend(dispatch_rules(grouping));

    RoutingDocument {
        version: ROUTING_VERSION,
        routes,
        overrides,
    }
}

/// One catch-all for a single group, otherwise one rule per distinct pattern.
fn dispatch_rules(grouping: &Grouping) -> Vec<RoutingRule> {
    if grouping.len() == 1 {
        return vec![RoutingRule::rewrite(CATCH_ALL, format!("/{}", unit_name(0)))];
    }

    grouping
        .assignments
        .iter()
        .map(|assignment| {
            RoutingRule::rewrite(
                rewrite_pattern(&assignment.pattern),
                format!("/{}", unit_name(assignment.group)),
            )
        })
        .collect()
}

// ============================================================================
// tests
// ============================================================================
