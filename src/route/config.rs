//! Per-route deployment config and its fingerprint.
//!
//! Two configs are equivalent iff every field matches after missing values
//! are normalized to an empty placeholder. The fingerprint is the string
//! form of that equivalence:
//!
//! ```text
//! runtime / external / regions / memory / maxDuration / isr.expiration / isr.group / isr.bypassToken / isr.allowQuery
//! edge    / sharp    /         / 1024   /             /                /           /                 /
//! ```

use super::Runtime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between fingerprint fields. Never appears in field values.
pub const FINGERPRINT_SEPARATOR: &str = "/";

/// Deployment config for a route (or the adapter-wide defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunctionConfig {
    /// Target runtime, validated against [`Runtime`] during grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Module names left out of the bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Regions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "max_duration")]
    pub max_duration: Option<u32>,

    /// Incremental static regeneration. Replaced as a whole when merging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isr: Option<IsrConfig>,
}

/// Incremental static regeneration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IsrConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "bypass_token")]
    pub bypass_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "allow_query")]
    pub allow_query: Option<Vec<String>>,
}

/// Deployment regions: a single region id or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Regions {
    One(String),
    Many(Vec<String>),
}

impl fmt::Display for Regions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(region) => f.write_str(region),
            Self::Many(regions) => f.write_str(&regions.join(",")),
        }
    }
}

impl FunctionConfig {
    /// Effective config of a route: route values win over adapter defaults,
    /// `runtime` is the already resolved runtime.
    pub fn merged(route: Option<&Self>, defaults: &Self, runtime: Runtime) -> Self {
        let route = route.cloned().unwrap_or_default();

        Self {
            runtime: Some(runtime.as_str().to_string()),
            external: route.external.or_else(|| defaults.external.clone()),
            regions: route.regions.or_else(|| defaults.regions.clone()),
            memory: route.memory.or(defaults.memory),
            max_duration: route.max_duration.or(defaults.max_duration),
            isr: route.isr.or_else(|| defaults.isr.clone()),
        }
    }

    /// Deterministic identity of this config.
    ///
    /// Fields are emitted in a fixed order with `""` for absent values.
    /// `external` is sorted first, so dependency order never splits a group.
    pub fn fingerprint(&self) -> String {
        let isr = self.isr.as_ref();

        let external = self.external.as_ref().map(|deps| {
            let mut sorted = deps.clone();
            sorted.sort_unstable();
            sorted.join(",")
        });

        [
            self.runtime.clone(),
            external,
            self.regions.as_ref().map(Regions::to_string),
            self.memory.map(|m| m.to_string()),
            self.max_duration.map(|d| d.to_string()),
            isr.and_then(|i| i.expiration).map(|e| e.to_string()),
            isr.and_then(|i| i.group).map(|g| g.to_string()),
            isr.and_then(|i| i.bypass_token.clone()),
            isr.and_then(|i| i.allow_query.as_ref()).map(|q| q.join(",")),
        ]
        .map(Option::unwrap_or_default)
        .join(FINGERPRINT_SEPARATOR)
    }

    /// External dependencies to exclude from bundling, in declared order.
    pub fn external_deps(&self) -> &[String] {
        self.external.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// tests
// ============================================================================
