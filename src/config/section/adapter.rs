//! `[adapter]` section configuration.
//!
//! Defaults applied under every route's own config.
//!
//! # Example
//!
//! ```toml
//! [adapter]
//! runtime = "nodejs18.x"      # edge | nodejs16.x | nodejs18.x (default: from `node --version`)
//! external = ["sharp"]        # left out of every bundle
//! regions = ["iad1"]
//! memory = 1024
//! max_duration = 10
//!
//! [adapter.isr]
//! expiration = 60
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::route::{FunctionConfig, IsrConfig, Regions, Runtime};
use serde::{Deserialize, Serialize};

/// Adapter-wide function defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub runtime: Option<String>,
    pub external: Option<Vec<String>>,
    pub regions: Option<Regions>,
    pub memory: Option<u32>,
    pub max_duration: Option<u32>,
    pub isr: Option<IsrConfig>,

    /// Removed `edge = true` switch, kept only to report it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<bool>,
}

pub struct AdapterFields {
    pub runtime: FieldPath,
    pub edge: FieldPath,
    pub memory: FieldPath,
}

impl AdapterConfig {
    pub const FIELDS: AdapterFields = AdapterFields {
        runtime: FieldPath::new("adapter.runtime"),
        edge: FieldPath::new("adapter.edge"),
        memory: FieldPath::new("adapter.memory"),
    };

    /// Defaults in the shape merged under route configs.
    pub fn to_function_config(&self) -> FunctionConfig {
        FunctionConfig {
            runtime: self.runtime.clone(),
            external: self.external.clone(),
            regions: self.regions.clone(),
            memory: self.memory,
            max_duration: self.max_duration,
            isr: self.isr.clone(),
        }
    }

    /// # Checks
    /// - `edge` must not be set (replaced by `runtime = "edge"`)
    /// - `runtime`, if set, must be a supported runtime
    /// - `memory`, if set, must be non-zero
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.edge.is_some() {
            diag.error_with_hint(
                Self::FIELDS.edge,
                format!("{} has been removed", Self::FIELDS.edge),
                "use adapter.runtime = \"edge\"",
            );
        }

        if let Some(runtime) = &self.runtime
            && Runtime::parse(runtime).is_none()
        {
            diag.error_with_hint(
                Self::FIELDS.runtime,
                format!("invalid runtime `{runtime}`"),
                format!("valid runtimes are {}", Runtime::valid_names()),
            );
        }

        if self.memory == Some(0) {
            diag.error(Self::FIELDS.memory, format!("{} must be greater than 0", Self::FIELDS.memory));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_adapter_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.adapter, AdapterConfig::default());
        assert_eq!(config.adapter.to_function_config(), FunctionConfig::default());
    }

    #[test]
    fn test_adapter_to_function_config() {
        let config = test_parse_config(
            "[adapter]\nruntime = \"edge\"\nexternal = [\"sharp\"]\nregions = \"iad1\"\nmax_duration = 10\n[adapter.isr]\nexpiration = 60\n",
        );

        let defaults = config.adapter.to_function_config();

        assert_eq!(defaults.runtime.as_deref(), Some("edge"));
        assert_eq!(defaults.external_deps(), ["sharp"]);
        assert_eq!(defaults.regions, Some(Regions::One("iad1".into())));
        assert_eq!(defaults.max_duration, Some(10));
        assert_eq!(defaults.isr.and_then(|isr| isr.expiration), Some(60));
    }

    #[test]
    fn test_legacy_edge_rejected() {
        let config = test_parse_config("[adapter]\nedge = true\n");
        let mut diag = ConfigDiagnostics::new();

        config.adapter.validate(&mut diag);

        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, AdapterConfig::FIELDS.edge);
        assert_eq!(
            diag.errors()[0].hint.as_deref(),
            Some("use adapter.runtime = \"edge\"")
        );
    }

    #[test]
    fn test_invalid_runtime_rejected() {
        let config = test_parse_config("[adapter]\nruntime = \"nodejs20.x\"\n");
        let mut diag = ConfigDiagnostics::new();

        config.adapter.validate(&mut diag);

        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("nodejs20.x"));
    }

    #[test]
    fn test_valid_runtime_accepted() {
        let config = test_parse_config("[adapter]\nruntime = \"nodejs16.x\"\nmemory = 512\n");
        let mut diag = ConfigDiagnostics::new();
        config.adapter.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
