//! Supported runtimes and default runtime resolution.
//!
//! Resolution order for a route:
//! 1. `runtime` in the route's own config
//! 2. `adapter.runtime` in `fnsplit.toml`
//! 3. inferred from the local Node.js version (probed lazily, at most once)

use super::Route;
use crate::compile::CompileError;
use crate::utils::exec::Cmd;
use std::fmt;

/// Whitelisted function runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    Edge,
    Node16,
    Node18,
}

impl Runtime {
    pub const ALL: [Self; 3] = [Self::Edge, Self::Node16, Self::Node18];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Node16 => "nodejs16.x",
            Self::Node18 => "nodejs18.x",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|runtime| runtime.as_str() == name)
    }

    /// Comma-separated whitelist for error messages.
    pub fn valid_names() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }

    /// Map `node --version` output (e.g. `v18.17.1`) to a runtime.
    pub fn from_node_version(version: &str) -> Option<Self> {
        let major = version.trim().trim_start_matches('v').split('.').next()?;
        match major {
            "16" => Some(Self::Node16),
            "18" => Some(Self::Node18),
            _ => None,
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the default runtime from the Node.js found on `PATH`.
pub fn infer_default_runtime() -> Result<Runtime, CompileError> {
    let version =
        node_version().map_err(|_| CompileError::UnresolvedDefaultRuntime { detected: None })?;

    crate::debug!("runtime"; "detected node {}", version);

    Runtime::from_node_version(&version).ok_or(CompileError::UnresolvedDefaultRuntime {
        detected: Some(version),
    })
}

fn node_version() -> anyhow::Result<String> {
    let node = which::which("node")?;
    let output = Cmd::new(node).arg("--version").run()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Resolves each route's runtime, probing the platform default only when a
/// route actually falls through to it.
pub struct RuntimeResolver<'a, F> {
    default: Option<&'a str>,
    probe: F,
    inferred: Option<Runtime>,
}

impl<'a, F> RuntimeResolver<'a, F>
where
    F: FnMut() -> Result<Runtime, CompileError>,
{
    pub fn new(default: Option<&'a str>, probe: F) -> Self {
        Self {
            default,
            probe,
            inferred: None,
        }
    }

    pub fn resolve(&mut self, route: &Route) -> Result<Runtime, CompileError> {
        let explicit = route
            .config
            .as_ref()
            .and_then(|config| config.runtime.as_deref())
            .or(self.default);

        let Some(name) = explicit else {
            return self.inferred();
        };

        Runtime::parse(name).ok_or_else(|| CompileError::InvalidRuntime {
            route_id: route.id.clone(),
            runtime: name.to_string(),
        })
    }

    fn inferred(&mut self) -> Result<Runtime, CompileError> {
        if let Some(runtime) = self.inferred {
            return Ok(runtime);
        }
        let runtime = (self.probe)()?;
        self.inferred = Some(runtime);
        Ok(runtime)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::FunctionConfig;

    fn route_with_runtime(id: &str, runtime: &str) -> Route {
        Route::new(id, "^/$").with_config(FunctionConfig {
            runtime: Some(runtime.into()),
            ..Default::default()
        })
    }

    #[test]
    fn test_runtime_names_roundtrip() {
        for runtime in Runtime::ALL {
            assert_eq!(Runtime::parse(runtime.as_str()), Some(runtime));
        }
        assert_eq!(Runtime::parse("nodejs20.x"), None);
        assert_eq!(Runtime::valid_names(), "edge, nodejs16.x, nodejs18.x");
    }

    #[test]
    fn test_from_node_version() {
        assert_eq!(Runtime::from_node_version("v16.20.2"), Some(Runtime::Node16));
        assert_eq!(Runtime::from_node_version("v18.17.1\n"), Some(Runtime::Node18));
        assert_eq!(Runtime::from_node_version("v20.11.0"), None);
        assert_eq!(Runtime::from_node_version(""), None);
    }

    #[test]
    fn test_resolve_precedence() {
        let mut resolver = RuntimeResolver::new(Some("nodejs16.x"), || Ok(Runtime::Node18));

        let explicit = route_with_runtime("/a", "edge");
        assert_eq!(resolver.resolve(&explicit).unwrap(), Runtime::Edge);

        let plain = Route::new("/b", "^/b$");
        assert_eq!(resolver.resolve(&plain).unwrap(), Runtime::Node16);
    }

    #[test]
    fn test_resolve_invalid_runtime() {
        let mut resolver = RuntimeResolver::new(None, || Ok(Runtime::Node18));
        let route = route_with_runtime("/api", "deno");

        match resolver.resolve(&route) {
            Err(CompileError::InvalidRuntime { route_id, runtime }) => {
                assert_eq!(route_id, "/api");
                assert_eq!(runtime, "deno");
            }
            other => panic!("expected InvalidRuntime, got {other:?}"),
        }
    }

    #[test]
    fn test_probe_runs_once_and_only_when_needed() {
        let mut calls = 0;
        {
            let mut resolver = RuntimeResolver::new(None, || {
                calls += 1;
                Ok(Runtime::Node18)
            });

            resolver.resolve(&route_with_runtime("/a", "edge")).unwrap();
            resolver.resolve(&Route::new("/b", "^/b$")).unwrap();
            resolver.resolve(&Route::new("/c", "^/c$")).unwrap();
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_probe_failure_is_fatal() {
        let mut resolver = RuntimeResolver::new(None, || {
            Err(CompileError::UnresolvedDefaultRuntime {
                detected: Some("v20.0.0".into()),
            })
        });

        let err = resolver.resolve(&Route::new("/", "^/$")).unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedDefaultRuntime { .. }));
    }
}
