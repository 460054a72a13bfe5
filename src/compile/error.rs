//! Fatal compile errors.
//!
//! Every variant is a configuration defect the caller has to fix; none of
//! them is retried and no routing document is written once one occurs.

use crate::route::Runtime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(
        "Invalid runtime '{runtime}' for route {route_id}. Valid runtimes are {}",
        Runtime::valid_names()
    )]
    InvalidRuntime { route_id: String, runtime: String },

    #[error(
        "The {route_id} and {existing_id} routes must be merged into a single function that matches the {pattern} regex, but they have incompatible configs. You must either rename one of the routes, or make their configs match."
    )]
    ConfigConflict {
        route_id: String,
        existing_id: String,
        pattern: String,
    },

    #[error(
        "Unsupported Node.js version: {}. Please use Node 16 or Node 18 to build your project, or explicitly specify a runtime in your adapter configuration (`adapter.runtime`).",
        detected.as_deref().unwrap_or("not found")
    )]
    UnresolvedDefaultRuntime { detected: Option<String> },

    // NOTE: bundler output is kept verbatim as the source
    #[error("Failed to build function `{unit}`: {source:#}")]
    BuildArtifact {
        unit: String,
        #[source]
        source: anyhow::Error,
    },
}
