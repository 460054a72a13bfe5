//! `fnsplit routes`: evaluate request paths against a written routing config.
//!
//! ```text
//! $ fnsplit routes /blog/hello /_app/immutable/app.js
//! [routes] /blog/hello
//!   #4  /blog/([^/]+?)/?(?:/__data.json)?$ → /fn-1
//! [routes] /_app/immutable/app.js
//!   #2  /_app/immutable/.+ + cache-control
//!   (no terminal rule, served by filesystem or 404)
//! ```

use crate::{
    cli::RoutesArgs,
    compile::{RoutingDocument, RoutingRule, routing::RuleMatch},
    config::ProjectConfig,
    log,
};
use anyhow::{Context, Result};
use std::fs;

pub fn explain_routes(args: &RoutesArgs, config: &ProjectConfig) -> Result<()> {
    let path = args
        .document
        .clone()
        .unwrap_or_else(|| config.output.routing_file());

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read routing config {}", path.display()))?;
    let document = RoutingDocument::from_json(&content)
        .with_context(|| format!("Invalid routing config {}", path.display()))?;

    for request in &args.paths {
        let matches = document
            .explain(request)
            .with_context(|| format!("Invalid rule pattern while matching {request}"))?;
        log!("routes"; "{}\n{}", request, render_matches(&matches));
    }

    Ok(())
}

fn render_matches(matches: &[RuleMatch<'_>]) -> String {
    let mut lines: Vec<String> = matches
        .iter()
        .map(|m| format!("  #{:<3} {}", m.index, describe(m.rule)))
        .collect();

    if !matches.last().is_some_and(|m| m.rule.is_terminal()) {
        lines.push("  (no terminal rule, served by filesystem or 404)".to_string());
    }
    lines.join("\n")
}

fn describe(rule: &RoutingRule) -> String {
    match rule {
        RoutingRule::Redirect {
            src,
            headers,
            status,
        } => {
            let location = headers.get("Location").map(String::as_str).unwrap_or("?");
            format!("{src} ⇒ {status} {location}")
        }
        RoutingRule::Rewrite { src, dest } => format!("{src} → {dest}"),
        RoutingRule::Headers { src, headers } => {
            let names: Vec<_> = headers.keys().map(String::as_str).collect();
            format!("{src} + {}", names.join(", "))
        }
        RoutingRule::Handle { handle } => format!("handle {handle:?}"),
    }
}
