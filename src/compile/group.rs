//! Route grouping and config conflict detection.
//!
//! Routes are visited once, in manifest order:
//!
//! ```text
//! route ──► resolve runtime ──► merge config ──► fingerprint
//!                                                   │
//!              pattern claims ◄── conflict check ◄──┤
//!                                                   ▼
//!                                   fingerprint → group (first seen = next index)
//! ```
//!
//! All state lives in the [`Grouper`] and is dropped with it, so nothing
//! leaks from one build into the next.

use super::CompileError;
use crate::route::{FunctionConfig, Route, Runtime, runtime::RuntimeResolver};
use rustc_hash::FxHashMap;

/// Routes sharing one config fingerprint, deployed as one function.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Sequential id in first-seen order (0-based)
    pub index: usize,
    pub fingerprint: String,
    pub runtime: Runtime,
    /// Representative config (the first member's merged config)
    pub config: FunctionConfig,
    /// Members in manifest order
    pub routes: Vec<Route>,
}

impl Group {
    /// Function name, also the dispatch destination (`/fn-0`).
    pub fn name(&self) -> String {
        unit_name(self.index)
    }
}

pub fn unit_name(index: usize) -> String {
    format!("fn-{index}")
}

/// A distinct route pattern and the group that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub pattern: String,
    pub group: usize,
}

/// Output of grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    /// Ordered by `index`
    pub groups: Vec<Group>,
    /// One entry per distinct pattern, in manifest order
    pub assignments: Vec<Assignment>,
}

impl Grouping {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// First route that claimed a pattern.
struct PatternClaim {
    fingerprint: String,
    route_id: String,
}

pub struct Grouper<'a, F> {
    defaults: &'a FunctionConfig,
    runtimes: RuntimeResolver<'a, F>,
    groups: Vec<Group>,
    by_fingerprint: FxHashMap<String, usize>,
    claims: FxHashMap<String, PatternClaim>,
    assignments: Vec<Assignment>,
}

impl<'a, F> Grouper<'a, F>
where
    F: FnMut() -> Result<Runtime, CompileError>,
{
    /// `probe` infers the platform default runtime; it is only called if a
    /// route has no explicit runtime and `defaults` has none either.
    pub fn new(defaults: &'a FunctionConfig, probe: F) -> Self {
        Self {
            defaults,
            runtimes: RuntimeResolver::new(defaults.runtime.as_deref(), probe),
            groups: Vec::new(),
            by_fingerprint: FxHashMap::default(),
            claims: FxHashMap::default(),
            assignments: Vec::new(),
        }
    }

    /// Add one non-prerendered route.
    pub fn add(&mut self, route: &Route) -> Result<(), CompileError> {
        let runtime = self.runtimes.resolve(route)?;
        let config = FunctionConfig::merged(route.config.as_ref(), self.defaults, runtime);
        let fingerprint = config.fingerprint();

        let first_claim = self.check_pattern(route, &fingerprint)?;

        let index = match self.by_fingerprint.get(&fingerprint) {
            Some(&index) => index,
            None => {
                let index = self.groups.len();
                self.by_fingerprint.insert(fingerprint.clone(), index);
                self.groups.push(Group {
                    index,
                    fingerprint: fingerprint.clone(),
                    runtime,
                    config,
                    routes: Vec::new(),
                });
                index
            }
        };

        if first_claim {
            self.claims.insert(
                route.pattern.clone(),
                PatternClaim {
                    fingerprint,
                    route_id: route.id.clone(),
                },
            );
            self.assignments.push(Assignment {
                pattern: route.pattern.clone(),
                group: index,
            });
        }

        self.groups[index].routes.push(route.clone());
        Ok(())
    }

    /// Two routes with the same pattern string must resolve to the same config,
    /// because a path can only be dispatched to one function.
    ///
    /// Returns `true` if no earlier route claimed the pattern.
    fn check_pattern(&self, route: &Route, fingerprint: &str) -> Result<bool, CompileError> {
        match self.claims.get(&route.pattern) {
            None => Ok(true),
            Some(claim) if claim.fingerprint == fingerprint => Ok(false),
            Some(claim) => Err(CompileError::ConfigConflict {
                route_id: route.id.clone(),
                existing_id: claim.route_id.clone(),
                pattern: route.pattern.clone(),
            }),
        }
    }

    pub fn finish(self) -> Grouping {
        Grouping {
            groups: self.groups,
            assignments: self.assignments,
        }
    }
}

/// Group routes by fingerprint. Prerendered routes are skipped.
pub fn group_routes<'r, F>(
    routes: impl IntoIterator<Item = &'r Route>,
    defaults: &FunctionConfig,
    probe: F,
) -> Result<Grouping, CompileError>
where
    F: FnMut() -> Result<Runtime, CompileError>,
{
    let mut grouper = Grouper::new(defaults, probe);
    for route in routes.into_iter().filter(|route| !route.prerender) {
        grouper.add(route)?;
    }
    Ok(grouper.finish())
}

// ============================================================================
// tests
// ============================================================================
