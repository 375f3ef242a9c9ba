//! The fixed-point resolution driver.
//!
//! Converts a mixed list of static and dynamic dependencies into a stable,
//! ordered, deduplicated list of installable units by repeatedly resolving
//! every unresolved dynamic dependency and flattening every element, until
//! the list contains only static dependencies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strata_core::dependency::{Dependency, DynamicDependency, StaticDependency};
use strata_util::errors::{StrataError, StrataResult};

use crate::context::ResolutionContext;
use crate::flatten;
use crate::graph::ExpansionGraph;
use crate::pins::DependencyPin;
use crate::registry::{ResolutionStrategy, ResolverRegistry};

/// Upper bound on fixed-point iterations. A safety valve against cyclic or
/// pathological remote dependency graphs, not a termination proof.
pub const MAX_RESOLUTION_ITERATIONS: u32 = 50;

/// Predicate deciding which dependencies are kept. Applied to every
/// candidate at every iteration, so an excluded dependency also suppresses
/// its transitive expansion.
pub type DependencyFilter<'a> = dyn Fn(&Dependency) -> bool + 'a;

/// Resolve a single dynamic dependency in place.
///
/// Pins take priority and bypass strategies entirely. Otherwise strategies
/// are tried in order; a strategy whose resolver raises a resolution error
/// is logged and skipped. Exhausting all strategies is fatal.
pub fn resolve_dependency(
    dep: &mut DynamicDependency,
    context: &ResolutionContext,
    registry: &ResolverRegistry,
    strategies: &[ResolutionStrategy],
    pins: &[DependencyPin],
) -> StrataResult<()> {
    if dep.is_resolved() {
        return Ok(());
    }

    for pin in pins {
        if pin.can_pin(dep) {
            return pin.pin(dep, context);
        }
    }

    for strategy in strategies {
        let Some(resolver) = registry.lookup(*strategy, dep.source) else {
            continue;
        };
        if !resolver.can_resolve(dep, context) {
            continue;
        }

        tracing::debug!("Attempting to resolve {dep} via {}", resolver.name());
        match resolver.resolve(dep, context) {
            Ok((Some(commit), package_dependency)) => {
                tracing::debug!("Resolved {dep} to {commit}");
                dep.commit = Some(commit);
                dep.package_dependency = package_dependency;
                break;
            }
            Ok((None, _)) => {}
            Err(error) => {
                if is_resolution_error(&error) {
                    tracing::info!("Resolution strategy {strategy} failed for dependency {dep}.");
                } else {
                    return Err(error);
                }
            }
        }
    }

    if dep.is_resolved() {
        Ok(())
    } else {
        Err(StrataError::UnresolvedDependency {
            dependency: dep.name(),
        }
        .into())
    }
}

fn is_resolution_error(error: &miette::Report) -> bool {
    matches!(
        error.downcast_ref::<StrataError>(),
        Some(StrataError::Resolution { .. })
    )
}

/// Resolve and flatten a dependency list to fixed point.
///
/// Returns the ordered, deduplicated list of installable units. Order is
/// first-occurrence order across the working list and is load order.
pub fn get_static_dependencies(
    context: &ResolutionContext,
    registry: &ResolverRegistry,
    dependencies: Vec<Dependency>,
    strategies: &[ResolutionStrategy],
    pins: &[DependencyPin],
    filter: Option<&DependencyFilter>,
) -> StrataResult<Vec<StaticDependency>> {
    run(context, registry, dependencies, strategies, pins, filter, None)
}

/// Like [`get_static_dependencies`], additionally recording which
/// dependency produced each unit into an [`ExpansionGraph`].
pub fn get_static_dependencies_traced(
    context: &ResolutionContext,
    registry: &ResolverRegistry,
    dependencies: Vec<Dependency>,
    strategies: &[ResolutionStrategy],
    pins: &[DependencyPin],
    filter: Option<&DependencyFilter>,
    trace: &mut ExpansionGraph,
) -> StrataResult<Vec<StaticDependency>> {
    run(
        context,
        registry,
        dependencies,
        strategies,
        pins,
        filter,
        Some(trace),
    )
}

fn run(
    context: &ResolutionContext,
    registry: &ResolverRegistry,
    dependencies: Vec<Dependency>,
    strategies: &[ResolutionStrategy],
    pins: &[DependencyPin],
    filter: Option<&DependencyFilter>,
    mut trace: Option<&mut ExpansionGraph>,
) -> StrataResult<Vec<StaticDependency>> {
    let allow_all = |_: &Dependency| true;
    let filter: &DependencyFilter = filter.unwrap_or(&allow_all);

    if let Some(trace) = trace.as_deref_mut() {
        for dep in &dependencies {
            trace.add_root(dep);
        }
    }

    let mut deps = dependencies;
    let mut iterations = 0u32;

    while deps.iter().any(|d| !d.is_resolved() || !d.is_flattened()) {
        iterations += 1;
        if iterations > MAX_RESOLUTION_ITERATIONS {
            let pending: Vec<String> = deps
                .iter()
                .filter(|d| !d.is_resolved() || !d.is_flattened())
                .map(|d| d.name())
                .collect();
            return Err(StrataError::ResolutionIterationLimit {
                iterations: MAX_RESOLUTION_ITERATIONS,
                pending: pending.join(", "),
            }
            .into());
        }

        for dep in deps.iter_mut() {
            if let Some(dynamic) = dep.as_dynamic_mut() {
                if !dynamic.is_resolved() {
                    resolve_dependency(dynamic, context, registry, strategies, pins)?;
                }
            }
        }

        let mut next: Vec<Dependency> = Vec::new();
        let mut seen: HashSet<Dependency> = HashSet::new();
        for dep in &deps {
            if !filter(dep) {
                continue;
            }
            let expansion = match dep {
                Dependency::Dynamic(dynamic) => {
                    let expansion = flatten::flatten(dynamic, context)?;
                    if let Some(trace) = trace.as_deref_mut() {
                        trace.record_expansion(dep, &expansion);
                    }
                    expansion
                }
                Dependency::Static(_) => vec![dep.clone()],
            };
            for child in expansion {
                if seen.insert(child.clone()) {
                    next.push(child);
                }
            }
        }
        deps = next;
    }

    // Apply the filter once more so an already-static input list is still
    // filtered even when no iteration ran.
    let mut result = Vec::with_capacity(deps.len());
    for dep in deps {
        if !filter(&dep) {
            continue;
        }
        match dep {
            Dependency::Static(static_dep) => result.push(static_dep),
            Dependency::Dynamic(dynamic) => {
                return Err(StrataError::NotResolved {
                    dependency: dynamic.name(),
                }
                .into())
            }
        }
    }
    Ok(result)
}

/// An entry in an ignore list: suppress a package by namespace, or a
/// repository reference by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreSpec {
    Namespace { namespace: String },
    Url { url: String },
}

/// Build a dependency filter from ignore entries.
pub fn dependency_filter_ignore_specs(specs: Vec<IgnoreSpec>) -> impl Fn(&Dependency) -> bool {
    move |dep: &Dependency| match dep {
        Dependency::Static(StaticDependency::PackageNamespaceVersion(d)) => {
            !specs.iter().any(|spec| {
                matches!(spec, IgnoreSpec::Namespace { namespace } if *namespace == d.namespace)
            })
        }
        Dependency::Dynamic(d) => !specs
            .iter()
            .any(|spec| matches!(spec, IgnoreSpec::Url { url } if *url == d.url)),
        _ => true,
    }
}
