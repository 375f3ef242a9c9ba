//! Operation: show how each declared dependency expands into installable
//! units.

use std::path::Path;

use strata_core::spec::parse_dependencies;
use strata_resolver::context::ResolutionContext;
use strata_resolver::engine::{dependency_filter_ignore_specs, get_static_dependencies_traced};
use strata_resolver::graph::ExpansionGraph;
use strata_resolver::registry::ResolverRegistry;
use strata_util::errors::StrataResult;
use strata_util::progress::{spinner, status};

use crate::{build_strategies, load_session, parse_ignore_args, parse_pin_args, ResolveOptions};

/// Resolve the project's dependencies and print the expansion tree.
pub fn tree(project_root: &Path, options: &ResolveOptions) -> StrataResult<()> {
    let session = load_session(project_root)?;
    let dependencies = parse_dependencies(&session.config.dependencies)?;
    let strategies = build_strategies(&session.config, options)?;
    let pins = parse_pin_args(&options.pins)?;
    let filter = dependency_filter_ignore_specs(parse_ignore_args(&options.ignore));
    let registry = ResolverRegistry::standard();

    let mut context = ResolutionContext::new(&session.host, &session.config);
    context.current_branch = session.branch.clone();

    let mut graph = ExpansionGraph::new();
    let sp = spinner("Resolving dependencies...");
    let resolved = get_static_dependencies_traced(
        &context,
        &registry,
        dependencies,
        &strategies,
        &pins,
        Some(&filter),
        &mut graph,
    );
    sp.finish_and_clear();
    let resolved = resolved?;

    print!("{}", graph.print_tree());
    status(
        "Resolved",
        &format!("{} installable units", resolved.len()),
    );
    Ok(())
}
