//! Operation: resolve the project's dependencies into an ordered install
//! list.

use std::path::Path;

use strata_core::spec::parse_dependencies;
use strata_resolver::context::ResolutionContext;
use strata_resolver::engine::{dependency_filter_ignore_specs, get_static_dependencies};
use strata_resolver::registry::ResolverRegistry;
use strata_util::errors::{StrataError, StrataResult};
use strata_util::progress::{spinner, status};

use crate::{build_strategies, load_session, parse_ignore_args, parse_pin_args, ResolveOptions};

/// Resolve and print the ordered list of installable units.
pub fn resolve(project_root: &Path, options: &ResolveOptions) -> StrataResult<()> {
    let session = load_session(project_root)?;
    let dependencies = parse_dependencies(&session.config.dependencies)?;
    let strategies = build_strategies(&session.config, options)?;
    let pins = parse_pin_args(&options.pins)?;
    let filter = dependency_filter_ignore_specs(parse_ignore_args(&options.ignore));
    let registry = ResolverRegistry::standard();

    let mut context = ResolutionContext::new(&session.host, &session.config);
    context.current_branch = session.branch.clone();

    let sp = spinner("Resolving dependencies...");
    let resolved = get_static_dependencies(
        &context,
        &registry,
        dependencies,
        &strategies,
        &pins,
        Some(&filter),
    );
    sp.finish_and_clear();
    let resolved = resolved?;

    if options.json {
        let json = serde_json::to_string_pretty(&resolved).map_err(|e| StrataError::Config {
            message: format!("Failed to serialize resolution result: {e}"),
        })?;
        println!("{json}");
        return Ok(());
    }

    status(
        "Resolved",
        &format!("{} installable units", resolved.len()),
    );
    for (i, dep) in resolved.iter().enumerate() {
        println!("{:>3}. {dep}", i + 1);
    }
    Ok(())
}
