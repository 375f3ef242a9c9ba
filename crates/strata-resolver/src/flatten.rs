//! Expansion of one resolved dependency into its ordered installable units.
//!
//! The output order is load order and must survive the engine's dedup:
//! transitive dependencies first, then `unpackaged/pre` payloads, the
//! primary package or metadata payload, and finally `unpackaged/post`
//! payloads.

use strata_core::dependency::{Dependency, DynamicDependency, UnmanagedVcsRefDependency};
use strata_core::spec::parse_dependencies;
use strata_util::errors::{StrataError, StrataResult};

use crate::context::ResolutionContext;

/// Conventional directory of payloads loaded before the primary package.
pub const UNPACKAGED_PRE: &str = "unpackaged/pre";

/// Conventional directory of payloads loaded after the primary package.
pub const UNPACKAGED_POST: &str = "unpackaged/post";

/// Expand a resolved dynamic dependency into the dependencies it implies.
pub fn flatten(dep: &DynamicDependency, context: &ResolutionContext) -> StrataResult<Vec<Dependency>> {
    let Some(commit) = dep.commit.clone() else {
        return Err(StrataError::NotResolved {
            dependency: dep.name(),
        }
        .into());
    };

    // A subfolder-only reference is a single unmanaged payload; there is no
    // package and no pre/post expansion.
    if let Some(subfolder) = &dep.subfolder {
        return Ok(vec![Dependency::from(UnmanagedVcsRefDependency {
            url: dep.url.clone(),
            commit,
            subfolder: Some(subfolder.clone()),
            unmanaged: true,
            namespace_inject: None,
            namespace_strip: None,
        })]);
    }

    tracing::info!("Collecting dependencies from {}", dep.url);
    let remote = context.host.remote_project(&dep.url, &commit)?;

    // The remote's own declared dependencies may still be dynamic; the
    // engine resolves and flattens them in later iterations.
    let mut deps =
        parse_dependencies(&remote.dependencies).map_err(|e| StrataError::TransitiveParse {
            dependency: dep.name(),
            message: e.to_string(),
        })?;

    let managed = remote.namespace.is_some() && !dep.unmanaged;

    // unpackaged/pre always deploys unmanaged, with no namespace handling.
    deps.extend(flatten_unpackaged(
        dep,
        context,
        &commit,
        UNPACKAGED_PRE,
        false,
        None,
    )?);

    if let Some(package_dep) = &dep.package_dependency {
        deps.push(Dependency::Static(package_dep.clone()));
    } else if managed {
        return Err(StrataError::NoPackageFound {
            dependency: dep.name(),
        }
        .into());
    } else {
        deps.push(
            UnmanagedVcsRefDependency {
                url: dep.url.clone(),
                commit: commit.clone(),
                subfolder: None,
                unmanaged: dep.unmanaged,
                namespace_inject: dep.namespace_inject.clone(),
                namespace_strip: dep.namespace_strip.clone(),
            }
            .into(),
        );
    }

    deps.extend(flatten_unpackaged(
        dep,
        context,
        &commit,
        UNPACKAGED_POST,
        managed,
        remote.namespace.as_deref(),
    )?);

    Ok(deps)
}

/// Emit one unmanaged payload per subfolder under `path`, sorted, skipping
/// entries in the dependency's skip list. The remote namespace is injected
/// when the package installs managed and stripped when it does not.
fn flatten_unpackaged(
    dep: &DynamicDependency,
    context: &ResolutionContext,
    commit: &str,
    path: &str,
    managed: bool,
    namespace: Option<&str>,
) -> StrataResult<Vec<Dependency>> {
    let mut names = context.host.list_subfolders(&dep.url, commit, path)?;
    names.sort();

    let mut payloads = Vec::new();
    for name in names {
        let subfolder = format!("{path}/{name}");
        if dep.skip.iter().any(|s| s == &subfolder) {
            continue;
        }
        payloads.push(
            UnmanagedVcsRefDependency {
                url: dep.url.clone(),
                commit: commit.to_string(),
                subfolder: Some(subfolder),
                unmanaged: !managed,
                namespace_inject: namespace.filter(|_| managed).map(|n| n.to_string()),
                namespace_strip: namespace.filter(|_| !managed).map(|n| n.to_string()),
            }
            .into(),
        );
    }
    Ok(payloads)
}
