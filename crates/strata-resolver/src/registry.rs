//! Resolution strategies and the resolver registry.
//!
//! The registry is an explicit value built at startup: a table from
//! `(strategy, source kind)` to resolver factories. Lookup misses are not
//! errors; the engine simply skips strategy/kind pairs nothing is
//! registered for.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::dependency::SourceKind;
use strata_core::project::ProjectConfig;
use strata_util::errors::{StrataError, StrataResult};

use crate::resolvers::{
    CommitStatusExactBranchResolver, CommitStatusReleaseBranchResolver, ReleaseTagResolver,
    Resolver, TagResolver, UnmanagedHeadResolver,
};

/// A named tactic for resolving a dynamic dependency, tried in caller
/// order. Resolution stops at the first strategy that yields a ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    Tag,
    CommitStatusExactBranch,
    CommitStatusReleaseBranch,
    CommitStatusPreviousReleaseBranch,
    LatestBeta,
    LatestRelease,
    Unmanaged,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::CommitStatusExactBranch => "commit_status_exact_branch",
            Self::CommitStatusReleaseBranch => "commit_status_release_branch",
            Self::CommitStatusPreviousReleaseBranch => "commit_status_previous_release_branch",
            Self::LatestBeta => "latest_beta",
            Self::LatestRelease => "latest_release",
            Self::Unmanaged => "unmanaged",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionStrategy {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" => Ok(Self::Tag),
            "commit_status_exact_branch" => Ok(Self::CommitStatusExactBranch),
            "commit_status_release_branch" => Ok(Self::CommitStatusReleaseBranch),
            "commit_status_previous_release_branch" => {
                Ok(Self::CommitStatusPreviousReleaseBranch)
            }
            "latest_beta" => Ok(Self::LatestBeta),
            "latest_release" => Ok(Self::LatestRelease),
            "unmanaged" => Ok(Self::Unmanaged),
            _ => Err(StrataError::Config {
                message: format!("Unknown resolution strategy: {s}"),
            }),
        }
    }
}

type ResolverFactory = fn() -> Box<dyn Resolver>;

/// A table of resolver factories keyed by strategy and source kind.
/// Resolvers are stateless and constructed fresh per lookup.
#[derive(Default)]
pub struct ResolverRegistry {
    entries: HashMap<(ResolutionStrategy, SourceKind), ResolverFactory>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with all built-in resolvers.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let kind = SourceKind::GitHub;

        registry.register(ResolutionStrategy::Tag, kind, || Box::new(TagResolver));
        registry.register(ResolutionStrategy::CommitStatusExactBranch, kind, || {
            Box::new(CommitStatusExactBranchResolver)
        });
        registry.register(ResolutionStrategy::CommitStatusReleaseBranch, kind, || {
            Box::new(CommitStatusReleaseBranchResolver::current())
        });
        registry.register(
            ResolutionStrategy::CommitStatusPreviousReleaseBranch,
            kind,
            || Box::new(CommitStatusReleaseBranchResolver::previous()),
        );
        registry.register(ResolutionStrategy::LatestBeta, kind, || {
            Box::new(ReleaseTagResolver::with_betas())
        });
        registry.register(ResolutionStrategy::LatestRelease, kind, || {
            Box::new(ReleaseTagResolver::releases_only())
        });
        registry.register(ResolutionStrategy::Unmanaged, kind, || {
            Box::new(UnmanagedHeadResolver)
        });

        registry
    }

    pub fn register(
        &mut self,
        strategy: ResolutionStrategy,
        kind: SourceKind,
        factory: ResolverFactory,
    ) {
        self.entries.insert((strategy, kind), factory);
    }

    /// A fresh resolver for the pair, or `None` if nothing is registered.
    pub fn lookup(&self, strategy: ResolutionStrategy, kind: SourceKind) -> Option<Box<dyn Resolver>> {
        self.entries.get(&(strategy, kind)).map(|factory| factory())
    }
}

/// The stack used when neither the caller nor the project names one.
pub const DEFAULT_STACK: &str = "latest_release";

fn builtin_stack(name: &str) -> Option<Vec<ResolutionStrategy>> {
    use ResolutionStrategy::*;
    match name {
        "latest_release" => Some(vec![Tag, LatestRelease, Unmanaged]),
        "include_betas" => Some(vec![Tag, LatestBeta, LatestRelease, Unmanaged]),
        "commit_status" => Some(vec![
            Tag,
            CommitStatusExactBranch,
            CommitStatusReleaseBranch,
            CommitStatusPreviousReleaseBranch,
            LatestBeta,
            LatestRelease,
            Unmanaged,
        ]),
        _ => None,
    }
}

/// Resolve a stack name to an ordered strategy list. Stacks configured in
/// `strata.toml` shadow the built-ins of the same name.
pub fn get_resolver_stack(
    project: &ProjectConfig,
    name: &str,
) -> StrataResult<Vec<ResolutionStrategy>> {
    if let Some(names) = project.stack_names(name) {
        return names
            .iter()
            .map(|n| n.parse::<ResolutionStrategy>().map_err(Into::into))
            .collect();
    }

    builtin_stack(name).ok_or_else(|| {
        StrataError::Config {
            message: format!("Resolver stack {name} was not found"),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [
            ResolutionStrategy::Tag,
            ResolutionStrategy::CommitStatusExactBranch,
            ResolutionStrategy::CommitStatusReleaseBranch,
            ResolutionStrategy::CommitStatusPreviousReleaseBranch,
            ResolutionStrategy::LatestBeta,
            ResolutionStrategy::LatestRelease,
            ResolutionStrategy::Unmanaged,
        ] {
            assert_eq!(strategy.as_str().parse::<ResolutionStrategy>().unwrap(), strategy);
        }
        assert!("latest_banana".parse::<ResolutionStrategy>().is_err());
    }

    #[test]
    fn standard_registry_covers_all_strategies() {
        let registry = ResolverRegistry::standard();
        for strategy in [
            ResolutionStrategy::Tag,
            ResolutionStrategy::CommitStatusExactBranch,
            ResolutionStrategy::CommitStatusReleaseBranch,
            ResolutionStrategy::CommitStatusPreviousReleaseBranch,
            ResolutionStrategy::LatestBeta,
            ResolutionStrategy::LatestRelease,
            ResolutionStrategy::Unmanaged,
        ] {
            assert!(
                registry.lookup(strategy, SourceKind::GitHub).is_some(),
                "no resolver registered for {strategy}"
            );
        }
    }

    #[test]
    fn lookup_miss_returns_none() {
        let registry = ResolverRegistry::new();
        assert!(registry
            .lookup(ResolutionStrategy::Tag, SourceKind::GitHub)
            .is_none());
    }

    #[test]
    fn builtin_stacks_resolve() {
        let project = ProjectConfig::default();
        let stack = get_resolver_stack(&project, "latest_release").unwrap();
        assert_eq!(
            stack,
            [
                ResolutionStrategy::Tag,
                ResolutionStrategy::LatestRelease,
                ResolutionStrategy::Unmanaged
            ]
        );
        assert!(get_resolver_stack(&project, "nope").is_err());
    }

    #[test]
    fn configured_stack_shadows_builtin() {
        let project = ProjectConfig::from_str(
            r#"
[resolution.stacks]
latest_release = ["tag", "unmanaged"]
"#,
        )
        .unwrap();
        let stack = get_resolver_stack(&project, "latest_release").unwrap();
        assert_eq!(
            stack,
            [ResolutionStrategy::Tag, ResolutionStrategy::Unmanaged]
        );
    }

    #[test]
    fn configured_stack_with_bad_name_is_a_config_error() {
        let project = ProjectConfig::from_str(
            r#"
[resolution.stacks]
mine = ["tag", "nonsense"]
"#,
        )
        .unwrap();
        assert!(get_resolver_stack(&project, "mine").is_err());
    }
}
