//! High-level operations wiring CLI commands to the resolution engine.

pub mod ops_resolve;
pub mod ops_tree;

use std::path::Path;

use strata_core::project::{ProjectConfig, PROJECT_FILE};
use strata_resolver::engine::IgnoreSpec;
use strata_resolver::pins::DependencyPin;
use strata_resolver::registry::{get_resolver_stack, ResolutionStrategy, DEFAULT_STACK};
use strata_util::errors::{StrataError, StrataResult};
use strata_vcs::github::{GitHubHost, GITHUB_TOKEN_VAR};

/// Options shared by the resolution-driven operations.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Named resolution stack; falls back to the project default.
    pub stack: Option<String>,
    /// Explicit strategy names, in order. Overrides the stack when present.
    pub strategies: Vec<String>,
    /// `URL=TAG` pin arguments.
    pub pins: Vec<String>,
    /// Ignore entries: a repository URL or a package namespace.
    pub ignore: Vec<String>,
    /// Emit machine-readable JSON instead of the human listing.
    pub json: bool,
}

/// Everything an operation needs to talk to the engine.
pub struct Session {
    pub config: ProjectConfig,
    pub host: GitHubHost,
    pub branch: Option<String>,
}

/// Load the project configuration and build the GitHub host.
pub fn load_session(project_root: &Path) -> StrataResult<Session> {
    let config = ProjectConfig::from_path(&project_root.join(PROJECT_FILE))?;
    let host = GitHubHost::new(std::env::var(GITHUB_TOKEN_VAR).ok())?;
    let branch = strata_util::fs::current_git_branch(project_root);
    Ok(Session {
        config,
        host,
        branch,
    })
}

/// The strategy order for a run: explicit strategies if given, otherwise
/// the named (or default) stack.
pub fn build_strategies(
    config: &ProjectConfig,
    options: &ResolveOptions,
) -> StrataResult<Vec<ResolutionStrategy>> {
    if !options.strategies.is_empty() {
        return options
            .strategies
            .iter()
            .map(|name| name.parse::<ResolutionStrategy>().map_err(Into::into))
            .collect();
    }

    let stack = options
        .stack
        .as_deref()
        .or(config.resolution.default_stack.as_deref())
        .unwrap_or(DEFAULT_STACK);
    get_resolver_stack(config, stack)
}

/// Parse `URL=TAG` pin arguments.
pub fn parse_pin_args(args: &[String]) -> StrataResult<Vec<DependencyPin>> {
    args.iter()
        .map(|arg| {
            let (url, tag) = arg.split_once('=').ok_or_else(|| StrataError::Config {
                message: format!("Invalid pin {arg}: expected URL=TAG"),
            })?;
            Ok(DependencyPin {
                url: url.to_string(),
                tag: tag.to_string(),
            })
        })
        .collect()
}

/// Classify ignore arguments: URLs suppress repository references,
/// anything else is a package namespace.
pub fn parse_ignore_args(args: &[String]) -> Vec<IgnoreSpec> {
    args.iter()
        .map(|arg| {
            if arg.contains("://") {
                IgnoreSpec::Url {
                    url: arg.to_string(),
                }
            } else {
                IgnoreSpec::Namespace {
                    namespace: arg.to_string(),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_args_parse() {
        let pins =
            parse_pin_args(&["https://github.com/Org/Root=release/1.5".to_string()]).unwrap();
        assert_eq!(
            pins,
            [DependencyPin {
                url: "https://github.com/Org/Root".to_string(),
                tag: "release/1.5".to_string(),
            }]
        );
        assert!(parse_pin_args(&["no-tag-here".to_string()]).is_err());
    }

    #[test]
    fn ignore_args_classify_by_shape() {
        let specs = parse_ignore_args(&[
            "npsp".to_string(),
            "https://github.com/Org/Dep".to_string(),
        ]);
        assert_eq!(
            specs,
            [
                IgnoreSpec::Namespace {
                    namespace: "npsp".to_string()
                },
                IgnoreSpec::Url {
                    url: "https://github.com/Org/Dep".to_string()
                },
            ]
        );
    }

    #[test]
    fn explicit_strategies_override_stack() {
        let config = ProjectConfig::default();
        let options = ResolveOptions {
            strategies: vec!["tag".to_string(), "unmanaged".to_string()],
            stack: Some("commit_status".to_string()),
            ..Default::default()
        };
        let strategies = build_strategies(&config, &options).unwrap();
        assert_eq!(
            strategies,
            [ResolutionStrategy::Tag, ResolutionStrategy::Unmanaged]
        );
    }

    #[test]
    fn default_stack_is_latest_release() {
        let config = ProjectConfig::default();
        let strategies = build_strategies(&config, &ResolveOptions::default()).unwrap();
        assert_eq!(
            strategies,
            [
                ResolutionStrategy::Tag,
                ResolutionStrategy::LatestRelease,
                ResolutionStrategy::Unmanaged
            ]
        );
    }
}
