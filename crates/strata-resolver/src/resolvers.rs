//! Concrete resolution strategies.
//!
//! Each resolver implements exactly one tactic. Returning `(None, None)`
//! means "nothing to report, try the next strategy"; a
//! `StrataError::Resolution` error means this strategy failed (the engine
//! logs it and moves on); any other error aborts resolution.

use strata_core::dependency::{
    DynamicDependency, PackageNamespaceVersionDependency, PackageVersionIdDependency,
    StaticDependency,
};
use strata_core::git::{
    construct_release_branch_name, get_feature_branch_name, get_release_identifier,
    is_release_branch_or_child,
};
use strata_core::project::GitConventions;
use strata_core::version::{PackageType, PackageVersion};
use strata_util::errors::{StrataError, StrataResult};
use strata_vcs::remote::RemoteProject;

use crate::context::ResolutionContext;

/// How many commits to walk back from a branch head when looking for a
/// package version id in commit statuses.
const COMMIT_STATUS_WALK_DEPTH: usize = 5;

/// The outcome of a resolver: a commit ref and, optionally, the package
/// release discovered along the way.
pub type Resolution = (Option<String>, Option<StaticDependency>);

/// A single resolution tactic, selected per `(strategy, source kind)`.
pub trait Resolver {
    fn name(&self) -> &'static str;

    /// Whether this tactic applies to the dependency in this context at all.
    fn can_resolve(&self, dep: &DynamicDependency, context: &ResolutionContext) -> bool;

    fn resolve(
        &self,
        dep: &DynamicDependency,
        context: &ResolutionContext,
    ) -> StrataResult<Resolution>;
}

fn resolution_error(message: impl Into<String>) -> miette::Report {
    StrataError::Resolution {
        message: message.into(),
    }
    .into()
}

/// Extract `version_id: <id>` from free-form text (a tag annotation or a
/// commit status description).
pub(crate) fn version_id_from_text(text: &str) -> Option<String> {
    let idx = text.find("version_id: ")?;
    let rest = &text[idx + "version_id: ".len()..];
    let id: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
    (!id.is_empty()).then_some(id)
}

/// Extract the package details embedded in a tag annotation:
/// `version_id: <id>` and `package_type: <1GP|2GP>` lines.
pub(crate) fn package_details_from_annotation(
    message: &str,
) -> (Option<String>, Option<PackageType>) {
    let mut version_id = None;
    let mut package_type = None;
    for line in message.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("version_id:") {
            version_id = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("package_type:") {
            package_type = rest.trim().parse().ok();
        }
    }
    (version_id, package_type)
}

/// Parse the human version encoded in a tag name, trying the remote's tag
/// prefixes first and falling back to the last path segment.
pub(crate) fn version_from_tag(tag: &str, git: &GitConventions) -> Option<PackageVersion> {
    if let Ok(version) = PackageVersion::parse_tag(tag, &git.prefix_beta, &git.prefix_release) {
        return Some(version);
    }
    let last = tag.rsplit('/').next()?;
    PackageVersion::parse(last).ok()
}

/// Resolve an exact tag to a commit plus the package release it identifies.
///
/// Shared by the tag resolver, the latest-release resolvers (once a release
/// is chosen), and pin application.
pub(crate) fn resolve_exact_tag(
    dep: &DynamicDependency,
    context: &ResolutionContext,
    tag: &str,
) -> StrataResult<(String, Option<StaticDependency>)> {
    let tag_ref = context
        .host
        .tag_ref(&dep.url, tag)?
        .ok_or_else(|| resolution_error(format!("No release found for tag {tag}")))?;

    let remote = context.host.remote_project(&dep.url, &tag_ref.sha)?;
    let (version_id, package_type) = package_details_from_annotation(&tag_ref.message);
    let namespace = remote.namespace.clone();

    // We install unmanaged if told to, or if the reference identifies
    // neither a namespaced package nor an unlocked package version.
    let install_unmanaged = dep.unmanaged || (namespace.is_none() && version_id.is_none());
    if install_unmanaged {
        return Ok((tag_ref.sha, None));
    }

    let version = version_from_tag(tag, &remote.git);
    let second_gen =
        package_type == Some(PackageType::SecondGen) || (namespace.is_none() && version_id.is_some());

    let package_dep = if second_gen {
        match version_id {
            Some(version_id) => StaticDependency::PackageVersionId(PackageVersionIdDependency {
                version_id,
                version_number: version.map(|v| v.to_string()),
                package_name: remote.package_name,
            }),
            None => {
                return Err(resolution_error(format!(
                    "The tag {tag} in {} does not identify a package version",
                    dep.url
                )))
            }
        }
    } else {
        match (namespace, version) {
            (Some(namespace), Some(version)) => {
                StaticDependency::PackageNamespaceVersion(PackageNamespaceVersionDependency {
                    namespace,
                    version,
                    version_id,
                    package_name: remote.package_name,
                })
            }
            _ => {
                return Err(resolution_error(format!(
                    "The tag {tag} in {} does not identify a managed release",
                    dep.url
                )))
            }
        }
    };

    Ok((tag_ref.sha, Some(package_dep)))
}

/// Resolver that identifies a ref by the dependency's explicit tag.
pub struct TagResolver;

impl Resolver for TagResolver {
    fn name(&self) -> &'static str {
        "GitHub Tag Resolver"
    }

    fn can_resolve(&self, dep: &DynamicDependency, _context: &ResolutionContext) -> bool {
        dep.tag.is_some()
    }

    fn resolve(
        &self,
        dep: &DynamicDependency,
        context: &ResolutionContext,
    ) -> StrataResult<Resolution> {
        let Some(tag) = &dep.tag else {
            return Ok((None, None));
        };
        let (sha, package_dep) = resolve_exact_tag(dep, context, tag)?;
        Ok((Some(sha), package_dep))
    }
}

/// Resolver that identifies a ref by finding the newest release.
pub struct ReleaseTagResolver {
    include_beta: bool,
}

impl ReleaseTagResolver {
    pub fn releases_only() -> Self {
        Self {
            include_beta: false,
        }
    }

    pub fn with_betas() -> Self {
        Self { include_beta: true }
    }
}

impl Resolver for ReleaseTagResolver {
    fn name(&self) -> &'static str {
        if self.include_beta {
            "GitHub Release Resolver (Betas)"
        } else {
            "GitHub Release Resolver"
        }
    }

    fn can_resolve(&self, dep: &DynamicDependency, _context: &ResolutionContext) -> bool {
        dep.tag.is_none()
    }

    fn resolve(
        &self,
        dep: &DynamicDependency,
        context: &ResolutionContext,
    ) -> StrataResult<Resolution> {
        let releases = context.host.list_releases(&dep.url)?;
        let defaults = GitConventions::default();

        let mut best: Option<(PackageVersion, &str)> = None;
        for release in &releases {
            if release.prerelease && !self.include_beta {
                continue;
            }
            let Some(version) = version_from_tag(&release.tag_name, &defaults) else {
                tracing::debug!(
                    "Skipping release {} of {}: tag is not a package version",
                    release.tag_name,
                    dep.url
                );
                continue;
            };
            if best.as_ref().map_or(true, |(b, _)| version > *b) {
                best = Some((version, &release.tag_name));
            }
        }

        let Some((_, tag_name)) = best else {
            return Ok((None, None));
        };
        let (sha, package_dep) = resolve_exact_tag(dep, context, tag_name)?;
        Ok((Some(sha), package_dep))
    }
}

/// Resolver that falls back to the tip of the default branch, with no
/// package dependency.
pub struct UnmanagedHeadResolver;

impl Resolver for UnmanagedHeadResolver {
    fn name(&self) -> &'static str {
        "GitHub Unmanaged Resolver"
    }

    fn can_resolve(&self, _dep: &DynamicDependency, _context: &ResolutionContext) -> bool {
        true
    }

    fn resolve(
        &self,
        dep: &DynamicDependency,
        context: &ResolutionContext,
    ) -> StrataResult<Resolution> {
        let branch = context.host.default_branch(&dep.url)?;
        let sha = context
            .host
            .branch_head(&dep.url, &branch)?
            .ok_or_else(|| resolution_error(format!("Branch {branch} not found on {}", dep.url)))?;
        Ok((Some(sha), None))
    }
}

/// Whether the local checkout is on a numbered release branch or one of its
/// children, which is the only context in which commit-status resolution
/// applies.
fn in_release_branch_context(context: &ResolutionContext) -> bool {
    context
        .current_branch
        .as_deref()
        .is_some_and(|branch| {
            is_release_branch_or_child(branch, &context.project.git.prefix_feature)
        })
}

fn local_release_id(context: &ResolutionContext) -> StrataResult<u32> {
    let branch = context
        .current_branch
        .as_deref()
        .ok_or_else(|| resolution_error("Cannot get current branch"))?;
    get_release_identifier(branch, &context.project.git.prefix_feature)
        .ok_or_else(|| resolution_error("Cannot get current release identifier"))
}

/// The remote's feature prefix and commit-status context, read from its
/// project file at the default branch head. `None` if the remote does not
/// publish commit-status packages.
fn remote_status_conventions(
    dep: &DynamicDependency,
    context: &ResolutionContext,
) -> StrataResult<Option<(RemoteProject, String)>> {
    let branch = context.host.default_branch(&dep.url)?;
    let Some(head) = context.host.branch_head(&dep.url, &branch)? else {
        return Ok(None);
    };
    let remote = context.host.remote_project(&dep.url, &head)?;
    let Some(status_context) = remote.git.commit_status_context.clone() else {
        tracing::info!(
            "Could not find a commit-status context for {}. Unable to resolve package.",
            dep.url
        );
        return Ok(None);
    };
    Ok(Some((remote, status_context)))
}

/// Walk back from a branch head looking for a `version_id:` commit status.
fn locate_status_version_id(
    dep: &DynamicDependency,
    context: &ResolutionContext,
    head: &str,
    status_context: &str,
) -> StrataResult<Option<(String, String)>> {
    let mut commit = head.to_string();
    for _ in 0..COMMIT_STATUS_WALK_DEPTH {
        if let Some(description) = context.host.commit_status(&dep.url, &commit, status_context)? {
            if let Some(version_id) = version_id_from_text(&description) {
                return Ok(Some((version_id, commit)));
            }
        }
        let parents = context.host.commit_parents(&dep.url, &commit)?;
        let Some(parent) = parents.first() else {
            break;
        };
        commit = parent.clone();
    }
    Ok(None)
}

fn package_dep_for_status(
    dep: &DynamicDependency,
    context: &ResolutionContext,
    version_id: String,
    commit: &str,
) -> StrataResult<StaticDependency> {
    let remote = context.host.remote_project(&dep.url, commit)?;
    Ok(StaticDependency::PackageVersionId(
        PackageVersionIdDependency {
            version_id,
            version_number: None,
            package_name: remote.package_name,
        },
    ))
}

/// Resolver that inspects the commit status of the remote branch whose name
/// matches the local feature branch.
pub struct CommitStatusExactBranchResolver;

impl Resolver for CommitStatusExactBranchResolver {
    fn name(&self) -> &'static str {
        "GitHub Exact-Match Commit Status Resolver"
    }

    fn can_resolve(&self, _dep: &DynamicDependency, context: &ResolutionContext) -> bool {
        in_release_branch_context(context)
    }

    fn resolve(
        &self,
        dep: &DynamicDependency,
        context: &ResolutionContext,
    ) -> StrataResult<Resolution> {
        let release_id = local_release_id(context)?;
        let Some((remote, status_context)) = remote_status_conventions(dep, context)? else {
            return Ok((None, None));
        };

        let branch = context.current_branch.as_deref().unwrap_or_default();
        let Some(feature) = get_feature_branch_name(branch, &context.project.git.prefix_feature)
        else {
            return Ok((None, None));
        };
        let candidate = format!("{}{feature}", remote.git.prefix_feature);

        let Some(head) = context.host.branch_head(&dep.url, &candidate)? else {
            tracing::info!("Exact-match branch not found for {}.", dep.url);
            return Ok((None, None));
        };

        if let Some((version_id, commit)) =
            locate_status_version_id(dep, context, &head, &status_context)?
        {
            tracing::info!(
                "Located package version {version_id} for release {release_id} on {} at commit {commit}",
                dep.url
            );
            let package_dep = package_dep_for_status(dep, context, version_id, &commit)?;
            return Ok((Some(commit), Some(package_dep)));
        }

        tracing::warn!(
            "No package version located for release {release_id} on {}.",
            dep.url
        );
        Ok((None, None))
    }
}

/// Resolver that inspects commit statuses on the remote release branches at
/// numeric offsets from the local release id.
pub struct CommitStatusReleaseBranchResolver {
    offsets: std::ops::RangeInclusive<u32>,
}

impl CommitStatusReleaseBranchResolver {
    /// Check the release branch matching the local release id.
    pub fn current() -> Self {
        Self { offsets: 0..=0 }
    }

    /// Check the three release branches preceding the local release id.
    pub fn previous() -> Self {
        Self { offsets: 1..=3 }
    }
}

impl Resolver for CommitStatusReleaseBranchResolver {
    fn name(&self) -> &'static str {
        if *self.offsets.start() == 0 {
            "GitHub Release Branch Commit Status Resolver"
        } else {
            "GitHub Previous Release Branch Commit Status Resolver"
        }
    }

    fn can_resolve(&self, _dep: &DynamicDependency, context: &ResolutionContext) -> bool {
        in_release_branch_context(context)
    }

    fn resolve(
        &self,
        dep: &DynamicDependency,
        context: &ResolutionContext,
    ) -> StrataResult<Resolution> {
        let release_id = local_release_id(context)?;
        let Some((remote, status_context)) = remote_status_conventions(dep, context)? else {
            return Ok((None, None));
        };

        for offset in self.offsets.clone() {
            let Some(candidate_id) = release_id.checked_sub(offset) else {
                break;
            };
            let candidate =
                construct_release_branch_name(&remote.git.prefix_feature, candidate_id);
            let Some(head) = context.host.branch_head(&dep.url, &candidate)? else {
                continue;
            };

            if let Some((version_id, commit)) =
                locate_status_version_id(dep, context, &head, &status_context)?
            {
                tracing::info!(
                    "Located package version {version_id} for release {candidate_id} on {} at commit {commit}",
                    dep.url
                );
                let package_dep = package_dep_for_status(dep, context, version_id, &commit)?;
                return Ok((Some(commit), Some(package_dep)));
            }
        }

        tracing::warn!(
            "No package version located for release {release_id} on {}.",
            dep.url
        );
        Ok((None, None))
    }
}
