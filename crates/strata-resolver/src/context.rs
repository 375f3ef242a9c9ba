//! The narrow seam between the engine and its collaborators.

use strata_core::project::ProjectConfig;
use strata_vcs::host::VcsHost;

/// Everything resolvers and the flatten engine are allowed to see: the VCS
/// host, the local project configuration, and the current git branch.
pub struct ResolutionContext<'a> {
    pub host: &'a dyn VcsHost,
    pub project: &'a ProjectConfig,
    pub current_branch: Option<String>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(host: &'a dyn VcsHost, project: &'a ProjectConfig) -> Self {
        Self {
            host,
            project,
            current_branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.current_branch = Some(branch.into());
        self
    }
}
