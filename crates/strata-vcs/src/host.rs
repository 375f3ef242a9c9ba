//! The host abstraction the resolution engine depends on.

use strata_util::errors::StrataResult;

use crate::remote::RemoteProject;

/// A published release of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    pub prerelease: bool,
    pub body: String,
}

/// A dereferenced tag: the commit it points at and the tag annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub sha: String,
    pub message: String,
}

/// Read access to a VCS hosting service.
///
/// All calls are blocking. Transport failures surface as
/// `StrataError::Vcs`; the not-found shapes each method documents are not
/// errors.
pub trait VcsHost {
    /// The repository's own project file parsed at a commit. A repository
    /// without one yields [`RemoteProject::default`].
    fn remote_project(&self, url: &str, commit: &str) -> StrataResult<RemoteProject>;

    /// Published releases, newest first, drafts excluded.
    fn list_releases(&self, url: &str) -> StrataResult<Vec<Release>>;

    /// Dereference a tag to its commit and annotation. `None` if the tag
    /// does not exist.
    fn tag_ref(&self, url: &str, tag_name: &str) -> StrataResult<Option<TagRef>>;

    /// The name of the repository's default branch.
    fn default_branch(&self, url: &str) -> StrataResult<String>;

    /// The head commit of a branch. `None` if the branch does not exist.
    fn branch_head(&self, url: &str, branch: &str) -> StrataResult<Option<String>>;

    /// Parent commit shas of a commit, first parent first.
    fn commit_parents(&self, url: &str, sha: &str) -> StrataResult<Vec<String>>;

    /// The description of the latest commit status for `context`, if one
    /// has been posted.
    fn commit_status(&self, url: &str, sha: &str, context: &str)
        -> StrataResult<Option<String>>;

    /// Names of the directories directly under `path` at a commit. A
    /// missing directory yields an empty list.
    fn list_subfolders(&self, url: &str, commit: &str, path: &str) -> StrataResult<Vec<String>>;
}
