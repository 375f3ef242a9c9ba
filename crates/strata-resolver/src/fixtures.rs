//! In-memory [`VcsHost`] backing the resolver test suites.

use std::collections::HashMap;

use strata_util::errors::{StrataError, StrataResult};
use strata_vcs::host::{Release, TagRef, VcsHost};
use strata_vcs::remote::RemoteProject;

#[derive(Default)]
pub struct FakeRepo {
    pub default_branch: String,
    /// Branch name to head sha. The default branch must appear here too.
    pub branches: HashMap<String, String>,
    pub releases: Vec<Release>,
    pub tags: HashMap<String, TagRef>,
    /// Commit sha to `strata.toml` content at that commit.
    pub projects: HashMap<String, String>,
    /// `(commit, path)` to directory names under that path.
    pub subfolders: HashMap<(String, String), Vec<String>>,
    /// `(commit, status context)` to status description.
    pub statuses: HashMap<(String, String), String>,
    /// Commit sha to parent shas.
    pub parents: HashMap<String, Vec<String>>,
}

impl FakeRepo {
    fn new(default_branch: &str, head: &str) -> Self {
        let mut repo = Self {
            default_branch: default_branch.to_string(),
            ..Self::default()
        };
        repo.branches
            .insert(default_branch.to_string(), head.to_string());
        repo
    }

    fn add_release(&mut self, tag: &str, sha: &str, prerelease: bool, message: &str) {
        self.releases.push(Release {
            tag_name: tag.to_string(),
            prerelease,
            body: String::new(),
        });
        self.tags.insert(
            tag.to_string(),
            TagRef {
                sha: sha.to_string(),
                message: message.to_string(),
            },
        );
    }

    fn set_project(&mut self, commit: &str, content: &str) {
        self.projects.insert(commit.to_string(), content.to_string());
    }

    fn add_subfolders(&mut self, commit: &str, path: &str, names: &[&str]) {
        self.subfolders.insert(
            (commit.to_string(), path.to_string()),
            names.iter().map(|n| n.to_string()).collect(),
        );
    }
}

#[derive(Default)]
pub struct FakeHost {
    repos: HashMap<String, FakeRepo>,
}

impl FakeHost {
    pub const ROOT_REPO: &'static str = "https://github.com/Org/Root";
    pub const DEP_REPO: &'static str = "https://github.com/Org/Dep";
    pub const TWOGP_REPO: &'static str = "https://github.com/Org/TwoGP";
    pub const CYCLE_REPO: &'static str = "https://github.com/Org/Cycle";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repo(&mut self, url: &str) -> &mut FakeRepo {
        self.repos
            .entry(url.to_string())
            .or_insert_with(|| FakeRepo::new("main", "head-sha"))
    }

    pub fn repo_mut(&mut self, url: &str) -> &mut FakeRepo {
        self.add_repo(url)
    }

    fn repo(&self, url: &str) -> StrataResult<&FakeRepo> {
        self.repos.get(url).ok_or_else(|| {
            StrataError::Vcs {
                message: format!("Repository {url} not found or not authorized"),
            }
            .into()
        })
    }

    /// The scenario most tests share: a root repo with a managed release,
    /// pre/post payloads and one transitive dependency; that dependency's
    /// repo; a non-namespaced 2GP repo publishing version ids through
    /// commit statuses; and a self-referential repo.
    pub fn standard() -> Self {
        let mut host = Self::new();

        let root_project = r#"
[package]
name = "RootRepo"
namespace = "bar"

[[dependencies]]
url = "https://github.com/Org/Dep"
"#;
        let root = host.add_repo(Self::ROOT_REPO);
        root.branches
            .insert("main".to_string(), "root-main-sha".to_string());
        root.add_release("release/2.0", "root-release-2.0-sha", false, "");
        root.add_release("release/1.5", "root-release-1.5-sha", false, "");
        root.add_release("beta/2.1-Beta_1", "root-beta-2.1-sha", true, "");
        for sha in ["root-main-sha", "root-release-2.0-sha", "root-release-1.5-sha", "root-beta-2.1-sha"] {
            root.set_project(sha, root_project);
        }
        for sha in ["root-release-2.0-sha", "root-release-1.5-sha"] {
            root.add_subfolders(sha, "unpackaged/pre", &["first", "second"]);
            root.add_subfolders(sha, "unpackaged/post", &["first"]);
        }

        let dep_project = r#"
[package]
name = "DepRepo"
namespace = "foo"
"#;
        let dep = host.add_repo(Self::DEP_REPO);
        dep.branches
            .insert("main".to_string(), "dep-main-sha".to_string());
        dep.add_release("release/1.0", "dep-release-1.0-sha", false, "");
        dep.set_project("dep-main-sha", dep_project);
        dep.set_project("dep-release-1.0-sha", dep_project);
        dep.add_subfolders("dep-release-1.0-sha", "unpackaged/pre", &["top"]);
        dep.add_subfolders("dep-release-1.0-sha", "unpackaged/post", &["top"]);

        let twogp_project = r#"
[package]
name = "TwoGPRepo"

[git]
prefix_feature = "feature/"
commit_status_context = "Build Feature Test Package"
"#;
        let twogp = host.add_repo(Self::TWOGP_REPO);
        twogp
            .branches
            .insert("main".to_string(), "twogp-main-sha".to_string());
        twogp
            .branches
            .insert("feature/230".to_string(), "twogp-feature-230-sha".to_string());
        twogp.add_release(
            "release/1.0",
            "twogp-release-1.0-sha",
            false,
            "version_id: 04t2gp0000000001\npackage_type: 2GP",
        );
        for sha in ["twogp-main-sha", "twogp-release-1.0-sha", "twogp-feature-230-sha"] {
            twogp.set_project(sha, twogp_project);
        }
        twogp.statuses.insert(
            (
                "twogp-feature-230-sha".to_string(),
                "Build Feature Test Package".to_string(),
            ),
            "version_id: 04tfeat0000000230".to_string(),
        );

        let cycle_project = r#"
[package]
name = "CycleRepo"

[[dependencies]]
url = "https://github.com/Org/Cycle"
"#;
        let cycle = host.add_repo(Self::CYCLE_REPO);
        cycle
            .branches
            .insert("main".to_string(), "cycle-main-sha".to_string());
        cycle.add_release("release/1.0", "cycle-sha", false, "");
        cycle.set_project("cycle-sha", cycle_project);
        cycle.set_project("cycle-main-sha", cycle_project);

        host
    }
}

impl VcsHost for FakeHost {
    fn remote_project(&self, url: &str, commit: &str) -> StrataResult<RemoteProject> {
        let repo = self.repo(url)?;
        match repo.projects.get(commit) {
            Some(content) => RemoteProject::parse(content),
            None => Ok(RemoteProject::default()),
        }
    }

    fn list_releases(&self, url: &str) -> StrataResult<Vec<Release>> {
        Ok(self.repo(url)?.releases.clone())
    }

    fn tag_ref(&self, url: &str, tag_name: &str) -> StrataResult<Option<TagRef>> {
        Ok(self.repo(url)?.tags.get(tag_name).cloned())
    }

    fn default_branch(&self, url: &str) -> StrataResult<String> {
        Ok(self.repo(url)?.default_branch.clone())
    }

    fn branch_head(&self, url: &str, branch: &str) -> StrataResult<Option<String>> {
        Ok(self.repo(url)?.branches.get(branch).cloned())
    }

    fn commit_parents(&self, url: &str, sha: &str) -> StrataResult<Vec<String>> {
        Ok(self
            .repo(url)?
            .parents
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    fn commit_status(
        &self,
        url: &str,
        sha: &str,
        context: &str,
    ) -> StrataResult<Option<String>> {
        Ok(self
            .repo(url)?
            .statuses
            .get(&(sha.to_string(), context.to_string()))
            .cloned())
    }

    fn list_subfolders(&self, url: &str, commit: &str, path: &str) -> StrataResult<Vec<String>> {
        Ok(self
            .repo(url)?
            .subfolders
            .get(&(commit.to_string(), path.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
