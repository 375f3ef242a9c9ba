//! Remote project metadata: the shape of a repository's own `strata.toml`
//! as seen at a resolved commit.

use strata_core::project::{GitConventions, ProjectConfig, SourceFormat, PROJECT_FILE};
use strata_util::errors::StrataResult;

/// Package metadata and declared dependencies of a remote repository.
#[derive(Debug, Clone, Default)]
pub struct RemoteProject {
    pub namespace: Option<String>,
    pub package_name: Option<String>,
    /// Raw dependency specs declared by the remote project. May themselves
    /// be dynamic; the resolution engine handles them in later iterations.
    pub dependencies: Vec<toml::Value>,
    pub git: GitConventions,
    pub source_format: SourceFormat,
}

impl RemoteProject {
    /// Parse remote project file content.
    pub fn parse(content: &str) -> StrataResult<Self> {
        let config = ProjectConfig::from_str(content).map_err(|e| {
            strata_util::errors::StrataError::Vcs {
                message: format!("Invalid remote {PROJECT_FILE}: {e}"),
            }
        })?;
        Ok(Self::from(config))
    }
}

impl From<ProjectConfig> for RemoteProject {
    fn from(config: ProjectConfig) -> Self {
        Self {
            namespace: config.package.namespace,
            package_name: config.package.name,
            dependencies: config.dependencies,
            git: config.git,
            source_format: config.source_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_remote_project() {
        let remote = RemoteProject::parse(
            r#"
[package]
name = "Dependency Repo"
namespace = "foo"

[[dependencies]]
url = "https://github.com/Org/Deeper"

[git]
prefix_feature = "feat/"
commit_status_context = "Build Feature Test Package"
"#,
        )
        .unwrap();

        assert_eq!(remote.namespace.as_deref(), Some("foo"));
        assert_eq!(remote.package_name.as_deref(), Some("Dependency Repo"));
        assert_eq!(remote.dependencies.len(), 1);
        assert_eq!(remote.git.prefix_feature, "feat/");
        assert_eq!(remote.source_format, SourceFormat::Source);
    }

    #[test]
    fn empty_remote_project_defaults() {
        let remote = RemoteProject::default();
        assert!(remote.namespace.is_none());
        assert!(remote.dependencies.is_empty());
        assert_eq!(remote.git.prefix_feature, "feature/");
    }

    #[test]
    fn bad_remote_content_is_a_vcs_error() {
        let err = RemoteProject::parse("package = [").unwrap_err();
        assert!(err.to_string().contains("VCS error"));
    }

    #[test]
    fn metadata_source_format_parses() {
        let remote = RemoteProject::parse("source_format = \"metadata\"").unwrap();
        assert_eq!(remote.source_format, SourceFormat::Metadata);
    }
}
