//! Project configuration: the parsed representation of a `strata.toml` file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use strata_util::errors::{StrataError, StrataResult};

/// File name of the project configuration, both locally and in remote
/// repositories.
pub const PROJECT_FILE: &str = "strata.toml";

/// The parsed representation of a `strata.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub package: PackageMetadata,

    /// Raw dependency specs, classified by `spec::parse_dependencies`.
    #[serde(default)]
    pub dependencies: Vec<toml::Value>,

    #[serde(default)]
    pub git: GitConventions,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub source_format: SourceFormat,
}

/// The layout of a project's metadata payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Metadata,
    #[default]
    Source,
}

/// Package identity from the `[package]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Branch and tag naming conventions from the `[git]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConventions {
    #[serde(default = "default_prefix_feature")]
    pub prefix_feature: String,
    #[serde(default = "default_prefix_release")]
    pub prefix_release: String,
    #[serde(default = "default_prefix_beta")]
    pub prefix_beta: String,
    /// Commit-status context that carries package version ids built from
    /// feature branches.
    #[serde(default)]
    pub commit_status_context: Option<String>,
}

fn default_prefix_feature() -> String {
    "feature/".to_string()
}

fn default_prefix_release() -> String {
    "release/".to_string()
}

fn default_prefix_beta() -> String {
    "beta/".to_string()
}

impl Default for GitConventions {
    fn default() -> Self {
        Self {
            prefix_feature: default_prefix_feature(),
            prefix_release: default_prefix_release(),
            prefix_beta: default_prefix_beta(),
            commit_status_context: None,
        }
    }
}

/// Resolution strategy stacks from the `[resolution]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Stack used when the caller does not name one.
    #[serde(default)]
    pub default_stack: Option<String>,
    /// Named, ordered lists of strategy names. Entries here shadow the
    /// built-in stacks of the same name.
    #[serde(default)]
    pub stacks: BTreeMap<String, Vec<String>>,
}

impl ProjectConfig {
    /// Load and parse a `strata.toml` file from the given path.
    pub fn from_path(path: &Path) -> StrataResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StrataError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_str(&content)
    }

    /// Parse a `strata.toml` from a string.
    pub fn from_str(content: &str) -> StrataResult<Self> {
        toml::from_str(content).map_err(|e| {
            StrataError::Config {
                message: format!("Failed to parse {PROJECT_FILE}: {e}"),
            }
            .into()
        })
    }

    /// The named strategy stack from configuration, if present.
    pub fn stack_names(&self, name: &str) -> Option<&[String]> {
        self.resolution.stacks.get(name).map(|s| s.as_slice())
    }
}
