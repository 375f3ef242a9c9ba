//! The dependency model.
//!
//! Dependencies can be _resolved_ (tied to an immutable commit/version) or
//! not, and _flattened_ (expanded into the list of installable units they
//! imply) or not. Dynamic dependencies reference a source repository and
//! must be resolved and flattened before anything can be installed; static
//! dependencies are immutable installable units, compared and deduplicated
//! by structural equality.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_util::errors::StrataResult;

use crate::git::repo_name;
use crate::target::{InstallOptions, MetadataDeploy, MetadataSource, TargetEnvironment};
use crate::version::PackageVersion;

/// The kind of source host a dynamic dependency points at.
///
/// Resolvers are registered per source kind, so additional hosts can be
/// added without touching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    GitHub,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => f.write_str("github"),
        }
    }
}

/// A dependency, either still dynamic or fully static.
///
/// The dynamic variant is tried first when deserializing: it is the only
/// shape carrying a `source` field, so the untagged match is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Dynamic(DynamicDependency),
    Static(StaticDependency),
}

impl Dependency {
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Static(_) => true,
            Self::Dynamic(d) => d.is_resolved(),
        }
    }

    pub fn is_flattened(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    pub fn name(&self) -> String {
        match self {
            Self::Static(s) => s.name(),
            Self::Dynamic(d) => d.name(),
        }
    }

    pub fn as_dynamic(&self) -> Option<&DynamicDependency> {
        match self {
            Self::Dynamic(d) => Some(d),
            Self::Static(_) => None,
        }
    }

    pub fn as_dynamic_mut(&mut self) -> Option<&mut DynamicDependency> {
        match self {
            Self::Dynamic(d) => Some(d),
            Self::Static(_) => None,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<StaticDependency> for Dependency {
    fn from(dep: StaticDependency) -> Self {
        Self::Static(dep)
    }
}

impl From<DynamicDependency> for Dependency {
    fn from(dep: DynamicDependency) -> Self {
        Self::Dynamic(dep)
    }
}

impl From<PackageNamespaceVersionDependency> for Dependency {
    fn from(dep: PackageNamespaceVersionDependency) -> Self {
        Self::Static(StaticDependency::PackageNamespaceVersion(dep))
    }
}

impl From<PackageVersionIdDependency> for Dependency {
    fn from(dep: PackageVersionIdDependency) -> Self {
        Self::Static(StaticDependency::PackageVersionId(dep))
    }
}

impl From<UnmanagedVcsRefDependency> for Dependency {
    fn from(dep: UnmanagedVcsRefDependency) -> Self {
        Self::Static(StaticDependency::UnmanagedVcsRef(dep))
    }
}

impl From<UnmanagedZipUrlDependency> for Dependency {
    fn from(dep: UnmanagedZipUrlDependency) -> Self {
        Self::Static(StaticDependency::UnmanagedZipUrl(dep))
    }
}

/// A reference to a source repository that is not yet concrete.
///
/// Resolution assigns `commit` (and possibly `package_dependency`);
/// flattening then expands the reference into its installable units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DynamicDependency {
    pub source: SourceKind,
    pub url: String,
    #[serde(default)]
    pub tag: Option<String>,
    /// The resolved commit. Only ever set by resolution.
    #[serde(default)]
    pub commit: Option<String>,
    /// Reference a single subfolder of the repository instead of the whole
    /// project. Such references always flatten to one unmanaged payload.
    #[serde(default)]
    pub subfolder: Option<String>,
    /// The package release discovered during resolution, if any.
    #[serde(default)]
    pub package_dependency: Option<StaticDependency>,
    /// Deploy the repository's own metadata rather than installing its
    /// managed package.
    #[serde(default)]
    pub unmanaged: bool,
    /// Subfolder paths excluded from pre/post expansion.
    #[serde(default)]
    pub skip: Vec<String>,
    #[serde(default)]
    pub namespace_inject: Option<String>,
    #[serde(default)]
    pub namespace_strip: Option<String>,
}

impl DynamicDependency {
    pub fn new(source: SourceKind, url: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
            tag: None,
            commit: None,
            subfolder: None,
            package_dependency: None,
            unmanaged: false,
            skip: Vec::new(),
            namespace_inject: None,
            namespace_strip: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.commit.is_some()
    }

    pub fn name(&self) -> String {
        match &self.subfolder {
            Some(subfolder) => format!("Dependency: {}/{subfolder}", self.url),
            None => format!("Dependency: {}", self.url),
        }
    }
}

impl fmt::Display for DynamicDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A fully resolved, installable unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaticDependency {
    PackageNamespaceVersion(PackageNamespaceVersionDependency),
    PackageVersionId(PackageVersionIdDependency),
    UnmanagedVcsRef(UnmanagedVcsRefDependency),
    UnmanagedZipUrl(UnmanagedZipUrlDependency),
}

impl StaticDependency {
    pub fn name(&self) -> String {
        match self {
            Self::PackageNamespaceVersion(d) => d.name(),
            Self::PackageVersionId(d) => d.name(),
            Self::UnmanagedVcsRef(d) => d.name(),
            Self::UnmanagedZipUrl(d) => d.name(),
        }
    }

    /// Install this unit into a target environment.
    ///
    /// Installing an already-equal-or-newer package version is a no-op.
    pub fn install(
        &self,
        env: &mut dyn TargetEnvironment,
        options: &InstallOptions,
    ) -> StrataResult<()> {
        match self {
            Self::PackageNamespaceVersion(d) => d.install(env, options),
            Self::PackageVersionId(d) => d.install(env, options),
            Self::UnmanagedVcsRef(d) => d.install(env, options),
            Self::UnmanagedZipUrl(d) => d.install(env, options),
        }
    }
}

impl fmt::Display for StaticDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A first-generation package identified by namespace and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageNamespaceVersionDependency {
    pub namespace: String,
    pub version: PackageVersion,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
}

impl PackageNamespaceVersionDependency {
    pub fn package(&self) -> &str {
        self.package_name.as_deref().unwrap_or(&self.namespace)
    }

    pub fn name(&self) -> String {
        format!("Install {} {}", self.package(), self.version)
    }

    fn install(
        &self,
        env: &mut dyn TargetEnvironment,
        options: &InstallOptions,
    ) -> StrataResult<()> {
        if let Some(installed) = env.installed_version(&self.namespace) {
            if installed >= self.version {
                tracing::info!(
                    "{} {} or newer is already installed; skipping",
                    self.package(),
                    self.version
                );
                return Ok(());
            }
        }
        tracing::info!("Installing {} version {}", self.package(), self.version);
        env.install_namespace_package(&self.namespace, &self.version, options)
    }
}

impl fmt::Display for PackageNamespaceVersionDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A second-generation package identified by an opaque version id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageVersionIdDependency {
    pub version_id: String,
    #[serde(default)]
    pub version_number: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
}

impl PackageVersionIdDependency {
    pub fn package(&self) -> &str {
        self.package_name.as_deref().unwrap_or("Unknown Package")
    }

    pub fn name(&self) -> String {
        format!(
            "Install {} {}",
            self.package(),
            self.version_number.as_deref().unwrap_or(&self.version_id)
        )
    }

    fn install(
        &self,
        env: &mut dyn TargetEnvironment,
        options: &InstallOptions,
    ) -> StrataResult<()> {
        if env.has_package_version(&self.version_id) {
            tracing::info!(
                "{} ({}) is already installed; skipping",
                self.package(),
                self.version_id
            );
            return Ok(());
        }
        tracing::info!("Installing {}", self.version_id);
        env.install_package_by_id(&self.version_id, options)
    }
}

impl fmt::Display for PackageVersionIdDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Unpackaged metadata at a specific commit of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnmanagedVcsRefDependency {
    pub url: String,
    pub commit: String,
    #[serde(default)]
    pub subfolder: Option<String>,
    pub unmanaged: bool,
    #[serde(default)]
    pub namespace_inject: Option<String>,
    #[serde(default)]
    pub namespace_strip: Option<String>,
}

impl UnmanagedVcsRefDependency {
    pub fn name(&self) -> String {
        match &self.subfolder {
            Some(subfolder) => format!("Deploy {}/{subfolder}", repo_name(&self.url)),
            None => format!("Deploy {}", repo_name(&self.url)),
        }
    }

    fn install(
        &self,
        env: &mut dyn TargetEnvironment,
        options: &InstallOptions,
    ) -> StrataResult<()> {
        tracing::info!("Deploying unmanaged metadata from {}", self.name());
        env.deploy_metadata(
            &MetadataDeploy {
                source: MetadataSource::VcsRef {
                    url: self.url.clone(),
                    commit: self.commit.clone(),
                },
                subfolder: self.subfolder.clone(),
                unmanaged: self.unmanaged,
                namespace_inject: self.namespace_inject.clone(),
                namespace_strip: self.namespace_strip.clone(),
            },
            options,
        )
    }
}

impl fmt::Display for UnmanagedVcsRefDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Unpackaged metadata sourced from an archive URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnmanagedZipUrlDependency {
    pub zip_url: String,
    #[serde(default)]
    pub subfolder: Option<String>,
    pub unmanaged: bool,
    #[serde(default)]
    pub namespace_inject: Option<String>,
    #[serde(default)]
    pub namespace_strip: Option<String>,
}

impl UnmanagedZipUrlDependency {
    pub fn name(&self) -> String {
        match &self.subfolder {
            Some(subfolder) => format!("Deploy {} /{subfolder}", self.zip_url),
            None => format!("Deploy {}", self.zip_url),
        }
    }

    fn install(
        &self,
        env: &mut dyn TargetEnvironment,
        options: &InstallOptions,
    ) -> StrataResult<()> {
        tracing::info!("Deploying unmanaged metadata from {}", self.name());
        env.deploy_metadata(
            &MetadataDeploy {
                source: MetadataSource::ZipUrl {
                    url: self.zip_url.clone(),
                },
                subfolder: self.subfolder.clone(),
                unmanaged: self.unmanaged,
                namespace_inject: self.namespace_inject.clone(),
                namespace_strip: self.namespace_strip.clone(),
            },
            options,
        )
    }
}

impl fmt::Display for UnmanagedZipUrlDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
