//! The target-environment boundary for installation.
//!
//! The resolution engine produces static dependencies; installing them is
//! delegated through [`TargetEnvironment`], whose implementations own the
//! deploy transport and retry behavior.

use strata_util::errors::StrataResult;

use crate::version::PackageVersion;

/// Options applied when installing a package or deploying metadata.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Installation key for password-protected packages.
    pub password: Option<String>,
    pub activate_remote_site_settings: bool,
}

/// Where an unmanaged metadata payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSource {
    VcsRef { url: String, commit: String },
    ZipUrl { url: String },
}

/// A fully described unmanaged metadata deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDeploy {
    pub source: MetadataSource,
    pub subfolder: Option<String>,
    pub unmanaged: bool,
    pub namespace_inject: Option<String>,
    pub namespace_strip: Option<String>,
}

/// An environment that packages can be installed into.
///
/// The query methods back the idempotence contract: installing an
/// already-equal-or-newer version is a no-op.
pub trait TargetEnvironment {
    /// The installed version of a namespaced package, if any.
    fn installed_version(&self, namespace: &str) -> Option<PackageVersion>;

    /// Whether a specific package version id is already installed.
    fn has_package_version(&self, version_id: &str) -> bool;

    fn install_namespace_package(
        &mut self,
        namespace: &str,
        version: &PackageVersion,
        options: &InstallOptions,
    ) -> StrataResult<()>;

    fn install_package_by_id(
        &mut self,
        version_id: &str,
        options: &InstallOptions,
    ) -> StrataResult<()>;

    fn deploy_metadata(
        &mut self,
        deploy: &MetadataDeploy,
        options: &InstallOptions,
    ) -> StrataResult<()>;
}
