//! Parsing of raw dependency specs into the dependency model.
//!
//! Specs are plain structured data (TOML tables in `strata.toml` and in
//! remote project files). A spec is classified by which keys it carries:
//! `namespace` + `version` is a first-generation package, `version_id` a
//! second-generation one, `zip_url` an archive payload, `url` + `ref` a
//! pinned unmanaged payload, and a bare `url` a dynamic repository
//! reference.

use serde::Deserialize;
use strata_util::errors::{StrataError, StrataResult};

use crate::dependency::{
    Dependency, DynamicDependency, PackageNamespaceVersionDependency, PackageVersionIdDependency,
    SourceKind, StaticDependency, UnmanagedVcsRefDependency, UnmanagedZipUrlDependency,
};
use crate::version::PackageVersion;

/// All keys a dependency spec may carry, before classification.
#[derive(Debug, Default, Deserialize)]
struct RawDependencySpec {
    namespace: Option<String>,
    version: Option<String>,
    version_id: Option<String>,
    version_number: Option<String>,
    package_name: Option<String>,

    url: Option<String>,
    tag: Option<String>,
    #[serde(rename = "ref")]
    commit: Option<String>,
    zip_url: Option<String>,

    subfolder: Option<String>,
    unmanaged: Option<bool>,
    #[serde(default)]
    skip: Vec<String>,
    namespace_inject: Option<String>,
    namespace_strip: Option<String>,
}

/// Parse one raw spec into a dependency.
pub fn parse_dependency(value: &toml::Value) -> StrataResult<Dependency> {
    let raw: RawDependencySpec =
        value
            .clone()
            .try_into()
            .map_err(|e| StrataError::DependencyParse {
                message: e.to_string(),
            })?;
    classify(raw)
}

/// Parse a list of raw specs, failing on the first entry that matches no
/// known dependency shape.
pub fn parse_dependencies(values: &[toml::Value]) -> StrataResult<Vec<Dependency>> {
    values.iter().map(parse_dependency).collect()
}

fn classify(raw: RawDependencySpec) -> StrataResult<Dependency> {
    if let (Some(namespace), Some(version)) = (&raw.namespace, &raw.version) {
        let version = PackageVersion::parse(version)?;
        return Ok(StaticDependency::PackageNamespaceVersion(
            PackageNamespaceVersionDependency {
                namespace: namespace.clone(),
                version,
                version_id: raw.version_id,
                package_name: raw.package_name,
            },
        )
        .into());
    }

    if let Some(version_id) = raw.version_id {
        return Ok(
            StaticDependency::PackageVersionId(PackageVersionIdDependency {
                version_id,
                version_number: raw.version_number,
                package_name: raw.package_name,
            })
            .into(),
        );
    }

    if let Some(zip_url) = raw.zip_url {
        if raw.url.is_some() {
            return Err(parse_error("Must not specify both `zip_url` and `url`").into());
        }
        return Ok(
            StaticDependency::UnmanagedZipUrl(UnmanagedZipUrlDependency {
                zip_url,
                subfolder: raw.subfolder,
                unmanaged: raw.unmanaged.unwrap_or(raw.namespace_inject.is_none()),
                namespace_inject: raw.namespace_inject,
                namespace_strip: raw.namespace_strip,
            })
            .into(),
        );
    }

    let Some(url) = raw.url else {
        return Err(parse_error(
            "Must specify `namespace` and `version`, `version_id`, `zip_url`, or `url`",
        )
        .into());
    };

    if let Some(commit) = raw.commit {
        if raw.tag.is_some() {
            return Err(parse_error("Must not specify both `tag` and `ref`").into());
        }
        return Ok(
            StaticDependency::UnmanagedVcsRef(UnmanagedVcsRefDependency {
                url,
                commit,
                subfolder: raw.subfolder,
                unmanaged: raw.unmanaged.unwrap_or(raw.namespace_inject.is_none()),
                namespace_inject: raw.namespace_inject,
                namespace_strip: raw.namespace_strip,
            })
            .into(),
        );
    }

    let unmanaged = raw.unmanaged.unwrap_or(false);
    if !unmanaged && (raw.namespace_inject.is_some() || raw.namespace_strip.is_some()) {
        return Err(parse_error(
            "Namespace injection options require `unmanaged = true` on a repository reference",
        )
        .into());
    }

    Ok(Dependency::Dynamic(DynamicDependency {
        source: SourceKind::GitHub,
        url,
        tag: raw.tag,
        commit: None,
        subfolder: raw.subfolder,
        package_dependency: None,
        unmanaged,
        skip: raw.skip,
        namespace_inject: raw.namespace_inject,
        namespace_strip: raw.namespace_strip,
    }))
}

fn parse_error(message: &str) -> StrataError {
    StrataError::DependencyParse {
        message: message.to_string(),
    }
}
