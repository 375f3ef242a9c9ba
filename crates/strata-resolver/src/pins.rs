//! User-supplied exact overrides of resolution.
//!
//! Pins run before any strategy and bypass them entirely: the first pin
//! whose URL matches a dynamic dependency resolves it through the exact-tag
//! path. A pin that contradicts an explicit tag on the dependency is a
//! configuration error.

use serde::{Deserialize, Serialize};
use strata_core::dependency::DynamicDependency;
use strata_util::errors::{StrataError, StrataResult};

use crate::context::ResolutionContext;
use crate::resolvers::resolve_exact_tag;

/// An exact `(url, tag)` override for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyPin {
    pub url: String,
    pub tag: String,
}

impl DependencyPin {
    pub fn can_pin(&self, dep: &DynamicDependency) -> bool {
        dep.url == self.url
    }

    /// Resolve `dep` to this pin's tag.
    pub fn pin(&self, dep: &mut DynamicDependency, context: &ResolutionContext) -> StrataResult<()> {
        if let Some(tag) = &dep.tag {
            if tag != &self.tag {
                return Err(StrataError::ConflictingPin {
                    url: self.url.clone(),
                    tag: tag.clone(),
                }
                .into());
            }
        }

        tracing::info!("Pinning dependency {dep} to tag {}", self.tag);
        let (sha, package_dependency) = resolve_exact_tag(dep, context, &self.tag)?;
        dep.tag = Some(self.tag.clone());
        dep.commit = Some(sha);
        dep.package_dependency = package_dependency;
        Ok(())
    }
}

/// Parse pin entries from structured data.
pub fn parse_pins(values: &[toml::Value]) -> StrataResult<Vec<DependencyPin>> {
    values
        .iter()
        .map(|value| {
            value
                .clone()
                .try_into()
                .map_err(|e: toml::de::Error| {
                    StrataError::DependencyParse {
                        message: format!("Invalid pin: {e}"),
                    }
                    .into()
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::dependency::{SourceKind, StaticDependency};
    use strata_core::project::ProjectConfig;
    use strata_core::version::PackageVersion;

    use crate::fixtures::FakeHost;

    fn pin(url: &str, tag: &str) -> DependencyPin {
        DependencyPin {
            url: url.to_string(),
            tag: tag.to_string(),
        }
    }

    #[test]
    fn can_pin_matches_url() {
        let p = pin(FakeHost::ROOT_REPO, "release/1.5");
        let dep = DynamicDependency::new(SourceKind::GitHub, FakeHost::ROOT_REPO);
        assert!(p.can_pin(&dep));

        let other = DynamicDependency::new(SourceKind::GitHub, FakeHost::DEP_REPO);
        assert!(!p.can_pin(&other));
    }

    #[test]
    fn pin_resolves_through_exact_tag() {
        let host = FakeHost::standard();
        let project = ProjectConfig::default();
        let context = ResolutionContext::new(&host, &project);

        let mut dep = DynamicDependency::new(SourceKind::GitHub, FakeHost::ROOT_REPO);
        pin(FakeHost::ROOT_REPO, "release/1.5")
            .pin(&mut dep, &context)
            .unwrap();

        assert_eq!(dep.commit.as_deref(), Some("root-release-1.5-sha"));
        assert_eq!(dep.tag.as_deref(), Some("release/1.5"));
        match dep.package_dependency {
            Some(StaticDependency::PackageNamespaceVersion(d)) => {
                assert_eq!(d.version, PackageVersion::parse("1.5").unwrap());
            }
            other => panic!("unexpected package dependency: {other:?}"),
        }
    }

    #[test]
    fn pin_with_matching_explicit_tag_is_allowed() {
        let host = FakeHost::standard();
        let project = ProjectConfig::default();
        let context = ResolutionContext::new(&host, &project);

        let mut dep = DynamicDependency::new(SourceKind::GitHub, FakeHost::ROOT_REPO);
        dep.tag = Some("release/1.5".to_string());
        pin(FakeHost::ROOT_REPO, "release/1.5")
            .pin(&mut dep, &context)
            .unwrap();
        assert!(dep.is_resolved());
    }

    #[test]
    fn conflicting_pin_is_an_error() {
        let host = FakeHost::standard();
        let project = ProjectConfig::default();
        let context = ResolutionContext::new(&host, &project);

        let mut dep = DynamicDependency::new(SourceKind::GitHub, FakeHost::ROOT_REPO);
        dep.tag = Some("release/1.0".to_string());

        let err = pin(FakeHost::ROOT_REPO, "release/2.0")
            .pin(&mut dep, &context)
            .unwrap_err();
        assert!(err.to_string().contains("already has a tag specified"));
        assert!(!dep.is_resolved());
    }

    #[test]
    fn parse_pin_specs() {
        let values = vec![toml::from_str(
            r#"url = "https://github.com/Org/Root"
tag = "release/1.5""#,
        )
        .unwrap()];
        let pins = parse_pins(&values).unwrap();
        assert_eq!(pins[0], pin(FakeHost::ROOT_REPO, "release/1.5"));

        let bad = vec![toml::from_str(r#"url = "https://github.com/Org/Root""#).unwrap()];
        assert!(parse_pins(&bad).is_err());
    }
}
