use strata_core::dependency::{Dependency, SourceKind, StaticDependency};
use strata_core::spec::{parse_dependencies, parse_dependency};
use strata_core::version::PackageVersion;

fn value(s: &str) -> toml::Value {
    toml::from_str(s).unwrap()
}

#[test]
fn parses_namespace_version_package() {
    let dep = parse_dependency(&value(r#"namespace = "npsp"
version = "3.187""#))
    .unwrap();
    assert!(dep.is_resolved());
    assert!(dep.is_flattened());
    match dep {
        Dependency::Static(StaticDependency::PackageNamespaceVersion(d)) => {
            assert_eq!(d.namespace, "npsp");
            assert_eq!(d.version, PackageVersion::parse("3.187").unwrap());
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn parses_version_id_package() {
    let dep = parse_dependency(&value(r#"version_id = "04t000000000001""#)).unwrap();
    match dep {
        Dependency::Static(StaticDependency::PackageVersionId(d)) => {
            assert_eq!(d.version_id, "04t000000000001");
            assert!(d.version_number.is_none());
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn parses_dynamic_reference() {
    let dep = parse_dependency(&value(
        r#"url = "https://github.com/Org/Root"
tag = "release/1.0"
skip = ["unpackaged/pre/sample"]"#,
    ))
    .unwrap();
    match &dep {
        Dependency::Dynamic(d) => {
            assert_eq!(d.source, SourceKind::GitHub);
            assert_eq!(d.url, "https://github.com/Org/Root");
            assert_eq!(d.tag.as_deref(), Some("release/1.0"));
            assert_eq!(d.skip, vec!["unpackaged/pre/sample".to_string()]);
            assert!(!d.unmanaged);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
    assert!(!dep.is_resolved());
    assert!(!dep.is_flattened());
}

#[test]
fn parses_unmanaged_ref() {
    let dep = parse_dependency(&value(
        r#"url = "https://github.com/Org/Root"
ref = "abcdef0"
subfolder = "unpackaged/pre/data""#,
    ))
    .unwrap();
    match dep {
        Dependency::Static(StaticDependency::UnmanagedVcsRef(d)) => {
            assert_eq!(d.commit, "abcdef0");
            assert_eq!(d.subfolder.as_deref(), Some("unpackaged/pre/data"));
            assert!(d.unmanaged);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn parses_zip_url() {
    let dep = parse_dependency(&value(r#"zip_url = "https://example.com/payload.zip""#)).unwrap();
    match dep {
        Dependency::Static(StaticDependency::UnmanagedZipUrl(d)) => {
            assert_eq!(d.zip_url, "https://example.com/payload.zip");
            assert!(d.unmanaged);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn namespace_inject_defaults_unmanaged_off() {
    let dep = parse_dependency(&value(
        r#"url = "https://github.com/Org/Root"
ref = "abcdef0"
namespace_inject = "ns""#,
    ))
    .unwrap();
    match dep {
        Dependency::Static(StaticDependency::UnmanagedVcsRef(d)) => {
            assert!(!d.unmanaged);
            assert_eq!(d.namespace_inject.as_deref(), Some("ns"));
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn rejects_tag_and_ref_together() {
    let err = parse_dependency(&value(
        r#"url = "https://github.com/Org/Root"
tag = "release/1.0"
ref = "abcdef0""#,
    ))
    .unwrap_err();
    assert!(err.to_string().contains("tag"));
}

#[test]
fn rejects_namespace_inject_on_managed_dynamic() {
    let err = parse_dependency(&value(
        r#"url = "https://github.com/Org/Root"
namespace_inject = "ns""#,
    ))
    .unwrap_err();
    assert!(err.to_string().contains("unmanaged"));
}

#[test]
fn rejects_empty_spec() {
    assert!(parse_dependency(&value("")).is_err());
}

#[test]
fn rejects_unknown_shape() {
    assert!(parse_dependency(&value(r#"name = "what""#)).is_err());
}

#[test]
fn list_parsing_fails_on_first_bad_entry() {
    let values = vec![
        value(r#"namespace = "npsp"
version = "3.187""#),
        value(r#"name = "what""#),
    ];
    assert!(parse_dependencies(&values).is_err());
}
