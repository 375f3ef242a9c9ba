use strata_core::dependency::{
    Dependency, DynamicDependency, PackageNamespaceVersionDependency, PackageVersionIdDependency,
    SourceKind, StaticDependency, UnmanagedVcsRefDependency,
};
use strata_core::version::PackageVersion;

fn package(namespace: &str, version: &str) -> StaticDependency {
    StaticDependency::PackageNamespaceVersion(PackageNamespaceVersionDependency {
        namespace: namespace.to_string(),
        version: PackageVersion::parse(version).unwrap(),
        version_id: None,
        package_name: None,
    })
}

#[test]
fn static_dependencies_are_resolved_and_flattened() {
    let dep: Dependency = package("foo", "1.0").into();
    assert!(dep.is_resolved());
    assert!(dep.is_flattened());
}

#[test]
fn dynamic_dependency_resolution_state() {
    let mut dep = DynamicDependency::new(SourceKind::GitHub, "https://github.com/Org/Root");
    assert!(!dep.is_resolved());

    dep.commit = Some("abcdef0".to_string());
    assert!(dep.is_resolved());
    assert!(!Dependency::Dynamic(dep).is_flattened());
}

#[test]
fn structural_equality_ignores_version_surface_string() {
    assert_eq!(package("foo", "1.10"), package("foo", "1.10.0"));
    assert_ne!(package("foo", "1.10"), package("foo", "1.10.1"));
    assert_ne!(package("foo", "1.10"), package("bar", "1.10"));
}

#[test]
fn namespace_package_display() {
    let dep = StaticDependency::PackageNamespaceVersion(PackageNamespaceVersionDependency {
        namespace: "foo".to_string(),
        version: PackageVersion::parse("2.0").unwrap(),
        version_id: None,
        package_name: Some("Foo Base".to_string()),
    });
    assert_eq!(dep.to_string(), "Install Foo Base 2.0");
}

#[test]
fn version_id_package_display_prefers_version_number() {
    let dep = StaticDependency::PackageVersionId(PackageVersionIdDependency {
        version_id: "04t000000000001".to_string(),
        version_number: Some("2.1.0.5".to_string()),
        package_name: Some("Foo".to_string()),
    });
    assert_eq!(dep.to_string(), "Install Foo 2.1.0.5");

    let dep = StaticDependency::PackageVersionId(PackageVersionIdDependency {
        version_id: "04t000000000001".to_string(),
        version_number: None,
        package_name: None,
    });
    assert_eq!(dep.to_string(), "Install Unknown Package 04t000000000001");
}

#[test]
fn unmanaged_ref_display_includes_subfolder() {
    let dep = StaticDependency::UnmanagedVcsRef(UnmanagedVcsRefDependency {
        url: "https://github.com/Org/Root".to_string(),
        commit: "abcdef0".to_string(),
        subfolder: Some("unpackaged/pre/data".to_string()),
        unmanaged: true,
        namespace_inject: None,
        namespace_strip: None,
    });
    assert_eq!(dep.to_string(), "Deploy Root/unpackaged/pre/data");
}

#[test]
fn dynamic_dependency_display() {
    let dep = DynamicDependency::new(SourceKind::GitHub, "https://github.com/Org/Root");
    assert_eq!(dep.to_string(), "Dependency: https://github.com/Org/Root");
}
