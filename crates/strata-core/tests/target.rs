use std::collections::BTreeMap;

use strata_core::dependency::{
    PackageNamespaceVersionDependency, PackageVersionIdDependency, StaticDependency,
    UnmanagedVcsRefDependency,
};
use strata_core::target::{InstallOptions, MetadataDeploy, TargetEnvironment};
use strata_core::version::PackageVersion;
use strata_util::errors::StrataResult;

/// In-memory environment recording every install action.
#[derive(Default)]
struct FakeEnvironment {
    namespaces: BTreeMap<String, PackageVersion>,
    version_ids: Vec<String>,
    actions: Vec<String>,
}

impl TargetEnvironment for FakeEnvironment {
    fn installed_version(&self, namespace: &str) -> Option<PackageVersion> {
        self.namespaces.get(namespace).cloned()
    }

    fn has_package_version(&self, version_id: &str) -> bool {
        self.version_ids.iter().any(|v| v == version_id)
    }

    fn install_namespace_package(
        &mut self,
        namespace: &str,
        version: &PackageVersion,
        _options: &InstallOptions,
    ) -> StrataResult<()> {
        self.actions.push(format!("install {namespace} {version}"));
        self.namespaces
            .insert(namespace.to_string(), version.clone());
        Ok(())
    }

    fn install_package_by_id(
        &mut self,
        version_id: &str,
        _options: &InstallOptions,
    ) -> StrataResult<()> {
        self.actions.push(format!("install {version_id}"));
        self.version_ids.push(version_id.to_string());
        Ok(())
    }

    fn deploy_metadata(
        &mut self,
        deploy: &MetadataDeploy,
        _options: &InstallOptions,
    ) -> StrataResult<()> {
        self.actions
            .push(format!("deploy {:?}/{:?}", deploy.source, deploy.subfolder));
        Ok(())
    }
}

fn namespace_dep(namespace: &str, version: &str) -> StaticDependency {
    StaticDependency::PackageNamespaceVersion(PackageNamespaceVersionDependency {
        namespace: namespace.to_string(),
        version: PackageVersion::parse(version).unwrap(),
        version_id: None,
        package_name: None,
    })
}

#[test]
fn installs_missing_namespace_package() {
    let mut env = FakeEnvironment::default();
    namespace_dep("foo", "2.0")
        .install(&mut env, &InstallOptions::default())
        .unwrap();
    assert_eq!(env.actions, ["install foo 2.0"]);
}

#[test]
fn equal_or_newer_installed_version_is_a_no_op() {
    let mut env = FakeEnvironment::default();
    env.namespaces
        .insert("foo".to_string(), PackageVersion::parse("2.0").unwrap());

    namespace_dep("foo", "2.0")
        .install(&mut env, &InstallOptions::default())
        .unwrap();
    namespace_dep("foo", "1.9")
        .install(&mut env, &InstallOptions::default())
        .unwrap();
    assert!(env.actions.is_empty());

    namespace_dep("foo", "2.1")
        .install(&mut env, &InstallOptions::default())
        .unwrap();
    assert_eq!(env.actions, ["install foo 2.1"]);
}

#[test]
fn beta_is_upgraded_to_release() {
    let mut env = FakeEnvironment::default();
    env.namespaces.insert(
        "foo".to_string(),
        PackageVersion::parse("2.0 (Beta 3)").unwrap(),
    );

    namespace_dep("foo", "2.0")
        .install(&mut env, &InstallOptions::default())
        .unwrap();
    assert_eq!(env.actions, ["install foo 2.0"]);
}

#[test]
fn version_id_install_is_idempotent() {
    let mut env = FakeEnvironment::default();
    let dep = StaticDependency::PackageVersionId(PackageVersionIdDependency {
        version_id: "04t000000000001".to_string(),
        version_number: None,
        package_name: None,
    });

    dep.install(&mut env, &InstallOptions::default()).unwrap();
    dep.install(&mut env, &InstallOptions::default()).unwrap();
    assert_eq!(env.actions, ["install 04t000000000001"]);
}

#[test]
fn unmanaged_ref_deploys_metadata() {
    let mut env = FakeEnvironment::default();
    let dep = StaticDependency::UnmanagedVcsRef(UnmanagedVcsRefDependency {
        url: "https://github.com/Org/Root".to_string(),
        commit: "abcdef0".to_string(),
        subfolder: Some("unpackaged/pre/data".to_string()),
        unmanaged: true,
        namespace_inject: None,
        namespace_strip: None,
    });

    dep.install(&mut env, &InstallOptions::default()).unwrap();
    assert_eq!(env.actions.len(), 1);
    assert!(env.actions[0].starts_with("deploy"));
}
