use strata_core::git::{
    construct_release_branch_name, get_feature_branch_name, get_release_identifier,
    is_release_branch, is_release_branch_or_child, repo_name, split_repo_url,
};

#[test]
fn split_repo_url_basic() {
    let (owner, name) = split_repo_url("https://github.com/Org/Root").unwrap();
    assert_eq!(owner, "Org");
    assert_eq!(name, "Root");
}

#[test]
fn split_repo_url_trailing_slash_and_git_suffix() {
    let (owner, name) = split_repo_url("https://github.com/Org/Root.git/").unwrap();
    assert_eq!(owner, "Org");
    assert_eq!(name, "Root");
}

#[test]
fn repo_name_falls_back_to_url() {
    assert_eq!(repo_name("https://github.com/Org/Root"), "Root");
    assert_eq!(repo_name("nonsense"), "nonsense");
}

#[test]
fn release_branch_detection() {
    assert!(is_release_branch("feature/230", "feature/"));
    assert!(!is_release_branch("feature/230__widgets", "feature/"));
    assert!(!is_release_branch("feature/widgets", "feature/"));
    assert!(!is_release_branch("main", "feature/"));
    assert!(!is_release_branch("feature/", "feature/"));
}

#[test]
fn release_branch_or_child_detection() {
    assert!(is_release_branch_or_child("feature/230", "feature/"));
    assert!(is_release_branch_or_child("feature/230__widgets", "feature/"));
    assert!(is_release_branch_or_child(
        "feature/230__widgets__deep",
        "feature/"
    ));
    assert!(!is_release_branch_or_child("feature/widgets", "feature/"));
    assert!(!is_release_branch_or_child("main", "feature/"));
}

#[test]
fn release_identifier_extraction() {
    assert_eq!(get_release_identifier("feature/230", "feature/"), Some(230));
    assert_eq!(
        get_release_identifier("feature/230__widgets", "feature/"),
        Some(230)
    );
    assert_eq!(get_release_identifier("feature/widgets", "feature/"), None);
    assert_eq!(get_release_identifier("main", "feature/"), None);
}

#[test]
fn feature_branch_name() {
    assert_eq!(
        get_feature_branch_name("feature/230__widgets", "feature/"),
        Some("230__widgets")
    );
    assert_eq!(get_feature_branch_name("main", "feature/"), None);
}

#[test]
fn release_branch_construction() {
    assert_eq!(construct_release_branch_name("feature/", 229), "feature/229");
}
