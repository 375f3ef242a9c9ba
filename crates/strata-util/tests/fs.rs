use strata_util::fs::{current_git_branch, find_ancestor_with};

#[test]
fn find_ancestor_locates_marker_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b").join("c");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join("strata.toml"), "").unwrap();

    let found = find_ancestor_with(&nested, "strata.toml").unwrap();
    assert_eq!(found, dir.path());
}

#[test]
fn find_ancestor_returns_none_without_marker() {
    let dir = tempfile::tempdir().unwrap();
    assert!(find_ancestor_with(dir.path(), "strata.toml").is_none());
}

#[test]
fn current_branch_from_symbolic_head() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    std::fs::write(
        dir.path().join(".git").join("HEAD"),
        "ref: refs/heads/feature/230__widgets\n",
    )
    .unwrap();

    assert_eq!(
        current_git_branch(dir.path()).as_deref(),
        Some("feature/230__widgets")
    );
}

#[test]
fn current_branch_none_for_detached_head() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    std::fs::write(
        dir.path().join(".git").join("HEAD"),
        "0123456789abcdef0123456789abcdef01234567\n",
    )
    .unwrap();

    assert!(current_git_branch(dir.path()).is_none());
}
