//! Branch and repository naming conventions.
//!
//! Release branches are named `<prefix>NNN` where `NNN` is a numeric release
//! identifier; working branches descending from one are `<prefix>NNN__name`.

/// Split a repository URL into `(owner, name)`.
///
/// Accepts `https://host/owner/name`, with or without a trailing `/` or a
/// `.git` suffix.
pub fn split_repo_url(url: &str) -> Option<(String, String)> {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let mut parts = trimmed.rsplit('/');
    let name = parts.next()?;
    let owner = parts.next()?;
    if name.is_empty() || owner.is_empty() || owner.contains(':') {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

/// The repository name portion of a URL, for display.
pub fn repo_name(url: &str) -> String {
    split_repo_url(url)
        .map(|(_, name)| name)
        .unwrap_or_else(|| url.to_string())
}

/// Strip the feature prefix from a branch name.
pub fn get_feature_branch_name<'a>(branch: &'a str, prefix_feature: &str) -> Option<&'a str> {
    branch.strip_prefix(prefix_feature)
}

/// Whether a branch is a numbered release branch (`feature/230`).
pub fn is_release_branch(branch: &str, prefix_feature: &str) -> bool {
    branch
        .strip_prefix(prefix_feature)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Whether a branch is a release branch or a child of one
/// (`feature/230` or `feature/230__widgets`).
pub fn is_release_branch_or_child(branch: &str, prefix_feature: &str) -> bool {
    let Some(rest) = branch.strip_prefix(prefix_feature) else {
        return false;
    };
    let head = rest.split("__").next().unwrap_or("");
    !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit())
}

/// The numeric release identifier of a release branch or its child.
pub fn get_release_identifier(branch: &str, prefix_feature: &str) -> Option<u32> {
    if !is_release_branch_or_child(branch, prefix_feature) {
        return None;
    }
    branch
        .strip_prefix(prefix_feature)?
        .split("__")
        .next()?
        .parse()
        .ok()
}

/// Build a release branch name from a prefix and identifier.
pub fn construct_release_branch_name(prefix_feature: &str, release_id: u32) -> String {
    format!("{prefix_feature}{release_id}")
}
