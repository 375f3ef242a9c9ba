//! GitHub REST v3 implementation of [`VcsHost`].

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;

use strata_core::git::split_repo_url;
use strata_core::project::PROJECT_FILE;
use strata_util::errors::{StrataError, StrataResult};

use crate::host::{Release, TagRef, VcsHost};
use crate::remote::RemoteProject;

/// Default API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Environment variable consulted for an API token.
pub const GITHUB_TOKEN_VAR: &str = "STRATA_GITHUB_TOKEN";

/// A GitHub-backed [`VcsHost`] over the REST v3 API.
pub struct GitHubHost {
    client: Client,
    api_base: String,
}

impl GitHubHost {
    pub fn new(token: Option<String>) -> StrataResult<Self> {
        Self::with_api_base(GITHUB_API_URL, token)
    }

    /// Build a host against a non-standard API base (GitHub Enterprise, or
    /// a local server in tests).
    pub fn with_api_base(api_base: impl Into<String>, token: Option<String>) -> StrataResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                StrataError::Config {
                    message: "Invalid GitHub token".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("strata/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| StrataError::Vcs {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        let api_base: String = api_base.into();
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// `owner/name` path segment for a repository URL.
    fn repo_path(&self, url: &str) -> StrataResult<String> {
        let (owner, name) = split_repo_url(url).ok_or_else(|| StrataError::Vcs {
            message: format!("Not a repository URL: {url}"),
        })?;
        Ok(format!("{owner}/{name}"))
    }

    /// GET a JSON endpoint. `Ok(None)` on 404.
    fn get_json(&self, path: &str) -> StrataResult<Option<Value>> {
        let url = format!("{}/{path}", self.api_base);
        tracing::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| StrataError::Vcs {
                message: format!("Request to {url} failed: {e}"),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StrataError::Vcs {
                message: format!("GitHub returned {} for {url}", response.status()),
            }
            .into());
        }

        let value = response.json().map_err(|e| StrataError::Vcs {
            message: format!("Invalid JSON from {url}: {e}"),
        })?;
        Ok(Some(value))
    }

    /// GET raw file content. `Ok(None)` on 404.
    fn get_raw(&self, path: &str) -> StrataResult<Option<String>> {
        let url = format!("{}/{path}", self.api_base);
        tracing::debug!("GET {url} (raw)");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github.raw+json")
            .send()
            .map_err(|e| StrataError::Vcs {
                message: format!("Request to {url} failed: {e}"),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StrataError::Vcs {
                message: format!("GitHub returned {} for {url}", response.status()),
            }
            .into());
        }

        let text = response.text().map_err(|e| StrataError::Vcs {
            message: format!("Failed to read {url}: {e}"),
        })?;
        Ok(Some(text))
    }
}

impl VcsHost for GitHubHost {
    fn remote_project(&self, url: &str, commit: &str) -> StrataResult<RemoteProject> {
        let repo = self.repo_path(url)?;
        let content = self.get_raw(&format!(
            "repos/{repo}/contents/{PROJECT_FILE}?ref={commit}"
        ))?;
        match content {
            Some(content) => RemoteProject::parse(&content),
            None => Ok(RemoteProject::default()),
        }
    }

    fn list_releases(&self, url: &str) -> StrataResult<Vec<Release>> {
        let repo = self.repo_path(url)?;
        let value = self
            .get_json(&format!("repos/{repo}/releases?per_page=100"))?
            .unwrap_or(Value::Array(Vec::new()));
        Ok(parse_releases(&value))
    }

    fn tag_ref(&self, url: &str, tag_name: &str) -> StrataResult<Option<TagRef>> {
        let repo = self.repo_path(url)?;
        let Some(reference) = self.get_json(&format!("repos/{repo}/git/ref/tags/{tag_name}"))?
        else {
            return Ok(None);
        };

        let object_type = reference["object"]["type"].as_str().unwrap_or_default();
        let object_sha = reference["object"]["sha"].as_str().unwrap_or_default();

        if object_type != "tag" {
            // Lightweight tag: points straight at a commit, no annotation.
            return Ok(Some(TagRef {
                sha: object_sha.to_string(),
                message: String::new(),
            }));
        }

        let Some(tag) = self.get_json(&format!("repos/{repo}/git/tags/{object_sha}"))? else {
            return Ok(None);
        };
        Ok(Some(TagRef {
            sha: tag["object"]["sha"].as_str().unwrap_or_default().to_string(),
            message: tag["message"].as_str().unwrap_or_default().to_string(),
        }))
    }

    fn default_branch(&self, url: &str) -> StrataResult<String> {
        let repo = self.repo_path(url)?;
        let value = self
            .get_json(&format!("repos/{repo}"))?
            .ok_or_else(|| StrataError::Vcs {
                message: format!("Repository {url} not found or not authorized"),
            })?;
        Ok(value["default_branch"]
            .as_str()
            .unwrap_or("main")
            .to_string())
    }

    fn branch_head(&self, url: &str, branch: &str) -> StrataResult<Option<String>> {
        let repo = self.repo_path(url)?;
        let Some(value) = self.get_json(&format!("repos/{repo}/branches/{branch}"))? else {
            return Ok(None);
        };
        Ok(value["commit"]["sha"].as_str().map(|s| s.to_string()))
    }

    fn commit_parents(&self, url: &str, sha: &str) -> StrataResult<Vec<String>> {
        let repo = self.repo_path(url)?;
        let Some(value) = self.get_json(&format!("repos/{repo}/commits/{sha}"))? else {
            return Ok(Vec::new());
        };
        Ok(parse_commit_parents(&value))
    }

    fn commit_status(
        &self,
        url: &str,
        sha: &str,
        context: &str,
    ) -> StrataResult<Option<String>> {
        let repo = self.repo_path(url)?;
        let Some(value) = self.get_json(&format!("repos/{repo}/commits/{sha}/status"))? else {
            return Ok(None);
        };
        Ok(status_for_context(&value, context))
    }

    fn list_subfolders(&self, url: &str, commit: &str, path: &str) -> StrataResult<Vec<String>> {
        let repo = self.repo_path(url)?;
        let Some(value) = self.get_json(&format!("repos/{repo}/contents/{path}?ref={commit}"))?
        else {
            return Ok(Vec::new());
        };
        Ok(parse_subfolders(&value))
    }
}

fn parse_releases(value: &Value) -> Vec<Release> {
    value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| !entry["draft"].as_bool().unwrap_or(false))
                .filter_map(|entry| {
                    Some(Release {
                        tag_name: entry["tag_name"].as_str()?.to_string(),
                        prerelease: entry["prerelease"].as_bool().unwrap_or(false),
                        body: entry["body"].as_str().unwrap_or_default().to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_commit_parents(value: &Value) -> Vec<String> {
    value["parents"]
        .as_array()
        .map(|parents| {
            parents
                .iter()
                .filter_map(|p| p["sha"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// The description of the latest status posted for `context`, if any.
/// The combined-status endpoint lists only the latest status per context.
fn status_for_context(value: &Value, context: &str) -> Option<String> {
    value["statuses"].as_array()?.iter().find_map(|status| {
        if status["context"].as_str() == Some(context) {
            status["description"].as_str().map(|s| s.to_string())
        } else {
            None
        }
    })
}

fn parse_subfolders(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry["type"].as_str() == Some("dir"))
                .filter_map(|entry| entry["name"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}
