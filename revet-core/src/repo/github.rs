//! GitHub implementation of the `RepositoryHost` trait.
//!
//! Uses the Git trees API (`GET /repos/{owner}/{repo}/git/trees/{branch}
//! ?recursive=1`) for listings and `raw.githubusercontent.com` for file
//! bodies. An optional bearer token is resolved once at construction from
//! the environment variable named in the config; no ambient state is read
//! per request.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{RepoReference, RepositoryHost, TreeEntry, TreeEntryKind};
use crate::config::RepoConfig;
use crate::error::{ConfigError, RepoError};
use async_trait::async_trait;

/// MIME hint GitHub's REST API expects.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Repository host client for GitHub.
pub struct GithubHost {
    client: Client,
    api_base: Url,
    raw_base: Url,
    token: Option<String>,
    fetch_timeout: Duration,
}

/// Wire shape of one Git trees API entry.
#[derive(Debug, Deserialize)]
struct GitTreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
}

/// Wire shape of the Git trees API response.
#[derive(Debug, Deserialize)]
struct GitTreeResponse {
    #[serde(default)]
    tree: Vec<GitTreeEntry>,
}

impl GithubHost {
    /// Create a host client from configuration.
    ///
    /// Returns `ConfigError::Invalid` when either base URL does not parse.
    pub fn new(config: &RepoConfig) -> Result<Self, ConfigError> {
        let api_base = Url::parse(&config.api_base).map_err(|e| ConfigError::Invalid {
            message: format!("repo.api_base '{}': {e}", config.api_base),
        })?;
        let raw_base = Url::parse(&config.raw_base).map_err(|e| ConfigError::Invalid {
            message: format!("repo.raw_base '{}': {e}", config.raw_base),
        })?;

        Ok(Self {
            client: Client::new(),
            api_base,
            raw_base,
            token: std::env::var(&config.token_env).ok(),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        })
    }

    fn map_transport(e: reqwest::Error, timeout_secs: u64) -> RepoError {
        if e.is_timeout() {
            RepoError::Timeout { timeout_secs }
        } else {
            RepoError::Transport {
                message: e.to_string(),
            }
        }
    }

    fn endpoint(&self, base: &Url, path: &str) -> Result<Url, RepoError> {
        base.join(path).map_err(|e| RepoError::Transport {
            message: format!("invalid endpoint '{path}': {e}"),
        })
    }
}

#[async_trait]
impl RepositoryHost for GithubHost {
    async fn fetch_tree(
        &self,
        reference: &RepoReference,
        branch: &str,
    ) -> Result<Vec<TreeEntry>, RepoError> {
        let path = format!(
            "repos/{}/{}/git/trees/{}?recursive=1",
            reference.owner, reference.name, branch
        );
        let url = self.endpoint(&self.api_base, &path)?;

        let mut request = self
            .client
            .get(url)
            .header("Accept", GITHUB_ACCEPT)
            .timeout(self.fetch_timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::map_transport(e, self.fetch_timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepoError::Status {
                code: status.as_u16(),
            });
        }

        let body: GitTreeResponse =
            response
                .json()
                .await
                .map_err(|e| RepoError::ResponseParse {
                    message: e.to_string(),
                })?;

        Ok(body
            .tree
            .into_iter()
            .map(|entry| TreeEntry {
                path: entry.path,
                kind: match entry.kind.as_str() {
                    "blob" => TreeEntryKind::File,
                    "tree" => TreeEntryKind::Directory,
                    _ => TreeEntryKind::Other,
                },
                size: entry.size,
            })
            .collect())
    }

    async fn fetch_raw(
        &self,
        reference: &RepoReference,
        branch: &str,
        path: &str,
    ) -> Result<String, RepoError> {
        let raw_path = format!("{}/{}/{}/{}", reference.owner, reference.name, branch, path);
        let url = self.endpoint(&self.raw_base, &raw_path)?;

        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| Self::map_transport(e, self.fetch_timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepoError::Status {
                code: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| RepoError::Transport {
            message: e.to_string(),
        })
    }
}
