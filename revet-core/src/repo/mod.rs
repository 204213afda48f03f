//! Repository content aggregation.
//!
//! Resolves a repository URL into a single concatenated code artifact by
//! walking the host's file tree and fetching a bounded sample of qualifying
//! file contents. Branch-name ambiguity (`main` vs `master`) and the
//! tree-vs-raw API asymmetry are the two real failure sources; a two-tier
//! fallback absorbs both without failing an otherwise-successful aggregation
//! over one bad file.
//!
//! The remote host sits behind the [`RepositoryHost`] trait so the
//! aggregation algorithm can be exercised with injected fakes.

pub mod github;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::RepoConfig;
use crate::error::RepoError;
use crate::types::{CodeArtifact, OriginKind};

pub use github::GithubHost;

/// A parsed repository reference: owner and repository name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoReference {
    pub owner: String,
    pub name: String,
}

impl RepoReference {
    /// The `owner/name` display form.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Kind of an entry in a repository file tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    File,
    Directory,
    Other,
}

/// One entry of a repository's file tree listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub kind: TreeEntryKind,
    pub size: u64,
}

/// Abstract contract for a remote repository host.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// List the full file tree of `reference` at `branch`.
    async fn fetch_tree(
        &self,
        reference: &RepoReference,
        branch: &str,
    ) -> Result<Vec<TreeEntry>, RepoError>;

    /// Fetch the raw text content of one file.
    async fn fetch_raw(
        &self,
        reference: &RepoReference,
        branch: &str,
        path: &str,
    ) -> Result<String, RepoError>;
}

/// Parse a repository reference out of a URL of the form
/// `{host}/{owner}/{name}[.git][/...]`.
pub fn parse_reference(host: &str, url: &str) -> Result<RepoReference, RepoError> {
    let pattern = format!(
        r"(?i){}/([^/\s]+?)/([^/\s]+?)(?:\.git|/|$)",
        regex::escape(host)
    );
    // The pattern is built from an escaped host, so compilation cannot fail
    // on user input; a malformed config host is a programming error.
    let re = Regex::new(&pattern).map_err(|e| RepoError::InvalidReference {
        url: format!("{url} (bad host pattern: {e})"),
    })?;

    let captures = re
        .captures(url)
        .ok_or_else(|| RepoError::InvalidReference {
            url: url.to_string(),
        })?;

    let owner = captures[1].to_string();
    let name = captures[2].to_string();
    if owner.is_empty() || name.is_empty() {
        return Err(RepoError::InvalidReference {
            url: url.to_string(),
        });
    }

    Ok(RepoReference { owner, name })
}

/// Aggregates a bounded sample of a repository's source files into one
/// synthetic code artifact.
pub struct RepoAggregator {
    host: Arc<dyn RepositoryHost>,
    config: RepoConfig,
}

impl RepoAggregator {
    pub fn new(host: Arc<dyn RepositoryHost>, config: RepoConfig) -> Self {
        Self { host, config }
    }

    /// Resolve `url` into a single concatenated code artifact.
    ///
    /// The tree fetch is a hard dependency: both branches failing propagates
    /// the transport error. Individual raw-file fetches are tolerated as
    /// partial failures and skipped.
    pub async fn aggregate(&self, url: &str) -> Result<CodeArtifact, RepoError> {
        let reference = parse_reference(&self.config.host, url)?;

        let tree = self.fetch_tree_with_fallback(&reference).await?;

        let candidates: Vec<&TreeEntry> = tree
            .iter()
            .filter(|entry| {
                entry.kind == TreeEntryKind::File
                    && self.is_supported(&entry.path)
                    && entry.size <= self.config.max_file_size
            })
            .take(self.config.max_files)
            .collect();

        if candidates.is_empty() {
            return Err(RepoError::NoSupportedFiles {
                repo: reference.full_name(),
            });
        }

        let mut chunks: Vec<String> = Vec::with_capacity(candidates.len());
        for entry in &candidates {
            match self.fetch_raw_with_fallback(&reference, &entry.path).await {
                Some(content) if !content.trim().is_empty() => {
                    chunks.push(format!("// FILE: {}\n{}", entry.path, content));
                }
                _ => {
                    debug!(path = %entry.path, "Skipping unavailable or empty file");
                }
            }
        }

        if chunks.is_empty() {
            return Err(RepoError::NoSupportedFiles {
                repo: reference.full_name(),
            });
        }

        Ok(CodeArtifact {
            text: chunks.join("\n\n"),
            language: "mixed".to_string(),
            origin: OriginKind::Repository,
            display_name: reference.full_name(),
            repository_ref: Some(url.to_string()),
        })
    }

    /// Fetch the tree on the default branch, retrying once on the fallback
    /// branch name. Both failing propagates the second error.
    async fn fetch_tree_with_fallback(
        &self,
        reference: &RepoReference,
    ) -> Result<Vec<TreeEntry>, RepoError> {
        match self
            .host
            .fetch_tree(reference, &self.config.default_branch)
            .await
        {
            Ok(tree) => Ok(tree),
            Err(first) => {
                warn!(
                    repo = %reference.full_name(),
                    branch = %self.config.default_branch,
                    error = %first,
                    "Tree fetch failed, retrying on fallback branch"
                );
                self.host
                    .fetch_tree(reference, &self.config.fallback_branch)
                    .await
            }
        }
    }

    /// Fetch one file's raw content, trying the default branch then the
    /// fallback. Exhausting both yields `None` so the caller can skip the
    /// file without failing the whole aggregation.
    async fn fetch_raw_with_fallback(
        &self,
        reference: &RepoReference,
        path: &str,
    ) -> Option<String> {
        for branch in [&self.config.default_branch, &self.config.fallback_branch] {
            match self.host.fetch_raw(reference, branch, path).await {
                Ok(content) => return Some(content),
                Err(e) => {
                    debug!(path = %path, branch = %branch, error = %e, "Raw fetch failed");
                }
            }
        }
        None
    }

    fn is_supported(&self, path: &str) -> bool {
        let lowered = path.to_lowercase();
        self.config
            .allowed_extensions
            .iter()
            .any(|ext| lowered.ends_with(ext.as_str()))
    }
}
