//! Input resolution: one request bundle in, exactly one code artifact out.
//!
//! The three origins form an ordered precedence chain — repository, then
//! uploaded file, then pasted text. Each origin is a predicate/build pair
//! evaluated in order, so a new origin is an appended entry rather than an
//! edit to existing branches. A repository origin forces the language to
//! `"mixed"` regardless of any explicit language supplied; the other two
//! honor an explicit language and fall back to classification.

use std::sync::Arc;

use crate::error::{Result, RevetError};
use crate::language;
use crate::repo::RepoAggregator;
use crate::types::{CodeArtifact, OriginKind, ReviewRequest};

/// Surfaced verbatim when resolution yields no usable code.
const EMPTY_CODE_MESSAGE: &str = "Code is required for review";

/// Origin precedence, highest first. Paste is the unconditional tail.
const PRECEDENCE: &[OriginKind] = &[
    OriginKind::Repository,
    OriginKind::Upload,
    OriginKind::Paste,
];

/// Resolves a [`ReviewRequest`] into a normalized [`CodeArtifact`].
pub struct InputResolver {
    aggregator: Arc<RepoAggregator>,
}

impl InputResolver {
    pub fn new(aggregator: Arc<RepoAggregator>) -> Self {
        Self { aggregator }
    }

    /// Produce the artifact for the highest-precedence origin present.
    ///
    /// Fails with a validation error when the resolved text is empty or
    /// whitespace-only; the caller must not proceed to analysis.
    pub async fn resolve(&self, request: &ReviewRequest) -> Result<CodeArtifact> {
        for origin in PRECEDENCE {
            if !self.applies(*origin, request) {
                continue;
            }
            let artifact = self.build(*origin, request).await?;
            if artifact.is_blank() {
                return Err(RevetError::validation(EMPTY_CODE_MESSAGE));
            }
            return Ok(artifact);
        }
        // Paste applies unconditionally, so the chain always produces.
        Err(RevetError::validation(EMPTY_CODE_MESSAGE))
    }

    fn applies(&self, origin: OriginKind, request: &ReviewRequest) -> bool {
        match origin {
            OriginKind::Repository => request
                .repository
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty()),
            OriginKind::Upload => request.file.is_some(),
            OriginKind::Paste => true,
        }
    }

    async fn build(&self, origin: OriginKind, request: &ReviewRequest) -> Result<CodeArtifact> {
        match origin {
            OriginKind::Repository => {
                let url = request.repository.as_deref().unwrap_or_default();
                // The aggregator sets language to "mixed"; an explicit
                // language on the request is deliberately ignored here.
                Ok(self.aggregator.aggregate(url).await?)
            }
            OriginKind::Upload => {
                let file = request
                    .file
                    .as_ref()
                    .ok_or_else(|| RevetError::validation(EMPTY_CODE_MESSAGE))?;
                let text = String::from_utf8_lossy(&file.bytes).into_owned();
                let language = request
                    .language
                    .clone()
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| language::classify_by_file_name(&file.name).to_string());
                Ok(CodeArtifact {
                    text,
                    language,
                    origin: OriginKind::Upload,
                    display_name: file.name.clone(),
                    repository_ref: None,
                })
            }
            OriginKind::Paste => {
                let text = request.code.clone().unwrap_or_default();
                let language = request
                    .language
                    .clone()
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| language::classify_by_content(&text).to_string());
                Ok(CodeArtifact {
                    text,
                    language,
                    origin: OriginKind::Paste,
                    display_name: String::new(),
                    repository_ref: None,
                })
            }
        }
    }
}
