//! Core type definitions for the Revet review pipeline.
//!
//! Defines the fundamental data structures used throughout the system:
//! code artifacts, analysis reports, review records, and user statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of the user owning a review.
///
/// Identity is established by the caller; the core never interprets the value
/// beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Where a code artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    Paste,
    Upload,
    Repository,
}

impl std::fmt::Display for OriginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OriginKind::Paste => write!(f, "paste"),
            OriginKind::Upload => write!(f, "upload"),
            OriginKind::Repository => write!(f, "repository"),
        }
    }
}

/// The normalized unit of code text plus metadata passed into analysis.
///
/// Request-scoped and transient: built by the input resolver, consumed by the
/// analysis engine, and folded into a [`ReviewRecord`] by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub text: String,
    /// Language tag, always set by the time analysis runs.
    pub language: String,
    pub origin: OriginKind,
    /// File name for uploads, `owner/name` for repositories, empty for pastes.
    pub display_name: String,
    /// The original repository URL, when the origin is a repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_ref: Option<String>,
}

impl CodeArtifact {
    /// Whether the artifact carries any non-whitespace code at all.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// An uploaded file payload: original name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The inbound request bundle for a review.
///
/// May carry any combination of origins; the input resolver picks exactly one
/// by precedence (repository > upload > paste).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Pasted code, lowest-precedence origin.
    #[serde(default)]
    pub code: Option<String>,
    /// Explicit language tag; overrides classification except for repositories.
    #[serde(default)]
    pub language: Option<String>,
    /// Remote repository URL, highest-precedence origin.
    #[serde(default)]
    pub repository: Option<String>,
    /// Uploaded file payload, middle-precedence origin.
    #[serde(default)]
    pub file: Option<UploadedFile>,
}

impl ReviewRequest {
    /// Build a paste-origin request.
    pub fn paste(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Build a repository-origin request.
    pub fn repository(url: impl Into<String>) -> Self {
        Self {
            repository: Some(url.into()),
            ..Self::default()
        }
    }

    /// Build an upload-origin request.
    pub fn upload(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file: Some(UploadedFile {
                name: name.into(),
                bytes,
            }),
            ..Self::default()
        }
    }

    /// Set the explicit language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// The eleven named findings of a quality analysis.
///
/// Textual fields are never null: missing remote values normalize to empty
/// strings, complexity labels to `"Unknown"`, and the score to the configured
/// default. `score` is always within 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub bugs: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub time_complexity: String,
    #[serde(default)]
    pub space_complexity: String,
    #[serde(default)]
    pub better_code: String,
    pub score: u8,
    #[serde(default)]
    pub code_smells: String,
    #[serde(default)]
    pub security_warnings: String,
    #[serde(default)]
    pub duplicate_code: String,
    #[serde(default)]
    pub performance_suggestions: String,
    #[serde(default)]
    pub naming_suggestions: String,
}

/// A persisted review: artifact metadata plus the analysis findings.
///
/// Owned exclusively by one user and immutable once created, except for
/// deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub owner: UserId,
    pub code: String,
    pub language: String,
    pub lines_of_code: usize,
    pub display_name: String,
    pub origin: OriginKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_ref: Option<String>,
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

/// A user's running review statistics.
///
/// A materialized view over the user's [`ReviewRecord`] set: recomputed from
/// the full record set after every create/delete, never incrementally
/// mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_reviews: u64,
    /// Arithmetic mean of record scores, rounded to 2 decimal places.
    pub average_score: f64,
}

/// Review count and mean score for a single language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: u64,
}

/// One-pass analytics over a user's review history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_reviews: u64,
    pub average_score: f64,
    pub best_score: u8,
    pub worst_score: u8,
    /// Languages reviewed, most frequent first.
    pub languages: Vec<LanguageCount>,
}
