//! Error types for the Revet review core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering input validation, repository aggregation, analysis, storage,
//! and configuration domains.

/// Top-level error type for the Revet core library.
#[derive(Debug, thiserror::Error)]
pub enum RevetError {
    /// User-correctable input problem, surfaced verbatim to the caller.
    #[error("{message}")]
    Validation { message: String },

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RevetError {
    /// Construct a validation error from any displayable message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Errors from repository reference parsing and content aggregation.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Invalid repository URL: {url}")]
    InvalidReference { url: String },

    #[error("No supported code files found in repository {repo}")]
    NoSupportedFiles { repo: String },

    #[error("Repository host request failed: {message}")]
    Transport { message: String },

    #[error("Repository host returned status {code}")]
    Status { code: u16 },

    #[error("Repository fetch timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Repository response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from the remote analysis service.
///
/// These never escape the analysis engine: every variant is absorbed by the
/// deterministic heuristic fallback.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis service connection failed: {message}")]
    Connection { message: String },

    #[error("Analysis service returned status {code}")]
    Status { code: u16 },

    #[error("Analysis request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Analysis response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from the review store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Review not found: {id}")]
    ReviewNotFound { id: String },

    #[error("Store persistence error: {message}")]
    Persistence { message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `RevetError`.
pub type Result<T> = std::result::Result<T, RevetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_is_verbatim() {
        let err = RevetError::validation("code is required for review");
        assert_eq!(err.to_string(), "code is required for review");
    }

    #[test]
    fn test_repo_error_display() {
        let err = RevetError::Repo(RepoError::InvalidReference {
            url: "not-a-url".into(),
        });
        assert_eq!(
            err.to_string(),
            "Repository error: Invalid repository URL: not-a-url"
        );

        let err = RepoError::NoSupportedFiles {
            repo: "acme/widgets".into(),
        };
        assert_eq!(
            err.to_string(),
            "No supported code files found in repository acme/widgets"
        );
    }

    #[test]
    fn test_analysis_error_display() {
        let err = AnalysisError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "Analysis request timed out after 30s");

        let err = AnalysisError::Status { code: 503 };
        assert_eq!(err.to_string(), "Analysis service returned status 503");
    }

    #[test]
    fn test_store_error_display() {
        let err = RevetError::Store(StoreError::ReviewNotFound {
            id: "abc123".into(),
        });
        assert_eq!(err.to_string(), "Store error: Review not found: abc123");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RevetError = io_err.into();
        assert!(matches!(err, RevetError::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RevetError = serde_err.into();
        assert!(matches!(err, RevetError::Serialization(_)));
    }
}
