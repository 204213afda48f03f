//! HTTP client for the remote analysis service.
//!
//! Submits `{code, language}` to `POST {base_url}/analyze` with a bounded
//! timeout and normalizes whatever comes back: missing textual fields become
//! empty strings, missing complexity labels become `"Unknown"`, and a
//! missing or out-of-range score becomes the configured default.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

use super::Analyzer;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::types::{AnalysisReport, CodeArtifact};
use async_trait::async_trait;

/// Wire shape of the analysis service response; every field is optional so a
/// sparse or partial response still parses.
#[derive(Debug, Default, Deserialize)]
struct RawAnalysisResponse {
    bugs: Option<String>,
    improvements: Option<String>,
    time_complexity: Option<String>,
    space_complexity: Option<String>,
    better_code: Option<String>,
    score: Option<f64>,
    code_smells: Option<String>,
    security_warnings: Option<String>,
    duplicate_code: Option<String>,
    performance_suggestions: Option<String>,
    naming_suggestions: Option<String>,
}

/// Remote analyzer backed by the analysis service.
pub struct RemoteAnalyzer {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    default_score: u8,
}

impl RemoteAnalyzer {
    /// Create a remote analyzer from configuration.
    pub fn new(config: &AnalysisConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url).map_err(|e| ConfigError::Invalid {
            message: format!("analysis.base_url '{}': {e}", config.base_url),
        })?;
        let endpoint = base
            .join("analyze")
            .map_err(|e| ConfigError::Invalid {
                message: format!("analysis endpoint: {e}"),
            })?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            timeout: Duration::from_secs(config.timeout_secs),
            default_score: config.default_score,
        })
    }

    /// Substitute defaults for anything the service omitted and clamp the
    /// score into 0..=100.
    fn normalize(&self, raw: RawAnalysisResponse) -> AnalysisReport {
        let score = raw
            .score
            .filter(|s| s.is_finite())
            .map(|s| s.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(self.default_score);

        AnalysisReport {
            bugs: raw.bugs.unwrap_or_default(),
            improvements: raw.improvements.unwrap_or_default(),
            time_complexity: raw
                .time_complexity
                .unwrap_or_else(|| "Unknown".to_string()),
            space_complexity: raw
                .space_complexity
                .unwrap_or_else(|| "Unknown".to_string()),
            better_code: raw.better_code.unwrap_or_default(),
            score,
            code_smells: raw.code_smells.unwrap_or_default(),
            security_warnings: raw.security_warnings.unwrap_or_default(),
            duplicate_code: raw.duplicate_code.unwrap_or_default(),
            performance_suggestions: raw.performance_suggestions.unwrap_or_default(),
            naming_suggestions: raw.naming_suggestions.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Analyzer for RemoteAnalyzer {
    async fn analyze(&self, artifact: &CodeArtifact) -> Result<AnalysisReport, AnalysisError> {
        let body = json!({
            "code": artifact.text,
            "language": artifact.language,
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    AnalysisError::Connection {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status {
                code: status.as_u16(),
            });
        }

        let raw: RawAnalysisResponse =
            response
                .json()
                .await
                .map_err(|e| AnalysisError::ResponseParse {
                    message: e.to_string(),
                })?;

        Ok(self.normalize(raw))
    }

    fn name(&self) -> &str {
        "remote"
    }
}
