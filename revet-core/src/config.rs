//! Configuration system for the Revet core.
//!
//! Uses `figment` for layered configuration: defaults -> `revet.toml` ->
//! `REVET_*` environment variables. Every timeout, limit, and allow-list the
//! repository aggregator and analysis engine depend on is carried here and
//! injected at construction time, so both components can be tested with
//! fakes and never read ambient process state mid-request.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration for the review core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    pub repo: RepoConfig,
    pub analysis: AnalysisConfig,
    /// Directory for file-backed review storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Configuration for the repository content aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Base URL of the repository host's tree API.
    pub api_base: String,
    /// Base URL for raw file content.
    pub raw_base: String,
    /// Host marker expected inside repository URLs.
    pub host: String,
    /// Branch tried first for tree and raw fetches.
    pub default_branch: String,
    /// Conventional secondary branch tried when the default fails.
    pub fallback_branch: String,
    /// File extensions eligible for aggregation.
    pub allowed_extensions: Vec<String>,
    /// Per-file size ceiling in bytes.
    pub max_file_size: u64,
    /// Maximum number of files aggregated from one repository.
    pub max_files: usize,
    /// Per-fetch timeout for raw file content, in seconds.
    pub fetch_timeout_secs: u64,
    /// Environment variable holding an optional API token, resolved once at
    /// host construction.
    pub token_env: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            host: "github.com".to_string(),
            default_branch: "main".to_string(),
            fallback_branch: "master".to_string(),
            allowed_extensions: [".py", ".js", ".cpp", ".c", ".java", ".txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 150_000,
            max_files: 20,
            fetch_timeout_secs: 10,
            token_env: "REVET_GITHUB_TOKEN".to_string(),
        }
    }
}

/// Configuration for the remote analysis service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Base URL of the analysis service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Score substituted when the service omits one.
    pub default_score: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            default_score: 70,
        }
    }
}

impl CoreConfig {
    /// Load configuration with layering: defaults -> config file -> env vars.
    ///
    /// Environment variables use the `REVET_` prefix with `__` as the nesting
    /// separator, e.g. `REVET_ANALYSIS__BASE_URL`.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(CoreConfig::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        } else {
            figment = figment.merge(Toml::file("revet.toml"));
        }

        figment
            .merge(Env::prefixed("REVET_").split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
    }

    /// Validate cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repo.max_files == 0 {
            return Err(ConfigError::Invalid {
                message: "repo.max_files must be at least 1".to_string(),
            });
        }
        if self.repo.allowed_extensions.is_empty() {
            return Err(ConfigError::Invalid {
                message: "repo.allowed_extensions must not be empty".to_string(),
            });
        }
        if self.analysis.default_score > 100 {
            return Err(ConfigError::Invalid {
                message: "analysis.default_score must be within 0..=100".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.repo.default_branch, "main");
        assert_eq!(config.repo.fallback_branch, "master");
        assert_eq!(config.repo.max_files, 20);
        assert_eq!(config.repo.max_file_size, 150_000);
        assert_eq!(config.analysis.timeout_secs, 30);
        assert_eq!(config.analysis.default_score, 70);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("revet.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[analysis]\nbase_url = \"http://analysis.internal:9000\"\ntimeout_secs = 5\n"
        )
        .unwrap();

        let config = CoreConfig::load(Some(&path)).unwrap();
        assert_eq!(config.analysis.base_url, "http://analysis.internal:9000");
        assert_eq!(config.analysis.timeout_secs, 5);
        // Unspecified sections keep their defaults.
        assert_eq!(config.repo.max_files, 20);
    }

    #[test]
    fn test_validate_rejects_zero_max_files() {
        let mut config = CoreConfig::default();
        config.repo.max_files = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let mut config = CoreConfig::default();
        config.repo.allowed_extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_default_score() {
        let mut config = CoreConfig::default();
        config.analysis.default_score = 101;
        assert!(config.validate().is_err());
    }
}
