//! Quality analysis of code artifacts.
//!
//! A single [`Analyzer`] capability with two implementations behind one
//! interface: the remote analysis service and the deterministic local
//! heuristic. [`AnalysisEngine`] composes them as a strategy substitution —
//! any remote failure (transport error, non-2xx status, timeout, parse
//! error) falls through to the heuristic, so the engine's contract is
//! infallible for a well-formed artifact and callers never learn which
//! implementation ran.

pub mod heuristic;
pub mod remote;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::types::{AnalysisReport, CodeArtifact};

pub use heuristic::HeuristicAnalyzer;
pub use remote::RemoteAnalyzer;

/// Strategy seam for quality analysis.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Produce a structured quality report for the artifact.
    async fn analyze(&self, artifact: &CodeArtifact) -> Result<AnalysisReport, AnalysisError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// Remote-first analysis with a local fallback that cannot fail.
pub struct AnalysisEngine {
    primary: Arc<dyn Analyzer>,
    fallback: HeuristicAnalyzer,
}

impl AnalysisEngine {
    pub fn new(primary: Arc<dyn Analyzer>) -> Self {
        Self {
            primary,
            fallback: HeuristicAnalyzer::new(),
        }
    }

    /// Analyze the artifact, absorbing any primary-path failure.
    pub async fn analyze(&self, artifact: &CodeArtifact) -> AnalysisReport {
        match self.primary.analyze(artifact).await {
            Ok(report) => {
                debug!(analyzer = %self.primary.name(), score = report.score, "Analysis complete");
                report
            }
            Err(e) => {
                warn!(
                    analyzer = %self.primary.name(),
                    error = %e,
                    "Analysis service unavailable, using heuristic fallback"
                );
                self.fallback.report(&artifact.text)
            }
        }
    }
}
