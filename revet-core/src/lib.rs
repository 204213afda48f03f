//! # Revet Core
//!
//! Core library for the Revet code review platform: the
//! ingestion-classification-analysis-aggregation pipeline.
//!
//! A review request carries code from one of three origins (pasted text, an
//! uploaded file, or a remote repository). The pipeline resolves exactly one
//! origin into a normalized artifact, classifies its language when none was
//! supplied, obtains a structured quality report from a remote analysis
//! service (falling back to a deterministic local heuristic when the service
//! is unavailable), persists the review, and recomputes the owner's running
//! statistics from the full record set.
//!
//! External collaborators — the repository host, the analysis service, the
//! persistent store, and the notification sink — sit behind traits so the
//! whole pipeline runs against injected fakes in tests.

pub mod analysis;
pub mod config;
pub mod error;
pub mod language;
pub mod notify;
pub mod persistence;
pub mod repo;
pub mod resolver;
pub mod service;
pub mod stats;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root.
pub use analysis::{AnalysisEngine, Analyzer, HeuristicAnalyzer, RemoteAnalyzer};
pub use config::{AnalysisConfig, CoreConfig, RepoConfig};
pub use error::{Result, RevetError};
pub use language::classify as classify_language;
pub use notify::{LogSink, Notification, NotificationCategory, NotificationSink};
pub use repo::{GithubHost, RepoAggregator, RepoReference, RepositoryHost};
pub use resolver::InputResolver;
pub use service::ReviewService;
pub use store::{JsonReviewStore, MemoryReviewStore, ReviewStore};
pub use types::{
    AnalysisReport, AnalyticsSummary, CodeArtifact, OriginKind, ReviewRecord, ReviewRequest,
    UserId, UserStats,
};
