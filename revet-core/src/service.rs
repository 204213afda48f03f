//! Review orchestrator: the end-to-end request flow.
//!
//! Composes the input resolver, analysis engine, store, and notification
//! sink. Any failure before the record is persisted aborts the operation
//! with no partial state; the analysis engine itself cannot fail, and a
//! failing notification sink is logged and ignored.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisEngine, Analyzer, RemoteAnalyzer};
use crate::config::CoreConfig;
use crate::error::{Result, RevetError, StoreError};
use crate::language;
use crate::notify::{LogSink, Notification, NotificationCategory, NotificationSink};
use crate::repo::{GithubHost, RepoAggregator, RepositoryHost};
use crate::resolver::InputResolver;
use crate::stats;
use crate::store::{JsonReviewStore, MemoryReviewStore, ReviewStore};
use crate::types::{AnalyticsSummary, ReviewRecord, ReviewRequest, UserId, UserStats};

/// The core's surface to its caller.
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
    resolver: InputResolver,
    engine: AnalysisEngine,
    sink: Arc<dyn NotificationSink>,
}

impl ReviewService {
    /// Assemble a service from explicit collaborators.
    ///
    /// This is the seam for tests: any collaborator can be a fake.
    pub fn new(
        store: Arc<dyn ReviewStore>,
        host: Arc<dyn RepositoryHost>,
        analyzer: Arc<dyn Analyzer>,
        sink: Arc<dyn NotificationSink>,
        config: &CoreConfig,
    ) -> Self {
        let aggregator = Arc::new(RepoAggregator::new(host, config.repo.clone()));
        Self {
            store,
            resolver: InputResolver::new(aggregator),
            engine: AnalysisEngine::new(analyzer),
            sink,
        }
    }

    /// Assemble a service with the default collaborators: GitHub host,
    /// remote analyzer, log sink, and a JSON-file store when `data_dir` is
    /// configured (in-memory otherwise).
    pub fn from_config(config: &CoreConfig) -> Result<Self> {
        config.validate()?;
        let host: Arc<dyn RepositoryHost> = Arc::new(GithubHost::new(&config.repo)?);
        let analyzer: Arc<dyn Analyzer> = Arc::new(RemoteAnalyzer::new(&config.analysis)?);
        let store: Arc<dyn ReviewStore> = match &config.data_dir {
            Some(dir) => Arc::new(JsonReviewStore::new(dir.clone())),
            None => Arc::new(MemoryReviewStore::new()),
        };
        Ok(Self::new(store, host, analyzer, Arc::new(LogSink), config))
    }

    /// Run the full pipeline for one review request.
    ///
    /// Resolve input, fail fast on empty code, analyze, persist, notify,
    /// recompute the owner's stats, and return the persisted record.
    pub async fn create_review(
        &self,
        user: &UserId,
        request: &ReviewRequest,
    ) -> Result<ReviewRecord> {
        let artifact = self.resolver.resolve(request).await?;
        let report = self.engine.analyze(&artifact).await;

        let record = ReviewRecord {
            id: Uuid::new_v4(),
            owner: user.clone(),
            lines_of_code: language::count_code_lines(&artifact.text),
            code: artifact.text,
            language: artifact.language,
            display_name: artifact.display_name,
            origin: artifact.origin,
            repository_ref: artifact.repository_ref,
            report,
            created_at: Utc::now(),
        };
        self.store.insert(record.clone()).await?;

        let notification = Notification {
            user: user.clone(),
            title: "Review Completed".to_string(),
            message: format!(
                "Your {} code review scored {}/100.",
                record.language, record.report.score
            ),
            category: NotificationCategory::Success,
        };
        if let Err(e) = self.sink.publish(notification).await {
            warn!(user = %user, error = %e, "Notification sink failed, review unaffected");
        }

        let stats = stats::recompute_stats(self.store.as_ref(), user).await?;
        info!(
            user = %user,
            review = %record.id,
            language = %record.language,
            score = record.report.score,
            total_reviews = stats.total_reviews,
            "Review created"
        );

        Ok(record)
    }

    /// The user's reviews, newest first.
    pub async fn list_reviews(&self, user: &UserId) -> Result<Vec<ReviewRecord>> {
        Ok(self.store.list(user).await?)
    }

    /// One review by id, owner-scoped.
    pub async fn get_review(&self, user: &UserId, id: Uuid) -> Result<ReviewRecord> {
        self.store
            .find(user, id)
            .await?
            .ok_or_else(|| RevetError::Store(StoreError::ReviewNotFound { id: id.to_string() }))
    }

    /// Delete one review and recompute the owner's stats.
    pub async fn delete_review(&self, user: &UserId, id: Uuid) -> Result<UserStats> {
        let removed = self.store.delete(user, id).await?;
        if !removed {
            return Err(RevetError::Store(StoreError::ReviewNotFound {
                id: id.to_string(),
            }));
        }
        Ok(stats::recompute_stats(self.store.as_ref(), user).await?)
    }

    /// Remove all of a user's reviews and stats (account deletion hook).
    pub async fn delete_all_reviews(&self, user: &UserId) -> Result<()> {
        self.store.delete_all(user).await?;
        Ok(())
    }

    /// The user's current materialized stats.
    pub async fn stats(&self, user: &UserId) -> Result<UserStats> {
        Ok(self.store.load_stats(user).await?)
    }

    /// Recompute stats from the record set (independently callable utility).
    pub async fn recompute_stats(&self, user: &UserId) -> Result<UserStats> {
        Ok(stats::recompute_stats(self.store.as_ref(), user).await?)
    }

    /// One-pass analytics over the user's review history.
    pub async fn analytics(&self, user: &UserId) -> Result<AnalyticsSummary> {
        Ok(stats::analytics_summary(self.store.as_ref(), user).await?)
    }
}
