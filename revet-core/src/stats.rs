//! User statistics: recompute-from-source-of-truth aggregation.
//!
//! Stats are a materialized view over the user's full record set, recomputed
//! after every review creation and deletion. There is deliberately no
//! incremental counter anywhere: each recompute reads the then-current
//! record set, so cached and true aggregates cannot drift and any interleaved
//! write is corrected by the next mutation.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::store::ReviewStore;
use crate::types::{AnalyticsSummary, LanguageCount, UserId, UserStats};

/// Round to two decimal places, the precision stats are stored at.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recompute and persist the user's stats from their full record set.
///
/// Count and arithmetic mean of `score`; both zero when the user has no
/// records. Idempotent: with no intervening record change, repeated calls
/// yield identical output.
pub async fn recompute_stats(
    store: &dyn ReviewStore,
    user: &UserId,
) -> Result<UserStats, StoreError> {
    let records = store.list(user).await?;
    let total = records.len() as u64;
    let average_score = if total == 0 {
        0.0
    } else {
        let sum: u64 = records.iter().map(|r| r.report.score as u64).sum();
        round2(sum as f64 / total as f64)
    };

    let stats = UserStats {
        total_reviews: total,
        average_score,
    };
    store.save_stats(user, stats.clone()).await?;
    Ok(stats)
}

/// Derive a one-pass analytics summary over the user's review history.
pub async fn analytics_summary(
    store: &dyn ReviewStore,
    user: &UserId,
) -> Result<AnalyticsSummary, StoreError> {
    let records = store.list(user).await?;
    if records.is_empty() {
        return Ok(AnalyticsSummary::default());
    }

    let total = records.len() as u64;
    let mut sum: u64 = 0;
    let mut best = u8::MIN;
    let mut worst = u8::MAX;
    let mut by_language: HashMap<&str, u64> = HashMap::new();

    for record in &records {
        let score = record.report.score;
        sum += score as u64;
        best = best.max(score);
        worst = worst.min(score);
        *by_language.entry(record.language.as_str()).or_default() += 1;
    }

    let mut languages: Vec<LanguageCount> = by_language
        .into_iter()
        .map(|(language, count)| LanguageCount {
            language: language.to_string(),
            count,
        })
        .collect();
    // Most frequent first; ties broken by name for determinism.
    languages.sort_by(|a, b| b.count.cmp(&a.count).then(a.language.cmp(&b.language)));

    Ok(AnalyticsSummary {
        total_reviews: total,
        average_score: round2(sum as f64 / total as f64),
        best_score: best,
        worst_score: worst,
        languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryReviewStore;
    use crate::types::{AnalysisReport, OriginKind, ReviewRecord};
    use chrono::Utc;
    use uuid::Uuid;

    fn record(owner: &str, language: &str, score: u8) -> ReviewRecord {
        ReviewRecord {
            id: Uuid::new_v4(),
            owner: UserId::new(owner),
            code: "x".into(),
            language: language.into(),
            lines_of_code: 1,
            display_name: String::new(),
            origin: OriginKind::Paste,
            repository_ref: None,
            report: AnalysisReport {
                bugs: String::new(),
                improvements: String::new(),
                time_complexity: "O(1)".into(),
                space_complexity: "O(1)".into(),
                better_code: String::new(),
                score,
                code_smells: String::new(),
                security_warnings: String::new(),
                duplicate_code: String::new(),
                performance_suggestions: String::new(),
                naming_suggestions: String::new(),
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_recompute_empty_user_is_zero() {
        let store = MemoryReviewStore::new();
        let user = UserId::new("u1");
        let stats = recompute_stats(&store, &user).await.unwrap();
        assert_eq!(stats, UserStats::default());
    }

    #[tokio::test]
    async fn test_recompute_mean_rounds_to_two_decimals() {
        let store = MemoryReviewStore::new();
        let user = UserId::new("u1");
        for score in [80, 85, 90] {
            store.insert(record("u1", "python", score)).await.unwrap();
        }
        // (80 + 85 + 90) / 3 = 85.0
        let stats = recompute_stats(&store, &user).await.unwrap();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_score, 85.0);

        store.insert(record("u1", "python", 81)).await.unwrap();
        // 336 / 4 = 84.0; then with one more 70: 406 / 5 = 81.2
        store.insert(record("u1", "python", 70)).await.unwrap();
        let stats = recompute_stats(&store, &user).await.unwrap();
        assert_eq!(stats.average_score, 81.2);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let store = MemoryReviewStore::new();
        let user = UserId::new("u1");
        store.insert(record("u1", "c", 77)).await.unwrap();

        let first = recompute_stats(&store, &user).await.unwrap();
        let second = recompute_stats(&store, &user).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.load_stats(&user).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_recompute_after_delete_matches_remaining_set() {
        // User with [80, 90] deletes the 90: stats become {1, 80.00}.
        let store = MemoryReviewStore::new();
        let user = UserId::new("u1");
        store.insert(record("u1", "python", 80)).await.unwrap();
        let ninety = record("u1", "python", 90);
        let ninety_id = ninety.id;
        store.insert(ninety).await.unwrap();
        recompute_stats(&store, &user).await.unwrap();

        assert!(store.delete(&user, ninety_id).await.unwrap());
        let stats = recompute_stats(&store, &user).await.unwrap();
        assert_eq!(stats.total_reviews, 1);
        assert_eq!(stats.average_score, 80.0);
    }

    #[tokio::test]
    async fn test_analytics_summary() {
        let store = MemoryReviewStore::new();
        let user = UserId::new("u1");
        store.insert(record("u1", "python", 60)).await.unwrap();
        store.insert(record("u1", "python", 90)).await.unwrap();
        store.insert(record("u1", "javascript", 75)).await.unwrap();

        let summary = analytics_summary(&store, &user).await.unwrap();
        assert_eq!(summary.total_reviews, 3);
        assert_eq!(summary.average_score, 75.0);
        assert_eq!(summary.best_score, 90);
        assert_eq!(summary.worst_score, 60);
        assert_eq!(summary.languages.len(), 2);
        assert_eq!(summary.languages[0].language, "python");
        assert_eq!(summary.languages[0].count, 2);
    }

    #[tokio::test]
    async fn test_analytics_empty_user() {
        let store = MemoryReviewStore::new();
        let summary = analytics_summary(&store, &UserId::new("nobody"))
            .await
            .unwrap();
        assert_eq!(summary, AnalyticsSummary::default());
    }
}
