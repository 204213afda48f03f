//! Review record storage.
//!
//! The persistent store is an external collaborator behind the
//! [`ReviewStore`] trait: create/find/delete records by id and owner, plus
//! read/write of the owner's materialized statistics. Two implementations
//! ship with the crate — an in-memory store for tests and embedding, and a
//! JSON-file store with one document per user written atomically.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::persistence;
use crate::types::{ReviewRecord, UserId, UserStats};

/// Abstract contract for review persistence.
///
/// All record operations are owner-scoped: a record is only ever visible to
/// the user it belongs to.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError>;

    /// All of the user's records, newest first.
    async fn list(&self, user: &UserId) -> Result<Vec<ReviewRecord>, StoreError>;

    /// Look up one record by id, scoped to its owner.
    async fn find(&self, user: &UserId, id: Uuid) -> Result<Option<ReviewRecord>, StoreError>;

    /// Delete one record. Returns whether anything was removed.
    async fn delete(&self, user: &UserId, id: Uuid) -> Result<bool, StoreError>;

    /// Remove every record and the stats for a user (account deletion hook).
    async fn delete_all(&self, user: &UserId) -> Result<(), StoreError>;

    /// The user's current materialized stats; defaults when none stored.
    async fn load_stats(&self, user: &UserId) -> Result<UserStats, StoreError>;

    /// Overwrite the user's materialized stats.
    async fn save_stats(&self, user: &UserId, stats: UserStats) -> Result<(), StoreError>;
}

/// Per-user persisted state: the record set plus its materialized view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserDocument {
    records: Vec<ReviewRecord>,
    stats: UserStats,
}

/// In-memory store for tests and embedded use.
#[derive(Default)]
pub struct MemoryReviewStore {
    users: Mutex<HashMap<UserId, UserDocument>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        users
            .entry(record.owner.clone())
            .or_default()
            .records
            .push(record);
        Ok(())
    }

    async fn list(&self, user: &UserId) -> Result<Vec<ReviewRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        let mut records = users
            .get(user)
            .map(|doc| doc.records.clone())
            .unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn find(&self, user: &UserId, id: Uuid) -> Result<Option<ReviewRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .get(user)
            .and_then(|doc| doc.records.iter().find(|r| r.id == id).cloned()))
    }

    async fn delete(&self, user: &UserId, id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(doc) = users.get_mut(user) {
            let before = doc.records.len();
            doc.records.retain(|r| r.id != id);
            return Ok(doc.records.len() < before);
        }
        Ok(false)
    }

    async fn delete_all(&self, user: &UserId) -> Result<(), StoreError> {
        self.users.lock().unwrap().remove(user);
        Ok(())
    }

    async fn load_stats(&self, user: &UserId) -> Result<UserStats, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(user).map(|doc| doc.stats.clone()).unwrap_or_default())
    }

    async fn save_stats(&self, user: &UserId, stats: UserStats) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        users.entry(user.clone()).or_default().stats = stats;
        Ok(())
    }
}

/// JSON-file store: one document per user under a data directory.
///
/// A process-wide mutex serializes load-mutate-save cycles; writes are
/// atomic via the `persistence` helpers.
pub struct JsonReviewStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonReviewStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock: Mutex::new(()),
        }
    }

    fn user_path(&self, user: &UserId) -> PathBuf {
        // User ids come from an external identity system; keep file names
        // conservative regardless of what they contain.
        let safe: String = user
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.data_dir.join(format!("{safe}.json"))
    }

    fn load_document(&self, user: &UserId) -> Result<UserDocument, StoreError> {
        persistence::load_json(&self.user_path(user))
            .map(Option::unwrap_or_default)
            .map_err(|e| StoreError::Persistence {
                message: e.to_string(),
            })
    }

    fn save_document(&self, user: &UserId, doc: &UserDocument) -> Result<(), StoreError> {
        persistence::atomic_write_json(&self.user_path(user), doc).map_err(|e| {
            StoreError::Persistence {
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl ReviewStore for JsonReviewStore {
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let owner = record.owner.clone();
        let mut doc = self.load_document(&owner)?;
        doc.records.push(record);
        self.save_document(&owner, &doc)
    }

    async fn list(&self, user: &UserId) -> Result<Vec<ReviewRecord>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut records = self.load_document(user)?.records;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn find(&self, user: &UserId, id: Uuid) -> Result<Option<ReviewRecord>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let doc = self.load_document(user)?;
        Ok(doc.records.into_iter().find(|r| r.id == id))
    }

    async fn delete(&self, user: &UserId, id: Uuid) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut doc = self.load_document(user)?;
        let before = doc.records.len();
        doc.records.retain(|r| r.id != id);
        let removed = doc.records.len() < before;
        if removed {
            self.save_document(user, &doc)?;
        }
        Ok(removed)
    }

    async fn delete_all(&self, user: &UserId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let path = self.user_path(user);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| StoreError::Persistence {
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    async fn load_stats(&self, user: &UserId) -> Result<UserStats, StoreError> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load_document(user)?.stats)
    }

    async fn save_stats(&self, user: &UserId, stats: UserStats) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut doc = self.load_document(user)?;
        doc.stats = stats;
        self.save_document(user, &doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisReport, OriginKind};
    use chrono::{Duration, Utc};

    fn record(owner: &str, score: u8, age_secs: i64) -> ReviewRecord {
        ReviewRecord {
            id: Uuid::new_v4(),
            owner: UserId::new(owner),
            code: "x = 1".into(),
            language: "python".into(),
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
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    async fn exercise_store(store: &dyn ReviewStore) {
        let user = UserId::new("u1");
        let other = UserId::new("u2");

        let older = record("u1", 80, 60);
        let newer = record("u1", 90, 0);
        let older_id = older.id;
        store.insert(older).await.unwrap();
        store.insert(newer.clone()).await.unwrap();
        store.insert(record("u2", 50, 0)).await.unwrap();

        // Newest first, owner-scoped.
        let listed = store.list(&user).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);

        // Find respects ownership.
        assert!(store.find(&user, older_id).await.unwrap().is_some());
        assert!(store.find(&other, older_id).await.unwrap().is_none());

        // Delete respects ownership and reports whether anything happened.
        assert!(!store.delete(&other, older_id).await.unwrap());
        assert!(store.delete(&user, older_id).await.unwrap());
        assert!(!store.delete(&user, older_id).await.unwrap());
        assert_eq!(store.list(&user).await.unwrap().len(), 1);

        // Stats round-trip.
        assert_eq!(store.load_stats(&user).await.unwrap(), UserStats::default());
        let stats = UserStats {
            total_reviews: 1,
            average_score: 90.0,
        };
        store.save_stats(&user, stats.clone()).await.unwrap();
        assert_eq!(store.load_stats(&user).await.unwrap(), stats);

        // Account deletion wipes records and stats.
        store.delete_all(&user).await.unwrap();
        assert!(store.list(&user).await.unwrap().is_empty());
        assert_eq!(store.load_stats(&user).await.unwrap(), UserStats::default());
        // Other users are untouched.
        assert_eq!(store.list(&other).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        exercise_store(&MemoryReviewStore::new()).await;
    }

    #[tokio::test]
    async fn test_json_store_contract() {
        let dir = tempfile::TempDir::new().unwrap();
        exercise_store(&JsonReviewStore::new(dir.path())).await;
    }

    #[tokio::test]
    async fn test_json_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let user = UserId::new("u1");
        {
            let store = JsonReviewStore::new(dir.path());
            store.insert(record("u1", 75, 0)).await.unwrap();
        }
        let store = JsonReviewStore::new(dir.path());
        assert_eq!(store.list(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_store_sanitizes_user_ids() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonReviewStore::new(dir.path());
        let user = UserId::new("../evil/../../id");
        store
            .save_stats(&user, UserStats::default())
            .await
            .unwrap();
        // The written file stays inside the data directory.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
