//! Persistent user store
//!
//! The single shared mutable resource in the process: both the scheduler
//! task and the command handler mutate subscriber records through this
//! store. A whole-map async mutex serializes every get-mutate-save sequence,
//! so concurrent writers cannot interleave field updates on one record and
//! every save observes a consistent snapshot.
//!
//! Persistence is best-effort: saves fully overwrite the state file, a
//! failed save is logged and never rolls back in-memory state, and a missing
//! file on startup is the normal first-run case.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use tokio::sync::Mutex;

use super::record::UserRecord;

/// Thread-safe mapping from user id to [`UserRecord`], with load/save.
pub struct UserStore {
    path: PathBuf,
    users: Mutex<HashMap<u64, UserRecord>>,
}

impl UserStore {
    /// Load the store from `path`.
    ///
    /// A missing file yields an empty store. An unreadable file degrades to
    /// an empty store with a warning. Individual unparseable entries are
    /// skipped so one corrupt record cannot drop the others.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let users = match fs::read_to_string(&path) {
            Ok(data) => {
                let users = parse_users(&data);
                info!("Loaded {} users from {}", users.len(), path.display());
                users
            }
            Err(e) => {
                info!(
                    "No user file at {} ({e}) - starting with an empty store",
                    path.display()
                );
                HashMap::new()
            }
        };

        UserStore {
            path,
            users: Mutex::new(users),
        }
    }

    /// Number of stored users, active or not.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }

    /// Snapshot of a single record.
    pub async fn get(&self, id: u64) -> Option<UserRecord> {
        self.users.lock().await.get(&id).cloned()
    }

    /// Create-if-absent and activate. Returns true when the record was
    /// newly created.
    pub async fn subscribe(&self, id: u64, user_name: &str) -> bool {
        let mut users = self.users.lock().await;
        let created = !users.contains_key(&id);
        let record = users
            .entry(id)
            .or_insert_with(|| UserRecord::new(id, user_name));
        record.active = true;
        self.persist(&users);
        created
    }

    /// Apply `f` to the record for `id` and persist, all under the store
    /// lock. Returns `None` (and persists nothing) when the user is unknown.
    pub async fn update<F, R>(&self, id: u64, f: F) -> Option<R>
    where
        F: FnOnce(&mut UserRecord) -> R,
    {
        let mut users = self.users.lock().await;
        let out = match users.get_mut(&id) {
            Some(record) => f(record),
            None => return None,
        };
        self.persist(&users);
        Some(out)
    }

    /// Run `f` with exclusive access to the full user map.
    ///
    /// Does not persist. Callers that mutate records must follow up with
    /// [`UserStore::save`] once their surrounding operation completes.
    pub async fn with_users<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<u64, UserRecord>) -> R,
    {
        let mut users = self.users.lock().await;
        f(&mut users)
    }

    /// Persist the current state to disk.
    pub async fn save(&self) {
        let users = self.users.lock().await;
        self.persist(&users);
    }

    /// Write a snapshot while the caller holds the lock, keeping file writes
    /// serialized with mutations.
    fn persist(&self, users: &HashMap<u64, UserRecord>) {
        let json = match serde_json::to_string_pretty(users) {
            Ok(json) => json,
            Err(e) => {
                error!("Could not serialize user state: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            error!("Could not save user state to {}: {e}", self.path.display());
        }
    }
}

/// Decode the persisted map entry by entry.
///
/// The file maps string-encoded user ids to record objects. Entries that do
/// not decode are skipped with a warning; the record's own `UserId` field is
/// authoritative over the map key.
fn parse_users(data: &str) -> HashMap<u64, UserRecord> {
    let raw: HashMap<String, serde_json::Value> = match serde_json::from_str(data) {
        Ok(map) => map,
        Err(e) => {
            warn!("User file is unreadable ({e}) - starting with an empty store");
            return HashMap::new();
        }
    };

    let mut users = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        match serde_json::from_value::<UserRecord>(value) {
            Ok(record) => {
                users.insert(record.id, record);
            }
            Err(e) => warn!("Skipping unparseable user entry {key}: {e}"),
        }
    }
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_in(dir: &tempfile::TempDir) -> UserStore {
        UserStore::load(dir.path().join("users.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_subscribe_creates_then_reactivates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        assert!(store.subscribe(1, "ada").await);
        store.update(1, |rec| rec.active = false).await;
        assert!(!store.subscribe(1, "ada").await);

        let rec = store.get(1).await.unwrap();
        assert!(rec.active);
        assert_eq!(rec.user_name, "ada");
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert!(store.update(99, |rec| rec.active = false).await.is_none());
    }

    #[tokio::test]
    async fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("users.json");

        let store = UserStore::load(&path);
        store.subscribe(42, "ada").await;
        store
            .update(42, |rec| {
                rec.interval_minutes = 30;
                rec.sent_indices.insert(2);
            })
            .await;

        let reloaded = UserStore::load(&path);
        let rec = reloaded.get(42).await.unwrap();
        assert_eq!(rec.interval_minutes, 30);
        assert!(rec.sent_indices.contains(&2));
    }

    #[tokio::test]
    async fn test_corrupt_entry_does_not_drop_valid_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("users.json");

        let store = UserStore::load(&path);
        store.subscribe(1, "ada").await;
        store.subscribe(2, "grace").await;

        // Wreck one entry in place
        let data = fs::read_to_string(&path).unwrap();
        let mut map: HashMap<String, serde_json::Value> = serde_json::from_str(&data).unwrap();
        map.insert("1".to_string(), serde_json::json!({ "UserId": "not a number" }));
        fs::write(&path, serde_json::to_string_pretty(&map).unwrap()).unwrap();

        let reloaded = UserStore::load(&path);
        assert_eq!(reloaded.len().await, 1);
        assert!(reloaded.get(2).await.is_some());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("users.json");
        fs::write(&path, "total garbage").unwrap();

        let store = UserStore::load(&path);
        assert!(store.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(store_in(&dir));
        store.subscribe(7, "ada").await;

        let evens = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in (0..100).step_by(2) {
                    store
                        .update(7, |rec| {
                            rec.sent_indices.insert(i);
                        })
                        .await;
                }
            })
        };
        let odds = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in (1..100).step_by(2) {
                    store
                        .update(7, |rec| {
                            rec.sent_indices.insert(i);
                        })
                        .await;
                }
            })
        };
        evens.await.unwrap();
        odds.await.unwrap();

        let rec = store.get(7).await.unwrap();
        assert_eq!(rec.sent_indices.len(), 100);

        // The file on disk is a consistent snapshot of the same state
        let reloaded = store_in(&dir);
        assert_eq!(reloaded.get(7).await.unwrap().sent_indices.len(), 100);
    }
}
