//! In-memory capability repositories that count writes.

use agora_core::{Profile, TableIdentifier};
use agora_service::{ProfileResolver, ServiceError, ServiceResult};
use agora_store::{
    DeletableRepo, LikeableRepo, OwnableRepo, RecommendableRepo, StoreError, StoreResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn broken() -> StoreError {
    StoreError::Internal("backend unavailable".to_string())
}

/// Like relation kept in a vector; duplicates are allowed like the SQL table.
#[allow(dead_code)]
pub struct MemoryLikes {
    target: TableIdentifier,
    rows: Mutex<Vec<(String, String)>>,
    pub writes: AtomicUsize,
    pub fail: AtomicBool,
}

#[allow(dead_code)]
impl MemoryLikes {
    pub fn new(target: &TableIdentifier) -> Arc<Self> {
        Arc::new(Self {
            target: target.clone(),
            rows: Mutex::new(Vec::new()),
            writes: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        })
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(broken());
        }
        Ok(())
    }
}

#[async_trait]
impl LikeableRepo for MemoryLikes {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn is_liked(&self, target_id: &str, user_id: &str) -> StoreResult<bool> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|(t, u)| t == target_id && u == user_id))
    }

    async fn like(&self, target_id: &str, user_id: &str) -> StoreResult<()> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .unwrap()
            .push((target_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn unlike(&self, target_id: &str, user_id: &str) -> StoreResult<()> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .unwrap()
            .retain(|(t, u)| !(t == target_id && u == user_id));
        Ok(())
    }

    async fn likes_count(&self, target_id: &str) -> StoreResult<u64> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|(t, _)| t == target_id).count() as u64)
    }

    async fn user_likes_count(&self, user_id: &str) -> StoreResult<u64> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|(_, u)| u == user_id).count() as u64)
    }

    async fn user_likes(&self, user_id: &str) -> StoreResult<Vec<String>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|(_, u)| u == user_id)
            .map(|(t, _)| t.clone())
            .collect())
    }
}

/// Target table rows (id -> owner) serving both owner lookups and deletes.
#[allow(dead_code)]
pub struct MemoryTargets {
    target: TableIdentifier,
    rows: Mutex<HashMap<String, String>>,
    pub deletes: AtomicUsize,
    pub fail: AtomicBool,
}

#[allow(dead_code)]
impl MemoryTargets {
    pub fn new(target: &TableIdentifier, rows: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            target: target.clone(),
            rows: Mutex::new(
                rows.iter()
                    .map(|(id, owner)| (id.to_string(), owner.to_string()))
                    .collect(),
            ),
            deletes: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        })
    }

    pub fn contains(&self, target_id: &str) -> bool {
        self.rows.lock().unwrap().contains_key(target_id)
    }
}

#[async_trait]
impl OwnableRepo for MemoryTargets {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn get_owner(&self, target_id: &str) -> StoreResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(broken());
        }
        self.rows
            .lock()
            .unwrap()
            .get(target_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{} {target_id}", self.target)))
    }
}

#[async_trait]
impl DeletableRepo for MemoryTargets {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn delete(&self, target_id: &str) -> StoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(broken());
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        match self.rows.lock().unwrap().remove(target_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("{} {target_id}", self.target))),
        }
    }
}

/// Recommendations returned in stored order, and a fixed global pool for filler.
#[allow(dead_code)]
pub struct MemoryRecs {
    target: TableIdentifier,
    stored: Mutex<HashMap<String, Vec<String>>>,
    pool: Vec<String>,
    pub random_calls: AtomicUsize,
    pub fail_recs: AtomicBool,
    pub fail_random: AtomicBool,
}

#[allow(dead_code)]
impl MemoryRecs {
    pub fn new(target: &TableIdentifier, pool: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            target: target.clone(),
            stored: Mutex::new(HashMap::new()),
            pool: pool.iter().map(|id| id.to_string()).collect(),
            random_calls: AtomicUsize::new(0),
            fail_recs: AtomicBool::new(false),
            fail_random: AtomicBool::new(false),
        })
    }

    pub fn with_stored(self: Arc<Self>, user_id: &str, ids: &[&str]) -> Arc<Self> {
        self.stored.lock().unwrap().insert(
            user_id.to_string(),
            ids.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    pub fn random_calls(&self) -> usize {
        self.random_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecommendableRepo for MemoryRecs {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn get_recs(&self, user_id: &str, count: u32) -> StoreResult<Vec<String>> {
        if self.fail_recs.load(Ordering::SeqCst) {
            return Err(broken());
        }
        let stored = self.stored.lock().unwrap();
        Ok(stored
            .get(user_id)
            .map(|ids| ids.iter().take(count as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_random(&self, count: u32) -> StoreResult<Vec<String>> {
        self.random_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_random.load(Ordering::SeqCst) {
            return Err(broken());
        }
        Ok(self.pool.iter().take(count as usize).cloned().collect())
    }

    async fn set_recs(&self, user_id: &str, target_ids: &[String]) -> StoreResult<()> {
        if self.fail_recs.load(Ordering::SeqCst) {
            return Err(broken());
        }
        self.stored
            .lock()
            .unwrap()
            .insert(user_id.to_string(), target_ids.to_vec());
        Ok(())
    }

    async fn recs_count(&self, user_id: &str) -> StoreResult<u64> {
        let stored = self.stored.lock().unwrap();
        Ok(stored.get(user_id).map(|ids| ids.len()).unwrap_or(0) as u64)
    }
}

/// Profile resolver backed by a fixed map.
#[allow(dead_code)]
pub struct StaticProfiles {
    profiles: HashMap<String, Profile>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl StaticProfiles {
    pub fn new(user_ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            profiles: user_ids
                .iter()
                .map(|id| (id.to_string(), crate::common::profile(id)))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileResolver for StaticProfiles {
    async fn resolve(&self, user_id: &str, _caller_id: &str) -> ServiceResult<Profile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("profile {user_id}")))
    }
}
