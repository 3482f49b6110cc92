use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::usecase::session::SessionContext;

/// One browser session's auth state plus bookkeeping for restore and idle
/// eviction.
#[derive(Debug)]
pub struct SessionEntry {
    pub context: tokio::sync::Mutex<SessionContext>,
    restoring: AtomicBool,
    touched: Mutex<Instant>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            context: tokio::sync::Mutex::new(SessionContext::new()),
            restoring: AtomicBool::new(false),
            touched: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.touched.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.touched.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring.load(Ordering::Acquire)
    }

    /// Mark the session as being restored. `None` if another request already is.
    pub fn begin_restore(&self) -> Option<RestoringGuard<'_>> {
        self.restoring
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RestoringGuard { entry: self })
    }
}

/// Clears the restoring flag when dropped.
pub struct RestoringGuard<'a> {
    entry: &'a SessionEntry,
}

impl Drop for RestoringGuard<'_> {
    fn drop(&mut self) {
        self.entry.restoring.store(false, Ordering::Release);
    }
}

/// Maps `bazaar_session` cookie values to session state.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Arc<SessionEntry>>>>,
}

impl SessionRegistry {
    pub fn get(&self, key: Uuid) -> Option<Arc<SessionEntry>> {
        let entry = self
            .inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned();
        if let Some(entry) = &entry {
            entry.touch();
        }
        entry
    }

    /// The session behind `key`, or a fresh one under a new key when the key is
    /// missing or unknown. Client-chosen keys are never adopted.
    pub fn get_or_create(&self, key: Option<Uuid>) -> (Uuid, Arc<SessionEntry>) {
        if let Some(entry) = key.and_then(|k| self.get(k).map(|e| (k, e))) {
            return entry;
        }
        let key = Uuid::new_v4();
        let entry = Arc::new(SessionEntry::new());
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, Arc::clone(&entry));
        (key, entry)
    }

    pub fn remove(&self, key: Uuid) -> Option<Arc<SessionEntry>> {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key)
    }

    /// Drop sessions idle for at least `max_idle`. Returns how many were evicted.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = map.len();
        map.retain(|_, entry| entry.idle_for(now) < max_idle);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
