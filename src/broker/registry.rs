//! Topic registry
//!
//! Maps topic names to their state and owns the concurrency guard for each
//! topic. Topics are created lazily on first touch by any operation and live
//! for the process lifetime; nothing ever removes one.
//!
//! Locking discipline: steady-state lookups take the registry read lock
//! only; create-if-absent takes the write lock with a double-check so that
//! many callers racing on the same new name still get one single instance.
//! Each topic carries its own `Mutex`, so operations on different topics
//! never contend with each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::Notify;

use crate::broker::topic::TopicState;

/// One registered topic: its state behind the per-topic lock, plus the
/// notifier used to wake consumers blocked on an empty queue.
#[derive(Debug, Default)]
pub struct TopicEntry {
    pub state: Mutex<TopicState>,
    pub available: Notify,
}

impl TopicEntry {
    fn new(name: &str) -> Self {
        Self {
            state: Mutex::new(TopicState::new(name)),
            available: Notify::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TopicRegistry {
    topics: RwLock<HashMap<String, Arc<TopicEntry>>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `name`, creating it on first touch. Concurrent
    /// calls for the same name all receive the same instance. Topic names
    /// are free-form non-empty strings, case-sensitive; no length limit is
    /// enforced.
    pub fn get_or_create(&self, name: &str) -> Arc<TopicEntry> {
        if let Some(entry) = self.topics.read().unwrap().get(name) {
            return entry.clone();
        }
        let mut topics = self.topics.write().unwrap();
        topics
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(TopicEntry::new(name)))
            .clone()
    }

    /// Look up an existing topic without creating it.
    pub fn get(&self, name: &str) -> Option<Arc<TopicEntry>> {
        self.topics.read().unwrap().get(name).cloned()
    }

    /// Snapshot of every registered topic, for housekeeping passes that
    /// visit topics one at a time without holding the registry lock.
    pub fn entries(&self) -> Vec<Arc<TopicEntry>> {
        self.topics.read().unwrap().values().cloned().collect()
    }
}
