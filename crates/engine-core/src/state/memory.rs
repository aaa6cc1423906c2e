use crate::{
    error::StateError,
    state::{RunStateStore, StateKey},
};
use async_trait::async_trait;
use model::core::timestamp::Timestamp;
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Process-local store, for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryRunStateStore {
    values: Mutex<HashMap<StateKey, Timestamp>>,
    saves: Mutex<Vec<(StateKey, Timestamp)>>,
    loads: AtomicUsize,
}

impl MemoryRunStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: StateKey, at: Timestamp) -> Self {
        let store = Self::default();
        store.values_mut().insert(key, at);
        store
    }

    pub fn get(&self, key: StateKey) -> Option<Timestamp> {
        self.values_mut().get(&key).copied()
    }

    /// Number of `load` calls so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Every `save` call, in order.
    pub fn saves(&self) -> Vec<(StateKey, Timestamp)> {
        self.saves
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn values_mut(&self) -> std::sync::MutexGuard<'_, HashMap<StateKey, Timestamp>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RunStateStore for MemoryRunStateStore {
    async fn load(&self, key: StateKey) -> Result<Option<Timestamp>, StateError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(key))
    }

    async fn save(&self, key: StateKey, at: Timestamp) -> Result<(), StateError> {
        self.values_mut().insert(key, at);
        self.saves
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((key, at));
        Ok(())
    }
}
