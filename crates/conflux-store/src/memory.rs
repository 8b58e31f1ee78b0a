use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use conflux_types::{Context, Message};

use crate::error::StoreResult;
use crate::traits::EventStore;

/// In-memory, HashMap-based event store.
///
/// Intended for tests and embedding. Content is held behind a `RwLock` for
/// safe concurrent access and cloned on read. Listing results are sorted by
/// source so callers see a deterministic order.
pub struct InMemoryEventStore {
    slots: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl InMemoryEventStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of occupied `(key, source)` slots.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .expect("lock poisoned")
            .values()
            .map(|sources| sources.len())
            .sum()
    }

    /// Returns `true` if nothing has been persisted.
    pub fn is_empty(&self) -> bool {
        self.slots.read().expect("lock poisoned").is_empty()
    }

    /// Remove all stored events.
    pub fn clear(&self) {
        self.slots.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all keys with at least one slot.
    pub fn all_keys(&self) -> Vec<String> {
        let map = self.slots.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn persist(
        &self,
        _ctx: &Context,
        key: &str,
        source: &str,
        content: &str,
    ) -> StoreResult<()> {
        let mut map = self.slots.write().expect("lock poisoned");
        map.entry(key.to_owned())
            .or_default()
            .insert(source.to_owned(), content.to_owned());
        Ok(())
    }

    async fn look_up(
        &self,
        _ctx: &Context,
        key: &str,
        source: &str,
    ) -> StoreResult<Option<Message>> {
        let map = self.slots.read().expect("lock poisoned");
        Ok(map
            .get(key)
            .and_then(|sources| sources.get(source))
            .map(|content| Message::new(key, source, content.clone())))
    }

    async fn look_up_by_key(&self, _ctx: &Context, key: &str) -> StoreResult<Vec<Message>> {
        let map = self.slots.read().expect("lock poisoned");
        let mut messages: Vec<Message> = map
            .get(key)
            .map(|sources| {
                sources
                    .iter()
                    .map(|(source, content)| Message::new(key, source.clone(), content.clone()))
                    .collect()
            })
            .unwrap_or_default();
        messages.sort_by(|a, b| a.source().cmp(b.source()));
        Ok(messages)
    }

    async fn list_sources_by_key(&self, _ctx: &Context, key: &str) -> StoreResult<Vec<String>> {
        let map = self.slots.read().expect("lock poisoned");
        let mut sources: Vec<String> = map
            .get(key)
            .map(|sources| sources.keys().cloned().collect())
            .unwrap_or_default();
        sources.sort();
        Ok(sources)
    }
}

impl std::fmt::Debug for InMemoryEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryEventStore")
            .field("slot_count", &count)
            .finish()
    }
}
