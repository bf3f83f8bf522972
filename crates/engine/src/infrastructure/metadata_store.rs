//! In-memory metadata store.
//!
//! Backs the demo binary and tests. Hosts with their own persistence
//! implement [`MetadataStore`] directly.

use std::collections::HashMap;

use dashmap::DashMap;
use moblevels_domain::{EntityId, MetadataKey, MetadataType, MetadataValue};

use crate::infrastructure::ports::MetadataStore;

#[derive(Default)]
pub struct InMemoryMetadataStore {
    entries: DashMap<EntityId, HashMap<MetadataKey, MetadataValue>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities with at least one stored key.
    pub fn entity_count(&self) -> usize {
        self.entries.len()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn has(&self, entity: EntityId, key: MetadataKey, value_type: MetadataType) -> bool {
        self.entries
            .get(&entity)
            .and_then(|values| values.get(&key).map(|v| v.value_type() == value_type))
            .unwrap_or(false)
    }

    fn get(
        &self,
        entity: EntityId,
        key: MetadataKey,
        value_type: MetadataType,
    ) -> Option<MetadataValue> {
        self.entries
            .get(&entity)?
            .get(&key)
            .filter(|v| v.value_type() == value_type)
            .cloned()
    }

    fn set(&self, entity: EntityId, key: MetadataKey, value: MetadataValue) {
        self.entries.entry(entity).or_default().insert(key, value);
    }

    fn remove(&self, entity: EntityId, key: MetadataKey) {
        let now_empty = match self.entries.get_mut(&entity) {
            Some(mut values) => {
                values.remove(&key);
                values.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.entries.remove_if(&entity, |_, values| values.is_empty());
        }
    }
}
