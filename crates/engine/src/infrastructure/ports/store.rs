//! Per-entity persistent key/value metadata.

use moblevels_domain::{EntityId, MetadataKey, MetadataType, MetadataValue};

/// Typed key/value storage attached to an entity, persisted by the host.
pub trait MetadataStore: Send + Sync {
    /// Whether a value of the given type is stored under `key`.
    fn has(&self, entity: EntityId, key: MetadataKey, value_type: MetadataType) -> bool;

    fn get(&self, entity: EntityId, key: MetadataKey, value_type: MetadataType)
        -> Option<MetadataValue>;

    fn set(&self, entity: EntityId, key: MetadataKey, value: MetadataValue);

    fn remove(&self, entity: EntityId, key: MetadataKey);

    fn get_integer(&self, entity: EntityId, key: MetadataKey) -> Option<i32> {
        self.get(entity, key, MetadataType::Integer)
            .and_then(|v| v.as_integer())
    }

    fn get_text(&self, entity: EntityId, key: MetadataKey) -> Option<String> {
        self.get(entity, key, MetadataType::Text)
            .and_then(|v| v.as_text().map(str::to_string))
    }
}
