//! Applicable rule resolution and merging, with caching.

use std::sync::Arc;

use moblevels_domain::{merge_fields, ConditionSubject, MergedRules, MetadataKey, Rule};

use crate::entities::EntityHandle;
use crate::infrastructure::cache::ResultCache;
use crate::infrastructure::ports::MetadataStore;

use super::registry::RuleRegistry;

/// Everything rule conditions can look at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClassificationKey {
    generation: u64,
    entity_type: String,
    world: Option<String>,
    custom_name: Option<String>,
    spawn_reason: Option<String>,
}

/// Resolves which rules apply to an entity and what they merge to.
///
/// Rule lists are cached per classification (type, world, custom name,
/// spawn reason) and on the handle; merged results on the handle only.
pub struct RuleResolver {
    registry: Arc<RuleRegistry>,
    store: Arc<dyn MetadataStore>,
    cache: ResultCache<ClassificationKey, Arc<[Arc<Rule>]>>,
}

impl RuleResolver {
    pub fn new(
        registry: Arc<RuleRegistry>,
        store: Arc<dyn MetadataStore>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            registry,
            store,
            cache: ResultCache::new(cache_capacity),
        }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Enabled rules whose conditions match, in corpus order (default,
    /// presets, custom rules).
    pub fn resolve_applicable_rules(&self, handle: &EntityHandle) -> Arc<[Arc<Rule>]> {
        let snapshot = self.registry.snapshot();
        if let Some(rules) = handle.applicable_rules(snapshot.generation) {
            return rules;
        }

        let actor = handle.actor();
        let key = ClassificationKey {
            generation: snapshot.generation,
            entity_type: actor.entity_type().name().to_string(),
            world: actor.location().world,
            custom_name: actor.custom_name(),
            spawn_reason: self.store.get_text(actor.id(), MetadataKey::SpawnReason),
        };

        let rules = self.cache.get_or_insert_with(key.clone(), || {
            let subject = ConditionSubject {
                entity_type: &key.entity_type,
                world: key.world.as_deref(),
                spawn_reason: key.spawn_reason.as_deref(),
                custom_name: key.custom_name.as_deref(),
            };
            let rules: Arc<[Arc<Rule>]> = snapshot
                .corpus
                .rules()
                .iter()
                .filter(|rule| rule.is_enabled() && rule.conditions().matches(&subject))
                .cloned()
                .collect();
            tracing::debug!(
                entity_type = %key.entity_type,
                world = key.world.as_deref().unwrap_or("-"),
                rules = rules.len(),
                "Resolved applicable rules"
            );
            rules
        });

        handle.store_applicable_rules(snapshot.generation, rules.clone());
        rules
    }

    /// Effective settings for `handle`.
    pub fn merged(&self, handle: &EntityHandle) -> Arc<MergedRules> {
        let generation = self.registry.generation();
        if let Some(merged) = handle.merged_rules(generation) {
            return merged;
        }
        let merged = Arc::new(merge_fields(&self.resolve_applicable_rules(handle)));
        handle.store_merged_rules(generation, merged.clone());
        merged
    }

    /// Drop every cached rule list.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_classifications(&self) -> usize {
        self.cache.len()
    }
}
