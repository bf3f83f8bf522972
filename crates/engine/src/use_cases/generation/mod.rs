//! Level generation.

mod strategies;

use std::sync::Arc;

use moblevels_domain::{LevelBounds, MetadataKey, StrategyConfig};

use crate::entities::EntityHandle;
use crate::infrastructure::ports::{MetadataStore, RandomPort};
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::rules::RuleResolver;

pub use strategies::{
    from_config, GenerationContext, LevelPool, LevellingStrategy, PlayerCountStrategy, PoolCache,
    PoolKey, RandomStrategy, SpawnDistanceStrategy, WeightedStrategy,
};

pub struct LevelGenerator {
    resolver: Arc<RuleResolver>,
    store: Arc<dyn MetadataStore>,
    random: Arc<dyn RandomPort>,
    settings: Arc<EngineSettings>,
    pools: Arc<PoolCache>,
    strategy_override: Option<Arc<dyn LevellingStrategy>>,
}

impl LevelGenerator {
    pub fn new(
        resolver: Arc<RuleResolver>,
        store: Arc<dyn MetadataStore>,
        random: Arc<dyn RandomPort>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        let pools = Arc::new(PoolCache::new(settings.level_pool_cache_capacity));
        Self {
            resolver,
            store,
            random,
            settings,
            pools,
            strategy_override: None,
        }
    }

    /// Use `strategy` for every entity instead of the configured one.
    pub fn with_strategy(mut self, strategy: Arc<dyn LevellingStrategy>) -> Self {
        self.strategy_override = Some(strategy);
        self
    }

    /// Generate a level within the entity's effective bounds.
    pub fn generate_level(&self, handle: &EntityHandle) -> i32 {
        let bounds = self.bounds_for(handle);
        self.generate_level_in(handle, bounds.min, bounds.max)
    }

    /// Generate a level within caller-supplied bounds.
    pub fn generate_level_in(&self, handle: &EntityHandle, min: i32, max: i32) -> i32 {
        let bounds = LevelBounds::new(min, max).normalized();
        let generation = self.resolver.registry().generation();
        let merged = self.resolver.merged(handle);
        let config = merged
            .settings()
            .strategy
            .clone()
            .unwrap_or(StrategyConfig::Random);
        let source = merged.source_of("strategy").unwrap_or("default");

        let strategy = match &self.strategy_override {
            Some(strategy) => strategy.clone(),
            None => Arc::from(from_config(&config, self.pools.clone())),
        };

        let actor = handle.actor();
        let location = actor.location();
        let spawn_reason = self.store.get_text(actor.id(), MetadataKey::SpawnReason);
        let ctx = GenerationContext {
            actor: actor.as_ref(),
            location: &location,
            spawn_reason: spawn_reason.as_deref(),
            source,
            generation,
        };

        let level = bounds.clamp(strategy.generate(&ctx, bounds, self.random.as_ref()));
        tracing::debug!(
            entity = %actor.id(),
            entity_type = %actor.entity_type(),
            strategy = %config,
            %bounds,
            level,
            "Generated level"
        );
        level
    }

    /// Effective bounds: a per-type override, else the merged rule bounds,
    /// else the default rule's.
    pub fn bounds_for(&self, handle: &EntityHandle) -> LevelBounds {
        let entity_type = handle.entity_type();
        if let Some(bounds) = self.settings.level_override(entity_type.name()) {
            return bounds.normalized();
        }

        let merged = self.resolver.merged(handle);
        let snapshot = self.resolver.registry().snapshot();
        let fallback = snapshot.corpus.default_rule().settings();
        let min = merged
            .settings()
            .min_level
            .or(fallback.min_level)
            .unwrap_or(0);
        let max = merged
            .settings()
            .max_level
            .or(fallback.max_level)
            .unwrap_or(min);
        LevelBounds::new(min, max).normalized()
    }

    /// Drop every materialised weighted pool.
    pub fn clear_pools(&self) {
        self.pools.clear();
    }

    pub fn cached_pools(&self) -> usize {
        self.pools.len()
    }
}
