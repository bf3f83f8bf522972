//! Level generation strategies.

use std::collections::BTreeMap;
use std::sync::Arc;

use moblevels_domain::{LevelBounds, Location, StrategyConfig};

use crate::infrastructure::cache::ResultCache;
use crate::infrastructure::ports::{LivingActor, RandomPort};

/// What a strategy may look at when picking a level.
pub struct GenerationContext<'a> {
    pub actor: &'a dyn LivingActor,
    pub location: &'a Location,
    pub spawn_reason: Option<&'a str>,
    /// Rule that supplied the strategy configuration.
    pub source: &'a str,
    /// Corpus generation the configuration was read from.
    pub generation: u64,
}

/// Picks a level inside `bounds`. Callers clamp the result again, so a
/// strategy may overshoot.
pub trait LevellingStrategy: Send + Sync {
    fn generate(&self, ctx: &GenerationContext<'_>, bounds: LevelBounds, random: &dyn RandomPort)
        -> i32;
}

/// Cache key for a materialised weighted pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub generation: u64,
    pub source: String,
    pub world: Option<String>,
    pub bounds: LevelBounds,
    pub spawn_reason: Option<String>,
}

/// Cumulative weight table: `(level, running total)`.
pub type LevelPool = Arc<[(i32, u64)]>;

pub type PoolCache = ResultCache<PoolKey, LevelPool>;

/// Build the strategy described by `config`.
pub fn from_config(config: &StrategyConfig, pools: Arc<PoolCache>) -> Box<dyn LevellingStrategy> {
    match config {
        StrategyConfig::Random => Box::new(RandomStrategy),
        StrategyConfig::Weighted {
            weights,
            spawn_reason_weights,
        } => Box::new(WeightedStrategy {
            weights: weights.clone(),
            spawn_reason_weights: spawn_reason_weights.clone(),
            pools,
        }),
        StrategyConfig::SpawnDistance {
            start_distance,
            increase_level_distance,
            variance,
        } => Box::new(SpawnDistanceStrategy {
            start_distance: *start_distance,
            increase_level_distance: *increase_level_distance,
            variance: *variance,
        }),
        StrategyConfig::PlayerCount {
            radius,
            levels_per_player,
            variance,
        } => Box::new(PlayerCountStrategy {
            radius: *radius,
            levels_per_player: *levels_per_player,
            variance: *variance,
        }),
    }
}

fn with_variance(level: i32, variance: i32, random: &dyn RandomPort) -> i32 {
    if variance > 0 {
        level.saturating_add(random.gen_range(-variance, variance))
    } else {
        level
    }
}

// =============================================================================
// Random
// =============================================================================

pub struct RandomStrategy;

impl LevellingStrategy for RandomStrategy {
    fn generate(&self, _ctx: &GenerationContext<'_>, bounds: LevelBounds, random: &dyn RandomPort) -> i32 {
        random.gen_range(bounds.min, bounds.max)
    }
}

// =============================================================================
// Weighted
// =============================================================================

pub struct WeightedStrategy {
    weights: BTreeMap<i32, u32>,
    spawn_reason_weights: BTreeMap<String, BTreeMap<i32, u32>>,
    pools: Arc<PoolCache>,
}

impl WeightedStrategy {
    fn table_for(&self, spawn_reason: Option<&str>) -> (&BTreeMap<i32, u32>, Option<String>) {
        spawn_reason
            .and_then(|reason| {
                self.spawn_reason_weights
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(reason))
            })
            .map(|(name, table)| (table, Some(name.to_ascii_lowercase())))
            .unwrap_or((&self.weights, None))
    }
}

fn materialise(table: &BTreeMap<i32, u32>, bounds: LevelBounds) -> LevelPool {
    let bounds = bounds.normalized();
    let mut total = 0u64;
    table
        .range(bounds.min..=bounds.max)
        .filter(|(_, &weight)| weight > 0)
        .map(|(&level, &weight)| {
            total += u64::from(weight);
            (level, total)
        })
        .collect()
}

impl LevellingStrategy for WeightedStrategy {
    fn generate(&self, ctx: &GenerationContext<'_>, bounds: LevelBounds, random: &dyn RandomPort) -> i32 {
        let (table, spawn_reason) = self.table_for(ctx.spawn_reason);
        let key = PoolKey {
            generation: ctx.generation,
            source: ctx.source.to_string(),
            world: ctx.location.world.clone(),
            bounds,
            spawn_reason,
        };
        let pool = self.pools.get_or_insert_with(key, || materialise(table, bounds));

        let Some(&(_, total)) = pool.last() else {
            return random.gen_range(bounds.min, bounds.max);
        };
        let target = ((random.gen_unit() * total as f64) as u64).min(total - 1);
        let index = pool.partition_point(|&(_, running)| running <= target);
        pool.get(index).map(|&(level, _)| level).unwrap_or(bounds.max)
    }
}

// =============================================================================
// Spawn distance
// =============================================================================

pub struct SpawnDistanceStrategy {
    start_distance: f64,
    increase_level_distance: f64,
    variance: i32,
}

impl LevellingStrategy for SpawnDistanceStrategy {
    fn generate(&self, ctx: &GenerationContext<'_>, bounds: LevelBounds, random: &dyn RandomPort) -> i32 {
        let Some(origin) = ctx.actor.world_reference_point() else {
            return bounds.min;
        };
        let distance = ctx.location.position.distance(&origin) - self.start_distance;
        let step = if self.increase_level_distance > 0.0 {
            self.increase_level_distance
        } else {
            1.0
        };
        let gained = if distance > 0.0 {
            (distance / step).floor() as i32
        } else {
            0
        };
        with_variance(bounds.min.saturating_add(gained), self.variance, random)
    }
}

// =============================================================================
// Player count
// =============================================================================

pub struct PlayerCountStrategy {
    radius: f64,
    levels_per_player: f64,
    variance: i32,
}

impl LevellingStrategy for PlayerCountStrategy {
    fn generate(&self, ctx: &GenerationContext<'_>, bounds: LevelBounds, random: &dyn RandomPort) -> i32 {
        let players = ctx.actor.nearby_players(self.radius);
        let gained = (players as f64 * self.levels_per_player).floor() as i32;
        with_variance(bounds.min.saturating_add(gained), self.variance, random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::random::{FixedRandom, SeededRandom};
    use crate::test_fixtures::FakeActor;
    use moblevels_domain::Position;

    fn ctx<'a>(actor: &'a FakeActor, location: &'a Location, reason: Option<&'a str>) -> GenerationContext<'a> {
        GenerationContext {
            actor,
            location,
            spawn_reason: reason,
            source: "test",
            generation: 1,
        }
    }

    #[test]
    fn weighted_only_picks_weighted_levels() {
        let pools = Arc::new(PoolCache::new(8));
        let config = StrategyConfig::Weighted {
            weights: [(2, 1), (4, 3)].into_iter().collect(),
            spawn_reason_weights: BTreeMap::new(),
        };
        let strategy = from_config(&config, pools.clone());
        let actor = FakeActor::zombie();
        let location = actor.location_snapshot();
        let random = SeededRandom::new(3);

        let mut seen = [0usize; 6];
        for _ in 0..2_000 {
            let level = strategy.generate(&ctx(&actor, &location, None), LevelBounds::new(1, 5), &random);
            seen[level as usize] += 1;
        }
        assert_eq!(seen[1] + seen[3] + seen[5], 0);
        assert!(seen[4] > seen[2]);
        assert_eq!(pools.len(), 1);
    }

    #[test]
    fn spawn_reason_table_takes_over() {
        let pools = Arc::new(PoolCache::new(8));
        let config = StrategyConfig::Weighted {
            weights: [(1, 1)].into_iter().collect(),
            spawn_reason_weights: [("SPAWNER".to_string(), [(9, 1)].into_iter().collect())]
                .into_iter()
                .collect(),
        };
        let strategy = from_config(&config, pools.clone());
        let actor = FakeActor::zombie();
        let location = actor.location_snapshot();
        let random = SeededRandom::new(1);
        let bounds = LevelBounds::new(1, 10);

        assert_eq!(strategy.generate(&ctx(&actor, &location, Some("spawner")), bounds, &random), 9);
        assert_eq!(strategy.generate(&ctx(&actor, &location, Some("natural")), bounds, &random), 1);
        assert_eq!(pools.len(), 2);
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let pools = Arc::new(PoolCache::new(8));
        let config = StrategyConfig::Weighted {
            weights: BTreeMap::new(),
            spawn_reason_weights: BTreeMap::new(),
        };
        let strategy = from_config(&config, pools);
        let actor = FakeActor::zombie();
        let location = actor.location_snapshot();

        let level = strategy.generate(&ctx(&actor, &location, None), LevelBounds::new(3, 7), &FixedRandom(5));
        assert_eq!(level, 5);
    }

    #[test]
    fn spawn_distance_grows_with_distance() {
        let config = StrategyConfig::SpawnDistance {
            start_distance: 100.0,
            increase_level_distance: 50.0,
            variance: 0,
        };
        let strategy = from_config(&config, Arc::new(PoolCache::new(1)));
        let actor = FakeActor::zombie().with_reference_point(Position::new(0.0, 64.0, 0.0));
        let bounds = LevelBounds::new(1, 20);
        let random = FixedRandom(0);

        let near = Location::new("world", Position::new(40.0, 64.0, 0.0));
        let far = Location::new("world", Position::new(260.0, 64.0, 0.0));
        assert_eq!(strategy.generate(&ctx(&actor, &near, None), bounds, &random), 1);
        assert_eq!(strategy.generate(&ctx(&actor, &far, None), bounds, &random), 4);
    }

    #[test]
    fn spawn_distance_without_reference_point_uses_min() {
        let config = StrategyConfig::SpawnDistance {
            start_distance: 0.0,
            increase_level_distance: 1.0,
            variance: 0,
        };
        let strategy = from_config(&config, Arc::new(PoolCache::new(1)));
        let actor = FakeActor::zombie();
        let far = Location::new("world", Position::new(5_000.0, 64.0, 0.0));

        assert_eq!(
            strategy.generate(&ctx(&actor, &far, None), LevelBounds::new(2, 9), &FixedRandom(0)),
            2
        );
    }

    #[test]
    fn player_count_adds_levels_per_player() {
        let config = StrategyConfig::PlayerCount {
            radius: 32.0,
            levels_per_player: 1.5,
            variance: 0,
        };
        let strategy = from_config(&config, Arc::new(PoolCache::new(1)));
        let actor = FakeActor::zombie().with_nearby_players(3);
        let location = actor.location_snapshot();

        assert_eq!(
            strategy.generate(&ctx(&actor, &location, None), LevelBounds::new(1, 50), &FixedRandom(0)),
            5
        );
    }

    #[test]
    fn pool_size_follows_the_table_not_the_bounds() {
        let table: BTreeMap<i32, u32> = [(5, 1), (6, 0), (7, 1), (90, 4)].into_iter().collect();
        let pool = materialise(&table, LevelBounds::new(0, i32::MAX));
        assert_eq!(&pool[..], &[(5, 1), (7, 2), (90, 6)]);

        let inverted = materialise(&table, LevelBounds { min: 7, max: 5 });
        assert_eq!(&inverted[..], &[(7, 1)]);

        let narrowed = materialise(&table, LevelBounds::new(6, 80));
        assert_eq!(&narrowed[..], &[(7, 1)]);
    }

    #[test]
    fn huge_bounds_pick_only_weighted_levels() {
        let config = StrategyConfig::Weighted {
            weights: [(5, 1), (7, 1)].into_iter().collect(),
            spawn_reason_weights: BTreeMap::new(),
        };
        let strategy = from_config(&config, Arc::new(PoolCache::new(4)));
        let actor = FakeActor::zombie();
        let location = actor.location_snapshot();
        let random = SeededRandom::new(21);

        for _ in 0..200 {
            let level = strategy.generate(&ctx(&actor, &location, None), LevelBounds::new(0, i32::MAX), &random);
            assert!(level == 5 || level == 7, "{level}");
        }
    }
}
