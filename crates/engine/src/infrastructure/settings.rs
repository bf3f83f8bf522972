//! Engine-wide settings.
//!
//! Loaded from `MOBLEVELS_*` environment variables by the binary; hosts that
//! embed the engine can also deserialize them or build them directly.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use moblevels_domain::LevelBounds;
use serde::{Deserialize, Serialize};

const DEFAULT_LEVEL_POOL_CACHE_CAPACITY: usize = 100;
const DEFAULT_RULE_CACHE_CAPACITY: usize = 256;
const DEFAULT_APPLY_DELAY_TICKS: u32 = 1;
const DEFAULT_NAMETAG_RESTORE_DELAY_TICKS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Level passive mobs in the coarse per-type check.
    pub level_passive: bool,
    /// Entity types always levellable in the coarse per-type check.
    pub overridden_entities: BTreeSet<String>,
    /// Per entity type bounds, taking precedence over merged rule bounds.
    pub entity_level_overrides: BTreeMap<String, LevelBounds>,
    /// Seed for deterministic level generation.
    pub random_seed: Option<u64>,
    pub level_pool_cache_capacity: usize,
    pub rule_cache_capacity: usize,
    pub apply_delay_ticks: u32,
    pub nametag_restore_delay_ticks: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            level_passive: false,
            overridden_entities: BTreeSet::new(),
            entity_level_overrides: BTreeMap::new(),
            random_seed: None,
            level_pool_cache_capacity: DEFAULT_LEVEL_POOL_CACHE_CAPACITY,
            rule_cache_capacity: DEFAULT_RULE_CACHE_CAPACITY,
            apply_delay_ticks: DEFAULT_APPLY_DELAY_TICKS,
            nametag_restore_delay_ticks: DEFAULT_NAMETAG_RESTORE_DELAY_TICKS,
        }
    }
}

impl EngineSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for missing
    /// or unparseable values.
    ///
    /// `MOBLEVELS_ENTITY_LEVEL_OVERRIDES` uses `TYPE=min..max` pairs separated
    /// by commas, e.g. `ZOMBIE=5..10,WITHER=20..30`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            level_passive: parsed(&lookup, "MOBLEVELS_LEVEL_PASSIVE", defaults.level_passive),
            overridden_entities: lookup("MOBLEVELS_OVERRIDDEN_ENTITIES")
                .map(|v| name_list(&v))
                .unwrap_or(defaults.overridden_entities),
            entity_level_overrides: lookup("MOBLEVELS_ENTITY_LEVEL_OVERRIDES")
                .map(|v| level_overrides(&v))
                .unwrap_or(defaults.entity_level_overrides),
            random_seed: lookup("MOBLEVELS_RANDOM_SEED").and_then(|v| match v.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    tracing::warn!(value = %v, "Ignoring unparseable MOBLEVELS_RANDOM_SEED");
                    None
                }
            }),
            level_pool_cache_capacity: parsed(
                &lookup,
                "MOBLEVELS_LEVEL_POOL_CACHE_CAPACITY",
                defaults.level_pool_cache_capacity,
            ),
            rule_cache_capacity: parsed(
                &lookup,
                "MOBLEVELS_RULE_CACHE_CAPACITY",
                defaults.rule_cache_capacity,
            ),
            apply_delay_ticks: parsed(
                &lookup,
                "MOBLEVELS_APPLY_DELAY_TICKS",
                defaults.apply_delay_ticks,
            ),
            nametag_restore_delay_ticks: parsed(
                &lookup,
                "MOBLEVELS_NAMETAG_RESTORE_DELAY_TICKS",
                defaults.nametag_restore_delay_ticks,
            ),
        }
    }

    pub fn is_overridden(&self, entity_type: &str) -> bool {
        self.overridden_entities
            .iter()
            .any(|name| name.eq_ignore_ascii_case(entity_type))
    }

    pub fn level_override(&self, entity_type: &str) -> Option<LevelBounds> {
        self.entity_level_overrides
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(entity_type))
            .map(|(_, bounds)| *bounds)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            default
        }),
        None => default,
    }
}

fn name_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

fn level_overrides(raw: &str) -> BTreeMap<String, LevelBounds> {
    let mut out = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let parsed = entry.split_once('=').and_then(|(name, range)| {
            let (min, max) = range.split_once("..")?;
            let min = min.trim().parse().ok()?;
            let max = max.trim().parse().ok()?;
            Some((name.trim().to_ascii_uppercase(), LevelBounds::new(min, max)))
        });
        match parsed {
            Some((name, bounds)) => {
                out.insert(name, bounds);
            }
            None => tracing::warn!(entry, "Ignoring malformed entity level override"),
        }
    }
    out
}
