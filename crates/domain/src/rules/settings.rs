//! The optional fields a rule may set.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collaborator::Collaborator;
use crate::fine_tuning::FineTuningAttributes;
use crate::modal_list::ModalList;

/// How nametagged entities are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NametagPolicy {
    Either,
    Nametagged,
    NotNametagged,
}

impl fmt::Display for NametagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Either => write!(f, "EITHER"),
            Self::Nametagged => write!(f, "NAMETAGGED"),
            Self::NotNametagged => write!(f, "NOT_NAMETAGGED"),
        }
    }
}

/// How tamed entities are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TamedPolicy {
    Either,
    Tamed,
    NotTamed,
}

impl fmt::Display for TamedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Either => write!(f, "EITHER"),
            Self::Tamed => write!(f, "TAMED"),
            Self::NotTamed => write!(f, "NOT_TAMED"),
        }
    }
}

/// Inclusive level range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelBounds {
    pub min: i32,
    pub max: i32,
}

impl LevelBounds {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Inverted ranges collapse onto `min`.
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self {
                min: self.min,
                max: self.min,
            }
        } else {
            self
        }
    }

    pub fn clamp(&self, level: i32) -> i32 {
        let bounds = self.normalized();
        level.clamp(bounds.min, bounds.max)
    }
}

impl fmt::Display for LevelBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Configuration of the level generation strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StrategyConfig {
    /// Uniform over the bounds.
    Random,

    /// Weighted by level, optionally with a separate table per spawn reason.
    /// Levels missing from a table get weight zero; an all-zero table
    /// falls back to uniform.
    Weighted {
        #[serde(default)]
        weights: BTreeMap<i32, u32>,
        #[serde(default)]
        spawn_reason_weights: BTreeMap<String, BTreeMap<i32, u32>>,
    },

    /// Grows with distance from the world's reference point.
    SpawnDistance {
        start_distance: f64,
        increase_level_distance: f64,
        #[serde(default)]
        variance: i32,
    },

    /// Grows with the number of players near the entity.
    PlayerCount {
        radius: f64,
        levels_per_player: f64,
        #[serde(default)]
        variance: i32,
    },
}

impl fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Weighted {
                weights,
                spawn_reason_weights,
            } => write!(
                f,
                "weighted ({} levels, {} spawn reason tables)",
                weights.len(),
                spawn_reason_weights.len()
            ),
            Self::SpawnDistance {
                start_distance,
                increase_level_distance,
                variance,
            } => write!(
                f,
                "spawn_distance (start: {}, every: {}, variance: {})",
                start_distance, increase_level_distance, variance
            ),
            Self::PlayerCount {
                radius,
                levels_per_player,
                variance,
            } => write!(
                f,
                "player_count (radius: {}, per player: {}, variance: {})",
                radius, levels_per_player, variance
            ),
        }
    }
}

/// Every field a rule can set. `None` (or an empty collection) means unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
    pub strategy: Option<StrategyConfig>,
    pub fine_tuning: FineTuningAttributes,
    pub entity_fine_tuning: Option<BTreeMap<String, FineTuningAttributes>>,
    pub allowed_entities: Option<ModalList>,
    pub allowed_spawn_reasons: Option<ModalList>,
    pub nametag_policy: Option<NametagPolicy>,
    pub tamed_policy: Option<TamedPolicy>,
    /// `true` vetoes levelling of entities claimed by that collaborator.
    pub collaborator_blocks: Option<BTreeMap<Collaborator, bool>>,
    pub max_blast_radius: Option<i32>,
    pub baby_mobs_inherit_adult: Option<bool>,
}

impl RuleSettings {
    pub fn level_bounds(&self) -> Option<LevelBounds> {
        match (self.min_level, self.max_level) {
            (Some(min), Some(max)) => Some(LevelBounds::new(min, max)),
            _ => None,
        }
    }

    /// Whether claims by `collaborator` veto levelling.
    pub fn blocks(&self, collaborator: Collaborator) -> bool {
        self.collaborator_blocks
            .as_ref()
            .and_then(|m| m.get(&collaborator).copied())
            .unwrap_or(false)
    }

    /// Global fine-tuning with the entity-specific entry merged on top.
    pub fn fine_tuning_for(&self, entity_type: &str) -> FineTuningAttributes {
        let mut out = self.fine_tuning.clone();
        if let Some(specific) = self.entity_fine_tuning.as_ref().and_then(|m| {
            m.iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(entity_type))
                .map(|(_, v)| v)
        }) {
            out.merge(specific);
        }
        out.applicable_entity = Some(entity_type.to_string());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_bounds_collapse_to_min() {
        let bounds = LevelBounds::new(10, 3).normalized();
        assert_eq!(bounds, LevelBounds::new(10, 10));
        assert_eq!(LevelBounds::new(10, 3).clamp(1), 10);
    }

    #[test]
    fn entity_fine_tuning_overrides_global() {
        let mut per_entity = BTreeMap::new();
        per_entity.insert(
            "ZOMBIE".to_string(),
            FineTuningAttributes {
                max_health: Some(9.0),
                ..Default::default()
            },
        );
        let settings = RuleSettings {
            fine_tuning: FineTuningAttributes {
                max_health: Some(2.0),
                attack_damage: Some(1.0),
                ..Default::default()
            },
            entity_fine_tuning: Some(per_entity),
            ..Default::default()
        };

        let zombie = settings.fine_tuning_for("zombie");
        assert_eq!(zombie.max_health, Some(9.0));
        assert_eq!(zombie.attack_damage, Some(1.0));
        assert_eq!(zombie.applicable_entity.as_deref(), Some("zombie"));

        let skeleton = settings.fine_tuning_for("SKELETON");
        assert_eq!(skeleton.max_health, Some(2.0));
    }

    #[test]
    fn strategy_config_is_tagged_by_kind() {
        let parsed: StrategyConfig = serde_json::from_str(
            r#"{"kind":"spawn_distance","start_distance":100.0,"increase_level_distance":50.0}"#,
        )
        .unwrap_or(StrategyConfig::Random);
        assert_eq!(
            parsed,
            StrategyConfig::SpawnDistance {
                start_distance: 100.0,
                increase_level_distance: 50.0,
                variance: 0,
            }
        );
    }

    #[test]
    fn unset_collaborator_map_blocks_nothing() {
        let settings = RuleSettings::default();
        assert!(!settings.blocks(Collaborator::Citizens));
    }
}
