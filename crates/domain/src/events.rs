//! Notifications published around level assignment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// What triggered a level assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelCause {
    Normal,
    Summoned,
}

/// Host context attached to a level assignment, passed through to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditionalLevelInformation {
    NotApplicable,
    FromChunkListener,
    FromTransformListener,
    FromTameListener,
}

/// Events published by the level applicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LevelEvent {
    /// Before a naturally triggered level is applied. Cancellable.
    PreLevel {
        entity: EntityId,
        level: i32,
        info: BTreeSet<AdditionalLevelInformation>,
    },
    /// Before a summoned entity's level is applied. Cancellable.
    SummonedPreLevel { entity: EntityId, level: i32 },
    /// After a level was applied. Informational; cancelling has no effect.
    PostLevel {
        entity: EntityId,
        level: i32,
        cause: LevelCause,
        info: BTreeSet<AdditionalLevelInformation>,
    },
}

impl LevelEvent {
    pub fn entity(&self) -> EntityId {
        match self {
            Self::PreLevel { entity, .. }
            | Self::SummonedPreLevel { entity, .. }
            | Self::PostLevel { entity, .. } => *entity,
        }
    }

    pub fn level(&self) -> i32 {
        match self {
            Self::PreLevel { level, .. }
            | Self::SummonedPreLevel { level, .. }
            | Self::PostLevel { level, .. } => *level,
        }
    }

    /// Whether a subscriber's cancellation is honoured.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, Self::PostLevel { .. })
    }
}
