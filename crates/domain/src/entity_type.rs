//! Entity type classification and positions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Entity types that can never be levelled, whatever the configuration says.
///
/// Stored as names because hosts may not know every type constant.
pub const FORCE_BLOCKED_ENTITY_TYPES: [&str; 4] = ["PLAYER", "UNKNOWN", "ARMOR_STAND", "NPC"];

/// Hostile types that are not classified as monsters or bosses by the host
/// and therefore have to be allowed by name.
pub const OTHER_HOSTILE_MOBS: [&str; 8] = [
    "GHAST",
    "HOGLIN",
    "SHULKER",
    "PHANTOM",
    "ENDER_DRAGON",
    "SLIME",
    "MAGMA_CUBE",
    "ZOMBIFIED_PIGLIN",
];

/// Host-side class of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobClass {
    Monster,
    Boss,
    Passive,
    /// The host could not resolve a class for this type
    Unclassified,
}

impl MobClass {
    pub fn is_hostile(&self) -> bool {
        matches!(self, Self::Monster | Self::Boss)
    }
}

impl FromStr for MobClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monster" => Ok(Self::Monster),
            "boss" => Ok(Self::Boss),
            "passive" | "animal" => Ok(Self::Passive),
            "unclassified" | "unknown" => Ok(Self::Unclassified),
            other => Err(DomainError::parse(format!("Unknown mob class: {}", other))),
        }
    }
}

/// An entity type: upper-cased name plus its host class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityType {
    name: String,
    class: MobClass,
}

impl EntityType {
    pub fn new(name: impl AsRef<str>, class: MobClass) -> Self {
        Self {
            name: name.as_ref().trim().to_ascii_uppercase().replace(' ', "_"),
            class,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> MobClass {
        self.class
    }

    pub fn is_force_blocked(&self) -> bool {
        FORCE_BLOCKED_ENTITY_TYPES.contains(&self.name.as_str())
    }

    pub fn is_other_hostile(&self) -> bool {
        OTHER_HOSTILE_MOBS.contains(&self.name.as_str())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A point in a world.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Block coordinates, as shown to users.
    pub fn block(&self) -> (i64, i64, i64) {
        (
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.z.floor() as i64,
        )
    }
}

/// Where an entity is. The world is optional: actors in transit or in
/// unloaded worlds report none.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub world: Option<String>,
    pub position: Position,
}

impl Location {
    pub fn new(world: impl Into<String>, position: Position) -> Self {
        Self {
            world: Some(world.into()),
            position,
        }
    }
}
