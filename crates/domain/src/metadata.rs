//! Keys and values persisted on entities through the metadata store.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Keys the engine reads from or writes to an entity's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataKey {
    /// The entity's level (integer).
    Level,
    /// Provenance flags of the level (integer bitfield).
    LevelFlags,
    /// Presence-only marker: never level this entity.
    DoNotLevel,
    /// Why the entity spawned (text).
    SpawnReason,
}

impl MetadataKey {
    pub fn value_type(&self) -> MetadataType {
        match self {
            Self::Level | Self::LevelFlags => MetadataType::Integer,
            Self::DoNotLevel | Self::SpawnReason => MetadataType::Text,
        }
    }

    /// Namespaced key as hosts persist it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Level => "levelledmobs:level",
            Self::LevelFlags => "levelledmobs:level_flags",
            Self::DoNotLevel => "levelledmobs:nolevel",
            Self::SpawnReason => "levelledmobs:spawnreason",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataType {
    Integer,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataValue {
    Integer(i32),
    Text(String),
}

impl MetadataValue {
    pub fn value_type(&self) -> MetadataType {
        match self {
            Self::Integer(_) => MetadataType::Integer,
            Self::Text(_) => MetadataType::Text,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            Self::Integer(_) => None,
        }
    }
}

/// How a level came to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LevelFlags(u8);

impl LevelFlags {
    pub const NONE: LevelFlags = LevelFlags(0);
    pub const SUMMONED: LevelFlags = LevelFlags(1);
    pub const BYPASS_LIMITS: LevelFlags = LevelFlags(1 << 1);
    pub const BABY: LevelFlags = LevelFlags(1 << 2);

    pub fn contains(&self, other: LevelFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(&self) -> i32 {
        i32::from(self.0)
    }

    /// Unknown bits are dropped.
    pub fn from_bits(bits: i32) -> Self {
        Self((bits & 0b111) as u8)
    }
}

impl BitOr for LevelFlags {
    type Output = LevelFlags;

    fn bitor(self, rhs: LevelFlags) -> LevelFlags {
        LevelFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for LevelFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::SUMMONED) {
            names.push("summoned");
        }
        if self.contains(Self::BYPASS_LIMITS) {
            names.push("limit bypass");
        }
        if self.contains(Self::BABY) {
            names.push("baby");
        }
        f.write_str(&names.join(", "))
    }
}

/// A persisted level plus its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub level: i32,
    pub flags: LevelFlags,
}
