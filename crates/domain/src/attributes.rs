//! Actor attributes the engine knows how to read, scale and reset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An attribute exposed by a live actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    MaxHealth,
    AttackDamage,
    MovementSpeed,
    FlyingSpeed,
    FollowRange,
    KnockbackResistance,
    AttackKnockback,
    Armor,
    ArmorToughness,
}

impl Attribute {
    /// Attributes recomputed whenever a level is applied, in application order.
    pub const LEVELLED: [Attribute; 3] = [
        Attribute::AttackDamage,
        Attribute::MaxHealth,
        Attribute::MovementSpeed,
    ];
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MaxHealth => "max_health",
            Self::AttackDamage => "attack_damage",
            Self::MovementSpeed => "movement_speed",
            Self::FlyingSpeed => "flying_speed",
            Self::FollowRange => "follow_range",
            Self::KnockbackResistance => "knockback_resistance",
            Self::AttackKnockback => "attack_knockback",
            Self::Armor => "armor",
            Self::ArmorToughness => "armor_toughness",
        };
        f.write_str(name)
    }
}
