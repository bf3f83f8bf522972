//! Fine-tuning attributes: the numeric part of a merged rule configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;

/// Per-attribute amounts applied when an entity is levelled.
///
/// Every field is optional. Merging only ever overwrites fields that the
/// incoming record actually sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningAttributes {
    /// Entity type this record was resolved for, if any.
    pub applicable_entity: Option<String>,

    pub max_health: Option<f64>,
    pub attack_damage: Option<f64>,
    pub item_drop: Option<i32>,
    pub xp_drop: Option<i32>,
    pub movement_speed: Option<f64>,
    pub ranged_attack_damage: Option<f64>,
}

impl FineTuningAttributes {
    /// Overwrite each field that `other` sets.
    pub fn merge(&mut self, other: &FineTuningAttributes) {
        if other.max_health.is_some() {
            self.max_health = other.max_health;
        }
        if other.attack_damage.is_some() {
            self.attack_damage = other.attack_damage;
        }
        if other.item_drop.is_some() {
            self.item_drop = other.item_drop;
        }
        if other.xp_drop.is_some() {
            self.xp_drop = other.xp_drop;
        }
        if other.movement_speed.is_some() {
            self.movement_speed = other.movement_speed;
        }
        if other.ranged_attack_damage.is_some() {
            self.ranged_attack_damage = other.ranged_attack_damage;
        }
    }

    /// Pure form of [`merge`](Self::merge).
    pub fn merged(&self, other: &FineTuningAttributes) -> FineTuningAttributes {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.max_health.is_none()
            && self.attack_damage.is_none()
            && self.item_drop.is_none()
            && self.xp_drop.is_none()
            && self.movement_speed.is_none()
            && self.ranged_attack_damage.is_none()
    }

    /// Amount configured for a levelled attribute.
    pub fn amount_for(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::MaxHealth => self.max_health,
            Attribute::AttackDamage => self.attack_damage,
            Attribute::MovementSpeed => self.movement_speed,
            _ => None,
        }
    }
}

impl fmt::Display for FineTuningAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items = Vec::new();
        if let Some(v) = self.max_health {
            items.push(format!("max_health: {}", v));
        }
        if let Some(v) = self.attack_damage {
            items.push(format!("attack_damage: {}", v));
        }
        if let Some(v) = self.item_drop {
            items.push(format!("item_drop: {}", v));
        }
        if let Some(v) = self.xp_drop {
            items.push(format!("xp_drop: {}", v));
        }
        if let Some(v) = self.movement_speed {
            items.push(format!("movement_speed: {}", v));
        }
        if let Some(v) = self.ranged_attack_damage {
            items.push(format!("ranged_attack_damage: {}", v));
        }

        if items.is_empty() {
            f.write_str("No items")
        } else {
            f.write_str(&items.join(", "))
        }
    }
}
