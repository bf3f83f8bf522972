//! Species attribute baselines held in memory.

use std::collections::HashMap;

use moblevels_domain::{Attribute, EntityType};

use crate::infrastructure::ports::BaselinePort;

/// Table of default attribute values keyed by entity type name.
#[derive(Debug, Clone, Default)]
pub struct StaticBaselines {
    values: HashMap<(String, Attribute), f64>,
}

impl StaticBaselines {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small table of well-known hostile and passive mobs.
    pub fn vanilla() -> Self {
        use Attribute::{AttackDamage, MaxHealth, MovementSpeed};
        Self::new()
            .with("ZOMBIE", MaxHealth, 20.0)
            .with("ZOMBIE", AttackDamage, 3.0)
            .with("ZOMBIE", MovementSpeed, 0.23)
            .with("SKELETON", MaxHealth, 20.0)
            .with("SKELETON", AttackDamage, 2.0)
            .with("SKELETON", MovementSpeed, 0.25)
            .with("SPIDER", MaxHealth, 16.0)
            .with("SPIDER", AttackDamage, 2.0)
            .with("SPIDER", MovementSpeed, 0.3)
            .with("CREEPER", MaxHealth, 20.0)
            .with("CREEPER", MovementSpeed, 0.25)
            .with("COW", MaxHealth, 10.0)
            .with("COW", MovementSpeed, 0.2)
    }

    pub fn with(mut self, entity_type: &str, attribute: Attribute, value: f64) -> Self {
        self.values
            .insert((entity_type.to_ascii_uppercase(), attribute), value);
        self
    }
}

impl BaselinePort for StaticBaselines {
    fn default_value(&self, entity_type: &EntityType, attribute: Attribute) -> Option<f64> {
        self.values
            .get(&(entity_type.name().to_string(), attribute))
            .copied()
    }
}
