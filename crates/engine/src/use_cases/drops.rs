//! Death rewards of levelled entities.

use std::sync::Arc;

use moblevels_domain::{FineTuningAttributes, MetadataKey};

use crate::entities::EntityHandle;
use crate::infrastructure::ports::MetadataStore;
use crate::use_cases::levelling::level_ratio;
use crate::use_cases::rules::RuleResolver;

/// Scales death rewards and projectile damage by level, using the merged
/// `fine_tuning` amounts.
pub struct LevelledDrops {
    resolver: Arc<RuleResolver>,
    store: Arc<dyn MetadataStore>,
}

impl LevelledDrops {
    pub fn new(resolver: Arc<RuleResolver>, store: Arc<dyn MetadataStore>) -> Self {
        Self { resolver, store }
    }

    /// Experience dropped on death. Unlevelled entities drop `base_xp`.
    pub fn scaled_xp(&self, handle: &EntityHandle, base_xp: i32) -> i32 {
        let Some(bonus) = self.bonus(handle, |f| f.xp_drop.map(f64::from)) else {
            return base_xp;
        };
        base_xp + bonus.round() as i32
    }

    /// Additional item stacks dropped on death.
    pub fn extra_item_drops(&self, handle: &EntityHandle) -> i32 {
        let Some(bonus) = self.bonus(handle, |f| f.item_drop.map(f64::from)) else {
            return 0;
        };
        bonus.floor().max(0.0) as i32
    }

    /// Damage of a projectile fired by `handle`. Unlevelled shooters deal
    /// `base_damage`.
    pub fn scaled_ranged_damage(&self, handle: &EntityHandle, base_damage: f64) -> f64 {
        base_damage + self.bonus(handle, |f| f.ranged_attack_damage).unwrap_or(0.0)
    }

    /// The picked amount scaled by the entity's level ratio.
    fn bonus(
        &self,
        handle: &EntityHandle,
        pick: impl Fn(&FineTuningAttributes) -> Option<f64>,
    ) -> Option<f64> {
        let level = self.store.get_integer(handle.id(), MetadataKey::Level)?;
        let merged = self.resolver.merged(handle);
        let fine_tuning = merged
            .settings()
            .fine_tuning_for(handle.entity_type().name());
        let amount = pick(&fine_tuning)?;
        let max_level = merged.level_bounds().map_or(level, |b| b.max);
        Some(amount * level_ratio(level, max_level))
    }
}
