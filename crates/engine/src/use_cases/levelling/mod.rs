//! Level application and removal.
//!
//! An entity moves `Unlevelled -> Pending -> Applied` and back to
//! `Unlevelled` on removal. Applying publishes a cancellable pre-level
//! event, then defers the actual write to the next scheduled tick, where the
//! do-not-level marker is checked again.

mod error;
mod scaling;

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moblevels_domain::{
    AdditionalLevelInformation, Attribute, EntityId, LevelCause, LevelEvent, LevelFlags, LevelRecord,
    MergedRules, MetadataKey, MetadataType, MetadataValue,
};

use crate::entities::EntityHandle;
use crate::infrastructure::ports::{BaselinePort, MetadataStore, NotificationPort, SchedulerPort};
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::eligibility::EligibilityGate;
use crate::use_cases::rules::RuleResolver;

pub use error::LevelError;
pub use scaling::{level_ratio, AttributeScaling, LevelRatioScaling, VANILLA_BLAST_RADIUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    Unlevelled,
    /// Accepted, waiting for the deferred write.
    Pending,
    Applied,
}

/// Result of a successful [`LevelApplicator::apply_level_to_mob`] call.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Scheduled,
    /// A pre-level subscriber cancelled; nothing was changed.
    Cancelled,
}

pub struct LevelApplicator {
    gate: Arc<EligibilityGate>,
    resolver: Arc<RuleResolver>,
    store: Arc<dyn MetadataStore>,
    scheduler: Arc<dyn SchedulerPort>,
    notifications: Arc<dyn NotificationPort>,
    baselines: Arc<dyn BaselinePort>,
    scaling: Arc<dyn AttributeScaling>,
    settings: Arc<EngineSettings>,
    /// Deferred applies still in flight, per entity.
    pending: Mutex<HashMap<EntityId, usize>>,
}

impl LevelApplicator {
    pub fn new(
        gate: Arc<EligibilityGate>,
        resolver: Arc<RuleResolver>,
        store: Arc<dyn MetadataStore>,
        scheduler: Arc<dyn SchedulerPort>,
        notifications: Arc<dyn NotificationPort>,
        baselines: Arc<dyn BaselinePort>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        Self {
            gate,
            resolver,
            store,
            scheduler,
            notifications,
            baselines,
            scaling: Arc::new(LevelRatioScaling),
            settings,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_scaling(mut self, scaling: Arc<dyn AttributeScaling>) -> Self {
        self.scaling = scaling;
        self
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<EntityId, usize>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(&self, entity: EntityId) {
        let mut pending = self.pending();
        if let Some(count) = pending.get_mut(&entity) {
            *count -= 1;
            if *count == 0 {
                pending.remove(&entity);
            }
        }
    }

    /// Level `handle` to `level`.
    ///
    /// Unless `bypass_limits` or `is_summoned` is set the entity must pass
    /// the eligibility gate. On success the write happens on a later tick.
    pub fn apply_level_to_mob(
        self: &Arc<Self>,
        handle: &EntityHandle,
        level: i32,
        is_summoned: bool,
        bypass_limits: bool,
        info: BTreeSet<AdditionalLevelInformation>,
    ) -> Result<ApplyOutcome, LevelError> {
        if level < 0 {
            return Err(LevelError::NegativeLevel(level));
        }
        let entity = handle.id();
        if !bypass_limits && !is_summoned {
            let state = self.gate.decide(handle);
            if !state.is_allowed() {
                return Err(LevelError::NotLevellable { entity, state });
            }
        }

        let pre_event = if is_summoned {
            LevelEvent::SummonedPreLevel { entity, level }
        } else {
            LevelEvent::PreLevel {
                entity,
                level,
                info: info.clone(),
            }
        };
        if self.notifications.publish(&pre_event) {
            tracing::info!(entity = %entity, level, "Level application cancelled by pre-level event");
            return Ok(ApplyOutcome::Cancelled);
        }

        *self.pending().entry(entity).or_insert(0) += 1;
        let this = Arc::clone(self);
        let handle = handle.clone();
        self.scheduler.run_after(
            self.settings.apply_delay_ticks,
            Box::new(move || this.finish_apply(&handle, level, is_summoned, bypass_limits, info)),
        );
        Ok(ApplyOutcome::Scheduled)
    }

    fn finish_apply(
        &self,
        handle: &EntityHandle,
        level: i32,
        is_summoned: bool,
        bypass_limits: bool,
        info: BTreeSet<AdditionalLevelInformation>,
    ) {
        let entity = handle.id();
        self.settle(entity);

        if self.store.has(entity, MetadataKey::DoNotLevel, MetadataType::Text) {
            tracing::debug!(entity = %entity, "Entity marked do-not-level, not applying level");
            return;
        }

        let actor = handle.actor();
        let mut flags = LevelFlags::NONE;
        if is_summoned {
            flags = flags | LevelFlags::SUMMONED;
        }
        if bypass_limits {
            flags = flags | LevelFlags::BYPASS_LIMITS;
        }
        if actor.is_baby() {
            flags = flags | LevelFlags::BABY;
        }

        self.store
            .set(entity, MetadataKey::Level, MetadataValue::Integer(level));
        self.store.set(
            entity,
            MetadataKey::LevelFlags,
            MetadataValue::Integer(flags.bits()),
        );
        handle.invalidate();

        let merged = self.resolver.merged(handle);
        let max_level = merged.level_bounds().map_or(level, |b| b.max);
        self.apply_attributes(handle, &merged, level, max_level);
        self.apply_blast_radius(handle, &merged, level, max_level);

        actor.refresh_nametag(self.cached_level(handle));
        actor.refresh_equipment(level);

        let cause = if is_summoned {
            LevelCause::Summoned
        } else {
            LevelCause::Normal
        };
        // Post-level cancellation has no effect.
        let _ = self.notifications.publish(&LevelEvent::PostLevel {
            entity,
            level,
            cause,
            info,
        });

        let location = actor.location();
        tracing::info!(
            entity = %entity,
            entity_type = %actor.entity_type(),
            world = location.world.as_deref().unwrap_or("-"),
            level,
            summoned = is_summoned,
            bypass_limits,
            baby = flags.contains(LevelFlags::BABY),
            "Applied level"
        );
    }

    fn apply_attributes(&self, handle: &EntityHandle, merged: &MergedRules, level: i32, max_level: i32) {
        let actor = handle.actor();
        let settings = merged.settings();
        if actor.is_baby() && !settings.baby_mobs_inherit_adult.unwrap_or(false) {
            return;
        }

        let entity_type = actor.entity_type();
        let fine_tuning = settings.fine_tuning_for(entity_type.name());
        let exposed = actor.attributes();
        for attribute in Attribute::LEVELLED {
            if !exposed.contains(&attribute) {
                continue;
            }
            let Some(amount) = fine_tuning.amount_for(attribute) else {
                continue;
            };
            let Some(baseline) = self.baselines.default_value(&entity_type, attribute) else {
                tracing::debug!(entity_type = %entity_type, %attribute, "No baseline, attribute left as is");
                continue;
            };
            let value = self.scaling.scale(attribute, baseline, amount, level, max_level);
            actor.set_attribute_base(attribute, value);
        }
    }

    fn apply_blast_radius(&self, handle: &EntityHandle, merged: &MergedRules, level: i32, max_level: i32) {
        let actor = handle.actor();
        let (Some(_), Some(max_radius)) = (actor.explosion_radius(), merged.settings().max_blast_radius) else {
            return;
        };
        let radius = self
            .scaling
            .blast_radius(VANILLA_BLAST_RADIUS, max_radius, level, max_level);
        actor.set_explosion_radius(radius);
    }

    /// Remove the level from `handle` and restore its baseline attributes.
    ///
    /// The display name is restored on a later tick unless the entity was
    /// levelled again in the meantime.
    pub fn remove_level(&self, handle: &EntityHandle) -> Result<(), LevelError> {
        let entity = handle.id();
        if !self.is_levelled(handle) {
            return Err(LevelError::NotLevelled { entity });
        }

        self.store.remove(entity, MetadataKey::Level);
        self.store.remove(entity, MetadataKey::LevelFlags);
        handle.invalidate();

        let actor = handle.actor();
        let entity_type = actor.entity_type();
        for attribute in actor.attributes() {
            if let Some(baseline) = self.baselines.default_value(&entity_type, attribute) {
                actor.set_attribute_base(attribute, baseline);
            }
        }
        if actor.explosion_radius().is_some() {
            actor.set_explosion_radius(VANILLA_BLAST_RADIUS);
        }

        let custom_name = actor.custom_name();
        let store = self.store.clone();
        let handle = handle.clone();
        self.scheduler.run_after(
            self.settings.nametag_restore_delay_ticks,
            Box::new(move || {
                if store.has(entity, MetadataKey::Level, MetadataType::Integer) {
                    tracing::debug!(entity = %entity, "Entity levelled again, keeping nametag");
                    return;
                }
                handle.actor().set_display_name(custom_name);
            }),
        );

        tracing::info!(entity = %entity, entity_type = %entity_type, "Removed level");
        Ok(())
    }

    pub fn is_levelled(&self, handle: &EntityHandle) -> bool {
        self.store
            .has(handle.id(), MetadataKey::Level, MetadataType::Integer)
    }

    pub fn level_of(&self, handle: &EntityHandle) -> Result<i32, LevelError> {
        let entity = handle.id();
        self.store
            .get_integer(entity, MetadataKey::Level)
            .ok_or(LevelError::NotLevelled { entity })
    }

    pub fn level_record(&self, handle: &EntityHandle) -> Option<LevelRecord> {
        let entity = handle.id();
        let level = self.store.get_integer(entity, MetadataKey::Level)?;
        let flags = self
            .store
            .get_integer(entity, MetadataKey::LevelFlags)
            .map(LevelFlags::from_bits)
            .unwrap_or_default();
        Some(LevelRecord { level, flags })
    }

    pub fn level_state(&self, handle: &EntityHandle) -> LevelState {
        if self.pending().contains_key(&handle.id()) {
            LevelState::Pending
        } else if self.is_levelled(handle) {
            LevelState::Applied
        } else {
            LevelState::Unlevelled
        }
    }

    /// Level through the handle's fact cache.
    fn cached_level(&self, handle: &EntityHandle) -> Option<i32> {
        let generation = self.resolver.registry().generation();
        if let Some(level) = handle.level(generation) {
            return level;
        }
        let level = self.store.get_integer(handle.id(), MetadataKey::Level);
        handle.store_level(generation, level);
        level
    }
}
