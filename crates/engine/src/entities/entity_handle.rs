//! A live actor plus lazily computed facts about it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moblevels_domain::{Collaborator, EntityId, EntityType, MergedRules, Rule};

use crate::infrastructure::ports::LivingActor;

/// Derived facts, valid for one rule-corpus generation.
#[derive(Default)]
struct Facts {
    generation: u64,
    applicable_rules: Option<Arc<[Arc<Rule>]>>,
    merged_rules: Option<Arc<MergedRules>>,
    claims: Option<BTreeSet<Collaborator>>,
    level: Option<Option<i32>>,
}

/// Handle to one entity instance.
///
/// Cheap to clone; clones share the fact cache. Facts computed under an
/// older corpus generation read as misses.
#[derive(Clone)]
pub struct EntityHandle {
    actor: Arc<dyn LivingActor>,
    facts: Arc<Mutex<Facts>>,
}

impl EntityHandle {
    pub fn new(actor: Arc<dyn LivingActor>) -> Self {
        Self {
            actor,
            facts: Arc::new(Mutex::new(Facts::default())),
        }
    }

    pub fn actor(&self) -> &Arc<dyn LivingActor> {
        &self.actor
    }

    pub fn id(&self) -> EntityId {
        self.actor.id()
    }

    pub fn entity_type(&self) -> EntityType {
        self.actor.entity_type()
    }

    /// Drop every cached fact.
    pub fn invalidate(&self) {
        *self.lock() = Facts::default();
    }

    fn lock(&self) -> MutexGuard<'_, Facts> {
        self.facts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn facts_at(&self, generation: u64) -> MutexGuard<'_, Facts> {
        let mut facts = self.lock();
        if facts.generation != generation {
            *facts = Facts {
                generation,
                ..Facts::default()
            };
        }
        facts
    }

    pub fn applicable_rules(&self, generation: u64) -> Option<Arc<[Arc<Rule>]>> {
        self.facts_at(generation).applicable_rules.clone()
    }

    pub fn store_applicable_rules(&self, generation: u64, rules: Arc<[Arc<Rule>]>) {
        self.facts_at(generation).applicable_rules = Some(rules);
    }

    pub fn merged_rules(&self, generation: u64) -> Option<Arc<MergedRules>> {
        self.facts_at(generation).merged_rules.clone()
    }

    pub fn store_merged_rules(&self, generation: u64, merged: Arc<MergedRules>) {
        self.facts_at(generation).merged_rules = Some(merged);
    }

    /// Collaborators that claim this entity.
    pub fn claims(&self, generation: u64) -> Option<BTreeSet<Collaborator>> {
        self.facts_at(generation).claims.clone()
    }

    pub fn store_claims(&self, generation: u64, claims: BTreeSet<Collaborator>) {
        self.facts_at(generation).claims = Some(claims);
    }

    /// Cached level read; `Some(None)` means known to be unlevelled.
    pub fn level(&self, generation: u64) -> Option<Option<i32>> {
        self.facts_at(generation).level
    }

    pub fn store_level(&self, generation: u64, level: Option<i32>) {
        self.facts_at(generation).level = Some(level);
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityHandle")
            .field("id", &self.actor.id())
            .field("entity_type", &self.actor.entity_type())
            .finish()
    }
}
