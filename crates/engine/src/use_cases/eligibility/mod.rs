//! Eligibility gate: may this entity be levelled at all?

use std::collections::BTreeSet;
use std::sync::Arc;

use moblevels_domain::{
    Collaborator, EntityType, LevellableState, MetadataKey, MobClass, NametagPolicy, TamedPolicy,
};

use crate::entities::EntityHandle;
use crate::infrastructure::ports::{CompatibilityPort, MetadataStore};
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::rules::RuleResolver;

pub struct EligibilityGate {
    resolver: Arc<RuleResolver>,
    compatibility: Arc<dyn CompatibilityPort>,
    store: Arc<dyn MetadataStore>,
    settings: Arc<EngineSettings>,
}

impl EligibilityGate {
    pub fn new(
        resolver: Arc<RuleResolver>,
        compatibility: Arc<dyn CompatibilityPort>,
        store: Arc<dyn MetadataStore>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        Self {
            resolver,
            compatibility,
            store,
            settings,
        }
    }

    /// Decide whether `handle` may be levelled. The first failing check wins.
    pub fn decide(&self, handle: &EntityHandle) -> LevellableState {
        let actor = handle.actor();
        let entity_type = actor.entity_type();

        if entity_type.is_force_blocked() {
            return LevellableState::DeniedForceBlockedEntityType;
        }

        if self.resolver.resolve_applicable_rules(handle).is_empty() {
            return LevellableState::DeniedNoApplicableRules;
        }

        let merged = self.resolver.merged(handle);
        let settings = merged.settings();
        let claims = self.claims(handle);
        if let Some(collaborator) = Collaborator::ALL
            .into_iter()
            .find(|c| settings.blocks(*c) && claims.contains(c))
        {
            return collaborator.denied_state();
        }

        // Claimed entities can change under us; recompute their facts next time.
        if !claims.is_empty() {
            handle.invalidate();
        }

        if let Some(allowed) = &settings.allowed_entities {
            if !allowed.is_enabled(entity_type.name()) {
                return LevellableState::DeniedConfigurationBlockedEntityType;
            }
        }

        if actor.custom_name().is_some()
            && settings.nametag_policy == Some(NametagPolicy::NotNametagged)
        {
            return LevellableState::DeniedConfigurationConditionNametagged;
        }

        if actor.tamed() == Some(true) && settings.tamed_policy == Some(TamedPolicy::NotTamed) {
            return LevellableState::DeniedConfigurationConditionTamed;
        }

        if let (Some(reason), Some(allowed)) = (
            self.store.get_text(actor.id(), MetadataKey::SpawnReason),
            &settings.allowed_spawn_reasons,
        ) {
            if !allowed.is_enabled(&reason) {
                return LevellableState::DeniedConfigurationBlockedSpawnReason;
            }
        }

        if !self.compatibility.is_levelling_allowed_at(&actor.location()) {
            return LevellableState::DeniedConfigurationCompatibilityWorldGuard;
        }

        LevellableState::Allowed
    }

    /// Coarse per-type check, used before an instance exists.
    ///
    /// Not a substitute for [`decide`](Self::decide): rules, collaborators and
    /// instance conditions are not consulted.
    pub fn decide_for_type(&self, entity_type: &EntityType) -> LevellableState {
        if entity_type.is_force_blocked() {
            return LevellableState::DeniedForceBlockedEntityType;
        }
        let name = entity_type.name();
        if self.settings.is_overridden(name)
            || entity_type.is_other_hostile()
            || self.settings.level_override(name).is_some()
        {
            return LevellableState::Allowed;
        }
        match entity_type.class() {
            MobClass::Unclassified => LevellableState::DeniedConfigurationBlockedEntityType,
            class if class.is_hostile() || self.settings.level_passive => LevellableState::Allowed,
            _ => LevellableState::DeniedConfigurationBlockedEntityType,
        }
    }

    fn claims(&self, handle: &EntityHandle) -> BTreeSet<Collaborator> {
        let generation = self.resolver.registry().generation();
        if let Some(claims) = handle.claims(generation) {
            return claims;
        }
        let id = handle.id();
        let claims: BTreeSet<Collaborator> = Collaborator::ALL
            .into_iter()
            .filter(|c| self.compatibility.is_claimed_by(*c, id))
            .collect();
        handle.store_claims(generation, claims.clone());
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::metadata_store::InMemoryMetadataStore;
    use crate::infrastructure::ports::{LivingActor, MockCompatibilityPort};
    use crate::test_fixtures::{self, FakeActor};
    use crate::use_cases::rules::RuleRegistry;
    use moblevels_domain::{MetadataValue, ModalList, Rule, RuleConditions, RuleCorpus, RuleSettings};

    fn permissive_compat() -> MockCompatibilityPort {
        let mut compat = MockCompatibilityPort::new();
        compat.expect_is_claimed_by().returning(|_, _| false);
        compat.expect_is_levelling_allowed_at().returning(|_| true);
        compat
    }

    fn gate_with(
        corpus: RuleCorpus,
        compat: MockCompatibilityPort,
        settings: EngineSettings,
    ) -> (EligibilityGate, Arc<InMemoryMetadataStore>) {
        let store = Arc::new(InMemoryMetadataStore::new());
        let registry = Arc::new(RuleRegistry::new(corpus));
        let resolver = Arc::new(RuleResolver::new(registry, store.clone(), 16));
        let gate = EligibilityGate::new(resolver, Arc::new(compat), store.clone(), Arc::new(settings));
        (gate, store)
    }

    fn standard_gate() -> (EligibilityGate, Arc<InMemoryMetadataStore>) {
        gate_with(
            test_fixtures::standard_corpus(),
            permissive_compat(),
            EngineSettings::default(),
        )
    }

    fn decide(gate: &EligibilityGate, actor: FakeActor) -> LevellableState {
        gate.decide(&EntityHandle::new(Arc::new(actor)))
    }

    fn with_custom(rule: Rule) -> RuleCorpus {
        test_fixtures::corpus_with(vec![rule])
    }

    #[test]
    fn force_blocked_types_are_denied_first() {
        let mut compat = MockCompatibilityPort::new();
        compat.expect_is_claimed_by().never();
        compat.expect_is_levelling_allowed_at().never();
        let (gate, _) = gate_with(test_fixtures::standard_corpus(), compat, EngineSettings::default());

        for name in ["PLAYER", "UNKNOWN", "ARMOR_STAND", "NPC"] {
            let actor = FakeActor::new(name, MobClass::Unclassified);
            assert_eq!(decide(&gate, actor), LevellableState::DeniedForceBlockedEntityType);
        }
    }

    #[test]
    fn no_applicable_rules_is_denied() {
        let default = Rule::default_rule(test_fixtures::full_settings()).with_conditions(
            RuleConditions {
                worlds: Some(ModalList::allow_only(["elsewhere"])),
                ..Default::default()
            },
        );
        let corpus = RuleCorpus::new(default, vec![], vec![]);
        let corpus = match corpus {
            Ok(c) => c,
            Err(e) => panic!("corpus should build: {e}"),
        };
        let (gate, _) = gate_with(corpus, permissive_compat(), EngineSettings::default());

        assert_eq!(
            decide(&gate, FakeActor::zombie()),
            LevellableState::DeniedNoApplicableRules
        );
    }

    #[test]
    fn blocked_collaborator_claim_is_denied() {
        let mut compat = MockCompatibilityPort::new();
        compat
            .expect_is_claimed_by()
            .returning(|c, _| c == Collaborator::Citizens);
        compat.expect_is_levelling_allowed_at().never();
        let (gate, _) = gate_with(test_fixtures::standard_corpus(), compat, EngineSettings::default());

        assert_eq!(
            decide(&gate, FakeActor::zombie()),
            LevellableState::DeniedConfigurationCompatibilityCitizens
        );
    }

    #[test]
    fn first_blocked_collaborator_decides() {
        let mut compat = MockCompatibilityPort::new();
        compat
            .expect_is_claimed_by()
            .returning(|c, _| matches!(c, Collaborator::MythicMobs | Collaborator::Citizens));
        compat.expect_is_levelling_allowed_at().never();
        let (gate, _) = gate_with(test_fixtures::standard_corpus(), compat, EngineSettings::default());

        assert_eq!(
            decide(&gate, FakeActor::zombie()),
            LevellableState::DeniedConfigurationCompatibilityMythicMobs
        );
    }

    #[test]
    fn unblocked_collaborator_claim_only_invalidates() {
        let mut settings = RuleSettings::default();
        settings.collaborator_blocks = Some([(Collaborator::Citizens, false)].into_iter().collect());
        let corpus = with_custom(Rule::custom("let citizens level", settings));

        let mut compat = MockCompatibilityPort::new();
        compat
            .expect_is_claimed_by()
            .returning(|c, _| c == Collaborator::Citizens);
        compat.expect_is_levelling_allowed_at().returning(|_| true);
        let (gate, _) = gate_with(corpus, compat, EngineSettings::default());

        let handle = EntityHandle::new(Arc::new(FakeActor::zombie()));
        assert_eq!(gate.decide(&handle), LevellableState::Allowed);
        assert!(handle.claims(1).is_none());
    }

    #[test]
    fn allowed_entities_list_is_enforced() {
        let settings = RuleSettings {
            allowed_entities: Some(ModalList::excluding(["ZOMBIE"])),
            ..Default::default()
        };
        let corpus = with_custom(Rule::custom("no zombies", settings));
        let (gate, _) = gate_with(corpus, permissive_compat(), EngineSettings::default());

        assert_eq!(
            decide(&gate, FakeActor::zombie()),
            LevellableState::DeniedConfigurationBlockedEntityType
        );
        assert_eq!(
            decide(&gate, FakeActor::new("SKELETON", MobClass::Monster)),
            LevellableState::Allowed
        );
    }

    #[test]
    fn nametag_and_tamed_policies() {
        let settings = RuleSettings {
            nametag_policy: Some(NametagPolicy::NotNametagged),
            tamed_policy: Some(TamedPolicy::NotTamed),
            ..Default::default()
        };
        let (gate, _) = gate_with(
            with_custom(Rule::custom("strict", settings)),
            permissive_compat(),
            EngineSettings::default(),
        );

        assert_eq!(
            decide(&gate, FakeActor::zombie().named("Bob")),
            LevellableState::DeniedConfigurationConditionNametagged
        );
        assert_eq!(
            decide(&gate, FakeActor::new("WOLF", MobClass::Passive).tamed(true)),
            LevellableState::DeniedConfigurationConditionTamed
        );
        assert_eq!(
            decide(&gate, FakeActor::new("WOLF", MobClass::Passive).tamed(false)),
            LevellableState::Allowed
        );
    }

    #[test]
    fn persisted_spawn_reason_is_checked() {
        let settings = RuleSettings {
            allowed_spawn_reasons: Some(ModalList::excluding(["SPAWNER"])),
            ..Default::default()
        };
        let (gate, store) = gate_with(
            with_custom(Rule::custom("no spawners", settings)),
            permissive_compat(),
            EngineSettings::default(),
        );

        let actor = FakeActor::zombie();
        store.set(actor.id(), MetadataKey::SpawnReason, MetadataValue::Text("spawner".into()));
        assert_eq!(
            decide(&gate, actor),
            LevellableState::DeniedConfigurationBlockedSpawnReason
        );
        // No persisted reason: nothing to reject.
        assert_eq!(decide(&gate, FakeActor::zombie()), LevellableState::Allowed);
    }

    #[test]
    fn protected_zone_is_checked_last() {
        let mut compat = MockCompatibilityPort::new();
        compat.expect_is_claimed_by().returning(|_, _| false);
        compat.expect_is_levelling_allowed_at().times(1).returning(|_| false);
        let (gate, _) = gate_with(test_fixtures::standard_corpus(), compat, EngineSettings::default());

        assert_eq!(
            decide(&gate, FakeActor::zombie()),
            LevellableState::DeniedConfigurationCompatibilityWorldGuard
        );
    }

    #[test]
    fn decide_is_idempotent() {
        let (gate, _) = standard_gate();
        let handle = EntityHandle::new(Arc::new(FakeActor::zombie()));
        let first = gate.decide(&handle);
        assert_eq!(first, LevellableState::Allowed);
        assert_eq!(gate.decide(&handle), first);
    }

    #[test]
    fn decide_for_type_classification() {
        let settings = EngineSettings {
            overridden_entities: ["IRON_GOLEM".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let (gate, _) = gate_with(test_fixtures::standard_corpus(), permissive_compat(), settings);

        let check = |name: &str, class| gate.decide_for_type(&EntityType::new(name, class));
        assert_eq!(check("PLAYER", MobClass::Unclassified), LevellableState::DeniedForceBlockedEntityType);
        assert_eq!(check("IRON_GOLEM", MobClass::Passive), LevellableState::Allowed);
        assert_eq!(check("GHAST", MobClass::Unclassified), LevellableState::Allowed);
        assert_eq!(check("ZOMBIE", MobClass::Monster), LevellableState::Allowed);
        assert_eq!(check("WITHER", MobClass::Boss), LevellableState::Allowed);
        assert_eq!(
            check("COW", MobClass::Passive),
            LevellableState::DeniedConfigurationBlockedEntityType
        );
        assert_eq!(
            check("MARKER", MobClass::Unclassified),
            LevellableState::DeniedConfigurationBlockedEntityType
        );
    }

    #[test]
    fn passive_mobs_allowed_when_configured() {
        let settings = EngineSettings {
            level_passive: true,
            ..Default::default()
        };
        let (gate, _) = gate_with(test_fixtures::standard_corpus(), permissive_compat(), settings);
        assert_eq!(
            gate.decide_for_type(&EntityType::new("COW", MobClass::Passive)),
            LevellableState::Allowed
        );
    }
}
