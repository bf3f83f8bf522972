//! Shared test helpers: rule corpora, actors and a wired engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use moblevels_domain::{
    Attribute, Collaborator, FineTuningAttributes, ModalList, NametagPolicy, Rule,
    RuleConditions, RuleCorpus, RuleSettings, StrategyConfig, TamedPolicy,
};

use crate::app::{App, EnginePorts};
use crate::infrastructure::baselines::StaticBaselines;
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::metadata_store::InMemoryMetadataStore;
use crate::infrastructure::ports::NotificationPort;
use crate::infrastructure::random::SeededRandom;
use crate::infrastructure::scheduler::TickScheduler;
use crate::infrastructure::settings::EngineSettings;
use crate::infrastructure::simulated::{OpenCompatibility, TracingParticleSink};

pub use crate::infrastructure::simulated::SimulatedActor as FakeActor;

// =============================================================================
// Rule Fixtures
// =============================================================================

/// Default-rule settings with every field set.
///
/// - Levels 1..=10, random strategy
/// - max_health +5, attack_damage +2, movement_speed +0.1 at max level
/// - item_drop 1, xp_drop 2; skeletons get xp_drop 10
/// - every collaborator claim blocks, blast radius capped at 5
pub fn full_settings() -> RuleSettings {
    let mut entity_fine_tuning = BTreeMap::new();
    entity_fine_tuning.insert(
        "SKELETON".to_string(),
        FineTuningAttributes {
            xp_drop: Some(10),
            ..Default::default()
        },
    );

    RuleSettings {
        min_level: Some(1),
        max_level: Some(10),
        strategy: Some(StrategyConfig::Random),
        fine_tuning: FineTuningAttributes {
            applicable_entity: None,
            max_health: Some(5.0),
            attack_damage: Some(2.0),
            item_drop: Some(1),
            xp_drop: Some(2),
            movement_speed: Some(0.1),
            ranged_attack_damage: Some(1.0),
        },
        entity_fine_tuning: Some(entity_fine_tuning),
        allowed_entities: None,
        allowed_spawn_reasons: None,
        nametag_policy: Some(NametagPolicy::Either),
        tamed_policy: Some(TamedPolicy::Either),
        collaborator_blocks: Some(Collaborator::ALL.into_iter().map(|c| (c, true)).collect()),
        max_blast_radius: Some(5),
        baby_mobs_inherit_adult: Some(false),
    }
}

fn build(default: Rule, presets: Vec<Rule>, customs: Vec<Rule>) -> RuleCorpus {
    match RuleCorpus::new(default, presets, customs) {
        Ok(corpus) => corpus,
        Err(e) => panic!("fixture corpus should build: {e}"),
    }
}

fn in_world(world: &str) -> RuleConditions {
    RuleConditions {
        worlds: Some(ModalList::allow_only([world])),
        ..Default::default()
    }
}

/// Default rule, one preset and three customs.
///
/// - "Hard Mode" (preset, nether only): levels 10..=40
/// - "nether" (nether only): min 15, uses "Hard Mode"
/// - "the end" (end only, disabled): max 99
/// - "spawners" (spawner spawns only): no item drops
pub fn standard_corpus() -> RuleCorpus {
    let hard_mode = Rule::preset(
        "Hard Mode",
        RuleSettings {
            min_level: Some(10),
            max_level: Some(40),
            ..Default::default()
        },
    )
    .with_conditions(in_world("world_nether"));

    let nether = Rule::custom(
        "nether",
        RuleSettings {
            min_level: Some(15),
            ..Default::default()
        },
    )
    .with_conditions(in_world("world_nether"))
    .using_presets(["hard_mode"]);

    let the_end = Rule::custom(
        "the end",
        RuleSettings {
            max_level: Some(99),
            ..Default::default()
        },
    )
    .with_conditions(in_world("world_the_end"))
    .with_enabled(false);

    let spawners = Rule::custom(
        "spawners",
        RuleSettings {
            fine_tuning: FineTuningAttributes {
                item_drop: Some(0),
                ..Default::default()
            },
            ..Default::default()
        },
    )
    .with_conditions(RuleConditions {
        spawn_reasons: Some(ModalList::allow_only(["spawner"])),
        ..Default::default()
    });

    build(
        Rule::default_rule(full_settings()),
        vec![hard_mode],
        vec![nether, the_end, spawners],
    )
}

/// The default rule plus `customs`, no presets.
pub fn corpus_with(customs: Vec<Rule>) -> RuleCorpus {
    build(Rule::default_rule(full_settings()), vec![], customs)
}

// =============================================================================
// Engine Harness
// =============================================================================

/// A fully wired engine over in-memory adapters.
pub struct Harness {
    pub app: App,
    pub scheduler: Arc<TickScheduler>,
    pub store: Arc<InMemoryMetadataStore>,
    pub bus: Arc<EventBus>,
}

impl Harness {
    /// Standard corpus, default settings, notifications through `bus`.
    pub fn new() -> Self {
        let bus = Arc::new(EventBus::new());
        Self::build(bus.clone(), bus)
    }

    /// Like [`Harness::new`] but publishing to `notifications`; `bus` stays
    /// unconnected.
    pub fn with_notifications(notifications: Arc<dyn NotificationPort>) -> Self {
        Self::build(Arc::new(EventBus::new()), notifications)
    }

    fn build(bus: Arc<EventBus>, notifications: Arc<dyn NotificationPort>) -> Self {
        let scheduler = Arc::new(TickScheduler::new());
        let store = Arc::new(InMemoryMetadataStore::new());
        let ports = EnginePorts {
            store: store.clone(),
            compatibility: Arc::new(OpenCompatibility),
            notifications,
            scheduler: scheduler.clone(),
            baselines: Arc::new(StaticBaselines::vanilla().with("ZOMBIE", Attribute::Armor, 2.0)),
            random: Arc::new(SeededRandom::new(7)),
            particles: Arc::new(TracingParticleSink::new()),
        };
        let app = App::new(standard_corpus(), EngineSettings::default(), ports);
        Self {
            app,
            scheduler,
            store,
            bus,
        }
    }
}

pub fn harness() -> Harness {
    Harness::new()
}
