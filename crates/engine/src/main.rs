//! Mob levelling engine - demo entry point.
//!
//! Wires the engine over in-memory adapters, levels a handful of simulated
//! actors and logs what happened.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moblevels_domain::{
    Collaborator, FineTuningAttributes, LevelEvent, MobClass, ModalList, NametagPolicy, Position,
    Rule, RuleConditions, RuleCorpus, RuleSettings, StrategyConfig, TamedPolicy,
};
use moblevels_engine::infrastructure::{
    baselines::StaticBaselines,
    event_bus::{EventBus, Verdict},
    metadata_store::InMemoryMetadataStore,
    ports::LivingActor,
    random::random_source,
    scheduler::TickScheduler,
    settings::EngineSettings,
    simulated::{OpenCompatibility, SimulatedActor, TracingParticleSink},
};
use moblevels_engine::use_cases::ApplyOutcome;
use moblevels_engine::{App, EnginePorts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moblevels_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mob levelling engine");

    let settings = EngineSettings::from_env();
    let scheduler = Arc::new(TickScheduler::new());
    let bus = Arc::new(EventBus::new());
    let particles = Arc::new(TracingParticleSink::new());

    bus.subscribe(|event| {
        if let LevelEvent::PostLevel { entity, level, cause, .. } = event {
            tracing::debug!(entity = %entity, level, ?cause, "Post-level event");
        }
        Verdict::Continue
    });

    let ports = EnginePorts {
        store: Arc::new(InMemoryMetadataStore::new()),
        compatibility: Arc::new(OpenCompatibility),
        notifications: bus.clone(),
        scheduler: scheduler.clone(),
        baselines: Arc::new(StaticBaselines::vanilla()),
        random: random_source(&settings),
        particles: particles.clone(),
    };
    let app = App::new(demo_corpus(20)?, settings, ports);

    let actors: Vec<Arc<SimulatedActor>> = vec![
        Arc::new(SimulatedActor::zombie().at(Position::new(120.0, 64.0, -40.0))),
        Arc::new(SimulatedActor::zombie().in_world("world_nether").named("Grunt")),
        Arc::new(SimulatedActor::creeper()),
        Arc::new(SimulatedActor::new("COW", MobClass::Passive)),
        Arc::new(SimulatedActor::new("ARMOR_STAND", MobClass::Unclassified)),
    ];

    let mut handles = Vec::new();
    for actor in &actors {
        let handle = app.handle(actor.clone());
        let state = app.gate.decide(&handle);
        if !state.is_allowed() {
            tracing::info!(entity_type = %actor.entity_type(), ?state, "Not levellable");
            continue;
        }
        let level = app.generator.generate_level(&handle);
        match app
            .applicator
            .apply_level_to_mob(&handle, level, false, false, BTreeSet::new())
        {
            Ok(ApplyOutcome::Scheduled) => handles.push(handle),
            Ok(ApplyOutcome::Cancelled) => {
                tracing::info!(entity = %handle.id(), "Level cancelled")
            }
            Err(e) => tracing::warn!(error = %e, "Level rejected"),
        }
    }

    let ran = scheduler.advance(1);
    tracing::info!(tasks = ran, tick = scheduler.current_tick(), "Tick advanced");

    for handle in &handles {
        let report = app.diagnostics.effective(handle);
        tracing::info!(
            report = %serde_json::to_string(&report)?,
            xp = app.drops.scaled_xp(handle, 5),
            extra_items = app.drops.extra_item_drops(handle),
            arrow_damage = app.drops.scaled_ranged_damage(handle, 2.0),
            "Levelled entity"
        );
    }

    if let Some(first) = handles.first() {
        app.cosmetics.highlight(first.actor().location());
        if let Err(e) = app.applicator.remove_level(first) {
            tracing::warn!(error = %e, "Remove failed");
        }
        scheduler.advance(1);
    }

    let generation = app.reload(demo_corpus(30)?);
    if let Some(handle) = handles.last() {
        let bounds = app.generator.bounds_for(handle);
        tracing::info!(generation, %bounds, "Bounds after reload");
    }

    // Let the particle worker finish.
    tokio::time::sleep(Duration::from_millis(600)).await;
    tracing::info!(particles = particles.spawned(), "Demo finished");

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

/// A small corpus: distance-based levels in the overworld, a harder nether.
fn demo_corpus(max_level: i32) -> anyhow::Result<RuleCorpus> {
    let default = Rule::default_rule(RuleSettings {
        min_level: Some(1),
        max_level: Some(max_level),
        strategy: Some(StrategyConfig::SpawnDistance {
            start_distance: 50.0,
            increase_level_distance: 25.0,
            variance: 1,
        }),
        fine_tuning: FineTuningAttributes {
            applicable_entity: None,
            max_health: Some(20.0),
            attack_damage: Some(4.0),
            item_drop: Some(2),
            xp_drop: Some(10),
            movement_speed: Some(0.05),
            ranged_attack_damage: Some(3.0),
        },
        entity_fine_tuning: Some(BTreeMap::new()),
        allowed_entities: Some(ModalList::excluding(["COW"])),
        allowed_spawn_reasons: Some(ModalList::allow_all()),
        nametag_policy: Some(NametagPolicy::Either),
        tamed_policy: Some(TamedPolicy::NotTamed),
        collaborator_blocks: Some(Collaborator::ALL.into_iter().map(|c| (c, true)).collect()),
        max_blast_radius: Some(6),
        baby_mobs_inherit_adult: Some(false),
    });

    let nether = Rule::custom(
        "nether",
        RuleSettings {
            min_level: Some(max_level / 2),
            strategy: Some(StrategyConfig::Weighted {
                weights: (max_level / 2..=max_level).map(|l| (l, 1)).collect(),
                spawn_reason_weights: BTreeMap::new(),
            }),
            ..Default::default()
        },
    )
    .with_conditions(RuleConditions {
        worlds: Some(ModalList::allow_only(["world_nether"])),
        ..Default::default()
    });

    Ok(RuleCorpus::new(default, vec![], vec![nether])?)
}
