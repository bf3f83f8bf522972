//! Application state and composition.

use std::sync::Arc;

use moblevels_domain::RuleCorpus;

use crate::entities::EntityHandle;
use crate::infrastructure::ports::{
    BaselinePort, CompatibilityPort, LivingActor, MetadataStore, NotificationPort, ParticleSink,
    RandomPort, SchedulerPort,
};
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::{
    CosmeticFeedback, EligibilityGate, LevelApplicator, LevelGenerator, LevelledDrops,
    RuleDiagnostics, RuleRegistry, RuleResolver,
};

/// Host capabilities the engine is built on.
pub struct EnginePorts {
    pub store: Arc<dyn MetadataStore>,
    pub compatibility: Arc<dyn CompatibilityPort>,
    pub notifications: Arc<dyn NotificationPort>,
    pub scheduler: Arc<dyn SchedulerPort>,
    pub baselines: Arc<dyn BaselinePort>,
    pub random: Arc<dyn RandomPort>,
    pub particles: Arc<dyn ParticleSink>,
}

/// Main application state.
///
/// Every use case shares one registry and one resolver, so a reload is seen
/// by all of them at once.
pub struct App {
    pub registry: Arc<RuleRegistry>,
    pub resolver: Arc<RuleResolver>,
    pub gate: Arc<EligibilityGate>,
    pub generator: Arc<LevelGenerator>,
    pub applicator: Arc<LevelApplicator>,
    pub drops: Arc<LevelledDrops>,
    pub diagnostics: Arc<RuleDiagnostics>,
    pub cosmetics: Arc<CosmeticFeedback>,
    pub settings: Arc<EngineSettings>,
}

impl App {
    pub fn new(corpus: RuleCorpus, settings: EngineSettings, ports: EnginePorts) -> Self {
        let settings = Arc::new(settings);
        let registry = Arc::new(RuleRegistry::new(corpus));
        let resolver = Arc::new(RuleResolver::new(
            registry.clone(),
            ports.store.clone(),
            settings.rule_cache_capacity,
        ));
        let gate = Arc::new(EligibilityGate::new(
            resolver.clone(),
            ports.compatibility.clone(),
            ports.store.clone(),
            settings.clone(),
        ));
        let generator = Arc::new(LevelGenerator::new(
            resolver.clone(),
            ports.store.clone(),
            ports.random.clone(),
            settings.clone(),
        ));
        let applicator = Arc::new(LevelApplicator::new(
            gate.clone(),
            resolver.clone(),
            ports.store.clone(),
            ports.scheduler.clone(),
            ports.notifications.clone(),
            ports.baselines.clone(),
            settings.clone(),
        ));
        let drops = Arc::new(LevelledDrops::new(resolver.clone(), ports.store.clone()));
        let diagnostics = Arc::new(RuleDiagnostics::new(resolver.clone(), ports.store.clone()));
        let cosmetics = Arc::new(CosmeticFeedback::new(ports.scheduler, ports.particles));

        tracing::info!(
            rules = registry.snapshot().corpus.len(),
            generation = registry.generation(),
            "Levelling engine ready"
        );

        Self {
            registry,
            resolver,
            gate,
            generator,
            applicator,
            drops,
            diagnostics,
            cosmetics,
            settings,
        }
    }

    /// Wrap a live actor in a fresh handle.
    pub fn handle(&self, actor: Arc<dyn LivingActor>) -> EntityHandle {
        EntityHandle::new(actor)
    }

    /// Swap in a new rule corpus. Facts cached on existing handles go stale
    /// with the generation bump; shared caches are dropped here.
    pub fn reload(&self, corpus: RuleCorpus) -> u64 {
        let rules = corpus.len();
        let generation = self.registry.replace(corpus);
        self.resolver.clear_cache();
        self.generator.clear_pools();
        tracing::info!(rules, generation, "Rule corpus reloaded");
        generation
    }
}
