//! In-memory stand-ins for the host world: actors, compatibility and particles.
//!
//! Used by the demo binary and by tests. A real host wires its own adapters
//! to the same ports.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use moblevels_domain::{Attribute, Collaborator, EntityId, EntityType, Location, MobClass, Position};

use crate::infrastructure::ports::{CompatibilityPort, LivingActor, ParticleError, ParticleSink};

/// Mutable side of a simulated actor.
///
/// `None` in the `Option<Option<_>>` fields means "never touched by the
/// engine", as opposed to "set to nothing".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorState {
    pub attributes: BTreeMap<Attribute, f64>,
    pub explosion_radius: Option<i32>,
    pub nametag_level: Option<Option<i32>>,
    pub display_name: Option<Option<String>>,
    pub equipment_level: Option<i32>,
}

/// A living actor held entirely in memory.
pub struct SimulatedActor {
    id: EntityId,
    entity_type: EntityType,
    location: Location,
    custom_name: Option<String>,
    tamed: Option<bool>,
    baby: bool,
    reference_point: Option<Position>,
    nearby_players: usize,
    state: Mutex<ActorState>,
}

impl SimulatedActor {
    pub fn new(entity_type: &str, class: MobClass) -> Self {
        Self {
            id: EntityId::new(),
            entity_type: EntityType::new(entity_type, class),
            location: Location::new("world", Position::new(0.0, 64.0, 0.0)),
            custom_name: None,
            tamed: None,
            baby: false,
            reference_point: None,
            nearby_players: 0,
            state: Mutex::new(ActorState::default()),
        }
    }

    pub fn zombie() -> Self {
        Self::new("ZOMBIE", MobClass::Monster)
            .with_attribute(Attribute::MaxHealth, 20.0)
            .with_attribute(Attribute::AttackDamage, 3.0)
            .with_attribute(Attribute::MovementSpeed, 0.23)
            .with_attribute(Attribute::Armor, 2.0)
    }

    pub fn creeper() -> Self {
        let mut actor = Self::new("CREEPER", MobClass::Monster)
            .with_attribute(Attribute::MaxHealth, 20.0)
            .with_attribute(Attribute::MovementSpeed, 0.25);
        actor.state_mut().explosion_radius = Some(3);
        actor
    }

    pub fn in_world(mut self, world: &str) -> Self {
        self.location.world = Some(world.to_string());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.location.position = position;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.custom_name = Some(name.to_string());
        self
    }

    pub fn tamed(mut self, tamed: bool) -> Self {
        self.tamed = Some(tamed);
        self
    }

    pub fn baby(mut self) -> Self {
        self.baby = true;
        self
    }

    pub fn with_reference_point(mut self, point: Position) -> Self {
        self.reference_point = Some(point);
        self
    }

    pub fn with_nearby_players(mut self, players: usize) -> Self {
        self.nearby_players = players;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute, value: f64) -> Self {
        self.state_mut().attributes.insert(attribute, value);
        self
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<f64> {
        self.state().attributes.get(&attribute).copied()
    }

    pub fn snapshot(&self) -> ActorState {
        self.state().clone()
    }

    pub fn location_snapshot(&self) -> Location {
        self.location.clone()
    }

    fn state(&self) -> MutexGuard<'_, ActorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut ActorState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LivingActor for SimulatedActor {
    fn id(&self) -> EntityId {
        self.id
    }

    fn entity_type(&self) -> EntityType {
        self.entity_type.clone()
    }

    fn location(&self) -> Location {
        self.location.clone()
    }

    fn custom_name(&self) -> Option<String> {
        self.custom_name.clone()
    }

    fn tamed(&self) -> Option<bool> {
        self.tamed
    }

    fn is_baby(&self) -> bool {
        self.baby
    }

    fn attributes(&self) -> Vec<Attribute> {
        self.state().attributes.keys().copied().collect()
    }

    fn attribute_base(&self, attribute: Attribute) -> Option<f64> {
        self.attribute(attribute)
    }

    fn set_attribute_base(&self, attribute: Attribute, value: f64) {
        self.state().attributes.insert(attribute, value);
    }

    fn explosion_radius(&self) -> Option<i32> {
        self.state().explosion_radius
    }

    fn set_explosion_radius(&self, radius: i32) {
        self.state().explosion_radius = Some(radius);
    }

    fn nearby_players(&self, _radius: f64) -> usize {
        self.nearby_players
    }

    fn world_reference_point(&self) -> Option<Position> {
        self.reference_point
    }

    fn refresh_nametag(&self, level: Option<i32>) {
        self.state().nametag_level = Some(level);
    }

    fn set_display_name(&self, name: Option<String>) {
        self.state().display_name = Some(name);
    }

    fn refresh_equipment(&self, level: i32) {
        self.state().equipment_level = Some(level);
    }
}

/// No collaborator claims anything and every location allows levelling.
#[derive(Debug, Default)]
pub struct OpenCompatibility;

impl CompatibilityPort for OpenCompatibility {
    fn is_claimed_by(&self, _collaborator: Collaborator, _entity: EntityId) -> bool {
        false
    }

    fn is_levelling_allowed_at(&self, _location: &Location) -> bool {
        true
    }
}

/// Traces each burst instead of drawing it.
#[derive(Debug, Default)]
pub struct TracingParticleSink {
    spawned: AtomicU64,
}

impl TracingParticleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Particles spawned so far.
    pub fn spawned(&self) -> u64 {
        self.spawned.load(Ordering::Relaxed)
    }
}

impl ParticleSink for TracingParticleSink {
    fn spawn(&self, location: &Location, count: u32) -> Result<(), ParticleError> {
        let Some(world) = location.world.as_deref() else {
            return Err(ParticleError::unavailable("no world"));
        };
        self.spawned.fetch_add(u64::from(count), Ordering::Relaxed);
        tracing::trace!(world, position = ?location.position.block(), count, "Particles");
        Ok(())
    }
}
