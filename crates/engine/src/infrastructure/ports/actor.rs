//! The live actor behind an entity handle.

use moblevels_domain::{Attribute, EntityId, EntityType, Location, Position};

/// Capabilities of a living entity in the host world.
///
/// Reads reflect the actor's current state; the engine caches derived facts
/// on the entity handle, never here.
pub trait LivingActor: Send + Sync {
    fn id(&self) -> EntityId;

    fn entity_type(&self) -> EntityType;

    fn location(&self) -> Location;

    /// Name given by a player or another plugin, if any.
    fn custom_name(&self) -> Option<String>;

    /// `None` when the entity cannot be tamed at all.
    fn tamed(&self) -> Option<bool>;

    fn is_baby(&self) -> bool;

    /// Attributes this actor exposes.
    fn attributes(&self) -> Vec<Attribute>;

    fn attribute_base(&self, attribute: Attribute) -> Option<f64>;

    fn set_attribute_base(&self, attribute: Attribute, value: f64);

    /// Explosion radius of explosive kinds; `None` for everything else.
    fn explosion_radius(&self) -> Option<i32>;

    fn set_explosion_radius(&self, radius: i32);

    /// Players within `radius` blocks.
    fn nearby_players(&self, radius: f64) -> usize;

    /// Reference point (spawn) of the actor's world, if the world is loaded.
    fn world_reference_point(&self) -> Option<Position>;

    /// Re-render the levelled nametag. Text rendering belongs to the host.
    fn refresh_nametag(&self, level: Option<i32>);

    /// Set the visible display name; `None` clears it.
    fn set_display_name(&self, name: Option<String>);

    /// Re-roll level-dependent equipment.
    fn refresh_equipment(&self, level: i32);
}
