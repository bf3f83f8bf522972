//! Host-provided services: compatibility predicates, events, baselines and
//! particle output.

use moblevels_domain::{Attribute, Collaborator, EntityId, EntityType, LevelEvent, Location};

use super::error::ParticleError;

// =============================================================================
// Compatibility
// =============================================================================

/// Opaque predicates answered by third-party integrations.
#[cfg_attr(test, mockall::automock)]
pub trait CompatibilityPort: Send + Sync {
    /// Whether `collaborator` manages this entity.
    fn is_claimed_by(&self, collaborator: Collaborator, entity: EntityId) -> bool;

    /// Whether protected-zone configuration permits levelling at `location`.
    fn is_levelling_allowed_at(&self, location: &Location) -> bool;
}

// =============================================================================
// Notifications
// =============================================================================

/// Synchronous event publication.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationPort: Send + Sync {
    /// Deliver to every subscriber. Returns `true` when the event was cancelled.
    fn publish(&self, event: &LevelEvent) -> bool;
}

// =============================================================================
// Species data
// =============================================================================

/// Vanilla attribute values per entity type.
#[cfg_attr(test, mockall::automock)]
pub trait BaselinePort: Send + Sync {
    fn default_value(&self, entity_type: &EntityType, attribute: Attribute) -> Option<f64>;
}

// =============================================================================
// Particles
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ParticleSink: Send + Sync {
    fn spawn(&self, location: &Location, count: u32) -> Result<(), ParticleError>;
}
