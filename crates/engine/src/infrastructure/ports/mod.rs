//! Port traits for infrastructure boundaries.
//!
//! The engine only reaches the host through these capabilities:
//! - the live actor behind an entity
//! - the per-entity metadata store
//! - compatibility predicates (collaborator claims, protected zones)
//! - event publication, task scheduling, species baselines
//! - randomness (for deterministic tests)
//! - particle output for cosmetic feedback

mod actor;
mod error;
mod external;
mod runtime;
mod store;
mod testing;

pub use actor::LivingActor;
pub use error::ParticleError;
pub use external::{BaselinePort, CompatibilityPort, NotificationPort, ParticleSink};
pub use runtime::{SchedulerPort, Task};
pub use store::MetadataStore;
pub use testing::RandomPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockBaselinePort, MockCompatibilityPort, MockNotificationPort, MockParticleSink};

#[cfg(test)]
pub use testing::MockRandomPort;
