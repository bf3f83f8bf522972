//! Levelling error types.

use moblevels_domain::{EntityId, LevellableState};

/// Precondition violations. Policy denials are reported as
/// [`LevellableState`] values; these are caller mistakes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("Level must not be negative, got {0}")]
    NegativeLevel(i32),

    #[error("Entity {entity} may not be levelled: {state}")]
    NotLevellable {
        entity: EntityId,
        state: LevellableState,
    },

    #[error("Entity {entity} is not levelled")]
    NotLevelled { entity: EntityId },
}
