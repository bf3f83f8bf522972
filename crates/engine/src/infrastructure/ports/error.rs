//! Error types for port operations.

/// Particle output failures. Cosmetic only; never propagated past the worker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParticleError {
    /// The world the location points at is not loaded.
    #[error("World not loaded: {0}")]
    WorldUnloaded(String),

    /// The host refused or could not emit particles.
    #[error("Particle output unavailable: {0}")]
    Unavailable(String),
}

impl ParticleError {
    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable(message.to_string())
    }
}
