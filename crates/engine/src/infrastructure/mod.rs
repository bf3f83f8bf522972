//! Infrastructure implementations.
//!
//! Contains port trait implementations used by the demo binary and tests,
//! plus engine-wide settings and the result cache.

pub mod baselines;
pub mod cache;
pub mod event_bus;
pub mod metadata_store;
pub mod ports;
pub mod random;
pub mod scheduler;
pub mod settings;
pub mod simulated;
