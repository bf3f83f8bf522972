//! Mob levelling engine library.
//!
//! ## Structure
//!
//! - `entities/` - Entity handles with their cached facts
//! - `use_cases/` - Eligibility, rule resolution, generation and application
//! - `infrastructure/` - Port traits and in-memory implementations
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// Shared fixtures for unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{App, EnginePorts};
