//! Use cases - levelling operations.
//!
//! Each module owns one step of the pipeline: eligibility, rule resolution,
//! level generation, level application, plus drops, diagnostics and
//! cosmetic feedback built on top of them.

pub mod cosmetics;
pub mod diagnostics;
pub mod drops;
pub mod eligibility;
pub mod generation;
pub mod levelling;
pub mod rules;

// Re-export main types
pub use cosmetics::CosmeticFeedback;
pub use diagnostics::{DiagnosticsError, EffectiveReport, FieldValue, RuleDiagnostics, RuleReport};
pub use drops::LevelledDrops;
pub use eligibility::EligibilityGate;
pub use generation::{LevelGenerator, LevellingStrategy};
pub use levelling::{ApplyOutcome, AttributeScaling, LevelApplicator, LevelError, LevelState};
pub use rules::{RuleRegistry, RuleResolver};
