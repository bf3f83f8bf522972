//! Rules: tiers, conditions, settings, the field schema, the corpus and
//! merging.

mod corpus;
mod merge;
mod rule;
pub mod schema;
mod settings;

pub use corpus::RuleCorpus;
pub use merge::{merge_fields, MergedRules};
pub use rule::{lookup_key, ConditionSubject, Rule, RuleConditions, RuleTier, DEFAULT_SPAWN_REASON};
pub use schema::{field, FieldKind, RuleField, RULE_FIELDS};
pub use settings::{LevelBounds, NametagPolicy, RuleSettings, StrategyConfig, TamedPolicy};
