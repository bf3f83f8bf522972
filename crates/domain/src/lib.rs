pub mod attributes;
pub mod collaborator;
pub mod entity_type;
pub mod error;
pub mod events;
pub mod fine_tuning;
pub mod ids;
pub mod levellable_state;
pub mod metadata;
pub mod modal_list;
pub mod rules;

pub use attributes::Attribute;
pub use collaborator::Collaborator;
pub use entity_type::{
    EntityType, Location, MobClass, Position, FORCE_BLOCKED_ENTITY_TYPES, OTHER_HOSTILE_MOBS,
};
pub use error::DomainError;
pub use events::{AdditionalLevelInformation, LevelCause, LevelEvent};
pub use fine_tuning::FineTuningAttributes;
pub use ids::EntityId;
pub use levellable_state::LevellableState;
pub use metadata::{LevelFlags, LevelRecord, MetadataKey, MetadataType, MetadataValue};
pub use modal_list::ModalList;

// Re-export rule types
pub use rules::{
    lookup_key, merge_fields, ConditionSubject, FieldKind, LevelBounds, MergedRules, NametagPolicy,
    Rule, RuleConditions, RuleCorpus, RuleField, RuleSettings, RuleTier, StrategyConfig, TamedPolicy,
    DEFAULT_SPAWN_REASON, RULE_FIELDS,
};
