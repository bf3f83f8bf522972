//! Rule inspection: what applies to an entity, and what a rule sets.

use std::sync::Arc;

use moblevels_domain::{
    EntityId, FineTuningAttributes, Location, MetadataKey, Rule, RuleSettings, RuleTier,
    RULE_FIELDS,
};
use serde::Serialize;

use crate::entities::EntityHandle;
use crate::infrastructure::ports::MetadataStore;
use crate::use_cases::rules::RuleResolver;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticsError {
    #[error("No rule named '{0}'")]
    UnknownRule(String),
}

/// One rendered field and the rule it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValue {
    pub field: &'static str,
    pub value: String,
    pub source: String,
}

/// The effective configuration of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveReport {
    pub entity: EntityId,
    pub entity_type: String,
    pub location: Location,
    pub level: Option<i32>,
    pub applicable_rules: Vec<String>,
    pub fine_tuning: FineTuningAttributes,
    pub fields: Vec<FieldValue>,
}

/// Every field one rule sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    pub name: String,
    pub tier: RuleTier,
    pub enabled: bool,
    pub fields: Vec<FieldValue>,
}

pub struct RuleDiagnostics {
    resolver: Arc<RuleResolver>,
    store: Arc<dyn MetadataStore>,
}

impl RuleDiagnostics {
    pub fn new(resolver: Arc<RuleResolver>, store: Arc<dyn MetadataStore>) -> Self {
        Self { resolver, store }
    }

    /// Merged value and provenance of every set field for `handle`.
    pub fn effective(&self, handle: &EntityHandle) -> EffectiveReport {
        let actor = handle.actor();
        let entity_type = actor.entity_type();
        let rules = self.resolver.resolve_applicable_rules(handle);
        let merged = self.resolver.merged(handle);

        let fields = render_fields(merged.settings(), |field| {
            merged.source_of(field).unwrap_or_default().to_string()
        });

        EffectiveReport {
            entity: actor.id(),
            entity_type: entity_type.name().to_string(),
            location: actor.location(),
            level: self.store.get_integer(actor.id(), MetadataKey::Level),
            applicable_rules: rules.iter().map(|r| r.name().to_string()).collect(),
            fine_tuning: merged.settings().fine_tuning_for(entity_type.name()),
            fields,
        }
    }

    /// Fields set by the rule called `name` (case-insensitive, spaces and
    /// underscores interchangeable).
    pub fn rule_values(&self, name: &str) -> Result<RuleReport, DiagnosticsError> {
        let snapshot = self.resolver.registry().snapshot();
        let rule = snapshot
            .corpus
            .by_name(name)
            .ok_or_else(|| DiagnosticsError::UnknownRule(name.to_string()))?;
        Ok(report(rule))
    }

    /// Reports for every rule, in corpus order.
    pub fn all_rules(&self) -> Vec<RuleReport> {
        let snapshot = self.resolver.registry().snapshot();
        snapshot.corpus.rules().iter().map(|r| report(r)).collect()
    }
}

fn report(rule: &Rule) -> RuleReport {
    RuleReport {
        name: rule.name().to_string(),
        tier: rule.tier(),
        enabled: rule.is_enabled(),
        fields: render_fields(rule.settings(), |field| rule.source_of(field).to_string()),
    }
}

/// Render every set field. A field that fails to render is logged and left
/// out; the rest of the report is still produced.
fn render_fields(settings: &RuleSettings, source: impl Fn(&str) -> String) -> Vec<FieldValue> {
    RULE_FIELDS
        .iter()
        .filter_map(|field| match field.render(settings) {
            Ok(Some(value)) => Some(FieldValue {
                field: field.name,
                value,
                source: source(field.name),
            }),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(field = field.name, error = %e, "Failed to render rule field");
                None
            }
        })
        .collect()
}
