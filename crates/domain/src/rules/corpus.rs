//! The complete, validated, ordered set of rules.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::DomainError;

use super::rule::{lookup_key, Rule, RuleTier};
use super::schema::{FieldKind, RULE_FIELDS};

/// All rules in specificity order: the default rule, then presets in
/// registration order, then custom rules in authored order.
///
/// Construction enforces the corpus invariants:
/// - exactly one default rule, which sets every scalar field
/// - unique names (case-insensitive, spaces normalized)
/// - custom rules only reference presets that exist
#[derive(Debug, Clone)]
pub struct RuleCorpus {
    rules: Vec<Arc<Rule>>,
}

impl RuleCorpus {
    pub fn new(default: Rule, presets: Vec<Rule>, customs: Vec<Rule>) -> Result<Self, DomainError> {
        if default.tier() != RuleTier::Default {
            return Err(DomainError::invalid_rule_set(format!(
                "'{}' is a {} rule, expected the default rule",
                default.name(),
                default.tier()
            )));
        }
        let unset: Vec<&str> = RULE_FIELDS
            .iter()
            .filter(|f| f.kind == FieldKind::Scalar && !f.is_set(default.settings()))
            .map(|f| f.name)
            .collect();
        if !unset.is_empty() {
            return Err(DomainError::invalid_rule_set(format!(
                "default rule leaves {} unset",
                unset.join(", ")
            )));
        }

        let mut seen = HashSet::new();
        for rule in std::iter::once(&default).chain(&presets).chain(&customs) {
            rule.validate()?;
            if !seen.insert(rule.lookup_key()) {
                return Err(DomainError::invalid_rule_set(format!(
                    "duplicate rule name '{}'",
                    rule.name()
                )));
            }
        }
        if let Some(wrong) = presets.iter().find(|r| r.tier() != RuleTier::Preset) {
            return Err(DomainError::invalid_rule_set(format!(
                "'{}' registered as a preset but is a {} rule",
                wrong.name(),
                wrong.tier()
            )));
        }
        if let Some(wrong) = customs.iter().find(|r| r.tier() != RuleTier::Custom) {
            return Err(DomainError::invalid_rule_set(format!(
                "'{}' registered as a custom rule but is a {} rule",
                wrong.name(),
                wrong.tier()
            )));
        }

        let customs = customs
            .into_iter()
            .map(|rule| inherit_presets(rule, &presets))
            .collect::<Result<Vec<_>, _>>()?;

        let rules = std::iter::once(default)
            .chain(presets)
            .chain(customs)
            .map(Arc::new)
            .collect();

        Ok(Self { rules })
    }

    /// Rules in specificity order.
    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn default_rule(&self) -> &Arc<Rule> {
        // Construction guarantees the default rule is first.
        &self.rules[0]
    }

    /// Case-insensitive lookup; spaces and underscores are interchangeable.
    pub fn by_name(&self, name: &str) -> Option<&Arc<Rule>> {
        let key = lookup_key(name);
        self.rules.iter().find(|r| r.lookup_key() == key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Fill a custom rule's unset fields from the presets it uses.
///
/// Presets are consulted in the order listed; the first one that sets a
/// field supplies it and is recorded as that field's source.
fn inherit_presets(mut rule: Rule, presets: &[Rule]) -> Result<Rule, DomainError> {
    let names: Vec<String> = rule.use_presets().to_vec();
    for name in names {
        let key = lookup_key(&name);
        let preset = presets
            .iter()
            .find(|p| p.lookup_key() == key)
            .ok_or_else(|| DomainError::not_found("Preset", name.clone()))?;

        for field in RULE_FIELDS {
            if field.is_set(rule.settings()) || !field.is_set(preset.settings()) {
                continue;
            }
            field.copy_into(rule.settings_mut(), preset.settings());
            rule.record_source(field.name, preset.source_of(field.name).to_string());
        }
    }
    Ok(rule)
}
