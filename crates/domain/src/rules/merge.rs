//! Merging an applicable rule list into one effective configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::rule::Rule;
use super::schema::RULE_FIELDS;
use super::settings::{LevelBounds, RuleSettings};

/// The effective settings for one entity, with the rule that supplied each
/// set field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedRules {
    settings: RuleSettings,
    sources: BTreeMap<&'static str, String>,
}

impl MergedRules {
    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    /// Rule (or inherited preset) that supplied `field`, if it is set.
    pub fn source_of(&self, field: &str) -> Option<&str> {
        self.sources.get(field).map(String::as_str)
    }

    pub fn sources(&self) -> &BTreeMap<&'static str, String> {
        &self.sources
    }

    /// Merged bounds, inverted ranges collapsed onto `min`.
    pub fn level_bounds(&self) -> Option<LevelBounds> {
        self.settings.level_bounds().map(LevelBounds::normalized)
    }
}

/// Merge `rules`, given least to most specific.
///
/// For every field the most specific rule that sets it wins. Fine-tuning
/// subfields are separate fields and merge independently; collections are
/// taken whole from the winning rule.
pub fn merge_fields(rules: &[Arc<Rule>]) -> MergedRules {
    let mut merged = MergedRules::default();
    for rule in rules.iter().rev() {
        for field in RULE_FIELDS {
            if field.is_set(&merged.settings) || !field.is_set(rule.settings()) {
                continue;
            }
            field.copy_into(&mut merged.settings, rule.settings());
            merged
                .sources
                .insert(field.name, rule.source_of(field.name).to_string());
        }
    }
    merged
}
