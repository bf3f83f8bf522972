//! A single named rule: tier, applicability conditions and settings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::modal_list::ModalList;

use super::settings::RuleSettings;

/// Specificity tier. Later tiers override earlier ones field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTier {
    Default,
    Preset,
    Custom,
}

impl fmt::Display for RuleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Preset => write!(f, "preset"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// The facts a rule's conditions are matched against.
#[derive(Debug, Clone, Copy)]
pub struct ConditionSubject<'a> {
    pub entity_type: &'a str,
    pub world: Option<&'a str>,
    pub spawn_reason: Option<&'a str>,
    pub custom_name: Option<&'a str>,
}

/// Spawn reason assumed when none was persisted for the entity.
pub const DEFAULT_SPAWN_REASON: &str = "default";

/// Applicability predicate of a rule. Unset conditions always match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConditions {
    pub worlds: Option<ModalList>,
    pub entities: Option<ModalList>,
    pub spawn_reasons: Option<ModalList>,
    pub custom_names: Option<ModalList>,
}

impl RuleConditions {
    pub fn matches(&self, subject: &ConditionSubject<'_>) -> bool {
        if let Some(worlds) = &self.worlds {
            // A world filter cannot match an entity without a world.
            match subject.world {
                Some(world) if worlds.is_enabled(world) => {}
                _ => return false,
            }
        }
        if let Some(entities) = &self.entities {
            if !entities.is_enabled(subject.entity_type) {
                return false;
            }
        }
        if let Some(reasons) = &self.spawn_reasons {
            if !reasons.is_enabled(subject.spawn_reason.unwrap_or(DEFAULT_SPAWN_REASON)) {
                return false;
            }
        }
        if let Some(names) = &self.custom_names {
            if !names.is_enabled(subject.custom_name.unwrap_or("")) {
                return false;
            }
        }
        true
    }
}

/// A named, tiered unit of configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    name: String,
    tier: RuleTier,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default)]
    conditions: RuleConditions,
    #[serde(default)]
    settings: RuleSettings,
    /// Presets whose fields fill this rule's unset fields.
    #[serde(default)]
    use_presets: Vec<String>,
    /// Field name -> rule that supplied it, for inherited fields only.
    #[serde(skip)]
    provenance: BTreeMap<&'static str, String>,
}

fn enabled_by_default() -> bool {
    true
}

impl Rule {
    fn with_tier(name: impl Into<String>, tier: RuleTier, settings: RuleSettings) -> Self {
        Self {
            name: name.into(),
            tier,
            enabled: true,
            conditions: RuleConditions::default(),
            settings,
            use_presets: Vec::new(),
            provenance: BTreeMap::new(),
        }
    }

    pub fn default_rule(settings: RuleSettings) -> Self {
        Self::with_tier("default", RuleTier::Default, settings)
    }

    pub fn preset(name: impl Into<String>, settings: RuleSettings) -> Self {
        Self::with_tier(name, RuleTier::Preset, settings)
    }

    pub fn custom(name: impl Into<String>, settings: RuleSettings) -> Self {
        Self::with_tier(name, RuleTier::Custom, settings)
    }

    pub fn with_conditions(mut self, conditions: RuleConditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn using_presets<I, S>(mut self, presets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.use_presets = presets.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive lookup form of the name, spaces replaced by `_`.
    pub fn lookup_key(&self) -> String {
        lookup_key(&self.name)
    }

    pub fn tier(&self) -> RuleTier {
        self.tier
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn conditions(&self) -> &RuleConditions {
        &self.conditions
    }

    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    pub fn use_presets(&self) -> &[String] {
        &self.use_presets
    }

    /// Name of the rule that supplied `field` on this rule.
    pub fn source_of(&self, field: &str) -> &str {
        self.provenance
            .get(field)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Rule name cannot be empty"));
        }
        if let (Some(min), Some(max)) = (self.settings.min_level, self.settings.max_level) {
            if min < 0 || max < 0 {
                return Err(DomainError::validation(format!(
                    "Rule '{}' has a negative level bound",
                    self.name
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn settings_mut(&mut self) -> &mut RuleSettings {
        &mut self.settings
    }

    pub(crate) fn record_source(&mut self, field: &'static str, source: String) {
        self.provenance.insert(field, source);
    }
}

/// Normalize a rule name for lookup.
pub fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject<'a>(world: Option<&'a str>, reason: Option<&'a str>) -> ConditionSubject<'a> {
        ConditionSubject {
            entity_type: "ZOMBIE",
            world,
            spawn_reason: reason,
            custom_name: None,
        }
    }

    #[test]
    fn unset_conditions_match_everything() {
        assert!(RuleConditions::default().matches(&subject(None, None)));
    }

    #[test]
    fn world_filter_requires_a_world() {
        let conditions = RuleConditions {
            worlds: Some(ModalList::allow_only(["world"])),
            ..Default::default()
        };
        assert!(conditions.matches(&subject(Some("World"), None)));
        assert!(!conditions.matches(&subject(Some("world_nether"), None)));
        assert!(!conditions.matches(&subject(None, None)));
    }

    #[test]
    fn missing_spawn_reason_is_treated_as_default() {
        let conditions = RuleConditions {
            spawn_reasons: Some(ModalList::allow_only(["default", "natural"])),
            ..Default::default()
        };
        assert!(conditions.matches(&subject(None, None)));
        assert!(!conditions.matches(&subject(None, Some("spawner"))));
    }

    #[test]
    fn lookup_key_normalizes_case_and_spaces() {
        let rule = Rule::custom("Nether Mobs", RuleSettings::default());
        assert_eq!(rule.lookup_key(), "nether_mobs");
        assert_eq!(lookup_key(" NETHER mobs"), "nether_mobs");
    }

    #[test]
    fn source_defaults_to_own_name() {
        let mut rule = Rule::custom("bosses", RuleSettings::default());
        assert_eq!(rule.source_of("max_level"), "bosses");
        rule.record_source("max_level", "hard_mode".to_string());
        assert_eq!(rule.source_of("max_level"), "hard_mode");
    }

    #[test]
    fn negative_bounds_fail_validation() {
        let rule = Rule::custom(
            "broken",
            RuleSettings {
                min_level: Some(-1),
                max_level: Some(5),
                ..Default::default()
            },
        );
        assert!(matches!(rule.validate(), Err(DomainError::Validation(_))));
    }
}
