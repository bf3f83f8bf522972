//! Outcome of the eligibility gate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an entity may be levelled, and if not, why.
///
/// There is exactly one allowing value. Every other value names the first
/// check in the veto chain that rejected the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevellableState {
    /// The entity may be levelled.
    Allowed,

    /// Entity types such as players or armor stands are never levelled.
    DeniedForceBlockedEntityType,

    /// No rule in the corpus applies to the entity.
    DeniedNoApplicableRules,

    /// The entity type is rejected by the allowed-entities list.
    DeniedConfigurationBlockedEntityType,

    /// The persisted spawn reason is rejected by the allowed-spawn-reasons list.
    DeniedConfigurationBlockedSpawnReason,

    DeniedConfigurationCompatibilityMythicMobs,
    DeniedConfigurationCompatibilityDangerousCaves,
    DeniedConfigurationCompatibilityEliteMobs,
    DeniedConfigurationCompatibilityInfernalMobs,
    DeniedConfigurationCompatibilityCitizens,
    DeniedConfigurationCompatibilityShopkeepers,

    /// A region/zone policy forbids levelling at the entity's location.
    DeniedConfigurationCompatibilityWorldGuard,

    /// Nametagged entities are configured not to level.
    DeniedConfigurationConditionNametagged,

    /// Tamed entities are configured not to level.
    DeniedConfigurationConditionTamed,
}

impl LevellableState {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "ALLOWED",
            Self::DeniedForceBlockedEntityType => "DENIED_FORCE_BLOCKED_ENTITY_TYPE",
            Self::DeniedNoApplicableRules => "DENIED_NO_APPLICABLE_RULES",
            Self::DeniedConfigurationBlockedEntityType => {
                "DENIED_CONFIGURATION_BLOCKED_ENTITY_TYPE"
            }
            Self::DeniedConfigurationBlockedSpawnReason => {
                "DENIED_CONFIGURATION_BLOCKED_SPAWN_REASON"
            }
            Self::DeniedConfigurationCompatibilityMythicMobs => {
                "DENIED_CONFIGURATION_COMPATIBILITY_MYTHIC_MOBS"
            }
            Self::DeniedConfigurationCompatibilityDangerousCaves => {
                "DENIED_CONFIGURATION_COMPATIBILITY_DANGEROUS_CAVES"
            }
            Self::DeniedConfigurationCompatibilityEliteMobs => {
                "DENIED_CONFIGURATION_COMPATIBILITY_ELITE_MOBS"
            }
            Self::DeniedConfigurationCompatibilityInfernalMobs => {
                "DENIED_CONFIGURATION_COMPATIBILITY_INFERNAL_MOBS"
            }
            Self::DeniedConfigurationCompatibilityCitizens => {
                "DENIED_CONFIGURATION_COMPATIBILITY_CITIZENS"
            }
            Self::DeniedConfigurationCompatibilityShopkeepers => {
                "DENIED_CONFIGURATION_COMPATIBILITY_SHOPKEEPERS"
            }
            Self::DeniedConfigurationCompatibilityWorldGuard => {
                "DENIED_CONFIGURATION_COMPATIBILITY_WORLD_GUARD"
            }
            Self::DeniedConfigurationConditionNametagged => {
                "DENIED_CONFIGURATION_CONDITION_NAMETAGGED"
            }
            Self::DeniedConfigurationConditionTamed => "DENIED_CONFIGURATION_CONDITION_TAMED",
        }
    }
}

impl fmt::Display for LevellableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
