//! External systems that may claim ownership of an entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::levellable_state::LevellableState;

/// A third-party system whose entities users may want left alone.
///
/// The gate asks about collaborators in the order of [`Collaborator::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    MythicMobs,
    DangerousCaves,
    EliteMobs,
    InfernalMobs,
    Citizens,
    Shopkeepers,
}

impl Collaborator {
    pub const ALL: [Collaborator; 6] = [
        Collaborator::MythicMobs,
        Collaborator::DangerousCaves,
        Collaborator::EliteMobs,
        Collaborator::InfernalMobs,
        Collaborator::Citizens,
        Collaborator::Shopkeepers,
    ];

    /// The gate result when this collaborator's claim vetoes levelling.
    pub fn denied_state(&self) -> LevellableState {
        match self {
            Self::MythicMobs => LevellableState::DeniedConfigurationCompatibilityMythicMobs,
            Self::DangerousCaves => LevellableState::DeniedConfigurationCompatibilityDangerousCaves,
            Self::EliteMobs => LevellableState::DeniedConfigurationCompatibilityEliteMobs,
            Self::InfernalMobs => LevellableState::DeniedConfigurationCompatibilityInfernalMobs,
            Self::Citizens => LevellableState::DeniedConfigurationCompatibilityCitizens,
            Self::Shopkeepers => LevellableState::DeniedConfigurationCompatibilityShopkeepers,
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MythicMobs => "mythic_mobs",
            Self::DangerousCaves => "dangerous_caves",
            Self::EliteMobs => "elite_mobs",
            Self::InfernalMobs => "infernal_mobs",
            Self::Citizens => "citizens",
            Self::Shopkeepers => "shopkeepers",
        };
        f.write_str(name)
    }
}
