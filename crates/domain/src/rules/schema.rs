//! Static schema of rule fields.
//!
//! Each entry knows how to tell whether a [`RuleSettings`] sets the field,
//! how to render it for inspection, and how to copy it between settings.
//! Merging, preset inheritance and diagnostics all walk this table instead
//! of introspecting structs at runtime.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Write};

use super::settings::RuleSettings;

/// Whether a field holds a single value or a collection.
///
/// Collections that are unset or empty count as absent and are replaced
/// wholesale, never merged element-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Collection,
}

/// One entry of the rule field schema.
pub struct RuleField {
    pub name: &'static str,
    pub kind: FieldKind,
    is_set: fn(&RuleSettings) -> bool,
    render: fn(&RuleSettings) -> Result<Option<String>, fmt::Error>,
    copy: fn(&mut RuleSettings, &RuleSettings),
}

impl RuleField {
    pub fn is_set(&self, settings: &RuleSettings) -> bool {
        (self.is_set)(settings)
    }

    /// Rendered value, `Ok(None)` when unset.
    pub fn render(&self, settings: &RuleSettings) -> Result<Option<String>, fmt::Error> {
        (self.render)(settings)
    }

    /// Copy this field from `source` into `target`.
    pub fn copy_into(&self, target: &mut RuleSettings, source: &RuleSettings) {
        (self.copy)(target, source)
    }
}

impl fmt::Debug for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

fn display<T: Display + ?Sized>(value: &T) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", value)?;
    Ok(out)
}

fn display_map<K: Display, V: Display>(map: &BTreeMap<K, V>) -> Result<String, fmt::Error> {
    let mut out = String::from("{");
    for (i, (k, v)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "{}: {}", k, v)?;
    }
    out.push('}');
    Ok(out)
}

macro_rules! scalar {
    ($name:literal, $($path:ident).+) => {
        RuleField {
            name: $name,
            kind: FieldKind::Scalar,
            is_set: |s| s.$($path).+.is_some(),
            render: |s| s.$($path).+.as_ref().map(display).transpose(),
            copy: |t, s| t.$($path).+ = s.$($path).+.clone(),
        }
    };
}

macro_rules! collection {
    ($name:literal, $field:ident, $render:expr) => {
        RuleField {
            name: $name,
            kind: FieldKind::Collection,
            is_set: |s| s.$field.as_ref().is_some_and(|c| !c.is_empty()),
            render: |s| {
                s.$field
                    .as_ref()
                    .filter(|c| !c.is_empty())
                    .map($render)
                    .transpose()
            },
            copy: |t, s| t.$field = s.$field.clone(),
        }
    };
}

/// Every rule field, in display order.
pub static RULE_FIELDS: &[RuleField] = &[
    scalar!("min_level", min_level),
    scalar!("max_level", max_level),
    scalar!("strategy", strategy),
    scalar!("fine_tuning.max_health", fine_tuning.max_health),
    scalar!("fine_tuning.attack_damage", fine_tuning.attack_damage),
    scalar!("fine_tuning.item_drop", fine_tuning.item_drop),
    scalar!("fine_tuning.xp_drop", fine_tuning.xp_drop),
    scalar!("fine_tuning.movement_speed", fine_tuning.movement_speed),
    scalar!(
        "fine_tuning.ranged_attack_damage",
        fine_tuning.ranged_attack_damage
    ),
    collection!("entity_fine_tuning", entity_fine_tuning, display_map),
    collection!("allowed_entities", allowed_entities, display),
    collection!("allowed_spawn_reasons", allowed_spawn_reasons, display),
    scalar!("nametag_policy", nametag_policy),
    scalar!("tamed_policy", tamed_policy),
    collection!("collaborator_blocks", collaborator_blocks, display_map),
    scalar!("max_blast_radius", max_blast_radius),
    scalar!("baby_mobs_inherit_adult", baby_mobs_inherit_adult),
];

/// Look a field up by name.
pub fn field(name: &str) -> Option<&'static RuleField> {
    RULE_FIELDS.iter().find(|f| f.name == name)
}
