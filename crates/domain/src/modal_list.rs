//! Allow/deny lists used by rule conditions and policies.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An allow-list / deny-list pair with wildcard switches.
///
/// Comparisons are case-insensitive. An empty list restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalList {
    allowed: BTreeSet<String>,
    excluded: BTreeSet<String>,
    allow_all: bool,
    exclude_all: bool,
}

impl ModalList {
    /// Only the listed items are enabled.
    pub fn allow_only<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: normalize(items),
            ..Self::default()
        }
    }

    /// Everything except the listed items is enabled.
    pub fn excluding<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded: normalize(items),
            allow_all: true,
            ..Self::default()
        }
    }

    /// Nothing is enabled.
    pub fn deny_all() -> Self {
        Self {
            exclude_all: true,
            ..Self::default()
        }
    }

    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.excluded.is_empty() && !self.allow_all && !self.exclude_all
    }

    pub fn is_enabled(&self, item: &str) -> bool {
        let in_allowed = contains(&self.allowed, item);
        if contains(&self.excluded, item) {
            return false;
        }
        if self.exclude_all && !self.allow_all {
            return in_allowed;
        }
        if self.allow_all || self.allowed.is_empty() {
            return true;
        }
        in_allowed
    }
}

fn normalize<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_ascii_lowercase())
        .collect()
}

// Deserialized lists are not normalized, so compare without case.
fn contains(set: &BTreeSet<String>, item: &str) -> bool {
    set.iter().any(|s| s.eq_ignore_ascii_case(item.trim()))
}

impl fmt::Display for ModalList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.allow_all {
            parts.push("allowed: *".to_string());
        } else if !self.allowed.is_empty() {
            let items: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
            parts.push(format!("allowed: [{}]", items.join(", ")));
        }
        if self.exclude_all {
            parts.push("excluded: *".to_string());
        } else if !self.excluded.is_empty() {
            let items: Vec<&str> = self.excluded.iter().map(String::as_str).collect();
            parts.push(format!("excluded: [{}]", items.join(", ")));
        }
        if parts.is_empty() {
            f.write_str("(empty)")
        } else {
            f.write_str(&parts.join("; "))
        }
    }
}
