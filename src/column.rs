//! Column identity resolution for wide EPM tables
//!
//! Data columns encode subject, group and condition in their header, e.g.
//! `PD_1_NoStim`, `PD1_Stim`, `CO_2_NoStim`, `CO 2 - Stim`. Headers that do
//! not follow the scheme resolve to `None` and are skipped by the record
//! builder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Experimental group of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    /// Parkinsonian animals (`PD` prefix)
    #[serde(alias = "PD")]
    Treatment,
    /// Control animals (`CO` prefix)
    #[serde(alias = "CO")]
    Control,
}

impl Group {
    /// Label used in output tables
    pub fn label(self) -> &'static str {
        match self {
            Group::Treatment => "PD",
            Group::Control => "Control",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stimulation condition of a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    /// No stimulation (`NoStim`)
    #[serde(alias = "No-Stim", alias = "NoStim")]
    Baseline,
    /// Stimulation on (`Stim`)
    #[serde(alias = "Stim")]
    Intervention,
}

impl Condition {
    /// Label used in output tables
    pub fn label(self) -> &'static str {
        match self {
            Condition::Baseline => "No-Stim",
            Condition::Intervention => "Stim",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity decoded from a data column header
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnIdentity {
    pub subject: String,
    pub group: Group,
    pub condition: Condition,
}

/// Strip the whitespace and hyphen noise that spreadsheet exports add to headers
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

fn is_bare_prefix(token: &str) -> bool {
    token == "PD" || token == "CO"
}

/// Decode (Subject, Group, Condition) from a column header
///
/// Rules, applied to the normalized name:
/// - prefix `PD` → [`Group::Treatment`], prefix `CO` → [`Group::Control`]
/// - substring `NoStim` → [`Condition::Baseline`], else substring `Stim` →
///   [`Condition::Intervention`]
/// - subject is the token before the first `_` once the condition token is
///   removed; a bare `PD`/`CO` token is joined with the token that follows
///   it, so `PD_1_NoStim`, `PD1_Stim` and `PD 1 - Stim` all name the same
///   subject `PD1`
///
/// # Example
/// ```
/// use plusmaze::column::{resolve_column_identity, Condition, Group};
///
/// let id = resolve_column_identity("PD_1_NoStim").unwrap();
/// assert_eq!(id.subject, "PD1");
/// assert_eq!(id.group, Group::Treatment);
/// assert_eq!(id.condition, Condition::Baseline);
///
/// assert!(resolve_column_identity("XYZ_99").is_none());
/// ```
pub fn resolve_column_identity(name: &str) -> Option<ColumnIdentity> {
    let normalized = normalize_column_name(name);

    let group = if normalized.starts_with("PD") {
        Group::Treatment
    } else if normalized.starts_with("CO") {
        Group::Control
    } else {
        return None;
    };

    // "NoStim" contains "Stim", so the baseline check must come first
    let (condition, token) = if normalized.contains("NoStim") {
        (Condition::Baseline, "NoStim")
    } else if normalized.contains("Stim") {
        (Condition::Intervention, "Stim")
    } else {
        return None;
    };

    // The condition token is not part of the subject key
    let remainder = normalized.replacen(token, "", 1);
    let mut tokens = remainder.split('_').filter(|t| !t.is_empty());
    let first = tokens.next().unwrap_or_default();
    let subject = match tokens.next() {
        Some(number) if is_bare_prefix(first) => format!("{}{}", first, number),
        _ => first.to_string(),
    };

    Some(ColumnIdentity {
        subject,
        group,
        condition,
    })
}
