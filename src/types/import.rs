use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ImportError;

/// How imported data combines with what is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Keep existing cards and sub-menus, add what is missing.
    #[default]
    Merge,
    /// Empty every touched existing menu before repopulating it.
    Replace,
}

impl FromStr for ImportMode {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "merge" => Ok(ImportMode::Merge),
            "replace" => Ok(ImportMode::Replace),
            other => Err(ImportError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Merge => write!(f, "merge"),
            ImportMode::Replace => write!(f, "replace"),
        }
    }
}

/// Where top-level folders land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImportTarget {
    /// Match or create menus by folder name.
    #[default]
    Auto,
    /// Put everything into one existing menu.
    Menu(i64),
}

impl FromStr for ImportTarget {
    type Err = ImportError;

    /// Accepts `auto`, `menu:<id>` or a bare positive id. Blank means `auto`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
            return Ok(ImportTarget::Auto);
        }
        let digits = match raw.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("menu:") => &raw[5..],
            _ => raw,
        };
        match digits.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(ImportTarget::Menu(id)),
            _ => Err(ImportError::InvalidTarget(raw.to_string())),
        }
    }
}

impl fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportTarget::Auto => write!(f, "auto"),
            ImportTarget::Menu(id) => write!(f, "menu:{}", id),
        }
    }
}

/// The caller's reconciliation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportPolicy {
    pub mode: ImportMode,
    pub target: ImportTarget,
    pub dry_run: bool,
}

/// Parses a form-style boolean. Blank means `false`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "off" | "no" => Some(false),
        "true" | "1" | "on" | "yes" => Some(true),
        _ => None,
    }
}

/// Per-entity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub menus: usize,
    pub sub_menus: usize,
    pub cards: usize,
}

/// Outcome counts of one reconciliation. `updated` stays zero: entities are
/// only ever created or skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportStats {
    pub created: EntityCounts,
    pub updated: EntityCounts,
    pub skipped: EntityCounts,
}

/// Preview entry for the response sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCard {
    pub title: String,
    pub url: String,
}

/// What the reconciler hands back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub stats: ImportStats,
    pub errors: Vec<String>,
    pub sample: Vec<SampleCard>,
}

/// Successful import response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub ok: bool,
    pub dry_run: bool,
    pub created: EntityCounts,
    pub updated: EntityCounts,
    pub skipped: EntityCounts,
    pub errors: Vec<String>,
    pub sample: Vec<SampleCard>,
}

impl ImportResponse {
    pub fn from_report(report: ImportReport, dry_run: bool) -> Self {
        Self {
            ok: true,
            dry_run,
            created: report.stats.created,
            updated: report.stats.updated,
            skipped: report.stats.skipped,
            errors: report.errors,
            sample: report.sample,
        }
    }
}
