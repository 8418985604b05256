//! Resolved configuration.
//!
//! The core never reads configuration files: loading, merging, and
//! validation belong to an external collaborator, which hands the engine an
//! already-valid [`ResolvedConfig`]. Rule ids absent from the map run at
//! their default severity.

use crate::diagnostic::Severity;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strigil_fmt::FormatOptions;

/// Per-rule severity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warning,
    Error,
}

impl RuleLevel {
    /// The severity this level maps to; `None` disables the rule.
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warning => Some(Severity::Warning),
            RuleLevel::Error => Some(Severity::Error),
        }
    }
}

impl From<Severity> for RuleLevel {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Warning => RuleLevel::Warning,
            Severity::Error => RuleLevel::Error,
        }
    }
}

/// Everything the engine needs to know about how to analyze one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvedConfig {
    /// Severity overrides keyed by rule id; unlisted rules use their
    /// defaults.
    pub rules: FxHashMap<String, RuleLevel>,
    /// Formatter options, passed through to the formatting pipeline.
    pub format: FormatOptions,
    /// File extensions the engine applies to. Empty means all files.
    pub extensions: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            rules: FxHashMap::default(),
            format: FormatOptions::default(),
            extensions: ["js", "jsx", "ts", "tsx", "mjs", "cjs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ResolvedConfig {
    /// Effective severity for a rule, or `None` when configured off.
    pub fn rule_severity(&self, id: &str, default: Severity) -> Option<Severity> {
        match self.rules.get(id) {
            Some(level) => level.severity(),
            None => Some(default),
        }
    }

    /// Turn a rule off.
    pub fn disable(&mut self, id: &str) -> &mut Self {
        self.rules.insert(id.to_string(), RuleLevel::Off);
        self
    }

    /// Override a rule's severity.
    pub fn set_level(&mut self, id: &str, level: RuleLevel) -> &mut Self {
        self.rules.insert(id.to_string(), level);
        self
    }

    /// Whether a path's extension is in scope for analysis.
    pub fn applies_to(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}
