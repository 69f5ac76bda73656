// 🏷️ Stat Lookup - statistic key → human label
// Built once at start-up, then handed to whatever renders entries

use crate::format::{StatFormatter, StatFormatters};
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One row of the `statistic` lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLabel {
    /// Raw stat key as used in tabs.json (e.g. "totalDamage")
    pub statistic: String,

    /// Display name. May be empty when nobody has translated it yet.
    #[serde(default)]
    pub name: String,

    /// How values are shown: "none", "time", "timestamp", or a template
    /// where `{}` stands for the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<String>,
}

impl StatLabel {
    pub fn new(statistic: impl Into<String>, name: impl Into<String>) -> Self {
        StatLabel {
            statistic: statistic.into(),
            name: name.into(),
            formatting: None,
        }
    }

    pub fn with_formatting(mut self, formatting: impl Into<String>) -> Self {
        self.formatting = Some(formatting.into());
        self
    }
}

/// StatLookup - read-only catalogue of stat labels
#[derive(Debug, Clone, Default)]
pub struct StatLookup {
    labels: HashMap<String, StatLabel>,
}

impl StatLookup {
    pub fn new() -> Self {
        StatLookup {
            labels: HashMap::new(),
        }
    }

    pub fn from_labels(labels: impl IntoIterator<Item = StatLabel>) -> Self {
        let mut lookup = StatLookup::new();
        for label in labels {
            lookup.register(label);
        }
        lookup
    }

    /// Load labels from a JSON array of `{ statistic, name }`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read stat labels: {:?}", path.as_ref()))?;

        let labels: Vec<StatLabel> =
            serde_json::from_str(&content).context("Failed to parse stat labels JSON")?;

        Ok(StatLookup::from_labels(labels))
    }

    /// Register a label, replacing any existing one for the same key
    pub fn register(&mut self, label: StatLabel) {
        self.labels.insert(label.statistic.clone(), label);
    }

    /// Overlay `other` on top of this lookup; its labels win.
    ///
    /// An overlay label without a formatting keeps the one already known.
    pub fn merge(&mut self, other: StatLookup) {
        for (statistic, mut label) in other.labels {
            if label.formatting.is_none() {
                label.formatting = self
                    .labels
                    .get(&statistic)
                    .and_then(|existing| existing.formatting.clone());
            }
            self.labels.insert(statistic, label);
        }
    }

    pub fn get(&self, statistic: &str) -> Option<&StatLabel> {
        self.labels.get(statistic)
    }

    /// Resolve the label shown next to a stat value.
    ///
    /// Known with a name → the name. Known without one → the raw key.
    /// Unknown → `[[key]]`, so missing translations stand out on the page.
    pub fn label_for(&self, statistic: &str) -> String {
        match self.labels.get(statistic) {
            Some(label) if !label.name.is_empty() => label.name.clone(),
            Some(_) => statistic.to_string(),
            None => format!("[[{}]]", statistic),
        }
    }

    /// Built-in formatters plus every configured `formatting`.
    ///
    /// A configured formatting applies to the stat in every category and
    /// takes precedence over the built-ins.
    pub fn formatters(&self) -> StatFormatters {
        let mut formatters = StatFormatters::default();
        for label in self.labels.values() {
            if let Some(formatting) = label.formatting.as_deref().filter(|f| !f.trim().is_empty()) {
                formatters.register_statistic(&label.statistic, StatFormatter::parse(formatting));
            }
        }
        formatters
    }

    pub fn count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
