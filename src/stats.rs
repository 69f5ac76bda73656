// 🎮 Player Stats - the player side of an entry lookup

use crate::format::StatFormatters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Four-part address of one stat value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatKey {
    pub domain: String,
    pub world: String,
    pub category: String,
    pub statistic: String,
}

impl StatKey {
    pub fn new(domain: &str, world: &str, category: &str, statistic: &str) -> Self {
        StatKey {
            domain: domain.to_string(),
            world: world.to_string(),
            category: category.to_string(),
            statistic: statistic.to_string(),
        }
    }
}

/// A player's value for one stat, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    #[serde(flatten)]
    pub key: StatKey,
    pub value: i64,
    pub formatted: String,
}

impl StatValue {
    pub fn new(key: StatKey, value: i64, formatted: impl Into<String>) -> Self {
        StatValue {
            key,
            value,
            formatted: formatted.into(),
        }
    }

    pub fn value_formatted(&self) -> &str {
        &self.formatted
    }
}

/// Anything that can answer "what is this player's value for stat X"
pub trait StatSource {
    fn get_stat(&self, domain: &str, world: &str, category: &str, statistic: &str) -> StatValue;
}

/// Player - name plus every stat recorded for them
#[derive(Debug, Clone)]
pub struct Player {
    pub id: i64,
    pub name: String,
    stats: BTreeMap<StatKey, i64>,
    formatters: StatFormatters,
}

impl Player {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            stats: BTreeMap::new(),
            formatters: StatFormatters::default(),
        }
    }

    pub fn with_formatters(mut self, formatters: StatFormatters) -> Self {
        self.formatters = formatters;
        self
    }

    pub fn set_stat(&mut self, key: StatKey, value: i64) {
        self.stats.insert(key, value);
    }

    /// Every recorded stat, ordered by key
    pub fn stat_values(&self) -> Vec<StatValue> {
        self.stats
            .iter()
            .map(|(key, value)| self.make_value(key.clone(), *value))
            .collect()
    }

    pub fn stat_count(&self) -> usize {
        self.stats.len()
    }

    fn make_value(&self, key: StatKey, value: i64) -> StatValue {
        let formatted = self.formatters.format(&key.category, &key.statistic, value);
        StatValue::new(key, value, formatted)
    }
}

impl StatSource for Player {
    /// Stats the player never recorded read as zero
    fn get_stat(&self, domain: &str, world: &str, category: &str, statistic: &str) -> StatValue {
        let key = StatKey::new(domain, world, category, statistic);
        let value = self.stats.get(&key).copied().unwrap_or(0);
        self.make_value(key, value)
    }
}
