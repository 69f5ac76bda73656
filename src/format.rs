// 🔢 Stat Formatting - raw integer → display string
// Formatters are keyed by "category.statistic"; unknown stats print as-is

use chrono::{DateTime, Utc};
use std::collections::HashMap;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatFormatter {
    /// Plain integer
    Plain,

    /// Seconds as "W weeks D days H hours M mins"
    Duration,

    /// Unix timestamp in seconds as a UTC date
    Date,

    /// Fixed template; `{}` is replaced by the value
    Template(String),
}

impl StatFormatter {
    /// Parse a configured formatting name; anything unrecognised is a template
    pub fn parse(formatting: &str) -> Self {
        match formatting.trim() {
            "" | "none" => StatFormatter::Plain,
            "time" => StatFormatter::Duration,
            "timestamp" => StatFormatter::Date,
            template => StatFormatter::Template(template.to_string()),
        }
    }

    pub fn format(&self, value: i64) -> String {
        match self {
            StatFormatter::Plain => value.to_string(),
            StatFormatter::Duration => format_duration(value),
            StatFormatter::Date => format_date(value),
            StatFormatter::Template(template) => template.replacen("{}", &value.to_string(), 1),
        }
    }
}

fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let weeks = seconds / WEEK;
    let days = (seconds % WEEK) / DAY;
    let hours = (seconds % DAY) / HOUR;
    let minutes = (seconds % HOUR) / MINUTE;

    format!("{} weeks {} days {} hours {} mins", weeks, days, hours, minutes)
}

fn format_date(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => timestamp.to_string(),
    }
}

/// StatFormatters - formatter registry
///
/// Lookup order: per-statistic override, then "category.statistic", then
/// the plain integer.
#[derive(Debug, Clone)]
pub struct StatFormatters {
    mapping: HashMap<String, StatFormatter>,
    by_statistic: HashMap<String, StatFormatter>,
}

impl StatFormatters {
    /// Empty registry: everything formats as a plain integer
    pub fn empty() -> Self {
        StatFormatters {
            mapping: HashMap::new(),
            by_statistic: HashMap::new(),
        }
    }

    pub fn register(&mut self, category: &str, statistic: &str, formatter: StatFormatter) {
        self.mapping.insert(tag(category, statistic), formatter);
    }

    /// Register a formatter for a stat regardless of its category
    pub fn register_statistic(&mut self, statistic: &str, formatter: StatFormatter) {
        self.by_statistic.insert(statistic.to_string(), formatter);
    }

    pub fn get(&self, category: &str, statistic: &str) -> Option<&StatFormatter> {
        self.by_statistic
            .get(statistic)
            .or_else(|| self.mapping.get(&tag(category, statistic)))
    }

    pub fn format(&self, category: &str, statistic: &str, value: i64) -> String {
        match self.get(category, statistic) {
            Some(formatter) => formatter.format(value),
            None => StatFormatter::Plain.format(value),
        }
    }
}

impl Default for StatFormatters {
    /// Built-in formatters for the core "stats" category
    fn default() -> Self {
        let mut formatters = StatFormatters::empty();
        formatters.register("stats", "playedfor", StatFormatter::Duration);
        for stat in ["firstlogin", "lastlogin", "lastlogout"] {
            formatters.register("stats", stat, StatFormatter::Date);
        }
        formatters
    }
}

fn tag(category: &str, statistic: &str) -> String {
    format!("{}.{}", category, statistic)
}
