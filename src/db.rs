use crate::lookup::{StatLabel, StatLookup};
use crate::stats::{Player, StatKey};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Entity type stored for every imported player
pub const PLAYER_TYPE: &str = "player";

/// One row of a stats CSV export
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub player: String,
    pub domain: String,
    pub world: String,
    pub category: String,
    pub statistic: String,
    pub value: i64,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Entities (players)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entity (
            entityId INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            uuid TEXT,
            UNIQUE (name, type)
        )",
        [],
    )?;

    // ==========================================================================
    // Classifier tables
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS domain (
            domainId INTEGER PRIMARY KEY AUTOINCREMENT,
            domain TEXT UNIQUE NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS world (
            worldId INTEGER PRIMARY KEY AUTOINCREMENT,
            world TEXT UNIQUE NOT NULL,
            name TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS category (
            categoryId INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT UNIQUE NOT NULL
        )",
        [],
    )?;

    // `name` doubles as the stat label lookup table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS statistic (
            statisticId INTEGER PRIMARY KEY AUTOINCREMENT,
            statistic TEXT UNIQUE NOT NULL,
            name TEXT,
            formatting TEXT
        )",
        [],
    )?;

    // ==========================================================================
    // Values
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS value (
            entityId INTEGER NOT NULL REFERENCES entity(entityId),
            domainId INTEGER NOT NULL REFERENCES domain(domainId),
            worldId INTEGER NOT NULL REFERENCES world(worldId),
            categoryId INTEGER NOT NULL REFERENCES category(categoryId),
            statisticId INTEGER NOT NULL REFERENCES statistic(statisticId),
            value INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (entityId, domainId, worldId, categoryId, statisticId)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entity_name ON entity(name)",
        [],
    )?;

    Ok(())
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<StatRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: StatRecord = result.context("Failed to deserialize stat record")?;
        records.push(record);
    }

    Ok(records)
}

/// Write stat records, creating players and classifiers as needed.
///
/// A record for a stat that already has a value replaces it.
pub fn insert_records(conn: &Connection, records: &[StatRecord]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut written = 0;

    for record in records {
        let entity_id = get_or_create_entity(&tx, &record.player)?;
        let domain_id = get_or_create_id(&tx, Classifier::Domain, &record.domain)?;
        let world_id = get_or_create_id(&tx, Classifier::World, &record.world)?;
        let category_id = get_or_create_id(&tx, Classifier::Category, &record.category)?;
        let statistic_id = get_or_create_id(&tx, Classifier::Statistic, &record.statistic)?;

        tx.execute(
            "INSERT INTO value (entityId, domainId, worldId, categoryId, statisticId, value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (entityId, domainId, worldId, categoryId, statisticId)
             DO UPDATE SET value = excluded.value",
            params![entity_id, domain_id, world_id, category_id, statistic_id, record.value],
        )?;
        written += 1;
    }

    tx.commit()?;
    tracing::info!(records = written, "stat records written");

    Ok(written)
}

#[derive(Debug, Clone, Copy)]
enum Classifier {
    Domain,
    World,
    Category,
    Statistic,
}

impl Classifier {
    fn table(&self) -> &'static str {
        match self {
            Classifier::Domain => "domain",
            Classifier::World => "world",
            Classifier::Category => "category",
            Classifier::Statistic => "statistic",
        }
    }

    fn id_column(&self) -> &'static str {
        match self {
            Classifier::Domain => "domainId",
            Classifier::World => "worldId",
            Classifier::Category => "categoryId",
            Classifier::Statistic => "statisticId",
        }
    }
}

fn get_or_create_id(conn: &Connection, classifier: Classifier, key: &str) -> Result<i64> {
    let table = classifier.table();
    conn.execute(
        &format!("INSERT OR IGNORE INTO {table} ({table}) VALUES (?1)"),
        params![key],
    )?;

    let id = conn.query_row(
        &format!(
            "SELECT {} FROM {table} WHERE {table} = ?1",
            classifier.id_column()
        ),
        params![key],
        |row| row.get(0),
    )?;

    Ok(id)
}

fn get_or_create_entity(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO entity (name, type) VALUES (?1, ?2)",
        params![name, PLAYER_TYPE],
    )?;

    let id = conn.query_row(
        "SELECT entityId FROM entity WHERE name = ?1 AND type = ?2",
        params![name, PLAYER_TYPE],
        |row| row.get(0),
    )?;

    Ok(id)
}

/// Load a player and all of their stats by exact name
pub fn load_player(conn: &Connection, name: &str) -> Result<Option<Player>> {
    let entity_id: Option<i64> = conn
        .query_row(
            "SELECT entityId FROM entity WHERE name = ?1 AND type = ?2",
            params![name, PLAYER_TYPE],
            |row| row.get(0),
        )
        .optional()?;

    let Some(entity_id) = entity_id else {
        tracing::debug!(player = name, "player not found");
        return Ok(None);
    };

    let mut player = Player::new(entity_id, name);

    let mut stmt = conn.prepare(
        "SELECT d.domain, w.world, c.category, s.statistic, v.value
         FROM value v
         JOIN domain d ON d.domainId = v.domainId
         JOIN world w ON w.worldId = v.worldId
         JOIN category c ON c.categoryId = v.categoryId
         JOIN statistic s ON s.statisticId = v.statisticId
         WHERE v.entityId = ?1",
    )?;

    let rows = stmt
        .query_map(params![entity_id], |row| {
            let domain: String = row.get(0)?;
            let world: String = row.get(1)?;
            let category: String = row.get(2)?;
            let statistic: String = row.get(3)?;
            let value: i64 = row.get(4)?;
            Ok((StatKey::new(&domain, &world, &category, &statistic), value))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (key, value) in rows {
        player.set_stat(key, value);
    }

    tracing::debug!(player = name, stats = player.stat_count(), "player loaded");
    Ok(Some(player))
}

/// Names of every stored player, alphabetical
pub fn list_players(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM entity WHERE type = ?1 ORDER BY name")?;

    let names = stmt
        .query_map(params![PLAYER_TYPE], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(names)
}

/// Set the display name of a stat, creating the stat if it is new
pub fn set_stat_label(conn: &Connection, statistic: &str, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO statistic (statistic, name) VALUES (?1, ?2)
         ON CONFLICT (statistic) DO UPDATE SET name = excluded.name",
        params![statistic, name],
    )?;

    Ok(())
}

/// Set how a stat's values are shown ("none", "time", "timestamp" or a
/// `{}` template), creating the stat if it is new
pub fn set_stat_formatting(conn: &Connection, statistic: &str, formatting: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO statistic (statistic, formatting) VALUES (?1, ?2)
         ON CONFLICT (statistic) DO UPDATE SET formatting = excluded.formatting",
        params![statistic, formatting],
    )?;

    Ok(())
}

/// Build the stat label lookup from the `statistic` table
pub fn load_stat_lookup(conn: &Connection) -> Result<StatLookup> {
    let mut stmt = conn.prepare("SELECT statistic, name, formatting FROM statistic")?;

    let labels = stmt
        .query_map([], |row| {
            let statistic: String = row.get(0)?;
            let name: Option<String> = row.get(1)?;
            let formatting: Option<String> = row.get(2)?;
            let mut label = StatLabel::new(statistic, name.unwrap_or_default());
            label.formatting = formatting;
            Ok(label)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StatLookup::from_labels(labels))
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM value", [], |row| row.get(0))?;

    Ok(count)
}
