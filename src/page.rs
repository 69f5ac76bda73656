// 📄 Stats Page - layout + labels assembled once at start-up

use crate::config::AppConfig;
use crate::db::{load_player, load_stat_lookup};
use crate::format::StatFormatters;
use crate::lookup::StatLookup;
use crate::render::{render_player_page, render_unknown_player};
use crate::tabs::Layout;
use anyhow::Result;
use rusqlite::Connection;

/// Outcome of rendering the page for one requested player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerPage {
    Found(String),
    NotFound(String),
}

impl PlayerPage {
    pub fn into_html(self) -> String {
        match self {
            PlayerPage::Found(html) | PlayerPage::NotFound(html) => html,
        }
    }
}

/// StatsPage - everything a render needs besides the player
///
/// Shared read-only between renders; each render gets its own walker.
#[derive(Debug, Clone)]
pub struct StatsPage {
    pub layout: Layout,
    pub lookup: StatLookup,
    formatters: StatFormatters,
}

impl StatsPage {
    pub fn new(layout: Layout, lookup: StatLookup) -> Self {
        let formatters = lookup.formatters();
        StatsPage {
            layout,
            lookup,
            formatters,
        }
    }

    /// Load the layout from the config directory and build the label
    /// lookup from the database, overlaid with the labels file if present
    pub fn load(config: &AppConfig, conn: &Connection) -> Result<Self> {
        let layout = Layout::load(&config.config_dir, &config.layout_file)?;

        let mut lookup = load_stat_lookup(conn)?;
        let labels_path = config.labels_path();
        if labels_path.exists() {
            lookup.merge(StatLookup::from_file(&labels_path)?);
        }

        tracing::info!(
            tabs = layout.tab_count(),
            entries = layout.entry_count(),
            labels = lookup.count(),
            "stats page loaded"
        );

        Ok(StatsPage::new(layout, lookup))
    }

    /// Render the page body for `player_name`
    pub fn render_player(&self, conn: &Connection, player_name: &str) -> Result<PlayerPage> {
        match load_player(conn, player_name)? {
            Some(player) => {
                let player = player.with_formatters(self.formatters.clone());
                let mut walker = self.layout.walker();
                Ok(PlayerPage::Found(render_player_page(
                    &mut walker,
                    &self.lookup,
                    &player.name,
                    &player,
                )))
            }
            None => Ok(PlayerPage::NotFound(render_unknown_player(player_name))),
        }
    }
}
