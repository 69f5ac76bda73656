// Player Stats - Core Library
// Exposes all modules for use in the CLI, web server, and tests

pub mod config;
pub mod db;
pub mod format;
pub mod lookup;
pub mod page;
pub mod render;
pub mod stats;
pub mod tabs;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{
    StatRecord,
    load_csv, setup_database, insert_records, load_player, list_players,
    load_stat_lookup, set_stat_formatting, set_stat_label, verify_count,
};
pub use format::{StatFormatter, StatFormatters};
pub use lookup::{StatLabel, StatLookup};
pub use page::{PlayerPage, StatsPage};
pub use render::{escape_html, render_player_page, render_tabs, render_unknown_player, wrap_document};
pub use stats::{Player, StatKey, StatSource, StatValue};
pub use tabs::{anchor_id, Cursor, Entry, Heading, Layout, Tab, TabWalker, Walk, WalkNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
