use anyhow::{bail, Result};
use rusqlite::Connection;
use std::env;
use std::path::Path;

// Use library instead of local modules
use player_stats::{
    init_tracing, insert_records, list_players, load_csv, setup_database, verify_count,
    AppConfig, PlayerPage, StatsPage,
};

fn main() -> Result<()> {
    init_tracing("player_stats=info");

    let args: Vec<String> = env::args().collect();
    let config = AppConfig::from_env();

    match args.get(1).map(String::as_str) {
        Some("import") => match args.get(2) {
            Some(csv_path) => run_import(&config, Path::new(csv_path)),
            None => bail!("usage: player-stats import <stats.csv>"),
        },
        Some("render") => match args.get(2) {
            Some(player_name) => run_render(&config, player_name),
            None => bail!("usage: player-stats render <playerName>"),
        },
        Some("players") => run_players(&config),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("player-stats {}", player_stats::VERSION);
    println!();
    println!("Commands:");
    println!("  import <stats.csv>     Load player stats into {:?}", AppConfig::from_env().db_path);
    println!("  render <playerName>    Print the stats page fragment for a player");
    println!("  players                List players with recorded stats");
}

fn open_database(config: &AppConfig) -> Result<Connection> {
    let db_path = config.db_path();

    if !db_path.exists() {
        eprintln!("❌ Database not found at {:?}", db_path);
        eprintln!("   Run: player-stats import <stats.csv>");
        eprintln!("   to import player stats first.");
        std::process::exit(1);
    }

    Ok(Connection::open(db_path)?)
}

fn run_import(config: &AppConfig, csv_path: &Path) -> Result<()> {
    println!("🗄️  Stats Import - CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load CSV
    println!("\n📂 Loading CSV...");
    let records = load_csv(csv_path)?;
    println!("✓ Loaded {} stat records from CSV", records.len());

    // 2. Setup database
    println!("\n🔧 Setting up database...");
    let conn = Connection::open(config.db_path())?;
    setup_database(&conn)?;
    println!("✓ Database initialized at {:?}", config.db_path());

    // 3. Insert records
    println!("\n💾 Writing stats...");
    let written = insert_records(&conn, &records)?;
    println!("✓ Wrote {} stat values", written);

    // 4. Verify count
    let count = verify_count(&conn)?;
    println!("\n✓ Database contains {} stat values", count);

    Ok(())
}

fn run_render(config: &AppConfig, player_name: &str) -> Result<()> {
    let conn = open_database(config)?;
    let page = StatsPage::load(config, &conn)?;

    match page.render_player(&conn, player_name)? {
        PlayerPage::Found(html) => {
            println!("{}", html);
            Ok(())
        }
        PlayerPage::NotFound(_) => bail!("No stats recorded for player {:?}", player_name),
    }
}

fn run_players(config: &AppConfig) -> Result<()> {
    let conn = open_database(config)?;
    let players = list_players(&conn)?;

    println!("👥 {} players", players.len());
    for name in players {
        println!("  {}", name);
    }

    Ok(())
}
