use player_stats::{
    insert_records, render_tabs, setup_database, Layout, StatKey, StatLabel, StatLookup,
    StatRecord, StatSource, StatValue, StatsPage,
};
use rusqlite::Connection;

/// Player collaborator that reports a pre-formatted value for every stat
struct FormattedPlayer {
    formatted: &'static str,
}

impl StatSource for FormattedPlayer {
    fn get_stat(&self, domain: &str, world: &str, category: &str, statistic: &str) -> StatValue {
        StatValue::new(
            StatKey::new(domain, world, category, statistic),
            1234,
            self.formatted,
        )
    }
}

#[test]
fn combat_tab_renders_label_and_value() {
    let layout = Layout::from_json(
        r#"[{
            "tabName": "Combat",
            "headings": [{
                "headingName": "Damage",
                "display": [{ "domain": "pve", "world": "w1", "cat": "dps", "stat": "totalDamage" }]
            }]
        }]"#,
    )
    .unwrap();
    let lookup = StatLookup::from_labels(vec![StatLabel::new("totalDamage", "Total Damage")]);

    let html = render_tabs(
        &mut layout.walker(),
        &lookup,
        &FormattedPlayer { formatted: "1,234" },
    );

    assert!(html.contains("<li class=\"active\"><a href=\"#Combat\""));
    assert!(html.contains("<h3>Damage</h3>"));
    assert!(html.contains("<tr><td>Total Damage</td><td>1,234</td></tr>"));
}

#[test]
fn shipped_layout_renders_for_imported_player() {
    let layout = Layout::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config"), "tabs.json").unwrap();
    let lookup =
        StatLookup::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/statistics.json"))
            .unwrap();

    let conn = Connection::open_in_memory().unwrap();
    setup_database(&conn).unwrap();
    insert_records(
        &conn,
        &[StatRecord {
            player: "Notch".to_string(),
            domain: "default".to_string(),
            world: "__global__".to_string(),
            category: "stats".to_string(),
            statistic: "playedfor".to_string(),
            value: 604_800,
        }],
    )
    .unwrap();

    let page = StatsPage::new(layout, lookup);
    let html = page.render_player(&conn, "Notch").unwrap().into_html();

    assert!(html.contains("<tr><td>Time Played</td><td>1 weeks 0 days 0 hours 0 mins</td></tr>"));
    assert!(html.contains("href=\"#Blocks-Placed\""));
    assert!(html.contains("<tr><td>Zombies</td><td>0 killed</td></tr>"));
}
