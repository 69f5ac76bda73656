// 🖼️ Page Renderer - tab strip + tab panels for one player
// Two passes over the same walker: navigation links first, then content

use crate::lookup::StatLookup;
use crate::stats::StatSource;
use crate::tabs::TabWalker;

/// Escape text for use inside HTML element content or attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the tab navigation and tab panels for `player`.
///
/// Leaves every walker cursor reset on return.
pub fn render_tabs<S: StatSource + ?Sized>(
    walker: &mut TabWalker,
    lookup: &StatLookup,
    player: &S,
) -> String {
    let mut html = String::new();

    walker.reset_all();

    // Pass 1: navigation
    html.push_str("<div class=\"tab-stats span7\">");
    html.push_str("<ul class=\"nav nav-tabs\">");
    let mut first_tab = true;
    while walker.have_tabs() {
        let id = walker.the_tab_id().unwrap_or_default();
        let name = walker.the_tab_name().unwrap_or_default();
        html.push_str(&format!(
            "<li class=\"{}\"><a href=\"#{}\" data-toggle=\"tab\">{}</a></li>",
            if first_tab { "active" } else { "" },
            escape_html(&id),
            escape_html(name)
        ));
        first_tab = false;
    }
    html.push_str("</ul>");
    walker.reset_tabs();

    // Pass 2: panels
    html.push_str("<div class=\"tab-content\">");
    let mut first_tab = true;
    while walker.have_tabs() {
        let id = walker.the_tab_id().unwrap_or_default();
        tracing::debug!(tab = %id, "making tab");

        html.push_str(&format!(
            "<div id=\"{}\" class=\"tab-pane fade {}\">",
            escape_html(&id),
            if first_tab { "active in" } else { "" }
        ));
        first_tab = false;

        html.push_str("<table class=\"table table-bordered\">");
        while walker.have_headings() {
            let heading = walker.the_heading_name().unwrap_or_default();
            tracing::debug!(heading, "making heading");
            html.push_str(&format!(
                "<tr><td colspan=\"2\"><h3>{}</h3></td></tr>",
                escape_html(heading)
            ));

            while walker.have_entries() {
                let label = walker.the_entry_label(lookup).unwrap_or_default();
                let value = walker
                    .the_entry_value_for_player(player)
                    .map(|value| value.formatted)
                    .unwrap_or_default();
                tracing::debug!(label = %label, "making entry");

                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>",
                    escape_html(&label),
                    escape_html(&value)
                ));
            }
            walker.reset_entries();
        }
        walker.reset_headings();
        html.push_str("</table></div>");
    }
    walker.reset_tabs();
    html.push_str("</div></div>");

    html
}

/// Full player page body: name header, search form and the stat tabs
pub fn render_player_page<S: StatSource + ?Sized>(
    walker: &mut TabWalker,
    lookup: &StatLookup,
    player_name: &str,
    player: &S,
) -> String {
    let name = escape_html(player_name);
    let mut html = String::new();

    html.push_str(&format!(
        "<div style=\"float:left\"><h2><canvas class=\"head head-huge\" data-name=\"{0}\"></canvas>{0}</h2></div>",
        name
    ));
    html.push_str(SEARCH_FORM);
    html.push_str(&render_tabs(walker, lookup, player));

    html
}

/// Render a page body for a player that does not exist
pub fn render_unknown_player(player_name: &str) -> String {
    format!(
        "<div class=\"alert alert-error\">No stats recorded for player <strong>{}</strong>.</div>{}",
        escape_html(player_name),
        SEARCH_FORM
    )
}

/// Wrap a body fragment in a minimal standalone HTML document
pub fn wrap_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape_html(title),
        body
    )
}

const SEARCH_FORM: &str = "<div style=\"float:right;margin-top:20px;margin-right:20px;margin-bottom:0px;\">\
<form action=\"showplayer\" method=\"get\"><div class=\"input-append\">\
<input type=\"text\" name=\"playerName\" placeholder=\"player name\">\
<button class=\"btn\" type=\"submit\">Search!</button>\
</div></form></div>";

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::StatLabel;
    use crate::stats::{StatKey, StatValue};
    use crate::tabs::{Entry, Heading, Layout, Tab};

    /// Player whose every stat formats to the same string
    struct FixedPlayer(&'static str);

    impl StatSource for FixedPlayer {
        fn get_stat(&self, domain: &str, world: &str, category: &str, statistic: &str) -> StatValue {
            StatValue::new(StatKey::new(domain, world, category, statistic), 1234, self.0)
        }
    }

    fn combat_layout() -> Layout {
        Layout::from_tabs(vec![Tab::new(
            "Combat",
            vec![Heading::new(
                "Damage",
                vec![Entry::new("pve", "w1", "dps", "totalDamage")],
            )],
        )])
    }

    #[test]
    fn test_single_tab_page() {
        let layout = combat_layout();
        let lookup = StatLookup::from_labels(vec![StatLabel::new("totalDamage", "Total Damage")]);
        let mut walker = layout.walker();

        let html = render_tabs(&mut walker, &lookup, &FixedPlayer("1,234"));

        assert!(html.contains(
            "<li class=\"active\"><a href=\"#Combat\" data-toggle=\"tab\">Combat</a></li>"
        ));
        assert!(html.contains("<div id=\"Combat\" class=\"tab-pane fade active in\">"));
        assert!(html.contains("<tr><td colspan=\"2\"><h3>Damage</h3></td></tr>"));
        assert!(html.contains("<tr><td>Total Damage</td><td>1,234</td></tr>"));
    }

    #[test]
    fn test_only_first_tab_active() {
        let layout = Layout::from_tabs(vec![
            Tab::new("Top Players", vec![]),
            Tab::new("Blocks", vec![]),
        ]);
        let mut walker = layout.walker();

        let html = render_tabs(&mut walker, &StatLookup::new(), &FixedPlayer("0"));

        assert!(html.contains("<li class=\"active\"><a href=\"#Top-Players\""));
        assert!(html.contains("<li class=\"\"><a href=\"#Blocks\""));
        assert!(html.contains("<div id=\"Top-Players\" class=\"tab-pane fade active in\">"));
        assert!(html.contains("<div id=\"Blocks\" class=\"tab-pane fade \">"));
        assert_eq!(html.matches("active").count(), 2);
    }

    #[test]
    fn test_missing_label_marker() {
        let layout = combat_layout();
        let mut walker = layout.walker();

        let html = render_tabs(&mut walker, &StatLookup::new(), &FixedPlayer("7"));
        assert!(html.contains("<tr><td>[[totalDamage]]</td><td>7</td></tr>"));
    }

    #[test]
    fn test_render_twice_is_identical() {
        let layout = combat_layout();
        let lookup = StatLookup::new();
        let mut walker = layout.walker();

        let first = render_tabs(&mut walker, &lookup, &FixedPlayer("1"));
        let second = render_tabs(&mut walker, &lookup, &FixedPlayer("1"));
        assert_eq!(first, second);
        assert!(walker.tab_cursor().is_reset());
    }

    #[test]
    fn test_text_is_escaped() {
        let layout = Layout::from_tabs(vec![Tab::new(
            "A<b>",
            vec![Heading::new("x & y", vec![])],
        )]);
        let mut walker = layout.walker();

        let html = render_tabs(&mut walker, &StatLookup::new(), &FixedPlayer("0"));
        assert!(html.contains(">A&lt;b&gt;</a>"));
        assert!(html.contains("<h3>x &amp; y</h3>"));
    }

    #[test]
    fn test_quote_in_tab_name_stays_inside_attribute() {
        let layout = Layout::from_tabs(vec![Tab::new("Say \"hi\"", vec![])]);
        let mut walker = layout.walker();

        let html = render_tabs(&mut walker, &StatLookup::new(), &FixedPlayer("0"));
        assert!(html.contains("<a href=\"#Say-&quot;hi&quot;\" data-toggle=\"tab\">"));
        assert!(html.contains("<div id=\"Say-&quot;hi&quot;\" class=\"tab-pane fade active in\">"));
        assert!(!html.contains("\"hi\""));
    }

    #[test]
    fn test_player_page_header() {
        let layout = combat_layout();
        let mut walker = layout.walker();

        let html = render_player_page(&mut walker, &StatLookup::new(), "Notch", &FixedPlayer("1"));
        assert!(html.contains("data-name=\"Notch\"></canvas>Notch</h2>"));
        assert!(html.contains("name=\"playerName\""));
        assert!(html.contains("href=\"#Combat\""));
    }

    #[test]
    fn test_unknown_player_page() {
        let html = render_unknown_player("<script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
