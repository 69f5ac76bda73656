// 🗂️ Tab Layout - tabs.json tree + resettable three-level cursor
// Tabs own headings, headings own the stat entries displayed under them

use crate::lookup::StatLookup;
use crate::stats::{StatSource, StatValue};
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// LAYOUT TREE
// ============================================================================

/// One stat row: the four-part key used to fetch a player's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub domain: String,
    pub world: String,

    #[serde(rename = "cat")]
    pub category: String,

    #[serde(rename = "stat")]
    pub statistic: String,
}

impl Entry {
    pub fn new(
        domain: impl Into<String>,
        world: impl Into<String>,
        category: impl Into<String>,
        statistic: impl Into<String>,
    ) -> Self {
        Entry {
            domain: domain.into(),
            world: world.into(),
            category: category.into(),
            statistic: statistic.into(),
        }
    }

    /// Fetch this entry's value from a player
    pub fn value_for<S: StatSource + ?Sized>(&self, player: &S) -> StatValue {
        player.get_stat(&self.domain, &self.world, &self.category, &self.statistic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(rename = "headingName")]
    pub name: String,

    #[serde(default)]
    pub display: Vec<Entry>,
}

impl Heading {
    pub fn new(name: impl Into<String>, display: Vec<Entry>) -> Self {
        Heading {
            name: name.into(),
            display,
        }
    }

    pub fn id(&self) -> String {
        anchor_id(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(rename = "tabName")]
    pub name: String,

    #[serde(default)]
    pub headings: Vec<Heading>,
}

impl Tab {
    pub fn new(name: impl Into<String>, headings: Vec<Heading>) -> Self {
        Tab {
            name: name.into(),
            headings,
        }
    }

    pub fn id(&self) -> String {
        anchor_id(&self.name)
    }
}

/// Turn a display name into an HTML fragment id.
///
/// Only spaces are touched; every other character passes through as-is.
pub fn anchor_id(name: &str) -> String {
    name.replace(' ', "-")
}

/// Layout - the parsed tabs.json document
///
/// Read once and never mutated afterwards. Walk it either with a
/// [`TabWalker`] (cursor style) or [`Layout::walk`] (iterator style).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    tabs: Vec<Tab>,
}

impl Layout {
    pub fn from_tabs(tabs: Vec<Tab>) -> Self {
        Layout { tabs }
    }

    /// Parse a layout from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse tab layout JSON")
    }

    /// Load a layout file from the configuration directory
    pub fn load<P: AsRef<Path>>(config_dir: P, file: &str) -> Result<Self> {
        let path = config_dir.as_ref().join(file);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read tab layout: {:?}", path))?;

        let layout = Layout::from_json(&content)
            .with_context(|| format!("Invalid tab layout: {:?}", path))?;

        tracing::debug!(path = ?path, tabs = layout.tab_count(), "loaded tab layout");
        Ok(layout)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Total number of entries across every tab and heading
    pub fn entry_count(&self) -> usize {
        self.tabs
            .iter()
            .flat_map(|tab| tab.headings.iter())
            .map(|heading| heading.display.len())
            .sum()
    }

    /// Fresh cursor over this layout
    pub fn walker(&self) -> TabWalker<'_> {
        TabWalker::new(self)
    }

    /// Depth-first iterator over every tab, heading and entry
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            layout: self,
            tab: None,
            heading: None,
            entry: None,
        }
    }
}

// ============================================================================
// CURSOR
// ============================================================================

/// Position at one nesting level. `None` means "before the first element".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(Option<usize>);

impl Cursor {
    /// Move one step forward and return the new index
    fn advance(&mut self) -> usize {
        let next = self.0.map_or(0, |idx| idx + 1);
        self.0 = Some(next);
        next
    }

    fn reset(&mut self) {
        self.0 = None;
    }

    pub fn position(&self) -> Option<usize> {
        self.0
    }

    pub fn is_reset(&self) -> bool {
        self.0.is_none()
    }
}

/// TabWalker - three nested cursors over a [`Layout`]
///
/// Every level follows the same protocol: `have_x()` steps the cursor and
/// reports whether it landed on an element. Landing on a tab or heading
/// resets the levels below it. Once a level reports `false` it stays past
/// the end (further calls keep stepping away) until `reset_x()` is called.
///
/// Accessors return `None` whenever the cursors do not point at an element.
#[derive(Debug, Clone)]
pub struct TabWalker<'a> {
    layout: &'a Layout,
    tab: Cursor,
    heading: Cursor,
    entry: Cursor,
}

impl<'a> TabWalker<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        TabWalker {
            layout,
            tab: Cursor::default(),
            heading: Cursor::default(),
            entry: Cursor::default(),
        }
    }

    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    pub fn tab_cursor(&self) -> Cursor {
        self.tab
    }

    pub fn heading_cursor(&self) -> Cursor {
        self.heading
    }

    pub fn entry_cursor(&self) -> Cursor {
        self.entry
    }

    // ------------------------------------------------------------------------
    // Resets
    // ------------------------------------------------------------------------

    pub fn reset_tabs(&mut self) {
        self.tab.reset();
    }

    pub fn reset_headings(&mut self) {
        self.heading.reset();
    }

    pub fn reset_entries(&mut self) {
        self.entry.reset();
    }

    pub fn reset_all(&mut self) {
        self.reset_tabs();
        self.reset_headings();
        self.reset_entries();
    }

    // ------------------------------------------------------------------------
    // Advance and test
    // ------------------------------------------------------------------------

    pub fn have_tabs(&mut self) -> bool {
        let idx = self.tab.advance();
        if idx < self.layout.tabs.len() {
            self.reset_headings();
            self.reset_entries();
            true
        } else {
            false
        }
    }

    pub fn have_headings(&mut self) -> bool {
        let idx = self.heading.advance();
        let len = self.current_tab().map_or(0, |tab| tab.headings.len());
        if idx < len {
            self.reset_entries();
            true
        } else {
            false
        }
    }

    pub fn have_entries(&mut self) -> bool {
        let idx = self.entry.advance();
        let len = self
            .current_heading()
            .map_or(0, |heading| heading.display.len());
        idx < len
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn current_tab(&self) -> Option<&'a Tab> {
        self.layout.tabs.get(self.tab.position()?)
    }

    pub fn current_heading(&self) -> Option<&'a Heading> {
        self.current_tab()?.headings.get(self.heading.position()?)
    }

    pub fn the_tab_name(&self) -> Option<&'a str> {
        self.current_tab().map(|tab| tab.name.as_str())
    }

    pub fn the_tab_id(&self) -> Option<String> {
        self.current_tab().map(Tab::id)
    }

    pub fn the_heading_name(&self) -> Option<&'a str> {
        self.current_heading().map(|heading| heading.name.as_str())
    }

    pub fn the_heading_id(&self) -> Option<String> {
        self.current_heading().map(Heading::id)
    }

    pub fn the_entry(&self) -> Option<&'a Entry> {
        self.current_heading()?.display.get(self.entry.position()?)
    }

    /// Look up the current entry's value on `player`
    pub fn the_entry_value_for_player<S: StatSource + ?Sized>(
        &self,
        player: &S,
    ) -> Option<StatValue> {
        self.the_entry().map(|entry| entry.value_for(player))
    }

    /// Display label for the current entry, see [`StatLookup::label_for`]
    pub fn the_entry_label(&self, lookup: &StatLookup) -> Option<String> {
        self.the_entry()
            .map(|entry| lookup.label_for(&entry.statistic))
    }
}

// ============================================================================
// ITERATOR WALK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkNode<'a> {
    Tab(&'a Tab),
    Heading(&'a Heading),
    Entry(&'a Entry),
}

impl WalkNode<'_> {
    /// Nesting depth: tabs 0, headings 1, entries 2
    pub fn depth(&self) -> usize {
        match self {
            WalkNode::Tab(_) => 0,
            WalkNode::Heading(_) => 1,
            WalkNode::Entry(_) => 2,
        }
    }
}

/// Index-stack iterator returned by [`Layout::walk`]
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    layout: &'a Layout,
    tab: Option<usize>,
    heading: Option<usize>,
    entry: Option<usize>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(t) = self.tab else {
            self.tab = Some(0);
            return self.layout.tabs.first().map(WalkNode::Tab);
        };
        let tab = self.layout.tabs.get(t)?;

        // Entries of the current heading first, then the next heading
        let next_heading = match self.heading {
            None => 0,
            Some(h) => {
                let next_entry = self.entry.map_or(0, |e| e + 1);
                if let Some(entry) = tab.headings.get(h).and_then(|hd| hd.display.get(next_entry)) {
                    self.entry = Some(next_entry);
                    return Some(WalkNode::Entry(entry));
                }
                h + 1
            }
        };

        if let Some(heading) = tab.headings.get(next_heading) {
            self.heading = Some(next_heading);
            self.entry = None;
            return Some(WalkNode::Heading(heading));
        }

        self.tab = Some(t + 1);
        self.heading = None;
        self.entry = None;
        self.layout.tabs.get(t + 1).map(WalkNode::Tab)
    }
}

// ============================================================================
// TESTS
// ============================================================================
