// src/models/layout.rs

//! Endpoints and CSS selectors describing the status site's markup.

use serde::{Deserialize, Serialize};

/// One of the three rotation panels on the current-map page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Pubs,
    Ranked,
    Mixed,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Pubs, Panel::Ranked, Panel::Mixed];

    /// Whether the panel heading carries the mode name.
    pub fn reports_mode(self) -> bool {
        matches!(self, Panel::Mixed)
    }
}

/// Extraction rule for a single panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PanelRule {
    /// Selector for the panel container
    pub container_selector: String,

    /// Suffix appended to the timer element id (`timer`, `timer-ranked`, ...)
    #[serde(default)]
    pub timer_suffix: String,
}

impl PanelRule {
    pub fn new(container: impl Into<String>, timer_suffix: impl Into<String>) -> Self {
        Self {
            container_selector: container.into(),
            timer_suffix: timer_suffix.into(),
        }
    }

    /// Selector for the timer inside the panel.
    pub fn timer_selector(&self) -> String {
        format!("h2[id=\"timer{}\"]", self.timer_suffix)
    }

    /// Timer selector scoped to the panel container, for page-wide queries.
    pub fn scoped_timer_selector(&self) -> String {
        format!("{} {}", self.container_selector, self.timer_selector())
    }
}

/// Everything the fetcher and extractor need to know about the site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLayout {
    /// Page listing every active mixed-mode map with its mode
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Page with the pubs / ranked / mixed panels
    #[serde(default = "defaults::current_map_url")]
    pub current_map_url: String,

    /// Candidate groups on the listing page
    #[serde(default = "defaults::listing_group_selector")]
    pub listing_group_selector: String,

    /// Heading inside a listing group (`<Map> - <Mode>`)
    #[serde(default = "defaults::listing_heading_selector")]
    pub listing_heading_selector: String,

    /// Separator between map and mode in listing headings
    #[serde(default = "defaults::listing_separator")]
    pub listing_separator: String,

    /// Panel heading (`<Prefix>: <Map>`)
    #[serde(default = "defaults::heading_selector")]
    pub heading_selector: String,

    /// Secondary headings in a panel; the second one holds the next map
    #[serde(default = "defaults::next_label_selector")]
    pub next_label_selector: String,

    /// Emphasized element inside the next-map heading
    #[serde(default = "defaults::next_label_emphasis")]
    pub next_label_emphasis: String,

    /// Separator between prefix and map in panel headings
    #[serde(default = "defaults::heading_separator")]
    pub heading_separator: String,

    /// Timer text shown before the countdown script runs
    #[serde(default = "defaults::loading_placeholder")]
    pub loading_placeholder: String,

    #[serde(default = "defaults::pubs")]
    pub pubs: PanelRule,

    #[serde(default = "defaults::ranked")]
    pub ranked: PanelRule,

    #[serde(default = "defaults::mixed")]
    pub mixed: PanelRule,
}

impl PageLayout {
    pub fn rule(&self, panel: Panel) -> &PanelRule {
        match panel {
            Panel::Pubs => &self.pubs,
            Panel::Ranked => &self.ranked,
            Panel::Mixed => &self.mixed,
        }
    }

    /// Every selector in the layout, for validation.
    pub fn selectors(&self) -> Vec<String> {
        let mut all = vec![
            self.listing_group_selector.clone(),
            self.listing_heading_selector.clone(),
            self.heading_selector.clone(),
            self.next_label_selector.clone(),
            self.next_label_emphasis.clone(),
        ];
        for panel in Panel::ALL {
            let rule = self.rule(panel);
            all.push(rule.container_selector.clone());
            all.push(rule.scoped_timer_selector());
        }
        all
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            current_map_url: defaults::current_map_url(),
            listing_group_selector: defaults::listing_group_selector(),
            listing_heading_selector: defaults::listing_heading_selector(),
            listing_separator: defaults::listing_separator(),
            heading_selector: defaults::heading_selector(),
            next_label_selector: defaults::next_label_selector(),
            next_label_emphasis: defaults::next_label_emphasis(),
            heading_separator: defaults::heading_separator(),
            loading_placeholder: defaults::loading_placeholder(),
            pubs: defaults::pubs(),
            ranked: defaults::ranked(),
            mixed: defaults::mixed(),
        }
    }
}

mod defaults {
    use super::PanelRule;

    pub fn listing_url() -> String {
        "https://apexlegendsstatus.com/current-map/ltm/pubs".into()
    }
    pub fn current_map_url() -> String {
        "https://apexlegendsstatus.com/current-map".into()
    }
    pub fn listing_group_selector() -> String {
        "div.row > div".into()
    }
    pub fn listing_heading_selector() -> String {
        "h3".into()
    }
    pub fn listing_separator() -> String {
        " - ".into()
    }
    pub fn heading_selector() -> String {
        "h1[style=\"font-weight: 600; margin-bottom: 5px;\"]".into()
    }
    pub fn next_label_selector() -> String {
        "h5".into()
    }
    pub fn next_label_emphasis() -> String {
        "b".into()
    }
    pub fn heading_separator() -> String {
        ": ".into()
    }
    pub fn loading_placeholder() -> String {
        "Loading...".into()
    }
    pub fn pubs() -> PanelRule {
        PanelRule::new("div[onclick*=\"/current-map/battle_royale/pubs\"]", "")
    }
    pub fn ranked() -> PanelRule {
        PanelRule::new("div[onclick*=\"/current-map/battle_royale/ranked\"]", "-ranked")
    }
    pub fn mixed() -> PanelRule {
        PanelRule::new("div[onclick*=\"/current-map/ltm/pubs\"]", "-ltm")
    }
}
