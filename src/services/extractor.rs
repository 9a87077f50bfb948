// src/services/extractor.rs

//! Rotation extractor service.
//!
//! Turns the rendered listing and current-map markup into translated
//! [`ModeSnapshot`]s. Extraction never fails: a missing element becomes an
//! empty string and an unexpected heading is used as-is.

use chrono::Utc;

use crate::models::{
    Labels, ModeReconciliation, ModeSnapshot, PageLayout, Panel, RotationEntry, RotationReport,
    Translations,
};
use crate::services::dom::{Document, Node};

/// Raw text pulled from one panel before any parsing.
#[derive(Debug, Default, PartialEq, Eq)]
struct PanelText {
    heading: Option<String>,
    timer: Option<String>,
    next_label: Option<String>,
}

/// Service turning status-page markup into rotation snapshots.
pub struct RotationExtractor<'a> {
    layout: &'a PageLayout,
    translations: &'a Translations,
    unknown_mode: &'a str,
}

impl<'a> RotationExtractor<'a> {
    pub fn new(layout: &'a PageLayout, translations: &'a Translations, labels: &'a Labels) -> Self {
        Self {
            layout,
            translations,
            unknown_mode: &labels.unknown_mode,
        }
    }

    /// Build the map-to-mode lookup from the mixed-mode listing page.
    ///
    /// Groups whose heading lacks the listing separator are not rotation
    /// rows (ads, unrelated panels) and are skipped.
    pub fn reconcile(&self, listing_markup: &str) -> ModeReconciliation {
        let document = Document::parse(listing_markup);
        let mut mapping = ModeReconciliation::new();
        let mut skipped = 0usize;

        for group in document.select(&self.layout.listing_group_selector) {
            let heading = group
                .select(&self.layout.listing_heading_selector)
                .iter()
                .map(Node::text)
                .collect::<String>();

            match RotationEntry::parse(&heading, &self.layout.listing_separator) {
                Some(entry) => {
                    if !mapping.insert(entry) {
                        log::debug!("Duplicate listing entry ignored: {}", heading);
                    }
                }
                None => skipped += 1,
            }
        }

        log::debug!(
            "Listing yielded {} map(s), skipped {} group(s)",
            mapping.len(),
            skipped
        );
        mapping
    }

    /// Parse all three panels from the current-map page.
    pub fn extract(&self, current_markup: &str, mapping: &ModeReconciliation) -> RotationReport {
        let document = Document::parse(current_markup);
        RotationReport {
            pubs: self.extract_panel(&document, Panel::Pubs, mapping),
            ranked: self.extract_panel(&document, Panel::Ranked, mapping),
            mixed: self.extract_panel(&document, Panel::Mixed, mapping),
            fetched_at: Utc::now(),
        }
    }

    /// Run both extraction steps on the fetched pages.
    pub fn extract_pages(&self, listing_markup: &str, current_markup: &str) -> RotationReport {
        let mapping = self.reconcile(listing_markup);
        self.extract(current_markup, &mapping)
    }

    fn extract_panel(
        &self,
        document: &Document,
        panel: Panel,
        mapping: &ModeReconciliation,
    ) -> ModeSnapshot {
        let text = self.panel_text(document, panel);
        if text.heading.is_none() {
            log::warn!("{:?} panel heading not found; reporting blank map", panel);
        }
        if text.timer.is_none() {
            log::warn!("{:?} panel timer not found", panel);
        }

        let heading = text.heading.unwrap_or_default();
        let time_remaining = text.timer.unwrap_or_default();
        let next_raw = text.next_label.unwrap_or_default();

        if panel.reports_mode() {
            let (mode, map) = split_mode_heading(&heading, &self.layout.heading_separator);
            let next_mode = mapping.mode_for(&next_raw).unwrap_or(self.unknown_mode);
            ModeSnapshot {
                current_map: self.translations.map(map),
                current_mode: Some(self.translations.mode(mode)),
                time_remaining,
                next_map: self.translations.map(&next_raw),
                next_mode: Some(self.translations.mode(next_mode)),
            }
        } else {
            let map = strip_heading_prefix(&heading, &self.layout.heading_separator);
            ModeSnapshot {
                current_map: self.translations.map(map),
                current_mode: None,
                time_remaining,
                next_map: self.translations.map(&next_raw),
                next_mode: None,
            }
        }
    }

    fn panel_text(&self, document: &Document, panel: Panel) -> PanelText {
        let rule = self.layout.rule(panel);
        let Some(container) = document.first(&rule.container_selector) else {
            log::warn!("{:?} panel not found ({})", panel, rule.container_selector);
            return PanelText::default();
        };

        PanelText {
            heading: container.text_of(&self.layout.heading_selector),
            timer: container.text_of(&rule.timer_selector()),
            next_label: container
                .nth(&self.layout.next_label_selector, 1)
                .and_then(|label| label.text_of(&self.layout.next_label_emphasis)),
        }
    }
}

/// Map name from a `<Prefix>: <Map>` heading; the whole heading when there is no separator.
pub fn strip_heading_prefix<'h>(heading: &'h str, separator: &str) -> &'h str {
    heading
        .split_once(separator)
        .map_or(heading, |(_, map)| map)
}

/// `(mode, map)` from a `<Mode>: <Map>` heading.
///
/// Without a separator the whole heading is the mode and the map is empty.
pub fn split_mode_heading<'h>(heading: &'h str, separator: &str) -> (&'h str, &'h str) {
    heading.split_once(separator).unwrap_or((heading, ""))
}
