//! Rotation records and their text rendering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::layout::Panel;

/// One `<Map> - <Mode>` row of the mixed-mode listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationEntry {
    pub map_name: String,
    pub mode: String,
}

impl RotationEntry {
    /// Parse a listing heading, returning `None` when the separator is absent.
    ///
    /// Only the first two segments count; anything after a second separator is dropped.
    pub fn parse(heading: &str, separator: &str) -> Option<Self> {
        let mut parts = heading.split(separator);
        let map = parts.next()?;
        let mode = parts.next()?;
        Some(Self {
            map_name: map.trim().to_string(),
            mode: mode.trim().to_string(),
        })
    }
}

/// Map name to mode lookup built from the listing page.
///
/// The first entry seen for a map wins; later duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeReconciliation {
    entries: Vec<RotationEntry>,
    index: HashMap<String, usize>,
}

impl ModeReconciliation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless its map is already present. Returns whether it was kept.
    pub fn insert(&mut self, entry: RotationEntry) -> bool {
        if self.index.contains_key(&entry.map_name) {
            return false;
        }
        self.index.insert(entry.map_name.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Mode recorded for a raw map name.
    pub fn mode_for(&self, map_name: &str) -> Option<&str> {
        self.index
            .get(map_name.trim())
            .map(|&i| self.entries[i].mode.as_str())
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[RotationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RotationEntry> for ModeReconciliation {
    fn from_iter<I: IntoIterator<Item = RotationEntry>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for entry in iter {
            mapping.insert(entry);
        }
        mapping
    }
}

/// Current and next rotation state of one panel, with display names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSnapshot {
    pub current_map: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mode: Option<String>,
    /// Countdown text exactly as shown on the page
    pub time_remaining: String,
    pub next_map: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_mode: Option<String>,
}

impl ModeSnapshot {
    /// Render the three-line block for this panel.
    pub fn render(&self, labels: &Labels) -> String {
        format!(
            "{}: {}\n{}: {}\n{}: {}",
            labels.current,
            labels.join(self.current_mode.as_deref(), &self.current_map),
            labels.remaining,
            self.time_remaining,
            labels.next,
            labels.join(self.next_mode.as_deref(), &self.next_map),
        )
    }
}

/// The three panels of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationReport {
    pub pubs: ModeSnapshot,
    pub ranked: ModeSnapshot,
    pub mixed: ModeSnapshot,
    pub fetched_at: DateTime<Utc>,
}

impl RotationReport {
    pub fn snapshot(&self, panel: Panel) -> &ModeSnapshot {
        match panel {
            Panel::Pubs => &self.pubs,
            Panel::Ranked => &self.ranked,
            Panel::Mixed => &self.mixed,
        }
    }

    /// Titled blocks in pubs, ranked, mixed order, separated by blank lines.
    pub fn render(&self, labels: &Labels) -> String {
        Panel::ALL
            .iter()
            .map(|&panel| {
                format!(
                    "{}:\n{}",
                    labels.title(panel),
                    self.snapshot(panel).render(labels)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Display strings for the rendered message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Labels {
    #[serde(default = "defaults::pubs_title")]
    pub pubs_title: String,
    #[serde(default = "defaults::ranked_title")]
    pub ranked_title: String,
    #[serde(default = "defaults::mixed_title")]
    pub mixed_title: String,
    #[serde(default = "defaults::current")]
    pub current: String,
    #[serde(default = "defaults::remaining")]
    pub remaining: String,
    #[serde(default = "defaults::next")]
    pub next: String,

    /// Shown as the next mode when the listing has no entry for the map
    #[serde(default = "defaults::unknown_mode")]
    pub unknown_mode: String,

    /// Placed between mode and map on both mixed-panel lines
    #[serde(default = "defaults::mode_separator")]
    pub mode_separator: String,

    /// Reply sent to the chat when the pipeline fails
    #[serde(default = "defaults::failure")]
    pub failure: String,
}

impl Labels {
    pub fn title(&self, panel: Panel) -> &str {
        match panel {
            Panel::Pubs => &self.pubs_title,
            Panel::Ranked => &self.ranked_title,
            Panel::Mixed => &self.mixed_title,
        }
    }

    fn join(&self, mode: Option<&str>, map: &str) -> String {
        match mode {
            Some(mode) => format!("{}{}{}", mode, self.mode_separator, map),
            None => map.to_string(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            pubs_title: defaults::pubs_title(),
            ranked_title: defaults::ranked_title(),
            mixed_title: defaults::mixed_title(),
            current: defaults::current(),
            remaining: defaults::remaining(),
            next: defaults::next(),
            unknown_mode: defaults::unknown_mode(),
            mode_separator: defaults::mode_separator(),
            failure: defaults::failure(),
        }
    }
}

mod defaults {
    pub fn pubs_title() -> String {
        "匹配模式".into()
    }
    pub fn ranked_title() -> String {
        "排位模式".into()
    }
    pub fn mixed_title() -> String {
        "混合模式".into()
    }
    pub fn current() -> String {
        "当前地图".into()
    }
    pub fn remaining() -> String {
        "剩余时间".into()
    }
    pub fn next() -> String {
        "下个地图".into()
    }
    pub fn unknown_mode() -> String {
        "未知模式".into()
    }
    pub fn mode_separator() -> String {
        ": ".into()
    }
    pub fn failure() -> String {
        "获取地图信息失败，请稍后再试".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(map: &str, mode: &str) -> RotationEntry {
        RotationEntry {
            map_name: map.to_string(),
            mode: mode.to_string(),
        }
    }

    #[test]
    fn test_parse_listing_heading() {
        assert_eq!(
            RotationEntry::parse("Kings Canyon - Gun Run", " - "),
            Some(entry("Kings Canyon", "Gun Run"))
        );
        assert_eq!(RotationEntry::parse("Advertisement", " - "), None);
        assert_eq!(RotationEntry::parse("Kings Canyon-Gun Run", " - "), None);
    }

    #[test]
    fn test_parse_keeps_second_segment_as_mode() {
        assert_eq!(
            RotationEntry::parse("Siphon - Control - Night", " - "),
            Some(entry("Siphon", "Control"))
        );
        assert_eq!(
            RotationEntry::parse("Ad - ", " - "),
            Some(entry("Ad", ""))
        );
        assert_eq!(RotationEntry::parse("Olympus", " - "), None);
    }

    #[test]
    fn test_reconciliation_first_writer_wins() {
        let mapping: ModeReconciliation = vec![
            entry("Siphon", "Gun Run"),
            entry("Barometer", "Control"),
            entry("Siphon", "TDM"),
            entry("Barometer", "Gun Run"),
            entry("Skulltown", "TDM"),
        ]
        .into_iter()
        .collect();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.mode_for("Siphon"), Some("Gun Run"));
        assert_eq!(mapping.mode_for("Barometer"), Some("Control"));
        assert_eq!(mapping.mode_for("Overflow"), None);

        let order: Vec<_> = mapping.entries().iter().map(|e| e.map_name.as_str()).collect();
        assert_eq!(order, ["Siphon", "Barometer", "Skulltown"]);
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut mapping = ModeReconciliation::new();
        assert!(mapping.insert(entry("Siphon", "Gun Run")));
        assert!(!mapping.insert(entry("Siphon", "TDM")));
        assert_eq!(mapping.mode_for(" Siphon "), Some("Gun Run"));
    }

    #[test]
    fn test_render_pubs_block() {
        let snapshot = ModeSnapshot {
            current_map: "世界尽头".into(),
            current_mode: None,
            time_remaining: "12:34".into(),
            next_map: "奥林匹斯".into(),
            next_mode: None,
        };
        assert_eq!(
            snapshot.render(&Labels::default()),
            "当前地图: 世界尽头\n剩余时间: 12:34\n下个地图: 奥林匹斯"
        );
    }

    #[test]
    fn test_render_mixed_block_uses_one_separator() {
        let snapshot = ModeSnapshot {
            current_map: "气压计".into(),
            current_mode: Some("控制".into()),
            time_remaining: "3:21".into(),
            next_map: "虹吸".into(),
            next_mode: Some("子弹时间".into()),
        };
        assert_eq!(
            snapshot.render(&Labels::default()),
            "当前地图: 控制: 气压计\n剩余时间: 3:21\n下个地图: 子弹时间: 虹吸"
        );

        let spaced = Labels {
            mode_separator: " ".into(),
            ..Labels::default()
        };
        assert_eq!(
            snapshot.render(&spaced),
            "当前地图: 控制 气压计\n剩余时间: 3:21\n下个地图: 子弹时间 虹吸"
        );
    }

    #[test]
    fn test_render_report_sections() {
        let block = |map: &str| ModeSnapshot {
            current_map: map.into(),
            time_remaining: "1:00".into(),
            next_map: "X".into(),
            ..ModeSnapshot::default()
        };
        let report = RotationReport {
            pubs: block("A"),
            ranked: block("B"),
            mixed: block("C"),
            fetched_at: Utc::now(),
        };
        let text = report.render(&Labels::default());
        let sections: Vec<_> = text.split("\n\n").collect();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("匹配模式:\n当前地图: A"));
        assert!(sections[1].starts_with("排位模式:\n当前地图: B"));
        assert!(sections[2].starts_with("混合模式:\n当前地图: C"));
        assert!(sections.iter().all(|s| s.lines().count() == 4));
    }
}
