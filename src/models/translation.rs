//! Name translation tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mapping from an English source name to its localized display name.
///
/// Lookups never fail: a name without an entry is returned unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    /// Build a table from `(source, localized)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Translate a name, passing it through when there is no entry.
    pub fn translate(&self, name: &str) -> String {
        self.entries
            .get(name.trim())
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Add or replace entries from another table.
    pub fn extend(&mut self, other: &TranslationTable) {
        self.entries.extend(
            other
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Map-name and mode-name tables used by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    /// Map names (World's Edge, Olympus, ...)
    #[serde(default)]
    pub maps: TranslationTable,

    /// Mode and playlist names (Control, Gun Run, ...)
    #[serde(default)]
    pub modes: TranslationTable,
}

impl Translations {
    /// Built-in Simplified Chinese tables.
    pub fn builtin() -> Self {
        Self {
            maps: TranslationTable::from_pairs(builtin::MAPS.iter().copied()),
            modes: TranslationTable::from_pairs(builtin::MODES.iter().copied()),
        }
    }

    /// Built-in tables with user entries layered on top.
    pub fn builtin_with(overrides: &Translations) -> Self {
        let mut tables = Self::builtin();
        tables.maps.extend(&overrides.maps);
        tables.modes.extend(&overrides.modes);
        tables
    }

    pub fn map(&self, name: &str) -> String {
        self.maps.translate(name)
    }

    pub fn mode(&self, name: &str) -> String {
        self.modes.translate(name)
    }
}

mod builtin {
    pub const MAPS: &[(&str, &str)] = &[
        ("World's Edge", "世界尽头"),
        ("Kings Canyon", "诸王峡谷"),
        ("Storm Point", "风暴点"),
        ("Olympus", "奥林匹斯"),
        ("Broken Moon", "破碎月亮"),
        ("Fragment", "碎片"),
        ("Barometer", "气压计"),
        ("Overflow", "溢出"),
        ("Zeus Station", "宙斯站"),
        ("Caustic Treatment", "侵蚀疗法"),
        ("Wattson's Pylon", "华森塔"),
        ("Skulltown", "骷髅镇"),
        ("Siphon", "虹吸"),
        ("Party crasher", "派对破坏者"),
    ];

    pub const MODES: &[(&str, &str)] = &[
        ("TDM", "团队死斗"),
        ("Gun Run", "子弹时间"),
        ("Control", "控制"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_map() {
        let tables = Translations::builtin();
        assert_eq!(tables.map("World's Edge"), "世界尽头");
        assert_eq!(tables.mode("Gun Run"), "子弹时间");
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let tables = Translations::builtin();
        for name in ["E-District", "", "Battle Royale", "世界尽头"] {
            assert_eq!(tables.map(name), name);
            assert_eq!(tables.mode(name), name);
        }
    }

    #[test]
    fn test_tables_are_independent() {
        let tables = Translations::builtin();
        assert_eq!(tables.map("Control"), "Control");
        assert_eq!(tables.mode("Olympus"), "Olympus");
    }

    #[test]
    fn test_translate_trims_whitespace() {
        let tables = Translations::builtin();
        assert_eq!(tables.map("  Olympus \n"), "奥林匹斯");
    }

    #[test]
    fn test_miss_returns_input_untouched() {
        let tables = Translations::builtin();
        assert_eq!(tables.map(" E-District "), " E-District ");
        assert_eq!(tables.mode("\tMixtape"), "\tMixtape");
    }

    #[test]
    fn test_builtin_with_overrides() {
        let overrides = Translations {
            maps: TranslationTable::from_pairs([("Olympus", "奥林匹斯山"), ("E-District", "E区")]),
            modes: TranslationTable::default(),
        };
        let tables = Translations::builtin_with(&overrides);
        assert_eq!(tables.map("Olympus"), "奥林匹斯山");
        assert_eq!(tables.map("E-District"), "E区");
        assert_eq!(tables.map("Kings Canyon"), "诸王峡谷");
        assert_eq!(tables.modes.len(), Translations::builtin().modes.len());
    }
}
