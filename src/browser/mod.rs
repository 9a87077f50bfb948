//! Renderer abstraction for browser-based page loading.
//!
//! Defines the `Renderer` and `RenderSession` traits that abstract over
//! the browser engine (Chromium via chromiumoxide in production, scripted
//! pages in tests).

pub mod chromium;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::{PageLayout, Panel};
use crate::services::dom::Document;

pub use chromium::ChromiumRenderer;

/// How long `Renderer::open` waits before handing the page over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadWait {
    /// Return once the document has loaded
    Load,
    /// Additionally wait until no new requests start for the idle window
    NetworkIdle,
}

/// A browser engine that hands out single-use page sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a fresh page and navigate it to `url`.
    async fn open(&self, url: &str, wait: LoadWait) -> Result<Box<dyn RenderSession>>;
}

/// One loaded page. Must be closed by the caller.
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Evaluate the condition against the live DOM.
    async fn is_ready(&self, condition: &ReadyCondition) -> Result<bool>;
    /// Full rendered markup.
    async fn content(&self) -> Result<String>;
    /// Release the page.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// An element whose text must be present and differ from a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextProbe {
    pub selector: String,
    pub placeholder: String,
}

/// Conjunction of text probes over the rendered DOM.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadyCondition {
    probes: Vec<TextProbe>,
}

impl ReadyCondition {
    pub fn new(probes: Vec<TextProbe>) -> Self {
        Self { probes }
    }

    /// All three panel timers loaded.
    pub fn timers_loaded(layout: &PageLayout) -> Self {
        Self::new(
            Panel::ALL
                .iter()
                .map(|&panel| TextProbe {
                    selector: layout.rule(panel).scoped_timer_selector(),
                    placeholder: layout.loading_placeholder.clone(),
                })
                .collect(),
        )
    }

    /// JavaScript expression evaluating to `true` once every probe passes.
    pub fn to_script(&self) -> String {
        let probes = serde_json::to_string(&self.probes).unwrap_or_else(|_| "[]".to_string());
        format!(
            "(() => {{ const probes = {probes}; return probes.every((p) => {{ \
             const el = document.querySelector(p.selector); \
             return el !== null && el.textContent.trim() !== p.placeholder; }}); }})()"
        )
    }

    /// Evaluate against static markup.
    pub fn is_met(&self, document: &Document) -> bool {
        self.probes.iter().all(|probe| {
            document
                .first(&probe.selector)
                .is_some_and(|el| el.text() != probe.placeholder)
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn page(pubs: &str, ranked: &str, ltm: &str) -> String {
        format!(
            r#"<div onclick="location='/current-map/battle_royale/pubs'"><h2 id="timer">{pubs}</h2></div>
               <div onclick="location='/current-map/battle_royale/ranked'"><h2 id="timer-ranked">{ranked}</h2></div>
               <div onclick="location='/current-map/ltm/pubs'"><h2 id="timer-ltm">{ltm}</h2></div>"#
        )
    }

    #[test]
    fn test_timers_loaded_condition() {
        let condition = ReadyCondition::timers_loaded(&PageLayout::default());
        assert_eq!(condition.probes.len(), 3);

        let ready = Document::parse(&page("12:34", "1:02:03", "4:56"));
        assert!(condition.is_met(&ready));

        let loading = Document::parse(&page("12:34", "Loading...", "4:56"));
        assert!(!condition.is_met(&loading));
    }

    #[test]
    fn test_missing_timer_is_not_ready() {
        let condition = ReadyCondition::timers_loaded(&PageLayout::default());
        let markup = r#"<div onclick="location='/current-map/battle_royale/pubs'"><h2 id="timer">1:00</h2></div>"#;
        assert!(!condition.is_met(&Document::parse(markup)));
    }

    #[test]
    fn test_script_embeds_escaped_selectors() {
        let condition = ReadyCondition::timers_loaded(&PageLayout::default());
        let script = condition.to_script();
        assert!(script.contains(r#"h2[id=\"timer-ranked\"]"#));
        assert!(script.contains("Loading..."));
        assert!(script.starts_with("(() =>"));
    }
}
