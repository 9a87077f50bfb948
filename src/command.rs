// src/command.rs

//! Chat-facing `apexmap` command.
//!
//! The chat session registers the command under [`RotationCommand::NAME`]
//! and calls [`RotationCommand::respond`] with no arguments.

use std::sync::Arc;

use crate::browser::Renderer;
use crate::error::Result;
use crate::models::{Config, Translations};
use crate::pipeline::run_rotation;

/// The argument-less rotation command.
pub struct RotationCommand {
    config: Arc<Config>,
    translations: Translations,
    renderer: Arc<dyn Renderer>,
}

impl RotationCommand {
    pub const NAME: &'static str = "apexmap";
    pub const DESCRIPTION: &'static str = "获取Apex Legends地图信息";

    /// Translation tables are built once here and reused by every invocation.
    pub fn new(config: Arc<Config>, renderer: Arc<dyn Renderer>) -> Self {
        let translations = config.translation_tables();
        Self {
            config,
            translations,
            renderer,
        }
    }

    /// Run the pipeline and render the reply text.
    pub async fn execute(&self) -> Result<String> {
        let report = run_rotation(&self.config, &self.translations, self.renderer.as_ref()).await?;
        Ok(report.render(&self.config.labels))
    }

    /// Like [`execute`](Self::execute), but always produces a reply.
    pub async fn respond(&self) -> String {
        match self.execute().await {
            Ok(text) => text,
            Err(e) => {
                if e.is_timeout() {
                    log::error!("{} timed out: {}", Self::NAME, e);
                } else {
                    log::error!("{} failed: {}", Self::NAME, e);
                }
                self.config.labels.failure.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{ScriptedPage, ScriptedRenderer};

    fn command(renderer: ScriptedRenderer, config: Config) -> RotationCommand {
        RotationCommand::new(Arc::new(config), Arc::new(renderer))
    }

    fn current_map() -> &'static str {
        r#"<div onclick="location='/current-map/battle_royale/pubs'">
             <h1 style="font-weight: 600; margin-bottom: 5px;">Battle Royale: E-District</h1>
             <h2 id="timer">0:59</h2><h5>BR</h5><h5><b>Olympus</b></h5></div>
           <div onclick="location='/current-map/battle_royale/ranked'"><h2 id="timer-ranked">3:00</h2></div>
           <div onclick="location='/current-map/ltm/pubs'"><h2 id="timer-ltm">1:00</h2></div>"#
    }

    #[tokio::test]
    async fn test_respond_uses_configured_translations() {
        let mut config: Config = toml::from_str(
            r#"
            [translations.maps]
            "E-District" = "E区"
            "#,
        )
        .unwrap();
        config.fetch.poll_interval_ms = 10;

        let renderer = ScriptedRenderer::new()
            .with_page(&config.layout.listing_url, ScriptedPage::new(""))
            .with_page(&config.layout.current_map_url, ScriptedPage::new(current_map()));

        let text = command(renderer, config).respond().await;
        assert!(text.starts_with("匹配模式:\n当前地图: E区\n剩余时间: 0:59\n下个地图: 奥林匹斯"));
    }

    #[tokio::test]
    async fn test_respond_replaces_errors_with_failure_text() {
        let config = Config::default();
        let failure = config.labels.failure.clone();
        let text = command(ScriptedRenderer::new(), config).respond().await;
        assert_eq!(text, failure);
    }

    #[tokio::test]
    async fn test_execute_propagates_errors() {
        let result = command(ScriptedRenderer::new(), Config::default()).execute().await;
        assert!(result.is_err());
    }
}
