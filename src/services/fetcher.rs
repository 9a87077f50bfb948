// src/services/fetcher.rs

//! Rotation fetcher service.
//!
//! Loads the status pages through a [`Renderer`] and returns their rendered
//! markup. Every call opens its own session and closes it before returning.

use std::time::{Duration, Instant};

use crate::browser::{LoadWait, ReadyCondition, RenderSession, Renderer};
use crate::error::{AppError, Result};
use crate::models::Config;

/// Service for loading the listing and current-map pages.
pub struct RotationFetcher<'a> {
    renderer: &'a dyn Renderer,
    config: &'a Config,
}

impl<'a> RotationFetcher<'a> {
    pub fn new(renderer: &'a dyn Renderer, config: &'a Config) -> Self {
        Self { renderer, config }
    }

    /// Markup of the page listing every active mixed-mode map and its mode.
    pub async fn fetch_mixed_listing(&self) -> Result<String> {
        let url = &self.config.layout.listing_url;
        log::debug!("Fetching mixed-mode listing from {}", url);

        let session = self.renderer.open(url, self.load_wait()).await?;
        let markup = session.content().await;
        release(session, url).await;
        markup
    }

    /// Markup of the current-map page once all three timers have loaded.
    pub async fn fetch_current_map(&self) -> Result<String> {
        let url = &self.config.layout.current_map_url;
        log::debug!("Fetching current map page from {}", url);

        let condition = ReadyCondition::timers_loaded(&self.config.layout);
        let session = self.renderer.open(url, self.load_wait()).await?;
        let markup = match self.wait_until(session.as_ref(), &condition, url).await {
            Ok(()) => session.content().await,
            Err(e) => Err(e),
        };
        release(session, url).await;
        markup
    }

    fn load_wait(&self) -> LoadWait {
        if self.config.fetch.wait_for_network_idle {
            LoadWait::NetworkIdle
        } else {
            LoadWait::Load
        }
    }

    /// Poll `condition` until it holds or the timer bound elapses.
    async fn wait_until(
        &self,
        session: &dyn RenderSession,
        condition: &ReadyCondition,
        url: &str,
    ) -> Result<()> {
        let timeout = self.config.fetch.timer_timeout();
        let interval = self.config.fetch.poll_interval();
        let started = Instant::now();

        loop {
            if session.is_ready(condition).await? {
                log::debug!(
                    "Timers ready on {} after {}ms",
                    url,
                    started.elapsed().as_millis()
                );
                return Ok(());
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                log::warn!("Timers on {} still loading after {}ms", url, elapsed.as_millis());
                return Err(AppError::timeout(url, elapsed.as_millis() as u64));
            }
            tokio::time::sleep(interval.min(remaining(timeout, elapsed))).await;
        }
    }
}

fn remaining(timeout: Duration, elapsed: Duration) -> Duration {
    timeout.saturating_sub(elapsed).max(Duration::from_millis(1))
}

async fn release(session: Box<dyn RenderSession>, url: &str) {
    if let Err(e) = session.close().await {
        log::warn!("Failed to close session for {}: {}", url, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{ScriptedPage, ScriptedRenderer};

    fn current_map(timer: &str) -> String {
        format!(
            r#"<div onclick="location='/current-map/battle_royale/pubs'"><h2 id="timer">{timer}</h2></div>
               <div onclick="location='/current-map/battle_royale/ranked'"><h2 id="timer-ranked">{timer}</h2></div>
               <div onclick="location='/current-map/ltm/pubs'"><h2 id="timer-ltm">{timer}</h2></div>"#
        )
    }

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.fetch.timer_timeout_secs = 1;
        config.fetch.poll_interval_ms = 10;
        config
    }

    #[tokio::test]
    async fn test_listing_uses_network_idle_and_closes() {
        let config = fast_config();
        let renderer = ScriptedRenderer::new()
            .with_page(&config.layout.listing_url, ScriptedPage::new("<h3>Olympus - TDM</h3>"));

        let markup = RotationFetcher::new(&renderer, &config)
            .fetch_mixed_listing()
            .await
            .unwrap();

        assert_eq!(markup, "<h3>Olympus - TDM</h3>");
        assert_eq!(
            renderer.opened(),
            vec![(config.layout.listing_url.clone(), LoadWait::NetworkIdle)]
        );
        assert_eq!(renderer.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_network_idle_can_be_disabled() {
        let mut config = fast_config();
        config.fetch.wait_for_network_idle = false;
        let renderer = ScriptedRenderer::new()
            .with_page(&config.layout.current_map_url, ScriptedPage::new(current_map("0:30")));

        RotationFetcher::new(&renderer, &config)
            .fetch_current_map()
            .await
            .unwrap();

        assert_eq!(
            renderer.opened(),
            vec![(config.layout.current_map_url.clone(), LoadWait::Load)]
        );
    }

    #[tokio::test]
    async fn test_current_map_waits_for_timers() {
        let config = fast_config();
        let frames = vec![
            current_map("Loading..."),
            current_map("Loading..."),
            current_map("12:34"),
        ];
        let renderer = ScriptedRenderer::new()
            .with_page(&config.layout.current_map_url, ScriptedPage::frames(frames));

        let markup = RotationFetcher::new(&renderer, &config)
            .fetch_current_map()
            .await
            .unwrap();

        assert!(markup.contains("12:34"));
        assert!(!markup.contains("Loading..."));
        assert_eq!(renderer.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_current_map_times_out_within_bound() {
        let config = fast_config();
        let renderer = ScriptedRenderer::new().with_page(
            &config.layout.current_map_url,
            ScriptedPage::new(current_map("Loading...")),
        );

        let started = Instant::now();
        let err = RotationFetcher::new(&renderer, &config)
            .fetch_current_map()
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(err.is_timeout(), "unexpected error: {err}");
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(3));
        assert_eq!(renderer.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_page_is_fetch_error() {
        let config = fast_config();
        let renderer = ScriptedRenderer::new();

        let err = RotationFetcher::new(&renderer, &config)
            .fetch_mixed_listing()
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Fetch { .. }));
        assert_eq!(renderer.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_session_closed_when_content_fails() {
        let config = fast_config();
        let page = ScriptedPage {
            broken_content: true,
            ..ScriptedPage::new(current_map("1:00"))
        };
        let renderer = ScriptedRenderer::new().with_page(&config.layout.current_map_url, page);

        let result = RotationFetcher::new(&renderer, &config)
            .fetch_current_map()
            .await;

        assert!(matches!(result, Err(AppError::Fetch { .. })));
        assert_eq!(renderer.open_sessions(), 0);
    }
}
