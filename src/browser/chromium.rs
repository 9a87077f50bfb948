//! Chromium-based renderer using chromiumoxide.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{LoadWait, ReadyCondition, RenderSession, Renderer};
use crate::error::{AppError, Result};
use crate::models::{FetchConfig, RendererConfig};

const NAVIGATION_STATUS_JS: &str = "(() => { \
    const nav = performance.getEntriesByType('navigation')[0]; \
    return nav && nav.responseStatus ? nav.responseStatus : 0; })()";

const NETWORK_ACTIVITY_JS: &str =
    "[document.readyState, performance.getEntriesByType('resource').length]";

/// Chromium-based renderer. One browser process, one tab per session.
pub struct ChromiumRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    user_agent: Option<String>,
    navigation_timeout: Duration,
    poll_interval: Duration,
    idle_window: Duration,
}

impl ChromiumRenderer {
    /// Launch a Chromium instance according to the configuration.
    pub async fn launch(renderer: &RendererConfig, fetch: &FetchConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if renderer.headless {
            builder = builder.with_head().arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        if renderer.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &renderer.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(AppError::browser)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::browser(format!("failed to launch Chromium: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log::debug!("Browser handler event error: {}", e);
                }
            }
        });

        log::info!("Chromium launched");

        Ok(Self {
            browser,
            handler,
            user_agent: renderer.user_agent.clone(),
            navigation_timeout: fetch.navigation_timeout(),
            poll_interval: fetch.poll_interval(),
            idle_window: fetch.idle_window(),
        })
    }

    /// Close the browser process.
    pub async fn shutdown(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        self.handler.abort();
        closed
            .map(|_| ())
            .map_err(|e| AppError::browser(format!("failed to close Chromium: {e}")))
    }

    async fn navigate(&self, page: &Page, url: &str, wait: LoadWait) -> Result<()> {
        if let Some(user_agent) = &self.user_agent {
            page.set_user_agent(SetUserAgentOverrideParams::new(user_agent.clone()))
                .await
                .map_err(|e| AppError::fetch(url, e))?;
        }

        match tokio::time::timeout(self.navigation_timeout, page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(AppError::fetch(url, e)),
            Err(_) => {
                return Err(AppError::fetch(
                    url,
                    format!(
                        "navigation did not complete within {}s",
                        self.navigation_timeout.as_secs()
                    ),
                ));
            }
        }

        let status: u16 = evaluate(page, url, NAVIGATION_STATUS_JS).await?;
        if status >= 400 {
            return Err(AppError::fetch(url, format!("HTTP status {status}")));
        }

        if wait == LoadWait::NetworkIdle {
            self.wait_for_network_idle(page, url).await?;
        }
        Ok(())
    }

    /// Poll until the resource count stops changing for the idle window.
    ///
    /// Gives up quietly at the navigation timeout; the page is then read as-is.
    async fn wait_for_network_idle(&self, page: &Page, url: &str) -> Result<()> {
        let started = Instant::now();
        let mut last_count = usize::MAX;
        let mut quiet_since = Instant::now();

        loop {
            let (ready_state, count): (String, usize) =
                evaluate(page, url, NETWORK_ACTIVITY_JS).await?;

            if count != last_count || ready_state != "complete" {
                last_count = count;
                quiet_since = Instant::now();
            } else if quiet_since.elapsed() >= self.idle_window {
                log::debug!(
                    "Network idle for {} after {}ms ({} resources)",
                    url,
                    started.elapsed().as_millis(),
                    count
                );
                return Ok(());
            }

            if started.elapsed() >= self.navigation_timeout {
                log::warn!(
                    "Network never went idle for {} within {}s; reading page as-is",
                    url,
                    self.navigation_timeout.as_secs()
                );
                return Ok(());
            }
            tokio::time::sleep(self.poll_interval.min(self.idle_window)).await;
        }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn open(&self, url: &str, wait: LoadWait) -> Result<Box<dyn RenderSession>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::fetch(url, format!("failed to create page: {e}")))?;

        if let Err(e) = self.navigate(&page, url, wait).await {
            if let Err(close_err) = page.close().await {
                log::debug!("Failed to close page after error: {}", close_err);
            }
            return Err(e);
        }

        Ok(Box::new(ChromiumSession {
            page,
            url: url.to_string(),
        }))
    }
}

/// A single Chromium tab.
pub struct ChromiumSession {
    page: Page,
    url: String,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn is_ready(&self, condition: &ReadyCondition) -> Result<bool> {
        evaluate(&self.page, &self.url, &condition.to_script()).await
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| AppError::fetch(&self.url, format!("failed to read page content: {e}")))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumSession { page, url } = *self;
        page.close()
            .await
            .map_err(|e| AppError::fetch(url, format!("failed to close page: {e}")))
    }
}

async fn evaluate<T: serde::de::DeserializeOwned>(page: &Page, url: &str, script: &str) -> Result<T> {
    page.evaluate(script)
        .await
        .map_err(|e| AppError::fetch(url, format!("script evaluation failed: {e}")))?
        .into_value()
        .map_err(|e| AppError::fetch(url, format!("unexpected script result: {e:?}")))
}
