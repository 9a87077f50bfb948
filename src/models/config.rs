//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::layout::PageLayout;
use super::rotation::Labels;
use super::translation::Translations;
use crate::error::{AppError, Result};
use crate::services::dom::parse_selector;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Headless browser launch settings
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Page loading and waiting behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Endpoints and selectors of the status site
    #[serde(default)]
    pub layout: PageLayout,

    /// Strings used in the rendered reply
    #[serde(default)]
    pub labels: Labels,

    /// Extra or replacement translations, layered over the built-in tables
    #[serde(default)]
    pub translations: Translations,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Built-in translation tables merged with the configured ones.
    pub fn translation_tables(&self) -> Translations {
        Translations::builtin_with(&self.translations)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timer_timeout_secs == 0 {
            return Err(AppError::validation("fetch.timer_timeout_secs must be > 0"));
        }
        if self.fetch.navigation_timeout_secs == 0 {
            return Err(AppError::validation(
                "fetch.navigation_timeout_secs must be > 0",
            ));
        }
        if self.fetch.poll_interval_ms == 0 {
            return Err(AppError::validation("fetch.poll_interval_ms must be > 0"));
        }
        if self.fetch.poll_interval() >= self.fetch.timer_timeout() {
            return Err(AppError::validation(
                "fetch.poll_interval_ms must be shorter than fetch.timer_timeout_secs",
            ));
        }

        for url in [&self.layout.listing_url, &self.layout.current_map_url] {
            let parsed = Url::parse(url)?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AppError::validation(format!(
                    "endpoint must be an http(s) URL: {url}"
                )));
            }
        }

        for selector in self.layout.selectors() {
            parse_selector(&selector)?;
        }

        if self.layout.listing_separator.is_empty() || self.layout.heading_separator.is_empty() {
            return Err(AppError::validation("layout separators must not be empty"));
        }
        if self.layout.loading_placeholder.trim().is_empty() {
            return Err(AppError::validation("layout.loading_placeholder is empty"));
        }
        Ok(())
    }
}

/// Headless browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Explicit Chromium executable; auto-detected when unset
    #[serde(default)]
    pub chromium_path: Option<PathBuf>,

    /// Run without a visible window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Disable the Chromium sandbox (needed in most containers)
    #[serde(default = "defaults::no_sandbox")]
    pub no_sandbox: bool,

    /// Override the browser's User-Agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            chromium_path: None,
            headless: defaults::headless(),
            no_sandbox: defaults::no_sandbox(),
            user_agent: None,
        }
    }
}

/// Page loading and waiting behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Upper bound for navigation plus network-idle settling, in seconds
    #[serde(default = "defaults::navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Upper bound for the timers to finish loading, in seconds
    #[serde(default = "defaults::timer_timeout")]
    pub timer_timeout_secs: u64,

    /// Delay between ready-condition checks
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,

    /// Quiet period with no new network requests that counts as idle
    #[serde(default = "defaults::idle_window")]
    pub idle_window_ms: u64,

    /// Wait for network idle after navigation; `false` returns at the load event
    #[serde(default = "defaults::wait_for_network_idle")]
    pub wait_for_network_idle: bool,

    /// Fetch the listing and current-map pages concurrently
    #[serde(default)]
    pub parallel: bool,
}

impl FetchConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn timer_timeout(&self) -> Duration {
        Duration::from_secs(self.timer_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: defaults::navigation_timeout(),
            timer_timeout_secs: defaults::timer_timeout(),
            poll_interval_ms: defaults::poll_interval(),
            idle_window_ms: defaults::idle_window(),
            wait_for_network_idle: defaults::wait_for_network_idle(),
            parallel: false,
        }
    }
}

mod defaults {
    pub fn headless() -> bool {
        true
    }
    pub fn no_sandbox() -> bool {
        true
    }
    pub fn navigation_timeout() -> u64 {
        30
    }
    pub fn timer_timeout() -> u64 {
        20
    }
    pub fn poll_interval() -> u64 {
        250
    }
    pub fn idle_window() -> u64 {
        500
    }
    pub fn wait_for_network_idle() -> bool {
        true
    }
}
