// src/pipeline/rotation.rs

//! Rotation pipeline: fetch both pages, then extract.

use std::time::Instant;

use crate::browser::Renderer;
use crate::error::Result;
use crate::models::{Config, RotationReport, Translations};
use crate::services::{RotationExtractor, RotationFetcher};

/// Fetched markup of both status pages.
#[derive(Debug, Clone)]
pub struct FetchedPages {
    pub listing: String,
    pub current_map: String,
}

/// Load both pages, sequentially or concurrently per `fetch.parallel`.
pub async fn fetch_pages(config: &Config, renderer: &dyn Renderer) -> Result<FetchedPages> {
    let fetcher = RotationFetcher::new(renderer, config);

    let (listing, current_map) = if config.fetch.parallel {
        log::info!("Fetching listing and current map concurrently");
        // Both fetches run to completion so each closes its own session.
        let (listing, current_map) =
            futures::join!(fetcher.fetch_mixed_listing(), fetcher.fetch_current_map());
        (listing?, current_map?)
    } else {
        log::info!("[STEP 1/3] Fetching mixed-mode listing");
        let listing = fetcher.fetch_mixed_listing().await?;
        log::info!("[STEP 2/3] Fetching current map page");
        let current_map = fetcher.fetch_current_map().await?;
        (listing, current_map)
    };

    Ok(FetchedPages {
        listing,
        current_map,
    })
}

/// Extract a report from already fetched pages.
pub fn extract_report(
    config: &Config,
    translations: &Translations,
    pages: &FetchedPages,
) -> RotationReport {
    RotationExtractor::new(&config.layout, translations, &config.labels)
        .extract_pages(&pages.listing, &pages.current_map)
}

/// Run the full rotation pipeline once.
pub async fn run_rotation(
    config: &Config,
    translations: &Translations,
    renderer: &dyn Renderer,
) -> Result<RotationReport> {
    let start = Instant::now();

    let pages = fetch_pages(config, renderer).await?;

    log::info!("[STEP 3/3] Extracting rotation");
    let report = extract_report(config, translations, &pages);

    log::info!(
        "Rotation fetched in {}ms (pubs: {}, ranked: {}, mixed: {})",
        start.elapsed().as_millis(),
        report.pubs.current_map,
        report.ranked.current_map,
        report.mixed.current_map
    );
    Ok(report)
}
