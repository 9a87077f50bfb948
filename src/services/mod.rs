//! Service layer for the rotation pipeline.
//!
//! This module contains the business logic for:
//! - Page loading (`RotationFetcher`)
//! - Markup parsing and translation (`RotationExtractor`)
//! - DOM querying over `scraper` (`dom`)

pub mod dom;
mod extractor;
mod fetcher;

pub use extractor::{RotationExtractor, split_mode_heading, strip_heading_prefix};
pub use fetcher::RotationFetcher;
