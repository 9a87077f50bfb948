//! Pipeline entry points.
//!
//! - `run_rotation`: fetch both status pages and extract the report
//! - `fetch_pages` / `extract_report`: the two halves, for callers that
//!   already hold markup or want to inspect it

pub mod rotation;

pub use rotation::{FetchedPages, extract_report, fetch_pages, run_rotation};
