//! Thin query layer over `scraper`.
//!
//! Queries never fail: an unparseable selector or a missing element yields
//! an empty result, so callers can degrade instead of aborting.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping failures into `AppError::Selector`.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn selector_or_warn(s: &str) -> Option<Selector> {
    match parse_selector(s) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::warn!("{e}");
            None
        }
    }
}

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Vec<Node<'_>> {
        selector_or_warn(selector)
            .map(|sel| self.html.select(&sel).map(Node).collect())
            .unwrap_or_default()
    }

    /// First element matching `selector`.
    pub fn first(&self, selector: &str) -> Option<Node<'_>> {
        let sel = selector_or_warn(selector)?;
        self.html.select(&sel).next().map(Node)
    }
}

/// An element inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Descendants matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Vec<Node<'a>> {
        selector_or_warn(selector)
            .map(|sel| self.0.select(&sel).map(Node).collect())
            .unwrap_or_default()
    }

    /// The `n`th descendant matching `selector`.
    pub fn nth(&self, selector: &str, n: usize) -> Option<Node<'a>> {
        let sel = selector_or_warn(selector)?;
        self.0.select(&sel).nth(n).map(Node)
    }

    /// Concatenated, trimmed text of the first matching descendant.
    pub fn text_of(&self, selector: &str) -> Option<String> {
        self.nth(selector, 0).map(|node| node.text())
    }

    /// Concatenated text content, trimmed.
    pub fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }
}
