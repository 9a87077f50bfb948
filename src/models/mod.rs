// src/models/mod.rs

//! Domain models for the rotation pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod layout;
mod rotation;
mod translation;

// Re-export all public types
pub use config::{Config, FetchConfig, RendererConfig};
pub use layout::{PageLayout, Panel, PanelRule};
pub use rotation::{Labels, ModeReconciliation, ModeSnapshot, RotationEntry, RotationReport};
pub use translation::{TranslationTable, Translations};
