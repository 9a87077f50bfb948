// src/lib.rs

//! apexmap: Apex Legends map rotation scraper

pub mod browser;
pub mod command;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
