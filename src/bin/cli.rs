//! apexmap CLI
//!
//! Local entry point: fetch the live rotation, replay saved pages, or check a
//! configuration file.

use std::path::PathBuf;
use std::sync::Arc;

use apexmap::{
    browser::ChromiumRenderer,
    command::RotationCommand,
    error::{AppError, Result},
    models::{Config, RotationReport},
    pipeline::{self, FetchedPages},
};
use clap::{Parser, Subcommand};

/// apexmap - Apex Legends map rotation
#[derive(Parser, Debug)]
#[command(name = "apexmap", version, about = "Current Apex Legends map rotation")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the live rotation and print it (default)
    Rotation {
        /// Print the report as JSON instead of chat text
        #[arg(long)]
        json: bool,

        /// Save the fetched pages into this directory
        #[arg(long)]
        save_pages: Option<PathBuf>,
    },

    /// Run the extractor on previously saved pages
    Parse {
        /// Rendered mixed-mode listing page
        #[arg(long)]
        listing: PathBuf,

        /// Rendered current-map page
        #[arg(long)]
        current: PathBuf,

        /// Print the report as JSON instead of chat text
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_report(report: &RotationReport, config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.render(&config.labels));
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let command = cli.command.unwrap_or(Command::Rotation {
        json: false,
        save_pages: None,
    });

    match command {
        Command::Rotation { json, save_pages } => {
            let renderer = ChromiumRenderer::launch(&config.renderer, &config.fetch).await?;

            if !json && save_pages.is_none() {
                let config = Arc::new(config);
                let renderer = Arc::new(renderer);
                let text = RotationCommand::new(Arc::clone(&config), renderer.clone())
                    .execute()
                    .await;
                shutdown(renderer).await;
                println!("{}", text?);
                return Ok(());
            }

            let translations = config.translation_tables();
            let fetched = pipeline::fetch_pages(&config, &renderer).await;
            if let Err(e) = renderer.shutdown().await {
                log::warn!("{}", e);
            }
            let pages = fetched?;

            if let Some(dir) = save_pages {
                tokio::fs::create_dir_all(&dir).await?;
                tokio::fs::write(dir.join("listing.html"), &pages.listing).await?;
                tokio::fs::write(dir.join("current-map.html"), &pages.current_map).await?;
                log::info!("Saved pages to {}", dir.display());
            }

            let report = pipeline::extract_report(&config, &translations, &pages);
            print_report(&report, &config, json)?;
        }

        Command::Parse {
            listing,
            current,
            json,
        } => {
            let pages = FetchedPages {
                listing: tokio::fs::read_to_string(&listing).await?,
                current_map: tokio::fs::read_to_string(&current).await?,
            };
            let report = pipeline::extract_report(&config, &config.translation_tables(), &pages);
            print_report(&report, &config, json)?;
        }

        Command::Validate => {
            log::info!("✓ Config OK ({})", cli.config.display());
            let tables = config.translation_tables();
            log::info!(
                "Translations: {} map(s), {} mode(s)",
                tables.maps.len(),
                tables.modes.len()
            );
        }
    }

    Ok(())
}

async fn shutdown(renderer: Arc<ChromiumRenderer>) {
    match Arc::try_unwrap(renderer) {
        Ok(renderer) => {
            if let Err(e) = renderer.shutdown().await {
                log::warn!("{}", e);
            }
        }
        Err(_) => log::warn!("{}", AppError::browser("renderer still in use at shutdown")),
    }
}
