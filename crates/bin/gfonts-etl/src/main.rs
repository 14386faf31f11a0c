//! Command-line entry point for the gfonts catalog pipeline.
//!
//! Each subcommand runs one pipeline step against a data root: fetch the font
//! catalog, collect the icon catalog, rebuild the store, or query it.

mod config;

use std::process::ExitCode;

use gfonts_core::catalog::{CatalogError, write_icon_catalog};
use gfonts_core::control::FontsControlPlane;
use gfonts_core::fetch::CatalogFetcher;
use gfonts_core::store::SqliteFontStore;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{EtlCommand, EtlConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "gfonts-etl failed");
            eprintln!("gfonts-etl: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), BoxError> {
    let config = EtlConfig::from_args()?;
    match config.command {
        EtlCommand::FetchFonts { api_key, endpoint } => {
            let mut fetcher = CatalogFetcher::new(api_key)?;
            if let Some(endpoint) = endpoint {
                fetcher = fetcher.with_endpoint(endpoint);
            }
            fetcher.fetch_to_file(&config.layout.font_catalog()).await?;
        }
        EtlCommand::CollectIcons => {
            let collector = config.layout.icon_collector();
            let path = config.layout.icon_catalog();
            let count = tokio::task::spawn_blocking(move || {
                let icons = collector.collect()?;
                write_icon_catalog(&icons, &path)?;
                Ok::<_, CatalogError>(icons.len())
            })
            .await??;
            info!(icons = count, path = %config.layout.icon_catalog().display(), "saved icon catalog");
        }
        EtlCommand::BuildDb => {
            let (control, report) =
                FontsControlPlane::build_database(config.layout.build_inputs(), config.db_path.clone())
                    .await?;
            let stats = control.database_stats().await?;
            let orphans = control.orphan_counts().await?;
            info!(
                path = %config.db_path.display(),
                fonts = stats.fonts,
                variants = stats.variants,
                icons = stats.icons,
                orphans = orphans.total(),
                skipped_variants = report.variants.skipped(),
                skipped_font_tags = report.font_tags.skipped(),
                skipped_variant_tags = report.variant_tags.skipped(),
                "database built"
            );
        }
        EtlCommand::Stats => {
            let control = open(&config)?;
            print_json(&control.database_stats().await?)?;
        }
        EtlCommand::SearchFonts(ref filter) => {
            let control = open(&config)?;
            print_json(&control.search_fonts(filter.clone()).await?)?;
        }
        EtlCommand::SearchIcons(ref filter) => {
            let control = open(&config)?;
            print_json(&control.search_icons(filter.clone()).await?)?;
        }
    }
    Ok(())
}

fn open(config: &EtlConfig) -> Result<FontsControlPlane, BoxError> {
    let store = SqliteFontStore::open_read_only(&config.db_path)?;
    Ok(FontsControlPlane::new(store))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
