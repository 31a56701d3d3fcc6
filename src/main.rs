mod app;
mod color;
mod config;
mod context;
mod data;
mod interpretation;
mod report;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use app::WaterQualityApp;
use clap::{Parser, Subcommand};
use config::AppConfig;
use context::ModelContext;
use data::fetch::HttpFetcher;
use data::reconcile::RawInput;
use eframe::egui;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Local path of the model file (overrides WQ_MODEL_PATH)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Local path of the model columns file (overrides WQ_COLUMNS_PATH)
    #[arg(long)]
    columns_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print one prediction to stdout instead of opening the window
    Predict {
        /// Year to predict for
        #[arg(long, default_value_t = 2024, value_parser = clap::value_parser!(i32).range(2000..=2050))]
        year: i32,

        /// Monitoring station id, e.g. 1
        #[arg(long)]
        station: String,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(path) = cli.model_path {
        config.model_path = path;
    }
    if let Some(path) = cli.columns_path {
        config.columns_path = path;
    }

    let fetcher = HttpFetcher::new(config.http_timeout).context("building HTTP client")?;
    let context = match ModelContext::load(&config, &fetcher) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            log::error!("Cannot start without model artifacts: {e:#}");
            return Err(e);
        }
    };

    match cli.command {
        Some(Command::Predict { year, station }) => run_headless(&context, year, &station),
        None => run_window(context),
    }
}

fn run_headless(context: &ModelContext, year: i32, station: &str) -> Result<()> {
    let station = station.trim();
    if station.is_empty() {
        bail!("Please enter the station ID");
    }
    let prediction = context.predict(&RawInput::new(year, station))?;
    print!("{}", report::render_report(&prediction));
    Ok(())
}

fn run_window(context: Arc<ModelContext>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 900.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Water Quality Prediction",
        options,
        Box::new(move |_cc| Ok(Box::new(WaterQualityApp::new(context)))),
    )
    .map_err(|e| anyhow!("window closed with error: {e}"))
}
