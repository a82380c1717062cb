use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use lod_layout::{Config, Scene, check_layout, read_layout_json, read_relevance_csv};

/// Re-checks a layout JSON against the scene it was produced for
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[arg(long)]
    config: PathBuf,

    #[arg(long)]
    layout: PathBuf,

    /// Relevance CSV used for the run; defaults to `scene.relevance_csv`
    #[arg(long)]
    relevance: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let csv_path = args
        .relevance
        .clone()
        .or_else(|| config.relevance_path(&args.config));
    let overrides = csv_path
        .as_ref()
        .map(read_relevance_csv)
        .transpose()
        .context("reading relevance CSV")?;
    let scene = Scene::from_config(&config.scene, overrides.as_ref())?;

    let layout = read_layout_json(&args.layout)
        .with_context(|| format!("reading {}", args.layout.display()))?;

    match check_layout(&scene, &layout) {
        Ok(()) => {
            info!("{}: {} items, layout is valid", args.layout.display(), layout.len());
            Ok(())
        }
        Err(e) => {
            error!("{}: {e}", args.layout.display());
            std::process::exit(1);
        }
    }
}
