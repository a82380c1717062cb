use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::str::FromStr;

use lod_layout::{
    Config, DEFAULT_CONFIG_PATH, ExportFormat, LayoutStatus, Scene, SolveOptions,
    export_layout_csv, export_layout_json, optimize_layout, read_relevance_csv,
};

/// Adaptive level-of-detail grid layout
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scene and solver configuration (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Relevance CSV (`Item,Relevance`); defaults to `scene.relevance_csv`
    #[arg(long)]
    relevance: Option<PathBuf>,

    /// Output files to write: json, csv or both
    #[arg(long, default_value = "both", value_parser = ExportFormat::from_str)]
    format: ExportFormat,

    /// Directory for the layout files; defaults to `solver.output_dir`
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the layout without writing files
    #[arg(long)]
    no_write: bool,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    info!("Loaded configuration from {}", args.config.display());

    let csv_path = args
        .relevance
        .clone()
        .or_else(|| config.relevance_path(&args.config));
    let overrides = match csv_path {
        Some(path) => {
            let scores = read_relevance_csv(&path)
                .with_context(|| format!("reading relevance from {}", path.display()))?;
            info!("Loaded {} relevance scores from {}", scores.len(), path.display());
            Some(scores)
        }
        None => None,
    };

    let scene = Scene::from_config(&config.scene, overrides.as_ref())?;
    let opts = SolveOptions::from_config(&config)?;
    debug!("solve options: {opts:?}");
    info!(
        "Scene: {}x{} grid @ {}px, {} items, mode {}, objective {}",
        scene.grid.columns,
        scene.grid.rows,
        scene.grid.block_size,
        scene.items().len(),
        opts.mode,
        opts.objective
    );

    let report = optimize_layout(&scene, &opts)?;
    let layout = report.layout();

    println!("status: {:?}", report.status);
    println!("attempts: {}", report.attempts.len());
    println!("selection objective: {:.4}", report.selection_objective);
    println!("placement objective: {:.4}", report.objective());
    for record in &layout {
        println!(
            "{:<16} level {} -> col {}, row {}",
            record.name, record.level, record.position[0], record.position[1]
        );
    }

    if report.status == LayoutStatus::Exhausted {
        warn!("No feasible layout; nothing written");
        std::process::exit(2);
    }

    if args.no_write {
        return Ok(());
    }
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.solver.output_dir));
    if args.format.writes_json() {
        let path = export_layout_json(&layout, Some(&output_dir))?;
        info!("Layout saved to: {}", path.display());
    }
    if args.format.writes_csv() {
        let path = export_layout_csv(&layout, Some(&output_dir))?;
        info!("Layout saved to: {}", path.display());
    }

    Ok(())
}
