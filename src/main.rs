use anyhow::{Context, Result, anyhow};
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::modes::PlayMode;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// The terminal belongs to the game, so logs only go to a file
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    config
        .validate()
        .map_err(|msg| anyhow!("Invalid configuration: {msg}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;
    let config = load_config(&cli)?;
    log::info!("starting with {:?}", config);

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let mut play_mode = PlayMode::with_engine(engine);
    play_mode.run().await?;

    log::info!("exiting");
    Ok(())
}
