use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use meshvibe::cli::Args;
use meshvibe::color::palette_names;
use meshvibe::config::Config;
use meshvibe::display::{self, DisplayMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so it stays out of snapshot/terminal output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meshvibe=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    if args.list_palettes {
        for name in palette_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    // Load config: explicit path, then XDG default, then built-in defaults
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args)?;

    info!(
        "Starting meshvibe in {:?} mode (seed={}, palette={}, animation={})",
        config.display.mode, config.mesh.seed, config.mesh.palette, config.mesh.animation
    );

    match config.display.mode {
        DisplayMode::Terminal => display::terminal::run(config).await?,
        DisplayMode::Snapshot => display::snapshot::run(config)?,
        DisplayMode::Headless => {
            display::headless::run(config).await?;
        }
    }

    Ok(())
}
