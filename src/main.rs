//! # Tombs Headless Driver
//!
//! Starts or loads a game, optionally lets the autopilot play it for a number
//! of turns, prints the resulting screen as ASCII and optionally saves.

use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use tombs::{
    AsciiDisplay, AutoexploreState, GameState, GenerationConfig, NoTarget, TombsError,
    TombsResult,
};

/// Command line arguments for the Tombs driver.
#[derive(Parser, Debug)]
#[command(name = "tombs")]
#[command(about = "Headless driver for the Tombs dungeon-crawler engine")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// JSON file with generation settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns the autopilot plays before printing
    #[arg(short, long, default_value_t = 0)]
    turns: u32,

    /// Write the final state to this save file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Continue from this save file instead of starting a new game
    #[arg(long)]
    load: Option<PathBuf>,
}

fn main() -> TombsResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level)?;
    info!("Starting Tombs v{}", tombs::VERSION);

    let mut game = match &args.load {
        Some(path) => GameState::load_from_file(path)?,
        None => GameState::new_game(load_config(&args)?)?,
    };

    autoplay(&mut game, args.turns)?;
    println!("{}", AsciiDisplay::new().render(&game.render_snapshot()?));

    if let Some(path) = &args.save {
        game.save_to_file(path)?;
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> TombsResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(log_level)
            .map_err(|e| TombsError::InvalidState(format!("Bad log level: {}", e)))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|e| TombsError::InvalidState(format!("Logging already set up: {}", e)))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .try_init()
            .map_err(|e| TombsError::InvalidState(format!("Logging already set up: {}", e)))?;
    }

    Ok(())
}

fn load_config(args: &Args) -> TombsResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::new(rand::random()),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!("Using seed {}", config.seed);
    Ok(config)
}

/// Lets the autopilot submit up to `turns` intents.
fn autoplay(game: &mut GameState, turns: u32) -> TombsResult<()> {
    #[cfg(feature = "dev-tools")]
    let _span = tracing::info_span!("autoplay", turns).entered();

    let mut autopilot = AutoexploreState::new();
    for _ in 0..turns {
        let Some(intent) = autopilot.next_intent(game)? else {
            break;
        };
        let outcome = game.submit_intent(intent, &mut NoTarget)?;
        if outcome.game_over {
            warn!("The autopilot died on depth {}", game.depth);
            break;
        }
    }
    info!(
        "Autoplay stopped on depth {} after {} turns",
        game.depth, game.turn_number
    );
    Ok(())
}
