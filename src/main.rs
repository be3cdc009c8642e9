use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{Difficulty, GameConfig};
use grid_snake::modes::PlayMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "grid_snake")]
#[command(version, about = "Terminal snake with levels, obstacles and a two-player mode")]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game speed and amount of random obstacles
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Level a new game starts at
    #[arg(long)]
    level: Option<u32>,

    /// Name of player one
    #[arg(long)]
    player1: Option<String>,

    /// Name of player two
    #[arg(long)]
    player2: Option<String>,

    /// Character player one's snake is drawn with
    #[arg(long)]
    glyph: Option<char>,

    /// Turn off the bell when food is eaten
    #[arg(long)]
    no_sound: bool,

    /// Start each new level with the previous level's score
    #[arg(long)]
    carry_score: bool,

    /// Seed for obstacle and food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is busy with the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(level) = self.level {
            config.start_level = level;
        }
        if let Some(name) = &self.player1 {
            config.player1_name = name.clone();
        }
        if let Some(name) = &self.player2 {
            config.player2_name = name.clone();
        }
        if let Some(glyph) = self.glyph {
            config.snake_glyph = glyph;
        }
        if self.no_sound {
            config.sound = false;
        }
        if self.carry_score {
            config.carry_score = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;
    tracing::info!(?config, "starting");

    let mut play_mode = PlayMode::new(&config);
    play_mode.run().await?;

    let high_score = play_mode.session().context().high_score;
    println!("Thanks for playing! Session high score: {high_score}");

    Ok(())
}
