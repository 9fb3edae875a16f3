//! Snake Duel main entry point.
//!
//! Opens a raylib window and runs one match between two players sharing a
//! keyboard: W/A/S/D steer the blue snake, the arrow keys steer the red one.
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features window -- --config ./config.ini --seed 42
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};
use raylib::prelude::*;

use snakeduel::entities::gamemap::MatchOutcome;
use snakeduel::game::Game;
use snakeduel::resources::drawsurface::Viewport;
use snakeduel::resources::gameconfig::GameConfig;
use snakeduel::systems::input::{KeyBindings, poll_keyboard};
use snakeduel::systems::render::RaylibSurface;

/// Snake Duel
#[derive(Parser)]
#[command(version, about = "Two-player snake on a symmetric maze")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Fixed seed for maze generation; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using defaults");
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    info!("Maze seed {seed}");
    let mut rng = fastrand::Rng::with_seed(seed);

    let mut game = match Game::new(config.map_config(), &mut rng) {
        Ok(game) => game,
        Err(e) => {
            error!("Cannot start match: {e}");
            std::process::exit(1);
        }
    };
    game.set_time_scale(config.time_scale);

    let (width, height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(width as i32, height as i32)
        .title("Snake Duel")
        .build();
    rl.set_target_fps(config.target_fps);

    let bindings = KeyBindings::default();
    let sender = game.input_sender();
    let mut announced = false;

    while !rl.window_should_close() {
        poll_keyboard(&rl, &bindings, &sender);

        let timestamp_ms = rl.get_time() * 1000.0;
        let viewport = Viewport::new(rl.get_screen_width() as f32, rl.get_screen_height() as f32);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        let mut surface = RaylibSurface::new(&mut d);
        game.frame(timestamp_ms, &mut surface, viewport);

        let outcome = game.outcome();
        if outcome != MatchOutcome::Ongoing && !announced {
            info!("Result: {:?}", outcome);
            announced = true;
        }
    }

    game.end();
}
