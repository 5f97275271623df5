//! LED Tetris runner (default binary).
//!
//! Plays the game in a terminal that simulates the LED matrix: every LED is a
//! block of background color. Keys drive a virtual gamepad (arrows/WASD/HJKL
//! for the stick, X/Space and Z/Y to rotate, R/Enter to restart, Q/Esc to quit).

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use log::LevelFilter;

use led_tetris::core::{GameState, PieceSpawner, TetrisApp};
use led_tetris::input::KeyboardInput;
use led_tetris::logger;
use led_tetris::term::{PixelBuffer, PixelScale, TerminalRenderer};
use led_tetris::types::{EngineConfig, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Falling-block game for small LED matrices, simulated in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Matrix width in LEDs.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u16,

    /// Matrix height in LEDs.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u16,

    /// Horizontal size of one LED (each unit is two terminal columns).
    #[arg(long, default_value_t = 1)]
    pixel_width: u16,

    /// Vertical size of one LED in terminal rows.
    #[arg(long, default_value_t = 1)]
    pixel_height: u16,

    /// Target frame rate of the main loop.
    #[arg(short, long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Seed for the piece spawner (random if omitted).
    #[arg(long)]
    seed: Option<u32>,

    /// JSON file overriding engine tuning values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where log lines are appended.
    #[arg(long, default_value = "led-tetris.log")]
    log_file: PathBuf,

    /// Rotate the log file into a single `.1` backup at this size (0 = never).
    #[arg(long, default_value_t = logger::DEFAULT_MAX_BYTES)]
    log_max_bytes: u64,

    /// Keyboard auto-repeat delay of the host OS, in milliseconds.
    #[arg(long, default_value_t = 500)]
    key_repeat_delay_ms: u32,

    /// off, error, warn, info, debug or trace.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(&args.log_file, args.log_level, args.log_max_bytes)?;

    let config = load_config(args.config.as_deref())?;
    let seed = args
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp_subsec_nanos());
    let game = GameState::new(args.width, args.height, config, PieceSpawner::new(seed))
        .context("cannot start the game")?;
    log::info!(
        "matrix {}x{}, {} fps, seed {}",
        args.width,
        args.height,
        args.fps,
        seed
    );

    let keyboard = keyboard_for(game.config(), args.key_repeat_delay_ms);
    let mut app = TetrisApp::new(keyboard, game);
    let mut term = TerminalRenderer::new(PixelScale::new(args.pixel_width, args.pixel_height));
    term.enter()?;

    let result = run(&mut term, &mut app, args.fps);

    // Turn the matrix off, then always try to restore terminal state.
    let _ = term.blank();
    let _ = term.exit();

    match &result {
        Ok(()) => log::info!("exiting with score {}", app.game().score()),
        Err(e) => log::error!("main loop failed: {:#}", e),
    }
    log::logger().flush();
    result
}

/// A keyboard whose tap moves exactly one cell and whose latent deflection
/// sits between the re-arm and movement thresholds.
fn keyboard_for(config: &EngineConfig, repeat_delay_ms: u32) -> KeyboardInput {
    let tap_frames = (1.0 / config.lateral_step).ceil() as u32;
    let action = config.move_threshold.min(config.hard_drop_threshold);
    KeyboardInput::new()
        .with_repeat_delay_ms(repeat_delay_ms)
        .with_tap_frames(tap_frames)
        .with_latent_deflection((config.rearm_threshold + action) / 2.0)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::info!("loaded engine config from {}", path.display());
    Ok(config)
}

fn run(term: &mut TerminalRenderer, app: &mut TetrisApp<KeyboardInput>, fps: u32) -> Result<()> {
    let frame = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let board = app.game().board();
    let mut fb = PixelBuffer::new(board.width(), board.height());
    let mut last_frame = Instant::now();

    while app.is_running() {
        // Input with timeout until the next frame.
        let timeout = frame
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    app.input_mut().handle_key_event(key);
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let dt = last_frame.elapsed();
        if dt < frame {
            continue;
        }
        last_frame = Instant::now();

        for button in app.input_mut().update(dt.as_millis() as u32) {
            log::trace!("{} pressed", button.as_str());
        }
        app.update(dt.as_secs_f32());
        app.render_into(&mut fb);
        term.draw(&fb)?;
    }

    Ok(())
}
