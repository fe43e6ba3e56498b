/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::input::{Action, InputSnapshot};
use sim::event::GameEvent;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::{
    InputState, KEYS_DOWN, KEYS_EXIT, KEYS_INTERACT, KEYS_LEFT, KEYS_RIGHT, KEYS_SHOOT, KEYS_UP,
};
use ui::renderer::Renderer;

/// Log file path override.
const LOG_ENV: &str = "BLASTER_LOG";
const DEFAULT_LOG_FILE: &str = "blaster.log";

fn main() -> ExitCode {
    init_tracing();

    let config = GameConfig::load();
    let mut world = WorldState::new(config.display.viewport);
    let mut renderer = Renderer::new(config.display.cell);

    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        error!(error = %e, "terminal init failed");
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }
    info!(
        viewport_w = config.display.viewport.width,
        viewport_h = config.display.viewport.height,
        release_events = renderer.reports_release(),
        "session started"
    );

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        error!(error = %e, "terminal cleanup failed");
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) => {
            info!(frames = world.frame, "session ended");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "game loop failed");
            eprintln!("Game error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// The terminal belongs to the renderer, so logs go to a file.
/// If the file can't be created they are dropped.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let path = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let sink: Box<dyn Write + Send> = match File::create(&path) {
        Ok(file) => Box::new(file),
        Err(_) => Box::new(io::sink()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(sink))
        .init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.reports_release();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_requested() || gp.quit_pressed() {
            info!(frame = world.frame, "quit requested");
            break;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let input = frame_input(&kb, &gp);
        let events = step::step(world, &input, dt);
        log_events(world.frame, &events);

        renderer.render(world)?;
        std::thread::sleep(config.timing.frame_sleep);
    }

    Ok(())
}

/// Movement and shoot are held; interact and exit fire once per press.
fn frame_input(kb: &InputState, gp: &GamepadState) -> InputSnapshot {
    let held = |keys| kb.any_held(keys) || kb.any_pressed(keys);
    Action::ALL.iter().fold(InputSnapshot::empty(), |snap, &action| {
        let down = match action {
            Action::MoveLeft => held(KEYS_LEFT) || gp.left_held(),
            Action::MoveRight => held(KEYS_RIGHT) || gp.right_held(),
            Action::MoveUp => held(KEYS_UP) || gp.up_held(),
            Action::MoveDown => held(KEYS_DOWN) || gp.down_held(),
            Action::Shoot => held(KEYS_SHOOT) || gp.shoot_held(),
            Action::Interact => kb.any_pressed(KEYS_INTERACT) || gp.interact_pressed(),
            Action::Exit => kb.any_pressed(KEYS_EXIT) || gp.exit_pressed(),
        };
        snap.with_action(action, down)
    })
}

fn log_events(frame: u64, events: &[GameEvent]) {
    for ev in events {
        debug!(frame, event = ?ev, "step event");
    }
}
