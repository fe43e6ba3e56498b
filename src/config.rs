/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or
/// `~/.local/share/blaster` (first match wins).
/// Falls back to defaults if the file is missing, incomplete or malformed.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::sim::world::Viewport;
use crate::ui::draw::CellScale;

pub const CONFIG_FILE: &str = "config.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub viewport: Viewport,
    pub cell: CellScale,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    pub frame_sleep: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub shoot: Vec<String>,
    pub interact: Vec<String>,
    pub exit: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid config: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_viewport_width")]
    viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    viewport_height: u32,
    #[serde(default = "default_cell_px_w")]
    cell_px_w: u32,
    #[serde(default = "default_cell_px_h")]
    cell_px_h: u32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_shoot")]
    shoot: Vec<String>,
    #[serde(default = "default_interact")]
    interact: Vec<String>,
    #[serde(default = "default_exit")]
    exit: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

fn default_viewport_width() -> u32 { 512 }
fn default_viewport_height() -> u32 { 480 }
fn default_cell_px_w() -> u32 { 8 }
fn default_cell_px_h() -> u32 { 16 }
fn default_frame_sleep() -> u64 { 5 }

fn default_shoot() -> Vec<String> { vec!["A".into(), "R1".into()] }
fn default_interact() -> Vec<String> { vec!["Y".into()] }
fn default_exit() -> Vec<String> { vec!["B".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            cell_px_w: default_cell_px_w(),
            cell_px_h: default_cell_px_h(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { frame_sleep_ms: default_frame_sleep() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            shoot: default_shoot(),
            interact: default_interact(),
            exit: default_exit(),
            quit: default_quit(),
        }
    }
}

/// Zero sizes would divide by zero in the cell mapping.
fn at_least_one(v: u32, name: &str) -> f32 {
    if v == 0 {
        warn!(key = name, "zero is not allowed here, using 1");
        1.0
    } else {
        v as f32
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        let d = t.display;
        GameConfig {
            display: DisplayConfig {
                viewport: Viewport {
                    width: at_least_one(d.viewport_width, "display.viewport_width"),
                    height: at_least_one(d.viewport_height, "display.viewport_height"),
                },
                cell: CellScale {
                    px_w: at_least_one(d.cell_px_w, "display.cell_px_w"),
                    px_h: at_least_one(d.cell_px_h, "display.cell_px_h"),
                },
            },
            timing: TimingConfig {
                frame_sleep: Duration::from_millis(t.timing.frame_sleep_ms),
            },
            gamepad: GamepadConfig {
                shoot: t.gamepad.shoot,
                interact: t.gamepad.interact,
                exit: t.gamepad.exit,
                quit: t.gamepad.quit,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from the first `config.toml` found in the candidate dirs.
    /// Problems are logged and answered with defaults.
    pub fn load() -> Self {
        Self::load_from(&candidate_dirs())
    }

    pub fn load_from(search_dirs: &[PathBuf]) -> Self {
        match find_config(search_dirs) {
            Some(path) => match Self::from_file(&path) {
                Ok(cfg) => {
                    info!(path = %path.display(), "loaded config");
                    cfg
                }
                Err(e) => {
                    warn!(error = %e, "using default settings");
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str::<TomlConfig>(&text)
            .map(GameConfig::from)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

fn find_config(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|d| d.join(CONFIG_FILE))
        .find(|p| p.is_file())
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/blaster)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/blaster");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
