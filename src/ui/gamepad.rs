/// Gamepad input through gilrs.
///
/// The d-pad is tracked as ordinary buttons; the left stick is kept as raw
/// axis values and read as a direction past `STICK_DEADZONE`.
/// Action buttons come from the `[gamepad]` config section:
///   shoot     A, R1   (held)
///   interact  Y       (board / leave the tank)
///   exit      B       (leave the dungeon)
///   quit      Select
///
/// Without the `gamepad` feature the state never changes.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, EventType, Gilrs};

use tracing::warn;

use crate::config::GamepadConfig;

const STICK_DEADZONE: f32 = 0.25;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PadButton {
    South,
    East,
    West,
    North,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Start,
    Select,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

const BUTTON_COUNT: usize = 14;

impl PadButton {
    /// Config names. Face buttons use Xbox letters; bumpers and triggers
    /// accept both the L1/R1 and LB/RB spellings.
    fn parse(name: &str) -> Option<PadButton> {
        let b = match name.trim().to_ascii_uppercase().as_str() {
            "A" | "SOUTH" | "CROSS" => PadButton::South,
            "B" | "EAST" | "CIRCLE" => PadButton::East,
            "X" | "WEST" | "SQUARE" => PadButton::West,
            "Y" | "NORTH" | "TRIANGLE" => PadButton::North,
            "L1" | "LB" => PadButton::LeftBumper,
            "R1" | "RB" => PadButton::RightBumper,
            "L2" | "LT" => PadButton::LeftTrigger,
            "R2" | "RT" => PadButton::RightTrigger,
            "START" | "MENU" => PadButton::Start,
            "SELECT" | "BACK" | "VIEW" => PadButton::Select,
            _ => return None,
        };
        Some(b)
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: gilrs::Button) -> Option<PadButton> {
        use gilrs::Button as G;
        let b = match btn {
            G::South => PadButton::South,
            G::East => PadButton::East,
            G::West => PadButton::West,
            G::North => PadButton::North,
            G::LeftTrigger => PadButton::LeftBumper,
            G::RightTrigger => PadButton::RightBumper,
            G::LeftTrigger2 => PadButton::LeftTrigger,
            G::RightTrigger2 => PadButton::RightTrigger,
            G::Start => PadButton::Start,
            G::Select => PadButton::Select,
            G::DPadUp => PadButton::DPadUp,
            G::DPadDown => PadButton::DPadDown,
            G::DPadLeft => PadButton::DPadLeft,
            G::DPadRight => PadButton::DPadRight,
            _ => return None,
        };
        Some(b)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Which buttons trigger each configurable action.
#[derive(Debug, PartialEq)]
struct ActionMap {
    shoot: Vec<PadButton>,
    interact: Vec<PadButton>,
    exit: Vec<PadButton>,
    quit: Vec<PadButton>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            shoot: vec![PadButton::South, PadButton::RightBumper],
            interact: vec![PadButton::North],
            exit: vec![PadButton::East],
            quit: vec![PadButton::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    held: [bool; BUTTON_COUNT],
    /// Went down since the previous `update`.
    pressed: [bool; BUTTON_COUNT],
    stick: (f32, f32),
    map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: Gilrs::new().ok(),
            held: [false; BUTTON_COUNT],
            pressed: [false; BUTTON_COUNT],
            stick: (0.0, 0.0),
            map: ActionMap::default(),
        }
    }

    /// Replace action bindings from config. Unknown names are logged and
    /// skipped; an action left with no valid button keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        rebind(&mut self.map.shoot, &cfg.shoot, "shoot");
        rebind(&mut self.map.interact, &cfg.interact, "interact");
        rebind(&mut self.map.exit, &cfg.exit, "exit");
        rebind(&mut self.map.quit, &cfg.quit, "quit");
    }

    /// Poll pending gilrs events. Call once per frame.
    pub fn update(&mut self) {
        self.pressed = [false; BUTTON_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll();
    }

    #[cfg(feature = "gamepad")]
    fn poll(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };
        let events: Vec<EventType> = std::iter::from_fn(|| gilrs.next_event())
            .map(|e| e.event)
            .collect();

        for event in events {
            match event {
                EventType::ButtonPressed(b, _) => {
                    if let Some(b) = PadButton::from_gilrs(b) {
                        self.press(b);
                    }
                }
                EventType::ButtonReleased(b, _) => {
                    if let Some(b) = PadButton::from_gilrs(b) {
                        self.held[b.slot()] = false;
                    }
                }
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick.0 = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick.1 = v,
                EventType::Connected => tracing::info!("gamepad connected"),
                EventType::Disconnected => {
                    tracing::info!("gamepad disconnected");
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn press(&mut self, b: PadButton) {
        if !self.held[b.slot()] {
            self.pressed[b.slot()] = true;
        }
        self.held[b.slot()] = true;
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.held = [false; BUTTON_COUNT];
        self.pressed = [false; BUTTON_COUNT];
        self.stick = (0.0, 0.0);
    }

    // ── Queries ──

    fn any_held(&self, buttons: &[PadButton]) -> bool {
        buttons.iter().any(|b| self.held[b.slot()])
    }

    fn any_pressed(&self, buttons: &[PadButton]) -> bool {
        buttons.iter().any(|b| self.pressed[b.slot()])
    }

    pub fn shoot_held(&self) -> bool {
        self.any_held(&self.map.shoot)
    }
    pub fn interact_pressed(&self) -> bool {
        self.any_pressed(&self.map.interact)
    }
    pub fn exit_pressed(&self) -> bool {
        self.any_pressed(&self.map.exit)
    }
    pub fn quit_pressed(&self) -> bool {
        self.any_pressed(&self.map.quit)
    }

    // Stick Y is positive up in gilrs.
    pub fn up_held(&self) -> bool {
        self.held[PadButton::DPadUp.slot()] || self.stick.1 > STICK_DEADZONE
    }
    pub fn down_held(&self) -> bool {
        self.held[PadButton::DPadDown.slot()] || self.stick.1 < -STICK_DEADZONE
    }
    pub fn left_held(&self) -> bool {
        self.held[PadButton::DPadLeft.slot()] || self.stick.0 < -STICK_DEADZONE
    }
    pub fn right_held(&self) -> bool {
        self.held[PadButton::DPadRight.slot()] || self.stick.0 > STICK_DEADZONE
    }
}

fn rebind(slot: &mut Vec<PadButton>, names: &[String], action: &str) {
    let parsed: Vec<PadButton> = names.iter().filter_map(|n| PadButton::parse(n)).collect();
    if parsed.len() < names.len() {
        warn!(action, ?names, "unknown gamepad button name ignored");
    }
    if !parsed.is_empty() {
        *slot = parsed;
    }
}
