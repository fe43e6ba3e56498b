/// WorldState: the complete snapshot of a running game.
///
/// ## Ownership
///
/// The world owns every actor and both levels for the whole session:
///   - `player`, `vehicle`: side-scroll actors, one of them possessed
///   - `roamer`: the overhead dungeon actor
///   - `side`, `room`: level geometry, never rebuilt
///   - `projectiles`, `particles`: pooled transients
///
/// Actors that are not active keep their state untouched (position,
/// velocity, cooldown) until control returns to them.
///
/// ## Camera / Viewport
///
/// World coordinates are pixels. The camera is the world position of the
/// viewport's top-left corner:
///   - `screen(sx, sy) = world(camera.x + sx, camera.y + sy)`
///   - The camera eases toward the active actor by a fixed fraction per
///     frame and is clamped into the active level.
///   - Levels smaller than the viewport pin the camera at 0.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::entity::{Actor, DoorTrigger, Enemy, Particle, Projectile};
use crate::domain::physics::{clamp_low_wins, Arena};
use super::level::{LevelGeometry, OverheadRoom, SideScrollLevel};
use super::lifecycle::Pool;
use super::mode::{Mode, Possession};

pub const PLAYER_START: (f32, f32) = (50.0, 350.0);
pub const VEHICLE_START: (f32, f32) = (100.0, 350.0);
pub const ROAMER_START: (f32, f32) = (200.0, 150.0);
pub const DOOR_AREA: (f32, f32, f32, f32) = (900.0, 350.0, 24.0, 32.0);

/// Fraction of the remaining distance the camera covers each frame.
pub const CAMERA_SMOOTHING: f32 = 0.1;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 512.0, height: 480.0 }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    /// Ease toward centering `target` (a world point) and clamp into the
    /// level. Frame-based, not scaled by dt.
    pub fn follow(&mut self, target: (f32, f32), view: Viewport, level: (f32, f32)) {
        let tx = target.0 - view.width / 2.0;
        let ty = target.1 - view.height / 2.0;

        self.x += (tx - self.x) * CAMERA_SMOOTHING;
        self.y += (ty - self.y) * CAMERA_SMOOTHING;

        self.x = clamp_low_wins(self.x, 0.0, level.0 - view.width);
        self.y = clamp_low_wins(self.y, 0.0, level.1 - view.height);
    }
}

pub struct WorldState {
    pub mode: Mode,
    pub player: Actor,
    pub vehicle: Actor,
    pub roamer: Actor,
    pub side: SideScrollLevel,
    pub room: OverheadRoom,
    pub door: DoorTrigger,
    /// Always empty; the collision pass runs against it anyway.
    pub enemies: Vec<Enemy>,
    pub projectiles: Pool<Projectile>,
    pub particles: Pool<Particle>,
    pub camera: Camera,
    pub viewport: Viewport,
    pub frame: u64,
    pub rng: StdRng,
}

impl WorldState {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_rng(viewport, StdRng::from_entropy())
    }

    /// Deterministic particle drift.
    #[cfg(test)]
    pub fn with_seed(viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(viewport: Viewport, rng: StdRng) -> Self {
        let (dx, dy, dw, dh) = DOOR_AREA;
        WorldState {
            mode: Mode::Platforming(Possession::Player),
            player: Actor::platformer(PLAYER_START.0, PLAYER_START.1),
            vehicle: Actor::vehicle(VEHICLE_START.0, VEHICLE_START.1),
            roamer: Actor::roamer(ROAMER_START.0, ROAMER_START.1),
            side: SideScrollLevel::new(),
            room: OverheadRoom::new(),
            door: DoorTrigger::new(dx, dy, dw, dh),
            enemies: Vec::new(),
            projectiles: Pool::new(),
            particles: Pool::new(),
            camera: Camera::default(),
            viewport,
            frame: 0,
            rng,
        }
    }

    pub fn active_actor(&self) -> &Actor {
        match self.mode {
            Mode::Platforming(Possession::Player) => &self.player,
            Mode::Platforming(Possession::Vehicle) => &self.vehicle,
            Mode::Dungeon => &self.roamer,
        }
    }

    pub fn active_actor_mut(&mut self) -> &mut Actor {
        match self.mode {
            Mode::Platforming(Possession::Player) => &mut self.player,
            Mode::Platforming(Possession::Vehicle) => &mut self.vehicle,
            Mode::Dungeon => &mut self.roamer,
        }
    }

    pub fn active_level(&self) -> &dyn LevelGeometry {
        match self.mode {
            Mode::Platforming(_) => &self.side,
            Mode::Dungeon => &self.room,
        }
    }

    pub fn active_arena(&self) -> Arena {
        self.active_level().arena()
    }

    pub fn clear_transients(&mut self) {
        self.projectiles.clear();
        self.particles.clear();
    }
}
