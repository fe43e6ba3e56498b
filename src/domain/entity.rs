/// Entities: the three actor kinds, projectiles, particles, the door
/// trigger and the (empty) enemy scaffold.
///
/// Actors share one struct. Everything that differs per kind lives either
/// in the `ActorKind` payload (per-instance state such as facing or the
/// cannon angle) or in the static `KindProfile` table (tuning constants).
/// The physics rule comes from the arena, not the kind.

use std::f32::consts::{FRAC_PI_3, PI};

use rand::Rng;

use super::physics::Rect;

// ── Projectiles / particles ──

pub const PROJECTILE_SIZE: f32 = 4.0;
pub const PROJECTILE_LIFETIME: f32 = 3.0;
/// Projectiles leaving this absolute rectangle are despawned.
pub const PROJECTILE_WORLD: Rect = Rect::new(0.0, 0.0, 2000.0, 1000.0);

pub const PARTICLE_SIZE: f32 = 3.0;
pub const PARTICLE_LIFETIME: f32 = 1.0;
/// Particle velocity is uniform in [-SPREAD, SPREAD) on both axes.
pub const PARTICLE_SPREAD: f32 = 50.0;

// ── Vehicle cannon ──

pub const CANNON_LIMIT: f32 = FRAC_PI_3; // ±60°
pub const CANNON_STEP: f32 = 0.1;

/// Binary facing for side-scroll actors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Four-way facing for the overhead actor.
/// Discriminants are the 0..=3 encoding: up, right, down, left.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Heading {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Heading {
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Unit vector in screen space (y down).
    pub fn unit(self) -> (f32, f32) {
        match self {
            Heading::Up => (0.0, -1.0),
            Heading::Right => (1.0, 0.0),
            Heading::Down => (0.0, 1.0),
            Heading::Left => (-1.0, 0.0),
        }
    }
}

/// Per-kind constants.
#[derive(Clone, Copy, Debug)]
pub struct KindProfile {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: i32,
    pub shoot_cooldown: f32,
    pub projectile_speed: f32,
    pub projectile: ProjectileKind,
}

const PLATFORMER: KindProfile = KindProfile {
    width: 12.0,
    height: 16.0,
    speed: 100.0,
    health: 100,
    shoot_cooldown: 0.2,
    projectile_speed: 200.0,
    projectile: ProjectileKind::Platformer,
};

const VEHICLE: KindProfile = KindProfile {
    width: 24.0,
    height: 20.0,
    speed: 80.0,
    health: 200,
    shoot_cooldown: 0.3,
    projectile_speed: 300.0,
    projectile: ProjectileKind::Vehicle,
};

const ROAMER: KindProfile = KindProfile {
    width: 12.0,
    height: 12.0,
    speed: 120.0,
    health: 100,
    shoot_cooldown: 0.25,
    projectile_speed: 250.0,
    projectile: ProjectileKind::Roamer,
};

/// Initial upward speed of a platformer jump.
pub const JUMP_POWER: f32 = 200.0;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ActorKind {
    Platformer { facing: Facing, on_ground: bool },
    Vehicle { facing: Facing, on_ground: bool, cannon_angle: f32 },
    Roamer { heading: Heading },
}

impl ActorKind {
    pub fn profile(&self) -> &'static KindProfile {
        match self {
            ActorKind::Platformer { .. } => &PLATFORMER,
            ActorKind::Vehicle { .. } => &VEHICLE,
            ActorKind::Roamer { .. } => &ROAMER,
        }
    }

    /// Record ground contact. No-op for kinds without a ground.
    pub fn set_on_ground(&mut self, grounded: bool) {
        match self {
            ActorKind::Platformer { on_ground, .. } | ActorKind::Vehicle { on_ground, .. } => {
                *on_ground = grounded;
            }
            ActorKind::Roamer { .. } => {}
        }
    }
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub speed: f32,
    pub shoot_cooldown: f32,
    pub kind: ActorKind,
}

impl Actor {
    fn from_kind(x: f32, y: f32, kind: ActorKind) -> Self {
        let p = kind.profile();
        Actor {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width: p.width,
            height: p.height,
            health: p.health,
            speed: p.speed,
            shoot_cooldown: 0.0,
            kind,
        }
    }

    pub fn platformer(x: f32, y: f32) -> Self {
        Self::from_kind(x, y, ActorKind::Platformer { facing: Facing::Right, on_ground: false })
    }

    pub fn vehicle(x: f32, y: f32) -> Self {
        Self::from_kind(
            x,
            y,
            ActorKind::Vehicle { facing: Facing::Right, on_ground: false, cannon_angle: 0.0 },
        )
    }

    pub fn roamer(x: f32, y: f32) -> Self {
        Self::from_kind(x, y, ActorKind::Roamer { heading: Heading::Up })
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }

    pub fn teleport(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn facing(&self) -> Option<Facing> {
        match self.kind {
            ActorKind::Platformer { facing, .. } | ActorKind::Vehicle { facing, .. } => Some(facing),
            ActorKind::Roamer { .. } => None,
        }
    }

    pub fn heading(&self) -> Option<Heading> {
        match self.kind {
            ActorKind::Roamer { heading } => Some(heading),
            _ => None,
        }
    }

    pub fn on_ground(&self) -> bool {
        match self.kind {
            ActorKind::Platformer { on_ground, .. } | ActorKind::Vehicle { on_ground, .. } => on_ground,
            ActorKind::Roamer { .. } => false,
        }
    }

    pub fn cannon_angle(&self) -> Option<f32> {
        match self.kind {
            ActorKind::Vehicle { cannon_angle, .. } => Some(cannon_angle),
            _ => None,
        }
    }

    // ── Movement commands ──
    //
    // Side-scroll actors: left/right set vx for this frame only.
    // Platformer up = jump, down = nothing. Vehicle up/down = aim.
    // Roamer: each command overwrites one velocity axis and the heading.

    pub fn move_left(&mut self) {
        self.steer_horizontal(Facing::Left, Heading::Left);
    }

    pub fn move_right(&mut self) {
        self.steer_horizontal(Facing::Right, Heading::Right);
    }

    pub fn move_up(&mut self) {
        let speed = self.speed;
        match &mut self.kind {
            ActorKind::Platformer { on_ground, .. } => {
                if *on_ground {
                    self.vy = -JUMP_POWER;
                    *on_ground = false;
                }
            }
            ActorKind::Vehicle { cannon_angle, .. } => {
                *cannon_angle = (*cannon_angle - CANNON_STEP).max(-CANNON_LIMIT);
            }
            ActorKind::Roamer { heading } => {
                self.vy = -speed;
                *heading = Heading::Up;
            }
        }
    }

    pub fn move_down(&mut self) {
        let speed = self.speed;
        match &mut self.kind {
            ActorKind::Platformer { .. } => {}
            ActorKind::Vehicle { cannon_angle, .. } => {
                *cannon_angle = (*cannon_angle + CANNON_STEP).min(CANNON_LIMIT);
            }
            ActorKind::Roamer { heading } => {
                self.vy = speed;
                *heading = Heading::Down;
            }
        }
    }

    fn steer_horizontal(&mut self, side: Facing, four_way: Heading) {
        self.vx = side.sign() * self.speed;
        match &mut self.kind {
            ActorKind::Platformer { facing, .. } | ActorKind::Vehicle { facing, .. } => *facing = side,
            ActorKind::Roamer { heading } => *heading = four_way,
        }
    }

    /// Zero both velocity axes before the roamer reads its input.
    pub fn halt(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
    }

    // ── Shooting ──

    /// Fire one projectile if the cooldown has run out.
    /// On cooldown: returns None and leaves the cooldown untouched.
    pub fn shoot(&mut self) -> Option<Projectile> {
        if self.shoot_cooldown > 0.0 {
            return None;
        }
        let p = self.kind.profile();
        self.shoot_cooldown = p.shoot_cooldown;

        let (cx, cy) = self.center();
        let (x, y, dx, dy) = match self.kind {
            ActorKind::Platformer { facing, .. } => {
                let muzzle_x = match facing {
                    Facing::Right => self.x + self.width,
                    Facing::Left => self.x,
                };
                (muzzle_x, self.y + self.height / 2.0, facing.sign(), 0.0)
            }
            ActorKind::Vehicle { facing, cannon_angle, .. } => {
                let angle = match facing {
                    Facing::Right => cannon_angle,
                    Facing::Left => cannon_angle + PI,
                };
                (cx, cy, angle.cos(), angle.sin())
            }
            ActorKind::Roamer { heading } => {
                let (dx, dy) = heading.unit();
                (cx, cy, dx, dy)
            }
        };

        Some(Projectile::new(
            x,
            y,
            dx * p.projectile_speed,
            dy * p.projectile_speed,
            p.projectile,
        ))
    }
}

/// Who fired a projectile. Only affects its color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProjectileKind {
    Platformer,
    Vehicle,
    Roamer,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub kind: ProjectileKind,
    pub lifetime: f32,
    pub active: bool,
}

impl Projectile {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, kind: ProjectileKind) -> Self {
        Projectile { x, y, vx, vy, kind, lifetime: PROJECTILE_LIFETIME, active: true }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PROJECTILE_SIZE, PROJECTILE_SIZE)
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub active: bool,
}

impl Particle {
    /// Spawn at (x, y) with a random drift.
    pub fn spawn<R: Rng + ?Sized>(x: f32, y: f32, rng: &mut R) -> Self {
        Particle {
            x,
            y,
            vx: rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            vy: rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            lifetime: PARTICLE_LIFETIME,
            max_lifetime: PARTICLE_LIFETIME,
            active: true,
        }
    }

    /// Remaining life as a fraction: 1.0 fresh, 0.0 expired.
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }
}

/// Door into the dungeon. Purely geometric.
#[derive(Clone, Copy, Debug)]
pub struct DoorTrigger {
    pub area: Rect,
}

impl DoorTrigger {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        DoorTrigger { area: Rect::new(x, y, w, h) }
    }
}

/// Enemy scaffold: a collidable box with health. Nothing spawns these yet.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub area: Rect,
    pub health: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grounded_platformer() -> Actor {
        let mut a = Actor::platformer(100.0, 384.0);
        a.kind.set_on_ground(true);
        a
    }

    // ── Construction ──

    #[test]
    fn kinds_take_profile_dimensions() {
        let p = Actor::platformer(0.0, 0.0);
        let v = Actor::vehicle(0.0, 0.0);
        let r = Actor::roamer(0.0, 0.0);
        assert_eq!((p.width, p.height, p.health), (12.0, 16.0, 100));
        assert_eq!((v.width, v.height, v.health), (24.0, 20.0, 200));
        assert_eq!((r.width, r.height, r.health), (12.0, 12.0, 100));
        assert_eq!(r.heading(), Some(Heading::Up));
        assert_eq!(p.facing(), Some(Facing::Right));
    }

    // ── Jump ──

    #[test]
    fn jump_only_from_ground() {
        let mut a = Actor::platformer(0.0, 0.0);
        a.move_up();
        assert_eq!(a.vy, 0.0);

        let mut a = grounded_platformer();
        a.move_up();
        assert_eq!(a.vy, -JUMP_POWER);
        assert!(!a.on_ground());
    }

    #[test]
    fn no_double_jump() {
        let mut a = grounded_platformer();
        a.move_up();
        a.vy = -50.0;
        a.move_up();
        assert_eq!(a.vy, -50.0);
    }

    #[test]
    fn platformer_down_is_inert() {
        let mut a = grounded_platformer();
        a.move_down();
        assert_eq!((a.vx, a.vy), (0.0, 0.0));
        assert!(a.on_ground());
    }

    // ── Facing ──

    #[test]
    fn horizontal_commands_set_facing_and_speed() {
        let mut a = Actor::vehicle(0.0, 0.0);
        a.move_left();
        assert_eq!(a.vx, -80.0);
        assert_eq!(a.facing(), Some(Facing::Left));
        a.move_right();
        assert_eq!(a.vx, 80.0);
        assert_eq!(a.facing(), Some(Facing::Right));
    }

    // ── Cannon ──

    #[test]
    fn cannon_angle_clamps_at_sixty_degrees() {
        let mut v = Actor::vehicle(0.0, 0.0);
        for _ in 0..50 {
            v.move_up();
        }
        assert_eq!(v.cannon_angle(), Some(-CANNON_LIMIT));
        for _ in 0..100 {
            v.move_down();
        }
        assert_eq!(v.cannon_angle(), Some(CANNON_LIMIT));
    }

    #[test]
    fn cannon_aim_does_not_touch_velocity() {
        let mut v = Actor::vehicle(0.0, 0.0);
        v.move_up();
        assert_eq!((v.vx, v.vy), (0.0, 0.0));
        assert!((v.cannon_angle().unwrap() + CANNON_STEP).abs() < 1e-6);
    }

    // ── Roamer steering ──

    #[test]
    fn roamer_last_direction_wins_heading() {
        let mut r = Actor::roamer(100.0, 100.0);
        r.halt();
        r.move_left();
        r.move_right();
        r.move_up();
        r.move_down();
        assert_eq!(r.heading(), Some(Heading::Down));
        assert_eq!((r.vx, r.vy), (120.0, 120.0));
    }

    #[test]
    fn roamer_diagonal_keeps_both_axes() {
        let mut r = Actor::roamer(100.0, 100.0);
        r.halt();
        r.move_left();
        r.move_up();
        assert_eq!((r.vx, r.vy), (-120.0, -120.0));
        assert_eq!(r.heading(), Some(Heading::Up));
    }

    // ── Shooting ──

    #[test]
    fn platformer_shot_leaves_from_leading_edge() {
        let mut a = Actor::platformer(100.0, 200.0);
        let b = a.shoot().expect("shot");
        assert_eq!((b.x, b.y), (112.0, 208.0));
        assert_eq!((b.vx, b.vy), (200.0, 0.0));
        assert_eq!(b.kind, ProjectileKind::Platformer);
        assert_eq!(a.shoot_cooldown, 0.2);

        let mut a = Actor::platformer(100.0, 200.0);
        a.move_left();
        let b = a.shoot().expect("shot");
        assert_eq!(b.x, 100.0);
        assert_eq!(b.vx, -200.0);
    }

    #[test]
    fn shooting_on_cooldown_is_a_noop() {
        let mut a = Actor::roamer(100.0, 100.0);
        assert!(a.shoot().is_some());
        a.shoot_cooldown = 0.1;
        assert!(a.shoot().is_none());
        assert_eq!(a.shoot_cooldown, 0.1);
    }

    #[test]
    fn vehicle_shot_follows_cannon() {
        let mut v = Actor::vehicle(100.0, 380.0);
        let b = v.shoot().expect("shot");
        assert_eq!((b.x, b.y), (112.0, 390.0));
        assert!((b.vx - 300.0).abs() < 1e-3);
        assert!(b.vy.abs() < 1e-3);
        assert_eq!(v.shoot_cooldown, 0.3);

        let mut v = Actor::vehicle(100.0, 380.0);
        v.move_left();
        v.move_up();
        let b = v.shoot().expect("shot");
        // Mirrored: angle = -0.1 + π → pointing left and slightly down.
        assert!(b.vx < -290.0);
        assert!(b.vy > 0.0);
        let speed = (b.vx * b.vx + b.vy * b.vy).sqrt();
        assert!((speed - 300.0).abs() < 1e-2);
    }

    #[test]
    fn roamer_shot_uses_heading() {
        let mut r = Actor::roamer(100.0, 100.0);
        r.move_left();
        let b = r.shoot().expect("shot");
        assert_eq!((b.x, b.y), (106.0, 106.0));
        assert_eq!((b.vx, b.vy), (-250.0, 0.0));
        assert_eq!(r.shoot_cooldown, 0.25);
        assert_eq!(b.kind, ProjectileKind::Roamer);
    }

    #[test]
    fn projectile_starts_active_with_full_life() {
        let b = Projectile::new(1.0, 2.0, 3.0, 4.0, ProjectileKind::Vehicle);
        assert!(b.active);
        assert_eq!(b.lifetime, PROJECTILE_LIFETIME);
        assert_eq!(b.bounds(), Rect::new(1.0, 2.0, 4.0, 4.0));
    }

    // ── Particles ──

    #[test]
    fn particle_velocity_within_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = Particle::spawn(10.0, 10.0, &mut rng);
            assert!((-PARTICLE_SPREAD..PARTICLE_SPREAD).contains(&p.vx));
            assert!((-PARTICLE_SPREAD..PARTICLE_SPREAD).contains(&p.vy));
            assert_eq!(p.lifetime, PARTICLE_LIFETIME);
            assert!(p.active);
        }
    }

    #[test]
    fn particle_alpha_tracks_remaining_life() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = Particle::spawn(0.0, 0.0, &mut rng);
        assert_eq!(p.alpha(), 1.0);
        p.lifetime = 0.25;
        assert_eq!(p.alpha(), 0.25);
        p.lifetime = -0.1;
        assert_eq!(p.alpha(), 0.0);
    }
}
