/// Actor physics: the arena picks the integration rule.
///
/// ## Side (platformer actor, vehicle)
///
///   1. vy += GRAVITY * dt
///   2. position += velocity * dt
///   3. bottom edge past the ground height → snap, vy = 0, on_ground
///      otherwise on_ground cleared
///   4. x clamped to [0, level width − actor width]
///   5. vx = 0 (movement is re-issued every frame, no momentum)
///
/// ## Room (overhead actor)
///
///   1. position += velocity * dt (velocity was derived from input)
///   2. clamp to the room interior, inset by the wall thickness
///
/// All actors then tick their shoot cooldown down, floored at zero.
///
/// Rectangles use a top-left origin with y growing downward.

use super::entity::Actor;

/// Downward acceleration for grounded actors, px/s².
pub const GRAVITY: f32 = 500.0;

/// Axis-aligned rectangle, top-left origin.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict overlap on both axes: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// What an actor collides against. Built from the active level.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Arena {
    /// Flat ground plane with horizontal level edges.
    Side { ground_y: f32, width: f32 },
    /// Walled room; `wall` is the inset on every side.
    Room { width: f32, height: f32, wall: f32 },
}

/// Advance one actor by `dt` seconds against `arena`.
/// A zero `dt` only re-applies the arena's clamps.
pub fn integrate(actor: &mut Actor, dt: f32, arena: Arena) {
    match arena {
        Arena::Side { ground_y, width } => integrate_side(actor, dt, ground_y, width),
        Arena::Room { width, height, wall } => integrate_room(actor, dt, width, height, wall),
    }
    actor.shoot_cooldown = (actor.shoot_cooldown - dt).max(0.0);
}

fn integrate_side(actor: &mut Actor, dt: f32, ground_y: f32, width: f32) {
    actor.vy += GRAVITY * dt;
    actor.x += actor.vx * dt;
    actor.y += actor.vy * dt;

    let grounded = actor.y + actor.height > ground_y;
    if grounded {
        actor.y = ground_y - actor.height;
        actor.vy = 0.0;
    }
    actor.kind.set_on_ground(grounded);
    actor.x = clamp_low_wins(actor.x, 0.0, width - actor.width);

    actor.vx = 0.0;
}

fn integrate_room(actor: &mut Actor, dt: f32, width: f32, height: f32, wall: f32) {
    actor.x += actor.vx * dt;
    actor.y += actor.vy * dt;
    actor.x = clamp_low_wins(actor.x, wall, width - wall - actor.width);
    actor.y = clamp_low_wins(actor.y, wall, height - wall - actor.height);
}

/// `max(lo, min(v, hi))`. Unlike `f32::clamp` this never panics when the
/// range is inverted; the lower bound wins.
#[inline]
pub fn clamp_low_wins(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Actor, ActorKind};

    const SIDE: Arena = Arena::Side { ground_y: 400.0, width: 1024.0 };
    const ROOM: Arena = Arena::Room { width: 400.0, height: 300.0, wall: 20.0 };

    // ── Rect ──

    #[test]
    fn overlap_requires_both_axes() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(5.0, 20.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.0, 9.0, 1.0, 1.0);
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // ── Side ──

    #[test]
    fn gravity_accumulates_in_the_air() {
        let mut p = Actor::platformer(50.0, 100.0);
        integrate(&mut p, 0.1, SIDE);
        assert!((p.vy - 50.0).abs() < 1e-4);
        assert!((p.y - 105.0).abs() < 1e-4);
        assert!(!p.on_ground());
    }

    #[test]
    fn landing_snaps_to_ground_and_sets_flag() {
        let mut p = Actor::platformer(50.0, 380.0);
        p.vy = 300.0;
        integrate(&mut p, 0.1, SIDE);
        assert_eq!(p.y, 400.0 - p.height);
        assert_eq!(p.vy, 0.0);
        assert!(p.on_ground());
    }

    #[test]
    fn resting_on_ground_stays_grounded_each_frame() {
        let mut p = Actor::platformer(50.0, 384.0);
        for _ in 0..10 {
            integrate(&mut p, 1.0 / 60.0, SIDE);
            assert!(p.on_ground());
            assert_eq!(p.y, 384.0);
        }
    }

    #[test]
    fn horizontal_velocity_is_cleared_after_update() {
        let mut p = Actor::platformer(50.0, 384.0);
        p.move_right();
        integrate(&mut p, 0.1, SIDE);
        assert!((p.x - 60.0).abs() < 1e-4);
        assert_eq!(p.vx, 0.0);
        integrate(&mut p, 0.1, SIDE);
        assert!((p.x - 60.0).abs() < 1e-4);
    }

    #[test]
    fn level_edges_clamp_x() {
        let mut p = Actor::platformer(2.0, 384.0);
        p.move_left();
        integrate(&mut p, 1.0, SIDE);
        assert_eq!(p.x, 0.0);

        let mut v = Actor::vehicle(1000.0, 380.0);
        v.move_right();
        integrate(&mut v, 1.0, SIDE);
        assert_eq!(v.x, 1024.0 - v.width);
    }

    #[test]
    fn zero_dt_is_stable() {
        let mut p = Actor::platformer(50.0, 100.0);
        p.vy = 40.0;
        p.shoot_cooldown = 0.1;
        integrate(&mut p, 0.0, SIDE);
        assert_eq!((p.x, p.y, p.vy), (50.0, 100.0, 40.0));
        assert_eq!(p.shoot_cooldown, 0.1);
    }

    // ── Room ──

    #[test]
    fn free_actor_ignores_gravity() {
        let mut r = Actor::roamer(100.0, 100.0);
        integrate(&mut r, 0.5, ROOM);
        assert_eq!((r.x, r.y), (100.0, 100.0));
        assert_eq!(r.vy, 0.0);
    }

    #[test]
    fn free_actor_is_clamped_to_room_interior() {
        let mut r = Actor::roamer(30.0, 30.0);
        r.vx = -1000.0;
        r.vy = -1000.0;
        integrate(&mut r, 1.0, ROOM);
        assert_eq!((r.x, r.y), (20.0, 20.0));

        r.vx = 1000.0;
        r.vy = 1000.0;
        integrate(&mut r, 1.0, ROOM);
        assert_eq!(r.x, 400.0 - 20.0 - r.width);
        assert_eq!(r.y, 300.0 - 20.0 - r.height);
    }

    #[test]
    fn free_actor_keeps_velocity_until_input_resets_it() {
        let mut r = Actor::roamer(100.0, 100.0);
        r.vx = 120.0;
        integrate(&mut r, 0.1, ROOM);
        assert_eq!(r.vx, 120.0);
    }

    #[test]
    fn zero_dt_pulls_actor_back_into_room() {
        let mut r = Actor::roamer(200.0, 280.0);
        integrate(&mut r, 0.0, ROOM);
        assert_eq!((r.x, r.y), (200.0, 300.0 - 20.0 - r.height));
    }

    // ── Cooldown ──

    #[test]
    fn cooldown_floors_at_zero() {
        let mut r = Actor::roamer(100.0, 100.0);
        r.shoot_cooldown = 0.05;
        integrate(&mut r, 0.1, ROOM);
        assert_eq!(r.shoot_cooldown, 0.0);
    }

    #[test]
    fn clamp_low_wins_on_inverted_range() {
        assert_eq!(clamp_low_wins(50.0, 0.0, -112.0), 0.0);
        assert_eq!(clamp_low_wins(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_low_wins(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
    }

    #[test]
    fn vehicle_kind_reports_ground_contact() {
        let mut v = Actor::vehicle(100.0, 350.0);
        assert!(matches!(v.kind, ActorKind::Vehicle { .. }));
        for _ in 0..120 {
            integrate(&mut v, 1.0 / 60.0, SIDE);
        }
        assert!(v.on_ground());
        assert_eq!(v.y, 400.0 - v.height);
    }
}
