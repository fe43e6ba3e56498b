/// The step function: advances the world by one frame of `dt` seconds.
///
/// Processing order:
///   1. Input dispatch for the current mode
///      - side-scroll: interact (board / leave), then left, right, up,
///        down, then shoot
///      - dungeon: velocity reset, then left, right, up, down, shoot,
///        then exit
///   2. Physics of the active actor (after any transition in 1)
///   3. Door check, on foot only
///   4. Projectile and particle lifecycle (advance, then prune)
///   5. Camera follow
///   6. Projectile-vs-enemy pass (reported, never resolved)
///
/// Projectiles fired in 1 already advance in 4 of the same frame.
/// Inactive actors get neither input nor physics; their cooldowns freeze.

use tracing::{debug, trace};

use crate::domain::entity::Particle;
use crate::domain::input::{Action, InputSnapshot};
use crate::domain::physics;
use super::collision;
use super::event::GameEvent;
use super::mode::{self, Mode, Possession};
use super::world::WorldState;

/// Particles puffed at the muzzle for every shot. Zero leaves the
/// particle pool idle.
pub const MUZZLE_PARTICLES: usize = 4;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: &InputSnapshot, dt: f32) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.frame += 1;

    match world.mode {
        Mode::Platforming(_) => handle_side_input(world, input, &mut events),
        Mode::Dungeon => handle_dungeon_input(world, input, &mut events),
    }

    update_active_actor(world, dt, &mut events);
    update_transients(world, dt);
    update_camera(world);
    check_collisions(world);

    events
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

fn handle_side_input(world: &mut WorldState, input: &InputSnapshot, events: &mut Vec<GameEvent>) {
    if input.is_down(Action::Interact) {
        mode::toggle_vehicle(world, events);
    }

    steer(world, input);

    if input.is_down(Action::Shoot) {
        fire(world, events);
    }
}

fn handle_dungeon_input(world: &mut WorldState, input: &InputSnapshot, events: &mut Vec<GameEvent>) {
    world.roamer.halt();
    steer(world, input);

    if input.is_down(Action::Shoot) {
        fire(world, events);
    }
    if input.is_down(Action::Exit) {
        mode::exit_dungeon(world, events);
    }
}

/// Directional commands in fixed order: left, right, up, down.
fn steer(world: &mut WorldState, input: &InputSnapshot) {
    let actor = world.active_actor_mut();
    if input.is_down(Action::MoveLeft) { actor.move_left(); }
    if input.is_down(Action::MoveRight) { actor.move_right(); }
    if input.is_down(Action::MoveUp) { actor.move_up(); }
    if input.is_down(Action::MoveDown) { actor.move_down(); }
}

fn fire(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let Some(shot) = world.active_actor_mut().shoot() else {
        trace!(frame = world.frame, "shot suppressed by cooldown");
        return;
    };

    debug!(kind = ?shot.kind, x = shot.x, y = shot.y, "shot fired");
    for _ in 0..MUZZLE_PARTICLES {
        let puff = Particle::spawn(shot.x, shot.y, &mut world.rng);
        world.particles.spawn(puff);
    }
    events.push(GameEvent::ShotFired { kind: shot.kind });
    world.projectiles.spawn(shot);
}

// ══════════════════════════════════════════════════════════════
// Simulation phases
// ══════════════════════════════════════════════════════════════

fn update_active_actor(world: &mut WorldState, dt: f32, events: &mut Vec<GameEvent>) {
    let arena = world.active_arena();
    physics::integrate(world.active_actor_mut(), dt, arena);

    if world.mode == Mode::Platforming(Possession::Player) {
        mode::check_door(world, events);
    }
}

fn update_transients(world: &mut WorldState, dt: f32) {
    let expired = world.projectiles.update(dt);
    if expired > 0 {
        trace!(expired, live = world.projectiles.len(), "projectiles pruned");
    }
    world.particles.update(dt);
}

fn update_camera(world: &mut WorldState) {
    let target = world.active_actor().center();
    let level = world.active_level().pixel_size();
    let view = world.viewport;
    world.camera.follow(target, view, level);
}

/// Enemy hook: contacts are found and logged, nothing is resolved.
fn check_collisions(world: &WorldState) {
    if world.projectiles.is_empty() {
        return;
    }
    for c in collision::find_contacts(world.projectiles.as_slice(), &world.enemies) {
        let health = world.enemies.get(c.target).map(|e| e.health);
        debug!(projectile = c.projectile, target = c.target, ?health, "unresolved contact");
    }
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════
