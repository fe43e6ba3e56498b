/// Mode controller: which actor and level are live.
///
/// ```text
///                interact (dist < 30)
///   Platforming(Player) ─────────────────▶ Platforming(Vehicle)
///        │    ▲          ◀─────────────────
///        │    │               interact
///  door  │    │ exit
///        ▼    │
///        Dungeon
/// ```
///
/// Every transition finishes before any physics of the newly active actor
/// runs in the same step. The door fires after the physics phase, so
/// entering the dungeon re-applies the room clamps to the spawn point
/// itself: a spawn at (200, 280) lands at y = 268. Entering or leaving
/// the dungeon empties both transient pools; boarding and leaving the
/// vehicle keep them.

use tracing::{debug, info};

use crate::domain::{physics, rules};
use super::event::GameEvent;
use super::level::LevelGeometry;
use super::world::WorldState;

pub const DUNGEON_SPAWN: (f32, f32) = (200.0, 280.0);
pub const DUNGEON_RETURN: (f32, f32) = (850.0, 350.0);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Possession {
    Player,
    Vehicle,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Platforming(Possession),
    Dungeon,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Platforming(Possession::Player) => "PLAYER",
            Mode::Platforming(Possession::Vehicle) => "TANK",
            Mode::Dungeon => "OVERHEAD DUNGEON",
        }
    }
}

/// Board or leave the vehicle. No-op outside side-scroll mode.
pub fn toggle_vehicle(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    match world.mode {
        Mode::Platforming(Possession::Player) => {
            let distance = rules::boarding_distance(&world.player, &world.vehicle);
            if rules::can_board(&world.player, &world.vehicle) {
                world.mode = Mode::Platforming(Possession::Vehicle);
                info!(distance, "boarded vehicle");
                events.push(GameEvent::BoardedVehicle);
            } else {
                debug!(distance, "vehicle out of reach");
                events.push(GameEvent::BoardingRefused { distance });
            }
        }
        Mode::Platforming(Possession::Vehicle) => {
            let (x, y) = rules::disembark_point(&world.vehicle);
            world.player.teleport(x, y);
            world.mode = Mode::Platforming(Possession::Player);
            info!(x, y, "left vehicle");
            events.push(GameEvent::LeftVehicle);
        }
        Mode::Dungeon => {}
    }
}

/// Switch to the dungeon if the on-foot player stands in the door.
/// Returns true when the switch happened.
pub fn check_door(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    if world.mode != Mode::Platforming(Possession::Player) {
        return false;
    }
    if !rules::touches_door(&world.player, &world.door) {
        return false;
    }
    enter_dungeon(world, events);
    true
}

pub fn enter_dungeon(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    world.mode = Mode::Dungeon;
    world.roamer.teleport(DUNGEON_SPAWN.0, DUNGEON_SPAWN.1);
    let room = world.room.arena();
    physics::integrate(&mut world.roamer, 0.0, room);
    world.clear_transients();
    info!(frame = world.frame, "entered dungeon");
    events.push(GameEvent::EnteredDungeon);
}

/// Leave the dungeon on foot. No-op outside the dungeon.
pub fn exit_dungeon(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.mode != Mode::Dungeon {
        return;
    }
    world.mode = Mode::Platforming(Possession::Player);
    world.player.teleport(DUNGEON_RETURN.0, DUNGEON_RETURN.1);
    world.clear_transients();
    info!(frame = world.frame, "exited dungeon");
    events.push(GameEvent::ExitedDungeon);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Viewport;

    fn world() -> WorldState {
        WorldState::with_seed(Viewport::default(), 42)
    }

    #[test]
    fn boarding_within_range() {
        let mut w = world();
        w.player.teleport(100.0, 350.0);
        let mut ev = Vec::new();
        toggle_vehicle(&mut w, &mut ev);
        assert_eq!(w.mode, Mode::Platforming(Possession::Vehicle));
        assert_eq!(ev, vec![GameEvent::BoardedVehicle]);
    }

    #[test]
    fn boarding_refused_out_of_range() {
        let mut w = world();
        w.player.teleport(140.0, 350.0);
        let mut ev = Vec::new();
        toggle_vehicle(&mut w, &mut ev);
        assert_eq!(w.mode, Mode::Platforming(Possession::Player));
        assert_eq!(ev, vec![GameEvent::BoardingRefused { distance: 40.0 }]);
    }

    #[test]
    fn leaving_vehicle_places_player_above_it() {
        let mut w = world();
        w.mode = Mode::Platforming(Possession::Vehicle);
        w.vehicle.teleport(300.0, 380.0);
        let mut ev = Vec::new();
        toggle_vehicle(&mut w, &mut ev);
        assert_eq!(w.mode, Mode::Platforming(Possession::Player));
        assert_eq!((w.player.x, w.player.y), (300.0, 360.0));
        assert_eq!(ev, vec![GameEvent::LeftVehicle]);
    }

    #[test]
    fn toggle_ignored_in_dungeon() {
        let mut w = world();
        w.mode = Mode::Dungeon;
        let mut ev = Vec::new();
        toggle_vehicle(&mut w, &mut ev);
        assert_eq!(w.mode, Mode::Dungeon);
        assert!(ev.is_empty());
    }

    #[test]
    fn door_only_triggers_on_foot() {
        let mut w = world();
        w.vehicle.teleport(900.0, 360.0);
        w.mode = Mode::Platforming(Possession::Vehicle);
        let mut ev = Vec::new();
        assert!(!check_door(&mut w, &mut ev));
        assert_eq!(w.mode, Mode::Platforming(Possession::Vehicle));

        w.mode = Mode::Platforming(Possession::Player);
        w.player.teleport(900.0, 360.0);
        assert!(check_door(&mut w, &mut ev));
        assert_eq!(w.mode, Mode::Dungeon);
        assert_eq!((w.roamer.x, w.roamer.y), (DUNGEON_SPAWN.0, 268.0));
    }

    #[test]
    fn dungeon_transitions_clear_transients() {
        let mut w = world();
        if let Some(p) = w.player.shoot() {
            w.projectiles.spawn(p);
        }
        let mut ev = Vec::new();
        enter_dungeon(&mut w, &mut ev);
        assert!(w.projectiles.is_empty());

        if let Some(p) = w.roamer.shoot() {
            w.projectiles.spawn(p);
        }
        exit_dungeon(&mut w, &mut ev);
        assert!(w.projectiles.is_empty());
        assert_eq!(w.mode, Mode::Platforming(Possession::Player));
        assert_eq!((w.player.x, w.player.y), DUNGEON_RETURN);
        assert_eq!(ev, vec![GameEvent::EnteredDungeon, GameEvent::ExitedDungeon]);
    }

    #[test]
    fn exit_ignored_outside_dungeon() {
        let mut w = world();
        let mut ev = Vec::new();
        exit_dungeon(&mut w, &mut ev);
        assert_eq!(w.mode, Mode::Platforming(Possession::Player));
        assert_eq!((w.player.x, w.player.y), (50.0, 350.0));
        assert!(ev.is_empty());
    }

    #[test]
    fn mode_labels() {
        assert_eq!(Mode::Platforming(Possession::Player).label(), "PLAYER");
        assert_eq!(Mode::Platforming(Possession::Vehicle).label(), "TANK");
        assert_eq!(Mode::Dungeon.label(), "OVERHEAD DUNGEON");
    }
}
