/// Possession rules: pure functions, no side effects.
///
/// These encode "what is legal" without performing the action;
/// the mode controller applies them.
///
/// ## Boarding
/// ┌───────────────────────────────┬──────────┐
/// │ Condition                      │ Result   │
/// ├───────────────────────────────┼──────────┤
/// │ distance(player, tank) < 30    │ ALLOW    │
/// │ otherwise                      │ DENY     │
/// └───────────────────────────────┴──────────┘
///
/// Distance is measured between the top-left origins of the two boxes.
///
/// ## Leaving the tank
/// Always allowed. The player reappears at the tank origin, lifted 20 px.
///
/// ## Door
/// Only the on-foot player triggers the door, by box overlap.

use super::entity::{Actor, DoorTrigger};
use super::physics::distance;

pub const BOARDING_RANGE: f32 = 30.0;
pub const DISEMBARK_LIFT: f32 = 20.0;

/// Distance used by the boarding check.
pub fn boarding_distance(player: &Actor, vehicle: &Actor) -> f32 {
    distance((player.x, player.y), (vehicle.x, vehicle.y))
}

pub fn can_board(player: &Actor, vehicle: &Actor) -> bool {
    boarding_distance(player, vehicle) < BOARDING_RANGE
}

/// Where the player lands when leaving the vehicle.
pub fn disembark_point(vehicle: &Actor) -> (f32, f32) {
    (vehicle.x, vehicle.y - DISEMBARK_LIFT)
}

pub fn touches_door(player: &Actor, door: &DoorTrigger) -> bool {
    player.bounds().overlaps(&door.area)
}
