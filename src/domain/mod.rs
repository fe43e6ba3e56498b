/// Pure game rules: entities, physics, input snapshot, tiles.
/// Nothing in here touches the terminal or the clock.

pub mod entity;
pub mod input;
pub mod physics;
pub mod rules;
pub mod tile;
