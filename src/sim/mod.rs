/// Simulation: world state, level geometry, mode transitions and the
/// per-frame step. Deterministic given the input snapshots and `dt`.

pub mod collision;
pub mod event;
pub mod level;
pub mod lifecycle;
pub mod mode;
pub mod step;
pub mod world;
