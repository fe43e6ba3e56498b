/// Events emitted during a simulation step.
/// The host loop logs them; the renderer reads state, not events.

use crate::domain::entity::ProjectileKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    BoardedVehicle,
    LeftVehicle,
    BoardingRefused { distance: f32 },
    EnteredDungeon,
    ExitedDungeon,
    ShotFired { kind: ProjectileKind },
}
