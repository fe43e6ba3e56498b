/// Frame input: the immutable snapshot of logical actions handed to the
/// simulation once per frame. The simulation never looks at raw keys.
///
/// Held actions (movement, shoot) are true for every frame the key is
/// down. Edge actions (interact, exit) are true only on the frame of the
/// press; the front end decides which is which.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Shoot,
    Interact,
    Exit,
}

const ACTION_COUNT: usize = 7;

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Shoot,
        Action::Interact,
        Action::Exit,
    ];

    const fn index(self) -> usize {
        match self {
            Action::MoveUp => 0,
            Action::MoveDown => 1,
            Action::MoveLeft => 2,
            Action::MoveRight => 3,
            Action::Shoot => 4,
            Action::Interact => 5,
            Action::Exit => 6,
        }
    }
}

/// Pressed state per action. Anything never set reads as released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    down: [bool; ACTION_COUNT],
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot with exactly the given actions pressed.
    #[cfg(test)]
    pub fn pressed(actions: &[Action]) -> Self {
        actions
            .iter()
            .fold(Self::empty(), |snap, &a| snap.with_action(a, true))
    }

    pub fn with_action(mut self, action: Action, is_down: bool) -> Self {
        self.down[action.index()] = is_down;
        self
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.down[action.index()]
    }
}
