#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    TurnLeft,
    TurnRight,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    /// Signed axis: +1 when only `positive` is held, -1 when only `negative` is held.
    pub(crate) fn axis(&self, positive: InputAction, negative: InputAction) -> f32 {
        let mut value = 0.0;
        if self.is_down(positive) {
            value += 1.0;
        }
        if self.is_down(negative) {
            value -= 1.0;
        }
        value
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveForward => 0,
            InputAction::MoveBack => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::TurnLeft => 4,
            InputAction::TurnRight => 5,
        }
    }
}
