//! Input surface — what the front end hands the engine each tick.

/// Discrete key-press actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save to slot 1.
    QuickSave,
    /// Load from slot 1.
    QuickLoad,
    /// Ask whether a typed `"x,y"` room has been visited.
    Lookup(String),
    Quit,
}

/// Held movement keys, pointer position and this tick's key presses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in panel-local pixels; the flashlight aims here.
    pub aim: (f32, f32),
    pub commands: Vec<Command>,
}

impl InputState {
    pub fn with_aim(aim: (f32, f32)) -> Self {
        Self {
            aim,
            ..Default::default()
        }
    }

    pub fn is_moving(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Single-axis steps for the held keys, in the order up, down, left,
    /// right. Each one is attempted separately so a wall on one axis does
    /// not cancel movement on the other.
    pub fn steps(&self, speed: f32) -> Vec<(f32, f32)> {
        let mut steps = Vec::with_capacity(4);
        if self.up {
            steps.push((0.0, -speed));
        }
        if self.down {
            steps.push((0.0, speed));
        }
        if self.left {
            steps.push((-speed, 0.0));
        }
        if self.right {
            steps.push((speed, 0.0));
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_order() {
        let input = InputState {
            up: true,
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(
            input.steps(3.0),
            vec![(0.0, -3.0), (-3.0, 0.0), (3.0, 0.0)]
        );
        assert!(input.is_moving());
    }

    #[test]
    fn test_idle() {
        let input = InputState::with_aim((10.0, 20.0));
        assert!(input.steps(3.0).is_empty());
        assert!(!input.is_moving());
    }
}
