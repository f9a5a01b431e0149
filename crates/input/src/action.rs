/// Keys the viewer cares about. Platform layers map their key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    LeftShift,
    Escape,
    Other,
}

/// A raw event from the platform layer, already stripped of platform types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window close requested.
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    /// Relative mouse motion in pixels.
    MouseMotion { dx: f32, dy: f32 },
}

/// One of the six held-key movement intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// What an event means for the camera.
///
/// The camera never sees raw events, only actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Start or stop holding a movement intent.
    SetIntent(Intent, bool),
    /// Rotate by a raw mouse delta.
    Look { dx: f32, dy: f32 },
    /// Leave the frame loop.
    Quit,
    /// Unbound input.
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_intent_is_constructible() {
        let a = Action::SetIntent(Intent::Forward, true);
        assert!(matches!(a, Action::SetIntent(Intent::Forward, true)));
    }

    #[test]
    fn look_carries_delta() {
        let a = Action::Look { dx: 1.5, dy: -2.0 };
        assert_eq!(a, Action::Look { dx: 1.5, dy: -2.0 });
    }
}
