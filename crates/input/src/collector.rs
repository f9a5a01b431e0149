use crate::action::{Action, InputEvent, Intent, Key};
use skyview_camera::{Camera, MoveIntents};

/// Whether the frame loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Turns input events into camera intents and orientation changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputCollector;

impl InputCollector {
    pub fn new() -> Self {
        Self
    }

    /// Movement binding for a key, if any.
    pub fn binding(key: Key) -> Option<Intent> {
        match key {
            Key::W => Some(Intent::Forward),
            Key::S => Some(Intent::Backward),
            Key::A => Some(Intent::Left),
            Key::D => Some(Intent::Right),
            Key::Space => Some(Intent::Up),
            Key::LeftShift => Some(Intent::Down),
            Key::Escape | Key::Other => None,
        }
    }

    pub fn translate(&self, event: InputEvent) -> Action {
        match event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => Action::Quit,
            InputEvent::KeyDown(key) => Self::binding(key)
                .map(|i| Action::SetIntent(i, true))
                .unwrap_or(Action::Noop),
            InputEvent::KeyUp(key) => Self::binding(key)
                .map(|i| Action::SetIntent(i, false))
                .unwrap_or(Action::Noop),
            InputEvent::MouseMotion { dx, dy } => Action::Look { dx, dy },
        }
    }

    /// Apply an action to the camera.
    pub fn perform(action: Action, camera: &mut Camera) -> Flow {
        match action {
            Action::SetIntent(intent, held) => {
                *intent_flag(&mut camera.intents, intent) = held;
                tracing::debug!(?intent, held, "intent changed");
                Flow::Continue
            }
            Action::Look { dx, dy } => {
                camera.look(dx, dy);
                Flow::Continue
            }
            Action::Quit => {
                tracing::info!("quit requested");
                Flow::Exit
            }
            Action::Noop => Flow::Continue,
        }
    }

    pub fn apply(&self, event: InputEvent, camera: &mut Camera) -> Flow {
        Self::perform(self.translate(event), camera)
    }

    /// Apply a batch of events polled for one frame. Stops at the first exit.
    pub fn apply_all(
        &self,
        events: impl IntoIterator<Item = InputEvent>,
        camera: &mut Camera,
    ) -> Flow {
        for event in events {
            if self.apply(event, camera) == Flow::Exit {
                return Flow::Exit;
            }
        }
        Flow::Continue
    }
}

fn intent_flag(intents: &mut MoveIntents, intent: Intent) -> &mut bool {
    match intent {
        Intent::Forward => &mut intents.forward,
        Intent::Backward => &mut intents.backward,
        Intent::Left => &mut intents.left,
        Intent::Right => &mut intents.right,
        Intent::Up => &mut intents.up,
        Intent::Down => &mut intents.down,
    }
}
