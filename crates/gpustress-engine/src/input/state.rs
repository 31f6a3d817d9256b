use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current keyboard state for the window.
///
/// Holds "is down" information; per-frame transitions go into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    ///
    /// A press is only reported once until the key is released again, so
    /// OS key-repeat never reaches `frame.keys_pressed`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are lost while unfocused; avoid stuck keys.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn press_is_reported_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::C, KeyState::Pressed, false));
        state.apply_event(&mut frame, key(Key::C, KeyState::Pressed, true));
        assert!(frame.pressed(Key::C));
        assert_eq!(frame.events.len(), 2);
        assert!(state.key_down(Key::C));

        frame.clear();
        state.apply_event(&mut frame, key(Key::C, KeyState::Pressed, true));
        assert!(!frame.pressed(Key::C));

        state.apply_event(&mut frame, key(Key::C, KeyState::Released, false));
        assert!(frame.keys_released.contains(&Key::C));
        assert!(!state.key_down(Key::C));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Plus, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.focused);
        assert!(state.keys_down.is_empty());

        frame.clear();
        state.apply_event(&mut frame, key(Key::Plus, KeyState::Pressed, false));
        assert!(frame.pressed(Key::Plus));
    }

    #[test]
    fn digit_values() {
        assert_eq!(Key::Digit0.digit(), Some(0));
        assert_eq!(Key::Digit7.digit(), Some(7));
        assert_eq!(Key::Q.digit(), None);
        assert_eq!(Key::Plus.to_string(), "+");
        assert_eq!(Key::F11.to_string(), "F11");
    }
}
