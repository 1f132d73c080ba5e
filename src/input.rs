//! Keyboard input
//!
//! Hosts feed raw key transitions into a `KeyboardState`; `InputMapper`
//! turns its held/pressed sets into paddle intents and discrete actions
//! once per frame.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::PaddleIntents;

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    S,
    Up,
    Down,
    Space,
    B,
    F,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(Key::W),
            "KeyS" => Some(Key::S),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "Space" => Some(Key::Space),
            "KeyB" => Some(Key::B),
            "KeyF" => Some(Key::F),
            _ => None,
        }
    }
}

/// One-shot actions fired on a key press edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Start from the title screen, or play again after a win
    Confirm,
    /// Back to the title screen after a win
    ReturnToTitle,
    /// Show/hide the FPS overlay
    ToggleOverlay,
}

/// Anything that can answer "is this key held" and "was it pressed this frame"
pub trait KeySource {
    fn is_down(&self, key: Key) -> bool;
    fn is_pressed(&self, key: Key) -> bool;
}

/// Key state built from raw down/up events
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Auto-repeat while held is not a new press.
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    /// Call after the frame has consumed its input
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }
}

impl KeySource for KeyboardState {
    fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

/// Which key does what
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left_up: Key,
    pub left_down: Key,
    pub right_up: Key,
    pub right_down: Key,
    pub confirm: Key,
    pub return_to_title: Key,
    pub toggle_overlay: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_up: Key::W,
            left_down: Key::S,
            right_up: Key::Up,
            right_down: Key::Down,
            confirm: Key::Space,
            return_to_title: Key::B,
            toggle_overlay: Key::F,
        }
    }
}

impl KeyBindings {
    /// Whether the host should swallow the browser default for this key
    pub fn is_bound(&self, key: Key) -> bool {
        [
            self.left_up,
            self.left_down,
            self.right_up,
            self.right_down,
            self.confirm,
            self.return_to_title,
            self.toggle_overlay,
        ]
        .contains(&key)
    }
}

/// Everything the game needs from the keyboard for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub intents: PaddleIntents,
    pub actions: Vec<Action>,
}

/// Stateless translation from key state to intents and actions
#[derive(Debug, Clone, Copy, Default)]
pub struct InputMapper {
    pub bindings: KeyBindings,
}

impl InputMapper {
    pub fn map(&self, keys: &impl KeySource) -> FrameInput {
        let b = &self.bindings;
        let intents = PaddleIntents {
            left_up: keys.is_down(b.left_up),
            left_down: keys.is_down(b.left_down),
            right_up: keys.is_down(b.right_up),
            right_down: keys.is_down(b.right_down),
        };

        let actions = [
            (b.confirm, Action::Confirm),
            (b.return_to_title, Action::ReturnToTitle),
            (b.toggle_overlay, Action::ToggleOverlay),
        ]
        .into_iter()
        .filter(|(key, _)| keys.is_pressed(*key))
        .map(|(_, action)| action)
        .collect();

        FrameInput { intents, actions }
    }
}
