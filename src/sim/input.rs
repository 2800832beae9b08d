//! Platform-independent input snapshot fed to every tick

use glam::Vec2;

/// Logical keys the games understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Space bar
    Action,
    /// `P`
    Pause,
    /// `R`
    Restart,
}

/// Keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub action: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Action => self.action = down,
            Key::Pause | Key::Restart => {}
        }
    }

    /// -1, 0 or 1 along x
    pub fn axis_x(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    /// -1, 0 or 1 along y (screen down is positive)
    pub fn axis_y(&self) -> f32 {
        (self.down as i8 - self.up as i8) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A click in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub pos: Vec2,
    pub button: PointerButton,
}

/// Input for a single simulation tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: HeldKeys,
    /// Keys that went down since the previous tick (one-shot)
    pub pressed: Vec<Key>,
    /// Last known pointer position in game coordinates
    pub pointer: Option<Vec2>,
    /// Clicks since the previous tick (one-shot)
    pub clicks: Vec<Click>,
}

impl TickInput {
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Record a key-down event, updating both held and one-shot state
    pub fn key_down(&mut self, key: Key) {
        self.held.set(key, true);
        self.pressed.push(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.set(key, false);
    }

    pub fn click(&mut self, pos: Vec2, button: PointerButton) {
        self.pointer = Some(pos);
        self.clicks.push(Click { pos, button });
    }

    /// Drop one-shot state after a tick has consumed it
    pub fn clear_one_shots(&mut self) {
        self.pressed.clear();
        self.clicks.clear();
    }

    /// Release everything (used when the tab loses focus)
    pub fn release_all(&mut self) {
        self.held = HeldKeys::default();
        self.clear_one_shots();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_pressed() {
        let mut input = TickInput::default();
        input.key_down(Key::Left);
        assert!(input.held.left);
        assert!(input.was_pressed(Key::Left));
        assert_eq!(input.held.axis_x(), -1.0);

        input.clear_one_shots();
        assert!(input.held.left);
        assert!(!input.was_pressed(Key::Left));

        input.key_up(Key::Left);
        assert_eq!(input.held.axis_x(), 0.0);
    }
}
