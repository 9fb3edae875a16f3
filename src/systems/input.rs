//! Keyboard polling.
//!
//! [`poll_keyboard`] turns key presses from raylib into
//! [`DirectionCommand`]s using a [`KeyBindings`] table and sends them into the
//! game's input queue. W/A/S/D steer snake A, the arrow keys steer snake B.
use crossbeam_channel::Sender;
use log::warn;
use raylib::ffi::KeyboardKey;

use crate::components::direction::Direction;
use crate::entities::snake::SnakeId;
use crate::events::input::DirectionCommand;

/// Key to command table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(KeyboardKey, DirectionCommand)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Direction::*;
        use KeyboardKey::*;
        let a = |d| DirectionCommand::new(SnakeId::A, d);
        let b = |d| DirectionCommand::new(SnakeId::B, d);
        KeyBindings {
            bindings: vec![
                (KEY_W, a(Up)),
                (KEY_D, a(Right)),
                (KEY_S, a(Down)),
                (KEY_A, a(Left)),
                (KEY_UP, b(Up)),
                (KEY_RIGHT, b(Right)),
                (KEY_DOWN, b(Down)),
                (KEY_LEFT, b(Left)),
            ],
        }
    }
}

impl KeyBindings {
    /// Rebind `key`, replacing any command it had.
    pub fn bind(&mut self, key: KeyboardKey, command: DirectionCommand) {
        self.bindings.retain(|(k, _)| *k != key);
        self.bindings.push((key, command));
    }

    pub fn command_for(&self, key: KeyboardKey) -> Option<DirectionCommand> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, command)| *command)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(KeyboardKey, DirectionCommand)> {
        self.bindings.iter()
    }
}

/// Send a command for every bound key pressed this frame.
pub fn poll_keyboard(
    rl: &raylib::RaylibHandle,
    bindings: &KeyBindings,
    sender: &Sender<DirectionCommand>,
) {
    for (key, command) in bindings.iter() {
        if rl.is_key_pressed(*key) && sender.send(*command).is_err() {
            warn!("Input queue closed, dropping {:?}", command);
        }
    }
}
