//! Direction commands delivered from the input boundary.
//!
//! Keyboard handlers (or tests) build a [`DirectionCommand`] and push it into
//! the [`InputQueue`](crate::resources::input::InputQueue). Raw values are
//! validated here; anything that fails conversion is rejected with an
//! [`InputError`] and never reaches a snake.

use std::fmt;

use crate::components::direction::Direction;
use crate::entities::snake::SnakeId;

/// Request to change a snake's pending direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionCommand {
    /// Which snake the command is for.
    pub snake: SnakeId,
    /// The requested direction.
    pub direction: Direction,
}

impl DirectionCommand {
    pub fn new(snake: SnakeId, direction: Direction) -> Self {
        DirectionCommand { snake, direction }
    }

    /// Build a command from untrusted numeric values.
    pub fn from_raw(snake: u8, direction: u8) -> Result<Self, InputError> {
        Ok(DirectionCommand {
            snake: SnakeId::try_from(snake)?,
            direction: Direction::try_from(direction)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// Direction value outside `0..=3`.
    DirectionOutOfRange(u8),
    /// Snake index outside the two players.
    UnknownSnake(u8),
    /// Key with no direction bound to it.
    UnknownKey(char),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::DirectionOutOfRange(v) => write!(f, "direction {v} out of range 0..=3"),
            InputError::UnknownSnake(v) => write!(f, "no snake with index {v}"),
            InputError::UnknownKey(k) => write!(f, "key {k:?} is not bound to a direction"),
        }
    }
}

impl std::error::Error for InputError {}
