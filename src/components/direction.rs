//! Grid movement directions.
//!
//! [`Direction`] is the only value the input boundary hands to a snake. The
//! numeric encoding (0 = up, clockwise to 3 = left) matches the indices used by
//! the eye offset table in [`crate::entities::snake`].

use std::fmt;

use crate::events::input::InputError;

/// One of the four orthogonal moves on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in encoding order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Row/column delta of a single step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Numeric encoding, 0..=3.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Direction {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(value as usize)
            .copied()
            .ok_or(InputError::DirectionOutOfRange(value))
    }
}

/// Parses the classic `w a s d` keys (case-insensitive).
impl TryFrom<char> for Direction {
    type Error = InputError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'w' => Ok(Direction::Up),
            'd' => Ok(Direction::Right),
            's' => Ok(Direction::Down),
            'a' => Ok(Direction::Left),
            other => Err(InputError::UnknownKey(other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}
