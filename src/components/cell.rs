use crate::components::direction::Direction;

/// Distance under which two continuous positions are considered identical.
pub const CELL_EPSILON: f32 = 1e-2;

/// One grid position with a continuous twin used for sub-step animation.
///
/// `row`/`col` are the discrete coordinates the rules operate on. `x`/`y` follow
/// `col`/`row` while the cell is settled and drift between cells while a snake
/// segment slides. Equality of cells is positional: see [`Cell::same_position`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
    pub x: f32,
    pub y: f32,
}

impl Cell {
    /// A settled cell at `(row, col)`.
    pub fn new(row: i32, col: i32) -> Self {
        Cell {
            row,
            col,
            x: col as f32,
            y: row as f32,
        }
    }

    /// The settled neighbour one step away in `direction`.
    pub fn step(&self, direction: Direction) -> Cell {
        let (dr, dc) = direction.delta();
        Cell::new(self.row + dr, self.col + dc)
    }

    pub fn same_position(&self, other: &Cell) -> bool {
        self.row == other.row && self.col == other.col
    }

    pub fn is_settled(&self) -> bool {
        (self.x - self.col as f32).abs() < f32::EPSILON
            && (self.y - self.row as f32).abs() < f32::EPSILON
    }

    /// Snap the continuous position back onto the grid.
    pub fn settle(&mut self) {
        self.x = self.col as f32;
        self.y = self.row as f32;
    }

    pub fn distance_to(&self, other: &Cell) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
