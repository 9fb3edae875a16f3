//! Maze generation.
//!
//! Builds a wall layout that is
//! - walled all around the border,
//! - point-symmetric: `(r, c)` is a wall iff `(rows-1-r, cols-1-c)` is,
//! - solvable: a path of free cells joins the two snake start cells.
//!
//! Each attempt places the border plus `inner_walls` random symmetric pairs
//! on a fresh grid, then checks reachability on a copy. Failed attempts are
//! discarded; after [`MAX_GENERATION_ATTEMPTS`] the parameters are reported
//! as unsolvable.

use std::fmt;

use arrayvec::ArrayVec;
use log::debug;

use crate::resources::rng::RandomSource;

/// Whole-layout retries before giving up.
pub const MAX_GENERATION_ATTEMPTS: u32 = 1000;
/// Random tries per inner wall pair.
pub const MAX_PLACEMENT_TRIES: u32 = 1000;
/// Largest accepted grid side, in cells.
pub const MAX_GRID_SIDE: i32 = 1024;

/// Most symmetric pairs the inside of a `rows x cols` grid can hold.
pub fn max_inner_wall_pairs(rows: i32, cols: i32) -> u32 {
    let inside = i64::from((rows - 2).max(0)) * i64::from((cols - 2).max(0));
    u32::try_from(inside / 2).unwrap_or(u32::MAX)
}

/// Row-major arena of occupied flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: i32,
    cols: i32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// An empty grid. Sides are clamped to `0..=MAX_GRID_SIDE`.
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.clamp(0, MAX_GRID_SIDE);
        let cols = cols.clamp(0, MAX_GRID_SIDE);
        let len = rows as usize * cols as usize;
        OccupancyGrid {
            rows,
            cols,
            cells: vec![false; len],
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.rows && col >= 0 && col < self.cols
    }

    fn index(&self, row: i32, col: i32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    /// Out-of-bounds cells count as occupied.
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        !self.in_bounds(row, col) || self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: i32, col: i32, occupied: bool) {
        if self.in_bounds(row, col) {
            let i = self.index(row, col);
            self.cells[i] = occupied;
        }
    }

    /// The point reflection of `(row, col)` through the grid center.
    pub fn mirror(&self, row: i32, col: i32) -> (i32, i32) {
        (self.rows - 1 - row, self.cols - 1 - col)
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(move |(i, _)| (i as i32 / cols, i as i32 % cols))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    fn fill_border(&mut self) {
        for r in 0..self.rows {
            self.set(r, 0, true);
            self.set(r, self.cols - 1, true);
        }
        for c in 0..self.cols {
            self.set(0, c, true);
            self.set(self.rows - 1, c, true);
        }
    }

    fn free_neighbours(&self, row: i32, col: i32) -> ArrayVec<(i32, i32), 4> {
        const OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
        OFFSETS
            .iter()
            .map(|(dr, dc)| (row + dr, col + dc))
            .filter(|(r, c)| !self.is_occupied(*r, *c))
            .collect()
    }
}

/// Inputs of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeParams {
    pub rows: i32,
    pub cols: i32,
    pub inner_walls: u32,
    /// The two cells that must stay free and connected.
    pub starts: [(i32, i32); 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// A side is larger than [`MAX_GRID_SIDE`].
    GridTooLarge { rows: i32, cols: i32 },
    /// No connected layout was found within the attempt budget.
    Unsolvable {
        rows: i32,
        cols: i32,
        inner_walls: u32,
        attempts: u32,
    },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::GridTooLarge { rows, cols } => write!(
                f,
                "{rows}x{cols} grid exceeds the {MAX_GRID_SIDE} cells per side limit"
            ),
            MazeError::Unsolvable {
                rows,
                cols,
                inner_walls,
                attempts,
            } => write!(
                f,
                "no connected {rows}x{cols} maze with {inner_walls} inner wall pairs after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for MazeError {}

/// Generate a symmetric, bordered layout where both starts are connected.
pub fn generate(
    params: &MazeParams,
    rng: &mut dyn RandomSource,
) -> Result<OccupancyGrid, MazeError> {
    if params.rows > MAX_GRID_SIDE || params.cols > MAX_GRID_SIDE {
        return Err(MazeError::GridTooLarge {
            rows: params.rows,
            cols: params.cols,
        });
    }
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let grid = place_walls(params, rng);
        let [(sr, sc), (tr, tc)] = params.starts;
        if is_reachable(&grid, (sr, sc), (tr, tc)) {
            debug!(
                "Maze {}x{} accepted on attempt {} with {} wall cells",
                params.rows,
                params.cols,
                attempt,
                grid.occupied_count()
            );
            return Ok(grid);
        }
        debug!("Maze attempt {} rejected: starts not connected", attempt);
    }
    Err(MazeError::Unsolvable {
        rows: params.rows,
        cols: params.cols,
        inner_walls: params.inner_walls,
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

/// Border plus up to `inner_walls` symmetric pairs on an empty grid.
///
/// Stops at the first pair that finds no free spot.
fn place_walls(params: &MazeParams, rng: &mut dyn RandomSource) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(params.rows, params.cols);
    grid.fill_border();
    if params.rows <= 0 || params.cols <= 0 {
        return grid;
    }

    let pairs = params
        .inner_walls
        .min(max_inner_wall_pairs(params.rows, params.cols));
    for _ in 0..pairs {
        let mut placed = false;
        for _ in 0..MAX_PLACEMENT_TRIES {
            let r = rng.next_index(params.rows as usize) as i32;
            let c = rng.next_index(params.cols as usize) as i32;
            if params.starts.contains(&(r, c)) {
                continue;
            }
            let (mr, mc) = grid.mirror(r, c);
            if grid.is_occupied(r, c) || grid.is_occupied(mr, mc) {
                continue;
            }
            grid.set(r, c, true);
            grid.set(mr, mc, true);
            placed = true;
            break;
        }
        if !placed {
            break;
        }
    }
    grid
}

/// Depth-first search over free cells, on a private copy of `grid`.
pub fn is_reachable(grid: &OccupancyGrid, from: (i32, i32), to: (i32, i32)) -> bool {
    if from == to {
        return true;
    }
    let mut visited = grid.clone();
    let mut stack = vec![from];
    visited.set(from.0, from.1, true);

    while let Some((r, c)) = stack.pop() {
        for next in visited.free_neighbours(r, c) {
            if next == to {
                return true;
            }
            visited.set(next.0, next.1, true);
            stack.push(next);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::rng::ScriptedSource;
    use fastrand::Rng;

    fn params(rows: i32, cols: i32, inner_walls: u32) -> MazeParams {
        MazeParams {
            rows,
            cols,
            inner_walls,
            starts: [(rows - 2, 1), (1, cols - 2)],
        }
    }

    #[test]
    fn test_border_only_when_no_inner_walls() {
        let mut rng = Rng::with_seed(1);
        let grid = generate(&params(5, 6, 0), &mut rng).unwrap();
        assert_eq!(grid.occupied_count(), 5 * 6 - 3 * 4);
        assert!(!grid.is_occupied(2, 3));
    }

    #[test]
    fn test_scripted_pair_is_mirrored() {
        let mut rng = ScriptedSource::new(vec![4, 3]);
        let grid = generate(&params(9, 9, 1), &mut rng).unwrap();
        assert!(grid.is_occupied(4, 3));
        assert!(grid.is_occupied(4, 5));
        assert_eq!(grid.occupied_count(), 32 + 2);
    }

    #[test]
    fn test_start_cells_are_skipped() {
        // First try hits a start cell, second lands on (2, 2).
        let mut rng = ScriptedSource::new(vec![7, 1, 2, 2]);
        let grid = generate(&params(9, 9, 1), &mut rng).unwrap();
        assert!(!grid.is_occupied(7, 1));
        assert!(grid.is_occupied(2, 2));
        assert!(grid.is_occupied(6, 6));
    }

    #[test]
    fn test_reachability_respects_walls_and_does_not_mutate() {
        let mut grid = OccupancyGrid::new(5, 5);
        grid.fill_border();
        // Wall off column 2 inside the border.
        for r in 1..4 {
            grid.set(r, 2, true);
        }
        let before = grid.clone();
        assert!(!is_reachable(&grid, (3, 1), (1, 3)));
        assert_eq!(grid, before);

        grid.set(2, 2, false);
        assert!(is_reachable(&grid, (3, 1), (1, 3)));
    }

    #[test]
    fn test_unsolvable_grid_is_reported() {
        // A 2-row grid is all border: the starts can never connect.
        let mut rng = Rng::with_seed(3);
        let err = generate(&params(2, 5, 0), &mut rng).unwrap_err();
        assert_eq!(
            err,
            MazeError::Unsolvable {
                rows: 2,
                cols: 5,
                inner_walls: 0,
                attempts: MAX_GENERATION_ATTEMPTS
            }
        );
        assert!(err.to_string().contains("2x5"));
    }

    #[test]
    fn test_oversized_grid_is_rejected_before_allocating() {
        let mut rng = Rng::with_seed(5);
        let err = generate(&params(50_000, 50_000, 10), &mut rng).unwrap_err();
        assert_eq!(
            err,
            MazeError::GridTooLarge {
                rows: 50_000,
                cols: 50_000
            }
        );
        assert!(err.to_string().contains("50000x50000"));
    }

    #[test]
    fn test_grid_sides_are_clamped() {
        let grid = OccupancyGrid::new(i32::MAX, 7);
        assert_eq!((grid.rows(), grid.cols()), (MAX_GRID_SIDE, 7));
        assert!(!grid.is_occupied(MAX_GRID_SIDE - 1, 6));
        let grid = OccupancyGrid::new(-4, 7);
        assert_eq!(grid.rows(), 0);
        assert!(grid.is_occupied(0, 0));
    }

    #[test]
    fn test_excess_inner_walls_finish_quickly() {
        // A 3x3 inside holds at most 4 pairs.
        assert_eq!(max_inner_wall_pairs(5, 5), 4);
        assert_eq!(max_inner_wall_pairs(2, 9), 0);
        let mut rng = Rng::with_seed(11);
        match generate(&params(5, 5, 1_000_000), &mut rng) {
            Ok(grid) => assert!(grid.occupied_count() <= 25 - 2),
            Err(e) => assert!(matches!(e, MazeError::Unsolvable { .. })),
        }
    }

    #[test]
    fn test_mirror_and_out_of_bounds() {
        let grid = OccupancyGrid::new(13, 14);
        assert_eq!(grid.mirror(11, 1), (1, 12));
        assert!(grid.is_occupied(-1, 0));
        assert!(grid.is_occupied(0, 14));
        assert!(!grid.is_occupied(5, 5));
    }
}
