//! Game map: grid geometry, walls, and turn arbitration.
//!
//! The map owns the two snakes and every wall for the lifetime of a match.
//! Each tick it resizes its cells to the viewport, resolves a turn once both
//! snakes are idle with a direction queued, and paints the checkerboard
//! background.
//!
//! # Turn resolution
//!
//! All candidate cells are judged against the grid as it was *before* anyone
//! moves, then committed together. A snake whose tail frees up this turn does
//! not block that cell, unless that snake dies this turn and so keeps its
//! tail. Two snakes heading for the same cell both die; this is the head-on
//! tie-break and does not depend on snake order.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::components::cell::Cell;
use crate::components::direction::Direction;
use crate::entities::snake::{Snake, SnakeId, SnakeStatus};
use crate::entities::wall::Wall;
use crate::resources::drawsurface::{Color, DrawSurface};
use crate::resources::rng::RandomSource;
use crate::systems::maze::{self, MazeError, MazeParams, OccupancyGrid};
use crate::systems::scheduler::{FrameContext, ObjectId, Registry, Tickable};

pub const EVEN_TILE_COLOR: Color = Color::from_hex(0xAAD751);
pub const ODD_TILE_COLOR: Color = Color::from_hex(0xA2D149);

/// Grid and snake settings for one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub rows: i32,
    pub cols: i32,
    /// Symmetric inner wall pairs to place.
    pub inner_walls: u32,
    /// Cells per second.
    pub snake_speed: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            rows: 13,
            cols: 14,
            inner_walls: 10,
            snake_speed: 5.0,
        }
    }
}

impl MapConfig {
    /// Start cells of snake A (bottom-left) and snake B (top-right).
    pub fn start_cells(&self) -> [Cell; 2] {
        [
            Cell::new(self.rows - 2, 1),
            Cell::new(1, self.cols - 2),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Ongoing,
    Winner(SnakeId),
    Draw,
}

pub struct GameMap {
    config: MapConfig,
    cell_size: f32,
    walls: Vec<(ObjectId, Rc<RefCell<Wall>>)>,
    wall_cells: FxHashSet<(i32, i32)>,
    snakes: [Rc<RefCell<Snake>>; 2],
    /// Ids of the map itself and its snakes, in registration order.
    registered: Vec<ObjectId>,
    turn: u32,
    outcome: MatchOutcome,
    self_ref: Weak<RefCell<GameMap>>,
}

impl GameMap {
    /// Generate a maze, then register the map, both snakes and every wall
    /// (in that order) with `registry`.
    ///
    /// Nothing is registered when no solvable maze is found.
    pub fn spawn(
        registry: &mut dyn Registry,
        config: MapConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<Rc<RefCell<GameMap>>, MazeError> {
        let layout = maze::generate(&Self::maze_params(&config), rng)?;

        let [start_a, start_b] = config.start_cells();
        let map = Rc::new_cyclic(|weak: &Weak<RefCell<GameMap>>| {
            RefCell::new(GameMap {
                config,
                cell_size: 0.0,
                walls: Vec::new(),
                wall_cells: FxHashSet::default(),
                snakes: [
                    Rc::new(RefCell::new(Snake::new(
                        SnakeId::A,
                        start_a,
                        config.snake_speed,
                        weak.clone(),
                    ))),
                    Rc::new(RefCell::new(Snake::new(
                        SnakeId::B,
                        start_b,
                        config.snake_speed,
                        weak.clone(),
                    ))),
                ],
                registered: Vec::with_capacity(3),
                turn: 0,
                outcome: MatchOutcome::Ongoing,
                self_ref: weak.clone(),
            })
        });

        let map_id = registry.register(map.clone());
        let snakes = map.borrow().snakes.clone();
        let mut ids = vec![map_id];
        for snake in snakes {
            ids.push(registry.register(snake));
        }

        {
            let mut m = map.borrow_mut();
            m.registered = ids;
            m.install_walls(&layout, registry);
        }

        info!(
            "Map {}x{} ready with {} wall cells",
            config.rows,
            config.cols,
            layout.occupied_count()
        );
        Ok(map)
    }

    fn maze_params(config: &MapConfig) -> MazeParams {
        let [a, b] = config.start_cells();
        MazeParams {
            rows: config.rows,
            cols: config.cols,
            inner_walls: config.inner_walls,
            starts: [(a.row, a.col), (b.row, b.col)],
        }
    }

    /// Replace the current walls with a freshly generated layout.
    ///
    /// Returns the number of wall cells. On error the existing walls stay.
    pub fn generate_walls(
        &mut self,
        registry: &mut dyn Registry,
        rng: &mut dyn RandomSource,
    ) -> Result<usize, MazeError> {
        let layout = maze::generate(&Self::maze_params(&self.config), rng)?;
        for (id, _) in self.walls.drain(..) {
            registry.unregister(id);
        }
        self.wall_cells.clear();
        self.install_walls(&layout, registry);
        Ok(self.walls.len())
    }

    fn install_walls(&mut self, layout: &OccupancyGrid, registry: &mut dyn Registry) {
        for (row, col) in layout.occupied() {
            let wall = Rc::new(RefCell::new(Wall::new(row, col, self.self_ref.clone())));
            let id = registry.register(wall.clone());
            self.walls.push((id, wall));
            self.wall_cells.insert((row, col));
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn rows(&self) -> i32 {
        self.config.rows
    }

    pub fn cols(&self) -> i32 {
        self.config.cols
    }

    /// Pixel side of one cell, as of the last tick.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_wall(&self, row: i32, col: i32) -> bool {
        self.wall_cells.contains(&(row, col))
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Wall positions in row-major order.
    pub fn wall_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.walls.iter().map(|(_, w)| {
            let w = w.borrow();
            (w.row(), w.col())
        })
    }

    pub fn snake(&self, id: SnakeId) -> Rc<RefCell<Snake>> {
        self.snakes[id.index()].clone()
    }

    pub fn snakes(&self) -> &[Rc<RefCell<Snake>>; 2] {
        &self.snakes
    }

    /// Every id this map registered: itself, the snakes, then the walls.
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.registered
            .iter()
            .copied()
            .chain(self.walls.iter().map(|(id, _)| *id))
            .collect()
    }

    pub fn set_direction(&self, id: SnakeId, direction: Direction) {
        self.snakes[id.index()].borrow_mut().set_direction(direction);
    }

    /// Whether a head may enter `cell` this turn.
    pub fn check_valid_cell(&self, cell: &Cell) -> bool {
        self.is_free(cell, self.vacating_tails())
    }

    /// Which snakes would free their tail cell by stepping now.
    fn vacating_tails(&self) -> [bool; 2] {
        [0, 1].map(|i| self.snakes[i].borrow().vacates_tail_next_step())
    }

    /// In bounds, not a wall, and not on a snake. A snake's tail only counts
    /// as free when its flag in `vacating` is set.
    fn is_free(&self, cell: &Cell, vacating: [bool; 2]) -> bool {
        if cell.row < 0 || cell.row >= self.rows() || cell.col < 0 || cell.col >= self.cols() {
            return false;
        }
        if self.is_wall(cell.row, cell.col) {
            return false;
        }
        !self.snakes.iter().zip(vacating).any(|(snake, tail_free)| {
            let snake = snake.borrow();
            let on = |segment: &Cell| segment.same_position(cell);
            if tail_free {
                snake.blocking_cells().any(on)
            } else {
                snake.body().iter().any(on)
            }
        })
    }

    pub fn all_snakes_ready(&self) -> bool {
        self.snakes.iter().all(|s| s.borrow().is_ready())
    }

    /// Resolve one simultaneous turn. Does nothing unless every snake is
    /// ready. Returns the snakes' statuses afterwards.
    pub fn advance_turn(&mut self) -> [SnakeStatus; 2] {
        if !self.all_snakes_ready() {
            return self.statuses();
        }

        let candidates: [Option<Cell>; 2] =
            [0, 1].map(|i| self.snakes[i].borrow().candidate());
        let head_on = matches!(candidates, [Some(a), Some(b)] if a.same_position(&b));

        // A tail only frees up if its owner survives the turn. Dropping a
        // flag can only turn verdicts false, so this settles within a few
        // rounds.
        let mut vacating = self.vacating_tails();
        let verdicts = loop {
            let verdicts: [bool; 2] = if head_on {
                [false, false]
            } else {
                candidates.map(|c| c.is_some_and(|c| self.is_free(&c, vacating)))
            };
            let still_vacating = [0, 1].map(|i| vacating[i] && verdicts[i]);
            if still_vacating == vacating {
                break verdicts;
            }
            vacating = still_vacating;
        };

        for (i, snake) in self.snakes.iter().enumerate() {
            if let Some(candidate) = candidates[i] {
                snake.borrow_mut().step(candidate, verdicts[i]);
            }
        }
        self.turn += 1;

        let statuses = self.statuses();
        debug!("Turn {} resolved: {:?}", self.turn, statuses);

        let outcome = self.outcome();
        if outcome != MatchOutcome::Ongoing && self.outcome == MatchOutcome::Ongoing {
            info!("Match decided on turn {}: {:?}", self.turn, outcome);
        }
        self.outcome = outcome;
        statuses
    }

    pub fn statuses(&self) -> [SnakeStatus; 2] {
        [0, 1].map(|i| self.snakes[i].borrow().status())
    }

    pub fn outcome(&self) -> MatchOutcome {
        let [a, b] = self.statuses().map(|s| s == SnakeStatus::Dead);
        match (a, b) {
            (false, false) => MatchOutcome::Ongoing,
            (true, true) => MatchOutcome::Draw,
            (true, false) => MatchOutcome::Winner(SnakeId::B),
            (false, true) => MatchOutcome::Winner(SnakeId::A),
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        let size = self.cell_size;
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                let color = if (r + c) % 2 == 0 {
                    EVEN_TILE_COLOR
                } else {
                    ODD_TILE_COLOR
                };
                surface.set_fill_color(color);
                surface.fill_rect(c as f32 * size, r as f32 * size, size, size);
            }
        }
    }
}

impl Tickable for GameMap {
    fn start(&mut self, ctx: &mut FrameContext<'_>) {
        self.cell_size = ctx.viewport.cell_size(self.rows(), self.cols());
        info!(
            "Match started on a {}x{} map, cell size {}px",
            self.rows(),
            self.cols(),
            self.cell_size
        );
    }

    fn update(&mut self, _dt: f32, ctx: &mut FrameContext<'_>) {
        self.cell_size = ctx.viewport.cell_size(self.rows(), self.cols());
        if self.all_snakes_ready() {
            self.advance_turn();
        }
        self.render(ctx.surface);
    }

    /// Drops the wall handles and forgets every registered id.
    fn on_destroy(&mut self) {
        debug!("Map removed after {} turns", self.turn);
        self.walls.clear();
        self.wall_cells.clear();
        self.registered.clear();
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::rng::ScriptedSource;
    use crate::systems::scheduler::Scheduler;

    fn small_map(scheduler: &mut Scheduler) -> Rc<RefCell<GameMap>> {
        let config = MapConfig {
            rows: 9,
            cols: 9,
            inner_walls: 1,
            snake_speed: 5.0,
        };
        let mut rng = ScriptedSource::new(vec![4, 3]);
        GameMap::spawn(scheduler, config, &mut rng).unwrap()
    }

    #[test]
    fn test_spawn_registers_map_snakes_then_walls() {
        let mut scheduler = Scheduler::new();
        let map = small_map(&mut scheduler);
        let m = map.borrow();
        assert_eq!(m.wall_count(), 34);
        assert_eq!(scheduler.len(), 3 + 34);
        assert_eq!(scheduler.ids().collect::<Vec<_>>(), m.object_ids());
    }

    #[test]
    fn test_check_valid_cell_bounds_and_walls() {
        let mut scheduler = Scheduler::new();
        let map = small_map(&mut scheduler);
        let m = map.borrow();
        assert!(!m.check_valid_cell(&Cell::new(-1, 3)));
        assert!(!m.check_valid_cell(&Cell::new(3, 9)));
        assert!(!m.check_valid_cell(&Cell::new(0, 4)));
        assert!(!m.check_valid_cell(&Cell::new(4, 3)));
        assert!(!m.check_valid_cell(&Cell::new(4, 5)));
        assert!(m.check_valid_cell(&Cell::new(4, 4)));
        // Snake heads block.
        assert!(!m.check_valid_cell(&Cell::new(7, 1)));
        assert!(!m.check_valid_cell(&Cell::new(1, 7)));
    }

    #[test]
    fn test_advance_turn_requires_both_ready() {
        let mut scheduler = Scheduler::new();
        let map = small_map(&mut scheduler);
        map.borrow().set_direction(SnakeId::A, Direction::Right);
        assert!(!map.borrow().all_snakes_ready());
        let statuses = map.borrow_mut().advance_turn();
        assert_eq!(statuses, [SnakeStatus::Idle, SnakeStatus::Idle]);
        assert_eq!(map.borrow().turn(), 0);
    }

    fn settle(map: &Rc<RefCell<GameMap>>) {
        for snake in map.borrow().snakes() {
            snake.borrow_mut().advance(1.0);
            snake.borrow_mut().advance(1.0);
        }
    }

    #[test]
    fn test_head_on_into_same_cell_kills_both() {
        let mut scheduler = Scheduler::new();
        let config = MapConfig {
            rows: 5,
            cols: 5,
            inner_walls: 0,
            snake_speed: 5.0,
        };
        let mut rng = ScriptedSource::new(vec![0]);
        let map = GameMap::spawn(&mut scheduler, config, &mut rng).unwrap();

        // A (3, 1) -> (3, 2), B (1, 3) -> (2, 3).
        map.borrow().set_direction(SnakeId::A, Direction::Right);
        map.borrow().set_direction(SnakeId::B, Direction::Down);
        let statuses = map.borrow_mut().advance_turn();
        assert_eq!(statuses, [SnakeStatus::Moving, SnakeStatus::Moving]);
        settle(&map);
        assert!(!map.borrow().all_snakes_ready());

        // Both aim for (2, 2).
        map.borrow().set_direction(SnakeId::A, Direction::Up);
        map.borrow().set_direction(SnakeId::B, Direction::Left);
        let statuses = map.borrow_mut().advance_turn();
        assert_eq!(statuses, [SnakeStatus::Dead, SnakeStatus::Dead]);
        assert_eq!(map.borrow().outcome(), MatchOutcome::Draw);
        assert_eq!(map.borrow().turn(), 2);
    }

    #[test]
    fn test_single_death_names_winner() {
        let mut scheduler = Scheduler::new();
        let map = small_map(&mut scheduler);
        // A at (7, 1) runs into the left border; B moves freely.
        map.borrow().set_direction(SnakeId::A, Direction::Left);
        map.borrow().set_direction(SnakeId::B, Direction::Left);
        let statuses = map.borrow_mut().advance_turn();
        assert_eq!(statuses, [SnakeStatus::Dead, SnakeStatus::Moving]);
        assert_eq!(map.borrow().outcome(), MatchOutcome::Winner(SnakeId::B));
    }

    /// Move `snake` directly, bypassing the map's verdict.
    fn walk(snake: &Rc<RefCell<Snake>>, moves: &[(Direction, usize)]) {
        let mut snake = snake.borrow_mut();
        for &(direction, count) in moves {
            for _ in 0..count {
                snake.set_direction(direction);
                let candidate = snake.candidate().unwrap();
                snake.step(candidate, true);
                snake.advance(1.0);
                snake.advance(1.0);
            }
        }
    }

    /// A is 12 long with its tail on (6, 2) and its head on (1, 4); B's head
    /// sits on (7, 2), right below that tail.
    fn tail_chase_map(scheduler: &mut Scheduler) -> Rc<RefCell<GameMap>> {
        let config = MapConfig {
            rows: 9,
            cols: 9,
            inner_walls: 0,
            snake_speed: 5.0,
        };
        let map = GameMap::spawn(scheduler, config, &mut ScriptedSource::new(vec![0])).unwrap();
        let (a, b) = {
            let m = map.borrow();
            (m.snake(SnakeId::A), m.snake(SnakeId::B))
        };
        use Direction::*;
        walk(&a, &[(Up, 1), (Right, 5), (Up, 5), (Left, 2)]);
        walk(&b, &[(Down, 6), (Left, 5)]);
        assert_eq!(a.borrow().len(), 12);
        assert!(a.borrow().tail().same_position(&Cell::new(6, 2)));
        assert!(b.borrow().head().same_position(&Cell::new(7, 2)));
        map
    }

    #[test]
    fn test_other_snake_may_take_a_vacating_tail() {
        let mut scheduler = Scheduler::new();
        let map = tail_chase_map(&mut scheduler);
        assert!(map.borrow().check_valid_cell(&Cell::new(6, 2)));

        map.borrow().set_direction(SnakeId::A, Direction::Left);
        map.borrow().set_direction(SnakeId::B, Direction::Up);
        let statuses = map.borrow_mut().advance_turn();
        assert_eq!(statuses, [SnakeStatus::Moving, SnakeStatus::Moving]);
    }

    #[test]
    fn test_dying_snake_keeps_its_tail() {
        let mut scheduler = Scheduler::new();
        let map = tail_chase_map(&mut scheduler);

        // A runs into the top border, so its tail on (6, 2) stays put.
        map.borrow().set_direction(SnakeId::A, Direction::Up);
        map.borrow().set_direction(SnakeId::B, Direction::Up);
        let statuses = map.borrow_mut().advance_turn();
        assert_eq!(statuses, [SnakeStatus::Dead, SnakeStatus::Dead]);
        assert_eq!(map.borrow().outcome(), MatchOutcome::Draw);

        let a = map.borrow().snake(SnakeId::A);
        let b = map.borrow().snake(SnakeId::B);
        let a_tail = *a.borrow().tail();
        assert!(!b.borrow().head().same_position(&a_tail));
    }

    #[test]
    fn test_render_checkerboard() {
        let mut scheduler = Scheduler::new();
        let map = small_map(&mut scheduler);
        let mut surface = crate::resources::drawsurface::RecordingSurface::new();
        map.borrow().render(&mut surface);
        assert_eq!(surface.calls.len(), 81);
        assert_eq!(surface.count_with_color(EVEN_TILE_COLOR), 41);
        assert_eq!(surface.count_with_color(ODD_TILE_COLOR), 40);
    }
}
