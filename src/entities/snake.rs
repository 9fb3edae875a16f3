//! Snake entity and its movement state machine.
//!
//! ```text
//!   Idle --set_direction--> Idle
//!   Idle --step(valid)----> Moving --arrival--> Idle
//!   Idle --step(invalid)--> Dead (terminal)
//! ```
//!
//! A committed step pushes a new head whose discrete cell is the target and
//! whose continuous position still sits on the previous head, then the head
//! slides toward the target at `speed` cells per second. On steps where the
//! snake does not grow, the tail slides toward its successor at the same
//! rate and is dropped on arrival.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Weak;

use log::{debug, info};

use crate::components::cell::{CELL_EPSILON, Cell};
use crate::components::direction::Direction;
use crate::entities::gamemap::GameMap;
use crate::events::input::InputError;
use crate::resources::drawsurface::{Color, DrawSurface};
use crate::systems::scheduler::{FrameContext, Tickable};

pub const DEAD_COLOR: Color = Color::WHITE;
pub const EYE_COLOR: Color = Color::BLACK;

/// Segment circle radius as a fraction of the cell size.
const BODY_RADIUS: f32 = 0.4;
/// Width of the rectangles bridging two segments.
const BRIDGE_WIDTH: f32 = 0.8;
const EYE_RADIUS: f32 = 0.05;
const EYE_SPREAD: f32 = 0.15;

/// Eye offsets from the head center, indexed by [`Direction::index`].
const EYE_OFFSETS: [[(f32, f32); 2]; 4] = [
    [(-1.0, -1.0), (1.0, -1.0)],
    [(1.0, -1.0), (1.0, 1.0)],
    [(1.0, 1.0), (-1.0, 1.0)],
    [(-1.0, -1.0), (-1.0, 1.0)],
];

/// Which of the two players a snake belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakeId {
    A,
    B,
}

impl SnakeId {
    pub const ALL: [SnakeId; 2] = [SnakeId::A, SnakeId::B];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn color(self) -> Color {
        match self {
            SnakeId::A => Color::from_hex(0x4876EC),
            SnakeId::B => Color::from_hex(0xF94848),
        }
    }

    /// Where the eyes look before the first move.
    pub fn initial_eye_direction(self) -> Direction {
        match self {
            SnakeId::A => Direction::Up,
            SnakeId::B => Direction::Down,
        }
    }
}

impl TryFrom<u8> for SnakeId {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SnakeId::ALL
            .get(value as usize)
            .copied()
            .ok_or(InputError::UnknownSnake(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeStatus {
    /// Settled and ready for the next turn.
    Idle,
    /// Sliding toward a committed target cell.
    Moving,
    /// Terminal; the body stays for rendering.
    Dead,
}

/// Growth law: every step up to the tenth, then one step in three.
pub fn grows_on_step(step: u32) -> bool {
    step <= 10 || step % 3 == 1
}

#[derive(Debug)]
pub struct Snake {
    id: SnakeId,
    color: Color,
    body: VecDeque<Cell>,
    pending_direction: Option<Direction>,
    status: SnakeStatus,
    eye_direction: Direction,
    step_count: u32,
    speed: f32,
    target: Option<Cell>,
    map: Weak<RefCell<GameMap>>,
}

impl Snake {
    pub fn new(id: SnakeId, start: Cell, speed: f32, map: Weak<RefCell<GameMap>>) -> Self {
        Snake {
            id,
            color: id.color(),
            body: VecDeque::from([Cell::new(start.row, start.col)]),
            pending_direction: None,
            status: SnakeStatus::Idle,
            eye_direction: id.initial_eye_direction(),
            step_count: 0,
            speed,
            target: None,
            map,
        }
    }

    pub fn id(&self) -> SnakeId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> &Cell {
        self.body.front().expect("snake body should never be empty")
    }

    pub fn tail(&self) -> &Cell {
        self.body.back().expect("snake body should never be empty")
    }

    pub fn status(&self) -> SnakeStatus {
        self.status
    }

    pub fn is_dead(&self) -> bool {
        self.status == SnakeStatus::Dead
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn eye_direction(&self) -> Direction {
        self.eye_direction
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target(&self) -> Option<Cell> {
        self.target
    }

    /// Record the direction for the next turn; the latest call wins.
    ///
    /// Directions sent while a move animates are kept for the next turn.
    /// Dead snakes ignore input.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.is_dead() {
            debug!("Ignoring {} for dead snake {:?}", direction, self.id);
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Ready to take part in a turn.
    pub fn is_ready(&self) -> bool {
        self.status == SnakeStatus::Idle && self.pending_direction.is_some()
    }

    /// The cell the head would move to with the pending direction.
    pub fn candidate(&self) -> Option<Cell> {
        self.pending_direction.map(|d| self.head().step(d))
    }

    /// Whether the tail is kept on the step currently counted.
    pub fn should_grow_tail(&self) -> bool {
        grows_on_step(self.step_count)
    }

    /// Whether the tail cell frees up during the next committed step.
    ///
    /// Only an idle snake is about to step; a moving snake keeps its tail
    /// until it arrives.
    pub fn vacates_tail_next_step(&self) -> bool {
        self.status == SnakeStatus::Idle && !grows_on_step(self.step_count + 1)
    }

    /// Cells a new head must avoid, given the tail rule above.
    pub fn blocking_cells(&self) -> impl Iterator<Item = &Cell> {
        let skip_tail = usize::from(self.vacates_tail_next_step() && self.body.len() > 1);
        self.body.iter().take(self.body.len() - skip_tail)
    }

    /// Commit the pending direction toward `candidate`.
    ///
    /// `valid` is the map's verdict on `candidate`. The body shifts forward
    /// either way; an invalid move leaves the snake [`SnakeStatus::Dead`] with
    /// its head where it was.
    pub fn step(&mut self, candidate: Cell, valid: bool) -> SnakeStatus {
        debug_assert!(!self.body.is_empty(), "snake body should never be empty");
        if self.status != SnakeStatus::Idle {
            return self.status;
        }
        let Some(direction) = self.pending_direction.take() else {
            return self.status;
        };

        self.eye_direction = direction;
        self.step_count += 1;
        let previous_head = *self.head();

        if valid {
            let mut head = Cell::new(candidate.row, candidate.col);
            head.x = previous_head.x;
            head.y = previous_head.y;
            self.body.push_front(head);
            self.target = Some(Cell::new(candidate.row, candidate.col));
            self.status = SnakeStatus::Moving;
        } else {
            self.body.push_front(previous_head);
            self.target = None;
            self.status = SnakeStatus::Dead;
            info!(
                "Snake {:?} died moving {} into ({}, {}) after {} steps",
                self.id, direction, candidate.row, candidate.col, self.step_count
            );
        }
        self.status
    }

    /// Slide the head (and a shrinking tail) toward the target.
    pub fn advance(&mut self, dt: f32) {
        if self.status != SnakeStatus::Moving {
            return;
        }
        let Some(target) = self.target else {
            return;
        };

        let distance = self.head().distance_to(&target);
        if distance < CELL_EPSILON {
            self.body[0] = target;
            self.target = None;
            self.status = SnakeStatus::Idle;
            if !self.should_grow_tail() {
                self.body.pop_back();
            }
            return;
        }

        let travel = (self.speed * dt).min(distance);
        let ratio = travel / distance;
        let head = &mut self.body[0];
        head.x += (target.x - head.x) * ratio;
        head.y += (target.y - head.y) * ratio;

        let len = self.body.len();
        if !self.should_grow_tail() && len >= 2 {
            let toward = if len == 2 { target } else { self.body[len - 2] };
            let tail = &mut self.body[len - 1];
            tail.x += (toward.x - tail.x) * ratio;
            tail.y += (toward.y - tail.y) * ratio;
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, cell_size: f32) {
        let color = if self.is_dead() { DEAD_COLOR } else { self.color };
        surface.set_fill_color(color);

        for cell in &self.body {
            surface.fill_circle(
                (cell.x + 0.5) * cell_size,
                (cell.y + 0.5) * cell_size,
                cell_size * BODY_RADIUS,
            );
        }

        // Bridge consecutive segments so the body reads as one piece.
        let inset = (1.0 - BRIDGE_WIDTH) / 2.0;
        for (a, b) in self.body.iter().zip(self.body.iter().skip(1)) {
            let dx = (a.x - b.x).abs();
            let dy = (a.y - b.y).abs();
            if dx < CELL_EPSILON && dy < CELL_EPSILON {
                continue;
            }
            if dx < CELL_EPSILON {
                surface.fill_rect(
                    (a.x + inset) * cell_size,
                    (a.y.min(b.y) + 0.5) * cell_size,
                    cell_size * BRIDGE_WIDTH,
                    dy * cell_size,
                );
            } else {
                surface.fill_rect(
                    (a.x.min(b.x) + 0.5) * cell_size,
                    (a.y + inset) * cell_size,
                    dx * cell_size,
                    cell_size * BRIDGE_WIDTH,
                );
            }
        }

        let head = self.head();
        let (cx, cy) = ((head.x + 0.5) * cell_size, (head.y + 0.5) * cell_size);
        surface.set_fill_color(EYE_COLOR);
        for (ex, ey) in EYE_OFFSETS[self.eye_direction.index()] {
            surface.fill_circle(
                cx + ex * cell_size * EYE_SPREAD,
                cy + ey * cell_size * EYE_SPREAD,
                cell_size * EYE_RADIUS,
            );
        }
    }

    fn map_cell_size(&self) -> f32 {
        self.map
            .upgrade()
            .expect("snake outlived its game map")
            .borrow()
            .cell_size()
    }
}

impl Tickable for Snake {
    fn update(&mut self, dt: f32, ctx: &mut FrameContext<'_>) {
        self.advance(dt);
        let cell_size = self.map_cell_size();
        self.render(ctx.surface, cell_size);
    }

    fn on_destroy(&mut self) {
        debug!(
            "Snake {:?} removed at length {} ({:?})",
            self.id,
            self.body.len(),
            self.status
        );
    }

    fn name(&self) -> &'static str {
        "snake"
    }
}
