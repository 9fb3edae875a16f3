use std::cell::RefCell;
use std::rc::Weak;

use crate::entities::gamemap::GameMap;
use crate::resources::drawsurface::{Color, DrawSurface};
use crate::systems::scheduler::{FrameContext, Tickable};

pub const WALL_COLOR: Color = Color::from_hex(0xB37226);

/// Static obstacle occupying one grid cell.
///
/// Only reads the owning map for its current cell size.
#[derive(Debug)]
pub struct Wall {
    row: i32,
    col: i32,
    map: Weak<RefCell<GameMap>>,
}

impl Wall {
    pub fn new(row: i32, col: i32, map: Weak<RefCell<GameMap>>) -> Self {
        Wall { row, col, map }
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    pub fn col(&self) -> i32 {
        self.col
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, cell_size: f32) {
        surface.set_fill_color(WALL_COLOR);
        surface.fill_rect(
            self.col as f32 * cell_size,
            self.row as f32 * cell_size,
            cell_size,
            cell_size,
        );
    }
}

impl Tickable for Wall {
    fn update(&mut self, _dt: f32, ctx: &mut FrameContext<'_>) {
        let cell_size = self
            .map
            .upgrade()
            .expect("wall outlived its game map")
            .borrow()
            .cell_size();
        self.render(ctx.surface, cell_size);
    }

    fn name(&self) -> &'static str {
        "wall"
    }
}
