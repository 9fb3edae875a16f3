//! Raylib backend for [`DrawSurface`].
use raylib::prelude::*;

use crate::resources::drawsurface::{Color as FillColor, DrawSurface};

/// Draws filled shapes through an open raylib drawing scope.
pub struct RaylibSurface<'a, 'b> {
    d: &'a mut RaylibDrawHandle<'b>,
    fill: Color,
}

impl<'a, 'b> RaylibSurface<'a, 'b> {
    pub fn new(d: &'a mut RaylibDrawHandle<'b>) -> Self {
        RaylibSurface {
            d,
            fill: Color::WHITE,
        }
    }
}

impl DrawSurface for RaylibSurface<'_, '_> {
    fn set_fill_color(&mut self, color: FillColor) {
        self.fill = Color::new(color.r, color.g, color.b, color.a);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.d.draw_rectangle_rec(Rectangle::new(x, y, w, h), self.fill);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.d.draw_circle_v(Vector2::new(cx, cy), r, self.fill);
    }
}
