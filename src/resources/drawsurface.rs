//! Drawing surface abstraction.
//!
//! The simulation never talks to a graphics backend directly. Objects draw
//! through [`DrawSurface`], which only knows about a fill color, filled
//! rectangles and filled circles. The windowed binary backs it with raylib
//! (see `systems::render`), tests back it with [`RecordingSurface`].

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xFF }
    }

    /// Build an opaque color from `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Color::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

/// Size of the area the map has to fit in, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    /// Side of a square cell so that `rows x cols` cells fit, rounded down to
    /// whole pixels.
    pub fn cell_size(&self, rows: i32, cols: i32) -> f32 {
        if rows <= 0 || cols <= 0 {
            return 0.0;
        }
        (self.width / cols as f32)
            .min(self.height / rows as f32)
            .floor()
            .max(0.0)
    }
}

/// Minimal 2D fill API consumed by the simulation objects.
pub trait DrawSurface {
    fn set_fill_color(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32);
}

/// One recorded draw operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCall {
    Rect {
        color: Color,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    Circle {
        color: Color,
        cx: f32,
        cy: f32,
        r: f32,
    },
}

impl DrawCall {
    pub fn color(&self) -> Color {
        match self {
            DrawCall::Rect { color, .. } | DrawCall::Circle { color, .. } => *color,
        }
    }
}

/// Surface that keeps every call, for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    fill: Option<Color>,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count_with_color(&self, color: Color) -> usize {
        self.calls.iter().filter(|c| c.color() == color).count()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
    }
}

impl DrawSurface for RecordingSurface {
    fn set_fill_color(&mut self, color: Color) {
        self.fill = Some(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let color = self.fill.unwrap_or(Color::BLACK);
        self.calls.push(DrawCall::Rect { color, x, y, w, h });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        let color = self.fill.unwrap_or(Color::BLACK);
        self.calls.push(DrawCall::Circle { color, cx, cy, r });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex(0x4876EC), Color::rgb(0x48, 0x76, 0xEC));
        assert_eq!(Color::from_hex(0xFFFFFF), Color::WHITE);
    }

    #[test]
    fn test_cell_size_fits_smaller_axis_and_floors() {
        let vp = Viewport::new(1000.0, 500.0);
        assert_eq!(vp.cell_size(13, 14), 38.0);
        let vp = Viewport::new(140.0, 1000.0);
        assert_eq!(vp.cell_size(13, 14), 10.0);
        assert_eq!(vp.cell_size(0, 14), 0.0);
    }

    #[test]
    fn test_recording_surface_uses_last_fill_color() {
        let mut s = RecordingSurface::new();
        s.set_fill_color(Color::WHITE);
        s.fill_rect(0.0, 0.0, 1.0, 1.0);
        s.set_fill_color(Color::BLACK);
        s.fill_circle(1.0, 1.0, 0.5);
        assert_eq!(s.count_with_color(Color::WHITE), 1);
        assert_eq!(s.circles().count(), 1);
    }
}
