//! Rendering surface contract and an in-memory implementation.
//!
//! The game draws onto two layers: [`Layer::Grid`] holds the board (grid
//! lines, captured and crashed cells) and [`Layer::Cuts`] holds player trails
//! and loop markers. Drawing is fire-and-forget; nothing in a step waits on a
//! surface.
//!
//! [`Canvas`] keeps one RGBA pixel buffer per layer so drawing is observable
//! without a graphics API. [`NullSurface`] discards everything.

use glam::UVec2;
use lattice::{Grid, Rect};
use serde::{Deserialize, Serialize};

/// Visual layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Board background, grid lines and cell fills
    Grid,
    /// Player trails and markers
    Cuts,
}

impl Layer {
    /// Every layer, bottom first.
    pub const ALL: [Layer; 2] = [Layer::Grid, Layer::Cuts];

    const fn index(self) -> usize {
        match self {
            Self::Grid => 0,
            Self::Cuts => 1,
        }
    }
}

/// An RGBA color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Board background.
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    /// Grid lines.
    pub const GREY: Self = Self::rgb(100, 100, 100);
    /// Captured cells.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Crashed cells.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Player trails.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Loop junction markers.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Drawing operations the game issues.
///
/// Batches bracket a group of operations on one layer so implementations
/// backed by a real framebuffer can upload once per batch.
pub trait RenderSurface {
    /// Opens a batch on `layer`.
    fn begin_batch(&mut self, _layer: Layer) {}

    /// Closes a batch on `layer`.
    fn end_batch(&mut self, _layer: Layer) {}

    /// Draws an axis-aligned line, endpoints inclusive.
    fn draw_line(&mut self, layer: Layer, from: UVec2, to: UVec2, color: Color);

    /// Fills a rectangle.
    fn fill_rect(&mut self, layer: Layer, rect: Rect, color: Color);

    /// Marks a point.
    fn draw_point(&mut self, layer: Layer, at: UVec2, color: Color);

    /// Resets a layer to transparent.
    fn clear(&mut self, layer: Layer);
}

/// A surface that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn draw_line(&mut self, _layer: Layer, _from: UVec2, _to: UVec2, _color: Color) {}

    fn fill_rect(&mut self, _layer: Layer, _rect: Rect, _color: Color) {}

    fn draw_point(&mut self, _layer: Layer, _at: UVec2, _color: Color) {}

    fn clear(&mut self, _layer: Layer) {}
}

/// In-memory RGBA buffers, one per layer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    layers: [Vec<Color>; 2],
    batches: [usize; 2],
}

impl Canvas {
    /// Creates a transparent canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            layers: [
                vec![Color::TRANSPARENT; len],
                vec![Color::TRANSPARENT; len],
            ],
            batches: [0; 2],
        }
    }

    /// Canvas sized to cover every vertex of `grid`, boundary included.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        let size = grid.pixel_size() + UVec2::ONE;
        Self::new(size.x, size.y)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at a pixel, or `None` outside the canvas.
    #[must_use]
    pub fn pixel_at(&self, layer: Layer, x: u32, y: u32) -> Option<Color> {
        self.offset(x, y).map(|i| self.layers[layer.index()][i])
    }

    /// Number of pixels on `layer` painted exactly `color`.
    #[must_use]
    pub fn count(&self, layer: Layer, color: Color) -> usize {
        self.layers[layer.index()]
            .iter()
            .filter(|pixel| **pixel == color)
            .count()
    }

    /// Batches completed on `layer`.
    #[must_use]
    pub fn batches(&self, layer: Layer) -> usize {
        self.batches[layer.index()]
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    fn set(&mut self, layer: Layer, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.layers[layer.index()][i] = color;
        }
    }
}

impl RenderSurface for Canvas {
    fn end_batch(&mut self, layer: Layer) {
        self.batches[layer.index()] += 1;
    }

    fn draw_line(&mut self, layer: Layer, from: UVec2, to: UVec2, color: Color) {
        let min = from.min(to);
        let max = from.max(to);
        if from.y == to.y {
            for x in min.x..=max.x {
                self.set(layer, x, from.y, color);
            }
        } else {
            for y in min.y..=max.y {
                self.set(layer, from.x, y, color);
            }
        }
    }

    fn fill_rect(&mut self, layer: Layer, rect: Rect, color: Color) {
        let end_x = (rect.x + rect.width).min(self.width);
        let end_y = (rect.y + rect.height).min(self.height);
        for y in rect.y..end_y {
            for x in rect.x..end_x {
                self.set(layer, x, y, color);
            }
        }
    }

    fn draw_point(&mut self, layer: Layer, at: UVec2, color: Color) {
        self.set(layer, at.x, at.y, color);
        self.set(layer, at.x + 1, at.y, color);
        self.set(layer, at.x, at.y + 1, color);
        if let Some(x) = at.x.checked_sub(1) {
            self.set(layer, x, at.y, color);
        }
        if let Some(y) = at.y.checked_sub(1) {
            self.set(layer, at.x, y, color);
        }
    }

    fn clear(&mut self, layer: Layer) {
        self.layers[layer.index()].fill(Color::TRANSPARENT);
    }
}

// =============================================================================
// Board painting
// =============================================================================

/// Paints the board: green background, grey lines, captured cells black.
/// Clears the trail layer.
pub fn paint_board(grid: &Grid, surface: &mut dyn RenderSurface) {
    surface.clear(Layer::Cuts);
    surface.begin_batch(Layer::Grid);
    let size = grid.pixel_size();
    surface.fill_rect(Layer::Grid, Rect::new(0, 0, size.x + 1, size.y + 1), Color::GREEN);
    for edge in grid.edge_ids() {
        let e = grid.edge(edge);
        let from = grid.vertex(e.from()).position();
        let to = grid.vertex(e.to()).position();
        surface.draw_line(Layer::Grid, from, to, Color::GREY);
    }
    for cell in grid.cell_ids().filter(|cell| grid.cell(*cell).is_empty()) {
        surface.fill_rect(Layer::Grid, grid.cell_bounds(cell), Color::BLACK);
    }
    surface.end_batch(Layer::Grid);
}

/// Fills cells on the board layer.
pub fn paint_cells(
    grid: &Grid,
    cells: &[lattice::CellId],
    color: Color,
    surface: &mut dyn RenderSurface,
) {
    if cells.is_empty() {
        return;
    }
    surface.begin_batch(Layer::Grid);
    for cell in cells {
        surface.fill_rect(Layer::Grid, grid.cell_bounds(*cell), color);
    }
    surface.end_batch(Layer::Grid);
}
