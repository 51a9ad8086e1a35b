// flat list of filled rectangles produced by a generate call
// and the rasterizer that turns it into an RGBA pixel buffer

use bevy::color::ColorToPacked;
use bevy::prelude::*;
use image::{Rgba, RgbaImage};

/// What a primitive belongs to, with the layer it was emitted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Sky,
    Building { layer: usize },
    Window { layer: usize },
    RoofLight { layer: usize },
}

/// A filled rectangle covering `[x0, x1) x [y0, y1)`.
///
/// Coordinates may fall outside the canvas, the rasterizer clips them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub color: Srgba,
    pub kind: PrimitiveKind,
}

impl RasterRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32, color: Srgba, kind: PrimitiveKind) -> Self {
        Self { x0, y0, x1, y1, color, kind }
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Painter-ordered output of [`CityState::generate`](super::state::CityState::generate).
#[derive(Clone, Debug, Default)]
pub struct RasterDescription {
    pub width: u32,
    pub height: u32,
    pub primitives: Vec<RasterRect>,
}

impl RasterDescription {
    pub fn of_kind(&self, kind: PrimitiveKind) -> impl Iterator<Item = &RasterRect> {
        self.primitives.iter().filter(move |rect| rect.kind == kind)
    }

    pub fn count(&self, kind: PrimitiveKind) -> usize {
        self.of_kind(kind).count()
    }
}

/// Fill every primitive in order onto an opaque buffer of the described size.
pub fn rasterize(description: &RasterDescription) -> RgbaImage {
    let width = description.width;
    let height = description.height;
    let mut buffer = RgbaImage::new(width, height);

    for rect in &description.primitives {
        let x0 = rect.x0.clamp(0, width as i32) as u32;
        let x1 = rect.x1.clamp(0, width as i32) as u32;
        let y0 = rect.y0.clamp(0, height as i32) as u32;
        let y1 = rect.y1.clamp(0, height as i32) as u32;

        let [r, g, b, _] = rect.color.to_u8_array();
        let pixel = Rgba([r, g, b, 255]);

        for y in y0..y1 {
            for x in x0..x1 {
                buffer.put_pixel(x, y, pixel);
            }
        }
    }

    buffer
}
