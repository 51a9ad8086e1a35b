// handles per-building window patterns
// style and every lit/unlit bit are decided once per building id and kept

use std::collections::HashMap;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::color::WindowColors;
use super::layout::{Building, BuildingId};
use super::raster::{PrimitiveKind, RasterRect};
use crate::config::*;
use crate::error::CityError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowStyle {
    Normal,
    Wide,
    Tall,
    TallInverse,
}

impl WindowStyle {
    // same order as the weights in config
    pub const ALL: [WindowStyle; 4] = [
        WindowStyle::Normal,
        WindowStyle::Wide,
        WindowStyle::Tall,
        WindowStyle::TallInverse,
    ];
}

/// Weighted choice over [`WindowStyle::ALL`].
#[derive(Clone, Debug)]
pub struct WindowStyleTable {
    index: WeightedIndex<f32>,
}

impl WindowStyleTable {
    pub fn new(weights: [f32; 4]) -> Result<Self, CityError> {
        Ok(Self {
            index: WeightedIndex::new(weights)?,
        })
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> WindowStyle {
        WindowStyle::ALL[self.index.sample(rng)]
    }
}

/// Lit state per window slot. Wide buildings only have rows.
#[derive(Clone, Debug, PartialEq)]
pub enum WindowSlots {
    Bands(Vec<bool>),
    Grid(Vec<Vec<bool>>),
}

impl WindowSlots {
    fn empty(style: WindowStyle) -> Self {
        match style {
            WindowStyle::Wide => WindowSlots::Bands(Vec::new()),
            _ => WindowSlots::Grid(Vec::new()),
        }
    }

    // only appends missing slots, existing ones keep their value
    fn fill<R: Rng + ?Sized>(&mut self, rows: u32, cols: u32, lit_rate: f32, rng: &mut R) {
        let rows = rows as usize;
        let cols = cols as usize;

        match self {
            WindowSlots::Bands(bands) => {
                while bands.len() < rows {
                    bands.push(rng.random::<f32>() < lit_rate);
                }
            }
            WindowSlots::Grid(grid) => {
                while grid.len() < rows {
                    grid.push(Vec::new());
                }
                for row in grid.iter_mut().take(rows) {
                    while row.len() < cols {
                        row.push(rng.random::<f32>() < lit_rate);
                    }
                }
            }
        }
    }

    pub fn is_lit(&self, row: usize, col: usize) -> Option<bool> {
        match self {
            WindowSlots::Bands(bands) => bands.get(row).copied(),
            WindowSlots::Grid(grid) => grid.get(row).and_then(|r| r.get(col)).copied(),
        }
    }

    pub fn slot_count(&self) -> usize {
        match self {
            WindowSlots::Bands(bands) => bands.len(),
            WindowSlots::Grid(grid) => grid.iter().map(Vec::len).sum(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowPattern {
    pub style: WindowStyle,
    pub slots: WindowSlots,
}

pub type WindowCache = HashMap<BuildingId, WindowPattern>;

/// Window placement inside one building, offsets relative to its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowGrid {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub x_spacing: u32,
    pub y_spacing: u32,
}

// count of cells fitting `available`, never below 1
fn fit_count(available: u32, cell: u32, spacing: u32) -> u32 {
    (available / (cell + spacing)).max(1)
}

// leftover space split over count + 1 gaps so the run is centred
fn centred_spacing(available: u32, cell: u32, count: u32) -> u32 {
    available.saturating_sub(cell * count) / (count + 1)
}

impl WindowGrid {
    pub fn for_building(style: WindowStyle, width: u32, height: u32) -> Self {
        match style {
            WindowStyle::Wide => {
                let cell_width = width.saturating_sub(2 * WIDE_INSET).max(1);
                let rows = fit_count(height, WIDE_BAND_HEIGHT, WIDE_SPACING);
                Self {
                    rows,
                    cols: 1,
                    cell_width,
                    cell_height: WIDE_BAND_HEIGHT,
                    x_spacing: width.saturating_sub(cell_width) / 2,
                    y_spacing: centred_spacing(height, WIDE_BAND_HEIGHT, rows),
                }
            }
            WindowStyle::Normal | WindowStyle::Tall | WindowStyle::TallInverse => {
                let ((cell_width, cell_height), spacing) = match style {
                    WindowStyle::Normal => (NORMAL_CELL, NORMAL_SPACING),
                    _ => (TALL_CELL, TALL_SPACING),
                };
                let cols = fit_count(width, cell_width, spacing);
                let rows = fit_count(height, cell_height, spacing);
                Self {
                    rows,
                    cols,
                    cell_width,
                    cell_height,
                    x_spacing: centred_spacing(width, cell_width, cols),
                    y_spacing: centred_spacing(height, cell_height, rows),
                }
            }
        }
    }

    // top-left offset of a window slot
    pub fn slot_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (
            self.x_spacing + col * (self.cell_width + self.x_spacing),
            self.y_spacing + row * (self.cell_height + self.y_spacing),
        )
    }
}

/// Cached pattern for `building`, created on first request.
///
/// Slots the current grid needs but the pattern lacks are sampled with
/// `random < lit_rate`; slots already present are returned untouched.
pub fn windows_for<'a, R: Rng + ?Sized>(
    building: &Building,
    cache: &'a mut WindowCache,
    styles: &WindowStyleTable,
    lit_rate: f32,
    rng: &mut R,
) -> &'a WindowPattern {
    let pattern = cache.entry(building.id).or_insert_with(|| {
        let style = styles.choose(rng);
        WindowPattern {
            style,
            slots: WindowSlots::empty(style),
        }
    });

    let grid = WindowGrid::for_building(pattern.style, building.width, building.height);
    pattern.slots.fill(grid.rows, grid.cols, lit_rate, rng);

    pattern
}

/// Emits the window rectangles of one building whose roof sits at `y_top`.
pub fn push_window_rects(
    building: &Building,
    pattern: &WindowPattern,
    y_top: i32,
    colors: WindowColors,
    out: &mut Vec<RasterRect>,
) {
    let grid = WindowGrid::for_building(pattern.style, building.width, building.height);
    let kind = PrimitiveKind::Window { layer: building.layer };

    let divider = match pattern.style {
        WindowStyle::Tall => Some(TALL_DIVIDER),
        WindowStyle::TallInverse => Some(1.0 - TALL_DIVIDER),
        _ => None,
    };

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let Some(lit) = pattern.slots.is_lit(row as usize, col as usize) else {
                continue;
            };
            let color = if lit { colors.on } else { colors.off };

            let (dx, dy) = grid.slot_origin(row, col);
            let x0 = (building.x + dx) as i32;
            let y0 = y_top + dy as i32;
            let x1 = x0 + grid.cell_width as i32;
            let y1 = y0 + grid.cell_height as i32;

            match divider {
                None => out.push(RasterRect::new(x0, y0, x1, y1, color, kind)),
                Some(fraction) => {
                    // two panes with a 1px divider between them
                    let split = y0 + (grid.cell_height as f32 * fraction).round() as i32;
                    for pane in [
                        RasterRect::new(x0, y0, x1, split, color, kind),
                        RasterRect::new(x0, split + 1, x1, y1, color, kind),
                    ] {
                        if !pane.is_empty() {
                            out.push(pane);
                        }
                    }
                }
            }
        }
    }
}
