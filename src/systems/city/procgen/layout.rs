// handles building layout generation
// each layer is a left-to-right run of footprints that can only grow rightward

use rand::Rng;

use crate::systems::city::CityParams;

/// Identity of a building, derived from its frozen geometry.
/// Used directly as the key of the window and roof light caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingId {
    pub layer: usize,
    pub x: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub x: u32,
    pub width: u32,
    pub height: u32,
    pub gap: u32,
    pub layer: usize,
    pub id: BuildingId,
}

impl Building {
    pub fn new(x: u32, width: u32, height: u32, gap: u32, layer: usize) -> Self {
        Self {
            x,
            width,
            height,
            gap,
            layer,
            id: BuildingId { layer, x, width, height },
        }
    }

    // start of the next building
    pub fn right_edge(&self) -> u32 {
        self.x + self.width + self.gap
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildingLayer {
    pub index: usize,
    pub buildings: Vec<Building>,
}

impl BuildingLayer {
    pub fn right_edge(&self) -> u32 {
        self.buildings.last().map_or(0, Building::right_edge)
    }
}

/// Height cap shared by every layer for a given canvas height.
/// Never above `absolute_max_building_height`, whatever the canvas size.
pub fn max_building_height(canvas_height: u32, params: &CityParams) -> u32 {
    canvas_height
        .saturating_sub(params.min_top_clearance + params.ground_reserve)
        .max(params.min_height_cap)
        .min(params.absolute_max_building_height)
}

// inclusive height bounds for one layer
// minimum grows toward the front, front layer may overshoot the cap
fn height_range(max_height: u32, layer_index: usize, params: &CityParams) -> (u32, u32) {
    let is_front = layer_index + 1 >= params.layer_count;

    let grown = params.layer_height_base + layer_index as u32 * params.layer_height_step;
    let low = grown
        .max(params.min_building_height)
        .min(max_height.saturating_sub(10));

    let high = if is_front {
        (max_height + params.front_layer_overshoot).min(params.absolute_max_building_height.max(max_height))
    } else {
        max_height
    };

    (low.min(high), high)
}

fn sample_building<R: Rng + ?Sized>(
    x: u32,
    max_height: u32,
    layer_index: usize,
    params: &CityParams,
    rng: &mut R,
) -> Building {
    let width = rng.random_range(params.building_width_min..=params.building_width_max);
    let (low, high) = height_range(max_height, layer_index, params);
    let height = rng.random_range(low..=high);
    let gap = rng.random_range(params.gap_min..=params.gap_max);

    Building::new(x, width, height, gap, layer_index)
}

// appends buildings from `cursor` until the cursor reaches `target_width`
fn fill_to<R: Rng + ?Sized>(
    buildings: &mut Vec<Building>,
    mut cursor: u32,
    target_width: u32,
    max_height: u32,
    layer_index: usize,
    params: &CityParams,
    rng: &mut R,
) -> usize {
    let before = buildings.len();

    while cursor < target_width {
        let building = sample_building(cursor, max_height, layer_index, params, rng);
        cursor = building.right_edge();
        buildings.push(building);
    }

    buildings.len() - before
}

/// Fills `canvas_width` with buildings. The last one may stick out past
/// the canvas, it is clipped when drawn, never shrunk.
pub fn generate_layer<R: Rng + ?Sized>(
    canvas_width: u32,
    max_height: u32,
    layer_index: usize,
    params: &CityParams,
    rng: &mut R,
) -> BuildingLayer {
    let mut buildings = Vec::new();
    fill_to(&mut buildings, 0, canvas_width, max_height, layer_index, params, rng);

    BuildingLayer {
        index: layer_index,
        buildings,
    }
}

/// Grows a layer to cover `new_width`, existing buildings are never touched.
/// Returns how many buildings were appended.
pub fn extend_layer<R: Rng + ?Sized>(
    layer: &mut BuildingLayer,
    old_width: u32,
    new_width: u32,
    max_height: u32,
    params: &CityParams,
    rng: &mut R,
) -> usize {
    if new_width <= old_width {
        return 0;
    }

    let cursor = layer.right_edge();
    fill_to(&mut layer.buildings, cursor, new_width, max_height, layer.index, params, rng)
}
