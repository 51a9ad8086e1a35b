// handles roof beacon placement
// decided once per building id, only ever granted while the sky is dark

use std::collections::HashMap;

use bevy::prelude::*;
use rand::Rng;

use super::layout::{Building, BuildingId};
use super::raster::{PrimitiveKind, RasterRect};
use crate::systems::city::CityParams;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoofLightInfo {
    pub has_lights: bool,
    pub positions: Vec<u32>, // x offsets from the building's left wall
}

pub type RoofLightCache = HashMap<BuildingId, RoofLightInfo>;

/// Evenly centred light offsets along a roof of `width` pixels.
pub fn light_positions(width: u32, size: u32, spacing: u32) -> Vec<u32> {
    if width < size {
        return Vec::new();
    }

    let step = size + spacing;
    let count = (width - size) / step + 1;
    let span = count * size + (count - 1) * spacing;
    let start = (width - span) / 2;

    (0..count).map(|i| start + i * step).collect()
}

/// Cached beacon decision for `building`.
///
/// The first call freezes the record. A building first seen under a light
/// sky keeps an empty record even if the sky later turns dark.
pub fn roof_lights_for<'a, R: Rng + ?Sized>(
    building: &Building,
    is_dark: bool,
    cache: &'a mut RoofLightCache,
    params: &CityParams,
    rng: &mut R,
) -> &'a RoofLightInfo {
    cache.entry(building.id).or_insert_with(|| {
        if !is_dark || rng.random::<f32>() >= params.roof_light_chance {
            return RoofLightInfo::default();
        }

        RoofLightInfo {
            has_lights: true,
            positions: light_positions(building.width, params.roof_light_size, params.roof_light_spacing),
        }
    })
}

/// One square per light, sitting just above the roof line at `y_top`.
pub fn push_roof_light_rects(
    building: &Building,
    info: &RoofLightInfo,
    y_top: i32,
    size: u32,
    beacon: Srgba,
    out: &mut Vec<RasterRect>,
) {
    if !info.has_lights {
        return;
    }

    let kind = PrimitiveKind::RoofLight { layer: building.layer };
    let y1 = y_top - 1;
    let y0 = y1 - size as i32;

    for &offset in &info.positions {
        let x0 = (building.x + offset) as i32;
        out.push(RasterRect::new(x0, y0, x0 + size as i32, y1, beacon, kind));
    }
}
