// generative state of the city and its refresh policy
// CityState owns the palette, one layout per depth layer and the
// per-building window and roof light caches, generate is the only mutator
//
// first call: palette and full layout
// refresh_colors: new palette, layout and caches untouched
// refresh_buildings: new layout, both caches cleared, palette untouched
// no flags and a wider canvas: every layer extended rightward
// no flags and the same or a narrower canvas: nothing regenerated

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use super::color::{self, SkyColor};
use super::layout::{self, BuildingLayer};
use super::raster::{PrimitiveKind, RasterDescription, RasterRect};
use super::roof_lights::{self, RoofLightCache};
use super::sky;
use super::windows::{self, WindowCache, WindowStyleTable};
use crate::error::CityError;
use crate::systems::city::CityParams;

/// Colors chosen by a "colors" refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct CityPalette {
    pub sky: SkyColor,
    pub buildings: Vec<Srgba>, // one per layer
    pub beacon: Srgba,
}

impl CityPalette {
    fn random<R: rand::Rng + ?Sized>(params: &CityParams, rng: &mut R) -> Self {
        let sky = color::random_sky(rng, params.dark_threshold);
        let buildings = color::building_colors(sky.hue, sky.saturation, sky.brightness, params.layer_count);
        let beacon = params.beacon_palette.choose(rng).copied().unwrap_or(Srgba::WHITE);

        Self { sky, buildings, beacon }
    }

    pub fn is_dark(&self) -> bool {
        self.sky.is_dark
    }
}

#[derive(Resource)]
pub struct CityState {
    params: CityParams,
    seed: u64,
    rng: StdRng,
    styles: WindowStyleTable,
    palette: Option<CityPalette>, // None until the first generate
    layers: Vec<BuildingLayer>,
    windows: WindowCache,
    roof_lights: RoofLightCache,
    layout_width: u32,
}

impl CityState {
    pub fn new(params: CityParams, seed: u64) -> Result<Self, CityError> {
        Ok(Self {
            styles: WindowStyleTable::new(params.window_style_weights)?,
            params,
            seed,
            rng: StdRng::seed_from_u64(seed),
            palette: None,
            layers: Vec::new(),
            windows: WindowCache::new(),
            roof_lights: RoofLightCache::new(),
            layout_width: 0,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.palette.is_some()
    }

    pub fn params(&self) -> &CityParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn palette(&self) -> Option<&CityPalette> {
        self.palette.as_ref()
    }

    pub fn layers(&self) -> &[BuildingLayer] {
        &self.layers
    }

    pub fn window_cache(&self) -> &WindowCache {
        &self.windows
    }

    pub fn roof_light_cache(&self) -> &RoofLightCache {
        &self.roof_lights
    }

    // widest canvas the layout has been built or extended for
    pub fn layout_width(&self) -> u32 {
        self.layout_width
    }

    pub fn building_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.buildings.len()).sum()
    }

    fn refresh_colors(&mut self) {
        let palette = CityPalette::random(&self.params, &mut self.rng);
        info!(
            "New colors: sky hsl=({:.2}, {:.2}, {:.2}) dark={}",
            palette.sky.hue, palette.sky.saturation, palette.sky.brightness, palette.sky.is_dark
        );
        self.palette = Some(palette);
    }

    fn refresh_buildings(&mut self, width: u32, height: u32) {
        let max_height = layout::max_building_height(height, &self.params);

        self.layers = (0..self.params.layer_count)
            .map(|index| layout::generate_layer(width, max_height, index, &self.params, &mut self.rng))
            .collect();
        self.windows.clear();
        self.roof_lights.clear();
        self.layout_width = width;

        info!("New buildings: {} across {} layers for width {}", self.building_count(), self.layers.len(), width);
    }

    fn extend(&mut self, width: u32, height: u32) {
        let max_height = layout::max_building_height(height, &self.params);
        let mut added = 0;

        for layer in &mut self.layers {
            added += layout::extend_layer(layer, self.layout_width, width, max_height, &self.params, &mut self.rng);
        }

        info!("Extended layout from {} to {}: {} new buildings", self.layout_width, width, added);
        self.layout_width = width;
    }

    /// Apply the refresh policy for a `width` x `height` canvas and describe
    /// the resulting frame.
    pub fn generate(
        &mut self,
        width: u32,
        height: u32,
        refresh_colors: bool,
        refresh_buildings: bool,
    ) -> Result<RasterDescription, CityError> {
        if width == 0 || height == 0 {
            return Err(CityError::InvalidDimension { width, height });
        }

        if !self.is_initialized() {
            self.refresh_colors();
            self.refresh_buildings(width, height);
        } else {
            if refresh_colors {
                self.refresh_colors();
            }
            if refresh_buildings {
                self.refresh_buildings(width, height);
            } else if width > self.layout_width {
                self.extend(width, height);
            }
        }

        let description = self.describe(width, height);
        debug!(
            "Generated {} primitives, cached windows={} roof lights={}",
            description.primitives.len(),
            self.windows.len(),
            self.roof_lights.len()
        );

        Ok(description)
    }

    // painter-ordered primitives, lazily filling the per-building caches
    fn describe(&mut self, width: u32, height: u32) -> RasterDescription {
        let Self {
            params,
            rng,
            styles,
            palette,
            layers,
            windows: window_cache,
            roof_lights: light_cache,
            ..
        } = self;

        let Some(palette) = palette.as_ref() else {
            return RasterDescription { width, height, primitives: Vec::new() };
        };

        let mut primitives = sky::sky_gradient(palette.sky.rgb, width, height, params);
        let is_dark = palette.is_dark();
        let layer_count = layers.len();

        for layer in layers.iter() {
            let building_color = palette.buildings.get(layer.index).copied().unwrap_or(palette.sky.rgb);
            let window_colors = color::window_colors(building_color, layer.index);
            let steps_back = layer_count.saturating_sub(layer.index + 1) as i32;
            let base_y = height as i32 - steps_back * params.layer_base_step as i32;

            // the tail of a wider layout stays off-canvas
            for building in layer.buildings.iter().filter(|b| b.x < width) {
                let y_top = base_y - building.height as i32;
                let x1 = (building.x + building.width).min(width) as i32;

                primitives.push(RasterRect::new(
                    building.x as i32,
                    y_top,
                    x1,
                    height as i32,
                    building_color,
                    PrimitiveKind::Building { layer: layer.index },
                ));

                let pattern = windows::windows_for(building, window_cache, styles, params.lit_rate, rng);
                windows::push_window_rects(building, pattern, y_top, window_colors, &mut primitives);

                let lights = roof_lights::roof_lights_for(building, is_dark, light_cache, params, rng);
                // stored beacons stay inert under a light sky
                if is_dark {
                    roof_lights::push_roof_light_rects(
                        building,
                        lights,
                        y_top,
                        params.roof_light_size,
                        palette.beacon,
                        &mut primitives,
                    );
                }
            }
        }

        RasterDescription { width, height, primitives }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::procgen::layout::Building;

    fn state(seed: u64) -> CityState {
        CityState::new(CityParams::default(), seed).unwrap()
    }

    fn geometry(state: &CityState) -> Vec<Vec<Building>> {
        state.layers().iter().map(|layer| layer.buildings.clone()).collect()
    }

    // finds a seed whose first palette has the requested darkness
    fn state_with_darkness(dark: bool) -> CityState {
        for seed in 0..1000 {
            let mut state = state(seed);
            state.generate(200, 200, false, false).unwrap();
            if state.palette().map(CityPalette::is_dark) == Some(dark) {
                return state;
            }
        }
        panic!("no seed produced dark={dark}");
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let mut state = state(1);
        assert!(matches!(
            state.generate(0, 400, false, false),
            Err(CityError::InvalidDimension { width: 0, height: 400 })
        ));
        assert!(state.generate(400, 0, true, true).is_err());
        assert!(!state.is_initialized());
    }

    #[test]
    fn test_bad_params_rejected() {
        let params = CityParams {
            window_style_weights: [0.0; 4],
            ..default()
        };
        assert!(CityState::new(params, 1).is_err());
    }

    #[test]
    fn test_first_generate_initializes() {
        let mut state = state(2);
        let description = state.generate(600, 400, false, false).unwrap();

        assert!(state.is_initialized());
        assert_eq!(state.layers().len(), 4);
        assert_eq!(state.layout_width(), 600);
        assert!(!description.primitives.is_empty());
        assert_eq!(description.primitives[0].kind, PrimitiveKind::Sky);

        // every drawn building got a window pattern
        assert_eq!(state.window_cache().len(), state.building_count());
        assert_eq!(state.roof_light_cache().len(), state.building_count());
    }

    #[test]
    fn test_layer_zero_rect_count_matches_layout() {
        let mut state = state(3);
        let description = state.generate(600, 400, false, false).unwrap();

        for layer in state.layers() {
            assert_eq!(description.count(PrimitiveKind::Building { layer: layer.index }), layer.buildings.len());
        }
    }

    #[test]
    fn test_widening_extends_prefix() {
        let mut state = state(4);
        state.generate(600, 400, false, false).unwrap();
        let before = geometry(&state);
        let patterns = state.window_cache().clone();

        let description = state.generate(900, 400, false, false).unwrap();
        let after = geometry(&state);

        assert_eq!(state.layout_width(), 900);
        for (old, new) in before.iter().zip(&after) {
            assert!(new.len() >= old.len());
            assert_eq!(&new[..old.len()], &old[..]);
            for pair in new.windows(2) {
                assert!(pair[1].x > pair[0].x);
            }
        }
        assert!(after[0].len() > before[0].len());
        assert_eq!(description.count(PrimitiveKind::Building { layer: 0 }), after[0].len());

        // old buildings keep their windows
        for (id, pattern) in &patterns {
            assert_eq!(state.window_cache().get(id), Some(pattern));
        }
    }

    #[test]
    fn test_narrowing_keeps_layout() {
        let mut state = state(5);
        state.generate(800, 400, false, false).unwrap();
        let before = geometry(&state);

        let description = state.generate(300, 400, false, false).unwrap();
        assert_eq!(geometry(&state), before);
        assert_eq!(state.layout_width(), 800);

        // only buildings starting inside the canvas are drawn, clipped at its edge
        let drawn: Vec<_> = description.of_kind(PrimitiveKind::Building { layer: 0 }).collect();
        let visible = before[0].iter().filter(|b| b.x < 300).count();
        assert_eq!(drawn.len(), visible);
        assert!(drawn.iter().all(|r| r.x1 <= 300));

        // and widening back within the old width changes nothing
        state.generate(700, 400, false, false).unwrap();
        assert_eq!(geometry(&state), before);
    }

    #[test]
    fn test_refresh_colors_keeps_geometry() {
        let mut state = state(6);
        state.generate(600, 400, false, false).unwrap();
        let geometry_before = geometry(&state);
        let windows_before = state.window_cache().clone();
        let lights_before = state.roof_light_cache().clone();
        let palette_before = state.palette().cloned();

        state.generate(600, 400, true, false).unwrap();

        assert_ne!(state.palette().cloned(), palette_before);
        assert_eq!(geometry(&state), geometry_before);
        assert_eq!(state.window_cache(), &windows_before);
        assert_eq!(state.roof_light_cache(), &lights_before);
    }

    #[test]
    fn test_refresh_buildings_keeps_colors() {
        let mut state = state(7);
        state.generate(600, 400, false, false).unwrap();
        let geometry_before = geometry(&state);
        let palette_before = state.palette().cloned();
        let old_ids: Vec<_> = state.window_cache().keys().copied().collect();

        state.generate(600, 400, false, true).unwrap();

        assert_eq!(state.palette().cloned(), palette_before);
        assert_ne!(geometry(&state), geometry_before);
        // caches were rebuilt for the new layout only
        assert_eq!(state.window_cache().len(), state.building_count());
        let new_ids: Vec<_> = state
            .layers()
            .iter()
            .flat_map(|layer| layer.buildings.iter().map(|b| b.id))
            .collect();
        for id in old_ids {
            if !new_ids.contains(&id) {
                assert!(!state.window_cache().contains_key(&id));
            }
        }
    }

    #[test]
    fn test_refresh_buildings_uses_current_size() {
        let mut state = state(8);
        state.generate(900, 400, false, false).unwrap();
        state.generate(300, 400, false, true).unwrap();

        assert_eq!(state.layout_width(), 300);
        for layer in state.layers() {
            assert!(layer.buildings.iter().all(|b| b.x < 300));
        }
    }

    #[test]
    fn test_refresh_all() {
        let mut state = state(9);
        state.generate(600, 400, false, false).unwrap();
        let palette_before = state.palette().cloned();
        let geometry_before = geometry(&state);

        state.generate(600, 400, true, true).unwrap();
        assert_ne!(state.palette().cloned(), palette_before);
        assert_ne!(geometry(&state), geometry_before);
    }

    #[test]
    fn test_plain_redraw_is_stable() {
        let mut state = state(10);
        let first = state.generate(640, 480, false, false).unwrap();
        let second = state.generate(640, 480, false, false).unwrap();
        assert_eq!(first.primitives, second.primitives);
    }

    #[test]
    fn test_tiny_canvas() {
        let mut state = state(11);
        let description = state.generate(10, 10, false, false).unwrap();

        for layer in state.layers() {
            assert_eq!(layer.buildings.len(), 1);
            assert_eq!(description.count(PrimitiveKind::Building { layer: layer.index }), 1);
        }
        let building = description.of_kind(PrimitiveKind::Building { layer: 0 }).next().unwrap();
        assert_eq!((building.x0, building.x1), (0, 10));
    }

    #[test]
    fn test_layers_drawn_back_to_front() {
        let mut state = state(12);
        let description = state.generate(400, 300, false, false).unwrap();

        let layer_of = |kind: PrimitiveKind| match kind {
            PrimitiveKind::Sky => None,
            PrimitiveKind::Building { layer }
            | PrimitiveKind::Window { layer }
            | PrimitiveKind::RoofLight { layer } => Some(layer),
        };
        let order: Vec<_> = description.primitives.iter().filter_map(|r| layer_of(r.kind)).collect();
        assert!(order.windows(2).all(|pair| pair[0] <= pair[1]));

        // front layer sits on the canvas bottom, each layer back is raised
        let params = CityParams::default();
        for layer in state.layers() {
            let building = &layer.buildings[0];
            let rect = description.of_kind(PrimitiveKind::Building { layer: layer.index }).next().unwrap();
            let steps_back = (params.layer_count - 1 - layer.index) as i32;
            assert_eq!(rect.y0, 300 - steps_back * 20 - building.height as i32);
            assert_eq!(rect.y1, 300);
        }
    }

    #[test]
    fn test_seed_determines_city() {
        let mut a = state(21);
        let mut b = state(21);
        let mut c = state(22);
        let first = a.generate(480, 320, false, false).unwrap();

        assert_eq!(a.seed(), 21);
        assert_eq!(first.primitives, b.generate(480, 320, false, false).unwrap().primitives);
        assert_ne!(first.primitives, c.generate(480, 320, false, false).unwrap().primitives);
    }

    #[test]
    fn test_roof_lights_only_while_dark() {
        let mut light = state_with_darkness(false);
        let description = light.generate(200, 200, false, false).unwrap();
        assert!(light.roof_light_cache().values().all(|info| !info.has_lights));
        assert_eq!(
            description
                .primitives
                .iter()
                .filter(|r| matches!(r.kind, PrimitiveKind::RoofLight { .. }))
                .count(),
            0
        );

        let mut dark = state_with_darkness(true);
        let description = dark.generate(200, 200, false, false).unwrap();
        let expected: usize = dark
            .roof_light_cache()
            .values()
            .filter(|info| info.has_lights)
            .map(|info| info.positions.len())
            .sum();
        let drawn = description
            .primitives
            .iter()
            .filter(|r| matches!(r.kind, PrimitiveKind::RoofLight { .. }))
            .count();
        assert_eq!(drawn, expected);
    }

    fn roof_light_rects(description: &RasterDescription) -> usize {
        description
            .primitives
            .iter()
            .filter(|r| matches!(r.kind, PrimitiveKind::RoofLight { .. }))
            .count()
    }

    // colours only until the sky darkness matches `dark`
    fn recolor_until(state: &mut CityState, dark: bool) -> RasterDescription {
        for _ in 0..500 {
            let description = state.generate(200, 200, true, false).unwrap();
            if state.palette().map(CityPalette::is_dark) == Some(dark) {
                return description;
            }
        }
        panic!("sky never reached dark={dark}");
    }

    #[test]
    fn test_beacons_inert_under_light_recolor() {
        let mut state = state_with_darkness(true);
        let description = state.generate(200, 200, false, false).unwrap();
        let lights_before = state.roof_light_cache().clone();
        let lit: usize = lights_before
            .values()
            .filter(|info| info.has_lights)
            .map(|info| info.positions.len())
            .sum();
        assert_eq!(roof_light_rects(&description), lit);

        // decisions survive the light sky, nothing is drawn
        let description = recolor_until(&mut state, false);
        assert_eq!(state.roof_light_cache(), &lights_before);
        assert_eq!(roof_light_rects(&description), 0);

        // dark again, the same beacons come back
        let description = recolor_until(&mut state, true);
        assert_eq!(state.roof_light_cache(), &lights_before);
        assert_eq!(roof_light_rects(&description), lit);
    }
}
