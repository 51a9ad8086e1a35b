// this is the entry point for the city generation plugin
use bevy::prelude::*;

use crate::config::*;

pub mod canvas;
pub mod procgen;

pub use procgen::state::CityState;

// resources
#[derive(Resource)]
pub struct Seed(pub u64);

// Event for regeneration
// both flags set means "new city"
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct RefreshEvent {
    pub colors: bool,
    pub buildings: bool,
}

impl RefreshEvent {
    pub const COLORS: Self = Self { colors: true, buildings: false };
    pub const BUILDINGS: Self = Self { colors: false, buildings: true };
    pub const ALL: Self = Self { colors: true, buildings: true };
}

// city generation parameters
// fixed for the lifetime of a CityState
#[derive(Clone, Debug)]
pub struct CityParams {
    pub layer_count: usize,
    pub layer_base_step: u32,
    pub building_width_min: u32,
    pub building_width_max: u32,
    pub gap_min: u32,
    pub gap_max: u32,
    // height parameters
    pub min_top_clearance: u32,
    pub ground_reserve: u32,
    pub min_height_cap: u32,
    pub absolute_max_building_height: u32,
    pub min_building_height: u32,
    pub layer_height_base: u32,
    pub layer_height_step: u32,
    pub front_layer_overshoot: u32,
    // window parameters
    pub lit_rate: f32,
    pub window_style_weights: [f32; 4],
    // sky parameters
    pub dark_threshold: f32,
    pub sky_band_height: u32,
    pub horizon_fraction: f32,
    pub sky_darkening: f32,
    // roof beacon parameters
    pub roof_light_chance: f32,
    pub roof_light_size: u32,
    pub roof_light_spacing: u32,
    pub beacon_palette: Vec<Srgba>,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            layer_count: LAYER_COUNT,
            layer_base_step: LAYER_BASE_STEP,
            building_width_min: BUILDING_WIDTH_MIN,
            building_width_max: BUILDING_WIDTH_MAX,
            gap_min: BUILDING_GAP_MIN,
            gap_max: BUILDING_GAP_MAX,
            min_top_clearance: MIN_TOP_CLEARANCE,
            ground_reserve: GROUND_RESERVE,
            min_height_cap: MIN_HEIGHT_CAP,
            absolute_max_building_height: ABSOLUTE_MAX_BUILDING_HEIGHT,
            min_building_height: MIN_BUILDING_HEIGHT,
            layer_height_base: LAYER_HEIGHT_BASE,
            layer_height_step: LAYER_HEIGHT_STEP,
            front_layer_overshoot: FRONT_LAYER_OVERSHOOT,
            lit_rate: LIT_RATE,
            window_style_weights: WINDOW_STYLE_WEIGHTS,
            dark_threshold: DARK_THRESHOLD,
            sky_band_height: SKY_BAND_HEIGHT,
            horizon_fraction: HORIZON_FRACTION,
            sky_darkening: SKY_DARKENING,
            roof_light_chance: ROOF_LIGHT_CHANCE,
            roof_light_size: ROOF_LIGHT_SIZE,
            roof_light_spacing: ROOF_LIGHT_SPACING,
            beacon_palette: BEACON_PALETTE
                .iter()
                .map(|&[r, g, b]| Srgba::rgb_u8(r, g, b))
                .collect(),
        }
    }
}

// main plugin for generation
pub struct CityGenerationPlugin;

impl Plugin for CityGenerationPlugin {
    fn build(&self, app: &mut App) {
        // new city on every launch
        let seed: u64 = rand::random();
        // startup only, the weights are config constants
        let state = CityState::new(CityParams::default(), seed)
            .expect("WINDOW_STYLE_WEIGHTS in config.rs must form a weighted distribution");
        info!("City seed: {}", seed);

        app
            .insert_resource(Seed(seed))
            .insert_resource(state)
            .init_resource::<canvas::CanvasFrame>()

            .add_event::<RefreshEvent>()
            .add_event::<crate::systems::export::ExportEvent>()

            .add_systems(Startup, canvas::setup_canvas)
            .add_systems(Update, (
                canvas::redraw_canvas,
                crate::systems::export::handle_export,
            ).chain());
    }
}
