// Configuration file, all measurements in canvas pixels
// This controls the initial generation parameter settings

// Window
pub const INITIAL_WIDTH: f32 = 480.0;
pub const INITIAL_HEIGHT: f32 = 320.0;

// Layers (layer 0 is the farthest)
pub const LAYER_COUNT: usize = 4;
pub const LAYER_BASE_STEP: u32 = 20; // each layer further back sits this much higher

// Building footprints
pub const BUILDING_WIDTH_MIN: u32 = 30;
pub const BUILDING_WIDTH_MAX: u32 = 80;
pub const BUILDING_GAP_MIN: u32 = 5;
pub const BUILDING_GAP_MAX: u32 = 15;

// Building heights
pub const MIN_TOP_CLEARANCE: u32 = 80;            // sky kept free above the tallest regular building
pub const GROUND_RESERVE: u32 = 160;              // subtracted with the clearance to get the height cap
pub const MIN_HEIGHT_CAP: u32 = 20;               // height cap floor for very short canvases
pub const ABSOLUTE_MAX_BUILDING_HEIGHT: u32 = 360; // independent of canvas size
pub const MIN_BUILDING_HEIGHT: u32 = 50;
pub const LAYER_HEIGHT_BASE: u32 = 30;
pub const LAYER_HEIGHT_STEP: u32 = 15;            // minimum height grows toward the front
pub const FRONT_LAYER_OVERSHOOT: u32 = 40;        // front layer may exceed the cap by this much

// Windows
pub const LIT_RATE: f32 = 0.6;
// normal, wide, tall, tall-inverse; normalised by the weighted index
pub const WINDOW_STYLE_WEIGHTS: [f32; 4] = [0.80, 0.02, 0.18, 0.09];

pub const NORMAL_CELL: (u32, u32) = (6, 6);
pub const NORMAL_SPACING: u32 = 6;
pub const TALL_CELL: (u32, u32) = (6, 12);
pub const TALL_SPACING: u32 = 6;
pub const TALL_DIVIDER: f32 = 0.25;               // tall-inverse uses 1.0 - this
pub const WIDE_BAND_HEIGHT: u32 = 4;
pub const WIDE_SPACING: u32 = 8;
pub const WIDE_INSET: u32 = 3;

// Sky
pub const DARK_THRESHOLD: f32 = 0.45;             // sky lightness below this counts as night
pub const SKY_HUE_RANGE: (f32, f32) = (0.0, 1.0);
pub const SKY_SATURATION_RANGE: (f32, f32) = (0.1, 0.3);
pub const SKY_BRIGHTNESS_RANGE: (f32, f32) = (0.2, 0.9);
pub const SKY_BAND_HEIGHT: u32 = 20;
pub const HORIZON_FRACTION: f32 = 0.75;           // flat sky covers this share of the canvas bottom
pub const SKY_DARKENING: f32 = 0.8;

// Roof beacons
pub const ROOF_LIGHT_CHANCE: f32 = 0.35;
pub const ROOF_LIGHT_SIZE: u32 = 3;
pub const ROOF_LIGHT_SPACING: u32 = 10;
pub const BEACON_PALETTE: [[u8; 3]; 4] = [
    [255, 48, 48],   // red
    [255, 170, 0],   // amber
    [90, 170, 255],  // blue
    [255, 255, 255], // white
];
