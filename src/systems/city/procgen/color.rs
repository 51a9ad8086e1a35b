// handles color derivation
// sky, building layers and window on/off colors all derive from one HSL triple

use bevy::prelude::*;
use rand::Rng;

use crate::config::{SKY_BRIGHTNESS_RANGE, SKY_HUE_RANGE, SKY_SATURATION_RANGE};

/// Sky color as the HSL triple it was derived from, plus the RGB result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyColor {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub rgb: Srgba,
    pub is_dark: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowColors {
    pub on: Srgba,
    pub off: Srgba,
}

// hue is a [0, 1] fraction here, bevy wants degrees
fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Srgba {
    Srgba::from(Hsla::new(
        (hue * 360.0).rem_euclid(360.0),
        saturation.clamp(0.0, 1.0),
        lightness.clamp(0.0, 1.0),
        1.0,
    ))
}

/// HSL to RGB, brightness is used as lightness.
pub fn sky_color(hue: f32, saturation: f32, brightness: f32, dark_threshold: f32) -> SkyColor {
    SkyColor {
        hue,
        saturation,
        brightness,
        rgb: hsl_to_rgb(hue, saturation, brightness),
        is_dark: brightness < dark_threshold,
    }
}

pub fn random_sky<R: Rng + ?Sized>(rng: &mut R, dark_threshold: f32) -> SkyColor {
    let hue = rng.random_range(SKY_HUE_RANGE.0..SKY_HUE_RANGE.1);
    let saturation = rng.random_range(SKY_SATURATION_RANGE.0..SKY_SATURATION_RANGE.1);
    let brightness = rng.random_range(SKY_BRIGHTNESS_RANGE.0..SKY_BRIGHTNESS_RANGE.1);

    sky_color(hue, saturation, brightness, dark_threshold)
}

/// One color per layer, layer 0 (farthest) darkest.
///
/// Lightness runs linearly from `max(0.05, b * 0.5)` to `min(0.9, b * 1.2)`
/// and every step is clamped to [0.05, 0.95].
pub fn building_colors(hue: f32, saturation: f32, sky_brightness: f32, layer_count: usize) -> Vec<Srgba> {
    let start = (sky_brightness * 0.5).max(0.05);
    let end = (sky_brightness * 1.2).min(0.9);
    let saturation = (saturation * 2.0).min(1.0);

    (0..layer_count)
        .map(|i| {
            let t = if layer_count > 1 {
                i as f32 / (layer_count - 1) as f32
            } else {
                0.0
            };
            let lightness = (start + (end - start) * t).clamp(0.05, 0.95);
            hsl_to_rgb(hue, saturation, lightness)
        })
        .collect()
}

pub fn window_colors(building: Srgba, layer_index: usize) -> WindowColors {
    let hsl = Hsla::from(building);
    let hue = hsl.hue / 360.0;

    let boost = 0.35 + 0.05 * layer_index as f32;
    let on = hsl_to_rgb(
        hue,
        (hsl.saturation + 0.3).min(1.0),
        (hsl.lightness + boost).min(0.95),
    );
    let off = hsl_to_rgb(
        hue,
        (hsl.saturation * 0.7).max(0.2),
        (hsl.lightness * 0.85).max(0.3),
    );

    WindowColors { on, off }
}
