// banded sky gradient
// flat base color below the horizon, darker bands toward the top of the canvas

use bevy::prelude::*;

use super::raster::{PrimitiveKind, RasterRect};
use crate::systems::city::CityParams;

fn darken(base: Srgba, factor: f32) -> Srgba {
    let mut hsl = Hsla::from(base);
    hsl.lightness = (hsl.lightness * factor).clamp(0.0, 1.0);
    Srgba::from(hsl)
}

fn lerp_rgb(from: Srgba, to: Srgba, t: f32) -> Srgba {
    Srgba::new(
        from.red + (to.red - from.red) * t,
        from.green + (to.green - from.green) * t,
        from.blue + (to.blue - from.blue) * t,
        1.0,
    )
}

/// Sky rectangles for a canvas, top band first.
pub fn sky_gradient(base: Srgba, canvas_width: u32, canvas_height: u32, params: &CityParams) -> Vec<RasterRect> {
    let width = canvas_width as i32;
    let height = canvas_height as i32;
    let horizon = (canvas_height as f32 * (1.0 - params.horizon_fraction)).round() as i32;
    let horizon = horizon.clamp(0, height);

    let dark = darken(base, params.sky_darkening);
    let bands = (horizon / params.sky_band_height.max(1) as i32).max(1);

    let mut rects = Vec::with_capacity(bands as usize + 1);

    // band k covers [horizon * k / n, horizon * (k + 1) / n)
    for k in 0..bands {
        let y0 = horizon * k / bands;
        let y1 = horizon * (k + 1) / bands;
        let t = k as f32 / bands as f32;
        rects.push(RasterRect::new(0, y0, width, y1, lerp_rgb(dark, base, t), PrimitiveKind::Sky));
    }

    rects.push(RasterRect::new(0, horizon, width, height, base, PrimitiveKind::Sky));
    rects.retain(|rect| !rect.is_empty());

    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Srgba {
        Srgba::new(0.4, 0.5, 0.7, 1.0)
    }

    fn brightness(color: Srgba) -> f32 {
        color.red + color.green + color.blue
    }

    #[test]
    fn test_band_count_and_coverage() {
        let params = CityParams::default();
        let rects = sky_gradient(base(), 300, 400, &params);

        // horizon at 100, one band per 20px
        assert_eq!(rects.len(), 6);
        assert_eq!(rects[0].y0, 0);
        for pair in rects.windows(2) {
            assert_eq!(pair[0].y1, pair[1].y0);
        }
        let last = rects[rects.len() - 1];
        assert_eq!((last.y0, last.y1), (100, 400));
        assert_eq!(last.color, base());
        assert!(rects.iter().all(|r| r.x0 == 0 && r.x1 == 300 && r.kind == PrimitiveKind::Sky));
    }

    #[test]
    fn test_bands_brighten_toward_horizon() {
        let params = CityParams::default();
        let rects = sky_gradient(base(), 100, 400, &params);

        for pair in rects.windows(2) {
            assert!(brightness(pair[0].color) <= brightness(pair[1].color) + 1e-5);
        }
        assert!(brightness(rects[0].color) < brightness(base()));
    }

    #[test]
    fn test_short_canvas_has_one_band() {
        let params = CityParams::default();
        let rects = sky_gradient(base(), 50, 40, &params);

        // horizon at 10, below one band height
        assert_eq!(rects.len(), 2);
        assert_eq!((rects[0].y0, rects[0].y1), (0, 10));

        let tiny = sky_gradient(base(), 1, 1, &params);
        assert_eq!(tiny.len(), 1);
        assert_eq!(tiny[0].color, base());
    }

    #[test]
    fn test_is_pure() {
        let params = CityParams::default();
        assert_eq!(sky_gradient(base(), 640, 480, &params), sky_gradient(base(), 640, 480, &params));
    }
}
