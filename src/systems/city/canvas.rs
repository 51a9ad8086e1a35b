// displays the generated city as a single sprite
// window resizes and refresh events both end up in one generate call per frame

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::{PrimaryWindow, WindowResized};
use image::RgbaImage;

use super::procgen::raster;
use super::{CityState, RefreshEvent};

// last rendered frame, kept for export
#[derive(Resource, Default)]
pub struct CanvasFrame {
    pub image: Option<RgbaImage>,
}

#[derive(Resource)]
pub struct CanvasImage(pub Handle<Image>);

fn to_bevy_image(frame: &RgbaImage) -> Image {
    Image::new(
        Extent3d {
            width: frame.width(),
            height: frame.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        frame.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
}

fn window_size(window: &Window) -> (u32, u32) {
    (window.width().round() as u32, window.height().round() as u32)
}

// generate, rasterize and keep the frame around
fn render(
    city: &mut CityState,
    width: u32,
    height: u32,
    refresh: RefreshEvent,
    frame: &mut CanvasFrame,
) -> Option<Image> {
    match city.generate(width, height, refresh.colors, refresh.buildings) {
        Ok(description) => {
            let pixels = raster::rasterize(&description);
            let image = to_bevy_image(&pixels);
            frame.image = Some(pixels);
            Some(image)
        }
        Err(e) => {
            // minimised windows report 0x0, skip the frame
            warn!("Skipping city redraw: {}", e);
            None
        }
    }
}

pub fn setup_canvas(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut city: ResMut<CityState>,
    mut frame: ResMut<CanvasFrame>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    commands.spawn(Camera2d);

    let (width, height) = match windows.single() {
        Ok(window) => window_size(window),
        Err(_) => (crate::config::INITIAL_WIDTH as u32, crate::config::INITIAL_HEIGHT as u32),
    };

    let image = render(&mut city, width, height, RefreshEvent::default(), &mut frame)
        .unwrap_or_else(|| to_bevy_image(&RgbaImage::new(1, 1)));
    let handle = images.add(image);

    info!("City ready: {} buildings on a {}x{} canvas", city.building_count(), width, height);

    commands.spawn(Sprite::from_image(handle.clone()));
    commands.insert_resource(CanvasImage(handle));
}

pub fn redraw_canvas(
    mut resize_events: EventReader<WindowResized>,
    mut refresh_events: EventReader<RefreshEvent>,
    mut city: ResMut<CityState>,
    mut frame: ResMut<CanvasFrame>,
    mut images: ResMut<Assets<Image>>,
    canvas: Option<Res<CanvasImage>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    // fold everything from this frame into one refresh
    let mut refresh = RefreshEvent::default();
    let mut dirty = resize_events.read().count() > 0;
    for event in refresh_events.read() {
        refresh.colors |= event.colors;
        refresh.buildings |= event.buildings;
        dirty = true;
    }

    if !dirty {
        return;
    }

    let Some(canvas) = canvas else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    let (width, height) = window_size(window);
    if let Some(image) = render(&mut city, width, height, refresh, &mut frame) {
        if let Some(target) = images.get_mut(&canvas.0) {
            *target = image;
        }
    }
}
