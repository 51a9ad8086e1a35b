use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::systems::city::{CityState, RefreshEvent, Seed};
use crate::systems::export::ExportEvent;

pub mod indicator;

pub use indicator::{RefreshIndicator, render_refresh_indicator, update_refresh_indicator};

#[derive(Resource)]
pub struct PanelVisible(pub bool);

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(PanelVisible(true))
            .insert_resource(RefreshIndicator::default())
            .add_systems(Update, (key_input, update_refresh_indicator))
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, render_refresh_indicator)); // UI rendering here
    }
}

// timestamped so repeated saves never overwrite each other
fn export_filename() -> String {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("city_export_{}.png", timestamp)
}

fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut panel_visible: ResMut<PanelVisible>,
    mut refresh_events: EventWriter<RefreshEvent>,
    mut export_events: EventWriter<ExportEvent>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyC) {
        refresh_events.write(RefreshEvent::COLORS);
    }
    if keyboard_input.just_pressed(KeyCode::KeyB) {
        refresh_events.write(RefreshEvent::BUILDINGS);
    }
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        refresh_events.write(RefreshEvent::ALL);
    }
    if keyboard_input.just_pressed(KeyCode::KeyS) {
        export_events.write(ExportEvent { filename: export_filename() });
    }
    if keyboard_input.just_pressed(KeyCode::Tab) {
        panel_visible.0 = !panel_visible.0;
    }
}

fn ui_main(
    mut contexts: EguiContexts,
    seed: Res<Seed>,
    city: Res<CityState>,
    panel_visible: Res<PanelVisible>,
    mut refresh_events: EventWriter<RefreshEvent>,
    mut export_events: EventWriter<ExportEvent>,
) {
    if !panel_visible.0 {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("City")
            .anchor(egui::Align2::LEFT_TOP, egui::Vec2::new(10.0, 10.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                // refresh buttons
                ui.horizontal(|ui| {
                    if ui.button("New Colors")
                        .on_hover_text("New sky and building colors, same buildings (C)")
                        .clicked() {
                        refresh_events.write(RefreshEvent::COLORS);
                    }
                    if ui.button("New Buildings")
                        .on_hover_text("New skyline, same colors (B)")
                        .clicked() {
                        refresh_events.write(RefreshEvent::BUILDINGS);
                    }
                });

                let new_city = egui::Button::new("New City").fill(egui::Color32::from_rgb(45, 72, 116));
                if ui.add(new_city)
                    .on_hover_text("Regenerate everything (R)")
                    .clicked() {
                    refresh_events.write(RefreshEvent::ALL);
                }

                ui.separator();

                // current state
                egui::CollapsingHeader::new("Sky")
                    .default_open(true)
                    .show(ui, |ui| {
                    match city.palette() {
                        Some(palette) => {
                            let sky = palette.sky;
                            ui.label(format!("Hue: {:.2}", sky.hue));
                            ui.label(format!("Saturation: {:.2}", sky.saturation));
                            ui.label(format!("Brightness: {:.2}", sky.brightness));

                            let (text, color) = if sky.is_dark {
                                ("Night", egui::Color32::from_rgb(136, 46, 217))
                            } else {
                                ("Day", egui::Color32::from_rgb(220, 170, 40))
                            };
                            ui.label(egui::RichText::new(text).color(color).strong());
                        }
                        None => {
                            ui.label("Not generated yet");
                        }
                    }
                });

                egui::CollapsingHeader::new("Buildings")
                    .default_open(false)
                    .show(ui, |ui| {
                    ui.label(format!("Layers: {}", city.params().layer_count));
                    for layer in city.layers() {
                        ui.label(format!("Layer {}: {} buildings", layer.index, layer.buildings.len()));
                    }
                    ui.label(format!("Layout width: {}", city.layout_width()));
                    ui.label(format!("Window patterns: {}", city.window_cache().len()));
                    let lit_roofs = city.roof_light_cache().values().filter(|info| info.has_lights).count();
                    ui.label(format!("Beacon roofs: {}", lit_roofs));
                    ui.label(format!("Seed: {}", seed.0));
                });

                ui.separator();

                // export section
                if ui.button("Save PNG")
                    .on_hover_text("Save the current frame as PNG, current directory (S)")
                    .clicked() {
                    export_events.write(ExportEvent { filename: export_filename() });
                }

                ui.separator();
                ui.label("TAB - Hide panel");
                ui.label("ESC - Exit");
            });
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps_diagnostic) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                        if let Some(fps) = fps_diagnostic.smoothed() {
                            ui.label(egui::RichText::new(format!("{:.0}", fps))
                                .size(26.0)
                                .color(egui::Color32::WHITE));
                        }
                    }
                });
            });
    }
}
