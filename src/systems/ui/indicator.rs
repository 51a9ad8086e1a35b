use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::systems::city::RefreshEvent;

// short-lived banner naming the refresh that just ran
#[derive(Resource)]
pub struct RefreshIndicator {
    pub label: &'static str,
    pub timer: f32,
    pub duration: f32,
}

impl Default for RefreshIndicator {
    fn default() -> Self {
        Self {
            label: "",
            timer: 0.0,
            duration: 1.5,
        }
    }
}

pub fn refresh_label(event: &RefreshEvent) -> Option<&'static str> {
    match (event.colors, event.buildings) {
        (true, true) => Some("NEW CITY"),
        (true, false) => Some("NEW COLORS"),
        (false, true) => Some("NEW BUILDINGS"),
        (false, false) => None,
    }
}

pub fn update_refresh_indicator(
    mut indicator: ResMut<RefreshIndicator>,
    mut events: EventReader<RefreshEvent>,
    time: Res<Time>,
) {
    for event in events.read() {
        if let Some(label) = refresh_label(event) {
            indicator.label = label;
            indicator.timer = indicator.duration;
        }
    }

    if indicator.timer > 0.0 {
        indicator.timer -= time.delta_secs();
        if indicator.timer < 0.0 {
            indicator.timer = 0.0;
        }
    }
}

pub fn render_refresh_indicator(
    mut contexts: EguiContexts,
    indicator: Res<RefreshIndicator>,
) {
    if indicator.timer <= 0.0 {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        // fade out over the last half second
        let alpha = (indicator.timer / 0.5).min(1.0);
        let fill = egui::Color32::from_rgba_unmultiplied(20, 20, 30, (200.0 * alpha) as u8);
        let text = egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8);

        egui::Area::new(egui::Id::new("refresh_indicator"))
            .anchor(egui::Align2::CENTER_TOP, egui::Vec2::new(0.0, 20.0))
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(fill)
                    .inner_margin(egui::Margin::symmetric(10, 4))
                    .corner_radius(egui::CornerRadius::same(3))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(indicator.label)
                            .size(18.0)
                            .color(text)
                            .strong());
                    });
            });
    }
}
