use bevy::prelude::*;
use bevy::window::WindowPlugin;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy_egui::EguiPlugin;

pub mod config;
pub mod error;
pub mod systems;

// import modules here
use systems::city::CityGenerationPlugin;

use crate::systems::ui::UIPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "pixel art city generator".to_string(),
                    mode: bevy::window::WindowMode::Windowed,
                    resolution: bevy::window::WindowResolution::new(
                        config::INITIAL_WIDTH,
                        config::INITIAL_HEIGHT,
                    ),
                    ..default()
                }),
                ..default()
            })
            // pixel art, no smoothing when the sprite is scaled
            .set(ImagePlugin::default_nearest()))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())

        // my custom plugins
        .add_plugins(CityGenerationPlugin)
        .add_plugins(UIPlugin)

        .insert_resource(ClearColor(Color::BLACK)) // letterbox color
        .add_systems(Update, handle_exit)
        .run()
}

// application exit
fn handle_exit(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
