pub mod input;
pub mod widget;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

pub const FONT: &str = "fonts/ARCADECLASSIC.ttf";

pub const WINDOW_WIDTH: f32 = 410.0;
pub const WINDOW_HEIGHT: f32 = 600.0;

// Creates a Bevy app with the window, frame pacing and clear color shared
// by every screen. This prevents duplication / errors across screens.
pub fn game_app(title: &str) -> App {
    let mut app = App::new();

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: title.to_string(),
            present_mode: PresentMode::Fifo,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            resizable: false,
            ..default()
        }),
        ..default()
    };

    app.add_plugins(DefaultPlugins.set(window_plugin));

    // Sleep-based pacing when ahead of the 60 Hz schedule.
    // https://github.com/aevyrie/bevy_framepace
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(ClearColor(Color::BLACK));

    app
}
