use bevy::prelude::*;

pub mod audio;
pub mod board;
pub mod game;
pub mod menu;
pub mod stopwatch;
pub mod tile;

/// Active screen. Each screen owns its spawn/input/teardown systems.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Screen {
    #[default]
    StartMenu,
    DifficultyMenu,
    Puzzle,
}

/// Animation state machine of the puzzle board. At most one tile slides at
/// a time, and a solved board accepts no further selections.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayPhase {
    #[default]
    Idle,
    Sliding,
    Solved,
}

/// Pause gate for every time-driven system on the puzzle screen.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
}

/// Grid size chosen on the difficulty menu.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Difficulty {
    pub grid_size: usize,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self { grid_size: 3 }
    }
}

pub fn run() {
    puzzle_helpers::game_app("Puzzle Game")
        .init_state::<Screen>()
        .init_state::<PlayPhase>()
        .init_state::<PauseState>()
        .init_resource::<Difficulty>()
        .add_systems(Startup, setup_camera)
        .add_plugins((menu::MenuPlugin, game::BoardPlugin, audio::GameAudioPlugin))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
