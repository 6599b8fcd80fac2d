use bevy::prelude::*;
use puzzle_helpers::input::{pointer_just_pressed, pointer_just_released};
use puzzle_helpers::widget::{
    despawn_all, panel_contains, screen_to_world, spawn_panel, PanelStyle,
};
use puzzle_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};
use bevy::log::info;

use crate::audio::{MusicEnabled, ToggleMusic};
use crate::{Difficulty, Screen};

const START_BUTTON_COLOUR: Color = Color::srgb(255.0 / 255.0, 123.0 / 255.0, 43.0 / 255.0);
const BUTTON_COLOUR: Color = Color::srgb(255.0 / 255.0, 255.0 / 255.0, 102.0 / 255.0);
const SELECTED_COLOUR: Color = Color::srgb(50.0 / 255.0, 255.0 / 255.0, 100.0 / 255.0);
const LABEL_COLOUR: Color = Color::BLACK;

const MENU_BORDER: f32 = 20.0;

#[derive(Component)]
struct StartMenuUi;

#[derive(Clone, Copy, PartialEq, Eq)]
enum StartAction {
    Play,
    ToggleMusic,
    Quit,
}

#[derive(Component)]
struct StartButton {
    index: usize,
    action: StartAction,
}

#[derive(Component)]
struct MusicLabel;

#[derive(Component)]
struct DifficultyMenuUi;

#[derive(Component)]
struct DifficultyButton {
    grid_size: usize,
}

/// Index of the keyboard-highlighted start-menu button.
#[derive(Resource, Default)]
struct SelectedButton(usize);

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedButton>()
            .add_systems(OnEnter(Screen::StartMenu), spawn_start_menu)
            .add_systems(OnExit(Screen::StartMenu), despawn_all::<StartMenuUi>)
            .add_systems(
                Update,
                (
                    start_menu_keys,
                    refresh_music_label.run_if(resource_changed::<MusicEnabled>),
                )
                    .run_if(in_state(Screen::StartMenu)),
            )
            .add_systems(OnEnter(Screen::DifficultyMenu), spawn_difficulty_menu)
            .add_systems(
                OnExit(Screen::DifficultyMenu),
                despawn_all::<DifficultyMenuUi>,
            )
            .add_systems(
                Update,
                difficulty_menu_pointer.run_if(in_state(Screen::DifficultyMenu)),
            );
    }
}

fn spawn_start_menu(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    music_enabled: Res<MusicEnabled>,
    mut selected: ResMut<SelectedButton>,
) {
    const BUTTON_HEIGHT: f32 = 80.0;
    const BUTTON_SPACING: f32 = 20.0;

    selected.0 = 0;

    let size = Vec2::new(WINDOW_WIDTH - 2.0 * MENU_BORDER, BUTTON_HEIGHT);
    let start_y = (WINDOW_HEIGHT - (3.0 * BUTTON_HEIGHT + 2.0 * BUTTON_SPACING)) / 2.0;

    let music_text = if music_enabled.0 {
        "MUSIC: ON"
    } else {
        "MUSIC: OFF"
    };
    let buttons = [
        ("PLAY GAME", StartAction::Play),
        (music_text, StartAction::ToggleMusic),
        ("QUIT", StartAction::Quit),
    ];

    for (index, (label, action)) in buttons.into_iter().enumerate() {
        let origin = Vec2::new(
            MENU_BORDER,
            (index as f32).mul_add(BUTTON_HEIGHT + BUTTON_SPACING, start_y),
        );
        let style = PanelStyle {
            size,
            color: if index == 0 {
                SELECTED_COLOUR
            } else {
                START_BUTTON_COLOUR
            },
            label_color: LABEL_COLOUR,
            font_size: 40.0,
        };
        let ids = spawn_panel(
            &mut commands,
            &asset_server,
            style,
            screen_to_world(origin, size, 0.0),
            label,
        );
        commands
            .entity(ids.panel)
            .insert((StartMenuUi, StartButton { index, action }));
        if action == StartAction::ToggleMusic {
            commands.entity(ids.label).insert(MusicLabel);
        }
    }
}

fn start_menu_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut selected: ResMut<SelectedButton>,
    mut buttons: Query<(&StartButton, &mut Sprite)>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut toggle_music: EventWriter<ToggleMusic>,
    mut exit: EventWriter<AppExit>,
) {
    let count = buttons.iter().count();
    if count == 0 {
        return;
    }

    let previous = selected.0;
    if keys.any_just_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        selected.0 = (selected.0 + count - 1) % count;
    }
    if keys.any_just_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        selected.0 = (selected.0 + 1) % count;
    }
    if selected.0 != previous {
        for (button, mut sprite) in &mut buttons {
            sprite.color = if button.index == selected.0 {
                SELECTED_COLOUR
            } else {
                START_BUTTON_COLOUR
            };
        }
    }

    if keys.just_pressed(KeyCode::Enter) {
        let Some((button, _)) = buttons.iter().find(|(button, _)| button.index == selected.0)
        else {
            return;
        };
        match button.action {
            StartAction::Play => next_screen.set(Screen::DifficultyMenu),
            StartAction::ToggleMusic => {
                toggle_music.send(ToggleMusic);
            }
            StartAction::Quit => {
                exit.send(AppExit::Success);
            }
        }
    }
}

fn refresh_music_label(
    music_enabled: Res<MusicEnabled>,
    mut labels: Query<&mut Text2d, With<MusicLabel>>,
) {
    for mut label in &mut labels {
        label.0 = if music_enabled.0 {
            "MUSIC: ON".to_string()
        } else {
            "MUSIC: OFF".to_string()
        };
    }
}

fn spawn_difficulty_menu(mut commands: Commands, asset_server: Res<AssetServer>) {
    let button_height = (WINDOW_HEIGHT - 4.0 * MENU_BORDER) / 3.0;
    let size = Vec2::new(WINDOW_WIDTH - 2.0 * MENU_BORDER, button_height);

    for (index, grid_size) in [3_usize, 4, 5].into_iter().enumerate() {
        let origin = Vec2::new(
            MENU_BORDER,
            (index as f32).mul_add(button_height + MENU_BORDER, MENU_BORDER),
        );
        let style = PanelStyle {
            size,
            color: BUTTON_COLOUR,
            label_color: LABEL_COLOUR,
            font_size: (button_height - 40.0).max(12.0),
        };
        let label = format!("{grid_size}x{grid_size}");
        let ids = spawn_panel(
            &mut commands,
            &asset_server,
            style,
            screen_to_world(origin, size, 0.0),
            &label,
        );
        commands
            .entity(ids.panel)
            .insert((DifficultyMenuUi, DifficultyButton { grid_size }));
    }
}

fn difficulty_menu_pointer(
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut buttons: Query<(&DifficultyButton, &mut Sprite, &Transform)>,
    mut picked: Local<Option<usize>>,
    mut commands: Commands,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if let Some(point) = pointer_just_pressed(&mouse_button_input, &touch_input, &windows, &camera)
    {
        for (button, mut sprite, transform) in &mut buttons {
            if panel_contains(&sprite, transform, point) {
                sprite.color = SELECTED_COLOUR;
                *picked = Some(button.grid_size);
            }
        }
    }

    if pointer_just_released(&mouse_button_input, &touch_input, &windows, &camera).is_some() {
        for (_, mut sprite, _) in &mut buttons {
            sprite.color = BUTTON_COLOUR;
        }
        if let Some(grid_size) = picked.take() {
            info!("selected {grid_size}x{grid_size} puzzle");
            commands.insert_resource(Difficulty { grid_size });
            next_screen.set(Screen::Puzzle);
        }
    }
}
