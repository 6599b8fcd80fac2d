use bevy::prelude::*;
use puzzle_helpers::input::{pointer_just_pressed, pointer_just_released};
use puzzle_helpers::widget::{panel_contains, screen_to_world, spawn_panel, PanelStyle};
use puzzle_helpers::{FONT, WINDOW_HEIGHT, WINDOW_WIDTH};
use bevy::log::info;

use crate::board::{Board, Cell, SHUFFLE_MOVES};
use crate::stopwatch::Stopwatch;
use crate::tile::{step_towards, BoardLayout, GridPos, ScreenPos, Sliding, TileFace, SLIDE_SPEED};
use crate::{Difficulty, PauseState, PlayPhase, Screen};

const TILE_COLOUR: Color = Color::srgb(0.0 / 255.0, 191.0 / 255.0, 255.0 / 255.0);
const TILE_COMPLETION_COLOUR: Color = Color::srgb(50.0 / 255.0, 255.0 / 255.0, 100.0 / 255.0);
const STOPWATCH_COLOUR: Color = Color::srgb(255.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0);
const BUTTON_COLOUR: Color = Color::srgb(255.0 / 255.0, 255.0 / 255.0, 102.0 / 255.0);
const BUTTON_DOWN_COLOUR: Color = Color::srgb(50.0 / 255.0, 255.0 / 255.0, 100.0 / 255.0);
const LABEL_COLOUR: Color = Color::BLACK;
const BANNER_COLOUR: Color = Color::srgb(255.0 / 255.0, 215.0 / 255.0, 0.0 / 255.0);

/// Fired every time a tile finishes sliding into the empty slot.
#[derive(Event)]
pub struct MoveCompleted;

/// Fired once when a completed move sorts the whole board.
#[derive(Event)]
pub struct PuzzleSolved;

#[derive(Component)]
struct PuzzleUi;

#[derive(Component)]
struct StopwatchLabel;

#[derive(Component)]
struct MenuButton;

#[derive(Component)]
struct PauseOverlay;

pub struct BoardPlugin;

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveCompleted>()
            .add_event::<PuzzleSolved>()
            .add_systems(OnEnter(Screen::Puzzle), setup_session)
            .add_systems(OnExit(Screen::Puzzle), teardown_session)
            .add_systems(OnEnter(PauseState::Paused), enter_pause)
            .add_systems(OnExit(PauseState::Paused), leave_pause)
            .add_systems(OnEnter(PlayPhase::Solved), celebrate)
            .add_systems(
                Update,
                (
                    toggle_pause,
                    handle_menu_button,
                    update_stopwatch,
                    // Chained so the finishing move's event is consumed the
                    // same frame it is sent; otherwise a frame in Idle opens
                    // between a solving slide and the win check.
                    (
                        select_tile
                            .run_if(in_state(PlayPhase::Idle))
                            .run_if(in_state(PauseState::Running)),
                        slide_tile
                            .run_if(in_state(PlayPhase::Sliding))
                            .run_if(in_state(PauseState::Running)),
                        check_win,
                    )
                        .chain(),
                    sync_tile_transforms,
                )
                    .run_if(in_state(Screen::Puzzle)),
            );
    }
}

fn setup_session(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    difficulty: Res<Difficulty>,
    time: Res<Time>,
    mut next_phase: ResMut<NextState<PlayPhase>>,
    mut next_pause: ResMut<NextState<PauseState>>,
) {
    let grid_size = difficulty.grid_size;
    let mut board = Board::solved(grid_size);
    board.shuffle(SHUFFLE_MOVES, &mut fastrand::Rng::new());
    info!("new {grid_size}x{grid_size} board:\n{board}");

    let layout = BoardLayout::new(grid_size);
    spawn_tiles(&mut commands, &asset_server, &board, &layout);

    let (origin, size) = layout.stopwatch_rect();
    let style = PanelStyle {
        size: size.as_vec2(),
        color: STOPWATCH_COLOUR,
        label_color: LABEL_COLOUR,
        font_size: layout.font_size(),
    };
    let ids = spawn_panel(
        &mut commands,
        &asset_server,
        style,
        screen_to_world(origin.as_vec2(), size.as_vec2(), 0.0),
        "00:00:00",
    );
    commands.entity(ids.panel).insert(PuzzleUi);
    commands.entity(ids.label).insert(StopwatchLabel);

    let (origin, size) = layout.menu_button_rect();
    let style = PanelStyle {
        size: size.as_vec2(),
        color: BUTTON_COLOUR,
        label_color: LABEL_COLOUR,
        font_size: layout.font_size(),
    };
    let ids = spawn_panel(
        &mut commands,
        &asset_server,
        style,
        screen_to_world(origin.as_vec2(), size.as_vec2(), 0.0),
        "Menu",
    );
    commands.entity(ids.panel).insert((PuzzleUi, MenuButton));

    commands.insert_resource(layout);
    commands.insert_resource(board);
    commands.insert_resource(Stopwatch::started_at(time.elapsed_secs_f64()));
    next_phase.set(PlayPhase::Idle);
    next_pause.set(PauseState::Running);
}

fn spawn_tiles(
    commands: &mut Commands,
    asset_server: &Res<AssetServer>,
    board: &Board,
    layout: &BoardLayout,
) {
    let size = layout.tile_size();
    for row in 0..board.size() {
        for col in 0..board.size() {
            let Some(Cell::Tile(number)) = board.cell(row, col) else {
                continue;
            };
            let origin = layout.cell_origin(row, col);
            let style = PanelStyle {
                size: size.as_vec2(),
                color: TILE_COLOUR,
                label_color: LABEL_COLOUR,
                font_size: layout.font_size(),
            };
            let ids = spawn_panel(
                commands,
                asset_server,
                style,
                screen_to_world(origin.as_vec2(), size.as_vec2(), 0.0),
                &number.to_string(),
            );
            commands.entity(ids.panel).insert((
                PuzzleUi,
                TileFace { number },
                GridPos { row, col },
                ScreenPos(origin),
            ));
        }
    }
}

fn teardown_session(
    mut commands: Commands,
    entities: Query<Entity, With<PuzzleUi>>,
    mut next_phase: ResMut<NextState<PlayPhase>>,
    mut next_pause: ResMut<NextState<PauseState>>,
) {
    for entity in &entities {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<Board>();
    commands.remove_resource::<BoardLayout>();
    commands.remove_resource::<Stopwatch>();
    next_phase.set(PlayPhase::Idle);
    next_pause.set(PauseState::Running);
}

fn toggle_pause(
    keys: Res<ButtonInput<KeyCode>>,
    pause: Res<State<PauseState>>,
    mut next_pause: ResMut<NextState<PauseState>>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    match pause.get() {
        PauseState::Running => {
            info!("game paused");
            next_pause.set(PauseState::Paused);
        }
        PauseState::Paused => {
            info!("game resumed");
            next_pause.set(PauseState::Running);
        }
    }
}

fn enter_pause(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    time: Res<Time>,
    mut stopwatch: ResMut<Stopwatch>,
) {
    stopwatch.pause(time.elapsed_secs_f64());
    commands.spawn((
        Sprite::from_color(
            Color::srgba(0.0, 0.0, 0.0, 0.5),
            Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT),
        ),
        Transform::from_xyz(0.0, 0.0, 10.0),
        PauseOverlay,
        PuzzleUi,
    ));
    commands.spawn((
        Text2d::new("PAUSED - Press ESC to continue"),
        TextFont {
            font: asset_server.load(FONT),
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_xyz(0.0, 0.0, 11.0),
        PauseOverlay,
        PuzzleUi,
    ));
}

fn leave_pause(
    mut commands: Commands,
    time: Res<Time>,
    stopwatch: Option<ResMut<Stopwatch>>,
    overlay: Query<Entity, With<PauseOverlay>>,
) {
    // The stopwatch is already gone when this runs during screen teardown.
    if let Some(mut stopwatch) = stopwatch {
        stopwatch.resume(time.elapsed_secs_f64());
    }
    for entity in &overlay {
        commands.entity(entity).despawn_recursive();
    }
}

fn update_stopwatch(
    time: Res<Time>,
    pause: Res<State<PauseState>>,
    phase: Res<State<PlayPhase>>,
    stopwatch: Res<Stopwatch>,
    mut labels: Query<&mut Text2d, With<StopwatchLabel>>,
) {
    if *pause.get() == PauseState::Paused || *phase.get() == PlayPhase::Solved {
        return;
    }
    for mut label in &mut labels {
        label.0 = stopwatch.display(time.elapsed_secs_f64());
    }
}

fn select_tile(
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    board: Res<Board>,
    layout: Res<BoardLayout>,
    tiles: Query<(Entity, &GridPos, &Sprite, &Transform), With<TileFace>>,
    mut commands: Commands,
    mut next_phase: ResMut<NextState<PlayPhase>>,
) {
    let Some(point) = pointer_just_pressed(&mouse_button_input, &touch_input, &windows, &camera)
    else {
        return;
    };
    for (entity, pos, sprite, transform) in &tiles {
        if !panel_contains(sprite, transform, point) {
            continue;
        }
        if !board.is_adjacent_to_empty(pos.row, pos.col) {
            continue;
        }
        let (row, col) = board.empty_pos();
        commands.entity(entity).insert(Sliding {
            target: layout.cell_origin(row, col),
            debt: 0.0,
        });
        next_phase.set(PlayPhase::Sliding);
        break;
    }
}

fn slide_tile(
    time: Res<Time>,
    mut board: ResMut<Board>,
    mut sliding_tiles: Query<(Entity, &mut GridPos, &mut ScreenPos, &mut Sliding)>,
    mut commands: Commands,
    mut next_phase: ResMut<NextState<PlayPhase>>,
    mut completed: EventWriter<MoveCompleted>,
) {
    let Ok((entity, mut grid, mut screen, mut sliding)) = sliding_tiles.get_single_mut() else {
        return;
    };

    sliding.debt += time.delta_secs() * SLIDE_SPEED;
    let budget = sliding.debt as i32;
    sliding.debt -= budget as f32;

    for _ in 0..budget {
        screen.0 = step_towards(screen.0, sliding.target);
        if screen.0 == sliding.target {
            // The tile takes the empty cell; the empty slot is re-seated at
            // the cell the tile departed from.
            let (empty_row, empty_col) = board.empty_pos();
            board.slide(grid.row, grid.col);
            grid.row = empty_row;
            grid.col = empty_col;
            commands.entity(entity).remove::<Sliding>();
            completed.send(MoveCompleted);
            next_phase.set(PlayPhase::Idle);
            break;
        }
    }
}

fn check_win(
    board: Res<Board>,
    mut completed: EventReader<MoveCompleted>,
    mut next_phase: ResMut<NextState<PlayPhase>>,
    mut solved: EventWriter<PuzzleSolved>,
) {
    if completed.read().next().is_none() {
        return;
    }
    completed.clear();
    if board.is_solved() {
        info!("Solved!");
        solved.send(PuzzleSolved);
        next_phase.set(PlayPhase::Solved);
    }
}

fn celebrate(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    time: Res<Time>,
    mut stopwatch: ResMut<Stopwatch>,
    mut tiles: Query<&mut Sprite, With<TileFace>>,
) {
    stopwatch.pause(time.elapsed_secs_f64());
    for mut sprite in &mut tiles {
        sprite.color = TILE_COMPLETION_COLOUR;
    }
    commands.spawn((
        Text2d::new("You Did It!"),
        TextFont {
            font: asset_server.load(FONT),
            font_size: 60.0,
            ..default()
        },
        TextColor(BANNER_COLOUR),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_xyz(0.0, 0.0, 10.0),
        PuzzleUi,
    ));
}

fn handle_menu_button(
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    pause: Res<State<PauseState>>,
    phase: Res<State<PlayPhase>>,
    mut buttons: Query<(&mut Sprite, &Transform), With<MenuButton>>,
    mut armed: Local<bool>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    // Matches tile selection: the button ignores input mid-slide or paused.
    if *pause.get() == PauseState::Paused || *phase.get() == PlayPhase::Sliding {
        return;
    }
    if let Some(point) = pointer_just_pressed(&mouse_button_input, &touch_input, &windows, &camera)
    {
        for (mut sprite, transform) in &mut buttons {
            if panel_contains(&sprite, transform, point) {
                sprite.color = BUTTON_DOWN_COLOUR;
                *armed = true;
            }
        }
    }
    if pointer_just_released(&mouse_button_input, &touch_input, &windows, &camera).is_some() {
        for (mut sprite, _) in &mut buttons {
            sprite.color = BUTTON_COLOUR;
        }
        if *armed {
            *armed = false;
            next_screen.set(Screen::StartMenu);
        }
    }
}

fn sync_tile_transforms(
    layout: Res<BoardLayout>,
    mut tiles: Query<(&ScreenPos, &mut Transform), Changed<ScreenPos>>,
) {
    for (screen, mut transform) in &mut tiles {
        transform.translation =
            screen_to_world(screen.0.as_vec2(), layout.tile_size().as_vec2(), 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    // Stands in for the tail of a slide: announce the completed move and
    // hand the phase back to Idle, exactly what the slide system does on
    // arrival.
    fn finish_solving_move(
        mut completed: EventWriter<MoveCompleted>,
        mut next_phase: ResMut<NextState<PlayPhase>>,
        mut done: Local<bool>,
    ) {
        if *done {
            return;
        }
        *done = true;
        completed.send(MoveCompleted);
        next_phase.set(PlayPhase::Idle);
    }

    #[test]
    fn solving_move_is_detected_in_the_frame_it_completes() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<PlayPhase>()
            .add_event::<MoveCompleted>()
            .add_event::<PuzzleSolved>()
            .insert_resource(Board::solved(3))
            .add_systems(Update, (finish_solving_move, check_win).chain());

        // First update sends the event and runs the chained win check;
        // second update applies the queued phase transition.
        app.update();
        app.update();

        assert_eq!(
            app.world().resource::<State<PlayPhase>>().get(),
            &PlayPhase::Solved,
            "the win check must see the finishing move's event, not Idle",
        );
        assert!(
            !app.world().resource::<Events<PuzzleSolved>>().is_empty(),
            "solving must be announced exactly when the phase locks",
        );
    }
}
