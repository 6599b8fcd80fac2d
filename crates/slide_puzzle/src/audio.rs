use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::prelude::*;
use bevy::log::warn;

use crate::game::{MoveCompleted, PuzzleSolved};

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
enum AssetState {
    #[default]
    Loading,
    Loaded,
    // Audio could not be loaded; the game keeps running in silence.
    Failed,
}

#[derive(AssetCollection, Resource)]
struct AudioAssets {
    #[asset(path = "audio/move.ogg")]
    move_effect: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(path = "audio/victory.ogg")]
    victory: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(path = "audio/music.ogg")]
    music: Handle<bevy_kira_audio::prelude::AudioSource>,
}

/// Background music channel, pausable independently of the effects.
#[derive(Resource)]
struct MusicChannel;

#[derive(Resource)]
struct EffectsChannel;

/// Whether background music is audible. The start menu's music button
/// toggles this and mirrors it in its label.
#[derive(Resource)]
pub struct MusicEnabled(pub bool);

impl Default for MusicEnabled {
    fn default() -> Self {
        Self(true)
    }
}

#[derive(Event)]
pub struct ToggleMusic;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .add_audio_channel::<MusicChannel>()
            .add_audio_channel::<EffectsChannel>()
            .init_resource::<MusicEnabled>()
            .add_event::<ToggleMusic>()
            .init_state::<AssetState>()
            .add_loading_state(
                LoadingState::new(AssetState::Loading)
                    .continue_to_state(AssetState::Loaded)
                    .on_failure_continue_to_state(AssetState::Failed)
                    .load_collection::<AudioAssets>(),
            )
            .add_systems(OnEnter(AssetState::Loaded), start_music)
            .add_systems(OnEnter(AssetState::Failed), report_missing_audio)
            .add_systems(
                Update,
                (move_audio, victory_audio).run_if(in_state(AssetState::Loaded)),
            )
            .add_systems(Update, toggle_music);
    }
}

fn start_music(
    audio_assets: Res<AudioAssets>,
    music: Res<AudioChannel<MusicChannel>>,
    enabled: Res<MusicEnabled>,
) {
    music.play(audio_assets.music.clone_weak()).looped();
    if !enabled.0 {
        music.pause();
    }
}

fn report_missing_audio() {
    warn!("failed to load audio assets; continuing without sound");
}

fn move_audio(
    audio_assets: Res<AudioAssets>,
    effects: Res<AudioChannel<EffectsChannel>>,
    mut moves: EventReader<MoveCompleted>,
) {
    for _ in moves.read() {
        effects.play(audio_assets.move_effect.clone_weak());
    }
}

fn victory_audio(
    audio_assets: Res<AudioAssets>,
    effects: Res<AudioChannel<EffectsChannel>>,
    mut solves: EventReader<PuzzleSolved>,
) {
    for _ in solves.read() {
        effects.play(audio_assets.victory.clone_weak());
    }
}

fn toggle_music(
    mut toggles: EventReader<ToggleMusic>,
    mut enabled: ResMut<MusicEnabled>,
    music: Res<AudioChannel<MusicChannel>>,
) {
    for _ in toggles.read() {
        enabled.0 = !enabled.0;
        if enabled.0 {
            music.resume();
        } else {
            music.pause();
        }
    }
}
