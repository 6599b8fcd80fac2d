use bevy::prelude::*;

use crate::{FONT, WINDOW_HEIGHT, WINDOW_WIDTH};

/// Visual description of a rectangular panel with a centered text label.
#[derive(Clone, Copy)]
pub struct PanelStyle {
    pub size: Vec2,
    pub color: Color,
    pub label_color: Color,
    pub font_size: f32,
}

/// Entities making up a spawned panel. The label is a child of the panel,
/// so despawning the panel recursively removes both.
#[derive(Clone, Copy)]
pub struct PanelIds {
    pub panel: Entity,
    pub label: Entity,
}

/// Spawns a colored rectangle with a label centered on it. Callers attach
/// their own marker components to the returned entities.
pub fn spawn_panel(
    commands: &mut Commands,
    asset_server: &Res<AssetServer>,
    style: PanelStyle,
    translation: Vec3,
    label: &str,
) -> PanelIds {
    let panel = commands
        .spawn((
            Sprite::from_color(style.color, style.size),
            Transform::from_translation(translation),
        ))
        .id();

    let label = commands
        .spawn((
            Text2d::new(label),
            TextFont {
                font: asset_server.load(FONT),
                font_size: style.font_size,
                ..default()
            },
            TextColor(style.label_color),
            TextLayout::new_with_justify(JustifyText::Center),
            Transform::from_xyz(0.0, 0.0, 1.0),
        ))
        .id();

    commands.entity(panel).add_child(label);

    PanelIds { panel, label }
}

/// Point-containment test against a panel's sprite rectangle.
pub fn panel_contains(sprite: &Sprite, transform: &Transform, point: Vec2) -> bool {
    let size = sprite.custom_size.unwrap_or(Vec2::ONE);
    Rect::from_center_size(transform.translation.truncate(), size).contains(point)
}

/// Converts a top-left screen-space rectangle (y grows downward) into the
/// world-space translation of a sprite centered on that rectangle.
pub fn screen_to_world(origin: Vec2, size: Vec2, z: f32) -> Vec3 {
    Vec3::new(
        origin.x + size.x / 2.0 - WINDOW_WIDTH / 2.0,
        WINDOW_HEIGHT / 2.0 - origin.y - size.y / 2.0,
        z,
    )
}

pub fn despawn_all<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
