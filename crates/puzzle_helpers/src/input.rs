use bevy::prelude::*;

/// World position of a pointer (left mouse button or first touch) press
/// that started this frame, if any.
pub fn pointer_just_pressed(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let position = if button_input.just_pressed(MouseButton::Left) {
        windows.single().cursor_position()?
    } else if touch_input.any_just_pressed() {
        touch_input.iter_just_pressed().next()?.position()
    } else {
        return None;
    };

    to_world(position, camera)
}

/// World position of a pointer release that happened this frame, if any.
pub fn pointer_just_released(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let position = if button_input.just_released(MouseButton::Left) {
        windows.single().cursor_position()?
    } else if touch_input.any_just_released() {
        touch_input.iter_just_released().next()?.position()
    } else {
        return None;
    };

    to_world(position, camera)
}

fn to_world(position: Vec2, camera: &Query<(&Camera, &GlobalTransform)>) -> Option<Vec2> {
    let (camera, camera_transform) = camera.single();

    camera
        .viewport_to_world(camera_transform, position)
        .map(|ray| ray.origin.truncate())
        .ok()
}
