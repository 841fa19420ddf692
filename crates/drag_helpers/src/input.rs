use bevy::prelude::*;

/// One frame of primary pointer state, in window (screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerReading {
    /// `None` when the cursor left the window; the button state is still valid.
    pub screen: Option<Vec2>,
    pub just_pressed: bool,
    pub pressed: bool,
    pub just_released: bool,
}

/// Reads the primary pointer. The left mouse button wins while it is held or
/// was just released, otherwise the first active touch is used, otherwise the
/// hovering mouse cursor.
pub fn read_pointer(
    buttons: &ButtonInput<MouseButton>,
    touches: &Touches,
    window: &Window,
) -> Option<PointerReading> {
    let mouse_busy = buttons.pressed(MouseButton::Left) || buttons.just_released(MouseButton::Left);

    if !mouse_busy {
        if let Some(reading) = read_touch(touches) {
            return Some(reading);
        }
    }

    let screen = window.cursor_position();
    if screen.is_none() && !mouse_busy {
        return None;
    }

    Some(PointerReading {
        screen,
        just_pressed: buttons.just_pressed(MouseButton::Left),
        pressed: buttons.pressed(MouseButton::Left),
        just_released: buttons.just_released(MouseButton::Left),
    })
}

fn read_touch(touches: &Touches) -> Option<PointerReading> {
    if let Some(touch) = touches.iter_just_pressed().next() {
        return Some(PointerReading {
            screen: Some(touch.position()),
            just_pressed: true,
            pressed: true,
            just_released: false,
        });
    }

    if let Some(touch) = touches.iter_just_released().next() {
        return Some(PointerReading {
            screen: Some(touch.position()),
            just_pressed: false,
            pressed: false,
            just_released: true,
        });
    }

    let touch = touches.iter().next()?;
    Some(PointerReading {
        screen: Some(touch.position()),
        just_pressed: false,
        pressed: true,
        just_released: false,
    })
}

pub fn screen_to_world(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    screen: Vec2,
) -> Option<Vec2> {
    camera.viewport_to_world_2d(camera_transform, screen).ok()
}
