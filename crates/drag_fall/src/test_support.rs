use core::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::DragFallPlugin;
use crate::obstacle::{Obstacle, ObstacleKind};
use crate::pointer::PointerInput;
use crate::settings::DragFallSettings;

pub const FRAME: Duration = Duration::from_millis(16);

/// Windowless app with the full drag-and-fall stack and a fixed frame time.
pub fn headless_app() -> App {
    headless_app_with(DragFallSettings::default(), FRAME)
}

pub fn headless_app_with(settings: DragFallSettings, frame: Duration) -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        bevy::hierarchy::HierarchyPlugin,
        bevy::transform::TransformPlugin,
        DragFallPlugin { settings },
    ))
    .insert_resource(TimeUpdateStrategy::ManualDuration(frame));

    // The very first frame always has a zero delta
    app.update();
    app
}

/// Every `E` sent since the collector was installed.
#[derive(Resource, Debug)]
pub struct Recorded<E: Event>(pub Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

pub fn record<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>()
        .add_systems(Last, collect::<E>);
}

fn collect<E: Event + Clone>(mut events: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(events.read().cloned());
}

pub fn set_pointer(app: &mut App, world: Vec2, pressed: bool) {
    let mut pointer = app.world_mut().resource_mut::<PointerInput>();
    pointer.world = Some(world);
    pointer.screen = Some(world);
    pointer.pressed = pressed;
    pointer.just_pressed = false;
    pointer.just_released = false;
}

/// Presses at `world` for exactly one frame.
pub fn press_at(app: &mut App, world: Vec2) {
    set_pointer(app, world, true);
    app.world_mut().resource_mut::<PointerInput>().just_pressed = true;
    app.update();
    app.world_mut().resource_mut::<PointerInput>().just_pressed = false;
}

/// Moves the held pointer to `world` and runs one frame.
pub fn drag_to(app: &mut App, world: Vec2) {
    set_pointer(app, world, true);
    app.update();
}

/// Lifts the pointer where it currently is, for exactly one frame.
pub fn release(app: &mut App) {
    {
        let mut pointer = app.world_mut().resource_mut::<PointerInput>();
        pointer.pressed = false;
        pointer.just_released = true;
    }
    app.update();
    app.world_mut().resource_mut::<PointerInput>().just_released = false;
}

pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Root-level box obstacle with its global transform already in place.
pub fn spawn_obstacle(app: &mut App, kind: ObstacleKind, center: Vec2, half_size: Vec2) -> Entity {
    let transform = Transform::from_translation(center.extend(0.0));
    app.world_mut()
        .spawn((
            Obstacle { half_size },
            kind,
            transform,
            GlobalTransform::from(transform),
        ))
        .id()
}
