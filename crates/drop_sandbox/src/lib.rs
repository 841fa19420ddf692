use bevy::prelude::*;
use drag_fall::prelude::*;

mod scene;

use scene::ScenePlugin;

pub fn run() {
    drag_helpers::get_default_app(env!("CARGO_PKG_NAME"))
        .add_plugins(DragFallPlugin::default())
        .add_plugins(PointerCapturePlugin)
        .add_plugins(ScenePlugin)
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
