use bevy::prelude::*;
use drag_fall::prelude::*;
use drag_fall::tween::{TweenChannel, TweenFinished};
use drag_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_shelf, spawn_hint))
            .add_systems(PostStartup, drop_loose_items)
            .add_systems(Update, highlight_held.after(DragFallSet::Drag))
            .add_systems(Update, restore_when_shrunk.after(DragFallSet::Animate));
    }
}

// Three screens of content behind a one-screen viewport
const CONTENT_WIDTH: f32 = WINDOW_WIDTH * 3.0;
const FLOOR_TOP: f32 = -190.0;
// Thicker than one frame of fall so nothing tunnels through
const FLOOR_THICKNESS: f32 = 80.0;

const CRATE_SIZE: Vec2 = Vec2::new(180.0, 120.0);
const CRATE_INNER: Vec2 = Vec2::new(120.0, 80.0);
const CRATE_POSITIONS: [f32; 3] = [300.0, 1100.0, 1900.0];

const ITEM_SIZE: Vec2 = Vec2::splat(56.0);
const ITEM_COUNT: usize = 10;

const FLOOR_COLOR: Color = Color::srgb(0.35, 0.28, 0.22);
const CRATE_COLOR: Color = Color::srgb(0.55, 0.42, 0.25);
const CRATE_INNER_COLOR: Color = Color::srgb(0.3, 0.22, 0.12);

#[derive(Component)]
struct ItemColor(Color);

fn spawn_shelf(mut commands: Commands) {
    // Content x = 0 sits in the middle of the view when scrolled fully left
    let content_left = -WINDOW_WIDTH / 2.0;
    let content_center = content_left + CONTENT_WIDTH / 2.0;

    commands
        .spawn((
            Name::new("Viewport"),
            ScrollViewport::new(Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT), CONTENT_WIDTH),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|viewport| {
            viewport
                .spawn((
                    Name::new("Content"),
                    ScrollContent,
                    Transform::default(),
                    Visibility::default(),
                ))
                .with_children(|content| {
                    let floor_size = Vec2::new(CONTENT_WIDTH, FLOOR_THICKNESS);
                    content.spawn((
                        Name::new("Floor"),
                        Sprite::from_color(FLOOR_COLOR, floor_size),
                        Transform::from_xyz(content_center, FLOOR_TOP - FLOOR_THICKNESS / 2.0, 0.0),
                        Obstacle {
                            half_size: floor_size / 2.0,
                        },
                        ObstacleTag::new("Floor"),
                    ));

                    for x in CRATE_POSITIONS {
                        spawn_crate(content, Vec2::new(x, FLOOR_TOP + CRATE_SIZE.y / 2.0));
                    }

                    for index in 0..ITEM_COUNT {
                        let x = fastrand::f32().mul_add(CONTENT_WIDTH - 200.0, content_left + 100.0);
                        let y = fastrand::f32().mul_add(160.0, 60.0);
                        let color = Color::hsl(fastrand::f32() * 360.0, 0.65, 0.6);
                        content.spawn((
                            Name::new(format!("Item {index}")),
                            Draggable,
                            Footprint(ITEM_SIZE),
                            Obstacle {
                                half_size: ITEM_SIZE / 2.0,
                            },
                            ObstacleTag::new("Object"),
                            Sprite::from_color(color, ITEM_SIZE),
                            ItemColor(color),
                            Transform::from_xyz(x, y, 2.0 + index as f32 * 0.01),
                        ));
                    }
                });
        });
}

fn spawn_crate(content: &mut ChildBuilder, position: Vec2) {
    let mut inner = Entity::PLACEHOLDER;
    let mut crate_box = content.spawn((
        Name::new("Crate"),
        Sprite::from_color(CRATE_COLOR, CRATE_SIZE),
        Transform::from_translation(position.extend(1.0)),
        Obstacle {
            half_size: CRATE_SIZE / 2.0,
        },
        ObstacleTag::new("Object"),
    ));
    crate_box.with_children(|parent| {
        inner = parent
            .spawn((
                Name::new("Crate interior"),
                Sprite::from_color(CRATE_INNER_COLOR, CRATE_INNER),
                Transform::from_xyz(0.0, 10.0, 0.1),
                RegionBounds {
                    half_size: CRATE_INNER / 2.0,
                },
            ))
            .id();
    });
    crate_box.insert(InnerRegion(inner));
}

// Items start in the air and settle on the first frames
fn drop_loose_items(items: Query<Entity, With<Draggable>>, mut falls: EventWriter<StartFall>) {
    for entity in &items {
        falls.send(StartFall { entity });
    }
}

fn spawn_hint(mut commands: Commands) {
    commands.spawn((
        Text2d::new("Drag a block onto the shelf or into a crate. Drag empty space to scroll."),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.85, 0.85)),
        Transform::from_xyz(0.0, WINDOW_HEIGHT / 2.0 - 30.0, 10.0),
    ));
}

fn highlight_held(mut items: Query<(&DragState, &ItemColor, &mut Sprite), Changed<DragState>>) {
    for (state, ItemColor(color), mut sprite) in &mut items {
        if matches!(state, DragState::Pressed | DragState::Dragging) {
            sprite.color = color.lighter(0.15);
        }
    }
}

// Dropped items keep their highlight until they are back to normal size
fn restore_when_shrunk(
    mut finished: EventReader<TweenFinished>,
    mut items: Query<(&DragState, &ItemColor, &mut Sprite)>,
) {
    for event in finished.read() {
        if event.channel != TweenChannel::Scale {
            continue;
        }
        let Ok((state, ItemColor(color), mut sprite)) = items.get_mut(event.entity) else {
            continue;
        };
        if matches!(state, DragState::Idle | DragState::Released) {
            sprite.color = *color;
        }
    }
}
