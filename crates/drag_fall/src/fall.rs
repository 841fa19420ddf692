use bevy::prelude::*;

use crate::DragFallSet;
use crate::bounds::{Footprint, bottom_edge, closest_point, contains, world_affine, world_position};
use crate::obstacle::{Contact, ObstacleQuery, lands_on_floor};
use crate::settings::DragFallSettings;
use crate::tween::{Ease, TranslationTween};

pub struct FallPlugin;

impl Plugin for FallPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StartFall>()
            .add_event::<FallCompleted>()
            .add_systems(
                Update,
                (start_falls, step_falling)
                    .chain()
                    .in_set(DragFallSet::Fall),
            );
    }
}

/// Drops `entity` from where it is. Answered by exactly one [`FallCompleted`].
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartFall {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallCompleted {
    pub entity: Entity,
    /// True when the body was already supported on release and never fell.
    pub already_resting: bool,
}

/// Present while a body steps downward looking for a floor.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Falling;

fn start_falls(
    mut commands: Commands,
    mut requests: EventReader<StartFall>,
    settings: Res<DragFallSettings>,
    obstacles: ObstacleQuery,
    parents: Query<&GlobalTransform>,
    bodies: Query<(&Footprint, &Transform, Option<&Parent>, Has<Falling>)>,
    mut completed: EventWriter<FallCompleted>,
) {
    for &StartFall { entity } in requests.read() {
        let Ok((footprint, transform, parent, falling)) = bodies.get(entity) else {
            warn!("Cannot drop {entity}: it has no footprint");
            continue;
        };
        if falling {
            debug!("{entity} is already falling");
            continue;
        }

        let parent_global = parent.and_then(|parent| parents.get(parent.get()).ok());
        let affine = world_affine(parent_global, transform);
        let hits = obstacles.overlapping(&bottom_edge(affine, footprint.0), entity);

        match Contact::resolve(&hits) {
            Contact::Floor => {
                debug!("{entity} already rests on the floor");
                completed.send(FallCompleted {
                    entity,
                    already_resting: true,
                });
            }
            Contact::Object(object) => {
                let region = object
                    .inner
                    .and_then(|region| obstacles.inner_bounds(region));
                let position = world_position(affine);

                match region {
                    Some(region) if !contains(&region, position.truncate()) => {
                        let target = closest_point(&region, position.truncate());
                        let local = parent_global.map_or(target.extend(position.z), |parent| {
                            parent
                                .affine()
                                .inverse()
                                .transform_point3(target.extend(position.z))
                        });
                        debug!("{entity} snaps into {} at {target}", object.entity);
                        commands.entity(entity).insert(
                            TranslationTween::to(
                                Vec3::new(local.x, local.y, transform.translation.z),
                                settings.snap_duration,
                            )
                            .with_ease(Ease::Linear),
                        );
                    }
                    Some(_) => debug!("{entity} already rests inside {}", object.entity),
                    None => debug!("{entity} rests on {}", object.entity),
                }

                completed.send(FallCompleted {
                    entity,
                    already_resting: true,
                });
            }
            Contact::Unsupported => {
                commands.entity(entity).insert(Falling);
            }
        }
    }
}

fn step_falling(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<DragFallSettings>,
    obstacles: ObstacleQuery,
    parents: Query<&GlobalTransform>,
    mut falling: Query<(Entity, &Footprint, &mut Transform, Option<&Parent>), With<Falling>>,
    mut completed: EventWriter<FallCompleted>,
) {
    for (entity, footprint, mut transform, parent) in &mut falling {
        let parent_global = parent.and_then(|parent| parents.get(parent.get()).ok());
        let edge = bottom_edge(world_affine(parent_global, &transform), footprint.0);

        if lands_on_floor(&obstacles.overlapping(&edge, entity)) {
            info!("{entity} landed at y = {:.1}", transform.translation.y);
            commands.entity(entity).remove::<Falling>();
            completed.send(FallCompleted {
                entity,
                already_resting: false,
            });
            continue;
        }

        transform.translation.y -= settings.fall_speed * time.delta_secs();
    }
}
