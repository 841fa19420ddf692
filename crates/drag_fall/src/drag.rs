use bevy::prelude::*;

use crate::DragFallSet;
use crate::bounds::{Footprint, contains, to_local, world_affine, world_position, world_rect};
use crate::fall::{FallCompleted, Falling, StartFall};
use crate::pointer::{
    PointerInput, PointerMoved, PointerSubscription, PointerTracker, TrackerControl,
    TrackingStopped,
};
use crate::settings::DragFallSettings;
use crate::tween::{ScaleTween, TranslationTween};
use crate::viewport::ScrollViewport;

pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (press_draggable, begin_drag, follow_pointer, release_draggable)
                .chain()
                .in_set(DragFallSet::Drag),
        )
        .add_systems(
            Update,
            (settle_after_fall, log_tracking_stopped).in_set(DragFallSet::Settle),
        );
    }
}

/// Entity that can be picked up with the pointer and dropped to fall.
#[derive(Component, Debug, Default, Clone, Copy)]
#[require(DragState)]
pub struct Draggable;

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Pressed,
    Dragging,
    Released,
}

/// Lives from press to release.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Entity position minus pointer position at press, in parent space.
    pub offset: Vec2,
    pub is_dragging: bool,
    /// Nearest scroll viewport above the entity, if any.
    pub viewport: Option<Entity>,
}

fn press_draggable(
    mut commands: Commands,
    pointer: Res<PointerInput>,
    mut draggables: Query<
        (
            Entity,
            &GlobalTransform,
            &Footprint,
            &Transform,
            Option<&Parent>,
            &mut DragState,
            Has<Falling>,
        ),
        With<Draggable>,
    >,
    globals: Query<&GlobalTransform>,
    ancestors: Query<&Parent>,
    mut viewports: Query<&mut ScrollViewport>,
    mut tracker: TrackerControl,
) {
    if !pointer.just_pressed {
        return;
    }
    let Some(world) = pointer.world else {
        return;
    };

    let Some(target) = draggables
        .iter()
        .filter(|(_, global, footprint, ..)| {
            contains(&world_rect(global.affine(), footprint.0), world)
        })
        .max_by(|(_, a, ..), (_, b, ..)| a.translation().z.total_cmp(&b.translation().z))
        .map(|(entity, ..)| entity)
    else {
        return;
    };

    let Ok((entity, _, _, transform, parent, mut state, falling)) = draggables.get_mut(target)
    else {
        return;
    };
    // Falling bodies keep their state, so check the marker too
    if *state != DragState::Idle || falling {
        debug!("Ignoring press on {entity} while {state:?} (falling: {falling})");
        return;
    }

    let viewport = ancestors
        .iter_ancestors(entity)
        .find(|ancestor| viewports.contains(*ancestor));
    if let Some(mut scroll) = viewport.and_then(|viewport| viewports.get_mut(viewport).ok()) {
        scroll.input_enabled = false;
    }

    let parent_global = parent.and_then(|parent| globals.get(parent.get()).ok());
    let offset = transform.translation.truncate() - to_local(parent_global, world);

    commands
        .entity(entity)
        .remove::<TranslationTween>()
        .insert(DragSession {
            offset,
            is_dragging: true,
            viewport,
        });
    *state = DragState::Pressed;
    tracker.start(entity);
    debug!("Pressed {entity} with offset {offset}");
}

fn begin_drag(
    mut commands: Commands,
    settings: Res<DragFallSettings>,
    tracker: Res<PointerTracker>,
    mut sessions: Query<(Entity, &DragSession, &mut DragState)>,
) {
    for (entity, session, mut state) in &mut sessions {
        if *state != DragState::Pressed || !session.is_dragging {
            continue;
        }

        *state = DragState::Dragging;
        commands.entity(entity).insert((
            ScaleTween::to(settings.lift_scale, settings.scale_duration),
            PointerSubscription {
                since: tracker.next_sequence(),
            },
        ));
    }
}

fn follow_pointer(
    time: Res<Time>,
    settings: Res<DragFallSettings>,
    mut samples: EventReader<PointerMoved>,
    mut dragged: Query<(
        &DragState,
        &DragSession,
        &PointerSubscription,
        &mut Transform,
        Option<&Parent>,
    )>,
    globals: Query<&GlobalTransform>,
    mut viewports: Query<&mut ScrollViewport>,
) {
    let samples: Vec<PointerMoved> = samples.read().copied().collect();
    if samples.is_empty() {
        return;
    }

    let step = time.delta_secs() * settings.scroll_speed;
    for (state, session, subscription, mut transform, parent) in &mut dragged {
        if *state != DragState::Dragging {
            continue;
        }
        let parent_global = parent.and_then(|parent| globals.get(parent.get()).ok());

        for sample in samples.iter().filter(|sample| subscription.accepts(sample)) {
            let anchored = to_local(parent_global, sample.position) + session.offset;
            transform.translation.x = anchored.x;
            transform.translation.y = anchored.y;

            let Some(viewport) = session.viewport else {
                continue;
            };
            let (Ok(mut scroll), Ok(viewport_global)) =
                (viewports.get_mut(viewport), globals.get(viewport))
            else {
                continue;
            };

            let position = world_position(world_affine(parent_global, &transform));
            let in_view = viewport_global
                .affine()
                .inverse()
                .transform_point3(position);
            let from_left = in_view.x + scroll.view_size.x / 2.0;
            if let Some(direction) = scroll.edge_scroll(
                from_left,
                settings.edge_margin,
                step,
                settings.scroll_damping,
            ) {
                trace!("Edge scrolling {direction:?} to {:.3}", scroll.normalized_x());
            }
        }
    }
}

fn release_draggable(
    mut commands: Commands,
    settings: Res<DragFallSettings>,
    pointer: Res<PointerInput>,
    mut sessions: Query<(Entity, &DragSession, &mut DragState)>,
    mut viewports: Query<&mut ScrollViewport>,
    mut tracker: TrackerControl,
    mut falls: EventWriter<StartFall>,
) {
    if !pointer.just_released {
        return;
    }

    for (entity, session, mut state) in &mut sessions {
        if !matches!(*state, DragState::Pressed | DragState::Dragging) {
            continue;
        }

        if let Some(mut scroll) = session
            .viewport
            .and_then(|viewport| viewports.get_mut(viewport).ok())
        {
            scroll.input_enabled = true;
        }
        tracker.stop();

        *state = DragState::Released;
        commands
            .entity(entity)
            .remove::<(DragSession, PointerSubscription)>()
            .insert(ScaleTween::to(1.0, settings.scale_duration));
        falls.send(StartFall { entity });
        debug!("Released {entity}");
    }
}

fn settle_after_fall(
    mut commands: Commands,
    settings: Res<DragFallSettings>,
    mut completed: EventReader<FallCompleted>,
    mut bodies: Query<(&mut DragState, &Transform)>,
) {
    for &FallCompleted {
        entity,
        already_resting,
    } in completed.read()
    {
        let Ok((mut state, transform)) = bodies.get_mut(entity) else {
            continue;
        };
        let current = *state;
        match current {
            DragState::Pressed | DragState::Dragging => {
                warn!("{entity} finished a fall while held, keeping the drag");
                continue;
            }
            DragState::Released => *state = DragState::Idle,
            DragState::Idle => {}
        }
        if already_resting {
            continue;
        }

        let landing = transform.translation;
        let lifted = |height: f32| landing + Vec3::Y * height;
        let step = settings.bounce_step_duration;
        commands.entity(entity).insert(
            TranslationTween::to(lifted(settings.bounce_height), step)
                .then(landing, step)
                .then(lifted(settings.rebound_height), step)
                .then(landing, step),
        );
    }
}

fn log_tracking_stopped(mut stopped: EventReader<TrackingStopped>) {
    for TrackingStopped { owner } in stopped.read() {
        debug!("Stopped tracking the pointer for {owner}");
    }
}
