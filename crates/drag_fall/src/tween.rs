use std::collections::VecDeque;

use core::time::Duration;

use bevy::prelude::*;

use crate::DragFallSet;

pub struct TweenPlugin;

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TweenFinished>().add_systems(
            Update,
            (animate_scale, animate_translation).in_set(DragFallSet::Animate),
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    #[default]
    OutQuad,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::OutQuad => (1.0 - t).mul_add(-(1.0 - t), 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenChannel {
    Scale,
    Translation,
}

/// Sent when the last step of a tween completes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenFinished {
    pub entity: Entity,
    pub channel: TweenChannel,
}

#[derive(Debug, Clone)]
struct TweenStep {
    target: Vec3,
    timer: Timer,
}

/// Queue of ramps. Each step starts from whatever value is current when it
/// begins, so a replaced tween continues smoothly.
#[derive(Debug, Clone)]
pub struct TweenTrack {
    steps: VecDeque<TweenStep>,
    from: Option<Vec3>,
    ease: Ease,
}

impl TweenTrack {
    pub fn new(target: Vec3, seconds: f32) -> Self {
        Self {
            steps: VecDeque::new(),
            from: None,
            ease: Ease::default(),
        }
        .then(target, seconds)
    }

    #[must_use]
    pub fn then(mut self, target: Vec3, seconds: f32) -> Self {
        self.steps.push_back(TweenStep {
            target,
            timer: Timer::new(Duration::from_secs_f32(seconds.max(0.0)), TimerMode::Once),
        });
        self
    }

    #[must_use]
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Value for this frame, or `None` once every step has played.
    pub fn tick(&mut self, current: Vec3, delta: Duration) -> Option<Vec3> {
        let step = self.steps.front_mut()?;
        let from = *self.from.get_or_insert(current);

        step.timer.tick(delta);
        let value = if step.timer.finished() {
            step.target
        } else {
            from.lerp(step.target, self.ease.apply(step.timer.fraction()))
        };

        if step.timer.finished() {
            self.steps.pop_front();
            self.from = None;
        }
        Some(value)
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Uniform scale ramp. Inserting a new one replaces the running one.
#[derive(Component, Debug, Clone)]
pub struct ScaleTween(pub TweenTrack);

impl ScaleTween {
    pub fn to(scale: f32, seconds: f32) -> Self {
        Self(TweenTrack::new(Vec3::splat(scale), seconds))
    }

    #[must_use]
    pub fn then(self, scale: f32, seconds: f32) -> Self {
        Self(self.0.then(Vec3::splat(scale), seconds))
    }
}

/// Local translation ramp. Inserting a new one replaces the running one.
#[derive(Component, Debug, Clone)]
pub struct TranslationTween(pub TweenTrack);

impl TranslationTween {
    pub fn to(target: Vec3, seconds: f32) -> Self {
        Self(TweenTrack::new(target, seconds))
    }

    #[must_use]
    pub fn then(self, target: Vec3, seconds: f32) -> Self {
        Self(self.0.then(target, seconds))
    }

    #[must_use]
    pub fn with_ease(self, ease: Ease) -> Self {
        Self(self.0.with_ease(ease))
    }
}

fn animate_scale(
    mut commands: Commands,
    time: Res<Time>,
    mut finished: EventWriter<TweenFinished>,
    mut query: Query<(Entity, &mut ScaleTween, &mut Transform)>,
) {
    for (entity, mut tween, mut transform) in &mut query {
        if let Some(scale) = tween.0.tick(transform.scale, time.delta()) {
            transform.scale = scale;
        }
        if tween.0.is_finished() {
            commands.entity(entity).remove::<ScaleTween>();
            finished.send(TweenFinished {
                entity,
                channel: TweenChannel::Scale,
            });
        }
    }
}

fn animate_translation(
    mut commands: Commands,
    time: Res<Time>,
    mut finished: EventWriter<TweenFinished>,
    mut query: Query<(Entity, &mut TranslationTween, &mut Transform)>,
) {
    for (entity, mut tween, mut transform) in &mut query {
        if let Some(translation) = tween.0.tick(transform.translation, time.delta()) {
            transform.translation = translation;
        }
        if tween.0.is_finished() {
            commands.entity(entity).remove::<TranslationTween>();
            finished.send(TweenFinished {
                entity,
                channel: TweenChannel::Translation,
            });
        }
    }
}
