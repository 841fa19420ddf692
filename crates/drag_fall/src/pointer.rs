use core::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::input::InputSystem;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use drag_helpers::input::{read_pointer, screen_to_world};

use crate::DragFallSet;

/// Publishes [`PointerMoved`] samples while tracking is active.
pub struct PointerTrackerPlugin;

impl Plugin for PointerTrackerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInput>()
            .init_resource::<PointerTracker>()
            .add_event::<PointerMoved>()
            .add_event::<TrackingStopped>()
            .add_systems(Update, sample_pointer.in_set(DragFallSet::Sample));
    }
}

/// Fills [`PointerInput`] from the primary window's mouse and touches. Leave
/// it out in headless hosts and write the resource directly instead.
pub struct PointerCapturePlugin;

impl Plugin for PointerCapturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInput>()
            .add_systems(PreUpdate, capture_pointer.after(InputSystem));
    }
}

/// Primary pointer state for the current frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub screen: Option<Vec2>,
    pub world: Option<Vec2>,
    pub just_pressed: bool,
    pub pressed: bool,
    pub just_released: bool,
}

/// One pointer sample. `sequence` grows by one per sample across sessions.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerMoved {
    pub sequence: u64,
    pub position: Vec2,
}

/// Sent exactly once when a tracking session ends.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingStopped {
    pub owner: Entity,
}

/// Marks an entity that wants pointer samples numbered `since` and later.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSubscription {
    pub since: u64,
}

impl PointerSubscription {
    pub fn accepts(&self, sample: &PointerMoved) -> bool {
        sample.sequence >= self.since
    }
}

#[derive(Resource, Debug)]
pub struct PointerTracker {
    active: bool,
    owner: Option<Entity>,
    timer: Timer,
    sample_due: bool,
    next_sequence: u64,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

impl PointerTracker {
    pub fn new(interval: Duration) -> Self {
        Self {
            active: false,
            owner: None,
            timer: Timer::new(interval, TimerMode::Repeating),
            sample_due: false,
            next_sequence: 0,
        }
    }

    /// Starts a session for `owner`. A running session is taken over and its
    /// owner is not notified.
    pub fn start(&mut self, owner: Entity) {
        if let Some(previous) = self.owner.filter(|_| self.active) {
            debug!("Pointer tracking moved from {previous} to {owner}");
        }
        self.active = true;
        self.owner = Some(owner);
        self.timer.reset();
        self.sample_due = true;
    }

    /// Ends the session. Returns the owner to notify, or `None` when nothing
    /// was being tracked.
    pub fn stop(&mut self) -> Option<Entity> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.sample_due = false;
        self.owner.take()
    }

    pub fn is_tracking(&self) -> bool {
        self.active
    }

    /// Sequence number the next sample will carry.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Advances the cadence. Yields a sequence number when a sample is due;
    /// the first one is due right after `start`.
    pub fn poll(&mut self, delta: Duration) -> Option<u64> {
        if !self.active {
            return None;
        }

        self.timer.tick(delta);
        if !self.sample_due && !self.timer.just_finished() {
            return None;
        }

        self.sample_due = false;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Some(sequence)
    }
}

/// Start/stop access that keeps the stop notification exactly-once.
#[derive(SystemParam)]
pub struct TrackerControl<'w> {
    tracker: ResMut<'w, PointerTracker>,
    stopped: EventWriter<'w, TrackingStopped>,
}

impl TrackerControl<'_> {
    pub fn start(&mut self, owner: Entity) {
        self.tracker.start(owner);
    }

    pub fn stop(&mut self) {
        if let Some(owner) = self.tracker.stop() {
            self.stopped.send(TrackingStopped { owner });
        }
    }
}

fn sample_pointer(
    time: Res<Time>,
    pointer: Res<PointerInput>,
    mut tracker: ResMut<PointerTracker>,
    mut moved: EventWriter<PointerMoved>,
) {
    let Some(sequence) = tracker.poll(time.delta()) else {
        return;
    };
    let Some(position) = pointer.world else {
        return;
    };
    moved.send(PointerMoved { sequence, position });
}

fn capture_pointer(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut pointer: ResMut<PointerInput>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    let Some(reading) = read_pointer(&buttons, &touches, window) else {
        pointer.just_pressed = false;
        pointer.pressed = false;
        pointer.just_released = false;
        return;
    };

    // Keep the last known position when the cursor leaves the window mid-drag
    if let Some(screen) = reading.screen {
        pointer.screen = Some(screen);
        if let Ok((camera, camera_transform)) = cameras.get_single() {
            pointer.world = screen_to_world(camera, camera_transform, screen).or(pointer.world);
        }
    }
    pointer.just_pressed = reading.just_pressed;
    pointer.pressed = reading.pressed;
    pointer.just_released = reading.just_released;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Recorded, headless_app, record, set_pointer};

    const FRAME: Duration = Duration::from_millis(16);

    fn owner() -> Entity {
        Entity::from_raw(7)
    }

    #[test]
    fn first_sample_is_due_immediately_then_on_cadence() {
        let mut tracker = PointerTracker::new(FRAME);
        assert_eq!(tracker.poll(FRAME), None);

        tracker.start(owner());
        assert_eq!(tracker.poll(Duration::ZERO), Some(0));
        assert_eq!(tracker.poll(Duration::from_millis(8)), None);
        assert_eq!(tracker.poll(Duration::from_millis(8)), Some(1));
        assert_eq!(tracker.poll(FRAME), Some(2));
    }

    #[test]
    fn stop_reports_the_owner_once() {
        let mut tracker = PointerTracker::new(FRAME);
        assert_eq!(tracker.stop(), None);

        tracker.start(owner());
        assert_eq!(tracker.stop(), Some(owner()));
        assert_eq!(tracker.stop(), None);
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.poll(FRAME), None);
    }

    #[test]
    fn restart_takes_over_the_session() {
        let mut tracker = PointerTracker::new(FRAME);
        tracker.start(owner());
        tracker.poll(Duration::ZERO);

        let other = Entity::from_raw(9);
        tracker.start(other);
        // Sequence numbers keep growing across sessions
        assert_eq!(tracker.poll(Duration::ZERO), Some(1));
        assert_eq!(tracker.stop(), Some(other));
    }

    #[test]
    fn subscription_ignores_older_samples() {
        let subscription = PointerSubscription { since: 4 };
        let sample = |sequence| PointerMoved {
            sequence,
            position: Vec2::ZERO,
        };
        assert!(!subscription.accepts(&sample(3)));
        assert!(subscription.accepts(&sample(4)));
        assert!(subscription.accepts(&sample(10)));
    }

    #[test]
    fn tracker_publishes_samples_in_order_until_stopped() {
        let mut app = headless_app();
        record::<PointerMoved>(&mut app);

        app.world_mut().resource_mut::<PointerTracker>().start(owner());
        for x in [10.0, 20.0, 30.0] {
            set_pointer(&mut app, Vec2::new(x, 0.0), true);
            app.update();
        }
        app.world_mut().resource_mut::<PointerTracker>().stop();
        set_pointer(&mut app, Vec2::new(40.0, 0.0), true);
        app.update();
        app.update();

        let samples = &app.world().resource::<Recorded<PointerMoved>>().0;
        let positions: Vec<f32> = samples.iter().map(|sample| sample.position.x).collect();
        let sequences: Vec<u64> = samples.iter().map(|sample| sample.sequence).collect();
        assert_eq!(positions, vec![10.0, 20.0, 30.0]);
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    fn stop_twice(mut control: TrackerControl) {
        control.stop();
        control.stop();
    }

    #[test]
    fn repeated_stop_notifies_once() {
        let mut app = headless_app();
        record::<TrackingStopped>(&mut app);
        app.add_systems(Update, stop_twice.in_set(DragFallSet::Drag));

        app.world_mut().resource_mut::<PointerTracker>().start(owner());
        app.update();
        app.update();

        assert_eq!(
            app.world().resource::<Recorded<TrackingStopped>>().0,
            vec![TrackingStopped { owner: owner() }]
        );
    }
}
