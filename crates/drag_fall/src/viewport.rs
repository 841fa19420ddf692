use bevy::prelude::*;

use crate::DragFallSet;
use crate::pointer::PointerInput;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (pan_viewports, offset_scroll_content)
                .chain()
                .in_set(DragFallSet::Animate),
        );
    }
}

/// Horizontally scrollable window onto a wider [`ScrollContent`] child.
///
/// The viewport is centred on its transform. Content at local `x = 0` sits in
/// the middle of the view when fully scrolled to the left.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ScrollViewport {
    pub view_size: Vec2,
    pub content_width: f32,
    /// When false the viewport ignores pointer drags on itself.
    pub input_enabled: bool,
    normalized_x: f32,
    pan_anchor: Option<f32>,
}

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ScrollContent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

impl ScrollViewport {
    pub fn new(view_size: Vec2, content_width: f32) -> Self {
        Self {
            view_size,
            content_width,
            input_enabled: true,
            normalized_x: 0.0,
            pan_anchor: None,
        }
    }

    pub fn normalized_x(&self) -> f32 {
        self.normalized_x
    }

    pub fn set_normalized_x(&mut self, value: f32) {
        self.normalized_x = value.clamp(0.0, 1.0);
    }

    pub fn scrollable_width(&self) -> f32 {
        (self.content_width - self.view_size.x).max(0.0)
    }

    pub fn content_offset(&self) -> f32 {
        -self.normalized_x * self.scrollable_width()
    }

    /// Nudges the scroll position when `x`, measured from the left edge of the
    /// view, lies within `margin` of either edge. Moves by `damping` of `step`.
    ///
    /// The edges are those of this viewport's visible rectangle, not of the
    /// window. They only coincide when the viewport fills the screen.
    pub fn edge_scroll(
        &mut self,
        x: f32,
        margin: f32,
        step: f32,
        damping: f32,
    ) -> Option<ScrollDirection> {
        let direction = if x < margin {
            ScrollDirection::Left
        } else if x > self.view_size.x - margin {
            ScrollDirection::Right
        } else {
            return None;
        };

        let signed_step = match direction {
            ScrollDirection::Left => -step,
            ScrollDirection::Right => step,
        };
        self.set_normalized_x(signed_step.mul_add(damping, self.normalized_x));
        Some(direction)
    }
}

fn pan_viewports(pointer: Res<PointerInput>, mut viewports: Query<&mut ScrollViewport>) {
    for mut viewport in &mut viewports {
        let Some(world) = pointer.world.filter(|_| pointer.pressed && viewport.input_enabled)
        else {
            if viewport.pan_anchor.is_some() {
                viewport.pan_anchor = None;
            }
            continue;
        };

        let scrollable = viewport.scrollable_width();
        if let Some(anchor) = viewport.pan_anchor {
            if scrollable > 0.0 && (world.x - anchor).abs() > f32::EPSILON {
                let normalized = viewport.normalized_x - (world.x - anchor) / scrollable;
                viewport.set_normalized_x(normalized);
            }
        }
        viewport.pan_anchor = Some(world.x);
    }
}

fn offset_scroll_content(
    viewports: Query<(&ScrollViewport, &Children)>,
    mut contents: Query<&mut Transform, With<ScrollContent>>,
) {
    for (viewport, children) in &viewports {
        let offset = viewport.content_offset();
        for &child in children {
            if let Ok(mut transform) = contents.get_mut(child) {
                transform.translation.x = offset;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{headless_app, set_pointer};

    fn viewport() -> ScrollViewport {
        ScrollViewport::new(Vec2::new(800.0, 600.0), 2400.0)
    }

    #[test]
    fn inside_the_margins_nothing_moves() {
        let mut viewport = viewport();
        viewport.set_normalized_x(0.5);
        assert_eq!(viewport.edge_scroll(400.0, 100.0, 0.08, 0.1), None);
        assert_eq!(viewport.edge_scroll(100.0, 100.0, 0.08, 0.1), None);
        assert_eq!(viewport.edge_scroll(700.0, 100.0, 0.08, 0.1), None);
        assert!((viewport.normalized_x() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn edges_nudge_by_a_damped_step() {
        let mut viewport = viewport();
        viewport.set_normalized_x(0.5);

        assert_eq!(
            viewport.edge_scroll(750.0, 100.0, 0.08, 0.1),
            Some(ScrollDirection::Right)
        );
        assert!((viewport.normalized_x() - 0.508).abs() < 1e-6);

        assert_eq!(
            viewport.edge_scroll(-300.0, 100.0, 0.08, 0.1),
            Some(ScrollDirection::Left)
        );
        assert!((viewport.normalized_x() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scroll_position_stays_normalized() {
        let mut viewport = viewport();
        for _ in 0..50 {
            viewport.edge_scroll(-10_000.0, 100.0, 10.0, 1.0);
        }
        assert!(viewport.normalized_x().abs() < f32::EPSILON);

        for _ in 0..50 {
            viewport.edge_scroll(10_000.0, 100.0, 10.0, 1.0);
        }
        assert!((viewport.normalized_x() - 1.0).abs() < f32::EPSILON);

        viewport.set_normalized_x(3.0);
        assert!((viewport.normalized_x() - 1.0).abs() < f32::EPSILON);
        assert!((viewport.content_offset() + 1600.0).abs() < 1e-3);
    }

    #[test]
    fn content_narrower_than_view_never_moves() {
        let mut viewport = ScrollViewport::new(Vec2::new(800.0, 600.0), 500.0);
        viewport.set_normalized_x(1.0);
        assert!(viewport.content_offset().abs() < f32::EPSILON);
    }

    fn spawn_viewport(app: &mut App) -> (Entity, Entity) {
        let viewport = app
            .world_mut()
            .spawn((viewport(), Transform::default()))
            .id();
        let content = app
            .world_mut()
            .spawn((ScrollContent, Transform::default()))
            .set_parent(viewport)
            .id();
        (viewport, content)
    }

    #[test]
    fn dragging_empty_space_pans_content() {
        let mut app = headless_app();
        let (viewport, content) = spawn_viewport(&mut app);

        set_pointer(&mut app, Vec2::new(0.0, 0.0), true);
        app.update();
        set_pointer(&mut app, Vec2::new(-160.0, 0.0), true);
        app.update();

        let normalized = app
            .world()
            .get::<ScrollViewport>(viewport)
            .map(ScrollViewport::normalized_x);
        assert!(normalized.is_some_and(|n| (n - 0.1).abs() < 1e-5));
        let offset = app.world().get::<Transform>(content).map(|t| t.translation.x);
        assert!(offset.is_some_and(|x| (x + 160.0).abs() < 1e-3));
    }

    #[test]
    fn disabled_viewport_ignores_pointer() {
        let mut app = headless_app();
        let (viewport, _) = spawn_viewport(&mut app);
        if let Some(mut scroll) = app.world_mut().get_mut::<ScrollViewport>(viewport) {
            scroll.input_enabled = false;
        }

        set_pointer(&mut app, Vec2::new(0.0, 0.0), true);
        app.update();
        set_pointer(&mut app, Vec2::new(-160.0, 0.0), true);
        app.update();

        let normalized = app
            .world()
            .get::<ScrollViewport>(viewport)
            .map(ScrollViewport::normalized_x);
        assert_eq!(normalized, Some(0.0));
    }
}
