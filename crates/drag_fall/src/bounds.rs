use bevy::math::Affine3A;
use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

/// Size of a rectangular body centred on its transform, before scaling.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Footprint(pub Vec2);

/// Local-to-world transform of an entity whose parent's global transform may
/// be stale or missing.
pub fn world_affine(parent: Option<&GlobalTransform>, transform: &Transform) -> Affine3A {
    let parent = parent.map_or(Affine3A::IDENTITY, GlobalTransform::affine);
    parent * transform.compute_affine()
}

/// Converts a world-space point into the space of `parent`.
pub fn to_local(parent: Option<&GlobalTransform>, world: Vec2) -> Vec2 {
    parent.map_or(world, |parent| {
        parent
            .affine()
            .inverse()
            .transform_point3(world.extend(0.0))
            .truncate()
    })
}

pub fn world_position(affine: Affine3A) -> Vec3 {
    affine.transform_point3(Vec3::ZERO)
}

/// Axis aligned box around the four world corners of a `size` rectangle.
pub fn world_rect(affine: Affine3A, size: Vec2) -> Aabb2d {
    let half = size / 2.0;
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|corner| affine.transform_point3(corner.extend(0.0)).truncate());

    let (min, max) = corners
        .iter()
        .fold((Vec2::MAX, Vec2::MIN), |(min, max), &corner| {
            (min.min(corner), max.max(corner))
        });
    Aabb2d { min, max }
}

/// Segment between the two bottom world corners, as a zero-height box.
pub fn bottom_edge(affine: Affine3A, size: Vec2) -> Aabb2d {
    let half = size / 2.0;
    let left = affine
        .transform_point3(Vec3::new(-half.x, -half.y, 0.0))
        .truncate();
    let right = affine
        .transform_point3(Vec3::new(half.x, -half.y, 0.0))
        .truncate();
    Aabb2d {
        min: left.min(right),
        max: left.max(right),
    }
}

/// Inclusive on every side.
pub fn contains(area: &Aabb2d, point: Vec2) -> bool {
    point.x >= area.min.x && point.x <= area.max.x && point.y >= area.min.y && point.y <= area.max.y
}

pub fn closest_point(area: &Aabb2d, point: Vec2) -> Vec2 {
    point.clamp(area.min, area.max)
}
