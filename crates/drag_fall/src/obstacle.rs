use bevy::ecs::system::SystemParam;
use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;
use strum::EnumString;

use crate::bounds::world_rect;

pub struct ObstaclePlugin;

impl Plugin for ObstaclePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, classify_obstacles);
    }
}

/// Box collider, in the obstacle's local space before scaling.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub half_size: Vec2,
}

/// How a falling body treats an obstacle it touches.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
pub enum ObstacleKind {
    Floor,
    Object,
    #[strum(disabled)]
    Other,
}

impl ObstacleKind {
    /// Unknown tags are kept as obstacles but never support a body on their own.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(Self::Other)
    }
}

/// Scene-authored tag, resolved into an [`ObstacleKind`] once on registration.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ObstacleTag(pub String);

impl ObstacleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

/// Points an `Object` obstacle at the entity holding its safe interior.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerRegion(pub Entity);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub half_size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleHit {
    pub entity: Entity,
    pub kind: ObstacleKind,
    pub inner: Option<Entity>,
}

/// What a body rests on at the moment it is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Floor,
    Object(ObstacleHit),
    Unsupported,
}

impl Contact {
    /// A lone floor counts as resting. Any object wins over a floor.
    pub fn resolve(hits: &[ObstacleHit]) -> Self {
        if let [only] = hits {
            if only.kind == ObstacleKind::Floor {
                return Self::Floor;
            }
        }

        hits.iter()
            .find(|hit| hit.kind == ObstacleKind::Object)
            .map_or(Self::Unsupported, |hit| Self::Object(*hit))
    }
}

/// Whether a falling body has reached a floor with no object in the way.
pub fn lands_on_floor(hits: &[ObstacleHit]) -> bool {
    !hits.iter().any(|hit| hit.kind == ObstacleKind::Object)
        && hits.iter().any(|hit| hit.kind == ObstacleKind::Floor)
}

#[derive(SystemParam)]
pub struct ObstacleQuery<'w, 's> {
    obstacles: Query<
        'w,
        's,
        (
            Entity,
            &'static GlobalTransform,
            &'static Obstacle,
            &'static ObstacleKind,
            Option<&'static InnerRegion>,
        ),
    >,
    regions: Query<'w, 's, (&'static GlobalTransform, &'static RegionBounds)>,
}

impl ObstacleQuery<'_, '_> {
    /// Every obstacle whose world box touches `area`, skipping `exclude`.
    pub fn overlapping(&self, area: &Aabb2d, exclude: Entity) -> Vec<ObstacleHit> {
        self.obstacles
            .iter()
            .filter(|(entity, ..)| *entity != exclude)
            .filter(|(_, transform, obstacle, ..)| {
                world_rect(transform.affine(), obstacle.half_size * 2.0).intersects(area)
            })
            .map(|(entity, _, _, kind, inner)| ObstacleHit {
                entity,
                kind: *kind,
                inner: inner.map(|region| region.0),
            })
            .collect()
    }

    pub fn inner_bounds(&self, region: Entity) -> Option<Aabb2d> {
        let (transform, bounds) = self.regions.get(region).ok()?;
        Some(world_rect(transform.affine(), bounds.half_size * 2.0))
    }
}

fn classify_obstacles(
    mut commands: Commands,
    tagged: Query<(Entity, &ObstacleTag), Without<ObstacleKind>>,
) {
    for (entity, tag) in &tagged {
        let kind = ObstacleKind::from_tag(&tag.0);
        if kind == ObstacleKind::Other {
            debug!("Obstacle {entity} has unclassified tag {:?}", tag.0);
        }
        commands.entity(entity).insert(kind);
    }
}
