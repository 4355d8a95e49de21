//! SpatialIndex: headless SpatialProbe backend
//!
//! Axis-aligned boxes + spheres, ray cast через `bevy::math::bounding::RayCast3d`.
//! Entities с `SpatialBody` пересобираются в индекс каждый tick (`sync_spatial_index`),
//! статическая геометрия через `insert` живёт до явного `clear`.
//! Вращение Transform игнорируется: офисная геометрия axis-aligned.

use bevy::math::bounding::{Aabb3d, BoundingSphere, RayCast3d};
use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use super::probe::{RayHit, SpatialProbe};

/// Форма коллайдера относительно Transform.translation
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ColliderShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Component: entity участвует в spatial запросах
#[derive(Component, Debug, Clone, Copy)]
pub struct SpatialBody {
    pub shape: ColliderShape,
    pub layers: Group,
}

impl SpatialBody {
    pub fn sphere(radius: f32, layers: Group) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            layers,
        }
    }

    pub fn cuboid(half_extents: Vec3, layers: Group) -> Self {
        Self {
            shape: ColliderShape::Cuboid { half_extents },
            layers,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bounds {
    Aabb(Aabb3d),
    Sphere(BoundingSphere),
}

#[derive(Debug, Clone, Copy)]
struct IndexedCollider {
    entity: Entity,
    bounds: Bounds,
    layers: Group,
    synced: bool,
}

/// Resource: snapshot коллайдеров текущего tick
#[derive(Resource, Debug, Default, Clone)]
pub struct SpatialIndex {
    colliders: Vec<IndexedCollider>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Добавить статический коллайдер (порядок вставки = порядок `query_nearby`)
    pub fn insert(&mut self, entity: Entity, position: Vec3, body: SpatialBody) {
        self.push(entity, position, body, false);
    }

    fn push(&mut self, entity: Entity, position: Vec3, body: SpatialBody, synced: bool) {
        let bounds = match body.shape {
            ColliderShape::Sphere { radius } => {
                Bounds::Sphere(BoundingSphere::new(position, radius.max(0.0)))
            }
            ColliderShape::Cuboid { half_extents } => {
                Bounds::Aabb(Aabb3d::new(position, half_extents.abs()))
            }
        };

        self.colliders.push(IndexedCollider {
            entity,
            bounds,
            layers: body.layers,
            synced,
        });
    }
}

impl SpatialProbe for SpatialIndex {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Group) -> Option<RayHit> {
        if !(max_distance > 0.0) {
            return None;
        }
        let Ok(dir) = Dir3::new(direction) else {
            return None;
        };

        let ray = RayCast3d::from_ray(Ray3d::new(origin, dir), max_distance);

        let mut nearest: Option<RayHit> = None;
        for collider in &self.colliders {
            if !collider.layers.intersects(mask) {
                continue;
            }

            let distance = match &collider.bounds {
                Bounds::Aabb(aabb) => ray.aabb_intersection_at(aabb),
                Bounds::Sphere(sphere) => ray.sphere_intersection_at(sphere),
            };

            let Some(distance) = distance else {
                continue;
            };

            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    entity: collider.entity,
                    point: origin + *dir * distance,
                    distance,
                    layers: collider.layers,
                });
            }
        }

        nearest
    }

    fn query_nearby(&self, origin: Vec3, radius: f32) -> Vec<Entity> {
        self.colliders
            .iter()
            .filter(|collider| match &collider.bounds {
                Bounds::Sphere(sphere) => {
                    Vec3::from(sphere.center).distance(origin) <= radius + sphere.radius()
                }
                Bounds::Aabb(aabb) => {
                    let closest = origin.clamp(Vec3::from(aabb.min), Vec3::from(aabb.max));
                    closest.distance(origin) <= radius
                }
            })
            .map(|collider| collider.entity)
            .collect()
    }
}

/// Система: пересобрать SpatialIndex из SpatialBody + Transform
///
/// Сортируем по Entity, чтобы порядок `query_nearby` не зависел от archetype layout.
pub fn sync_spatial_index(
    mut index: ResMut<SpatialIndex>,
    bodies: Query<(Entity, &Transform, &SpatialBody)>,
) {
    let mut entries: Vec<(Entity, Vec3, SpatialBody)> = bodies
        .iter()
        .map(|(entity, transform, body)| (entity, transform.translation, *body))
        .collect();
    entries.sort_by_key(|(entity, _, _)| *entity);

    index.colliders.retain(|collider| !collider.synced);
    for (entity, position, body) in entries {
        index.push(entity, position, body, true);
    }
}
