//! SpatialProbe: geometry queries, которые потребляет AI core
//!
//! Core не знает про конкретный physics backend: ray cast + overlap query.
//! Оба запроса синхронные и без side effects.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

/// Результат ray cast (ближайшее попадание)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity коллайдера (handle, не владеем)
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
    /// Слои коллайдера, в который попали
    pub layers: Group,
}

pub trait SpatialProbe {
    /// Ближайшее попадание вдоль луча среди коллайдеров из `mask`.
    ///
    /// `direction` не обязан быть нормализован; нулевой вектор = None.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Group) -> Option<RayHit>;

    /// Entities, чьи коллайдеры пересекают сферу `radius` вокруг `origin`.
    ///
    /// Порядок стабильный (порядок регистрации), вызывающий код полагается на него.
    fn query_nearby(&self, origin: Vec3, radius: f32) -> Vec<Entity>;
}
