//! Ground probe: два луча вниз (front/rear) → grounded + высота + уклон

use bevy::prelude::*;

use super::locomotion::{GroundSample, LocomotionConfig};
use crate::shared::flat;
use crate::spatial::{SpatialProbe, MASK_GROUND_PROBE};

/// Пробить землю под агентом.
///
/// Лучи стартуют на `ground_probe_height` над ступнями и идут вниз на
/// `ground_probe_height + ground_check_distance`. Grounded = хотя бы один луч попал.
pub fn probe_ground(
    probe: &dyn SpatialProbe,
    config: &LocomotionConfig,
    position: Vec3,
    forward: Vec3,
) -> GroundSample {
    let forward = flat(forward).normalize_or_zero();
    let offset = forward * config.ground_probe_offset;
    let lift = Vec3::Y * config.ground_probe_height;
    let reach = config.ground_probe_height + config.ground_check_distance;

    let cast = |origin: Vec3| {
        probe
            .cast_ray(origin, Vec3::NEG_Y, reach, MASK_GROUND_PROBE)
            .map(|hit| hit.point.y)
    };

    let front = cast(position + lift + offset);
    let rear = cast(position + lift - offset);

    let ground_height = match (front, rear) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(h), None) | (None, Some(h)) => Some(h),
        (None, None) => None,
    };

    // Уклон только когда оба луча попали и есть реальное смещение
    let raw_incline = match (front, rear) {
        (Some(front_y), Some(rear_y)) if config.ground_probe_offset > 0.0 && forward != Vec3::ZERO => {
            (front_y - rear_y).atan2(2.0 * config.ground_probe_offset).to_degrees()
        }
        _ => 0.0,
    };

    GroundSample {
        is_grounded: ground_height.is_some(),
        ground_height,
        raw_incline,
    }
}
