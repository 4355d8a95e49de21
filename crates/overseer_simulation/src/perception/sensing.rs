//! Sensing: obstacle fan + player detection cone
//!
//! Чистые функции поверх SpatialProbe, без ECS. Системы в `systems.rs`
//! резолвят handles и применяют результат к `Perception`.

use bevy::prelude::*;

use super::components::{LockChange, Perception, PerceptionConfig};
use crate::shared::{flat, rotate_yaw, signed_yaw_deg};
use crate::spatial::{SpatialProbe, LAYER_BLOCKING, MASK_LINE_OF_SIGHT, MASK_OBSTACLE_PROBE};

/// Результат player scan (первый подходящий игрок, не ближайший)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSighting {
    pub player: Entity,
    /// Луч упёрся в перегородку: видим силуэт, но штраф не выписываем
    pub blocked: bool,
}

/// Углы лучей веера (градусы относительно корпуса), минимум один луч
pub fn obstacle_ray_angles(config: &PerceptionConfig) -> Vec<f32> {
    let count = config.obstacle_ray_count.max(1);
    if count == 1 {
        return vec![0.0];
    }

    let cone = config.obstacle_cone_angle;
    let step = cone / (count - 1) as f32;
    (0..count).map(|i| -cone * 0.5 + step * i as f32).collect()
}

/// Веер лучей с высоты груди. `true` если хоть один луч попал в obstacle layer.
pub fn scan_for_obstacles(
    probe: &dyn SpatialProbe,
    config: &PerceptionConfig,
    position: Vec3,
    body_forward: Vec3,
) -> bool {
    let forward = flat(body_forward).normalize_or_zero();
    if forward == Vec3::ZERO {
        return false;
    }

    let chest = position + Vec3::Y * config.chest_height;
    obstacle_ray_angles(config).into_iter().any(|angle| {
        probe
            .cast_ray(chest, rotate_yaw(forward, angle), config.obstacle_ray_length, MASK_OBSTACLE_PROBE)
            .is_some()
    })
}

/// Detection cone от направления головы.
///
/// `player_position` резолвит handle → позиция, None для не-игроков.
/// Кандидаты проверяются в порядке `query_nearby`; выигрывает первый,
/// даже если дальше есть более близкий игрок.
pub fn scan_for_player(
    probe: &dyn SpatialProbe,
    config: &PerceptionConfig,
    position: Vec3,
    body_forward: Vec3,
    head_angle: f32,
    player_position: impl Fn(Entity) -> Option<Vec3>,
) -> Option<PlayerSighting> {
    let forward = flat(body_forward).normalize_or_zero();
    if forward == Vec3::ZERO {
        return None;
    }

    let head_forward = rotate_yaw(forward, head_angle);
    let half_angle = config.detection_angle * 0.5;
    let eye = position + Vec3::Y * config.eye_height;

    for candidate in probe.query_nearby(position, config.detection_radius) {
        let Some(target) = player_position(candidate) else {
            continue;
        };

        let to_target = target - position;
        if flat(to_target).length() > config.detection_radius {
            continue;
        }
        if signed_yaw_deg(head_forward, to_target).abs() > half_angle {
            continue;
        }

        let to_center = target - eye;
        let distance = to_center.length();
        match probe.cast_ray(eye, to_center, distance, MASK_LINE_OF_SIGHT) {
            None => {
                return Some(PlayerSighting {
                    player: candidate,
                    blocked: false,
                })
            }
            Some(hit) if hit.entity == candidate => {
                return Some(PlayerSighting {
                    player: candidate,
                    blocked: false,
                })
            }
            Some(hit) if hit.layers.intersects(LAYER_BLOCKING) => {
                return Some(PlayerSighting {
                    player: candidate,
                    blocked: true,
                })
            }
            // Другой игрок на линии: этот кандидат не виден, смотрим следующего
            Some(_) => continue,
        }
    }

    None
}

impl Perception {
    /// Применить результат scan.
    ///
    /// Без sighting lock держится, пока locked handle резолвится (`locked_alive`);
    /// иначе detection очищается полностью.
    pub fn apply_sighting(&mut self, sighting: Option<PlayerSighting>, locked_alive: bool) -> LockChange {
        match sighting {
            Some(sighting) => {
                self.has_player_in_sight = true;
                self.is_player_blocked = sighting.blocked;
                self.detected_player = Some(sighting.player);
                if self.is_player_locked {
                    LockChange::None
                } else {
                    self.lock_on(sighting.player);
                    LockChange::Locked(sighting.player)
                }
            }
            None => {
                self.has_player_in_sight = false;
                self.is_player_blocked = false;
                self.is_player_slacking = false;
                if self.is_player_locked && locked_alive {
                    return LockChange::None;
                }
                let was_locked = self.is_player_locked;
                self.unlock();
                if was_locked {
                    LockChange::Unlocked
                } else {
                    LockChange::None
                }
            }
        }
    }
}
