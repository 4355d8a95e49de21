//! Heading math: yaw углы в горизонтальной плоскости, damping, steering
//!
//! Конвенция: Y-up, forward = -Z (как `Transform::forward()`).
//! Положительный yaw угол = поворот вправо (по часовой стрелке сверху).

use bevy::prelude::*;

/// Горизонтальная проекция (y = 0)
pub fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Знаковый угол (градусы) от `from` к `to` в плоскости XZ.
///
/// +90 = `to` справа от `from`, -90 = слева. Нулевые вектора дают 0.
pub fn signed_yaw_deg(from: Vec3, to: Vec3) -> f32 {
    let cross = from.x * to.z - from.z * to.x;
    let dot = from.x * to.x + from.z * to.z;
    if cross == 0.0 && dot == 0.0 {
        return 0.0;
    }
    cross.atan2(dot).to_degrees()
}

/// Поворот вокруг Y на `degrees` (положительный = вправо)
pub fn yaw_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_y(-degrees.to_radians())
}

/// Направление `forward`, повёрнутое на `degrees` вправо
pub fn rotate_yaw(forward: Vec3, degrees: f32) -> Vec3 {
    yaw_rotation(degrees) * forward
}

/// Сдвинуть `current` к `target` не более чем на `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Коэффициент экспоненциального сглаживания за `dt` (frame-rate independent)
pub fn damp_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate.max(0.0) * dt).exp()
}

pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * damp_factor(rate, dt)
}

/// Округление до 3 знаков (убирает float jitter перед gait классификатором)
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// Нормализованное горизонтальное направление от `from` к `to`
pub fn steer_towards(from: Vec3, to: Vec3) -> Vec3 {
    flat(to - from).normalize_or_zero()
}

/// Горизонтальная дистанция (игнорируем высоту)
pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    flat(a - b).length()
}
