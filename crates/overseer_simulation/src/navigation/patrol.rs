//! Free patrol: случайная точка в радиусе, перевыбор по таймеру или по прибытии

use bevy::prelude::*;
use rand::Rng;

use crate::shared::flat_distance;

/// Component: состояние свободного патруля (fallback leaf)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolState {
    pub target: Option<Vec3>,
    /// Сколько осталось до принудительного перевыбора
    pub retarget_timer: f32,
}

/// Uniform точка в круге радиуса `radius` вокруг `center` (XZ плоскость)
pub fn random_point_in_radius(center: Vec3, radius: f32, rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let distance = radius.max(0.0) * rng.gen::<f32>().sqrt();
    center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

impl PatrolState {
    /// Нужно ли выбрать новую точку (нет цели, таймер истёк, или дошли)
    pub fn needs_retarget(&self, position: Vec3, arrival_radius: f32) -> bool {
        match self.target {
            None => true,
            Some(target) => self.retarget_timer <= 0.0 || flat_distance(position, target) <= arrival_radius,
        }
    }

    pub fn retarget(&mut self, position: Vec3, radius: f32, interval: f32, rng: &mut impl Rng) -> Vec3 {
        let target = random_point_in_radius(position, radius, rng);
        self.target = Some(target);
        self.retarget_timer = interval.max(0.0);
        target
    }

    /// Tick таймера; возвращает текущую цель (перевыбранную при необходимости)
    pub fn update(
        &mut self,
        position: Vec3,
        radius: f32,
        interval: f32,
        arrival_radius: f32,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Vec3 {
        self.retarget_timer -= dt;
        let current = self.target;
        match current {
            Some(target) if !self.needs_retarget(position, arrival_radius) => target,
            _ => self.retarget(position, radius, interval, rng),
        }
    }

    pub fn clear(&mut self) {
        self.target = None;
        self.retarget_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_point_stays_within_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let center = Vec3::new(3.0, 1.0, -2.0);
        for _ in 0..500 {
            let point = random_point_in_radius(center, 8.0, &mut rng);
            assert!(flat_distance(center, point) <= 8.0 + 1e-4);
            assert_eq!(point.y, center.y);
        }
    }

    #[test]
    fn test_retarget_on_timer_and_on_arrival() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut patrol = PatrolState::default();

        let first = patrol.update(Vec3::ZERO, 8.0, 1.0, 0.5, 0.1, &mut rng);
        // Таймер не истёк, до цели далеко → та же цель
        let far_away = first + Vec3::new(100.0, 0.0, 0.0);
        assert_eq!(patrol.update(far_away, 8.0, 1.0, 0.5, 0.1, &mut rng), first);

        // Дошли → новая цель
        let second = patrol.update(first, 8.0, 1.0, 0.5, 0.1, &mut rng);
        assert_ne!(second, first);

        // Таймер истёк → новая цель
        let third = patrol.update(far_away, 8.0, 1.0, 0.5, 1.5, &mut rng);
        assert_ne!(third, second);
    }

    #[test]
    fn test_same_seed_same_targets() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                random_point_in_radius(Vec3::ZERO, 5.0, &mut a),
                random_point_in_radius(Vec3::ZERO, 5.0, &mut b)
            );
        }
    }
}
