//! Special points: вероятностные "отвлечения" от патруля (кулер, кофемашина)
//!
//! Цикл: find_nearby_point → begin → (going) → arrive → (at point, stay timer)
//! → start_return → patrol/waypoints продолжаются.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::flat_distance;

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialPointConfig {
    /// Радиус, в котором точка рассматривается для отвлечения
    pub detection_range: f32,
    /// Вероятность отвлечься (0..1), бросок ≤ chance = успех
    pub activation_chance: f32,
    /// Cooldown после каждой оценки точки (успех или нет)
    pub cooldown_duration: f32,
    pub stay_duration: f32,
    pub arrival_radius: f32,
    /// Радиус "вернулись на патруль"
    pub return_radius: f32,
}

impl Default for SpecialPointConfig {
    fn default() -> Self {
        Self {
            detection_range: 5.0,
            activation_chance: 0.3,
            cooldown_duration: 20.0,
            stay_duration: 5.0,
            arrival_radius: 1.0,
            return_radius: 1.0,
        }
    }
}

/// Marker: world точка интереса (позиция = Transform)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct SpecialPoint;

/// Component: трекер отвлечений supervisor'а
///
/// Инварианты:
/// - is_going_to_special_point и is_at_special_point взаимоисключающие
/// - cooldown_remaining ≥ 0, только убывает (кроме reset при оценке точки)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SpecialPointTracker {
    pub config: SpecialPointConfig,
    /// Handles на SpecialPoint entities (неупорядоченный список)
    pub points: Vec<Entity>,

    pub is_going_to_special_point: bool,
    pub is_at_special_point: bool,
    pub current_special_point: Option<Entity>,
    /// Куда возвращаться (позиция патруля или текущий waypoint target)
    pub return_position: Option<Vec3>,
    pub saved_waypoint_index: Option<usize>,
    pub is_returning: bool,

    pub cooldown_remaining: f32,
    pub stay_elapsed: f32,
    /// Информационно: где уже побывали
    pub visited_points: Vec<Entity>,
}

impl SpecialPointTracker {
    pub fn new(config: SpecialPointConfig, points: Vec<Entity>) -> Self {
        Self {
            config,
            points,
            ..default()
        }
    }

    pub fn is_diverting(&self) -> bool {
        self.is_going_to_special_point || self.is_at_special_point
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Найти точку для отвлечения.
    ///
    /// Первая точка в радиусе "съедается": cooldown перезапускается при любом
    /// исходе броска, дальше список не смотрим. `roll`: uniform [0, 1).
    pub fn find_nearby_point(
        &mut self,
        position: Vec3,
        resolve: impl Fn(Entity) -> Option<Vec3>,
        mut roll: impl FnMut() -> f32,
    ) -> Option<Entity> {
        if self.is_diverting() || self.cooldown_remaining > 0.0 {
            return None;
        }

        for &point in &self.points {
            let Some(point_position) = resolve(point) else {
                continue;
            };
            if flat_distance(position, point_position) > self.config.detection_range {
                continue;
            }

            self.cooldown_remaining = self.config.cooldown_duration.max(0.0);
            let draw = roll();
            return (draw <= self.config.activation_chance).then_some(point);
        }

        None
    }

    pub fn begin(&mut self, point: Entity, return_position: Vec3, waypoint_index: Option<usize>) {
        self.current_special_point = Some(point);
        self.return_position = Some(return_position);
        self.saved_waypoint_index = waypoint_index;
        self.is_going_to_special_point = true;
        self.is_at_special_point = false;
        self.is_returning = false;
        self.stay_elapsed = 0.0;
    }

    pub fn arrive(&mut self) {
        self.is_going_to_special_point = false;
        self.is_at_special_point = true;
        self.stay_elapsed = 0.0;
        if let Some(point) = self.current_special_point {
            if !self.visited_points.contains(&point) {
                self.visited_points.push(point);
            }
        }
    }

    /// Накопить время на точке. `true` когда stay закончился (пора возвращаться).
    pub fn update_stay(&mut self, dt: f32) -> bool {
        if !self.is_at_special_point {
            return false;
        }
        self.stay_elapsed += dt;
        self.stay_elapsed >= self.config.stay_duration
    }

    /// Закончить отвлечение. Возвращает сохранённый waypoint index (если был).
    pub fn start_return(&mut self) -> Option<usize> {
        self.is_going_to_special_point = false;
        self.is_at_special_point = false;
        self.current_special_point = None;
        self.stay_elapsed = 0.0;
        self.is_returning = self.return_position.is_some();
        self.saved_waypoint_index.take()
    }

    /// Вернулись на патруль (или waypoints продолжились)
    pub fn finish_return(&mut self) {
        self.is_returning = false;
        self.return_position = None;
    }

    /// Handle точки потерян посреди отвлечения
    pub fn abort(&mut self) {
        self.is_going_to_special_point = false;
        self.is_at_special_point = false;
        self.current_special_point = None;
        self.saved_waypoint_index = None;
        self.is_returning = false;
        self.return_position = None;
        self.stay_elapsed = 0.0;
    }

    pub fn is_near(&self, point_position: Vec3, position: Vec3) -> bool {
        flat_distance(point_position, position) <= self.config.arrival_radius
    }

    pub fn is_near_return_position(&self, position: Vec3) -> bool {
        self.return_position
            .is_some_and(|target| flat_distance(target, position) <= self.config.return_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_point(position: Vec3) -> (SpecialPointTracker, Entity, impl Fn(Entity) -> Option<Vec3>) {
        let point = Entity::from_raw(10);
        let tracker = SpecialPointTracker::new(
            SpecialPointConfig {
                detection_range: 5.0,
                activation_chance: 0.3,
                cooldown_duration: 20.0,
                ..default()
            },
            vec![point],
        );
        (tracker, point, move |e| (e == point).then_some(position))
    }

    #[test]
    fn test_successful_roll_returns_point_and_starts_cooldown() {
        let (mut tracker, point, resolve) = tracker_with_point(Vec3::new(3.0, 0.0, 0.0));

        let found = tracker.find_nearby_point(Vec3::ZERO, resolve, || 0.2);
        assert_eq!(found, Some(point));
        assert_eq!(tracker.cooldown_remaining, 20.0);
    }

    #[test]
    fn test_failed_roll_still_consumes_cooldown() {
        let (mut tracker, _, resolve) = tracker_with_point(Vec3::new(3.0, 0.0, 0.0));

        let found = tracker.find_nearby_point(Vec3::ZERO, &resolve, || 0.9);
        assert_eq!(found, None);
        assert_eq!(tracker.cooldown_remaining, 20.0);

        // На cooldown даже удачный бросок ничего не даёт
        assert_eq!(tracker.find_nearby_point(Vec3::ZERO, &resolve, || 0.0), None);
    }

    #[test]
    fn test_out_of_range_point_is_not_evaluated() {
        let (mut tracker, _, resolve) = tracker_with_point(Vec3::new(8.0, 0.0, 0.0));
        let mut rolls = 0;

        let found = tracker.find_nearby_point(Vec3::ZERO, resolve, || {
            rolls += 1;
            0.0
        });
        assert_eq!(found, None);
        assert_eq!(rolls, 0);
        assert_eq!(tracker.cooldown_remaining, 0.0);
    }

    #[test]
    fn test_cooldown_decreases_to_zero() {
        let mut tracker = SpecialPointTracker {
            cooldown_remaining: 1.0,
            ..default()
        };
        let mut previous = tracker.cooldown_remaining;
        for _ in 0..100 {
            tracker.tick_cooldown(1.0 / 60.0);
            let expected = (previous - 1.0 / 60.0).max(0.0);
            assert!((tracker.cooldown_remaining - expected).abs() < 1e-6);
            previous = tracker.cooldown_remaining;
        }
        assert_eq!(tracker.cooldown_remaining, 0.0);
    }

    #[test]
    fn test_diversion_cycle_keeps_flags_exclusive() {
        let (mut tracker, point, _) = tracker_with_point(Vec3::new(3.0, 0.0, 0.0));

        tracker.begin(point, Vec3::new(1.0, 0.0, 1.0), Some(2));
        assert!(tracker.is_going_to_special_point && !tracker.is_at_special_point);

        tracker.arrive();
        assert!(!tracker.is_going_to_special_point && tracker.is_at_special_point);
        assert_eq!(tracker.visited_points, vec![point]);

        let mut elapsed_ticks = 0;
        while !tracker.update_stay(0.5) {
            elapsed_ticks += 1;
            assert!(!(tracker.is_going_to_special_point && tracker.is_at_special_point));
        }
        assert_eq!(elapsed_ticks, 9); // 5 сек по 0.5

        assert_eq!(tracker.start_return(), Some(2));
        assert!(!tracker.is_diverting());
        assert!(tracker.is_returning);
        assert!(tracker.is_near_return_position(Vec3::new(1.5, 0.0, 1.0)));
        assert!(!tracker.is_near_return_position(Vec3::new(5.0, 0.0, 1.0)));

        tracker.finish_return();
        assert!(!tracker.is_returning);
    }

    #[test]
    fn test_diverting_agent_does_not_search() {
        let (mut tracker, point, resolve) = tracker_with_point(Vec3::new(3.0, 0.0, 0.0));
        tracker.begin(point, Vec3::ZERO, None);

        assert_eq!(tracker.find_nearby_point(Vec3::ZERO, resolve, || 0.0), None);
        assert_eq!(tracker.cooldown_remaining, 0.0);
    }
}
