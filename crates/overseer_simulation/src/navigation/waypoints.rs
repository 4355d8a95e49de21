//! Waypoint patrol: циклический или одноразовый маршрут с dwell на каждой точке

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::flat_distance;

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    pub reach_radius: f32,
    /// Пауза на каждой точке (сек)
    pub dwell_time: f32,
    /// После последней точки → index 0 (иначе маршрут заканчивается)
    pub looping: bool,
    /// "Свободный" порог для decision tree (leaf считается Success)
    pub follow_threshold: f32,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            reach_radius: 0.5,
            dwell_time: 2.0,
            looping: true,
            follow_threshold: 1.0,
        }
    }
}

/// Результат одного шага follow()
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaypointStep {
    Approaching { target: Vec3, distance: f32 },
    /// Стоим на точке, dwell таймер тикает
    Waiting,
    /// Маршрут пуст или закончился (non-looping)
    Finished,
}

/// Component: навигатор по фиксированному списку точек
///
/// Инвариант: `is_following && !waypoints.is_empty()` ⇒ `current_index < waypoints.len()`
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct WaypointNavigator {
    pub config: WaypointConfig,
    pub waypoints: Vec<Vec3>,
    pub current_index: usize,
    pub is_following: bool,
    pub is_waiting_at_waypoint: bool,
    pub wait_remaining: f32,
    pub route_finished: bool,
}

impl WaypointNavigator {
    pub fn new(config: WaypointConfig, waypoints: Vec<Vec3>) -> Self {
        Self {
            config,
            waypoints,
            ..default()
        }
    }

    pub fn has_route(&self) -> bool {
        !self.waypoints.is_empty() && !self.route_finished
    }

    pub fn current_target(&self) -> Option<Vec3> {
        if self.route_finished {
            return None;
        }
        self.waypoints.get(self.current_index).copied()
    }

    /// Один tick следования. Сам навигатор не двигает агента: вызывающий
    /// steer'ит к `target` из `Approaching` и стоит при `Waiting`.
    pub fn follow(&mut self, position: Vec3, dt: f32) -> WaypointStep {
        let Some(target) = self.current_target() else {
            self.is_following = false;
            self.is_waiting_at_waypoint = false;
            return WaypointStep::Finished;
        };
        self.is_following = true;

        if self.is_waiting_at_waypoint {
            self.wait_remaining -= dt;
            if self.wait_remaining > 0.0 {
                return WaypointStep::Waiting;
            }
            self.is_waiting_at_waypoint = false;
            self.wait_remaining = 0.0;
            self.advance();
            return match self.current_target() {
                Some(next) => WaypointStep::Approaching {
                    target: next,
                    distance: flat_distance(position, next),
                },
                None => WaypointStep::Finished,
            };
        }

        let distance = flat_distance(position, target);
        if distance <= self.config.reach_radius {
            self.is_waiting_at_waypoint = true;
            self.wait_remaining = self.config.dwell_time.max(0.0);
            return WaypointStep::Waiting;
        }

        WaypointStep::Approaching { target, distance }
    }

    /// Следующая точка: wrap при looping, иначе конец маршрута
    pub fn advance(&mut self) {
        if self.waypoints.is_empty() {
            self.route_finished = true;
            self.is_following = false;
            return;
        }

        let next = self.current_index + 1;
        if next < self.waypoints.len() {
            self.current_index = next;
        } else if self.config.looping {
            self.current_index = 0;
            crate::log("🔁 Waypoint route looped to index 0");
        } else {
            self.route_finished = true;
            self.is_following = false;
            crate::log("🏁 Waypoint route finished");
        }
    }

    /// Прервать следование (obstacle avoidance, special point)
    pub fn interrupt(&mut self) {
        self.is_following = false;
        self.is_waiting_at_waypoint = false;
        self.wait_remaining = 0.0;
    }

    /// Продолжить с сохранённого индекса (out-of-range → 0)
    pub fn resume_from(&mut self, index: usize) {
        self.current_index = if index < self.waypoints.len() { index } else { 0 };
        self.is_waiting_at_waypoint = false;
        self.wait_remaining = 0.0;
        self.is_following = !self.waypoints.is_empty() && !self.route_finished;
    }
}
