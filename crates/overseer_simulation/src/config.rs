//! SupervisorProfile: все tunables одного supervisor'а
//!
//! JSON документ может быть частичным: каждая секция `#[serde(default)]`.
//! Ошибки конфигурации (нулевой ray count, walk > run, ...) не фатальны:
//! `sanitized()` приводит значения к безопасным с warning в лог.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::SupervisorConfig;
use crate::navigation::{SpecialPointConfig, WaypointConfig};
use crate::perception::PerceptionConfig;
use crate::physics::LocomotionConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse supervisor profile: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorProfile {
    pub supervisor: SupervisorConfig,
    pub perception: PerceptionConfig,
    pub special_points: SpecialPointConfig,
    pub waypoints: WaypointConfig,
    pub locomotion: LocomotionConfig,
}

impl SupervisorProfile {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Копия с ограниченными значениями (каждый clamp логируется)
    pub fn sanitized(&self) -> Self {
        let mut profile = self.clone();

        let perception = &mut profile.perception;
        if perception.obstacle_ray_count == 0 {
            crate::log_warning("obstacle_ray_count = 0, using 1 ray");
            perception.obstacle_ray_count = 1;
        }
        non_negative("perception.max_head_rotation", &mut perception.max_head_rotation);
        non_negative("perception.head_rotation_speed", &mut perception.head_rotation_speed);
        non_negative("perception.detection_radius", &mut perception.detection_radius);
        non_negative("perception.obstacle_ray_length", &mut perception.obstacle_ray_length);
        non_negative("perception.stationary_scan_duration", &mut perception.stationary_scan_duration);
        non_negative("perception.stationary_scan_interval", &mut perception.stationary_scan_interval);
        non_negative("perception.stationary_scan_pause", &mut perception.stationary_scan_pause);
        if perception.player_lock_break_angle < perception.max_head_rotation {
            crate::log_warning(&format!(
                "player_lock_break_angle {} < max_head_rotation {}, raising",
                perception.player_lock_break_angle, perception.max_head_rotation
            ));
            perception.player_lock_break_angle = perception.max_head_rotation;
        }

        let points = &mut profile.special_points;
        if !(0.0..=1.0).contains(&points.activation_chance) {
            let clamped = if points.activation_chance.is_nan() {
                0.0
            } else {
                points.activation_chance.clamp(0.0, 1.0)
            };
            crate::log_warning(&format!(
                "activation_chance {} out of [0, 1], using {}",
                points.activation_chance, clamped
            ));
            points.activation_chance = clamped;
        }
        non_negative("special_points.detection_range", &mut points.detection_range);
        non_negative("special_points.cooldown_duration", &mut points.cooldown_duration);
        non_negative("special_points.stay_duration", &mut points.stay_duration);
        non_negative("special_points.arrival_radius", &mut points.arrival_radius);
        non_negative("special_points.return_radius", &mut points.return_radius);

        let waypoints = &mut profile.waypoints;
        non_negative("waypoints.reach_radius", &mut waypoints.reach_radius);
        non_negative("waypoints.dwell_time", &mut waypoints.dwell_time);
        non_negative("waypoints.follow_threshold", &mut waypoints.follow_threshold);

        let supervisor = &mut profile.supervisor;
        non_negative("supervisor.patrol_radius", &mut supervisor.patrol_radius);
        non_negative("supervisor.patrol_interval", &mut supervisor.patrol_interval);
        non_negative("supervisor.penalty_cooldown", &mut supervisor.penalty_cooldown);
        non_negative("supervisor.avoidance_probe_length", &mut supervisor.avoidance_probe_length);

        let locomotion = &mut profile.locomotion;
        non_negative("locomotion.walk_speed", &mut locomotion.walk_speed);
        non_negative("locomotion.crouch_speed", &mut locomotion.crouch_speed);
        if locomotion.run_speed < locomotion.walk_speed {
            crate::log_warning(&format!(
                "run_speed {} < walk_speed {}, raising",
                locomotion.run_speed, locomotion.walk_speed
            ));
            locomotion.run_speed = locomotion.walk_speed;
        }
        if locomotion.sprint_speed < locomotion.run_speed {
            crate::log_warning(&format!(
                "sprint_speed {} < run_speed {}, raising",
                locomotion.sprint_speed, locomotion.run_speed
            ));
            locomotion.sprint_speed = locomotion.run_speed;
        }
        non_negative("locomotion.gravity_multiplier", &mut locomotion.gravity_multiplier);

        profile
    }
}

fn non_negative(name: &str, value: &mut f32) {
    if *value < 0.0 || value.is_nan() {
        crate::log_warning(&format!("{} = {} is negative, using 0", name, value));
        *value = 0.0;
    }
}
