//! Locomotion state machine: intent → velocity → position/rotation
//!
//! Архитектура:
//! - Kinematic: velocity интегрируем сами, без forces
//! - Состояния Locomotion / Jump / Fall / Crouch, без терминального
//! - Gait выводится только из |horizontal velocity| (две midpoint границы)
//! - Incline считается для animation слоя, на физику не влияет

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{MovementIntent, Pace};
use crate::shared::{damp, damp_factor, flat, round3};

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    /// Ниже этой скорости gait = Idle
    pub idle_threshold: f32,
    /// Rate демпфирования current_max_speed к target
    pub speed_damping: f32,
    pub velocity_damping: f32,
    /// Rate поворота корпуса к velocity
    pub rotation_speed: f32,
    /// Множитель target speed в воздухе
    pub air_speed_factor: f32,
    pub gravity: f32,
    /// Terminal velocity = |gravity| * multiplier
    pub gravity_multiplier: f32,
    pub jump_speed: f32,
    /// Смещение front/rear ground rays вдоль forward
    pub ground_probe_offset: f32,
    /// Высота старта ground rays над ступнями
    pub ground_probe_height: f32,
    /// Зазор под ступнями, в котором агент ещё "на земле"
    pub ground_check_distance: f32,
    pub incline_smoothing: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 1.5,
            run_speed: 3.5,
            sprint_speed: 6.0,
            crouch_speed: 1.0,
            idle_threshold: 0.1,
            speed_damping: 8.0,
            velocity_damping: 10.0,
            rotation_speed: 10.0,
            air_speed_factor: 0.6,
            gravity: -9.81,
            gravity_multiplier: 2.0,
            jump_speed: 4.5,
            ground_probe_offset: 0.3,
            ground_probe_height: 0.5,
            ground_check_distance: 0.2,
            incline_smoothing: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum LocomotionState {
    #[default]
    Locomotion,
    Jump,
    Fall,
    Crouch,
}

impl LocomotionState {
    pub fn is_airborne(self) -> bool {
        matches!(self, LocomotionState::Jump | LocomotionState::Fall)
    }
}

/// Idle < Walk < Run < Sprint (порядок важен для монотонности)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Reflect, Serialize, Deserialize)]
pub enum Gait {
    #[default]
    Idle,
    Walk,
    Run,
    Sprint,
}

/// Gait по скорости. Ровно на midpoint → старший gait.
pub fn classify_gait(speed: f32, config: &LocomotionConfig) -> Gait {
    let walk_run = (config.walk_speed + config.run_speed) * 0.5;
    let run_sprint = (config.run_speed + config.sprint_speed) * 0.5;

    if speed < config.idle_threshold {
        Gait::Idle
    } else if speed < walk_run {
        Gait::Walk
    } else if speed < run_sprint {
        Gait::Run
    } else {
        Gait::Sprint
    }
}

/// Результат ground probe за tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundSample {
    pub is_grounded: bool,
    /// Высота поверхности под агентом (для snap при приземлении)
    pub ground_height: Option<f32>,
    /// Несглаженный угол уклона (градусы, + = подъём вперёд)
    pub raw_incline: f32,
}

/// Component: kinematic контроллер supervisor'а
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct LocomotionController {
    pub config: LocomotionConfig,
    pub state: LocomotionState,
    pub velocity: Vec3,
    pub current_max_speed: f32,
    /// |horizontal velocity|, округлено до 3 знаков
    pub speed: f32,
    pub gait: Gait,
    pub is_grounded: bool,
    pub is_moving: bool,
    /// Сглаженный уклон (только для анимации)
    pub incline_angle: f32,
}

impl LocomotionController {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            is_grounded: true,
            ..default()
        }
    }

    /// Внешний trigger прыжка. Только с земли и из Locomotion.
    pub fn request_jump(&mut self) -> bool {
        if self.state != LocomotionState::Locomotion || !self.is_grounded {
            return false;
        }
        self.state = LocomotionState::Jump;
        self.velocity.y = self.config.jump_speed;
        self.is_grounded = false;
        true
    }

    fn transition(&mut self, grounded: bool, wants_crouch: bool) {
        use LocomotionState::*;

        self.state = match self.state {
            Locomotion | Crouch if !grounded => Fall,
            Fall if grounded => Locomotion,
            // Вершина прыжка: всегда через Fall, приземление там
            Jump if self.velocity.y <= 0.0 => Fall,
            state => state,
        };

        self.state = match self.state {
            Locomotion if wants_crouch => Crouch,
            Crouch if !wants_crouch => Locomotion,
            state => state,
        };
    }

    fn target_speed(&self, pace: Pace) -> f32 {
        let base = if self.state == LocomotionState::Crouch {
            self.config.crouch_speed
        } else {
            match pace {
                Pace::Sprint => self.config.sprint_speed,
                Pace::Walk => self.config.walk_speed,
                Pace::Run => self.config.run_speed,
            }
        };

        if self.state.is_airborne() {
            base * self.config.air_speed_factor
        } else {
            base
        }
    }

    /// Один tick locomotion. Возвращает новые (position, rotation).
    pub fn step(
        &mut self,
        intent: &MovementIntent,
        ground: GroundSample,
        position: Vec3,
        rotation: Quat,
        dt: f32,
    ) -> (Vec3, Quat) {
        // Восходящая фаза прыжка: ground ray ещё касается пола, но мы не на земле
        let grounded = ground.is_grounded && self.velocity.y <= 0.0;
        self.is_grounded = grounded;

        self.transition(grounded, intent.crouch);

        // Speed + horizontal velocity
        let target = self.target_speed(intent.pace);
        self.current_max_speed = damp(self.current_max_speed, target, self.config.speed_damping, dt);

        let desired = flat(intent.direction).normalize_or_zero() * self.current_max_speed;
        let blend = damp_factor(self.config.velocity_damping, dt);
        self.velocity.x += (desired.x - self.velocity.x) * blend;
        self.velocity.z += (desired.z - self.velocity.z) * blend;

        self.speed = round3(flat(self.velocity).length());
        self.gait = classify_gait(self.speed, &self.config);
        self.is_moving = self.gait != Gait::Idle;

        // Facing → velocity
        let mut new_rotation = rotation;
        if self.speed > 0.1 {
            let heading = self.velocity.x.atan2(self.velocity.z) + std::f32::consts::PI;
            let facing = Quat::from_rotation_y(heading);
            new_rotation = rotation.slerp(facing, damp_factor(self.config.rotation_speed, dt));
        }

        // Vertical
        if self.state.is_airborne() {
            let terminal = self.config.gravity.abs() * self.config.gravity_multiplier.max(0.0);
            self.velocity.y = (self.velocity.y + self.config.gravity * dt).max(-terminal);
        } else {
            self.velocity.y = 0.0;
        }

        let mut new_position = position + self.velocity * dt;
        if !self.state.is_airborne() {
            if let Some(height) = ground.ground_height {
                new_position.y = height;
            }
        }

        self.incline_angle = damp(self.incline_angle, ground.raw_incline, self.config.incline_smoothing, dt);

        (new_position, new_rotation)
    }
}
