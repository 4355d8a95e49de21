//! Perception компоненты: head aim, scanning, lock-on

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::move_towards;

/// Параметры зрения supervisor'а (градусы, метры, секунды)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Предел поворота головы относительно корпуса (±)
    pub max_head_rotation: f32,
    /// Угловая скорость головы (град/сек)
    pub head_rotation_speed: f32,
    /// Lock-on рвётся, если игрок ушёл дальше этого угла от корпуса
    pub player_lock_break_angle: f32,
    /// Амплитуда sinusoidal scan при ходьбе
    pub walking_scan_angle: f32,
    /// Частота walking scan (рад/сек аргумента sin)
    pub walking_scan_frequency: f32,
    pub stationary_scan_duration: f32,
    /// Пауза в крайних точках stationary sweep
    pub stationary_scan_pause: f32,
    /// Минимальный интервал между stationary scans
    pub stationary_scan_interval: f32,
    /// Допуск "дошли до края" для sweep
    pub scan_edge_tolerance: f32,
    pub obstacle_ray_count: u32,
    /// Полный угол веера obstacle rays
    pub obstacle_cone_angle: f32,
    pub obstacle_ray_length: f32,
    pub chest_height: f32,
    pub eye_height: f32,
    pub detection_radius: f32,
    /// Полный угол detection cone (half-angle = /2)
    pub detection_angle: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            max_head_rotation: 60.0,
            head_rotation_speed: 90.0,
            player_lock_break_angle: 80.0,
            walking_scan_angle: 30.0,
            walking_scan_frequency: 1.5,
            stationary_scan_duration: 4.0,
            stationary_scan_pause: 0.5,
            stationary_scan_interval: 6.0,
            scan_edge_tolerance: 1.0,
            obstacle_ray_count: 3,
            obstacle_cone_angle: 40.0,
            obstacle_ray_length: 1.5,
            chest_height: 1.2,
            eye_height: 1.6,
            detection_radius: 10.0,
            detection_angle: 90.0,
        }
    }
}

/// Текущий режим головы (для debug overlay / тестов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum HeadMode {
    #[default]
    Centered,
    /// Стоим на special point: голова прямо, scanning выключен
    AtSpecialPoint,
    TrackingPlayer,
    StationaryScan,
    WalkingScan,
}

/// Внутреннее состояние stationary sweep
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct StationarySweep {
    pub elapsed: f32,
    /// +1 = к правому краю, -1 = к левому
    pub direction: f32,
    pub pause_remaining: f32,
}

/// Component: зрение supervisor'а
///
/// Инварианты:
/// - |current_head_angle| ≤ max_head_rotation
/// - current_head_angle меняется не более чем на head_rotation_speed * dt за tick
/// - is_player_locked ⇒ detected_player.is_some()
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Perception {
    pub config: PerceptionConfig,

    pub current_head_angle: f32,
    pub target_head_angle: f32,
    pub head_mode: HeadMode,

    pub has_obstacle_ahead: bool,

    pub has_player_in_sight: bool,
    /// Weak handle: игроком владеет scene, не perception
    pub detected_player: Option<Entity>,
    pub is_player_blocked: bool,
    pub is_player_slacking: bool,
    pub is_player_locked: bool,

    pub is_scanning: bool,
    pub is_scanning_stationary: bool,
    pub sweep: StationarySweep,
    /// Время окончания последнего stationary scan (None = ещё не было)
    pub last_stationary_scan_end: Option<f32>,
}

/// Что произошло с lock-on после применения sighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockChange {
    None,
    Locked(Entity),
    Unlocked,
}

impl Perception {
    pub fn new(config: PerceptionConfig) -> Self {
        Self {
            config,
            ..default()
        }
    }

    fn clamp_angle(&self, angle: f32) -> f32 {
        let max = self.config.max_head_rotation.max(0.0);
        angle.clamp(-max, max)
    }

    pub fn set_target_head_angle(&mut self, angle: f32) {
        self.target_head_angle = self.clamp_angle(angle);
    }

    /// Повернуть голову к target с ограниченной угловой скоростью
    pub fn update_head_rotation(&mut self, dt: f32) {
        self.target_head_angle = self.clamp_angle(self.target_head_angle);
        let max_delta = self.config.head_rotation_speed.max(0.0) * dt.max(0.0);
        let next = move_towards(self.current_head_angle, self.target_head_angle, max_delta);
        self.current_head_angle = self.clamp_angle(next);
    }

    pub fn lock_on(&mut self, player: Entity) {
        self.detected_player = Some(player);
        self.is_player_locked = true;
    }

    pub fn unlock(&mut self) {
        self.is_player_locked = false;
        self.detected_player = None;
        self.has_player_in_sight = false;
        self.is_player_blocked = false;
        self.is_player_slacking = false;
    }

    // ------------------------------------------------------------------
    // Stationary scan
    // ------------------------------------------------------------------

    pub fn stationary_scan_due(&self, now: f32) -> bool {
        self.last_stationary_scan_end
            .map_or(true, |end| now - end >= self.config.stationary_scan_interval)
    }

    /// Начать sweep (no-op если уже идёт)
    pub fn begin_stationary_scan(&mut self) {
        if self.is_scanning_stationary {
            return;
        }
        self.is_scanning_stationary = true;
        self.is_scanning = true;
        self.sweep = StationarySweep {
            elapsed: 0.0,
            direction: 1.0,
            pause_remaining: 0.0,
        };
    }

    /// Прервать или завершить sweep (время фиксируется для интервала)
    pub fn stop_stationary_scan(&mut self, now: f32) {
        if !self.is_scanning_stationary {
            return;
        }
        self.is_scanning_stationary = false;
        self.is_scanning = false;
        self.sweep = StationarySweep::default();
        self.last_stationary_scan_end = Some(now);
    }

    /// Sweep закончился именно в этом tick'е
    pub fn stationary_scan_finished_at(&self, now: f32) -> bool {
        !self.is_scanning_stationary && self.last_stationary_scan_end == Some(now)
    }

    fn advance_stationary_sweep(&mut self, now: f32, dt: f32) {
        self.sweep.elapsed += dt;
        if self.sweep.elapsed >= self.config.stationary_scan_duration {
            self.stop_stationary_scan(now);
            self.target_head_angle = 0.0;
            return;
        }

        let edge = self.clamp_angle(self.sweep.direction * self.config.max_head_rotation);
        self.target_head_angle = edge;

        if self.sweep.pause_remaining > 0.0 {
            self.sweep.pause_remaining -= dt;
            if self.sweep.pause_remaining <= 0.0 {
                self.sweep.pause_remaining = 0.0;
                self.sweep.direction = -self.sweep.direction;
            }
            return;
        }

        if (self.current_head_angle - edge).abs() <= self.config.scan_edge_tolerance {
            if self.config.stationary_scan_pause > 0.0 {
                self.sweep.pause_remaining = self.config.stationary_scan_pause;
            } else {
                self.sweep.direction = -self.sweep.direction;
            }
        }
    }

    // ------------------------------------------------------------------
    // Mode selection
    // ------------------------------------------------------------------

    /// Выбор режима головы (приоритет сверху вниз).
    ///
    /// `locked_target_angle`: знаковый угол от корпуса к locked игроку,
    /// None если handle больше не резолвится.
    pub fn update_head_mode(
        &mut self,
        at_special_point: bool,
        is_moving: bool,
        locked_target_angle: Option<f32>,
        now: f32,
        dt: f32,
    ) -> LockChange {
        let mut change = LockChange::None;

        if at_special_point {
            if self.is_player_locked {
                change = LockChange::Unlocked;
            }
            self.unlock();
            self.stop_stationary_scan(now);
            self.is_scanning = false;
            self.target_head_angle = 0.0;
            self.head_mode = HeadMode::AtSpecialPoint;
            return change;
        }

        if self.is_player_locked {
            match locked_target_angle {
                Some(angle) if angle.abs() <= self.config.player_lock_break_angle => {
                    self.set_target_head_angle(angle);
                    self.is_scanning = false;
                    self.head_mode = HeadMode::TrackingPlayer;
                    return LockChange::None;
                }
                // Угол превышен или handle потерян
                _ => {
                    self.unlock();
                    self.target_head_angle = 0.0;
                    self.head_mode = HeadMode::Centered;
                    return LockChange::Unlocked;
                }
            }
        }

        if self.is_scanning_stationary {
            self.advance_stationary_sweep(now, dt);
            self.head_mode = if self.is_scanning_stationary {
                HeadMode::StationaryScan
            } else {
                HeadMode::Centered
            };
            return change;
        }

        if !self.has_player_in_sight {
            if is_moving {
                let wave = (now * self.config.walking_scan_frequency).sin();
                let amplitude = self.config.walking_scan_angle.min(self.config.max_head_rotation);
                self.set_target_head_angle(wave * amplitude);
                self.is_scanning = true;
                self.head_mode = HeadMode::WalkingScan;
                return change;
            }

            if self.stationary_scan_due(now) {
                self.begin_stationary_scan();
                self.advance_stationary_sweep(now, dt);
                self.head_mode = HeadMode::StationaryScan;
                return change;
            }
        }

        self.is_scanning = false;
        self.target_head_angle = 0.0;
        self.head_mode = HeadMode::Centered;
        change
    }
}
