//! Базовые компоненты акторов: Supervisor, Player, SupervisorConfig

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::DecisionTrace;
use crate::ledger::PenaltyState;
use crate::movement::{MovementIntent, Pace};
use crate::navigation::PatrolState;

/// Supervisor (NPC надзиратель)
///
/// Автоматически добавляет PenaltyState, PatrolState, DecisionTrace, MovementIntent
/// через Required Components. Конфигурируемые компоненты кладёт `spawn_supervisor`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(PenaltyState, PatrolState, DecisionTrace, MovementIntent)]
pub struct Supervisor;

/// Игрок (worker). Ledger (`WorkerStatus`) опционален.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Поведенческие флаги и параметры decision tree
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Только leader выписывает штрафы
    pub is_leader: bool,
    pub use_waypoints: bool,
    pub use_special_points: bool,
    pub patrol_radius: f32,
    /// Перевыбор точки патруля (сек)
    pub patrol_interval: f32,
    pub patrol_arrival_radius: f32,
    pub patrol_pace: Pace,
    /// Длина боковых лучей obstacle avoidance
    pub avoidance_probe_length: f32,
    /// Угол боковых лучей (±) от корпуса
    pub avoidance_probe_angle: f32,
    /// Per-supervisor cooldown штрафов
    pub penalty_cooldown: f32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            is_leader: true,
            use_waypoints: true,
            use_special_points: true,
            patrol_radius: 8.0,
            patrol_interval: 6.0,
            patrol_arrival_radius: 0.5,
            patrol_pace: Pace::Walk,
            avoidance_probe_length: 2.0,
            avoidance_probe_angle: 45.0,
            penalty_cooldown: 3.0,
        }
    }
}
