//! MovementIntent: что decision layer хочет от locomotion

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Желаемый темп (locomotion переводит в target max speed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Pace {
    Walk,
    /// Default gait, если ни walk, ни sprint не запрошены
    #[default]
    Run,
    Sprint,
}

/// Component: high-level intent (пишет decision tree, читает locomotion)
///
/// Архитектура:
/// - Decision leaf пишет direction + pace каждый tick
/// - LocomotionController демпфирует velocity к `direction * max_speed`
/// - direction всегда горизонтальный (y = 0), нормализованный или ZERO
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    pub direction: Vec3,
    pub pace: Pace,
    pub crouch: bool,
}

impl MovementIntent {
    pub fn move_along(&mut self, direction: Vec3, pace: Pace) {
        self.direction = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        self.pace = pace;
    }

    /// Остановиться (velocity демпфируется к нулю)
    pub fn halt(&mut self) {
        self.direction = Vec3::ZERO;
    }

    pub fn is_halted(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}
