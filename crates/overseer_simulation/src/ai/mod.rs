//! AI decision-making module
//!
//! Priority behavior tree для supervisor'ов: полный проход каждый tick,
//! выигрывает первый leaf с выполненным condition и не-Failure action.
//! Результат: `MovementIntent` (+ side effects в navigation/perception).

use bevy::prelude::*;

pub mod leaves;
pub mod systems;
pub mod tree;

#[cfg(test)]
mod decision_tests;

// Re-export основных типов
pub use leaves::{choose_avoidance_direction, supervisor_tree, DecisionContext};
pub use systems::decision_system;
pub use tree::{tick_selector, DecisionTrace, Leaf, LeafKind, Status};

use crate::SupervisorSet;

/// AI Plugin
///
/// Регистрирует decision_system в FixedUpdate (SupervisorSet::Decision):
/// после perception (свежие флаги), до locomotion (intent этого tick'а).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, decision_system.in_set(SupervisorSet::Decision));
    }
}
