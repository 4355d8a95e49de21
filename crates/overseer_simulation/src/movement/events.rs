//! Movement events

use bevy::prelude::*;

/// Event: намерение прыгнуть (jump intent)
///
/// Генерируется внешним trigger'ом (cutscene, scripted stumble): decision tree
/// прыжки не инициирует.
///
/// Обрабатывается:
/// - `locomotion_system`: Locomotion (grounded) → Jump, иначе игнорируется
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}
