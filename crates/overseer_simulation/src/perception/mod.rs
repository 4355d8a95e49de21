//! Perception domain: голова, scanning, obstacle fan, player cone
//!
//! Каждый tick (SupervisorSet::Perception):
//! sensing → lock-on → penalty check → head mode → head rotation.
//! Результат (флаги + weak handles) читает decision tree в том же tick'е.

use bevy::prelude::*;

pub mod components;
pub mod sensing;
pub mod systems;


pub use components::*;
pub use sensing::*;
pub use systems::*;

use crate::SupervisorSet;

pub struct PerceptionPlugin;

impl Plugin for PerceptionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<crate::ledger::PenaltyApplied>()
            .add_event::<crate::ledger::PenaltyDeclined>()
            .add_systems(FixedUpdate, perception_system.in_set(SupervisorSet::Perception));
    }
}
