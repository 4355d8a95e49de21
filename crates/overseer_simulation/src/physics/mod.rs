//! Physics domain: kinematic locomotion supervisor'ов
//!
//! Велосити интегрируем сами (MovementIntent → LocomotionController),
//! земля берётся из SpatialProbe ground rays.

use bevy::prelude::*;

pub mod ground;
pub mod locomotion;
pub mod systems;

#[cfg(test)]
mod locomotion_tests;

pub use ground::probe_ground;
pub use locomotion::{classify_gait, Gait, GroundSample, LocomotionConfig, LocomotionController, LocomotionState};
pub use systems::locomotion_system;

use crate::movement::JumpIntent;
use crate::SupervisorSet;

pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpIntent>()
            .add_systems(FixedUpdate, locomotion_system.in_set(SupervisorSet::Locomotion));
    }
}
