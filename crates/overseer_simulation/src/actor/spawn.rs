//! Spawn helpers: supervisor, player, special point, геометрия офиса

use bevy::prelude::*;

use super::components::{Player, Supervisor};
use crate::config::SupervisorProfile;
use crate::ledger::{PenaltyState, WorkerStatus};
use crate::navigation::{SpecialPoint, SpecialPointTracker, WaypointNavigator};
use crate::perception::Perception;
use crate::physics::LocomotionController;
use crate::spatial::{SpatialBody, LAYER_GROUND, LAYER_PLAYER};

/// Радиус player collider'а (sphere вокруг центра корпуса)
pub const PLAYER_BODY_RADIUS: f32 = 0.4;

/// Полностью сконфигурированный supervisor.
///
/// Profile проходит `sanitized()`; waypoints (упорядоченные) и special points
/// (неупорядоченные handles) неизменны на всю жизнь агента.
pub fn spawn_supervisor(
    commands: &mut Commands,
    profile: &SupervisorProfile,
    transform: Transform,
    waypoints: Vec<Vec3>,
    special_points: Vec<Entity>,
) -> Entity {
    let profile = profile.sanitized();

    commands
        .spawn((
            transform,
            // Supervisor (Required: PenaltyState, PatrolState, DecisionTrace, MovementIntent)
            Supervisor,
            PenaltyState::new(profile.supervisor.penalty_cooldown),
            Perception::new(profile.perception),
            SpecialPointTracker::new(profile.special_points, special_points),
            WaypointNavigator::new(profile.waypoints, waypoints),
            LocomotionController::new(profile.locomotion),
            profile.supervisor,
        ))
        .id()
}

/// Игрок с ledger'ом. `position`: центр корпуса (туда целится eye ray).
pub fn spawn_player(commands: &mut Commands, position: Vec3, status: WorkerStatus) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Player,
            status,
            SpatialBody::sphere(PLAYER_BODY_RADIUS, LAYER_PLAYER),
        ))
        .id()
}

pub fn spawn_special_point(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((Transform::from_translation(position), SpecialPoint))
        .id()
}

/// Axis-aligned box (стена, стол, перегородка) на заданных layers
pub fn spawn_box(
    commands: &mut Commands,
    center: Vec3,
    half_extents: Vec3,
    layers: bevy_rapier3d::prelude::Group,
) -> Entity {
    commands
        .spawn((
            Transform::from_translation(center),
            SpatialBody::cuboid(half_extents, layers),
        ))
        .id()
}

/// Пол: плита с top = y 0
pub fn spawn_floor(commands: &mut Commands, half_size: f32) -> Entity {
    spawn_box(
        commands,
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(half_size, 0.5, half_size),
        LAYER_GROUND,
    )
}
