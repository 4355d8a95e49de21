//! Supervisor leaves: conditions + actions поверх DecisionContext
//!
//! Порядок в `supervisor_tree()`:
//! 1. ObstacleAvoidance
//! 2. SeekSpecialPoint
//! 3. GoToSpecialPoint
//! 4. StayAtSpecialPoint
//! 5. FollowWaypoints
//! 6. StationaryScan
//! 7. FreePatrol (всегда Running)

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::tree::{Leaf, LeafKind, Status};
use crate::actor::SupervisorConfig;
use crate::movement::MovementIntent;
use crate::navigation::{PatrolState, SpecialPointTracker, WaypointNavigator, WaypointStep};
use crate::perception::Perception;
use crate::shared::{flat, rotate_yaw, steer_towards};
use crate::spatial::{SpatialProbe, MASK_OBSTACLE_PROBE};

/// Всё, что leaf может прочитать/изменить за один tick одного агента
pub struct DecisionContext<'a> {
    pub entity: Entity,
    pub now: f32,
    pub dt: f32,
    pub position: Vec3,
    pub forward: Vec3,
    /// Из locomotion предыдущего tick'а
    pub is_moving: bool,
    pub config: &'a SupervisorConfig,
    pub perception: &'a mut Perception,
    pub tracker: &'a mut SpecialPointTracker,
    pub navigator: &'a mut WaypointNavigator,
    pub patrol: &'a mut PatrolState,
    pub intent: &'a mut MovementIntent,
    pub probe: &'a dyn SpatialProbe,
    /// SpecialPoint handle → позиция (None = handle потерян)
    pub points: &'a dyn Fn(Entity) -> Option<Vec3>,
    pub rng: &'a mut ChaCha8Rng,
}

pub fn supervisor_tree<'a>() -> [Leaf<DecisionContext<'a>>; 7] {
    [
        Leaf {
            kind: LeafKind::ObstacleAvoidance,
            condition: obstacle_ahead,
            action: avoid_obstacle,
        },
        Leaf {
            kind: LeafKind::SeekSpecialPoint,
            condition: can_seek_special_point,
            action: seek_special_point,
        },
        Leaf {
            kind: LeafKind::GoToSpecialPoint,
            condition: going_to_special_point,
            action: go_to_special_point,
        },
        Leaf {
            kind: LeafKind::StayAtSpecialPoint,
            condition: at_special_point,
            action: stay_at_special_point,
        },
        Leaf {
            kind: LeafKind::FollowWaypoints,
            condition: has_waypoint_route,
            action: follow_waypoints,
        },
        Leaf {
            kind: LeafKind::StationaryScan,
            condition: idle_off_path,
            action: stationary_scan,
        },
        Leaf {
            kind: LeafKind::FreePatrol,
            condition: always,
            action: free_patrol,
        },
    ]
}

// ============================================================================
// Obstacle avoidance
// ============================================================================

/// Куда уходить от препятствия.
///
/// Только левый заблокирован → вправо; только правый → влево;
/// оба → назад; ни один (сработал только центр) → вправо.
pub fn choose_avoidance_direction(forward: Vec3, left_blocked: bool, right_blocked: bool) -> Vec3 {
    let forward = flat(forward).normalize_or_zero();
    let right = rotate_yaw(forward, 90.0);
    match (left_blocked, right_blocked) {
        (true, false) => right,
        (false, true) => -right,
        (true, true) => -forward,
        (false, false) => right,
    }
}

fn obstacle_ahead(ctx: &DecisionContext) -> bool {
    ctx.perception.has_obstacle_ahead
}

fn avoid_obstacle(ctx: &mut DecisionContext) -> Status {
    ctx.navigator.interrupt();
    ctx.perception.stop_stationary_scan(ctx.now);
    // Патрульная точка могла оказаться за стеной
    ctx.patrol.clear();

    let forward = flat(ctx.forward).normalize_or_zero();
    let chest = ctx.position + Vec3::Y * ctx.perception.config.chest_height;
    let length = ctx.config.avoidance_probe_length;
    let angle = ctx.config.avoidance_probe_angle;

    let blocked = |degrees: f32| {
        ctx.probe
            .cast_ray(chest, rotate_yaw(forward, degrees), length, MASK_OBSTACLE_PROBE)
            .is_some()
    };
    let left_blocked = blocked(-angle);
    let right_blocked = blocked(angle);

    let direction = choose_avoidance_direction(forward, left_blocked, right_blocked);
    ctx.intent.move_along(direction, ctx.config.patrol_pace);
    Status::Success
}

// ============================================================================
// Special points
// ============================================================================

fn can_seek_special_point(ctx: &DecisionContext) -> bool {
    ctx.config.use_special_points && !ctx.tracker.is_diverting() && !ctx.tracker.points.is_empty()
}

fn seek_special_point(ctx: &mut DecisionContext) -> Status {
    let rng = &mut *ctx.rng;
    let found = ctx
        .tracker
        .find_nearby_point(ctx.position, ctx.points, || rng.gen::<f32>());
    let Some(point) = found else {
        return Status::Failure;
    };

    // Возвращаемся туда, где были, или к текущей waypoint цели
    let (return_position, waypoint_index) = match ctx.navigator.current_target() {
        Some(target) if ctx.config.use_waypoints => (target, Some(ctx.navigator.current_index)),
        _ => (ctx.position, None),
    };

    ctx.navigator.interrupt();
    ctx.perception.stop_stationary_scan(ctx.now);
    ctx.tracker.begin(point, return_position, waypoint_index);
    crate::log(&format!("☕ {:?} diverting to special point {:?}", ctx.entity, point));

    if let Some(target) = (ctx.points)(point) {
        ctx.intent
            .move_along(steer_towards(ctx.position, target), ctx.config.patrol_pace);
    }
    Status::Success
}

/// Handle точки потерян: бросаем отвлечение, маршрут продолжается
fn abandon_special_point(ctx: &mut DecisionContext) -> Status {
    let saved = ctx.tracker.saved_waypoint_index;
    ctx.tracker.abort();
    if let (Some(index), true) = (saved, ctx.config.use_waypoints) {
        ctx.navigator.resume_from(index);
    }
    crate::log_warning(&format!("{:?}: special point lost, diversion aborted", ctx.entity));
    Status::Failure
}

fn going_to_special_point(ctx: &DecisionContext) -> bool {
    ctx.tracker.is_going_to_special_point
}

fn go_to_special_point(ctx: &mut DecisionContext) -> Status {
    let Some(target) = ctx.tracker.current_special_point.and_then(|point| (ctx.points)(point)) else {
        return abandon_special_point(ctx);
    };

    if ctx.tracker.is_near(target, ctx.position) {
        ctx.tracker.arrive();
        ctx.intent.halt();
        crate::log(&format!("📍 {:?} arrived at special point", ctx.entity));
        return Status::Success;
    }

    ctx.intent
        .move_along(steer_towards(ctx.position, target), ctx.config.patrol_pace);
    Status::Running
}

fn at_special_point(ctx: &DecisionContext) -> bool {
    ctx.tracker.is_at_special_point
}

/// Стоим. Stay таймер тикает в decision_system до дерева.
fn stay_at_special_point(ctx: &mut DecisionContext) -> Status {
    let alive = ctx
        .tracker
        .current_special_point
        .is_some_and(|point| (ctx.points)(point).is_some());
    if !alive {
        return abandon_special_point(ctx);
    }

    ctx.intent.halt();
    Status::Running
}

// ============================================================================
// Waypoints
// ============================================================================

fn has_waypoint_route(ctx: &DecisionContext) -> bool {
    ctx.config.use_waypoints && ctx.navigator.has_route()
}

fn follow_waypoints(ctx: &mut DecisionContext) -> Status {
    if ctx.tracker.is_returning && ctx.tracker.is_near_return_position(ctx.position) {
        ctx.tracker.finish_return();
        crate::log(&format!("↩️ {:?} back on waypoint route", ctx.entity));
    }

    match ctx.navigator.follow(ctx.position, ctx.dt) {
        WaypointStep::Approaching { target, distance } => {
            ctx.intent
                .move_along(steer_towards(ctx.position, target), ctx.config.patrol_pace);
            if distance <= ctx.navigator.config.follow_threshold {
                Status::Success
            } else {
                Status::Running
            }
        }
        WaypointStep::Waiting => {
            ctx.intent.halt();
            Status::Success
        }
        WaypointStep::Finished => Status::Failure,
    }
}

// ============================================================================
// Stationary scan
// ============================================================================

fn idle_off_path(ctx: &DecisionContext) -> bool {
    !ctx.is_moving && !ctx.navigator.is_following
}

fn stationary_scan(ctx: &mut DecisionContext) -> Status {
    if ctx.perception.is_scanning_stationary {
        ctx.intent.halt();
        return Status::Running;
    }
    if ctx.perception.stationary_scan_finished_at(ctx.now) {
        ctx.intent.halt();
        return Status::Success;
    }
    if ctx.perception.stationary_scan_due(ctx.now) && !ctx.perception.is_player_locked {
        ctx.perception.begin_stationary_scan();
        ctx.intent.halt();
        return Status::Running;
    }
    Status::Failure
}

// ============================================================================
// Free patrol
// ============================================================================

fn always(_: &DecisionContext) -> bool {
    true
}

fn free_patrol(ctx: &mut DecisionContext) -> Status {
    // Обратный путь после special point (без waypoints)
    if ctx.tracker.is_returning {
        match ctx.tracker.return_position {
            Some(target) if !ctx.tracker.is_near_return_position(ctx.position) => {
                ctx.intent
                    .move_along(steer_towards(ctx.position, target), ctx.config.patrol_pace);
                return Status::Running;
            }
            _ => {
                ctx.tracker.finish_return();
                crate::log(&format!("↩️ {:?} back on patrol", ctx.entity));
            }
        }
    }

    let target = ctx.patrol.update(
        ctx.position,
        ctx.config.patrol_radius,
        ctx.config.patrol_interval,
        ctx.config.patrol_arrival_radius,
        ctx.dt,
        &mut *ctx.rng,
    );
    ctx.intent
        .move_along(steer_towards(ctx.position, target), ctx.config.patrol_pace);
    Status::Running
}
