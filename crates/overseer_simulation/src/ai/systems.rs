//! Decision system (FixedUpdate, SupervisorSet::Decision)

use bevy::prelude::*;

use super::leaves::{supervisor_tree, DecisionContext};
use super::tree::{tick_selector, DecisionTrace};
use crate::actor::{Supervisor, SupervisorConfig};
use crate::movement::MovementIntent;
use crate::navigation::{PatrolState, SpecialPoint, SpecialPointTracker, WaypointNavigator};
use crate::perception::Perception;
use crate::physics::LocomotionController;
use crate::spatial::SpatialIndex;
use crate::DeterministicRng;

/// Система: per-agent таймеры special points → полный проход decision tree
///
/// Агенты обрабатываются в порядке Entity: RNG общий, порядок бросков
/// должен совпадать между прогонами.
pub fn decision_system(
    time: Res<Time<Fixed>>,
    index: Res<SpatialIndex>,
    mut rng: ResMut<DeterministicRng>,
    points: Query<&Transform, With<SpecialPoint>>,
    mut supervisors: Query<
        (
            Entity,
            &Transform,
            &SupervisorConfig,
            &LocomotionController,
            &mut Perception,
            &mut SpecialPointTracker,
            &mut WaypointNavigator,
            &mut PatrolState,
            &mut MovementIntent,
            &mut DecisionTrace,
        ),
        With<Supervisor>,
    >,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    let mut order: Vec<Entity> = supervisors.iter().map(|(entity, ..)| entity).collect();
    order.sort();

    let resolve = |point: Entity| points.get(point).ok().map(|transform| transform.translation);

    for entity in order {
        let Ok((_, transform, config, locomotion, mut perception, mut tracker, mut navigator, mut patrol, mut intent, mut trace)) =
            supervisors.get_mut(entity)
        else {
            continue;
        };

        tracker.tick_cooldown(dt);
        if tracker.update_stay(dt) {
            let saved = tracker.start_return();
            crate::log(&format!("🚶 {:?} leaving special point", entity));
            if let (Some(waypoint), true) = (saved, config.use_waypoints) {
                navigator.resume_from(waypoint);
            }
        }

        let probe: &SpatialIndex = &index;
        let mut ctx = DecisionContext {
            entity,
            now,
            dt,
            position: transform.translation,
            forward: *transform.forward(),
            is_moving: locomotion.is_moving,
            config,
            perception: &mut *perception,
            tracker: &mut *tracker,
            navigator: &mut *navigator,
            patrol: &mut *patrol,
            intent: &mut *intent,
            probe,
            points: &resolve,
            rng: &mut rng.rng,
        };

        let result = tick_selector(&supervisor_tree(), &mut ctx);
        if result.is_none() {
            intent.halt();
        }
        if trace.record(result) {
            crate::log(&format!("🧠 {:?} → {:?}", entity, result));
        }
    }
}
