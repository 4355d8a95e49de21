//! Locomotion systems (FixedUpdate, SupervisorSet::Locomotion)

use bevy::prelude::*;

use super::ground::probe_ground;
use super::locomotion::LocomotionController;
use crate::movement::{JumpIntent, MovementIntent};
use crate::spatial::SpatialIndex;

/// Система: jump triggers → ground probe → state machine step → Transform
pub fn locomotion_system(
    time: Res<Time<Fixed>>,
    index: Res<SpatialIndex>,
    mut jump_events: EventReader<JumpIntent>,
    mut agents: Query<(Entity, &mut Transform, &MovementIntent, &mut LocomotionController)>,
) {
    let dt = time.delta_secs();
    let jumpers: Vec<Entity> = jump_events.read().map(|event| event.entity).collect();

    for (entity, mut transform, intent, mut controller) in agents.iter_mut() {
        if jumpers.contains(&entity) {
            if controller.request_jump() {
                crate::log(&format!("🦘 {:?} jump", entity));
            } else {
                crate::log(&format!("{:?}: jump ignored in {:?}", entity, controller.state));
            }
        }

        let probe: &SpatialIndex = &index;
        let forward = *transform.forward();
        let ground = probe_ground(probe, &controller.config, transform.translation, forward);

        let previous = controller.state;
        let (position, rotation) = controller.step(intent, ground, transform.translation, transform.rotation, dt);
        transform.translation = position;
        transform.rotation = rotation;

        if controller.state != previous {
            crate::log(&format!("🚶 {:?} locomotion {:?} → {:?}", entity, previous, controller.state));
        }
    }
}
