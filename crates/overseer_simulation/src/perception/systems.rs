//! Perception systems (sensing → penalty → head aim)

use bevy::prelude::*;

use super::components::{LockChange, Perception};
use super::sensing::{scan_for_obstacles, scan_for_player};
use crate::actor::{Player, Supervisor, SupervisorConfig};
use crate::ledger::{run_penalty_check, PenaltyApplied, PenaltyDeclined, PenaltyLedger, PenaltyOutcome, PenaltyState, WorkerStatus};
use crate::navigation::SpecialPointTracker;
use crate::physics::LocomotionController;
use crate::shared::signed_yaw_deg;
use crate::spatial::SpatialIndex;

/// Система: perception tick для всех supervisors
///
/// Порядок внутри tick:
/// 1. obstacle fan (корпус)
/// 2. player cone (голова) → lock-on; у special point не сканируем вообще
/// 3. penalty check (только если не blocked)
/// 4. выбор режима головы
/// 5. поворот головы с ограниченной скоростью
pub fn perception_system(
    time: Res<Time<Fixed>>,
    index: Res<SpatialIndex>,
    mut supervisors: Query<
        (
            Entity,
            &Transform,
            &SupervisorConfig,
            &mut Perception,
            &mut PenaltyState,
            &SpecialPointTracker,
            &LocomotionController,
        ),
        With<Supervisor>,
    >,
    players: Query<&Transform, With<Player>>,
    mut ledgers: Query<&mut WorkerStatus>,
    mut applied_events: EventWriter<PenaltyApplied>,
    mut declined_events: EventWriter<PenaltyDeclined>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    for (entity, transform, config, mut perception, mut penalty, tracker, locomotion) in supervisors.iter_mut() {
        let position = transform.translation;
        let forward = *transform.forward();

        let probe: &SpatialIndex = &index;
        let has_obstacle = scan_for_obstacles(probe, &perception.config, position, forward);
        perception.has_obstacle_ahead = has_obstacle;

        let sighting = if tracker.is_at_special_point {
            None
        } else {
            scan_for_player(
                probe,
                &perception.config,
                position,
                forward,
                perception.current_head_angle,
                |candidate| players.get(candidate).ok().map(|t| t.translation),
            )
        };

        // У special point lock не держим, даже если игрок жив
        let locked_alive = !tracker.is_at_special_point
            && perception
                .detected_player
                .is_some_and(|player| players.contains(player));

        match perception.apply_sighting(sighting, locked_alive) {
            LockChange::Locked(player) => {
                penalty.clear_declined();
                crate::log(&format!("👁️ {:?} locked on player {:?}", entity, player));
            }
            LockChange::Unlocked => {
                crate::log(&format!("👻 {:?} lost player (detection cleared)", entity));
            }
            LockChange::None => {}
        }
        if sighting.is_none() {
            penalty.clear_declined();
        }

        if let Some(sighting) = sighting {
            match ledgers.get_mut(sighting.player) {
                Ok(mut ledger) => {
                    perception.is_player_slacking = ledger.is_currently_violating();

                    if !sighting.blocked {
                        let outcome = run_penalty_check(
                            &mut *ledger,
                            &mut penalty,
                            sighting.player,
                            config.is_leader,
                            now,
                        );
                        match outcome {
                            PenaltyOutcome::Applied => {
                                crate::log_info(&format!(
                                    "💸 {:?} penalized {:?} (balance {:.1}, stress {:.1})",
                                    entity, sighting.player, ledger.balance, ledger.stress
                                ));
                                applied_events.write(PenaltyApplied {
                                    supervisor: entity,
                                    player: sighting.player,
                                    amount: ledger.penalty_amount,
                                });
                            }
                            PenaltyOutcome::Declined => {
                                crate::log_warning(&format!(
                                    "{:?}: ledger declined penalty for {:?} (balance {:.1})",
                                    entity, sighting.player, ledger.balance
                                ));
                                declined_events.write(PenaltyDeclined {
                                    supervisor: entity,
                                    player: sighting.player,
                                });
                            }
                            PenaltyOutcome::NotAttempted => {}
                        }
                    }
                }
                // Игрок без ledger'а: видим, но штрафовать некого
                Err(_) => perception.is_player_slacking = false,
            }
        }

        let locked_target_angle = perception
            .detected_player
            .filter(|_| perception.is_player_locked)
            .and_then(|player| players.get(player).ok())
            .map(|player_transform| signed_yaw_deg(forward, player_transform.translation - position));

        let change = perception.update_head_mode(
            tracker.is_at_special_point,
            locomotion.is_moving,
            locked_target_angle,
            now,
            dt,
        );
        if change == LockChange::Unlocked {
            penalty.clear_declined();
            crate::log(&format!("🔓 {:?} lock-on broken", entity));
        }

        perception.update_head_rotation(dt);
    }
}
