//! Tests for locomotion state machine + ground probe.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::movement::{MovementIntent, Pace};
    use crate::physics::{
        classify_gait, probe_ground, Gait, GroundSample, LocomotionConfig, LocomotionController, LocomotionState,
    };
    use crate::spatial::{SpatialBody, SpatialIndex, LAYER_GROUND};

    const DT: f32 = 1.0 / 60.0;

    fn on_floor() -> GroundSample {
        GroundSample {
            is_grounded: true,
            ground_height: Some(0.0),
            raw_incline: 0.0,
        }
    }

    fn walking(direction: Vec3, pace: Pace) -> MovementIntent {
        let mut intent = MovementIntent::default();
        intent.move_along(direction, pace);
        intent
    }

    /// Прогнать `ticks` шагов, вернуть финальные позицию и поворот
    fn run(
        controller: &mut LocomotionController,
        intent: &MovementIntent,
        ground: GroundSample,
        ticks: usize,
    ) -> (Vec3, Quat) {
        let mut position = Vec3::ZERO;
        let mut rotation = Quat::IDENTITY;
        for _ in 0..ticks {
            (position, rotation) = controller.step(intent, ground, position, rotation, DT);
        }
        (position, rotation)
    }

    #[test]
    fn test_gait_is_monotonic_with_exact_midpoints() {
        let config = LocomotionConfig::default();
        let mut previous = Gait::Idle;
        for i in 0..800 {
            let speed = i as f32 * 0.01;
            let gait = classify_gait(speed, &config);
            assert!(gait >= previous, "gait dropped at speed {}", speed);
            previous = gait;
        }

        // walk 1.5 / run 3.5 / sprint 6.0 → midpoints 2.5 и 4.75
        assert_eq!(classify_gait(0.05, &config), Gait::Idle);
        assert_eq!(classify_gait(2.499, &config), Gait::Walk);
        assert_eq!(classify_gait(2.5, &config), Gait::Run);
        assert_eq!(classify_gait(4.749, &config), Gait::Run);
        assert_eq!(classify_gait(4.75, &config), Gait::Sprint);
    }

    #[test]
    fn test_speed_converges_to_pace() {
        for (pace, expected, gait) in [
            (Pace::Walk, 1.5, Gait::Walk),
            (Pace::Run, 3.5, Gait::Run),
            (Pace::Sprint, 6.0, Gait::Sprint),
        ] {
            let mut controller = LocomotionController::new(LocomotionConfig::default());
            run(&mut controller, &walking(Vec3::X, pace), on_floor(), 240);

            assert!((controller.speed - expected).abs() < 0.01, "{:?}: speed {}", pace, controller.speed);
            assert_eq!(controller.gait, gait);
            assert!(controller.is_moving);
        }
    }

    #[test]
    fn test_crouch_overrides_sprint() {
        let mut controller = LocomotionController::new(LocomotionConfig::default());
        let mut intent = walking(Vec3::X, Pace::Sprint);
        intent.crouch = true;

        run(&mut controller, &intent, on_floor(), 240);
        assert_eq!(controller.state, LocomotionState::Crouch);
        assert!((controller.speed - 1.0).abs() < 0.01);

        intent.crouch = false;
        run(&mut controller, &intent, on_floor(), 1);
        assert_eq!(controller.state, LocomotionState::Locomotion);
    }

    #[test]
    fn test_halt_decays_to_idle() {
        let mut controller = LocomotionController::new(LocomotionConfig::default());
        run(&mut controller, &walking(Vec3::X, Pace::Run), on_floor(), 120);
        run(&mut controller, &MovementIntent::default(), on_floor(), 240);

        assert_eq!(controller.gait, Gait::Idle);
        assert!(!controller.is_moving);
    }

    #[test]
    fn test_facing_turns_toward_velocity() {
        let mut controller = LocomotionController::new(LocomotionConfig::default());
        let (position, rotation) = run(&mut controller, &walking(Vec3::X, Pace::Run), on_floor(), 120);

        let forward = rotation * Vec3::NEG_Z;
        assert!(forward.dot(Vec3::X) > 0.99, "forward = {:?}", forward);
        assert!(position.x > 0.0);
        assert_eq!(position.y, 0.0);
    }

    #[test]
    fn test_fall_clamps_to_terminal_velocity_then_lands() {
        let config = LocomotionConfig::default();
        let terminal = config.gravity.abs() * config.gravity_multiplier;
        let mut controller = LocomotionController::new(config);
        let intent = MovementIntent::default();

        let mut position = Vec3::new(0.0, 50.0, 0.0);
        let mut rotation = Quat::IDENTITY;
        for _ in 0..240 {
            (position, rotation) = controller.step(&intent, GroundSample::default(), position, rotation, DT);
            assert_eq!(controller.state, LocomotionState::Fall);
            assert!(controller.velocity.y >= -terminal - 1e-4);
        }
        assert!((controller.velocity.y + terminal).abs() < 1e-3);

        let landing = GroundSample {
            is_grounded: true,
            ground_height: Some(2.0),
            raw_incline: 0.0,
        };
        (position, _) = controller.step(&intent, landing, position, rotation, DT);
        assert_eq!(controller.state, LocomotionState::Locomotion);
        assert_eq!(controller.velocity.y, 0.0);
        assert_eq!(position.y, 2.0);
    }

    #[test]
    fn test_jump_rises_then_falls() {
        let mut controller = LocomotionController::new(LocomotionConfig::default());
        let intent = MovementIntent::default();
        assert!(controller.request_jump());
        assert_eq!(controller.state, LocomotionState::Jump);

        // Пока летим вверх, ground probe игнорируется
        controller.step(&intent, on_floor(), Vec3::ZERO, Quat::IDENTITY, DT);
        assert_eq!(controller.state, LocomotionState::Jump);
        assert!(controller.velocity.y > 0.0);

        let mut ticks = 0;
        while controller.state == LocomotionState::Jump {
            controller.step(&intent, GroundSample::default(), Vec3::ONE, Quat::IDENTITY, DT);
            ticks += 1;
            assert!(ticks < 120, "jump never peaked");
        }
        assert_eq!(controller.state, LocomotionState::Fall);
        assert!(controller.velocity.y <= 0.0);

        // Повторный прыжок в воздухе запрещён
        assert!(!controller.request_jump());
    }

    #[test]
    fn test_jump_lands_through_fall_even_on_contact() {
        // Прыжок почти на месте: ground ray всё время касается пола
        let mut controller = LocomotionController::new(LocomotionConfig {
            jump_speed: 0.01,
            ..default()
        });
        let intent = MovementIntent::default();
        assert!(controller.request_jump());

        let mut states = vec![controller.state];
        for _ in 0..5 {
            controller.step(&intent, on_floor(), Vec3::ZERO, Quat::IDENTITY, DT);
            if states.last() != Some(&controller.state) {
                states.push(controller.state);
            }
        }

        assert_eq!(
            states,
            vec![LocomotionState::Jump, LocomotionState::Fall, LocomotionState::Locomotion]
        );
        assert!(controller.is_grounded);
    }

    #[test]
    fn test_incline_is_smoothed_and_does_not_change_velocity() {
        let intent = walking(Vec3::X, Pace::Run);
        let mut flat_controller = LocomotionController::new(LocomotionConfig::default());
        let mut slope_controller = LocomotionController::new(LocomotionConfig::default());
        let slope = GroundSample {
            raw_incline: 20.0,
            ..on_floor()
        };

        run(&mut flat_controller, &intent, on_floor(), 30);
        run(&mut slope_controller, &intent, slope, 1);
        assert!(slope_controller.incline_angle > 0.0 && slope_controller.incline_angle < 20.0);

        run(&mut slope_controller, &intent, slope, 29);
        assert_eq!(flat_controller.velocity, slope_controller.velocity);
        assert!((slope_controller.incline_angle - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_probe_ground_on_step() {
        let config = LocomotionConfig::default();
        let mut index = SpatialIndex::new();
        // Нижняя плита (top y=0) сзади, ступенька (top y=0.2) спереди по -Z
        index.insert(
            Entity::from_raw(1),
            Vec3::new(0.0, -0.5, 5.0),
            SpatialBody::cuboid(Vec3::new(5.0, 0.5, 5.0), LAYER_GROUND),
        );
        index.insert(
            Entity::from_raw(2),
            Vec3::new(0.0, -0.3, -5.0),
            SpatialBody::cuboid(Vec3::new(5.0, 0.5, 5.0), LAYER_GROUND),
        );

        let sample = probe_ground(&index, &config, Vec3::ZERO, Vec3::NEG_Z);
        assert!(sample.is_grounded);
        assert!((sample.ground_height.unwrap_or_default() - 0.2).abs() < 1e-4);
        let expected = 0.2f32.atan2(0.6).to_degrees();
        assert!((sample.raw_incline - expected).abs() < 1e-3, "incline {}", sample.raw_incline);

        let airborne = probe_ground(&index, &config, Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Z);
        assert!(!airborne.is_grounded);
        assert_eq!(airborne.ground_height, None);
    }
}
