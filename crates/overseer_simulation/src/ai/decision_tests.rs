//! Tests for supervisor decision tree (leaves + priority order).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::actor::SupervisorConfig;
    use crate::ai::{choose_avoidance_direction, supervisor_tree, tick_selector, DecisionContext, LeafKind, Status};
    use crate::movement::MovementIntent;
    use crate::navigation::{PatrolState, SpecialPointConfig, SpecialPointTracker, WaypointConfig, WaypointNavigator};
    use crate::perception::{Perception, PerceptionConfig};
    use crate::spatial::{SpatialBody, SpatialIndex, LAYER_OBSTACLE};

    const DT: f32 = 1.0 / 60.0;
    const POINT: u32 = 50;

    struct Fixture {
        config: SupervisorConfig,
        perception: Perception,
        tracker: SpecialPointTracker,
        navigator: WaypointNavigator,
        patrol: PatrolState,
        intent: MovementIntent,
        index: SpatialIndex,
        rng: ChaCha8Rng,
        position: Vec3,
        is_moving: bool,
        now: f32,
        /// Где сейчас special point (None = entity удалён)
        point_position: Option<Vec3>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                config: SupervisorConfig {
                    use_waypoints: false,
                    use_special_points: false,
                    ..default()
                },
                perception: Perception::new(PerceptionConfig::default()),
                tracker: SpecialPointTracker::default(),
                navigator: WaypointNavigator::default(),
                patrol: PatrolState::default(),
                intent: MovementIntent::default(),
                index: SpatialIndex::new(),
                rng: ChaCha8Rng::seed_from_u64(9),
                position: Vec3::ZERO,
                is_moving: true,
                now: 10.0,
                point_position: None,
            }
        }

        fn with_special_point(mut self, position: Vec3, chance: f32) -> Self {
            self.config.use_special_points = true;
            self.tracker = SpecialPointTracker::new(
                SpecialPointConfig {
                    activation_chance: chance,
                    ..default()
                },
                vec![Entity::from_raw(POINT)],
            );
            self.point_position = Some(position);
            self
        }

        fn with_waypoints(mut self, waypoints: Vec<Vec3>) -> Self {
            self.config.use_waypoints = true;
            self.navigator = WaypointNavigator::new(WaypointConfig::default(), waypoints);
            self
        }

        /// Один проход дерева
        fn tick(&mut self) -> Option<(LeafKind, Status)> {
            let point_position = self.point_position;
            let resolve = move |e: Entity| (e == Entity::from_raw(POINT)).then_some(point_position).flatten();
            let mut ctx = DecisionContext {
                entity: Entity::from_raw(1),
                now: self.now,
                dt: DT,
                position: self.position,
                forward: Vec3::NEG_Z,
                is_moving: self.is_moving,
                config: &self.config,
                perception: &mut self.perception,
                tracker: &mut self.tracker,
                navigator: &mut self.navigator,
                patrol: &mut self.patrol,
                intent: &mut self.intent,
                probe: &self.index,
                points: &resolve,
                rng: &mut self.rng,
            };
            tick_selector(&supervisor_tree(), &mut ctx)
        }
    }

    fn assert_dir(actual: Vec3, expected: Vec3) {
        assert!(actual.distance(expected) < 1e-4, "expected {:?}, got {:?}", expected, actual);
    }

    #[test]
    fn test_avoidance_tie_break() {
        // forward = -Z, right = +X
        assert_dir(choose_avoidance_direction(Vec3::NEG_Z, true, false), Vec3::X);
        assert_dir(choose_avoidance_direction(Vec3::NEG_Z, false, true), Vec3::NEG_X);
        assert_dir(choose_avoidance_direction(Vec3::NEG_Z, true, true), Vec3::Z);
        assert_dir(choose_avoidance_direction(Vec3::NEG_Z, false, false), Vec3::X);
    }

    #[test]
    fn test_obstacle_avoidance_has_top_priority() {
        let mut fixture = Fixture::new()
            .with_special_point(Vec3::new(2.0, 0.0, 0.0), 1.0)
            .with_waypoints(vec![Vec3::new(0.0, 0.0, -10.0)]);
        fixture.perception.has_obstacle_ahead = true;
        fixture.perception.begin_stationary_scan();
        fixture.navigator.is_following = true;
        // Стол слева-впереди: левый 45° луч упирается, правый свободен
        fixture.index.insert(
            Entity::from_raw(2),
            Vec3::new(-1.0, 1.2, -1.0),
            SpatialBody::cuboid(Vec3::splat(0.3), LAYER_OBSTACLE),
        );

        let result = fixture.tick();
        assert_eq!(result, Some((LeafKind::ObstacleAvoidance, Status::Success)));
        assert_dir(fixture.intent.direction, Vec3::X);
        assert!(!fixture.navigator.is_following);
        assert!(!fixture.perception.is_scanning_stationary);
        // Special point даже не оценивался
        assert_eq!(fixture.tracker.cooldown_remaining, 0.0);
    }

    #[test]
    fn test_seek_special_point_snapshots_waypoint_target() {
        let mut fixture = Fixture::new()
            .with_special_point(Vec3::new(3.0, 0.0, 0.0), 1.0)
            .with_waypoints(vec![Vec3::new(0.0, 0.0, -10.0), Vec3::new(5.0, 0.0, -10.0)]);
        fixture.navigator.current_index = 1;

        let result = fixture.tick();
        assert_eq!(result, Some((LeafKind::SeekSpecialPoint, Status::Success)));
        assert!(fixture.tracker.is_going_to_special_point);
        assert_eq!(fixture.tracker.current_special_point, Some(Entity::from_raw(POINT)));
        assert_eq!(fixture.tracker.return_position, Some(Vec3::new(5.0, 0.0, -10.0)));
        assert_eq!(fixture.tracker.saved_waypoint_index, Some(1));
        assert_eq!(fixture.tracker.cooldown_remaining, fixture.tracker.config.cooldown_duration);
        assert_dir(fixture.intent.direction, Vec3::X);
    }

    #[test]
    fn test_failed_roll_falls_through_to_patrol() {
        let mut fixture = Fixture::new().with_special_point(Vec3::new(3.0, 0.0, 0.0), 0.0);

        let result = fixture.tick();
        assert_eq!(result, Some((LeafKind::FreePatrol, Status::Running)));
        assert!(!fixture.tracker.is_diverting());
        // Точка "съедена" даже при неудачном броске
        assert!(fixture.tracker.cooldown_remaining > 0.0);
        assert!(fixture.patrol.target.is_some());
    }

    #[test]
    fn test_go_to_special_point_runs_until_arrival() {
        let mut fixture = Fixture::new().with_special_point(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert_eq!(fixture.tick(), Some((LeafKind::SeekSpecialPoint, Status::Success)));

        assert_eq!(fixture.tick(), Some((LeafKind::GoToSpecialPoint, Status::Running)));
        assert_dir(fixture.intent.direction, Vec3::X);

        fixture.position = Vec3::new(2.5, 0.0, 0.0);
        assert_eq!(fixture.tick(), Some((LeafKind::GoToSpecialPoint, Status::Success)));
        assert!(fixture.tracker.is_at_special_point);
        assert!(fixture.intent.is_halted());

        assert_eq!(fixture.tick(), Some((LeafKind::StayAtSpecialPoint, Status::Running)));
        assert!(fixture.intent.is_halted());
    }

    #[test]
    fn test_lost_special_point_aborts_and_resumes_route() {
        let mut fixture = Fixture::new()
            .with_special_point(Vec3::new(3.0, 0.0, 0.0), 1.0)
            .with_waypoints(vec![Vec3::new(0.0, 0.0, -10.0), Vec3::new(5.0, 0.0, -10.0)]);
        fixture.navigator.current_index = 1;
        assert_eq!(fixture.tick(), Some((LeafKind::SeekSpecialPoint, Status::Success)));

        // Entity точки удалён посреди отвлечения
        fixture.point_position = None;
        let result = fixture.tick();

        assert_eq!(result, Some((LeafKind::FollowWaypoints, Status::Running)));
        assert!(!fixture.tracker.is_diverting());
        assert_eq!(fixture.tracker.current_special_point, None);
        assert_eq!(fixture.navigator.current_index, 1);
        assert!(fixture.navigator.is_following);
    }

    #[test]
    fn test_waypoint_leaf_running_then_success() {
        let mut fixture = Fixture::new().with_waypoints(vec![Vec3::new(0.0, 0.0, -10.0)]);

        assert_eq!(fixture.tick(), Some((LeafKind::FollowWaypoints, Status::Running)));
        assert_dir(fixture.intent.direction, Vec3::NEG_Z);

        // Внутри свободного порога (1.0), но ещё не в reach radius (0.5)
        fixture.position = Vec3::new(0.0, 0.0, -9.2);
        assert_eq!(fixture.tick(), Some((LeafKind::FollowWaypoints, Status::Success)));

        // Дошли → dwell, стоим
        fixture.position = Vec3::new(0.0, 0.0, -10.0);
        assert_eq!(fixture.tick(), Some((LeafKind::FollowWaypoints, Status::Success)));
        assert!(fixture.navigator.is_waiting_at_waypoint);
        assert!(fixture.intent.is_halted());
    }

    #[test]
    fn test_stationary_scan_when_idle_off_path() {
        let mut fixture = Fixture::new();
        fixture.is_moving = false;

        assert_eq!(fixture.tick(), Some((LeafKind::StationaryScan, Status::Running)));
        assert!(fixture.perception.is_scanning_stationary);
        assert!(fixture.intent.is_halted());

        // Sweep закончился в этом tick'е → Success
        fixture.perception.stop_stationary_scan(fixture.now);
        assert_eq!(fixture.tick(), Some((LeafKind::StationaryScan, Status::Success)));

        // Интервал не прошёл → fallback на free patrol
        fixture.now += 1.0;
        assert_eq!(fixture.tick(), Some((LeafKind::FreePatrol, Status::Running)));
        assert!(!fixture.intent.is_halted());
    }

    #[test]
    fn test_moving_agent_skips_stationary_scan() {
        let mut fixture = Fixture::new();
        fixture.is_moving = true;

        assert_eq!(fixture.tick(), Some((LeafKind::FreePatrol, Status::Running)));
        assert!(!fixture.perception.is_scanning_stationary);
    }

    #[test]
    fn test_free_patrol_walks_return_leg_first() {
        let mut fixture = Fixture::new();
        fixture.tracker.return_position = Some(Vec3::new(-6.0, 0.0, 0.0));
        fixture.tracker.is_returning = true;

        assert_eq!(fixture.tick(), Some((LeafKind::FreePatrol, Status::Running)));
        assert_dir(fixture.intent.direction, Vec3::NEG_X);
        assert!(fixture.patrol.target.is_none());

        fixture.position = Vec3::new(-5.5, 0.0, 0.0);
        assert_eq!(fixture.tick(), Some((LeafKind::FreePatrol, Status::Running)));
        assert!(!fixture.tracker.is_returning);
        assert!(fixture.patrol.target.is_some());
    }
}
