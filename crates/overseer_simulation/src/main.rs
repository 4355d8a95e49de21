//! Headless симуляция офиса
//!
//! Два supervisor'а (leader на waypoints, помощник на free patrol),
//! один бездельничающий игрок, стена, кулер. Печатает сводку каждые 5 сек.

use bevy::prelude::*;
use overseer_simulation::*;

const SEED: u64 = 42;
const TICKS: usize = 1800;
const REPORT_EVERY: usize = 300;

fn spawn_office(app: &mut App) -> (Vec<Entity>, Entity) {
    let mut commands = app.world_mut().commands();

    spawn_floor(&mut commands, 30.0);
    // Стена между рабочими местами
    spawn_box(
        &mut commands,
        Vec3::new(4.0, 1.0, -6.0),
        Vec3::new(0.2, 1.0, 3.0),
        spatial::LAYER_WALL,
    );
    let cooler = spawn_special_point(&mut commands, Vec3::new(-3.0, 0.0, -4.0));

    let player = spawn_player(
        &mut commands,
        Vec3::new(1.0, 1.0, -8.0),
        WorkerStatus {
            is_slacking: true,
            ..default()
        },
    );

    let leader = spawn_supervisor(
        &mut commands,
        &SupervisorProfile::default(),
        Transform::from_xyz(0.0, 0.0, 0.0),
        vec![
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(-6.0, 0.0, -10.0),
            Vec3::new(-6.0, 0.0, 0.0),
        ],
        vec![cooler],
    );

    let mut helper_profile = SupervisorProfile::default();
    helper_profile.supervisor.is_leader = false;
    helper_profile.supervisor.use_waypoints = false;
    let helper = spawn_supervisor(
        &mut commands,
        &helper_profile,
        Transform::from_xyz(8.0, 0.0, 4.0),
        Vec::new(),
        vec![cooler],
    );

    (vec![leader, helper], player)
}

fn main() {
    println!("Starting Overseer headless simulation (seed: {})", SEED);

    let mut app = create_headless_app(SEED);
    app.add_plugins(SimulationPlugin);
    set_log_level(LogLevel::Info);

    let (supervisors, player) = spawn_office(&mut app);

    for tick in 0..TICKS {
        app.update();

        if tick % REPORT_EVERY == 0 {
            let world = app.world();
            println!("Tick {} ({:.1}s):", tick, world.resource::<Time<Fixed>>().elapsed_secs());

            for &supervisor in &supervisors {
                let (Some(transform), Some(perception), Some(locomotion), Some(trace)) = (
                    world.get::<Transform>(supervisor),
                    world.get::<Perception>(supervisor),
                    world.get::<LocomotionController>(supervisor),
                    world.get::<DecisionTrace>(supervisor),
                ) else {
                    continue;
                };
                println!(
                    "  {:?}: pos ({:.1}, {:.1}) gait {:?} leaf {:?} sees player: {} locked: {}",
                    supervisor,
                    transform.translation.x,
                    transform.translation.z,
                    locomotion.gait,
                    trace.last_leaf,
                    perception.has_player_in_sight,
                    perception.is_player_locked,
                );
            }

            if let Some(status) = world.get::<WorkerStatus>(player) {
                println!(
                    "  player: balance {:.1} stress {:.1} penalties {}",
                    status.balance, status.stress, status.penalties_applied
                );
            }
        }
    }

    println!("Simulation complete!");
}
