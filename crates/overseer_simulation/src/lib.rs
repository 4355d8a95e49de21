//! Overseer Simulation Core
//!
//! ECS-симуляция supervisor'ов на Bevy 0.16 (headless).
//!
//! Tick (FixedUpdate, 60Hz), строго по порядку:
//! - Sensing: SpatialIndex пересобирается из SpatialBody
//! - Perception: голова, obstacle fan, player cone, штрафы
//! - Decision: priority behavior tree → MovementIntent
//! - Locomotion: state machine → Transform
//!
//! Агенты независимы, общий только RNG (детерминированный, seeded).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod config;
pub mod ledger;
pub mod logger;
pub mod movement;
pub mod navigation;
pub mod perception;
pub mod physics;
pub mod shared;
pub mod spatial;

// Re-export базовых типов для удобства
pub use actor::{
    spawn_box, spawn_floor, spawn_player, spawn_special_point, spawn_supervisor, Player, Supervisor,
    SupervisorConfig,
};
pub use ai::{AIPlugin, DecisionTrace, LeafKind, Status};
pub use config::{ConfigError, SupervisorProfile};
pub use ledger::{PenaltyApplied, PenaltyDeclined, PenaltyLedger, PenaltyState, WorkerStatus};
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use movement::{JumpIntent, MovementIntent, Pace};
pub use navigation::{PatrolState, SpecialPoint, SpecialPointTracker, WaypointNavigator};
pub use perception::{Perception, PerceptionPlugin};
pub use physics::{Gait, LocomotionController, LocomotionPlugin, LocomotionState};
pub use spatial::{SpatialBody, SpatialIndex, SpatialPlugin, SpatialProbe};

/// Длительность одного simulation tick (60Hz)
pub const TICK: Duration = Duration::from_nanos(16_666_667);

/// Фазы supervisor tick'а (FixedUpdate, выполняются цепочкой)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupervisorSet {
    Sensing,
    Perception,
    Decision,
    Locomotion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed мог прийти из create_headless_app, не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_duration(TICK))
            .configure_sets(
                FixedUpdate,
                (
                    SupervisorSet::Sensing,
                    SupervisorSet::Perception,
                    SupervisorSet::Decision,
                    SupervisorSet::Locomotion,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            )
            .add_plugins((SpatialPlugin, PerceptionPlugin, AIPlugin, LocomotionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` продвигает часы ровно на один TICK.
/// Первый `update()` только заводит часы (FixedUpdate ещё не выполняется).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(TICK))
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    app
}

/// Прогнать `ticks` вызовов `app.update()`
pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
