//! Priority selector: упорядоченный список (condition, action) leaves
//!
//! Каждый tick дерево оценивается сверху вниз целиком. Первый leaf, чей
//! condition выполнен и action не вернул Failure, "выигрывает" tick.
//! Никаких явных transition таблиц: порядок leaves и есть tie-break.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Status {
    Success,
    Running,
    Failure,
}

/// Leaves supervisor'а (в порядке приоритета)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum LeafKind {
    ObstacleAvoidance,
    SeekSpecialPoint,
    GoToSpecialPoint,
    StayAtSpecialPoint,
    FollowWaypoints,
    StationaryScan,
    FreePatrol,
}

/// Sequence из двух шагов: precondition → action
pub struct Leaf<C> {
    pub kind: LeafKind,
    pub condition: fn(&C) -> bool,
    pub action: fn(&mut C) -> Status,
}

/// Один проход selector'а. None = ни один leaf не сработал.
pub fn tick_selector<C>(leaves: &[Leaf<C>], ctx: &mut C) -> Option<(LeafKind, Status)> {
    for leaf in leaves {
        if !(leaf.condition)(ctx) {
            continue;
        }
        let status = (leaf.action)(ctx);
        if status != Status::Failure {
            return Some((leaf.kind, status));
        }
    }
    None
}

/// Component: какой leaf отработал в последнем tick'е (debug / тесты)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct DecisionTrace {
    pub last_leaf: Option<LeafKind>,
    pub last_status: Option<Status>,
    /// Сколько tick'ов подряд выигрывает один и тот же leaf
    pub streak: u32,
}

impl DecisionTrace {
    /// Записать результат tick'а. `true` если leaf сменился.
    pub fn record(&mut self, result: Option<(LeafKind, Status)>) -> bool {
        let leaf = result.map(|(kind, _)| kind);
        let changed = leaf != self.last_leaf;
        self.streak = if changed { 1 } else { self.streak.saturating_add(1) };
        self.last_leaf = leaf;
        self.last_status = result.map(|(_, status)| status);
        changed
    }
}
