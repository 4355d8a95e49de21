//! Penalty ledger: экономика штрафов игрока
//!
//! AI core знает только контракт `PenaltyLedger`:
//! - "игрок сейчас бездельничает?"
//! - "попробовать оштрафовать" (cooldown-gated, success/failure)
//!
//! `WorkerStatus`: реализация на player entity (balance + stress).
//! `PenaltyState`: per-supervisor cooldown (отдельно от cooldown ledger'а).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub trait PenaltyLedger {
    fn is_currently_violating(&self) -> bool;

    /// `true` если штраф применён. Отказ: бизнес-правило, не ошибка.
    fn try_apply_penalty(&mut self, now: f32) -> bool;
}

/// Component: статус работника (игрока)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct WorkerStatus {
    /// Игрок отлынивает (выставляется gameplay/VR слоем)
    pub is_slacking: bool,
    pub balance: f32,
    pub stress: f32,
    pub max_stress: f32,
    pub penalty_amount: f32,
    pub stress_per_penalty: f32,
    /// Внутренний cooldown ledger'а (секунды)
    pub penalty_cooldown: f32,
    pub last_penalty_time: Option<f32>,
    pub penalties_applied: u32,
}

impl Default for WorkerStatus {
    fn default() -> Self {
        Self {
            is_slacking: false,
            balance: 100.0,
            stress: 0.0,
            max_stress: 100.0,
            penalty_amount: 10.0,
            stress_per_penalty: 15.0,
            penalty_cooldown: 1.0,
            last_penalty_time: None,
            penalties_applied: 0,
        }
    }
}

impl WorkerStatus {
    pub fn can_afford_penalty(&self) -> bool {
        self.balance >= self.penalty_amount
    }

    fn cooldown_ready(&self, now: f32) -> bool {
        self.last_penalty_time
            .map_or(true, |last| now - last >= self.penalty_cooldown)
    }
}

impl PenaltyLedger for WorkerStatus {
    fn is_currently_violating(&self) -> bool {
        self.is_slacking
    }

    fn try_apply_penalty(&mut self, now: f32) -> bool {
        if !self.cooldown_ready(now) || !self.can_afford_penalty() {
            return false;
        }

        self.balance -= self.penalty_amount;
        self.stress = (self.stress + self.stress_per_penalty).min(self.max_stress);
        self.last_penalty_time = Some(now);
        self.penalties_applied += 1;
        true
    }
}

/// Component: per-supervisor penalty cooldown
///
/// Инвариант: штраф (повторно) только если `now - last_penalty_time >= penalty_cooldown`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PenaltyState {
    pub last_penalty_time: Option<f32>,
    pub penalty_cooldown: f32,
    /// Ledger отказал по этому игроку в текущей детекции (сброс при потере из виду)
    pub declined_for: Option<Entity>,
}

impl Default for PenaltyState {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl PenaltyState {
    pub fn new(penalty_cooldown: f32) -> Self {
        Self {
            last_penalty_time: None,
            penalty_cooldown: penalty_cooldown.max(0.0),
            declined_for: None,
        }
    }

    pub fn can_penalize(&self, now: f32) -> bool {
        self.last_penalty_time
            .map_or(true, |last| now - last >= self.penalty_cooldown)
    }

    pub fn record(&mut self, now: f32) {
        self.last_penalty_time = Some(now);
        self.declined_for = None;
    }

    /// Новый detection cycle: отказ ledger'а больше не действует
    pub fn clear_declined(&mut self) {
        self.declined_for = None;
    }
}

/// Результат одной penalty проверки (для событий/логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyOutcome {
    /// Игрок не бездельничает / не leader / cooldown / уже отказано в этой детекции
    NotAttempted,
    Applied,
    Declined,
}

/// Penalty check: ledger → leader → cooldown → apply.
///
/// На success пишет `last_penalty_time`. Declined запоминается в `declined_for`
/// и не ретраится, пока caller не вызовет `clear_declined` (игрок потерян).
pub fn run_penalty_check(
    ledger: &mut dyn PenaltyLedger,
    penalty: &mut PenaltyState,
    player: Entity,
    is_leader: bool,
    now: f32,
) -> PenaltyOutcome {
    if !ledger.is_currently_violating() || !is_leader || !penalty.can_penalize(now) {
        return PenaltyOutcome::NotAttempted;
    }
    if penalty.declined_for == Some(player) {
        return PenaltyOutcome::NotAttempted;
    }

    if ledger.try_apply_penalty(now) {
        penalty.record(now);
        PenaltyOutcome::Applied
    } else {
        penalty.declined_for = Some(player);
        PenaltyOutcome::Declined
    }
}

/// Event: штраф применён (one-shot VFX/SFX trigger)
#[derive(Event, Debug, Clone)]
pub struct PenaltyApplied {
    pub supervisor: Entity,
    pub player: Entity,
    pub amount: f32,
}

/// Event: ledger отказал (например, не хватает баланса)
#[derive(Event, Debug, Clone)]
pub struct PenaltyDeclined {
    pub supervisor: Entity,
    pub player: Entity,
}
