//! Actor domain: кто участвует в симуляции
//!
//! Содержит:
//! - Supervisor (маркер NPC + required components)
//! - Player (маркер игрока, ledger на том же entity)
//! - SupervisorConfig (флаги decision tree)
//! - spawn helpers

pub mod components;
pub mod spawn;

// Re-export all components
pub use components::*;
pub use spawn::*;
