//! Movement domain: intent между decision и locomotion
//!
//! Содержит:
//! - MovementIntent (direction + pace, пишет decision tree)
//! - Pace (Walk/Run/Sprint запрос)
//! - JumpIntent (event для прыжка)

pub mod events;
pub mod intent;

// Re-export all components and events
pub use events::*;
pub use intent::*;
