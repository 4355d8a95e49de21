//! Shared: cross-cutting math helpers
//!
//! Используется perception, decision и locomotion доменами.

pub mod heading;

pub use heading::*;
