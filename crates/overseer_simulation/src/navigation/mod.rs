//! Navigation: special points, waypoint patrol, free patrol
//!
//! Всё здесь: per-agent состояние + чистые методы. Decision tree (`ai`)
//! решает, какой из навигаторов рулит агентом в текущем tick'е.

pub mod patrol;
pub mod special_points;
pub mod waypoints;

pub use patrol::*;
pub use special_points::*;
pub use waypoints::*;
