//! Spatial domain: ray casts и proximity queries для AI
//!
//! Содержит:
//! - SpatialProbe (trait, контракт geometry backend)
//! - SpatialIndex (headless backend, Resource)
//! - SpatialBody (component для entities в индексе)
//! - layers (Group маски)

use bevy::prelude::*;

pub mod index;
pub mod layers;
pub mod probe;

pub use index::{sync_spatial_index, ColliderShape, SpatialBody, SpatialIndex};
pub use layers::*;
pub use probe::{RayHit, SpatialProbe};

use crate::SupervisorSet;

pub struct SpatialPlugin;

impl Plugin for SpatialPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpatialIndex>()
            .add_systems(FixedUpdate, sync_spatial_index.in_set(SupervisorSet::Sensing));
    }
}
