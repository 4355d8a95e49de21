//! Collision Layers Constants
//!
//! Centralised layer маски для SpatialProbe запросов.
//!
//! ## Архитектура:
//! - **Layers:** на каком слое находится collider (`SpatialBody::layers`)
//! - **Mask:** какие слои видит ray cast (`SpatialProbe::cast_ray(.., mask)`)
//!
//! ## Layers:
//! - GROUP_1: Ground (пол, рампы, лестницы)
//! - GROUP_2: Obstacle (столы, шкафы, стены: то что обходим)
//! - GROUP_3: Blocking (перегородки: то что закрывает line-of-sight)
//! - GROUP_4: Player
//!
//! Стена офиса обычно `LAYER_OBSTACLE | LAYER_BLOCKING`.

use bevy_rapier3d::prelude::Group;

// ============================================================================
// Layers (на каком слое collider находится)
// ============================================================================

pub const LAYER_GROUND: Group = Group::GROUP_1;

pub const LAYER_OBSTACLE: Group = Group::GROUP_2;

pub const LAYER_BLOCKING: Group = Group::GROUP_3;

pub const LAYER_PLAYER: Group = Group::GROUP_4;

/// Стена: обходим и не видим сквозь
pub const LAYER_WALL: Group = LAYER_OBSTACLE.union(LAYER_BLOCKING);

// ============================================================================
// Masks (что видит ray cast)
// ============================================================================

/// Obstacle fan + avoidance probes
pub const MASK_OBSTACLE_PROBE: Group = LAYER_OBSTACLE;

/// Eye-level ray к игроку: попадаем либо в игрока, либо в перегородку
pub const MASK_LINE_OF_SIGHT: Group = LAYER_PLAYER.union(LAYER_BLOCKING);

/// Ground probes (locomotion)
pub const MASK_GROUND_PROBE: Group = LAYER_GROUND;
