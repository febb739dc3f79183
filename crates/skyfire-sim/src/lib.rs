//! Combat simulation for Skyfire.
//!
//! Pooled entities, collision, targeting and weapons, stepped at a fixed
//! tick rate by `SimulationEngine`. The render thread reads the same
//! `SharedWorld` through per-collection locks.

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod engine;
pub mod entity_list;
pub mod guidance;
pub mod object;
pub mod player;
pub mod pool;
pub mod registry;
pub mod render;
pub mod weapon;
pub mod world;

pub use engine::{SimConfig, SimulationEngine};
pub use skyfire_core as core;
pub use world::SharedWorld;
