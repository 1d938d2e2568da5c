//! Tile Agents - tick-driven agent simulation on a tile grid
//!
//! Agents carry needs, pick goals through utility scoring and walk to
//! their destinations along A* paths. The host calls
//! [`Simulation::update`](simulation::tick::Simulation::update) once per frame.

pub mod core;
pub mod ecs;
pub mod entity;
pub mod pathfinding;
pub mod planner;
pub mod simulation;
pub mod spatial;

pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::core::types::{EntityId, GridCoord, Vec2};
pub use crate::ecs::world::World;
pub use crate::simulation::tick::{SimEvent, Simulation};
pub use crate::spatial::nav::{NavGrid, NavWorld, TerrainGrid};
