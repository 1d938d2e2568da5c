pub mod grid;
pub mod nav;

pub use grid::{cell_center, world_to_cell, Grid};
pub use nav::{NavGrid, NavWorld, Terrain, TerrainGrid, TileProps};
