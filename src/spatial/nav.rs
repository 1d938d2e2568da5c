//! Navigation worlds: walkability and movement cost per tile
//!
//! The simulation only reads worlds through [`NavGrid`]. Two backing
//! stores implement it: [`NavWorld`] (walkable/cost arrays, e.g. imported
//! from a tile map) and [`TerrainGrid`] (a grid of terrain types).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{GridCoord, Vec2};
use crate::spatial::grid::{cell_center, cell_count, world_to_cell, Grid};

/// Minimum cost accepted from imported tile properties
pub const MIN_TILE_COST: f32 = 0.1;

/// Terrain types of the legacy generated world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Grass,
    Forest,
    Water,
    Mountain,
}

impl Terrain {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, Self::Water | Self::Mountain)
    }
}

/// Read-only view of a tile world
///
/// Outside `[0, cols) x [0, rows)` nothing is walkable and cost is infinite.
pub trait NavGrid {
    fn cols(&self) -> i32;
    fn rows(&self) -> i32;
    fn tile_size(&self) -> f32;
    fn is_walkable(&self, x: i32, y: i32) -> bool;
    fn movement_cost(&self, x: i32, y: i32) -> f32;

    /// Terrain under a tile, for worlds that know it
    fn terrain(&self, _x: i32, _y: i32) -> Option<Terrain> {
        None
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols() && y >= 0 && y < self.rows()
    }

    /// World extent in world units `(width, height)`
    fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.cols() as f32 * self.tile_size(),
            self.rows() as f32 * self.tile_size(),
        )
    }

    fn tile_of(&self, pos: Vec2) -> GridCoord {
        world_to_cell(pos, self.tile_size())
    }

    fn tile_center(&self, coord: GridCoord) -> Vec2 {
        cell_center(coord, self.tile_size())
    }
}

/// Per-tile properties read from a tile map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileProps {
    pub walkable: bool,
    pub cost: Option<f32>,
}

impl Default for TileProps {
    fn default() -> Self {
        Self {
            walkable: true,
            cost: None,
        }
    }
}

/// Walkable/cost arrays, the primary world representation
#[derive(Debug, Clone)]
pub struct NavWorld {
    tile_size: f32,
    walkable: Grid<bool>,
    cost: Option<Grid<f32>>,
}

/// Validated cell count for a world of the given shape
fn check_dimensions(cols: i32, rows: i32, tile_size: f32) -> Result<usize> {
    match cell_count(cols, rows) {
        Some(cells) if cells > 0 && tile_size > 0.0 => Ok(cells),
        _ => Err(SimError::InvalidDimensions { cols, rows, tile_size }),
    }
}

impl NavWorld {
    /// Fully walkable world with uniform cost 1
    pub fn open(cols: i32, rows: i32, tile_size: f32) -> Result<Self> {
        check_dimensions(cols, rows, tile_size)?;
        Ok(Self {
            tile_size,
            walkable: Grid::filled(cols, rows, true),
            cost: None,
        })
    }

    /// Build from row-major arrays of length `cols * rows`
    pub fn from_arrays(
        cols: i32,
        rows: i32,
        tile_size: f32,
        walkable: Vec<bool>,
        cost: Option<Vec<f32>>,
    ) -> Result<Self> {
        let expected = check_dimensions(cols, rows, tile_size)?;

        let walkable_len = walkable.len();
        let walkable = Grid::from_vec(cols, rows, walkable).ok_or(SimError::GridShape {
            layer: "walkable",
            expected,
            actual: walkable_len,
        })?;

        let cost = match cost {
            Some(values) => {
                let actual = values.len();
                Some(Grid::from_vec(cols, rows, values).ok_or(SimError::GridShape {
                    layer: "cost",
                    expected,
                    actual,
                })?)
            }
            None => None,
        };

        Ok(Self { tile_size, walkable, cost })
    }

    /// Build from per-tile map properties in row-major order
    ///
    /// Missing tiles stay walkable with cost 1; explicit costs are raised
    /// to at least [`MIN_TILE_COST`].
    pub fn from_tiles(
        cols: i32,
        rows: i32,
        tile_size: f32,
        tiles: impl IntoIterator<Item = Option<TileProps>>,
    ) -> Result<Self> {
        let cells = check_dimensions(cols, rows, tile_size)?;
        let mut world = Self::open(cols, rows, tile_size)?;
        let mut cost = Grid::filled(cols, rows, 1.0);

        for (i, props) in tiles.into_iter().enumerate().take(cells) {
            let Some(props) = props else { continue };
            let (x, y) = (i as i32 % cols, i as i32 / cols);
            if !props.walkable {
                world.walkable.set(x, y, false);
            }
            if let Some(c) = props.cost {
                cost.set(x, y, c.max(MIN_TILE_COST));
            }
        }

        world.cost = Some(cost);
        Ok(world)
    }

    /// Random obstacles at the given density
    pub fn generate<R: Rng + ?Sized>(
        cols: i32,
        rows: i32,
        tile_size: f32,
        obstacle_fraction: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut world = Self::open(cols, rows, tile_size)?;
        let fraction = if obstacle_fraction.is_nan() {
            0.0
        } else {
            obstacle_fraction.clamp(0.0, 1.0)
        };
        for y in 0..rows {
            for x in 0..cols {
                if rng.gen_bool(fraction) {
                    world.walkable.set(x, y, false);
                }
            }
        }
        let blocked = world.walkable.as_slice().iter().filter(|w| !**w).count();
        tracing::info!("Generated {}x{} nav world with {} blocked tiles", cols, rows, blocked);
        Ok(world)
    }

    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) {
        self.walkable.set(x, y, walkable);
    }

    pub fn set_cost(&mut self, x: i32, y: i32, cost: f32) {
        let (cols, rows) = (self.walkable.cols, self.walkable.rows);
        self.cost
            .get_or_insert_with(|| Grid::filled(cols, rows, 1.0))
            .set(x, y, cost);
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.as_slice().iter().filter(|w| **w).count()
    }
}

impl NavGrid for NavWorld {
    fn cols(&self) -> i32 {
        self.walkable.cols
    }

    fn rows(&self) -> i32 {
        self.walkable.rows
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.walkable.get(x, y).copied().unwrap_or(false)
    }

    fn movement_cost(&self, x: i32, y: i32) -> f32 {
        if !self.walkable.in_bounds(x, y) {
            return f32::INFINITY;
        }
        self.cost
            .as_ref()
            .and_then(|c| c.get(x, y).copied())
            .unwrap_or(1.0)
    }
}

/// Grid of terrain tiles; water and mountain block movement
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    tile_size: f32,
    tiles: Grid<Terrain>,
}

impl TerrainGrid {
    pub fn filled(cols: i32, rows: i32, tile_size: f32, terrain: Terrain) -> Result<Self> {
        check_dimensions(cols, rows, tile_size)?;
        Ok(Self {
            tile_size,
            tiles: Grid::filled(cols, rows, terrain),
        })
    }

    /// Water border two tiles wide, scattered mountains (~10%) and forest
    pub fn generate<R: Rng + ?Sized>(
        cols: i32,
        rows: i32,
        tile_size: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let mut grid = Self::filled(cols, rows, tile_size, Terrain::Grass)?;
        for y in 0..rows {
            for x in 0..cols {
                let terrain = if x < 2 || x >= cols - 2 || y < 2 || y >= rows - 2 {
                    Terrain::Water
                } else if rng.gen_bool(0.1) {
                    Terrain::Mountain
                } else if rng.gen_bool(0.2) {
                    Terrain::Forest
                } else {
                    Terrain::Grass
                };
                grid.tiles.set(x, y, terrain);
            }
        }
        Ok(grid)
    }

    pub fn set(&mut self, x: i32, y: i32, terrain: Terrain) {
        self.tiles.set(x, y, terrain);
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Terrain> {
        self.tiles.get(x, y).copied()
    }
}

impl NavGrid for TerrainGrid {
    fn cols(&self) -> i32 {
        self.tiles.cols
    }

    fn rows(&self) -> i32 {
        self.tiles.rows
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|t| t.is_walkable())
    }

    fn movement_cost(&self, x: i32, y: i32) -> f32 {
        if self.tiles.in_bounds(x, y) {
            1.0
        } else {
            f32::INFINITY
        }
    }

    fn terrain(&self, x: i32, y: i32) -> Option<Terrain> {
        self.get(x, y)
    }
}
