//! Generic dense tile grid

use crate::core::types::{GridCoord, Vec2};

/// Row-major 2D grid, `idx(x, y) = y * cols + x`
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Clone> {
    pub cols: i32,
    pub rows: i32,
    data: Vec<T>,
}

/// Cells in a `cols x rows` grid; `None` if negative or too large for `i32`
pub fn cell_count(cols: i32, rows: i32) -> Option<usize> {
    if cols < 0 || rows < 0 {
        return None;
    }
    cols.checked_mul(rows).map(|n| n as usize)
}

impl<T: Clone> Grid<T> {
    /// Invalid dimensions give an empty 0x0 grid
    pub fn filled(cols: i32, rows: i32, value: T) -> Self {
        match cell_count(cols, rows) {
            Some(len) => Self {
                cols,
                rows,
                data: vec![value; len],
            },
            None => Self {
                cols: 0,
                rows: 0,
                data: Vec::new(),
            },
        }
    }

    /// Wrap an existing row-major buffer; `None` if the length is wrong
    pub fn from_vec(cols: i32, rows: i32, data: Vec<T>) -> Option<Self> {
        if cell_count(cols, rows) != Some(data.len()) {
            return None;
        }
        Some(Self { cols, rows, data })
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    #[inline]
    pub fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y * self.cols + x) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.idx(x, y).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        match self.idx(x, y) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    /// Out-of-bounds writes are ignored
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.idx(x, y) {
            self.data[i] = value;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate `(coord, value)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &T)> + '_ {
        let cols = self.cols.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (GridCoord::new(i as i32 % cols, i as i32 / cols), v))
    }
}

/// Tile containing a world position (may be out of bounds)
#[inline]
pub fn world_to_cell(pos: Vec2, tile_size: f32) -> GridCoord {
    GridCoord::new(
        (pos.x / tile_size).floor() as i32,
        (pos.y / tile_size).floor() as i32,
    )
}

/// Centre of a tile in world coordinates
#[inline]
pub fn cell_center(coord: GridCoord, tile_size: f32) -> Vec2 {
    Vec2::new(
        (coord.x as f32 + 0.5) * tile_size,
        (coord.y as f32 + 0.5) * tile_size,
    )
}
