//! A* pathfinding over tile worlds
//!
//! Cost model: stepping out of a tile costs that tile's movement cost,
//! diagonals included. The open set is a plain `Vec` scanned for the lowest
//! `f`; on equal `f` the node discovered first wins.
//!
//! Known approximations:
//! - The default Manhattan heuristic overestimates on 8-connected grids, so
//!   returned paths are not guaranteed shortest. `Heuristic::Chebyshev` is
//!   admissible for unit-cost worlds.
//! - Closed tiles are never reopened, which can also miss cheaper routes
//!   when costs vary.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::config::PathfindingConfig;
use crate::core::types::GridCoord;
use crate::spatial::nav::NavGrid;

const CARDINAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Distance estimate used for `h`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// `|dx| + |dy|`
    #[default]
    Manhattan,
    /// `max(dx, dy) + (sqrt(2) - 1) * min(dx, dy)`
    Octile,
    /// `max(|dx|, |dy|)`
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(&self, a: GridCoord, b: GridCoord) -> f32 {
        let dx = (a.x - b.x).abs() as f32;
        let dy = (a.y - b.y).abs() as f32;
        match self {
            Self::Manhattan => dx + dy,
            Self::Octile => dx.max(dy) + (std::f32::consts::SQRT_2 - 1.0) * dx.min(dy),
            Self::Chebyshev => dx.max(dy),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    coord: GridCoord,
    g: f32,
    f: f32,
    parent: Option<usize>,
}

/// A* search bound to one world
pub struct Pathfinder<'a, G: NavGrid + ?Sized> {
    world: &'a G,
    max_iterations: usize,
    heuristic: Heuristic,
    allow_diagonal: bool,
}

impl<'a, G: NavGrid + ?Sized> Pathfinder<'a, G> {
    /// Defaults: 1000 expansions, Manhattan, diagonals allowed
    pub fn new(world: &'a G) -> Self {
        Self::with_config(world, &PathfindingConfig::default())
    }

    pub fn with_config(world: &'a G, config: &PathfindingConfig) -> Self {
        Self {
            world,
            max_iterations: config.max_iterations,
            heuristic: config.heuristic,
            allow_diagonal: config.allow_diagonal,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Find a path from `start` to `goal`, both inclusive
    ///
    /// Returns an empty path when either end is not walkable, the goal is
    /// unreachable, or the expansion budget runs out.
    pub fn find_path(&self, start: GridCoord, goal: GridCoord) -> Vec<GridCoord> {
        if !self.world.is_walkable(start.x, start.y) || !self.world.is_walkable(goal.x, goal.y) {
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }

        let mut nodes = vec![Node {
            coord: start,
            g: 0.0,
            f: self.heuristic.estimate(start, goal),
            parent: None,
        }];
        // Indices into `nodes`, kept in discovery order
        let mut open: Vec<usize> = vec![0];
        let mut open_lookup: AHashMap<GridCoord, usize> = AHashMap::new();
        open_lookup.insert(start, 0);
        let mut closed: AHashSet<GridCoord> = AHashSet::new();

        let mut iterations = 0;
        while !open.is_empty() && iterations < self.max_iterations {
            iterations += 1;

            let mut best = 0;
            for (pos, &idx) in open.iter().enumerate().skip(1) {
                if nodes[idx].f < nodes[open[best]].f {
                    best = pos;
                }
            }
            let current = open.remove(best);
            let (coord, g) = (nodes[current].coord, nodes[current].g);
            open_lookup.remove(&coord);
            closed.insert(coord);

            if coord == goal {
                return reconstruct_path(&nodes, current);
            }

            let step_cost = self.world.movement_cost(coord.x, coord.y);
            for neighbor in self.neighbors(coord) {
                if closed.contains(&neighbor) {
                    continue;
                }

                let tentative_g = g + step_cost;
                let f = tentative_g + self.heuristic.estimate(neighbor, goal);

                match open_lookup.get(&neighbor) {
                    Some(&idx) => {
                        if tentative_g >= nodes[idx].g {
                            continue;
                        }
                        let node = &mut nodes[idx];
                        node.g = tentative_g;
                        node.f = f;
                        node.parent = Some(current);
                    }
                    None => {
                        nodes.push(Node {
                            coord: neighbor,
                            g: tentative_g,
                            f,
                            parent: Some(current),
                        });
                        let idx = nodes.len() - 1;
                        open.push(idx);
                        open_lookup.insert(neighbor, idx);
                    }
                }
            }
        }

        tracing::trace!(
            "No path from {:?} to {:?} after {} expansions",
            start,
            goal,
            iterations
        );
        Vec::new()
    }

    fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        let diagonals: &[(i32, i32)] = if self.allow_diagonal { &DIAGONAL } else { &[] };
        CARDINAL
            .iter()
            .chain(diagonals.iter())
            .map(move |&(dx, dy)| coord.offset(dx, dy))
            .filter(move |c| self.world.is_walkable(c.x, c.y))
    }

    /// Nearest walkable tile by expanding Chebyshev rings
    ///
    /// Searches radii `1..max(cols, rows)` and returns `(x, y)` itself when
    /// it is walkable or when nothing walkable is found.
    pub fn find_nearest_walkable(&self, x: i32, y: i32) -> GridCoord {
        let origin = GridCoord::new(x, y);
        if self.world.is_walkable(x, y) {
            return origin;
        }

        let max_radius = self.world.cols().max(self.world.rows());
        for radius in 1..max_radius {
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    if dx.abs() != radius && dy.abs() != radius {
                        continue;
                    }
                    let candidate = origin.offset(dx, dy);
                    if self.world.is_walkable(candidate.x, candidate.y) {
                        return candidate;
                    }
                }
            }
        }

        origin
    }

    /// Cost of walking a path: the departure cost of every tile but the last
    pub fn path_cost(&self, path: &[GridCoord]) -> f32 {
        if path.len() < 2 {
            return 0.0;
        }
        path[..path.len() - 1]
            .iter()
            .map(|c| self.world.movement_cost(c.x, c.y))
            .sum()
    }
}

fn reconstruct_path(nodes: &[Node], mut current: usize) -> Vec<GridCoord> {
    let mut path = vec![nodes[current].coord];
    while let Some(prev) = nodes[current].parent {
        path.push(nodes[prev].coord);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::nav::NavWorld;

    fn is_connected(path: &[GridCoord]) -> bool {
        path.windows(2).all(|w| w[0].chebyshev(&w[1]) == 1)
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let world = NavWorld::open(10, 10, 16.0).unwrap();
        let start = GridCoord::new(5, 5);

        let path = Pathfinder::new(&world).find_path(start, start);

        assert_eq!(path, vec![start]);
    }

    #[test]
    fn test_pathfind_straight_corridor() {
        let mut world = NavWorld::open(5, 3, 16.0).unwrap();
        for x in 0..5 {
            world.set_walkable(x, 0, false);
            world.set_walkable(x, 2, false);
        }
        let start = GridCoord::new(0, 1);
        let goal = GridCoord::new(4, 1);

        let path = Pathfinder::new(&world).find_path(start, goal);

        assert_eq!(path.len() as i32, start.manhattan(&goal) + 1);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert!(path.iter().all(|c| c.y == 1));
    }

    #[test]
    fn test_pathfind_unwalkable_endpoints() {
        let mut world = NavWorld::open(10, 10, 16.0).unwrap();
        world.set_walkable(3, 3, false);
        let pf = Pathfinder::new(&world);

        assert!(pf.find_path(GridCoord::new(3, 3), GridCoord::new(0, 0)).is_empty());
        assert!(pf.find_path(GridCoord::new(0, 0), GridCoord::new(3, 3)).is_empty());
        assert!(pf.find_path(GridCoord::new(0, 0), GridCoord::new(10, 0)).is_empty());
    }

    #[test]
    fn test_pathfind_no_path() {
        let mut world = NavWorld::open(10, 10, 16.0).unwrap();
        // Completely surround goal with walls
        let goal = GridCoord::new(5, 5);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx != 0 || dy != 0 {
                    world.set_walkable(5 + dx, 5 + dy, false);
                }
            }
        }

        let path = Pathfinder::new(&world).find_path(GridCoord::new(0, 0), goal);

        assert!(path.is_empty());
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let mut world = NavWorld::open(10, 10, 16.0).unwrap();
        for y in 0..8 {
            world.set_walkable(4, y, false);
        }
        let start = GridCoord::new(0, 0);
        let goal = GridCoord::new(8, 0);

        let path = Pathfinder::new(&world).find_path(start, goal);

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert!(is_connected(&path));
        assert!(path.iter().all(|c| world.is_walkable(c.x, c.y)));
        assert!(path.iter().any(|c| c.y >= 8));
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let world = NavWorld::open(50, 50, 16.0).unwrap();
        let pf = Pathfinder::new(&world).max_iterations(3);

        let path = pf.find_path(GridCoord::new(0, 0), GridCoord::new(49, 49));

        assert!(path.is_empty());
    }

    #[test]
    fn test_cost_counts_departed_tile() {
        let mut world = NavWorld::open(3, 1, 16.0).unwrap();
        world.set_cost(0, 0, 5.0);
        world.set_cost(2, 0, 9.0);
        let pf = Pathfinder::new(&world);

        let path = vec![GridCoord::new(0, 0), GridCoord::new(1, 0), GridCoord::new(2, 0)];
        // Leaving (0,0) costs 5, leaving (1,0) costs 1; the goal's 9 is never paid
        assert_eq!(pf.path_cost(&path), 6.0);
        assert_eq!(pf.path_cost(&path[..1]), 0.0);
    }

    #[test]
    fn test_pathfind_avoids_expensive_tiles() {
        let mut world = NavWorld::open(7, 3, 16.0).unwrap();
        for x in 1..6 {
            world.set_cost(x, 1, 50.0);
        }
        let pf = Pathfinder::new(&world).heuristic(Heuristic::Chebyshev);

        let path = pf.find_path(GridCoord::new(0, 1), GridCoord::new(6, 1));

        assert!(!path.is_empty());
        assert!(path[1..path.len() - 1].iter().all(|c| c.y != 1));
    }

    #[test]
    fn test_chebyshev_is_optimal_on_open_grid() {
        let world = NavWorld::open(20, 20, 16.0).unwrap();
        let pf = Pathfinder::new(&world).heuristic(Heuristic::Chebyshev);
        let (start, goal) = (GridCoord::new(1, 2), GridCoord::new(15, 9));

        let path = pf.find_path(start, goal);

        assert_eq!(pf.path_cost(&path), start.chebyshev(&goal) as f32);
    }

    #[test]
    fn test_cardinal_only() {
        let world = NavWorld::open(6, 6, 16.0).unwrap();
        let config = PathfindingConfig {
            allow_diagonal: false,
            ..PathfindingConfig::default()
        };
        let pf = Pathfinder::with_config(&world, &config);
        let (start, goal) = (GridCoord::new(0, 0), GridCoord::new(3, 3));

        let path = pf.find_path(start, goal);

        assert_eq!(path.len() as i32, start.manhattan(&goal) + 1);
        assert!(path.windows(2).all(|w| w[0].manhattan(&w[1]) == 1));
    }

    #[test]
    fn test_find_nearest_walkable() {
        let mut world = NavWorld::open(10, 10, 16.0).unwrap();
        for x in 3..=7 {
            for y in 3..=7 {
                world.set_walkable(x, y, false);
            }
        }
        let pf = Pathfinder::new(&world);

        assert_eq!(pf.find_nearest_walkable(1, 1), GridCoord::new(1, 1));
        let found = pf.find_nearest_walkable(5, 5);
        assert!(world.is_walkable(found.x, found.y));
        assert_eq!(found.chebyshev(&GridCoord::new(5, 5)), 3);
    }

    #[test]
    fn test_find_nearest_walkable_none_found() {
        let walkable = vec![false; 16];
        let world = NavWorld::from_arrays(4, 4, 16.0, walkable, None).unwrap();

        let found = Pathfinder::new(&world).find_nearest_walkable(2, 2);

        assert_eq!(found, GridCoord::new(2, 2));
    }
}
