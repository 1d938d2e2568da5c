pub mod astar;

pub use astar::{Heuristic, Pathfinder};
