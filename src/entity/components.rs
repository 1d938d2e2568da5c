//! Component records attached to agents

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::types::{GridCoord, Vec2};
use crate::planner::actions::Action;
use crate::planner::goals::Goal;

/// Continuous position in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Tile under this position
    pub fn tile(&self, tile_size: f32) -> GridCoord {
        GridCoord::new(
            (self.x / tile_size).floor() as i32,
            (self.y / tile_size).floor() as i32,
        )
    }
}

/// Current velocity plus the agent's speed cap (world units per second)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
    pub speed: f32,
    /// Mirror of the brain's target, kept for the presentation layer
    pub target: Option<Vec2>,
}

impl Velocity {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn stop(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
    }
}

/// Decision state of an agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    pub goal: Goal,
    pub action: Action,
    /// Waypoint currently being walked to
    pub target: Option<Vec2>,
    /// Remaining waypoints after `target`
    pub path: VecDeque<Vec2>,
    /// While positive, decision passes skip this agent
    pub cooldown_ms: f32,
}

impl Brain {
    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_ms > 0.0
    }

    /// Replace the route; the first waypoint becomes the target
    pub fn set_route(&mut self, waypoints: impl IntoIterator<Item = Vec2>) {
        self.path = waypoints.into_iter().collect();
        self.target = self.path.pop_front();
    }

    pub fn clear_route(&mut self) {
        self.target = None;
        self.path.clear();
    }
}

/// Presentation-side position, eased toward the simulated position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub x: f32,
    pub y: f32,
}

impl Visual {
    pub fn at(position: &Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}
