//! Goal run functions: what an agent does once a goal is chosen

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{PathfindingConfig, PlannerConfig};
use crate::core::types::{EntityId, GridCoord, Vec2};
use crate::ecs::world::World;
use crate::entity::components::{Brain, Position};
use crate::entity::needs::Needs;
use crate::pathfinding::astar::Pathfinder;
use crate::planner::goals::Goal;
use crate::spatial::nav::NavGrid;

/// The concrete behaviour currently executing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Eat,
    Rest,
    Socialize,
    Wander,
    Hunt,
}

/// Result of running a goal, as far as movement is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The goal does not move the agent
    Stationary,
    /// A route was planned and the first waypoint set
    Routed,
    /// A destination was picked but no path reaches it
    Unreachable,
}

/// Everything a goal needs to act on one agent
pub struct ActionContext<'a, G: NavGrid + ?Sized> {
    pub world: &'a mut World,
    pub nav: &'a G,
    pub entity: EntityId,
    pub planner: &'a PlannerConfig,
    pub pathfinding: &'a PathfindingConfig,
}

impl<'a, G: NavGrid + ?Sized> ActionContext<'a, G> {
    fn brain(&mut self) -> Option<&mut Brain> {
        self.world.brains.get_mut(self.entity)
    }

    fn set_state(&mut self, goal: Option<Goal>, action: Action) {
        if let Some(brain) = self.brain() {
            if let Some(goal) = goal {
                brain.goal = goal;
            }
            brain.action = action;
        }
    }

    fn current_tile(&self) -> Option<GridCoord> {
        self.world
            .positions
            .get(self.entity)
            .map(|p| p.tile(self.nav.tile_size()))
    }

    /// Run the behaviour attached to `goal`
    pub fn run<R: Rng + ?Sized>(&mut self, goal: Goal, rng: &mut R) -> RouteOutcome {
        match goal {
            Goal::Idle => {
                self.set_state(Some(Goal::Idle), Action::Idle);
                RouteOutcome::Stationary
            }
            Goal::Eat => {
                self.set_state(Some(Goal::Eat), Action::Eat);
                RouteOutcome::Stationary
            }
            Goal::Rest => {
                self.set_state(Some(Goal::Rest), Action::Rest);
                let cooldown = self.planner.rest_cooldown_ms;
                if let Some(brain) = self.brain() {
                    brain.cooldown_ms = cooldown;
                }
                RouteOutcome::Stationary
            }
            Goal::Socialize => self.socialize(),
            Goal::Explore => {
                self.set_state(Some(Goal::Explore), Action::Wander);
                self.wander(rng)
            }
            Goal::Hunt => {
                self.set_state(Some(Goal::Hunt), Action::Hunt);
                RouteOutcome::Stationary
            }
        }
    }

    /// Head for the nearest other agent within `socialize_range`
    fn socialize(&mut self) -> RouteOutcome {
        self.set_state(Some(Goal::Socialize), Action::Socialize);

        let Some(me) = self.world.positions.get(self.entity).map(|p| p.as_vec2()) else {
            return RouteOutcome::Stationary;
        };
        let range = self.planner.socialize_range;
        let nearest = self
            .world
            .join::<Position, Needs>()
            .filter(|(e, _, _)| *e != self.entity)
            .map(|(_, p, _)| (p.as_vec2(), me.distance(&p.as_vec2())))
            .filter(|(_, d)| *d <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(pos, _)| pos);

        match nearest {
            Some(companion) => {
                let tile = self.nav.tile_of(companion);
                self.route_to(tile)
            }
            None => RouteOutcome::Stationary,
        }
    }

    /// Pick a nearby walkable tile and route there; goal is left unchanged
    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RouteOutcome {
        let Some(here) = self.current_tile() else {
            return RouteOutcome::Stationary;
        };
        self.set_state(None, Action::Wander);
        let destination = pick_nearby_walkable(self.nav, here, self.planner, rng);
        self.route_to(destination)
    }

    /// Plan a path to `destination` and load it into the brain
    ///
    /// When the direct search fails both ends are snapped to their nearest
    /// walkable tiles and the search is retried once.
    pub fn route_to(&mut self, destination: GridCoord) -> RouteOutcome {
        let Some(here) = self.current_tile() else {
            return RouteOutcome::Stationary;
        };
        let pathfinder = Pathfinder::with_config(self.nav, self.pathfinding);

        let mut path = pathfinder.find_path(here, destination);
        if path.is_empty() {
            let from = pathfinder.find_nearest_walkable(here.x, here.y);
            let to = pathfinder.find_nearest_walkable(destination.x, destination.y);
            path = pathfinder.find_path(from, to);
        }

        if path.is_empty() {
            tracing::warn!(
                "Entity {} found no path from {:?} to {:?}",
                self.entity,
                here,
                destination
            );
            return RouteOutcome::Unreachable;
        }

        let waypoints = route_waypoints(self.nav, here, &path);
        if let Some(brain) = self.brain() {
            brain.set_route(waypoints);
        }
        RouteOutcome::Routed
    }
}

/// Tile centres to walk through, skipping the tile the agent stands on
fn route_waypoints<G: NavGrid + ?Sized>(nav: &G, here: GridCoord, path: &[GridCoord]) -> Vec<Vec2> {
    let mut waypoints: Vec<Vec2> = path
        .iter()
        .filter(|c| **c != here)
        .map(|c| nav.tile_center(*c))
        .collect();
    if waypoints.is_empty() {
        if let Some(last) = path.last() {
            waypoints.push(nav.tile_center(*last));
        }
    }
    waypoints
}

/// Random walkable tile near `origin`
///
/// Samples `wander_attempts` offsets within each radius in turn and falls
/// back to the map centre.
pub fn pick_nearby_walkable<G: NavGrid + ?Sized, R: Rng + ?Sized>(
    nav: &G,
    origin: GridCoord,
    config: &PlannerConfig,
    rng: &mut R,
) -> GridCoord {
    for &radius in &config.wander_radii {
        let r = radius as f32;
        for _ in 0..config.wander_attempts {
            let dx = ((rng.gen::<f32>() * 2.0 - 1.0) * r).floor() as i32;
            let dy = ((rng.gen::<f32>() * 2.0 - 1.0) * r).floor() as i32;
            let candidate = origin.offset(dx, dy);
            if nav.is_walkable(candidate.x, candidate.y) {
                return candidate;
            }
        }
    }
    GridCoord::new(nav.cols() / 2, nav.rows() / 2)
}
