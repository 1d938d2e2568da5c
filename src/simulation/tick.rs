//! Tick system - orchestrates simulation updates
//!
//! Each call to [`Simulation::update`] runs, in order:
//! needs -> decision -> interaction -> movement -> visual easing
//!
//! Decisions are throttled by their own accumulator; every other system
//! runs on every tick with the tick's `dt`.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Tick, Vec2};
use crate::ecs::world::World;
use crate::planner::{Goal, Planner};
use crate::simulation::decision::DecisionSystem;
use crate::simulation::interaction::ContactTracker;
use crate::simulation::movement::{ease_visuals, update_movement};
use crate::simulation::needs::update_needs;
use crate::simulation::snapshot::{self, AgentSnapshot};
use crate::simulation::spawn;
use crate::spatial::nav::NavGrid;

/// Events generated during a simulation tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    /// An agent switched to a new goal
    GoalChosen { entity: EntityId, goal: Goal, tick: Tick },
    /// An agent walked the last waypoint of its route
    TargetReached { entity: EntityId, tick: Tick },
    /// A route was requested but no path exists
    PathNotFound { entity: EntityId, tick: Tick },
    /// Two agents came within interaction range
    Met { a: EntityId, b: EntityId, tick: Tick },
}

/// A world of agents on a navigable tile grid
pub struct Simulation<G: NavGrid> {
    world: World,
    nav: G,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    decision: DecisionSystem,
    contacts: ContactTracker,
    tick: Tick,
    elapsed_ms: f64,
}

impl<G: NavGrid> Simulation<G> {
    /// Build a simulation; seeded from `config.seed` when set
    pub fn new(nav: G, config: SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(nav, config, rng)
    }

    /// Build a simulation around an explicit generator
    pub fn with_rng(nav: G, config: SimulationConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let planner = Planner::new(config.planner.clone());
        let decision = DecisionSystem::new(planner, &config.decision);
        tracing::info!(
            "Simulation ready: {}x{} tiles of {} units, seed {:?}",
            nav.cols(),
            nav.rows(),
            nav.tile_size(),
            config.seed
        );
        Ok(Self {
            world: World::new(),
            nav,
            config,
            rng,
            decision,
            contacts: ContactTracker::new(),
            tick: 0,
            elapsed_ms: 0.0,
        })
    }

    /// Swap the goal planner, e.g. to restrict or extend the catalog
    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.decision = DecisionSystem::new(planner, &self.config.decision);
        self
    }

    /// Advance the simulation by `dt_ms` milliseconds
    ///
    /// Negative or NaN `dt` is treated as zero.
    pub fn update(&mut self, dt_ms: f32) -> Vec<SimEvent> {
        let dt = dt_ms.max(0.0);
        let mut events = Vec::new();

        update_needs(&mut self.world, &self.nav, dt, &self.config.needs);
        self.decision.update(
            &mut self.world,
            &self.nav,
            &self.config.pathfinding,
            dt,
            self.tick,
            &mut self.rng,
            &mut events,
        );
        self.contacts.update(
            &mut self.world,
            dt,
            &self.config.interaction,
            &self.config.needs,
            self.tick,
            &mut events,
        );
        update_movement(
            &mut self.world,
            &self.nav,
            dt,
            &self.config.movement,
            self.tick,
            &mut events,
        );
        ease_visuals(&mut self.world, self.config.movement.easing);

        tracing::trace!("Tick {} done with {} events", self.tick, events.len());
        self.tick += 1;
        self.elapsed_ms += f64::from(dt);
        events
    }

    /// Spawn an agent at a world position
    pub fn spawn_agent(&mut self, at: Vec2) -> EntityId {
        spawn::spawn_agent(&mut self.world, at, &self.config.spawn, &mut self.rng)
    }

    /// Spawn an agent at the centre of a tile
    pub fn spawn_agent_on_tile(&mut self, x: i32, y: i32) -> EntityId {
        let at = self.nav.tile_center((x, y).into());
        self.spawn_agent(at)
    }

    /// Spawn an agent on a random walkable tile
    pub fn spawn_random(&mut self) -> Option<EntityId> {
        spawn::spawn_random(&mut self.world, &self.nav, &self.config.spawn, &mut self.rng)
    }

    /// Current state of every agent
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        snapshot::capture(&self.world, self.nav.tile_size())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn nav(&self) -> &G {
        &self.nav
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn planner(&self) -> &Planner {
        self.decision.planner()
    }

    /// Ticks run so far
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}
