//! Simulation configuration with documented constants
//!
//! Every tunable number of the pipeline lives here. All sections carry
//! `#[serde(default)]`, so a TOML file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::entity::needs::{DecayPolicy, NeedRates};
use crate::pathfinding::astar::Heuristic;

/// Top-level configuration for a [`Simulation`](crate::simulation::tick::Simulation)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the pipeline RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub needs: NeedsConfig,
    pub planner: PlannerConfig,
    pub decision: DecisionConfig,
    pub movement: MovementConfig,
    pub interaction: InteractionConfig,
    pub pathfinding: PathfindingConfig,
    pub spawn: SpawnConfig,
}

// === NEED SYSTEM ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    /// Which decay policy the pipeline applies to every agent
    pub policy: DecayPolicy,

    /// Drift policy: multiplier applied to `dt` (ms) before the per-need rate
    ///
    /// At 0.01 and a hunger rate of 1.2, hunger climbs 1.2 points per second.
    pub drift_scale: f32,

    /// Drift policy: signed per-need rates (positive grows, negative shrinks)
    pub drift_rates: NeedRates,

    /// Terrain policy: loss per 100ms for every need
    pub terrain_loss: NeedRates,

    /// Terrain policy: energy regained per 100ms while standing on grass
    pub grass_energy_gain: f32,

    /// Terrain policy: safety regained per 100ms while standing in forest
    pub forest_safety_gain: f32,

    /// Lower bound per need. Safety keeps a non-zero floor by default.
    pub floors: NeedRates,

    /// Upper bound shared by all needs
    pub ceiling: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            policy: DecayPolicy::Drift,
            drift_scale: 0.01,
            drift_rates: NeedRates {
                hunger: 1.2,
                energy: -0.8,
                social: -0.6,
                safety: -0.3,
                curiosity: -0.4,
            },
            terrain_loss: NeedRates {
                hunger: 0.1,
                energy: 0.05,
                social: 0.03,
                safety: 0.02,
                curiosity: 0.04,
            },
            grass_energy_gain: 0.1,
            forest_safety_gain: 0.1,
            floors: NeedRates {
                safety: 20.0,
                ..NeedRates::zero()
            },
            ceiling: 100.0,
        }
    }
}

// === UTILITY PLANNER ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Upper bound of the uniform jitter added to every goal score
    ///
    /// Small enough never to override a clear preference, large enough to
    /// break ties between agents with identical needs.
    pub jitter: f32,

    /// Constant part of the Hunt score
    pub hunt_base: f32,

    /// Width of the uniform random part of the Hunt score
    pub hunt_spread: f32,

    /// Weight on normalised hunger for the Eat goal
    pub eat_weight: f32,

    /// Weight on normalised curiosity for the Explore goal
    pub explore_weight: f32,

    /// Cooldown set by Rest, in milliseconds of decision time
    pub rest_cooldown_ms: f32,

    /// Radii (tiles) sampled in order when picking a wander destination
    pub wander_radii: Vec<i32>,

    /// Samples drawn per radius before widening
    pub wander_attempts: u32,

    /// How far (world units) Socialize looks for a companion
    pub socialize_range: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            jitter: 0.03,
            hunt_base: 0.2,
            hunt_spread: 0.1,
            eat_weight: 1.4,
            explore_weight: 1.1,
            rest_cooldown_ms: 1000.0,
            wander_radii: vec![4, 8, 12, 16],
            wander_attempts: 40,
            socialize_range: 160.0,
        }
    }
}

// === DECISION CADENCE ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Decision pass period in milliseconds (200 = 5 Hz)
    pub interval_ms: f32,

    /// Keep the overshoot past `interval_ms` instead of resetting to zero
    pub carry_remainder: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200.0,
            carry_remainder: false,
        }
    }
}

// === MOVEMENT ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distance (world units) under which a target counts as reached
    pub arrive_epsilon: f32,

    /// Velocity multiplier applied each pass when there is no target
    pub drag: f32,

    /// Fraction of the remaining gap a visual closes each pass
    pub easing: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            arrive_epsilon: 2.0,
            drag: 0.9,
            easing: 0.2,
        }
    }
}

// === INTERACTION ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pairs closer than this (world units) interact
    pub radius: f32,

    /// Social gained per millisecond of contact
    pub social_gain_per_ms: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            social_gain_per_ms: 0.05,
        }
    }
}

// === PATHFINDING ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Node expansions before a search gives up
    pub max_iterations: usize,
    pub heuristic: Heuristic,
    pub allow_diagonal: bool,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            heuristic: Heuristic::Manhattan,
            allow_diagonal: true,
        }
    }
}

// === SPAWNING ===

/// Inclusive-exclusive ranges for freshly spawned agents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub hunger: [f32; 2],
    pub energy: [f32; 2],
    pub social: [f32; 2],
    pub safety: [f32; 2],
    pub curiosity: [f32; 2],
    pub speed: [f32; 2],
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            hunger: [30.0, 70.0],
            energy: [50.0, 90.0],
            social: [40.0, 70.0],
            safety: [60.0, 60.0],
            curiosity: [50.0, 90.0],
            speed: [60.0, 90.0],
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.decision.interval_ms > 0.0) {
            return Err(SimError::Config(format!(
                "decision.interval_ms ({}) must be positive",
                self.decision.interval_ms
            )));
        }

        for (kind, floor) in self.needs.floors.iter() {
            if !(0.0..=self.needs.ceiling).contains(&floor) {
                return Err(SimError::Config(format!(
                    "needs.floors.{} ({}) must lie in [0, ceiling={}]",
                    kind.name(),
                    floor,
                    self.needs.ceiling
                )));
            }
        }

        if !(self.needs.drift_scale >= 0.0) {
            return Err("needs.drift_scale must be >= 0".into());
        }

        if !(self.planner.jitter >= 0.0 && self.planner.hunt_spread >= 0.0) {
            return Err("planner.jitter and planner.hunt_spread must be >= 0".into());
        }

        if self.planner.wander_radii.iter().any(|&r| r <= 0) {
            return Err("planner.wander_radii must all be positive".into());
        }

        if !(self.interaction.radius > 0.0) {
            return Err("interaction.radius must be positive".into());
        }

        if !(self.interaction.social_gain_per_ms >= 0.0) {
            return Err("interaction.social_gain_per_ms must be >= 0".into());
        }

        if !(self.movement.arrive_epsilon >= 0.0) {
            return Err("movement.arrive_epsilon must be >= 0".into());
        }

        let unit = 0.0..=1.0;
        if !unit.contains(&self.movement.drag) || !unit.contains(&self.movement.easing) {
            return Err("movement.drag and movement.easing must lie in [0, 1]".into());
        }

        if self.pathfinding.max_iterations == 0 {
            return Err("pathfinding.max_iterations must be at least 1".into());
        }

        let spawn = &self.spawn;
        for (name, [lo, hi]) in [
            ("hunger", spawn.hunger),
            ("energy", spawn.energy),
            ("social", spawn.social),
            ("safety", spawn.safety),
            ("curiosity", spawn.curiosity),
            ("speed", spawn.speed),
        ] {
            if lo > hi {
                return Err(SimError::Config(format!(
                    "spawn.{} range is inverted ({} > {})",
                    name, lo, hi
                )));
            }
        }

        Ok(())
    }
}
