//! Personality weights that bias goal scores per agent

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Multipliers applied to goal scores
///
/// Explore uses `curiosity`, Socialize `social`, Rest `energy`.
/// `safety` and `aggression` are carried for hosts that extend the goal
/// catalog; the built-in Hunt goal stays weight-free.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub curiosity: f32,
    pub safety: f32,
    pub social: f32,
    pub aggression: f32,
    pub energy: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl Personality {
    pub const NEUTRAL: Self = Self {
        curiosity: 1.0,
        safety: 1.0,
        social: 1.0,
        aggression: 1.0,
        energy: 1.0,
    };

    pub const DUCK: Self = Self {
        curiosity: 1.2,
        safety: 1.5,
        social: 0.8,
        aggression: 0.3,
        energy: 1.0,
    };

    pub const AMOEBA: Self = Self {
        curiosity: 0.6,
        safety: 0.8,
        social: 1.3,
        aggression: 0.2,
        energy: 1.4,
    };

    pub const WANDERER: Self = Self {
        curiosity: 1.4,
        safety: 0.7,
        social: 1.6,
        aggression: 0.1,
        energy: 0.9,
    };

    pub const STALKER: Self = Self {
        curiosity: 0.8,
        safety: 1.1,
        social: 0.4,
        aggression: 1.8,
        energy: 1.2,
    };

    pub const GRASS: Self = Self {
        curiosity: 0.3,
        safety: 1.0,
        social: 0.5,
        aggression: 0.0,
        energy: 1.6,
    };

    /// Archetype by name (case-insensitive); unknown names fall back to Duck
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "duck" => Self::DUCK,
            "amoeba" => Self::AMOEBA,
            "wanderer" => Self::WANDERER,
            "stalker" => Self::STALKER,
            "grass" => Self::GRASS,
            _ => Self::DUCK,
        }
    }

    /// Every weight drawn from `[0.5, 1.5)`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            curiosity: rng.gen_range(0.5..1.5),
            safety: rng.gen_range(0.5..1.5),
            social: rng.gen_range(0.5..1.5),
            aggression: rng.gen_range(0.5..1.5),
            energy: rng.gen_range(0.5..1.5),
        }
    }
}
