//! Needs that drive agent behaviour
//!
//! Every need is a scalar in `[floor, ceiling]` (default `[0, 100]`).
//! Hunger grows over time; the other four are satisfactions that drain.

use serde::{Deserialize, Serialize};

use crate::core::config::NeedsConfig;
use crate::spatial::nav::Terrain;

/// The five drives of an agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    /// 0 = sated, 100 = starving
    pub hunger: f32,
    /// 0 = exhausted, 100 = fully rested
    pub energy: f32,
    /// 0 = lonely, 100 = socially satisfied
    pub social: f32,
    /// 0 = terrified, 100 = safe
    pub safety: f32,
    /// 0 = bored of the surroundings, 100 = eager to explore
    pub curiosity: f32,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            hunger: 50.0,
            energy: 70.0,
            social: 50.0,
            safety: 60.0,
            curiosity: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedKind {
    Hunger,
    Energy,
    Social,
    Safety,
    Curiosity,
}

impl NeedKind {
    pub const ALL: [NeedKind; 5] = [
        NeedKind::Hunger,
        NeedKind::Energy,
        NeedKind::Social,
        NeedKind::Safety,
        NeedKind::Curiosity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hunger => "hunger",
            Self::Energy => "energy",
            Self::Social => "social",
            Self::Safety => "safety",
            Self::Curiosity => "curiosity",
        }
    }
}

/// One number per need: drift rates, losses or floors
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedRates {
    pub hunger: f32,
    pub energy: f32,
    pub social: f32,
    pub safety: f32,
    pub curiosity: f32,
}

impl NeedRates {
    pub const fn zero() -> Self {
        Self {
            hunger: 0.0,
            energy: 0.0,
            social: 0.0,
            safety: 0.0,
            curiosity: 0.0,
        }
    }

    pub fn get(&self, kind: NeedKind) -> f32 {
        match kind {
            NeedKind::Hunger => self.hunger,
            NeedKind::Energy => self.energy,
            NeedKind::Social => self.social,
            NeedKind::Safety => self.safety,
            NeedKind::Curiosity => self.curiosity,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NeedKind, f32)> + '_ {
        NeedKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// How needs change with time
///
/// Exactly one policy is active per simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayPolicy {
    /// Linear drift proportional to `dt`, independent of location
    #[default]
    Drift,
    /// Fixed per-100ms loss plus recovery from the tile underfoot
    TerrainModulated,
}

impl Needs {
    pub fn get(&self, kind: NeedKind) -> f32 {
        match kind {
            NeedKind::Hunger => self.hunger,
            NeedKind::Energy => self.energy,
            NeedKind::Social => self.social,
            NeedKind::Safety => self.safety,
            NeedKind::Curiosity => self.curiosity,
        }
    }

    pub fn get_mut(&mut self, kind: NeedKind) -> &mut f32 {
        match kind {
            NeedKind::Hunger => &mut self.hunger,
            NeedKind::Energy => &mut self.energy,
            NeedKind::Social => &mut self.social,
            NeedKind::Safety => &mut self.safety,
            NeedKind::Curiosity => &mut self.curiosity,
        }
    }

    /// Add `delta` to a need and clamp it to its bounds
    pub fn adjust(&mut self, kind: NeedKind, delta: f32, config: &NeedsConfig) {
        let floor = config.floors.get(kind);
        let value = self.get_mut(kind);
        *value = (*value + delta).clamp(floor, config.ceiling.max(floor));
    }

    /// Normalised copy (every value divided by 100)
    pub fn normalized(&self) -> Needs {
        Needs {
            hunger: self.hunger / 100.0,
            energy: self.energy / 100.0,
            social: self.social / 100.0,
            safety: self.safety / 100.0,
            curiosity: self.curiosity / 100.0,
        }
    }

    /// Passive drift: `value + dt * drift_scale * rate`, clamped
    pub fn drift(&mut self, dt_ms: f32, config: &NeedsConfig) {
        let scaled = dt_ms * config.drift_scale;
        for (kind, rate) in config.drift_rates.iter() {
            self.adjust(kind, scaled * rate, config);
        }
    }

    /// Terrain-modulated decay
    ///
    /// Losses and gains are expressed per 100ms. Tiles without terrain
    /// information only apply the loss.
    pub fn terrain_decay(&mut self, dt_ms: f32, terrain: Option<Terrain>, config: &NeedsConfig) {
        let steps = dt_ms / 100.0;
        for (kind, loss) in config.terrain_loss.iter() {
            self.adjust(kind, -loss * steps, config);
        }

        match terrain {
            Some(Terrain::Grass) => {
                self.adjust(NeedKind::Energy, config.grass_energy_gain * steps, config)
            }
            Some(Terrain::Forest) => {
                self.adjust(NeedKind::Safety, config.forest_safety_gain * steps, config)
            }
            _ => {}
        }
    }

    /// Most pressing need, reading hunger as-is and the others inverted
    pub fn most_pressing(&self) -> (NeedKind, f32) {
        NeedKind::ALL
            .into_iter()
            .map(|kind| {
                let pressure = match kind {
                    NeedKind::Hunger => self.hunger,
                    _ => 100.0 - self.get(kind),
                };
                (kind, pressure)
            })
            .fold((NeedKind::Hunger, f32::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 { cur } else { best }
            })
    }
}
