//! Goal catalog and utility scores

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::PlannerConfig;
use crate::entity::needs::Needs;
use crate::entity::personality::Personality;

/// What an agent is currently pursuing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Goal {
    /// Not yet decided; never chosen by the planner
    #[default]
    Idle,
    Eat,
    Rest,
    Socialize,
    Explore,
    Hunt,
}

/// Inputs to goal scoring for one agent
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub needs: &'a Needs,
    pub personality: Option<&'a Personality>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(needs: &'a Needs) -> Self {
        Self {
            needs,
            personality: None,
        }
    }

    pub fn with_personality(mut self, personality: Option<&'a Personality>) -> Self {
        self.personality = personality;
        self
    }
}

/// Uniform sample in `[0, width)`; zero width yields exactly 0
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    if width > 0.0 {
        rng.gen::<f32>() * width
    } else {
        0.0
    }
}

impl Goal {
    /// Goals the planner scores by default, in evaluation order
    pub const CATALOG: [Goal; 5] = [
        Goal::Eat,
        Goal::Rest,
        Goal::Socialize,
        Goal::Explore,
        Goal::Hunt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Eat => "Eat",
            Self::Rest => "Rest",
            Self::Socialize => "Socialize",
            Self::Explore => "Explore",
            Self::Hunt => "Hunt",
        }
    }

    /// Utility of this goal before planner jitter
    ///
    /// Each score is a monotonic transform of a single need. Hunt ignores
    /// needs and personality: a low constant plus its own random spread.
    pub fn score<R: Rng + ?Sized>(
        &self,
        ctx: &ScoringContext,
        config: &PlannerConfig,
        rng: &mut R,
    ) -> f32 {
        let n = ctx.needs.normalized();
        let weights = ctx.personality.copied().unwrap_or(Personality::NEUTRAL);
        match self {
            Self::Idle => f32::NEG_INFINITY,
            Self::Eat => n.hunger * config.eat_weight,
            Self::Rest => (1.0 - n.energy) * weights.energy,
            Self::Socialize => (1.0 - n.social) * weights.social,
            Self::Explore => n.curiosity * config.explore_weight * weights.curiosity,
            Self::Hunt => config.hunt_base + uniform(rng, config.hunt_spread),
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
