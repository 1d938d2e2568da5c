//! Utility planner: score every goal, add a little jitter, take the best
//!
//! Randomness is always passed in, so a seeded generator makes a decision
//! pass fully reproducible.

pub mod actions;
pub mod goals;

pub use actions::{Action, ActionContext, RouteOutcome};
pub use goals::{Goal, ScoringContext};

use rand::Rng;

use crate::core::config::PlannerConfig;
use goals::uniform;

/// Goal selector over a configurable catalog
#[derive(Debug, Clone)]
pub struct Planner {
    goals: Vec<Goal>,
    config: PlannerConfig,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    /// Planner over the full built-in catalog
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            goals: Goal::CATALOG.to_vec(),
            config,
        }
    }

    /// Replace the catalog of goals considered
    pub fn with_goals(mut self, goals: impl IntoIterator<Item = Goal>) -> Self {
        self.goals = goals.into_iter().filter(|g| *g != Goal::Idle).collect();
        self
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Every catalog goal with its jittered score, in catalog order
    pub fn score_all<R: Rng + ?Sized>(
        &self,
        ctx: &ScoringContext,
        rng: &mut R,
    ) -> Vec<(Goal, f32)> {
        self.goals
            .iter()
            .map(|goal| {
                let score = goal.score(ctx, &self.config, rng) + uniform(rng, self.config.jitter);
                (*goal, score)
            })
            .collect()
    }

    /// Highest-scoring goal; `Idle` when the catalog is empty
    ///
    /// On an exact tie the earlier catalog entry is kept; in practice ties
    /// are broken by the jitter.
    pub fn choose_goal<R: Rng + ?Sized>(&self, ctx: &ScoringContext, rng: &mut R) -> Goal {
        let mut best = Goal::Idle;
        let mut best_score = f32::NEG_INFINITY;
        for (goal, score) in self.score_all(ctx, rng) {
            if score > best_score {
                best = goal;
                best_score = score;
            }
        }
        best
    }
}
