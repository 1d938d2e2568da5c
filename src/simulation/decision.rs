//! Decision system: throttled goal selection
//!
//! Time is accumulated across updates and a decision pass runs once the
//! configured interval has elapsed. A single update never runs more than
//! one pass, however large its `dt`.

use rand::Rng;

use crate::core::config::{DecisionConfig, PathfindingConfig};
use crate::core::types::{EntityId, Tick};
use crate::ecs::world::World;
use crate::entity::components::Brain;
use crate::planner::{ActionContext, Planner, RouteOutcome, ScoringContext};
use crate::simulation::tick::SimEvent;
use crate::spatial::nav::NavGrid;

/// Accumulator plus the planner it drives
#[derive(Debug, Clone)]
pub struct DecisionSystem {
    planner: Planner,
    interval_ms: f32,
    carry_remainder: bool,
    accumulator: f32,
}

impl Default for DecisionSystem {
    fn default() -> Self {
        Self::new(Planner::default(), &DecisionConfig::default())
    }
}

impl DecisionSystem {
    pub fn new(planner: Planner, config: &DecisionConfig) -> Self {
        Self {
            planner,
            interval_ms: config.interval_ms,
            carry_remainder: config.carry_remainder,
            accumulator: 0.0,
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Time banked toward the next pass
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Advance the accumulator and run a pass if one is due
    ///
    /// Returns whether a pass ran.
    #[allow(clippy::too_many_arguments)]
    pub fn update<G: NavGrid + ?Sized, R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        nav: &G,
        pathfinding: &PathfindingConfig,
        dt_ms: f32,
        tick: Tick,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        self.accumulator += dt_ms;
        if self.accumulator < self.interval_ms {
            return false;
        }

        if self.carry_remainder {
            self.accumulator -= self.interval_ms;
        } else {
            self.accumulator = 0.0;
        }

        for entity in world.snapshot::<Brain>() {
            self.decide(world, nav, pathfinding, entity, tick, rng, events);
        }
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn decide<G: NavGrid + ?Sized, R: Rng + ?Sized>(
        &self,
        world: &mut World,
        nav: &G,
        pathfinding: &PathfindingConfig,
        entity: EntityId,
        tick: Tick,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) {
        let Some(brain) = world.brains.get_mut(entity) else {
            return;
        };
        if brain.is_cooling_down() {
            brain.cooldown_ms -= self.interval_ms;
            return;
        }
        let previous = brain.goal;

        if !world.positions.contains(entity) {
            tracing::trace!("Entity {} has no position, skipping decision", entity);
            return;
        }
        let Some(needs) = world.needs.get(entity) else {
            tracing::trace!("Entity {} has no needs, skipping decision", entity);
            return;
        };
        let ctx = ScoringContext::new(needs).with_personality(world.personalities.get(entity));
        let goal = self.planner.choose_goal(&ctx, rng);

        let mut action = ActionContext {
            world: &mut *world,
            nav,
            entity,
            planner: self.planner.config(),
            pathfinding,
        };
        let mut unreachable = action.run(goal, rng) == RouteOutcome::Unreachable;

        // Safety net: nobody stands still without a reason
        let stalled = action
            .world
            .brains
            .get(entity)
            .map_or(false, |b| b.target.is_none() && !b.is_cooling_down());
        if stalled {
            unreachable |= action.wander(rng) == RouteOutcome::Unreachable;
        }

        if unreachable {
            events.push(SimEvent::PathNotFound { entity, tick });
        }
        if goal != previous {
            tracing::debug!("Entity {} switched goal {} -> {}", entity, previous, goal);
            events.push(SimEvent::GoalChosen { entity, goal, tick });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PlannerConfig;
    use crate::core::types::Vec2;
    use crate::entity::components::Position;
    use crate::entity::needs::Needs;
    use crate::planner::{Action, Goal};
    use crate::spatial::nav::NavWorld;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet_planner() -> Planner {
        Planner::new(PlannerConfig {
            jitter: 0.0,
            hunt_spread: 0.0,
            ..PlannerConfig::default()
        })
    }

    fn hungry() -> Needs {
        Needs {
            hunger: 95.0,
            energy: 90.0,
            social: 90.0,
            safety: 60.0,
            curiosity: 10.0,
        }
    }

    fn agent(world: &mut World, needs: Option<Needs>) -> EntityId {
        let e = world.create_entity();
        world.add_component(e, Position::new(10.0 * 16.0 + 8.0, 10.0 * 16.0 + 8.0));
        world.add_component(e, Brain::default());
        if let Some(needs) = needs {
            world.add_component(e, needs);
        }
        e
    }

    fn run(
        system: &mut DecisionSystem,
        world: &mut World,
        nav: &NavWorld,
        dt_ms: f32,
        rng: &mut ChaCha8Rng,
    ) -> (bool, Vec<SimEvent>) {
        let mut events = Vec::new();
        let fired = system.update(
            world,
            nav,
            &PathfindingConfig::default(),
            dt_ms,
            0,
            rng,
            &mut events,
        );
        (fired, events)
    }

    #[test]
    fn test_fires_once_interval_elapses() {
        let nav = NavWorld::open(20, 20, 16.0).unwrap();
        let mut world = World::new();
        let mut system = DecisionSystem::new(quiet_planner(), &DecisionConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(!run(&mut system, &mut world, &nav, 100.0, &mut rng).0);
        assert_eq!(system.accumulator(), 100.0);
        assert!(run(&mut system, &mut world, &nav, 100.0, &mut rng).0);
        assert_eq!(system.accumulator(), 0.0);
    }

    #[test]
    fn test_remainder_dropped_by_default() {
        let nav = NavWorld::open(20, 20, 16.0).unwrap();
        let mut world = World::new();
        let mut system = DecisionSystem::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(run(&mut system, &mut world, &nav, 1000.0, &mut rng).0);
        assert_eq!(system.accumulator(), 0.0);
        assert!(!run(&mut system, &mut world, &nav, 0.0, &mut rng).0);
    }

    #[test]
    fn test_carry_remainder_keeps_residual() {
        let nav = NavWorld::open(20, 20, 16.0).unwrap();
        let mut world = World::new();
        let config = DecisionConfig {
            carry_remainder: true,
            ..DecisionConfig::default()
        };
        let mut system = DecisionSystem::new(Planner::default(), &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(run(&mut system, &mut world, &nav, 250.0, &mut rng).0);
        assert_eq!(system.accumulator(), 50.0);
        assert!(run(&mut system, &mut world, &nav, 150.0, &mut rng).0);
        assert_eq!(system.accumulator(), 0.0);
    }

    #[test]
    fn test_cooldown_skips_and_decrements() {
        let nav = NavWorld::open(20, 20, 16.0).unwrap();
        let mut world = World::new();
        let e = agent(&mut world, Some(hungry()));
        world.get_mut::<Brain>(e).unwrap().cooldown_ms = 1000.0;
        let mut system = DecisionSystem::new(quiet_planner(), &DecisionConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let (_, events) = run(&mut system, &mut world, &nav, 200.0, &mut rng);

        let brain = world.get::<Brain>(e).unwrap();
        assert_eq!(brain.cooldown_ms, 800.0);
        assert_eq!(brain.goal, Goal::Idle);
        assert!(events.is_empty());
    }

    #[test]
    fn test_agent_without_needs_is_skipped() {
        let nav = NavWorld::open(20, 20, 16.0).unwrap();
        let mut world = World::new();
        let e = agent(&mut world, None);
        let mut system = DecisionSystem::new(quiet_planner(), &DecisionConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let (fired, events) = run(&mut system, &mut world, &nav, 200.0, &mut rng);

        assert!(fired);
        assert!(events.is_empty());
        assert_eq!(world.get::<Brain>(e).unwrap(), &Brain::default());
    }

    #[test]
    fn test_stationary_goal_falls_back_to_wander() {
        let nav = NavWorld::open(20, 20, 16.0).unwrap();
        let mut world = World::new();
        let e = agent(&mut world, Some(hungry()));
        let mut system = DecisionSystem::new(quiet_planner(), &DecisionConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let (_, events) = run(&mut system, &mut world, &nav, 200.0, &mut rng);

        let brain = world.get::<Brain>(e).unwrap();
        assert_eq!(brain.goal, Goal::Eat);
        assert_eq!(brain.action, Action::Wander);
        assert!(brain.target.is_some());
        assert!(events.contains(&SimEvent::GoalChosen {
            entity: e,
            goal: Goal::Eat,
            tick: 0
        }));
    }

    #[test]
    fn test_rest_is_not_overridden_by_wander() {
        let nav = NavWorld::open(20, 20, 16.0).unwrap();
        let mut world = World::new();
        let tired = Needs {
            hunger: 10.0,
            energy: 5.0,
            ..hungry()
        };
        let e = agent(&mut world, Some(tired));
        let mut system = DecisionSystem::new(quiet_planner(), &DecisionConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        run(&mut system, &mut world, &nav, 200.0, &mut rng);

        let brain = world.get::<Brain>(e).unwrap();
        assert_eq!(brain.goal, Goal::Rest);
        assert_eq!(brain.action, Action::Rest);
        assert!(brain.target.is_none());
        assert_eq!(brain.cooldown_ms, 1000.0);
    }

    #[test]
    fn test_boxed_in_agent_targets_own_tile() {
        let mut nav = NavWorld::from_arrays(20, 20, 16.0, vec![false; 400], None).unwrap();
        nav.set_walkable(10, 10, true);
        let mut world = World::new();
        let e = agent(&mut world, Some(hungry()));
        let mut system = DecisionSystem::new(quiet_planner(), &DecisionConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        let (_, events) = run(&mut system, &mut world, &nav, 200.0, &mut rng);

        // Its own tile is the only walkable one
        let brain = world.get::<Brain>(e).unwrap();
        assert_eq!(brain.target, Some(Vec2::new(168.0, 168.0)));
        assert!(!events.contains(&SimEvent::PathNotFound { entity: e, tick: 0 }));
    }
}
