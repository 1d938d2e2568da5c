//! Interaction system: proximity-driven social gain
//!
//! Every pair of agents is compared each tick. This is quadratic in the
//! agent count and fine for the few hundred agents a tile map holds.
// TODO: bucket positions by tile once populations outgrow the pairwise scan

use ahash::AHashSet;

use crate::core::config::{InteractionConfig, NeedsConfig};
use crate::core::types::{EntityId, Tick, Vec2};
use crate::ecs::world::World;
use crate::entity::components::Position;
use crate::entity::needs::{NeedKind, Needs};
use crate::simulation::tick::SimEvent;

/// Unordered pair key, smaller id first
fn pair(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pairs currently within interaction range
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    contacts: AHashSet<(EntityId, EntityId)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_contact(&self, a: EntityId, b: EntityId) -> bool {
        self.contacts.contains(&pair(a, b))
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Run one interaction pass
    ///
    /// Both members of every pair closer than `radius` gain
    /// `dt * social_gain_per_ms` social, clamped to the ceiling. A `Met`
    /// event is emitted on the first tick a pair comes into range.
    pub fn update(
        &mut self,
        world: &mut World,
        dt_ms: f32,
        config: &InteractionConfig,
        needs_config: &NeedsConfig,
        tick: Tick,
        events: &mut Vec<SimEvent>,
    ) {
        let agents: Vec<(EntityId, Vec2)> = world
            .join::<Position, Needs>()
            .map(|(e, p, _)| (e, p.as_vec2()))
            .collect();
        let gain = dt_ms * config.social_gain_per_ms;

        let mut now = AHashSet::new();
        for (i, (a, pa)) in agents.iter().enumerate() {
            for (b, pb) in &agents[i + 1..] {
                if pa.distance(pb) >= config.radius {
                    continue;
                }
                let key = pair(*a, *b);
                if !self.contacts.contains(&key) {
                    tracing::debug!("Entities {} and {} met", key.0, key.1);
                    events.push(SimEvent::Met {
                        a: key.0,
                        b: key.1,
                        tick,
                    });
                }
                now.insert(key);

                for e in [*a, *b] {
                    if let Some(needs) = world.needs.get_mut(e) {
                        needs.adjust(NeedKind::Social, gain, needs_config);
                    }
                }
            }
        }
        self.contacts = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(world: &mut World, x: f32, y: f32, social: f32) -> EntityId {
        let e = world.create_entity();
        world.add_component(e, Position::new(x, y));
        world.add_component(
            e,
            Needs {
                social,
                ..Needs::default()
            },
        );
        e
    }

    fn step(
        tracker: &mut ContactTracker,
        world: &mut World,
        dt_ms: f32,
        tick: Tick,
    ) -> Vec<SimEvent> {
        let mut events = Vec::new();
        tracker.update(
            world,
            dt_ms,
            &InteractionConfig::default(),
            &NeedsConfig::default(),
            tick,
            &mut events,
        );
        events
    }

    #[test]
    fn test_close_pair_gains_social() {
        let mut world = World::new();
        let a = agent(&mut world, 0.0, 0.0, 40.0);
        let b = agent(&mut world, 20.0, 0.0, 60.0);
        let far = agent(&mut world, 200.0, 0.0, 40.0);
        let mut tracker = ContactTracker::new();

        step(&mut tracker, &mut world, 100.0, 0);

        assert_eq!(world.get::<Needs>(a).unwrap().social, 45.0);
        assert_eq!(world.get::<Needs>(b).unwrap().social, 65.0);
        assert_eq!(world.get::<Needs>(far).unwrap().social, 40.0);
    }

    #[test]
    fn test_radius_is_exclusive() {
        let mut world = World::new();
        let a = agent(&mut world, 0.0, 0.0, 40.0);
        agent(&mut world, 30.0, 0.0, 40.0);
        let mut tracker = ContactTracker::new();

        let events = step(&mut tracker, &mut world, 100.0, 0);

        assert!(events.is_empty());
        assert_eq!(world.get::<Needs>(a).unwrap().social, 40.0);
    }

    #[test]
    fn test_social_capped_at_ceiling() {
        let mut world = World::new();
        let a = agent(&mut world, 0.0, 0.0, 99.0);
        agent(&mut world, 1.0, 1.0, 99.0);
        let mut tracker = ContactTracker::new();

        step(&mut tracker, &mut world, 1000.0, 0);

        assert_eq!(world.get::<Needs>(a).unwrap().social, 100.0);
    }

    #[test]
    fn test_met_emitted_once_per_encounter() {
        let mut world = World::new();
        let a = agent(&mut world, 0.0, 0.0, 40.0);
        let b = agent(&mut world, 10.0, 0.0, 40.0);
        let mut tracker = ContactTracker::new();

        let first = step(&mut tracker, &mut world, 100.0, 1);
        let second = step(&mut tracker, &mut world, 100.0, 2);

        assert_eq!(first, vec![SimEvent::Met { a, b, tick: 1 }]);
        assert!(second.is_empty());
        assert!(tracker.in_contact(b, a));

        // Separate, then meet again
        world.get_mut::<Position>(b).unwrap().x = 100.0;
        step(&mut tracker, &mut world, 100.0, 3);
        assert!(tracker.is_empty());
        world.get_mut::<Position>(b).unwrap().x = 10.0;
        let again = step(&mut tracker, &mut world, 100.0, 4);
        assert_eq!(again, vec![SimEvent::Met { a, b, tick: 4 }]);
    }

    #[test]
    fn test_agents_without_needs_are_ignored() {
        let mut world = World::new();
        let a = agent(&mut world, 0.0, 0.0, 40.0);
        let ghost = world.create_entity();
        world.add_component(ghost, Position::new(1.0, 0.0));
        let mut tracker = ContactTracker::new();

        let events = step(&mut tracker, &mut world, 100.0, 0);

        assert!(events.is_empty());
        assert_eq!(world.get::<Needs>(a).unwrap().social, 40.0);
    }
}
