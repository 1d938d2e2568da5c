//! ECS World - manages all entities and their components

use ahash::AHashSet;

use crate::core::types::EntityId;
use crate::ecs::store::ComponentStore;
use crate::entity::components::{Brain, Position, Velocity, Visual};
use crate::entity::needs::Needs;
use crate::entity::personality::Personality;

/// A component kind the world knows how to store
pub trait Component: Sized + 'static {
    /// Kind name used in logs
    const NAME: &'static str;

    fn store(world: &World) -> &ComponentStore<Self>;
    fn store_mut(world: &mut World) -> &mut ComponentStore<Self>;
}

macro_rules! component {
    ($ty:ty, $name:literal, $field:ident) => {
        impl Component for $ty {
            const NAME: &'static str = $name;

            #[inline]
            fn store(world: &World) -> &ComponentStore<Self> {
                &world.$field
            }

            #[inline]
            fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
                &mut world.$field
            }
        }
    };
}

/// The entity store
///
/// Tables are public so systems can borrow several kinds mutably at once.
/// Systems that mutate while walking a table iterate a [`World::snapshot`]
/// of its ids instead of a live view.
#[derive(Debug, Default)]
pub struct World {
    next_id: u32,
    live: AHashSet<EntityId>,
    pub positions: ComponentStore<Position>,
    pub velocities: ComponentStore<Velocity>,
    pub needs: ComponentStore<Needs>,
    pub brains: ComponentStore<Brain>,
    pub visuals: ComponentStore<Visual>,
    pub personalities: ComponentStore<Personality>,
}

component!(Position, "Position", positions);
component!(Velocity, "Velocity", velocities);
component!(Needs, "Needs", needs);
component!(Brain, "Brain", brains);
component!(Visual, "Visual", visuals);
component!(Personality, "Personality", personalities);

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh id; ids start at 1 and are never reused
    pub fn create_entity(&mut self) -> EntityId {
        self.next_id += 1;
        let entity = EntityId(self.next_id);
        self.live.insert(entity);
        entity
    }

    /// Insert or replace a component (last write wins)
    ///
    /// Ids that were never issued or have been despawned are refused and
    /// `false` is returned.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, data: T) -> bool {
        if !self.live.contains(&entity) {
            tracing::trace!("Dropped {} for dead entity {}", T::NAME, entity);
            return false;
        }
        if T::store_mut(self).insert(entity, data).is_some() {
            tracing::trace!("Replaced {} on entity {}", T::NAME, entity);
        }
        true
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        T::store(self).get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        T::store_mut(self).get_mut(entity)
    }

    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        T::store(self).contains(entity)
    }

    /// Every holder of `A`, in insertion order
    pub fn view<A: Component>(&self) -> impl Iterator<Item = (EntityId, &A)> + '_ {
        A::store(self).iter()
    }

    /// Every holder of `A`, paired with its `B` when it has one
    pub fn view2<A: Component, B: Component>(
        &self,
    ) -> impl Iterator<Item = (EntityId, &A, Option<&B>)> + '_ {
        let b = B::store(self);
        A::store(self).iter().map(move |(e, a)| (e, a, b.get(e)))
    }

    /// Holders of both `A` and `B`, in `A`'s insertion order
    pub fn join<A: Component, B: Component>(
        &self,
    ) -> impl Iterator<Item = (EntityId, &A, &B)> + '_ {
        self.view2::<A, B>()
            .filter_map(|(e, a, b)| b.map(|b| (e, a, b)))
    }

    /// Copy of the ids holding `A`, for passes that mutate the world
    pub fn snapshot<A: Component>(&self) -> Vec<EntityId> {
        A::store(self).entities().to_vec()
    }

    /// Remove an entity and all of its components
    ///
    /// Takes `&mut self`, so it can never run inside a view. The id is
    /// retired for good. Returns `false` for unknown or already removed ids.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.live.remove(&entity) {
            return false;
        }
        self.positions.remove(entity);
        self.velocities.remove(entity);
        self.needs.remove(entity);
        self.brains.remove(entity);
        self.visuals.remove(entity);
        self.personalities.remove(entity);
        tracing::debug!("Despawned entity {}", entity);
        true
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.live.contains(&entity)
    }

    pub fn entity_count(&self) -> usize {
        self.live.len()
    }
}
