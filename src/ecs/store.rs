//! Dense, insertion-ordered storage for one component kind

use ahash::AHashMap;

use crate::core::types::EntityId;

/// Component table keyed by entity
///
/// Iteration follows first-insertion order. Replacing an entity's
/// component keeps its slot; removal shifts later entries down so the
/// remaining order is preserved.
#[derive(Debug, Clone)]
pub struct ComponentStore<T> {
    entities: Vec<EntityId>,
    data: Vec<T>,
    index: AHashMap<EntityId, usize>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            data: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Insert or replace; returns the previous value if there was one
    pub fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        if let Some(&slot) = self.index.get(&entity) {
            return Some(std::mem::replace(&mut self.data[slot], value));
        }
        self.index.insert(entity, self.entities.len());
        self.entities.push(entity);
        self.data.push(value);
        None
    }

    #[inline]
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.index.get(&entity).map(|&slot| &self.data[slot])
    }

    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        match self.index.get(&entity) {
            Some(&slot) => Some(&mut self.data[slot]),
            None => None,
        }
    }

    #[inline]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.index.contains_key(&entity)
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.index.remove(&entity)?;
        self.entities.remove(slot);
        let value = self.data.remove(slot);
        for (i, e) in self.entities.iter().enumerate().skip(slot) {
            self.index.insert(*e, i);
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity ids in iteration order
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.entities.iter().copied().zip(self.data.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.data.iter_mut())
    }
}
