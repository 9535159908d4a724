//! # ComponentSet — Dense Per-Type Storage
//!
//! Each component type gets exactly one [`ComponentSet<T>`]: a packed array of
//! `(Entity, T)` pairs plus a side map from entity to array slot.
//!
//! ## Memory Layout
//!
//! ```text
//! entries: [(#4, a), (#0, b), (#7, c)]   ← dense, no holes
//! index:   { #4 → 0, #0 → 1, #7 → 2 }     ← entity → slot
//!
//! remove(#4):
//!   swap slot 0 with the last slot, pop, re-point the moved entity
//! entries: [(#7, c), (#0, b)]
//! index:   { #0 → 1, #7 → 0 }
//! ```
//!
//! Iteration is a linear scan over `entries`, so it visits components in
//! *store order*. Removal reorders the tail, so nobody may assume relative
//! order survives a removal.
//!
//! ## Comparison
//!
//! - **EnTT (C++)**: sparse set with a dense packed array, same swap-and-pop.
//! - **Archetype tables (hecs/bevy)**: group entities by component signature.
//!   Faster multi-component iteration, heavier bookkeeping.
//!
//! For tens to low hundreds of live objects a per-type dense store is plenty.

use std::any::Any;
use std::collections::HashMap;

use super::component::Component;
use super::entity::Entity;
use crate::error::{EcsError, short_type_name};

/// Dense storage for every component of type `T`.
pub struct ComponentSet<T> {
    /// Packed `(owner, component)` pairs.
    entries: Vec<(Entity, T)>,
    /// Owner → slot in `entries`.
    index: HashMap<Entity, usize>,
}

impl<T> ComponentSet<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a component for `entity` and return a reference to the stored value.
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if the entity already has one.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<&mut T, EcsError> {
        if self.index.contains_key(&entity) {
            return Err(EcsError::duplicate::<T>(entity));
        }
        let slot = self.entries.len();
        self.entries.push((entity, value));
        self.index.insert(entity, slot);
        Ok(&mut self.entries[slot].1)
    }

    /// Remove and return the component for `entity`.
    ///
    /// The last entry is swapped into the vacated slot. Fails with
    /// [`EcsError::MissingComponent`] if there's nothing to remove.
    pub fn remove(&mut self, entity: Entity) -> Result<T, EcsError> {
        let slot = self
            .index
            .remove(&entity)
            .ok_or_else(|| EcsError::missing::<T>(entity))?;
        let (_, value) = self.entries.swap_remove(slot);
        if let Some((moved, _)) = self.entries.get(slot) {
            self.index.insert(*moved, slot);
        }
        Ok(value)
    }

    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        match self.index.get(&entity) {
            Some(&slot) => Ok(&self.entries[slot].1),
            None => Err(EcsError::missing::<T>(entity)),
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        match self.index.get(&entity) {
            Some(&slot) => Ok(&mut self.entries[slot].1),
            None => Err(EcsError::missing::<T>(entity)),
        }
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Visit every `(entity, component)` pair in store order.
    ///
    /// The store is mutably borrowed for the whole visit, so the closure cannot
    /// insert into or remove from this same store. Queue such changes through
    /// [`Commands`](super::commands::Commands) instead.
    pub fn for_each(&mut self, mut f: impl FnMut(Entity, &mut T)) {
        for (entity, value) in &mut self.entries {
            f(*entity, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entries.iter().map(|(e, v)| (*e, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entries.iter_mut().map(|(e, v)| (*e, v))
    }

    /// Owners in store order.
    pub fn entities(&self) -> Vec<Entity> {
        self.entries.iter().map(|(e, _)| *e).collect()
    }

    /// Current slot of `entity`'s component. Only valid until the next removal.
    pub fn slot_of(&self, entity: Entity) -> Option<usize> {
        self.index.get(&entity).copied()
    }

    /// The entry at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds.
    pub fn entry(&self, slot: usize) -> (Entity, &T) {
        let (e, v) = &self.entries[slot];
        (*e, v)
    }

    /// The entry at `slot`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds.
    pub fn entry_mut(&mut self, slot: usize) -> (Entity, &mut T) {
        let (e, v) = &mut self.entries[slot];
        (*e, v)
    }

    /// Mutable access to two different slots at once.
    ///
    /// # Panics
    ///
    /// Panics if `a == b` or either slot is out of bounds.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut T, &mut T) {
        assert_ne!(a, b, "pair_mut needs two distinct slots, got {a} twice");
        if a < b {
            let (lo, hi) = self.entries.split_at_mut(b);
            (&mut lo[a].1, &mut hi[0].1)
        } else {
            let (lo, hi) = self.entries.split_at_mut(a);
            (&mut hi[0].1, &mut lo[b].1)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every component in the store.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub(crate) fn into_entries(self) -> Vec<(Entity, T)> {
        self.entries
    }
}

impl<T: Component> ComponentSet<T> {
    /// Run [`Component::delta_update`] on every component, in store order.
    pub fn delta_update(&mut self, dt: f32) {
        self.for_each(|entity, value| value.delta_update(entity, dt));
    }

    /// Run [`Component::fixed_update`] on every component, in store order.
    pub fn fixed_update(&mut self) {
        self.for_each(|entity, value| value.fixed_update(entity));
    }
}

impl<T> Default for ComponentSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentSet`], so the
/// [`World`](super::world::World) can keep stores of different types in one
/// map and despawn an entity without knowing which types it has.
pub(crate) trait ErasedSet: Any {
    /// Remove `entity`'s component if present. Returns whether one was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn contains(&self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn component_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Component> ErasedSet for ComponentSet<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_ok()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn component_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<T>())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    impl Component for Counter {
        fn delta_update(&mut self, _entity: Entity, dt: f32) {
            self.0 += dt as u32;
        }

        fn fixed_update(&mut self, _entity: Entity) {
            self.0 += 1;
        }
    }

    fn e(n: u64) -> Entity {
        Entity(n)
    }

    #[test]
    fn insert_and_get() {
        let mut set = ComponentSet::new();
        set.insert(e(5), Counter(42)).unwrap();
        assert_eq!(set.get(e(5)).unwrap(), &Counter(42));
        assert!(set.has(e(5)));
        assert!(!set.has(e(6)));
    }

    #[test]
    fn insert_returns_stored_value() {
        let mut set = ComponentSet::new();
        let stored = set.insert(e(1), Counter(1)).unwrap();
        stored.0 = 9;
        assert_eq!(set.get(e(1)).unwrap(), &Counter(9));
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut set = ComponentSet::new();
        set.insert(e(1), Counter(1)).unwrap();
        let err = set.insert(e(1), Counter(2)).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateComponent { .. }));
        // The original value is untouched.
        assert_eq!(set.get(e(1)).unwrap(), &Counter(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_missing_fails_loudly() {
        let mut set: ComponentSet<Counter> = ComponentSet::new();
        let err = set.remove(e(3)).unwrap_err();
        assert_eq!(
            err,
            EcsError::MissingComponent {
                entity: e(3),
                component: "Counter",
            }
        );
    }

    #[test]
    fn get_missing_fails() {
        let set: ComponentSet<Counter> = ComponentSet::new();
        assert!(set.get(e(0)).is_err());
    }

    #[test]
    fn swap_remove_reorders_and_keeps_lookup() {
        let mut set = ComponentSet::new();
        set.insert(e(10), Counter(10)).unwrap();
        set.insert(e(20), Counter(20)).unwrap();
        set.insert(e(30), Counter(30)).unwrap();

        assert_eq!(set.remove(e(10)).unwrap(), Counter(10));
        // Last entry (30) moved into slot 0.
        assert_eq!(set.entities(), vec![e(30), e(20)]);
        assert_eq!(set.slot_of(e(30)), Some(0));
        assert_eq!(set.get(e(30)).unwrap(), &Counter(30));
        assert_eq!(set.get(e(20)).unwrap(), &Counter(20));
    }

    #[test]
    fn remove_last_needs_no_swap() {
        let mut set = ComponentSet::new();
        set.insert(e(1), Counter(1)).unwrap();
        set.insert(e(2), Counter(2)).unwrap();
        set.remove(e(2)).unwrap();
        assert_eq!(set.entities(), vec![e(1)]);
        assert_eq!(set.slot_of(e(1)), Some(0));
    }

    #[test]
    fn insert_remove_sequence_keeps_invariants() {
        // Deterministic pseudo-random mix of inserts and removes.
        let mut set = ComponentSet::new();
        let mut live: Vec<Entity> = Vec::new();
        let mut removed: Vec<Entity> = Vec::new();
        let mut inserts = 0usize;
        let mut removals = 0usize;
        let mut seed: u64 = 0x2545_f491;
        let mut next_id = 0u64;

        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            if live.is_empty() || (seed >> 33) % 3 != 0 {
                let id = e(next_id);
                next_id += 1;
                set.insert(id, Counter(id.raw() as u32)).unwrap();
                live.push(id);
                inserts += 1;
            } else {
                let pick = ((seed >> 17) as usize) % live.len();
                let id = live.swap_remove(pick);
                assert_eq!(set.remove(id).unwrap(), Counter(id.raw() as u32));
                removed.push(id);
                removals += 1;
            }

            assert_eq!(set.len(), inserts - removals);
        }

        for id in &live {
            assert!(set.has(*id));
            assert_eq!(set.get(*id).unwrap().0, id.raw() as u32);
        }
        for id in &removed {
            assert!(!set.has(*id));
            assert!(set.get(*id).is_err());
        }
    }

    #[test]
    fn for_each_mutates_in_place() {
        let mut set = ComponentSet::new();
        set.insert(e(0), Counter(1)).unwrap();
        set.insert(e(1), Counter(2)).unwrap();
        let mut seen = Vec::new();
        set.for_each(|entity, c| {
            seen.push(entity);
            c.0 *= 10;
        });
        assert_eq!(seen, vec![e(0), e(1)]);
        assert_eq!(set.get(e(0)).unwrap(), &Counter(10));
        assert_eq!(set.get(e(1)).unwrap(), &Counter(20));
    }

    #[test]
    fn bulk_hooks_dispatch_to_each_component() {
        let mut set = ComponentSet::new();
        set.insert(e(0), Counter(0)).unwrap();
        set.insert(e(1), Counter(5)).unwrap();
        set.delta_update(2.0);
        set.fixed_update();
        assert_eq!(set.get(e(0)).unwrap(), &Counter(3));
        assert_eq!(set.get(e(1)).unwrap(), &Counter(8));
    }

    #[test]
    fn pair_mut_either_order() {
        let mut set = ComponentSet::new();
        set.insert(e(0), Counter(0)).unwrap();
        set.insert(e(1), Counter(1)).unwrap();
        set.insert(e(2), Counter(2)).unwrap();

        let (a, b) = set.pair_mut(0, 2);
        assert_eq!((a.0, b.0), (0, 2));
        let (a, b) = set.pair_mut(2, 0);
        assert_eq!((a.0, b.0), (2, 0));
        a.0 = 7;
        assert_eq!(set.get(e(2)).unwrap(), &Counter(7));
    }

    #[test]
    #[should_panic(expected = "distinct slots")]
    fn pair_mut_same_slot_panics() {
        let mut set = ComponentSet::new();
        set.insert(e(0), Counter(0)).unwrap();
        set.pair_mut(0, 0);
    }

    #[test]
    fn erased_remove_entity() {
        let mut set = ComponentSet::new();
        set.insert(e(0), Counter(0)).unwrap();
        let erased: &mut dyn ErasedSet = &mut set;
        assert_eq!(erased.component_name(), "Counter");
        assert!(erased.remove_entity(e(0)));
        assert!(!erased.remove_entity(e(0)));
        assert_eq!(erased.len(), 0);
    }
}
