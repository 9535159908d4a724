//! # World — The Component Registry
//!
//! The [`World`] owns the identity allocator and one
//! [`ComponentSet<T>`] per registered component type. It's the single source
//! of truth for game state; nothing in the crate is a process-global.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ World                                                │
//! │                                                      │
//! │  allocator: EntityAllocator   (monotonic u64 ids)    │
//! │                                                      │
//! │  stores: HashMap<TypeId, Box<dyn ErasedSet>>         │
//! │    Position → ComponentSet<Position>                 │
//! │    Physics  → ComponentSet<Physics>                  │
//! │    Sprite   → ComponentSet<Sprite>                   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Stores are created on first use (`insert`, `register`, `store_mut`), so the
//! set of component types is whatever the game actually uses.
//!
//! ## Extract / Restore
//!
//! Systems that need two stores mutably at once (physics needs `Physics` and
//! `Position`) take them out of the map with [`World::take_store`], work on
//! the owned values, and put them back with [`World::restore_store`]. The
//! borrow checker is happy because the stores are no longer inside `self`.
//!
//! ## Dropped Composites
//!
//! A [`Composite`](super::handle::Composite) that is dropped without
//! `despawn` doesn't touch the world on the spot (it holds no borrow of it).
//! It queues its components on the world's graveyard instead, and
//! [`World::cleanup`] removes them. Call it once per frame.
//!
//! ## Fail Fast
//!
//! [`World::get`], [`World::insert`] and friends panic on contract violations
//! (missing or duplicate component). The `try_*` variants return
//! [`EcsError`] instead.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::commands::Commands;
use super::component::Component;
use super::component_set::{ComponentSet, ErasedSet};
use super::entity::{Entity, EntityAllocator};
use super::handle::CompositeBuilder;
use crate::error::{EcsError, short_type_name};

/// Components of dropped composites, waiting for [`World::cleanup`].
pub(crate) type Graveyard = Rc<RefCell<Vec<(TypeId, Entity)>>>;

/// The central container for all entities and components.
pub struct World {
    allocator: EntityAllocator,
    /// One store per component type, keyed by `TypeId::of::<T>()`.
    stores: HashMap<TypeId, Box<dyn ErasedSet>>,
    graveyard: Graveyard,
    /// Number of entities spawned this frame (diagnostics only).
    #[cfg(feature = "diagnostics")]
    spawned_this_frame: u32,
    /// Number of entities despawned this frame (diagnostics only).
    #[cfg(feature = "diagnostics")]
    despawned_this_frame: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            stores: HashMap::new(),
            graveyard: Graveyard::default(),
            #[cfg(feature = "diagnostics")]
            spawned_this_frame: 0,
            #[cfg(feature = "diagnostics")]
            despawned_this_frame: 0,
        }
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Allocate a fresh identity with no components yet.
    pub fn spawn(&mut self) -> Entity {
        #[cfg(feature = "diagnostics")]
        {
            self.spawned_this_frame += 1;
        }
        self.allocator.allocate()
    }

    /// Start building a composite: one identity, many components.
    ///
    /// ```ignore
    /// let wall = world
    ///     .build()
    ///     .insert(Position::new(0.0, -1.0))
    ///     .insert(Physics::fixed(Vec2::new(2.0, 0.1)))
    ///     .finish();
    /// ```
    pub fn build(&mut self) -> CompositeBuilder<'_> {
        let entity = self.spawn();
        CompositeBuilder::new(self, entity)
    }

    /// Remove `entity` from every store. Returns how many components were
    /// dropped (0 if it had none).
    pub fn despawn(&mut self, entity: Entity) -> usize {
        let mut removed = 0;
        for store in self.stores.values_mut() {
            if store.remove_entity(entity) {
                removed += 1;
            }
        }
        if removed > 0 {
            #[cfg(feature = "diagnostics")]
            {
                self.despawned_this_frame += 1;
            }
            log::debug!("despawned {} ({} components)", entity, removed);
        }
        removed
    }

    /// Remove the components of every composite dropped since the last call.
    /// Returns how many were still present.
    pub fn cleanup(&mut self) -> usize {
        let buried = std::mem::take(&mut *self.graveyard.borrow_mut());
        let mut removed = 0;
        for (type_id, entity) in buried {
            if self.remove_erased(type_id, entity) {
                removed += 1;
            }
        }
        if removed > 0 {
            log::debug!("cleanup removed {} components of dropped composites", removed);
        }
        removed
    }

    /// Components queued by dropped composites and not yet cleaned up.
    pub fn pending_cleanup(&self) -> usize {
        self.graveyard.borrow().len()
    }

    pub(crate) fn graveyard(&self) -> Graveyard {
        Rc::clone(&self.graveyard)
    }

    /// Number of identities handed out so far.
    pub fn allocated(&self) -> u64 {
        self.allocator.allocated()
    }

    /// Names of the component types `entity` currently has, sorted.
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .stores
            .values()
            .filter(|s| s.contains(entity))
            .map(|s| s.component_name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Return and reset `(spawned, despawned)` counts since the last call.
    #[cfg(feature = "diagnostics")]
    pub fn take_frame_counts(&mut self) -> (u32, u32) {
        let counts = (self.spawned_this_frame, self.despawned_this_frame);
        self.spawned_this_frame = 0;
        self.despawned_this_frame = 0;
        counts
    }

    // ── Stores ───────────────────────────────────────────────────────

    /// Make sure a store for `T` exists and return it.
    pub fn register<T: Component>(&mut self) -> &mut ComponentSet<T> {
        self.store_mut::<T>()
    }

    /// The store for `T`, if any component of that type was ever registered.
    pub fn store<T: Component>(&self) -> Option<&ComponentSet<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .map(|s| downcast_ref::<T>(s.as_ref()))
    }

    /// The store for `T`, created empty if needed.
    pub fn store_mut<T: Component>(&mut self) -> &mut ComponentSet<T> {
        let store = self
            .stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentSet::<T>::new()));
        downcast_mut::<T>(store.as_mut())
    }

    /// Take the store for `T` out of the world (empty if none existed).
    /// Put it back with [`restore_store`](Self::restore_store).
    pub fn take_store<T: Component>(&mut self) -> ComponentSet<T> {
        match self.stores.remove(&TypeId::of::<T>()) {
            Some(store) => *store.into_any().downcast::<ComponentSet<T>>().unwrap_or_else(|_| {
                panic!(
                    "store registered under `{}` holds another type",
                    short_type_name(std::any::type_name::<T>())
                )
            }),
            None => ComponentSet::new(),
        }
    }

    /// Put a store taken with [`take_store`](Self::take_store) back.
    ///
    /// If components of `T` were inserted while the store was out, they are
    /// merged into the restored store.
    ///
    /// # Panics
    ///
    /// Panics if the merge would give an entity two `T` components.
    pub fn restore_store<T: Component>(&mut self, mut store: ComponentSet<T>) {
        let type_id = TypeId::of::<T>();
        if self.stores.contains_key(&type_id) {
            let interim = self.take_store::<T>();
            for (entity, value) in interim.into_entries() {
                if let Err(err) = store.insert(entity, value) {
                    panic!("{err}");
                }
            }
        }
        self.stores.insert(type_id, Box::new(store));
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach a component to `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` already has a `T`.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        match self.store_mut::<T>().insert(entity, value) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_insert<T: Component>(&mut self, entity: Entity, value: T) -> Result<&mut T, EcsError> {
        self.store_mut::<T>().insert(entity, value)
    }

    /// Detach and return `entity`'s `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> T {
        self.try_remove::<T>(entity).unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn try_remove<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        match self.stores.get_mut(&TypeId::of::<T>()) {
            Some(store) => downcast_mut::<T>(store.as_mut()).remove(entity),
            None => Err(EcsError::missing::<T>(entity)),
        }
    }

    /// Shared reference to `entity`'s `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no `T`. Check with [`has`](Self::has) first when
    /// absence is a normal case.
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        self.try_get::<T>(entity).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable reference to `entity`'s `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.try_get_mut::<T>(entity).unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn try_get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        match self.store::<T>() {
            Some(store) => store.get(entity),
            None => Err(EcsError::missing::<T>(entity)),
        }
    }

    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        match self.stores.get_mut(&TypeId::of::<T>()) {
            Some(store) => downcast_mut::<T>(store.as_mut()).get_mut(entity),
            None => Err(EcsError::missing::<T>(entity)),
        }
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().is_some_and(|s| s.has(entity))
    }

    /// Number of live `T` components.
    pub fn count<T: Component>(&self) -> usize {
        self.store::<T>().map_or(0, |s| s.len())
    }

    /// Number of live components of every type.
    pub fn component_count(&self) -> usize {
        self.stores.values().map(|s| s.len()).sum()
    }

    // ── Iteration ────────────────────────────────────────────────────

    /// Visit every `T` in store order. See [`ComponentSet::for_each`].
    pub fn for_each<T: Component>(&mut self, f: impl FnMut(Entity, &mut T)) {
        self.store_mut::<T>().for_each(f);
    }

    /// Run [`Component::delta_update`] on every `T`.
    pub fn delta_update<T: Component>(&mut self, dt: f32) {
        self.store_mut::<T>().delta_update(dt);
    }

    /// Run [`Component::fixed_update`] on every `T`.
    pub fn fixed_update<T: Component>(&mut self) {
        self.store_mut::<T>().fixed_update();
    }

    /// Apply a queue of deferred mutations. Returns how many ran.
    pub fn apply(&mut self, commands: &mut Commands) -> usize {
        commands.apply(self)
    }

    /// Remove one component by type id. Used by
    /// [`Composite::despawn`](super::handle::Composite::despawn).
    pub(crate) fn remove_erased(&mut self, type_id: TypeId, entity: Entity) -> bool {
        self.stores
            .get_mut(&type_id)
            .is_some_and(|s| s.remove_entity(entity))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast_ref<T: Component>(store: &dyn ErasedSet) -> &ComponentSet<T> {
    store.as_any().downcast_ref().unwrap_or_else(|| {
        panic!(
            "store registered under `{}` holds another type",
            short_type_name(std::any::type_name::<T>())
        )
    })
}

fn downcast_mut<T: Component>(store: &mut dyn ErasedSet) -> &mut ComponentSet<T> {
    store.as_any_mut().downcast_mut().unwrap_or_else(|| {
        panic!(
            "store registered under `{}` holds another type",
            short_type_name(std::any::type_name::<T>())
        )
    })
}
