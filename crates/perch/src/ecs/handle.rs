//! # Handles and Composites — Building Objects Out of Components
//!
//! A game object ("a wall", "an enemy") is a bundle of components that share
//! one identity. This module gives that bundle a Rust shape:
//!
//! - [`ComponentHandle<T>`] — proof that a `T` was attached to an entity. It
//!   remembers the identity so the owner can later `get` or `detach` it.
//! - [`Composite`] — owns one identity plus the list of component types
//!   attached through it. Despawning the composite removes exactly those;
//!   dropping it queues them for [`World::cleanup`].
//! - [`CompositeBuilder`] — allocates the identity *once*, then attaches each
//!   component under that same identity.
//!
//! ```text
//! world.build()                     ← allocates Entity(#7)
//!      .insert(Position)            ← ComponentSet<Position>.insert(#7, ..)
//!      .insert(Physics)             ← ComponentSet<Physics>.insert(#7, ..)
//!      .insert(Sprite)              ← ComponentSet<Sprite>.insert(#7, ..)
//!      .finish()                    → Composite { #7, [Position, Physics, Sprite] }
//! ```
//!
//! Every sibling component reuses the identity the builder allocated, so
//! `world.get::<Position>(id)`, `world.get::<Physics>(id)` and
//! `world.get::<Sprite>(id)` all describe the same object.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use super::component::Component;
use super::entity::Entity;
use super::world::{Graveyard, World};
use crate::error::{EcsError, short_type_name};

/// A typed token for one component attached to one entity.
///
/// Not `Clone`: each attached component has exactly one handle, and consuming
/// it with [`detach`](Self::detach) removes the component.
pub struct ComponentHandle<T: Component> {
    entity: Entity,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> ComponentHandle<T> {
    /// Insert `value` into the `T` store under `entity`.
    pub fn attach(world: &mut World, entity: Entity, value: T) -> Result<Self, EcsError> {
        world.try_insert(entity, value)?;
        Ok(Self {
            entity,
            _marker: PhantomData,
        })
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// # Panics
    ///
    /// Panics if the component was removed behind the handle's back.
    pub fn get<'w>(&self, world: &'w World) -> &'w T {
        world.get::<T>(self.entity)
    }

    /// # Panics
    ///
    /// Panics if the component was removed behind the handle's back.
    pub fn get_mut<'w>(&self, world: &'w mut World) -> &'w mut T {
        world.get_mut::<T>(self.entity)
    }

    /// Remove the component and return it.
    pub fn detach(self, world: &mut World) -> Result<T, EcsError> {
        world.try_remove::<T>(self.entity)
    }
}

impl<T: Component> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ComponentHandle<{}>({})",
            short_type_name(std::any::type_name::<T>()),
            self.entity
        )
    }
}

/// One identity and the components attached through it.
///
/// The composite owns its components. Dropping it queues them on the world's
/// graveyard, and the next [`World::cleanup`] removes them. Use
/// [`despawn`](Self::despawn) to remove them right away, or
/// [`into_entity`](Self::into_entity) to leave them in the world for good.
#[must_use = "dropping a Composite removes its components at the next World::cleanup"]
pub struct Composite {
    entity: Entity,
    attached: Vec<(TypeId, &'static str)>,
    graveyard: Graveyard,
}

impl Composite {
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Whether a `T` was attached through this composite (and not detached).
    pub fn has<T: Component>(&self) -> bool {
        self.attached.iter().any(|(id, _)| *id == TypeId::of::<T>())
    }

    /// Names of the attached component types, in attach order.
    pub fn component_names(&self) -> Vec<&'static str> {
        self.attached.iter().map(|(_, name)| *name).collect()
    }

    /// Attach another component after construction.
    pub fn attach<T: Component>(&mut self, world: &mut World, value: T) -> Result<(), EcsError> {
        let handle = ComponentHandle::attach(world, self.entity, value)?;
        self.record::<T>(&handle);
        Ok(())
    }

    /// Detach one component and return it.
    pub fn detach<T: Component>(&mut self, world: &mut World) -> Result<T, EcsError> {
        let value = world.try_remove::<T>(self.entity)?;
        self.attached.retain(|(id, _)| *id != TypeId::of::<T>());
        Ok(value)
    }

    /// Remove every attached component from the world. Returns how many were
    /// still present.
    pub fn despawn(mut self, world: &mut World) -> usize {
        let mut removed = 0;
        for (type_id, _) in std::mem::take(&mut self.attached) {
            if world.remove_erased(type_id, self.entity) {
                removed += 1;
            }
        }
        log::debug!("composite {} despawned ({} components)", self.entity, removed);
        removed
    }

    /// Give up ownership. The components stay until something removes them
    /// by identity (`World::despawn`, `World::remove`).
    pub fn into_entity(mut self) -> Entity {
        self.attached.clear();
        self.entity
    }

    fn record<T: Component>(&mut self, _handle: &ComponentHandle<T>) {
        self.attached
            .push((TypeId::of::<T>(), short_type_name(std::any::type_name::<T>())));
    }
}

impl Drop for Composite {
    fn drop(&mut self) {
        if self.attached.is_empty() {
            return;
        }
        let entity = self.entity;
        self.graveyard
            .borrow_mut()
            .extend(self.attached.drain(..).map(|(type_id, _)| (type_id, entity)));
    }
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("entity", &self.entity)
            .field("components", &self.component_names())
            .finish()
    }
}

/// Builder returned by [`World::build`]. Chain `.insert()` calls, then
/// `.finish()`.
pub struct CompositeBuilder<'w> {
    world: &'w mut World,
    composite: Composite,
}

impl<'w> CompositeBuilder<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Entity) -> Self {
        let graveyard = world.graveyard();
        Self {
            world,
            composite: Composite {
                entity,
                attached: Vec::new(),
                graveyard,
            },
        }
    }

    /// Attach a component under the composite's identity.
    ///
    /// # Panics
    ///
    /// Panics if a `T` was already attached.
    pub fn insert<T: Component>(self, value: T) -> Self {
        self.try_insert(value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Attach a component, handing back the error on a duplicate.
    pub fn try_insert<T: Component>(mut self, value: T) -> Result<Self, EcsError> {
        let handle = ComponentHandle::attach(self.world, self.composite.entity, value)?;
        self.composite.record::<T>(&handle);
        Ok(self)
    }

    /// Get the entity ID.
    pub fn id(&self) -> Entity {
        self.composite.entity
    }

    pub fn finish(self) -> Composite {
        self.composite
    }
}
