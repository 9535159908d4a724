//! # Commands — Deferred World Mutations
//!
//! Code that runs while a store is borrowed (collision callbacks during the
//! physics step, closures passed to `for_each`) must not add or remove
//! components of that store. Instead it records what it wants done into a
//! [`Commands`] queue, and the owner of the borrow applies the queue once the
//! borrow ends.
//!
//! ```text
//! step():
//!   broad phase
//!   for each body:
//!       callback(other, &mut commands)   ← records, doesn't mutate
//!   restore stores
//!   commands.apply(world)                ← sync point, in recording order
//! ```
//!
//! Commands run in the order they were recorded. A command that breaks a
//! store contract (removing a component that is already gone, inserting a
//! duplicate) doesn't stop the rest: its error is logged and kept until
//! [`Commands::take_errors`].

use super::component::Component;
use super::entity::Entity;
use super::world::World;
use crate::error::EcsError;

type Command = Box<dyn FnOnce(&mut World) -> Result<(), EcsError>>;

/// An ordered queue of world mutations to run later.
#[derive(Default)]
pub struct Commands {
    queue: Vec<Command>,
    errors: Vec<EcsError>,
}

impl Commands {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Queue an arbitrary mutation.
    pub fn push(&mut self, command: impl FnOnce(&mut World) + 'static) {
        self.try_push(move |world| {
            command(world);
            Ok(())
        });
    }

    /// Queue a mutation that can fail. Failures are reported by
    /// [`apply`](Self::apply).
    pub fn try_push(&mut self, command: impl FnOnce(&mut World) -> Result<(), EcsError> + 'static) {
        self.queue.push(Box::new(command));
    }

    /// Queue a change to `entity`'s `T` component. Skipped if, by the time the
    /// queue runs, the entity has no `T`.
    pub fn modify<T: Component>(&mut self, entity: Entity, f: impl FnOnce(&mut T) + 'static) {
        self.push(move |world| {
            if let Ok(value) = world.try_get_mut::<T>(entity) {
                f(value);
            }
        });
    }

    /// Queue inserting a component. Fails with
    /// [`EcsError::DuplicateComponent`] if the entity has a `T` by then.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) {
        self.try_push(move |world| world.try_insert(entity, value).map(|_| ()));
    }

    /// Queue removing `entity`'s `T` component. Fails with
    /// [`EcsError::MissingComponent`] if it is gone by then.
    pub fn remove<T: Component>(&mut self, entity: Entity) {
        self.try_push(move |world| world.try_remove::<T>(entity).map(|_| ()));
    }

    /// Queue removing `entity` from every store.
    pub fn despawn(&mut self, entity: Entity) {
        self.push(move |world| {
            world.despawn(entity);
        });
    }

    /// Move every command of `other` to the end of this queue.
    pub fn append(&mut self, other: &mut Commands) {
        self.queue.append(&mut other.queue);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run every queued command against `world`, in recording order, and
    /// return how many ran. The queue is left empty.
    ///
    /// Commands queued by other commands (through a nested queue) are the
    /// caller's business; this drains only what was recorded before the call.
    pub fn apply(&mut self, world: &mut World) -> usize {
        let queue = std::mem::take(&mut self.queue);
        let count = queue.len();
        for command in queue {
            if let Err(err) = command(world) {
                log::warn!("deferred command failed: {}", err);
                self.errors.push(err);
            }
        }
        count
    }

    /// Errors from commands applied so far, oldest first. Clears the list.
    pub fn take_errors(&mut self) -> Vec<EcsError> {
        std::mem::take(&mut self.errors)
    }
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commands")
            .field("queued", &self.queue.len())
            .field("errors", &self.errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Hp(i32);
    impl Component for Hp {}

    #[test]
    fn commands_run_in_order() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Hp(10));

        let mut commands = Commands::new();
        commands.modify::<Hp>(e, |hp| hp.0 -= 3);
        commands.modify::<Hp>(e, |hp| hp.0 *= 2);
        assert_eq!(commands.len(), 2);
        assert_eq!(world.get::<Hp>(e), &Hp(10)); // nothing happens until apply

        assert_eq!(commands.apply(&mut world), 2);
        assert_eq!(world.get::<Hp>(e), &Hp(14));
        assert!(commands.is_empty());
    }

    #[test]
    fn modify_skips_missing_component() {
        let mut world = World::new();
        let e = world.spawn();
        let mut commands = Commands::new();
        commands.modify::<Hp>(e, |hp| hp.0 = 0);
        commands.apply(&mut world);
        assert!(!world.has::<Hp>(e));
    }

    #[test]
    fn insert_remove_despawn() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        world.insert(b, Hp(1));

        let mut commands = Commands::new();
        commands.insert(a, Hp(5));
        commands.remove::<Hp>(b);
        commands.apply(&mut world);
        assert_eq!(world.get::<Hp>(a), &Hp(5));
        assert!(!world.has::<Hp>(b));
        assert!(commands.take_errors().is_empty());

        commands.despawn(a);
        commands.apply(&mut world);
        assert!(!world.has::<Hp>(a));
    }

    #[test]
    fn failed_commands_are_reported_and_the_rest_still_run() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Hp(1));

        let mut commands = Commands::new();
        commands.remove::<Hp>(e);
        commands.remove::<Hp>(e);
        commands.insert(e, Hp(2));
        commands.insert(e, Hp(3));
        assert_eq!(commands.apply(&mut world), 4);

        assert_eq!(world.get::<Hp>(e), &Hp(2));
        let errors = commands.take_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], EcsError::missing::<Hp>(e));
        assert!(matches!(errors[1], EcsError::DuplicateComponent { .. }));
        assert!(commands.take_errors().is_empty());
    }
}
