//! # Roster — Reaping Dead Composites
//!
//! Creatures (anything with a [`Status`]) stay in the world until their
//! health runs out. The [`Roster`] keeps the list of tracked composites and,
//! once per frame, despawns the ones whose `Status.health <= 0`.
//!
//! ```text
//! frame start:
//!   roster.reap(world)
//!     for each tracked composite:
//!       health > 0  → keep
//!       health <= 0 → death hook (may track new composites) → despawn
//! ```
//!
//! A death hook runs while the dying composite's components are still in the
//! world, so it can read where the creature died. Composites the hook tracks
//! are checked on the *next* reap, not this one.
//!
//! Composites without a `Status` are never reaped.

use std::fmt;

use super::entity::Entity;
use super::handle::Composite;
use super::world::World;
use crate::components::Status;

/// Runs once when a tracked composite dies.
pub type DeathHook = Box<dyn FnOnce(Entity, &mut World, &mut Roster)>;

struct Tracked {
    composite: Composite,
    on_death: Option<DeathHook>,
}

/// The list of live creatures.
#[derive(Default)]
pub struct Roster {
    alive: Vec<Tracked>,
}

impl Roster {
    pub fn new() -> Self {
        Self { alive: Vec::new() }
    }

    /// Track a composite with no death hook.
    pub fn track(&mut self, composite: Composite) -> Entity {
        self.push(composite, None)
    }

    /// Track a composite and run `on_death` when it is reaped.
    pub fn track_with(
        &mut self,
        composite: Composite,
        on_death: impl FnOnce(Entity, &mut World, &mut Roster) + 'static,
    ) -> Entity {
        self.push(composite, Some(Box::new(on_death)))
    }

    fn push(&mut self, composite: Composite, on_death: Option<DeathHook>) -> Entity {
        let entity = composite.entity();
        self.alive.push(Tracked {
            composite,
            on_death,
        });
        entity
    }

    /// Despawn every tracked composite whose health is at or below zero,
    /// running its death hook first. Returns how many were reaped.
    pub fn reap(&mut self, world: &mut World) -> usize {
        let previous = std::mem::take(&mut self.alive);
        let mut reaped = 0;
        for tracked in previous {
            let entity = tracked.composite.entity();
            let dead = world
                .try_get::<Status>(entity)
                .is_ok_and(|status| status.health <= 0);
            if !dead {
                self.alive.push(tracked);
                continue;
            }
            if let Some(hook) = tracked.on_death {
                hook(entity, world, self);
            }
            let _ = tracked.composite.despawn(world);
            reaped += 1;
        }
        if reaped > 0 {
            log::debug!("reaped {} creatures, {} alive", reaped, self.alive.len());
        }
        reaped
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.alive.iter().any(|t| t.composite.entity() == entity)
    }

    /// Identities of the tracked composites, in tracking order.
    pub fn entities(&self) -> Vec<Entity> {
        self.alive.iter().map(|t| t.composite.entity()).collect()
    }

    /// Despawn everything without running death hooks.
    pub fn clear(&mut self, world: &mut World) {
        for tracked in self.alive.drain(..) {
            let _ = tracked.composite.despawn(world);
        }
    }
}

impl fmt::Debug for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roster")
            .field("alive", &self.entities())
            .finish()
    }
}
