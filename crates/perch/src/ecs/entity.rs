//! # Entity — Identities Shared Across Component Stores
//!
//! An [`Entity`] is just a number. It doesn't "contain" anything; every
//! [`ComponentSet`](super::component_set::ComponentSet) maps entities to its
//! own component type, and two stores agree that they describe "the same
//! object" only because they were handed the same number.
//!
//! ## Design: Monotonic Counter, No Recycling
//!
//! Many ECS crates pair a slot index with a generation so freed slots can be
//! reused safely. We don't reuse anything:
//!
//! ```text
//! allocate() → Entity(0)
//! allocate() → Entity(1)
//! despawn Entity(0)
//! allocate() → Entity(2)     ← 0 is never handed out again
//! ```
//!
//! A `u64` counter cannot realistically run out within one process, so stale
//! handles can never alias a newer object. The ordering of identities also
//! matters to the physics step: the body with the lower identity is the one
//! that runs the pairwise test.
//!
//! ## Comparison
//!
//! - **hecs / bevy_ecs**: generational index (index + generation), slots reused.
//! - **perch**: a bare increasing `u64`. No free list, nothing to invalidate.

use std::fmt;

/// An opaque identity for one game object.
///
/// Entities are created via [`World::spawn`](super::world::World::spawn) or
/// [`World::build`](super::world::World::build). Identities are ordered by
/// creation: an entity created later always compares greater.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u64);

impl Entity {
    /// Returns the raw identity. Useful for diagnostics and ordering.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh identities.
///
/// One allocator lives inside each [`World`](super::world::World), so two
/// worlds in the same process (for example, two tests) never share a counter.
/// The allocator is not thread-safe and doesn't need to be: a world has exactly
/// one writer.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// The next identity to hand out. Also the number handed out so far.
    next: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate a new [`Entity`]. Never returns an identity twice.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }

    /// Number of identities handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
