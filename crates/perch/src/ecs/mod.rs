//! # Sparse-Set ECS
//!
//! Each component type gets its own dense store ([`ComponentSet<T>`]) with a
//! side map from identity to slot. An entity is nothing but an integer; "the
//! player" is whatever set of stores holds a component under the player's
//! identity.
//!
//! ```text
//!             Entity #0   #1   #2   #3
//! Position      ●         ●    ●    ●
//! Physics       ●         ●         ●
//! Sprite        ●    ●    ●
//! Status                  ●
//! ```
//!
//! ## Module Overview
//!
//! - [`entity`] — Monotonic identities, never reused
//! - [`component`] — The `Component` trait and its per-tick hooks
//! - [`component_set`] — Dense per-type storage
//! - [`world`] — Registry of stores, keyed by `TypeId`
//! - [`handle`] — Typed handles and composites (one identity, many components)
//! - [`commands`] — Deferred mutations applied at a sync point
//! - [`roster`] — Tracks creatures and reaps them when health runs out
//!
//! ## Comparison
//!
//! Archetype ECSs (hecs, bevy_ecs) group entities by their full component
//! signature so multi-component queries walk contiguous columns. A sparse set
//! keeps each type on its own, which makes adding and removing components
//! cheap and keeps the code small, at the price of a hash lookup when a
//! system joins two stores. The physics step joins exactly two (`Physics` and
//! `Position`), so the trade is an easy one here.

pub mod commands;
pub mod component;
pub mod component_set;
pub mod entity;
pub mod handle;
pub mod roster;
pub mod world;

pub use commands::Commands;
pub use component::Component;
pub use component_set::ComponentSet;
pub use entity::{Entity, EntityAllocator};
pub use handle::{ComponentHandle, Composite, CompositeBuilder};
pub use roster::{DeathHook, Roster};
pub use world::World;
