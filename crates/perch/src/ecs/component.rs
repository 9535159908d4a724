//! # Component — Data Attached to an Entity
//!
//! Components are plain data: a `Position`, a `Physics` body, a `Status`. Any
//! `'static` type can be a component once it implements [`Component`], which
//! only adds two optional per-tick hooks.
//!
//! ## Per-Tick Hooks
//!
//! The outer frame loop calls
//! [`World::delta_update`](super::world::World::delta_update) and
//! [`World::fixed_update`](super::world::World::fixed_update) once per frame
//! for each component type it cares about. Those walk the type's store and
//! call the hook on every component:
//!
//! ```text
//! world.delta_update::<Status>(dt);   // Status::delta_update(entity, dt) for each
//! world.fixed_update::<Sprite>();     // Sprite::fixed_update(entity) for each
//! ```
//!
//! Hooks only see their own component. Anything that needs to look at other
//! stores (physics, AI) is a free function over the `World` instead.

use super::entity::Entity;

/// A type that can be stored in a [`ComponentSet`](super::component_set::ComponentSet).
///
/// Both hooks default to doing nothing, so most components are just
/// `impl Component for MyData {}`.
pub trait Component: 'static {
    /// Called once per frame with the elapsed time in seconds.
    fn delta_update(&mut self, _entity: Entity, _dt: f32) {}

    /// Called once per frame, independent of elapsed time.
    fn fixed_update(&mut self, _entity: Entity) {}
}
