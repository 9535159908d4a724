//! # Perch — Sparse-Set ECS with Spatial-Hash Physics
//!
//! The runtime core of a small 2D platformer: a type-indexed component store
//! where one identity ties a game object's components together, and an AABB
//! physics step with a uniform-grid broad phase, fixed/movable resolution
//! and collision callbacks.
//!
//! ## Frame Loop
//!
//! ```text
//! ┌─ frame ─────────────────────────────────────────────┐
//! │ roster.reap(world)              dead creatures out  │
//! │ world.cleanup()                 dropped composites  │
//! │ Ai::update_all(world, frame_dt) steering, burn-down │
//! │ sim.advance(world, frame_dt)    physics, callbacks  │
//! │ world.fixed_update::<Sprite>()  animation           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Start with [`ecs::World`] and [`physics::Simulation`]; see
//! `examples/platform.rs` for a full loop.

pub mod components;
pub mod ecs;
pub mod error;
pub mod logging;
pub mod math;
pub mod physics;
pub mod time;
