//! # AABB Physics with a Spatial-Hash Broad Phase
//!
//! Axis-aligned boxes, a uniform grid to find nearby pairs, and a resolver
//! that pushes overlapping boxes apart.
//!
//! ## Module Overview
//!
//! - [`body`] — The `Physics` component, narrow-phase test and resolver
//! - [`collision_map`] — Uniform grid of buckets rebuilt every tick
//! - [`simulation`] — Drag, gravity, the grid and the tick itself
//! - [`config`] — JSON-loadable simulation settings
//!
//! ## Usage
//!
//! ```ignore
//! let mut world = World::new();
//! let mut sim = Simulation::new();
//! sim.set_drag(0.1)?;
//!
//! let floor = world
//!     .build()
//!     .insert(Position::new(0.0, -1.0))
//!     .insert(Physics::fixed(Vec2::new(2.0, 0.1)))
//!     .finish();
//!
//! loop {
//!     world.cleanup();
//!     sim.advance(&mut world, frame_dt)?;
//! }
//! ```
//!
//! ## Comparison
//!
//! Rapier gives rigid bodies with mass, rotation and a constraint solver. This
//! module has none of that: boxes never rotate, have no mass, and contacts
//! are resolved one pair at a time in a single pass. That's enough for a
//! platformer where walls are boxes and everything else bounces off them.

pub mod body;
pub mod collision_map;
pub mod config;
pub mod simulation;

pub use body::{Aabb, CollisionCallback, Physics, collides, resolve_collision};
pub use collision_map::{BodySlot, CollisionMap};
pub use config::PhysicsConfig;
pub use simulation::{Simulation, StepStats};
