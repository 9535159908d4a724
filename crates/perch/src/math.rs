//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. Collision works in 2D ([`Vec2`], [`IVec2`] cells);
//! [`Vec3`] carries positions with a depth hint.

pub use glam::{IVec2, Vec2, Vec3};
