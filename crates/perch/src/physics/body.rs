//! # Physics Bodies — Narrow Phase and Resolution
//!
//! A [`Physics`] component turns an entity with a
//! [`Position`](crate::components::Position) into an axis-aligned box that
//! moves, collides and gets pushed around.
//!
//! ## Narrow Phase
//!
//! Two boxes overlap when their centres are within the sum of half-extents on
//! *both* axes (touching counts). The contact normal points from the other box
//! toward this one, and is picked per axis:
//!
//! ```text
//! normal.x = ±1  if |offset.y| < max(hA.y, hB.y)   (side by side)
//! normal.y = ±1  if |offset.x| < max(hA.x, hB.x)   (stacked)
//! ```
//!
//! The two tests are independent. A box sunk deep into another's corner gets
//! a diagonal normal like `(1, 1)` and is pushed out along both axes.
//!
//! ## Resolution
//!
//! ```text
//! rv        = vA - vB
//! pos_fix   = ((hA + hB) - |pA - pB|) * normal       penetration, per axis
//! vel_fix   = |rv| * normal * 2                       zero if already separating
//! friction  = -rv * (1 - |normal|) * 0.1              opposes tangential motion
//!
//! A += (vel_fix + friction, pos_fix) * wA
//! B -= (vel_fix + friction, pos_fix) * wB
//! ```
//!
//! Weights are 0.5/0.5 for two movable bodies. A fixed body has weight 0 and
//! its partner takes the whole correction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::Position;
use crate::ecs::{Commands, Component, Entity};
use crate::math::Vec2;

/// Called with the *other* body's identity when this body touches it.
///
/// World changes go through the [`Commands`] queue and are applied after the
/// physics step.
pub type CollisionCallback = Box<dyn FnMut(Entity, &mut Commands)>;

/// Fraction of tangential relative velocity removed per contact.
const FRICTION: f32 = 0.1;

/// A moving (or fixed) axis-aligned box.
pub struct Physics {
    pub velocity: Vec2,
    /// Half the box size on each axis.
    pub half_extents: Vec2,
    /// Never moves, never absorbs corrections (walls, floors).
    pub fixed: bool,
    /// Takes part in resolution. Non-solid bodies still fire callbacks.
    pub solid: bool,
    /// Subject to the simulation's drag.
    pub has_drag: bool,
    callbacks: Vec<CollisionCallback>,
}

impl Physics {
    /// A movable, solid body with drag.
    pub fn new(half_extents: Vec2) -> Self {
        Self {
            velocity: Vec2::ZERO,
            half_extents,
            fixed: false,
            solid: true,
            has_drag: true,
            callbacks: Vec::new(),
        }
    }

    /// A solid body that never moves.
    pub fn fixed(half_extents: Vec2) -> Self {
        Self {
            fixed: true,
            ..Self::new(half_extents)
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Passes through everything; only callbacks notice contacts.
    pub fn non_solid(mut self) -> Self {
        self.solid = false;
        self
    }

    pub fn without_drag(mut self) -> Self {
        self.has_drag = false;
        self
    }

    /// Register a collision callback (builder form).
    pub fn on_collide(mut self, callback: impl FnMut(Entity, &mut Commands) + 'static) -> Self {
        self.add_callback(callback);
        self
    }

    pub fn add_callback(&mut self, callback: impl FnMut(Entity, &mut Commands) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn has_callbacks(&self) -> bool {
        !self.callbacks.is_empty()
    }

    /// Bodies that are neither solid nor observed can't produce a visible
    /// contact, so the broad phase leaves them out.
    pub fn is_indexed(&self) -> bool {
        self.solid || self.has_callbacks()
    }

    /// Whether a contact with `other` moves anything.
    pub fn resolves_with(&self, other: &Physics) -> bool {
        !(self.fixed && other.fixed) && self.solid && other.solid
    }

    /// The body's box when centred at `center`.
    pub fn aabb(&self, center: Vec2) -> Aabb {
        Aabb::new(center, self.half_extents)
    }

    /// Run every callback with `other`, in registration order.
    pub(crate) fn notify(&mut self, other: Entity, commands: &mut Commands) {
        for callback in &mut self.callbacks {
            callback(other, commands);
        }
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl fmt::Debug for Physics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Physics")
            .field("velocity", &self.velocity)
            .field("half_extents", &self.half_extents)
            .field("fixed", &self.fixed)
            .field("solid", &self.solid)
            .field("has_drag", &self.has_drag)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Component for Physics {}

/// An axis-aligned box given by centre and half-extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

/// Overlap test between `body` and `other`. Returns the contact normal,
/// pointing from `other` toward `body`, or `None` when apart.
///
/// The normal may have both components set; see the module docs.
pub fn collides(body: &Aabb, other: &Aabb) -> Option<Vec2> {
    let offset = body.center - other.center;
    let reach = body.half_extents + other.half_extents;
    if !offset.abs().cmple(reach).all() {
        return None;
    }

    let widest = body.half_extents.max(other.half_extents);
    let mut normal = Vec2::ZERO;
    if offset.y.abs() < widest.y {
        normal.x = if offset.x > 0.0 { 1.0 } else { -1.0 };
    }
    if offset.x.abs() < widest.x {
        normal.y = if offset.y > 0.0 { 1.0 } else { -1.0 };
    }
    Some(normal)
}

/// Push `body` and `other` apart along `normal` and exchange the closing
/// velocity. Doesn't look at `solid`; check
/// [`Physics::resolves_with`] first.
pub fn resolve_collision(
    body: &mut Physics,
    position: &mut Position,
    other: &mut Physics,
    other_position: &mut Position,
    normal: Vec2,
) {
    let tangent_mask = Vec2::ONE - normal.abs();
    let relative_velocity = body.velocity - other.velocity;
    let depth = (body.half_extents + other.half_extents) - (position.xy() - other_position.xy()).abs();
    let position_fix = depth * normal;
    let mut velocity_fix = relative_velocity.abs() * normal * 2.0;
    let friction = -relative_velocity * tangent_mask * FRICTION;
    if relative_velocity.dot(normal) > 0.0 {
        velocity_fix = Vec2::ZERO;
    }

    let (weight, other_weight) = if other.fixed {
        (1.0, 0.0)
    } else if body.fixed {
        (0.0, 1.0)
    } else {
        (0.5, 0.5)
    };

    let impulse = velocity_fix + friction;
    body.velocity += impulse * weight;
    position.set_xy(position.xy() + position_fix * weight);
    other.velocity -= impulse * other_weight;
    other_position.set_xy(other_position.xy() - position_fix * other_weight);
}
