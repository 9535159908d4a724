//! # Gameplay Components
//!
//! The plain-data components the physics step and the frame loop share:
//!
//! | Component | Read by | Written by |
//! |---|---|---|
//! | [`Position`] | physics, rendering | physics, game logic |
//! | [`Sprite`] | rendering | `Sprite::fixed_update` (animation) |
//! | [`Status`] | [`Roster::reap`](crate::ecs::Roster::reap), game logic | collision callbacks, [`Ai`] |
//! | [`Ai`] | [`Ai::update_all`] | its own behaviour |
//!
//! Rendering itself lives outside this crate; [`Sprite`] only carries the
//! texture key and layout a renderer would need.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ecs::{Commands, Component, Entity, World};
use crate::math::{Vec2, Vec3};

// ── Position ────────────────────────────────────────────────────────────

/// Where an entity is. `z` is a draw-order hint only; collision ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub Vec3);

impl Position {
    /// A position on the `z = 0` layer.
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec3::new(x, y, 0.0))
    }

    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// The collision-relevant part.
    pub fn xy(&self) -> Vec2 {
        self.0.truncate()
    }

    pub fn set_xy(&mut self, xy: Vec2) {
        self.0.x = xy.x;
        self.0.y = xy.y;
    }

    pub fn depth(&self) -> f32 {
        self.0.z
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self(v.extend(0.0))
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl Component for Position {}

// ── Sprite ──────────────────────────────────────────────────────────────

/// Cycles through a list of textures, showing each for a fixed number of
/// frames.
///
/// ```text
/// textures = [a, b], frames_per_texture = 3
/// frame:   1 2 3 4 5 0 1 2 ...
/// shows:   a a b b b a a a ...
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationLoop {
    pub textures: Vec<String>,
    pub frames_per_texture: u32,
    /// Frame counter, wraps at `textures.len() * frames_per_texture`.
    pub cursor: u32,
}

impl AnimationLoop {
    pub fn new(textures: Vec<String>, frames_per_texture: u32) -> Self {
        Self {
            textures,
            frames_per_texture,
            cursor: 0,
        }
    }

    /// Step one frame and return the texture to show. `None` for an empty
    /// loop.
    pub fn advance(&mut self) -> Option<&str> {
        let total = self.textures.len() as u32 * self.frames_per_texture;
        if total == 0 {
            return None;
        }
        self.cursor = (self.cursor + 1) % total;
        let index = (self.cursor / self.frames_per_texture) as usize;
        self.textures.get(index).map(String::as_str)
    }
}

/// What a renderer needs to draw a textured quad at an entity's [`Position`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Texture key (asset path).
    pub texture: String,
    /// Half-size of the quad in world units.
    pub scale: Vec2,
    pub depth: f32,
    /// Drawn in screen space, ignoring the camera.
    pub screenlock: bool,
    pub animation: Option<AnimationLoop>,
}

impl Sprite {
    pub fn new(texture: impl Into<String>, scale: Vec2) -> Self {
        Self {
            texture: texture.into(),
            scale,
            depth: 0.0,
            screenlock: false,
            animation: None,
        }
    }

    pub fn with_animation(mut self, animation: AnimationLoop) -> Self {
        self.animation = Some(animation);
        self
    }
}

impl Component for Sprite {
    fn fixed_update(&mut self, _entity: Entity) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        if let Some(texture) = animation.advance() {
            if texture != self.texture {
                self.texture = texture.to_owned();
            }
        }
    }
}

// ── Status ──────────────────────────────────────────────────────────────

/// Which side a creature is on. Damage callbacks compare alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i8)]
pub enum Alignment {
    Evil = -1,
    #[default]
    Neutral = 0,
    Good = 1,
}

/// Health, armor and allegiance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub health: i32,
    pub armor: i32,
    pub alignment: Alignment,
}

impl Status {
    pub fn new(health: i32, armor: i32, alignment: Alignment) -> Self {
        Self {
            health,
            armor,
            alignment,
        }
    }

    /// Dead creatures are reaped by the roster at the start of the next frame.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract `amount` from health.
    pub fn damage(&mut self, amount: i32) {
        self.health -= amount;
    }
}

impl Component for Status {}

// ── Ai ──────────────────────────────────────────────────────────────────

/// What an [`Ai`] does each frame: `(self, frame_dt, commands)`.
pub type Behaviour = Box<dyn FnMut(Entity, f32, &mut Commands)>;

/// Per-entity game logic, run once per frame before the physics step.
///
/// The behaviour runs while the `Ai` store is borrowed, so it can't touch
/// the world directly. It records what it wants into a [`Commands`] queue
/// instead; [`Ai::update_all`] applies every queue once all behaviours ran.
pub struct Ai {
    behaviour: Behaviour,
    pending: Commands,
}

impl Ai {
    pub fn new(behaviour: impl FnMut(Entity, f32, &mut Commands) + 'static) -> Self {
        Self {
            behaviour: Box::new(behaviour),
            pending: Commands::new(),
        }
    }

    /// Run every `Ai` for a frame of `dt` seconds, then apply what they
    /// queued in store order. Returns how many commands ran.
    ///
    /// ```text
    /// world.delta_update::<Ai>(dt)   ← each behaviour fills its own queue
    /// gather the queues              ← store order
    /// apply                          ← sync point
    /// ```
    pub fn update_all(world: &mut World, dt: f32) -> usize {
        world.delta_update::<Ai>(dt);
        let mut queued = Commands::new();
        world.for_each::<Ai>(|_, ai| queued.append(&mut ai.pending));
        let ran = queued.apply(world);
        for err in queued.take_errors() {
            log::debug!("ai command dropped: {}", err);
        }
        ran
    }
}

impl Component for Ai {
    fn delta_update(&mut self, entity: Entity, dt: f32) {
        (self.behaviour)(entity, dt, &mut self.pending);
    }
}

impl fmt::Debug for Ai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ai").field("pending", &self.pending.len()).finish()
    }
}
