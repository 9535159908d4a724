//! Error types.
//!
//! Every error here marks a caller bug or a bad configuration, not a runtime
//! condition to recover from. The ergonomic accessors on
//! [`World`](crate::ecs::World) panic with these messages; the `try_*` forms
//! hand them back so callers can bubble them up with `?`.

use std::path::PathBuf;

use glam::IVec2;
use thiserror::Error;

use crate::ecs::Entity;

/// Contract violations on component stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Lookup or removal of a component the entity doesn't have.
    #[error("entity {entity} has no `{component}` component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// A second component of the same type for one entity.
    #[error("entity {entity} already has a `{component}` component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },
}

impl EcsError {
    pub(crate) fn missing<T>(entity: Entity) -> Self {
        Self::MissingComponent {
            entity,
            component: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub(crate) fn duplicate<T>(entity: Entity) -> Self {
        Self::DuplicateComponent {
            entity,
            component: short_type_name(std::any::type_name::<T>()),
        }
    }
}

/// Misuse of the [`CollisionMap`](crate::physics::CollisionMap).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionMapError {
    /// `mark` or `bucket_at` before the first `configure`.
    #[error("collision map used before configure()")]
    NotConfigured,

    /// Cell scale must be finite and positive, dimensions positive, and the
    /// far corner `offset + dims` must fit in an `i32`.
    #[error(
        "invalid collision map configuration: cell scale {cell_scale}, dims {dims}, offset {offset}"
    )]
    InvalidConfiguration {
        cell_scale: f32,
        dims: IVec2,
        offset: IVec2,
    },

    /// `mark` with minima above maxima on some axis.
    #[error("inverted cell range: minima {minima} exceeds maxima {maxima}")]
    InvertedRange { minima: IVec2, maxima: IVec2 },
}

/// Failures loading a [`PhysicsConfig`](crate::physics::PhysicsConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Strip the module path from a type name (`perch::components::Position` →
/// `Position`).
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    // Generic parameters contain `::` too; only split the outer path.
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("perch::components::Position"), "Position");
        assert_eq!(short_type_name("u32"), "u32");
        assert_eq!(
            short_type_name("alloc::vec::Vec<perch::components::Position>"),
            "Vec<perch::components::Position>"
        );
    }

    #[test]
    fn messages_name_entity_and_type() {
        let err = EcsError::missing::<crate::components::Position>(Entity(3));
        assert_eq!(err.to_string(), "entity #3 has no `Position` component");
        let err = EcsError::duplicate::<crate::components::Position>(Entity(3));
        assert_eq!(err.to_string(), "entity #3 already has a `Position` component");
    }
}
