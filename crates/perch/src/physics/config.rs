//! Simulation settings, loadable from JSON.
//!
//! ```json
//! {
//!   "drag": 0.1,
//!   "gravity": 0.1,
//!   "cell_scale": 0.1,
//!   "grid_dims": [200, 200],
//!   "grid_offset": [-100, -100]
//! }
//! ```
//!
//! Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::IVec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Velocity multiplier per second for bodies with drag (1.0 = none).
    pub drag: f32,
    /// Subtracted from `velocity.y` every step.
    pub gravity: f32,
    /// Side of one broad-phase cell in world units.
    pub cell_scale: f32,
    pub grid_dims: IVec2,
    /// Cell coordinate of the grid's lower-left cell.
    pub grid_offset: IVec2,
    /// Length of one fixed step in seconds.
    pub fixed_dt: f32,
    /// Frame time beyond this is dropped instead of simulated.
    pub max_frame_delta: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            drag: 1.0,
            gravity: 0.0,
            cell_scale: 0.1,
            grid_dims: IVec2::new(200, 200),
            grid_offset: IVec2::new(-100, -100),
            fixed_dt: 1.0 / 60.0,
            max_frame_delta: 0.25,
        }
    }
}

impl PhysicsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading physics config from {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_drag(self.drag)?;
        check_gravity(self.gravity)?;
        if !self.cell_scale.is_finite() || self.cell_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cell_scale must be positive, got {}",
                self.cell_scale
            )));
        }
        if self.grid_dims.x <= 0 || self.grid_dims.y <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid_dims must be positive, got {}",
                self.grid_dims
            )));
        }
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if !self.max_frame_delta.is_finite() || self.max_frame_delta < self.fixed_dt {
            return Err(ConfigError::Invalid(format!(
                "max_frame_delta must be at least fixed_dt, got {}",
                self.max_frame_delta
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_drag(drag: f32) -> Result<(), ConfigError> {
    if !drag.is_finite() || drag < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "drag must be finite and non-negative, got {drag}"
        )));
    }
    Ok(())
}

pub(crate) fn check_gravity(gravity: f32) -> Result<(), ConfigError> {
    if !gravity.is_finite() {
        return Err(ConfigError::Invalid(format!(
            "gravity must be finite, got {gravity}"
        )));
    }
    Ok(())
}
