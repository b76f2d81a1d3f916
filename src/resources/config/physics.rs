use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::resources::ConfigError;
use crate::utils::{DEFAULT_TIMESTEP, GRAVITY, MAX_TIMESTEP, MIN_TIMESTEP};

/// Rigid-body integration settings for the virtual tunnel.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed integration timestep [s]
    pub timestep: f64,
    /// Gravitational acceleration, simulation axes [m/s²]
    pub gravity: Vector3<f64>,
    pub max_velocity: f64,
    pub max_angular_velocity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: DEFAULT_TIMESTEP,
            gravity: Vector3::new(0.0, -GRAVITY, 0.0),
            max_velocity: 200.0,
            max_angular_velocity: 20.0,
        }
    }
}

impl PhysicsConfig {
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn validate_timestep(timestep: f64) -> Result<f64, ConfigError> {
        if timestep.is_finite() && (MIN_TIMESTEP..=MAX_TIMESTEP).contains(&timestep) {
            Ok(timestep)
        } else {
            Err(ConfigError::invalid("timestep", timestep))
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_timestep(self.timestep)?;
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::invalid("gravity", self.gravity));
        }
        if self.max_velocity <= 0.0 {
            return Err(ConfigError::invalid("max_velocity", self.max_velocity));
        }
        if self.max_angular_velocity <= 0.0 {
            return Err(ConfigError::invalid(
                "max_angular_velocity",
                self.max_angular_velocity,
            ));
        }
        Ok(())
    }
}
