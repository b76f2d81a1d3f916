use serde::{Deserialize, Serialize};

use crate::resources::ConfigError;
use crate::utils::{SEA_LEVEL_DENSITY, TEST_FLOW_AZIMUTH, TEST_FLOW_ELEVATION, TEST_FLOW_SPEED};

/// Nominal free stream used while measuring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowCondition {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Free-stream speed [m/s]
    pub speed: f64,
    /// Air density [kg/m³]
    pub density: f64,
}

impl Default for FlowCondition {
    fn default() -> Self {
        Self {
            azimuth_deg: TEST_FLOW_AZIMUTH,
            elevation_deg: TEST_FLOW_ELEVATION,
            speed: TEST_FLOW_SPEED,
            density: SEA_LEVEL_DENSITY,
        }
    }
}

impl FlowCondition {
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// q = ½ρV²
    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.density * self.speed * self.speed
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.azimuth_deg.is_finite() {
            return Err(ConfigError::invalid("azimuth_deg", self.azimuth_deg));
        }
        if !self.elevation_deg.is_finite() {
            return Err(ConfigError::invalid("elevation_deg", self.elevation_deg));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::invalid("speed", self.speed));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(ConfigError::invalid("density", self.density));
        }
        Ok(())
    }
}
