use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{rad_to_deg, SEA_LEVEL_DENSITY};

/// Flow conditions at the model's centre of mass, refreshed every step.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct AirData {
    /// [m/s]
    pub true_airspeed: f64,
    /// [rad]
    pub alpha: f64,
    /// [rad]
    pub beta: f64,
    /// [Pa]
    pub dynamic_pressure: f64,
    /// [kg/m³]
    pub density: f64,
    /// Model velocity through the air, body axes [m/s]
    pub relative_velocity: Vector3<f64>,
    /// Tunnel flow, world axes [m/s]
    pub wind_velocity: Vector3<f64>,
}

impl Default for AirData {
    fn default() -> Self {
        Self {
            true_airspeed: 0.0,
            alpha: 0.0,
            beta: 0.0,
            dynamic_pressure: 0.0,
            density: SEA_LEVEL_DENSITY,
            relative_velocity: Vector3::zeros(),
            wind_velocity: Vector3::zeros(),
        }
    }
}

impl AirData {
    pub fn alpha_deg(&self) -> f64 {
        rad_to_deg(self.alpha)
    }

    pub fn beta_deg(&self) -> f64 {
        rad_to_deg(self.beta)
    }

    /// Whether the dynamic pressure is large enough to load the model.
    pub fn is_flowing(&self, threshold: f64) -> bool {
        self.dynamic_pressure > threshold
    }
}
