use bevy::prelude::*;
use nalgebra::Vector3;

use crate::utils::{deg_to_rad, pitch_rotation, yaw_rotation, SEA_LEVEL_DENSITY};

/// Uniform free stream filling the test section.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EnvironmentResource {
    /// Wind velocity, simulation axes [m/s]
    pub wind: Vector3<f64>,
    pub density: f64,
}

impl Default for EnvironmentResource {
    fn default() -> Self {
        Self {
            wind: Vector3::zeros(),
            density: SEA_LEVEL_DENSITY,
        }
    }
}

impl EnvironmentResource {
    pub fn new(density: f64) -> Self {
        Self {
            density,
            ..Default::default()
        }
    }

    pub fn get_wind(&self, _position: &Vector3<f64>) -> Vector3<f64> {
        self.wind
    }

    pub fn get_density(&self, _position: &Vector3<f64>) -> f64 {
        self.density
    }
}

/// Wind vector for a flow direction given as azimuth and elevation in degrees.
///
/// The forward axis is turned by elevation (positive down) and then azimuth
/// (positive towards starboard) before scaling by `speed`.
pub fn wind_vector(azimuth_deg: f64, elevation_deg: f64, speed: f64) -> Vector3<f64> {
    let direction = yaw_rotation(-deg_to_rad(azimuth_deg))
        * pitch_rotation(-deg_to_rad(elevation_deg))
        * Vector3::x();
    direction * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_test_flow_blows_aft() {
        let wind = wind_vector(180.0, 0.0, 10.0);
        assert_relative_eq!(wind, Vector3::new(-10.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_azimuth_and_elevation_directions() {
        let starboard = wind_vector(90.0, 0.0, 1.0);
        assert_relative_eq!(starboard, Vector3::z(), epsilon = 1e-12);

        let down = wind_vector(0.0, 90.0, 1.0);
        assert_relative_eq!(down, -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_speed_is_still_air() {
        assert_eq!(wind_vector(180.0, 0.0, 0.0).norm(), 0.0);
    }
}
