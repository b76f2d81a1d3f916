use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::{AirData, PhysicsComponent, SpatialComponent};
use crate::resources::EnvironmentResource;

const MIN_AIRSPEED_THRESHOLD: f64 = 1e-6;

/// Air data values for one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirDataValues {
    pub true_airspeed: f64,
    pub alpha: f64,
    pub beta: f64,
    pub density: f64,
    pub dynamic_pressure: f64,
    /// Velocity relative to the air, body axes
    pub relative_velocity: Vector3<f64>,
}

impl AirDataValues {
    pub fn into_air_data(self, wind: Vector3<f64>) -> AirData {
        AirData {
            true_airspeed: self.true_airspeed,
            alpha: self.alpha,
            beta: self.beta,
            dynamic_pressure: self.dynamic_pressure,
            density: self.density,
            relative_velocity: self.relative_velocity,
            wind_velocity: wind,
        }
    }
}

/// Air data from the centre of mass velocity and the local wind.
///
/// Body axes are x forward, y up, z starboard: alpha is positive with the flow
/// striking the underside, beta positive with the flow arriving from starboard.
pub fn calculate_air_data(
    velocity: &Vector3<f64>,
    attitude: &UnitQuaternion<f64>,
    wind: &Vector3<f64>,
    density: f64,
) -> AirDataValues {
    let relative_velocity = attitude.inverse() * (velocity - wind);
    let airspeed = relative_velocity.norm();

    let (alpha, beta) = if airspeed > MIN_AIRSPEED_THRESHOLD {
        (
            (-relative_velocity.y).atan2(relative_velocity.x),
            (relative_velocity.z / airspeed).clamp(-1.0, 1.0).asin(),
        )
    } else {
        (0.0, 0.0)
    };

    AirDataValues {
        true_airspeed: airspeed,
        alpha,
        beta,
        density,
        dynamic_pressure: 0.5 * density * airspeed * airspeed,
        relative_velocity,
    }
}

pub fn air_data_system(
    mut query: Query<(&SpatialComponent, &PhysicsComponent, &mut AirData)>,
    environment: Res<EnvironmentResource>,
) {
    for (spatial, physics, mut air_data) in query.iter_mut() {
        let centre = spatial.body_to_world(&physics.centre_of_mass);
        let wind = environment.get_wind(&centre);
        *air_data = calculate_air_data(
            &spatial.velocity,
            &spatial.attitude,
            &wind,
            environment.get_density(&centre),
        )
        .into_air_data(wind);
    }
}
