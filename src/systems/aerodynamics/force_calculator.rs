use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{
    AirData, AircraftAeroCoefficients, AircraftGeometry, ControlState, Force, ForceCategory,
    Moment, PhysicsComponent, SpatialComponent,
};
use crate::systems::AxisTransform;

/// Chord fraction the aerodynamic model is referenced to
const AERO_REFERENCE_CHORD: f64 = 0.25;

const MIN_DYNAMIC_PRESSURE: f64 = 1e-9;

/// Aerodynamic force and moment in body axes, the moment about the quarter chord.
///
/// Moments are referenced to the mean chord on every axis, matching the way the
/// balance reduces its readings.
pub fn calculate_aerodynamic_forces_moments(
    geometry: &AircraftGeometry,
    coeffs: &AircraftAeroCoefficients,
    air_data: &AirData,
    angular_velocity_body: &Vector3<f64>,
    controls: &ControlState,
) -> (Vector3<f64>, Vector3<f64>) {
    if !air_data.is_flowing(MIN_DYNAMIC_PRESSURE) {
        return (Vector3::zeros(), Vector3::zeros());
    }

    let alpha = air_data.alpha;
    let beta = air_data.beta;
    let q_dyn = air_data.dynamic_pressure;
    let airspeed = air_data.true_airspeed;

    // Body rates in aircraft axes: roll about x, pitch about starboard, yaw about down
    let rates = AxisTransform::to_aircraft_moment(angular_velocity_body);
    let p_hat = rates.x * geometry.wing_span / (2.0 * airspeed);
    let q_hat = rates.y * geometry.mac / (2.0 * airspeed);
    let r_hat = rates.z * geometry.wing_span / (2.0 * airspeed);

    let c_l = coeffs.lift.c_l_0
        + coeffs.lift.c_l_alpha * alpha
        + coeffs.lift.c_l_q * q_hat
        + coeffs.lift.c_l_deltae * controls.elevator
        + coeffs.lift.c_l_deltaf * controls.flap;

    let c_d = coeffs.drag.c_d_0
        + coeffs.drag.c_d_k * c_l * c_l
        + coeffs.drag.c_d_deltaf * controls.flap.abs();

    let c_y = coeffs.side_force.c_y_beta * beta + coeffs.side_force.c_y_deltaa * controls.aileron;

    let c_l_roll = coeffs.roll.c_l_beta * beta
        + coeffs.roll.c_l_p * p_hat
        + coeffs.roll.c_l_deltaa * controls.aileron;

    let c_m = coeffs.pitch.c_m_0
        + coeffs.pitch.c_m_alpha * alpha
        + coeffs.pitch.c_m_q * q_hat
        + coeffs.pitch.c_m_deltae * controls.elevator
        + coeffs.pitch.c_m_deltaf * controls.flap;

    let c_n = coeffs.yaw.c_n_beta * beta
        + coeffs.yaw.c_n_r * r_hat
        + coeffs.yaw.c_n_deltaa * controls.aileron;

    // Wind axes expressed in the body: drag against the relative velocity, lift
    // normal to it in the plane of symmetry, side force completing the triad
    let stream = air_data.relative_velocity / airspeed;
    let lift_axis = Vector3::z()
        .cross(&stream)
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::y);
    let side_axis = stream.cross(&lift_axis);

    let force_scale = q_dyn * geometry.wing_area;
    let forces_body = force_scale * (-c_d * stream + c_l * lift_axis + c_y * side_axis);

    let moments_body = AxisTransform::from_aircraft_moment(&Vector3::new(c_l_roll, c_m, c_n))
        * force_scale
        * geometry.mac;

    (forces_body, moments_body)
}

/// Adds aerodynamic loads to each body, applied at the quarter chord.
pub fn aero_force_system(
    mut query: Query<(
        &AirData,
        &SpatialComponent,
        &ControlState,
        &AircraftAeroCoefficients,
        &AircraftGeometry,
        &mut PhysicsComponent,
    )>,
) {
    for (air_data, spatial, controls, coeffs, geometry, mut physics) in query.iter_mut() {
        let (force, moment) = calculate_aerodynamic_forces_moments(
            geometry,
            coeffs,
            air_data,
            &spatial.angular_velocity,
            controls,
        );

        let reference_point = Vector3::new(geometry.chord_station(AERO_REFERENCE_CHORD), 0.0, 0.0);
        let lever = reference_point - physics.centre_of_mass;

        physics.add_force(Force::body_at(force, lever, ForceCategory::Aerodynamic));
        physics.add_moment(Moment::body(moment, ForceCategory::Aerodynamic));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::calculate_air_data;
    use crate::utils::deg_to_rad;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn air_data(alpha_deg: f64) -> AirData {
        let attitude = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), deg_to_rad(alpha_deg));
        let wind = Vector3::new(-10.0, 0.0, 0.0);
        calculate_air_data(&Vector3::zeros(), &attitude, &wind, 1.225).into_air_data(wind)
    }

    #[test]
    fn test_zero_alpha_loads() {
        let geometry = AircraftGeometry::trainer();
        let coeffs = AircraftAeroCoefficients::trainer();
        let (force, moment) = calculate_aerodynamic_forces_moments(
            &geometry,
            &coeffs,
            &air_data(0.0),
            &Vector3::zeros(),
            &ControlState::default(),
        );

        let q_s = 61.25 * geometry.wing_area;
        let c_l = coeffs.lift.c_l_0;
        assert_relative_eq!(force.y, q_s * c_l, epsilon = 1e-9);
        assert_relative_eq!(
            force.x,
            -q_s * (coeffs.drag.c_d_0 + coeffs.drag.c_d_k * c_l * c_l),
            epsilon = 1e-9
        );
        assert_relative_eq!(force.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(moment.z, q_s * geometry.mac * coeffs.pitch.c_m_0, epsilon = 1e-9);
    }

    #[test]
    fn test_flap_increases_lift() {
        let geometry = AircraftGeometry::trainer();
        let coeffs = AircraftAeroCoefficients::trainer();
        let clean = calculate_aerodynamic_forces_moments(
            &geometry,
            &coeffs,
            &air_data(4.0),
            &Vector3::zeros(),
            &ControlState::default(),
        );
        let flapped = calculate_aerodynamic_forces_moments(
            &geometry,
            &coeffs,
            &air_data(4.0),
            &Vector3::zeros(),
            &ControlState {
                flap: deg_to_rad(20.0),
                ..Default::default()
            },
        );
        assert!(flapped.0.norm() > clean.0.norm());
    }

    #[test]
    fn test_no_loads_in_still_air() {
        let (force, moment) = calculate_aerodynamic_forces_moments(
            &AircraftGeometry::trainer(),
            &AircraftAeroCoefficients::trainer(),
            &AirData::default(),
            &Vector3::zeros(),
            &ControlState::default(),
        );
        assert_eq!(force, Vector3::zeros());
        assert_eq!(moment, Vector3::zeros());
    }
}
