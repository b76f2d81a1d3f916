use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::{ConstraintJoint, PhysicsComponent, SpatialComponent};
use crate::resources::PhysicsConfig;

/// Integrates every body one fixed timestep, then enforces its joint.
pub fn physics_integrator_system(
    mut query: Query<(
        &PhysicsComponent,
        &mut SpatialComponent,
        Option<&ConstraintJoint>,
    )>,
    config: Res<PhysicsConfig>,
) {
    let dt = config.timestep;

    for (physics, mut spatial, joint) in query.iter_mut() {
        integrate_state(physics, &mut spatial, dt);
        apply_velocity_limits(
            &mut spatial,
            config.max_velocity,
            config.max_angular_velocity,
        );
        if let Some(joint) = joint {
            enforce_joint(joint, &mut spatial);
        }
    }
}

/// Structure to hold state derivatives for RK integration
struct StateDerivatives {
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
    angular_acceleration: Vector3<f64>,
}

/// Net force and moment are held constant across the step; only the gyroscopic
/// term and the body-axis moment vary with the intermediate states.
fn calculate_derivatives(
    physics: &PhysicsComponent,
    velocity: &Vector3<f64>,
    attitude: &UnitQuaternion<f64>,
    angular_velocity: &Vector3<f64>,
) -> StateDerivatives {
    let acceleration = physics.net_force / physics.mass;

    let omega = *angular_velocity;
    let gyro_term = omega.cross(&(physics.inertia * omega));
    let net_moment_body = attitude.inverse() * physics.net_moment;
    let angular_acceleration = physics.inertia_inv * (net_moment_body - gyro_term);

    StateDerivatives {
        velocity: *velocity,
        acceleration,
        angular_acceleration,
    }
}

/// Body rates rotate the attitude on the right
fn advance_attitude(
    attitude: &UnitQuaternion<f64>,
    angular_velocity: &Vector3<f64>,
    dt: f64,
) -> UnitQuaternion<f64> {
    if angular_velocity.norm() > 0.0 {
        attitude * UnitQuaternion::from_scaled_axis(angular_velocity * dt)
    } else {
        *attitude
    }
}

/// Classic RK4 on the centre of mass and the body rates. The body-local origin is
/// recovered from the centre of mass afterwards.
fn integrate_state(physics: &PhysicsComponent, spatial: &mut SpatialComponent, dt: f64) {
    let initial_centre = spatial.body_to_world(&physics.centre_of_mass);
    let initial_velocity = spatial.velocity;
    let initial_attitude = spatial.attitude;
    let initial_angular_velocity = spatial.angular_velocity;

    let k1 = calculate_derivatives(
        physics,
        &initial_velocity,
        &initial_attitude,
        &initial_angular_velocity,
    );

    let k2_velocity = initial_velocity + k1.acceleration * (dt / 2.0);
    let k2_angular_vel = initial_angular_velocity + k1.angular_acceleration * (dt / 2.0);
    let k2_attitude = advance_attitude(&initial_attitude, &k2_angular_vel, dt / 2.0);
    let k2 = calculate_derivatives(physics, &k2_velocity, &k2_attitude, &k2_angular_vel);

    let k3_velocity = initial_velocity + k2.acceleration * (dt / 2.0);
    let k3_angular_vel = initial_angular_velocity + k2.angular_acceleration * (dt / 2.0);
    let k3_attitude = advance_attitude(&initial_attitude, &k3_angular_vel, dt / 2.0);
    let k3 = calculate_derivatives(physics, &k3_velocity, &k3_attitude, &k3_angular_vel);

    let k4_velocity = initial_velocity + k3.acceleration * dt;
    let k4_angular_vel = initial_angular_velocity + k3.angular_acceleration * dt;
    let k4_attitude = advance_attitude(&initial_attitude, &k4_angular_vel, dt);
    let k4 = calculate_derivatives(physics, &k4_velocity, &k4_attitude, &k4_angular_vel);

    let centre = initial_centre
        + (dt / 6.0) * (k1.velocity + 2.0 * k2.velocity + 2.0 * k3.velocity + k4.velocity);
    spatial.velocity = initial_velocity
        + (dt / 6.0)
            * (k1.acceleration + 2.0 * k2.acceleration + 2.0 * k3.acceleration + k4.acceleration);
    spatial.angular_velocity = initial_angular_velocity
        + (dt / 6.0)
            * (k1.angular_acceleration
                + 2.0 * k2.angular_acceleration
                + 2.0 * k3.angular_acceleration
                + k4.angular_acceleration);

    let omega_avg = (1.0 / 6.0)
        * (initial_angular_velocity + 2.0 * k2_angular_vel + 2.0 * k3_angular_vel + k4_angular_vel);
    let attitude = advance_attitude(&initial_attitude, &omega_avg, dt);
    spatial.attitude = UnitQuaternion::from_quaternion(attitude.into_inner().normalize());
    spatial.position = centre - spatial.attitude * physics.centre_of_mass;
}

/// Applies velocity and angular velocity limits to prevent excessive motion.
fn apply_velocity_limits(
    spatial: &mut SpatialComponent,
    max_velocity: f64,
    max_angular_velocity: f64,
) {
    let velocity_norm = spatial.velocity.norm();
    if velocity_norm > max_velocity {
        spatial.velocity *= max_velocity / velocity_norm;
    }

    let angular_velocity_norm = spatial.angular_velocity.norm();
    if angular_velocity_norm > max_angular_velocity {
        spatial.angular_velocity *= max_angular_velocity / angular_velocity_norm;
    }
}

/// Remove motion along locked body axes and pin a translation-locked anchor in place.
fn enforce_joint(joint: &ConstraintJoint, spatial: &mut SpatialComponent) {
    let motions = &joint.constraint.motions;
    let velocity_body = spatial.attitude.inverse() * spatial.velocity;
    spatial.velocity = spatial.attitude * motions.project_linear(&velocity_body);
    spatial.angular_velocity = motions.project_angular(&spatial.angular_velocity);

    if motions.linear.iter().all(|m| m.is_locked()) {
        let drift = joint.constraint.connected_anchor
            - spatial.body_to_world(&joint.constraint.anchor);
        spatial.position += drift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Constraint, ConstraintMode};
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;

    fn body(centre_of_mass: Vector3<f64>) -> PhysicsComponent {
        PhysicsComponent::new(1000.0, Matrix3::identity() * 1000.0, centre_of_mass)
    }

    #[test]
    fn test_energy_conservation() {
        let mass = 1000.0;
        let gravity = Vector3::new(0.0, -9.81, 0.0);
        let mut physics = body(Vector3::zeros());
        physics.net_force = mass * gravity;

        let initial_height = 1000.0;
        let initial_speed = 50.0;
        let mut spatial = SpatialComponent {
            position: Vector3::new(0.0, initial_height, 0.0),
            velocity: Vector3::new(initial_speed, 0.0, 0.0),
            ..Default::default()
        };
        let initial_energy =
            0.5 * mass * initial_speed * initial_speed + mass * 9.81 * initial_height;

        for _ in 0..100 {
            integrate_state(&physics, &mut spatial, 0.01);

            let energy = 0.5 * mass * spatial.velocity.norm_squared()
                + mass * 9.81 * spatial.position.y;
            let error = (energy - initial_energy).abs() / initial_energy;
            assert!(error < 0.01, "Energy not conserved: error = {:.4}%", error * 100.0);
        }
    }

    #[test]
    fn test_rotation_about_centre_of_mass() {
        let centre = Vector3::new(-0.06, -0.03, 0.0);
        let physics = body(centre);
        let mut spatial = SpatialComponent {
            angular_velocity: Vector3::new(0.0, 0.0, 0.5),
            ..Default::default()
        };
        let before = spatial.body_to_world(&centre);

        for _ in 0..100 {
            integrate_state(&physics, &mut spatial, 0.01);
        }

        assert_relative_eq!(spatial.body_to_world(&centre), before, epsilon = 1e-9);
        let (_, _, pitch) = spatial.attitude.euler_angles();
        assert_relative_eq!(pitch, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_velocity_limits() {
        let mut spatial = SpatialComponent {
            velocity: Vector3::new(500.0, 0.0, 0.0),
            angular_velocity: Vector3::new(0.0, 50.0, 0.0),
            ..Default::default()
        };
        apply_velocity_limits(&mut spatial, 200.0, 10.0);
        assert_relative_eq!(spatial.velocity.norm(), 200.0);
        assert_relative_eq!(spatial.angular_velocity.norm(), 10.0);
    }

    #[test]
    fn test_longitudinal_joint_only_pitches() {
        let centre = Vector3::new(-0.05, 0.0, 0.0);
        let joint = ConstraintJoint::new(
            1,
            Constraint::new(ConstraintMode::Longitudinal, centre, centre),
        );
        let mut spatial = SpatialComponent {
            position: Vector3::new(0.01, 0.0, 0.0),
            velocity: Vector3::new(1.0, 2.0, 3.0),
            angular_velocity: Vector3::new(0.1, 0.2, 0.3),
            ..Default::default()
        };

        enforce_joint(&joint, &mut spatial);

        assert_eq!(spatial.velocity, Vector3::zeros());
        assert_eq!(spatial.angular_velocity, Vector3::new(0.0, 0.0, 0.3));
        assert_relative_eq!(spatial.body_to_world(&centre), centre, epsilon = 1e-12);
    }
}
