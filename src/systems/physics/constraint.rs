use bevy::prelude::*;
use nalgebra::{Matrix3, Vector3};

use crate::components::{AxisMotions, ConstraintJoint, PhysicsComponent, Reaction, SpatialComponent};

/// Reaction wrench that stops motion in every locked degree of freedom.
///
/// Locked directions are the constraint's body axes. The force cancels the locked
/// components of the net force; the torque is solved through the inertia so the
/// locked angular accelerations vanish even with cross-coupled inertia. Both are
/// returned in world axes, the torque about the centre of mass.
pub fn calculate_reaction(
    motions: &AxisMotions,
    physics: &PhysicsComponent,
    spatial: &SpatialComponent,
) -> Reaction {
    let to_body = spatial.attitude.inverse();
    let force_body = to_body * physics.net_force;
    let moment_body = to_body * physics.net_moment;

    let linear_free = motions.project_linear(&force_body);
    let reaction_force_body = linear_free - force_body;

    let omega = spatial.angular_velocity;
    let gyro = omega.cross(&(physics.inertia * omega));
    let angular_acceleration = physics.inertia_inv * (moment_body - gyro);

    let locked = Matrix3::from_diagonal(&Vector3::from_fn(|i, _| {
        if motions.angular[i].is_locked() {
            1.0
        } else {
            0.0
        }
    }));
    let system = locked * physics.inertia_inv * locked + (Matrix3::identity() - locked);
    let target = -(locked * angular_acceleration);
    let reaction_torque_body = system
        .try_inverse()
        .map(|inverse| inverse * target)
        .unwrap_or_else(|| -(locked * moment_body));

    Reaction {
        force: spatial.attitude * reaction_force_body,
        torque: spatial.attitude * reaction_torque_body,
    }
}

/// Computes each joint's reaction and adds it to the body's net load.
///
/// The stored torque is taken about the joint's anchor.
pub fn constraint_reaction_system(
    mut query: Query<(&mut ConstraintJoint, &mut PhysicsComponent, &SpatialComponent)>,
) {
    for (mut joint, mut physics, spatial) in query.iter_mut() {
        let reaction = calculate_reaction(&joint.constraint.motions, &physics, spatial);

        physics.net_force += reaction.force;
        physics.net_moment += reaction.torque;

        let centre = spatial.body_to_world(&physics.centre_of_mass);
        let anchor = spatial.body_to_world(&joint.constraint.anchor);
        joint.reaction = Reaction {
            force: reaction.force,
            torque: reaction.torque + (centre - anchor).cross(&reaction.force),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ConstraintMode;
    use approx::assert_relative_eq;

    fn loaded_body() -> PhysicsComponent {
        let mut physics = PhysicsComponent::new(
            3.0,
            Matrix3::new(1.0, -0.1, 0.0, -0.1, 2.0, 0.0, 0.0, 0.0, 1.5),
            Vector3::zeros(),
        );
        physics.net_force = Vector3::new(1.0, -29.0, 0.5);
        physics.net_moment = Vector3::new(0.3, -0.2, 0.7);
        physics
    }

    #[test]
    fn test_fixed_cancels_everything() {
        let physics = loaded_body();
        let reaction = calculate_reaction(
            &ConstraintMode::Fixed.motions(),
            &physics,
            &SpatialComponent::default(),
        );
        assert_relative_eq!(reaction.force, -physics.net_force, epsilon = 1e-12);
        assert_relative_eq!(reaction.torque, -physics.net_moment, epsilon = 1e-12);
    }

    #[test]
    fn test_free_leaves_body_alone() {
        let reaction = calculate_reaction(
            &ConstraintMode::Free.motions(),
            &loaded_body(),
            &SpatialComponent::default(),
        );
        assert_eq!(reaction, Reaction::zero());
    }

    #[test]
    fn test_lateral_locks_pitch_and_yaw_acceleration() {
        let mut physics = loaded_body();
        let spatial = SpatialComponent::default();
        let reaction =
            calculate_reaction(&ConstraintMode::Lateral.motions(), &physics, &spatial);

        physics.net_moment += reaction.torque;
        let acceleration = physics.inertia_inv * physics.net_moment;
        assert!(acceleration.x.abs() > 1e-6);
        assert_relative_eq!(acceleration.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(acceleration.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(physics.net_force + reaction.force, Vector3::zeros(), epsilon = 1e-12);
    }
}
