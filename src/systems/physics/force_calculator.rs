use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{PhysicsComponent, ReferenceFrame, SpatialComponent};
use crate::resources::PhysicsConfig;

/// Net force and the net moment about the centre of mass, both in world axes,
/// including gravity.
pub fn calculate_net_forces_moments(
    physics: &PhysicsComponent,
    spatial: &SpatialComponent,
    gravity: &Vector3<f64>,
) -> (Vector3<f64>, Vector3<f64>) {
    let mut net_force = physics.weight(gravity);
    let mut net_moment = Vector3::zeros();

    for force in &physics.forces {
        let force_inertial = match force.frame {
            ReferenceFrame::Body => spatial.attitude * force.vector,
            ReferenceFrame::Inertial => force.vector,
        };
        net_force += force_inertial;

        if let Some(point) = force.point {
            let point_inertial = spatial.attitude * point;
            net_moment += point_inertial.cross(&force_inertial);
        }
    }

    for moment in &physics.moments {
        net_moment += match moment.frame {
            ReferenceFrame::Body => spatial.attitude * moment.vector,
            ReferenceFrame::Inertial => moment.vector,
        };
    }

    (net_force, net_moment)
}

/// Sums the loads queued this step into the net force and moment and clears the queue.
pub fn force_calculator_system(
    mut query: Query<(&mut PhysicsComponent, &SpatialComponent)>,
    config: Res<PhysicsConfig>,
) {
    for (mut physics, spatial) in query.iter_mut() {
        let (net_force, net_moment) =
            calculate_net_forces_moments(&physics, spatial, &config.gravity);
        physics.clear_forces();
        physics.net_force = net_force;
        physics.net_moment = net_moment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Force, ForceCategory, Moment};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, UnitQuaternion};

    #[test]
    fn test_gravity_only() {
        let physics = PhysicsComponent::new(2.0, Matrix3::identity(), Vector3::zeros());
        let (force, moment) = calculate_net_forces_moments(
            &physics,
            &SpatialComponent::default(),
            &Vector3::new(0.0, -9.8, 0.0),
        );
        assert_relative_eq!(force, Vector3::new(0.0, -19.6, 0.0));
        assert_eq!(moment, Vector3::zeros());
    }

    #[test]
    fn test_offset_body_force_makes_moment() {
        let mut physics = PhysicsComponent::new(1.0, Matrix3::identity(), Vector3::zeros());
        physics.add_force(Force::body_at(
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(-0.5, 0.0, 0.0),
            ForceCategory::Aerodynamic,
        ));
        physics.add_moment(Moment::body(
            Vector3::new(0.0, 0.0, 1.0),
            ForceCategory::Aerodynamic,
        ));

        let spatial = SpatialComponent {
            attitude: UnitQuaternion::identity(),
            ..Default::default()
        };
        let (force, moment) = calculate_net_forces_moments(&physics, &spatial, &Vector3::zeros());

        assert_relative_eq!(force, Vector3::new(0.0, 10.0, 0.0));
        // Lift behind the centre of mass pitches the nose down
        assert_relative_eq!(moment, Vector3::new(0.0, 0.0, -4.0));
    }
}
