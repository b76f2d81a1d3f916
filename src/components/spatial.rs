use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::{deg_to_rad, pitch_rotation, yaw_rotation};

/// Spatial state of a rigid body in simulation axes.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct SpatialComponent {
    /// World position of the body-local origin [m]
    pub position: Vector3<f64>,

    /// Linear velocity of the centre of mass, world axes [m/s]
    pub velocity: Vector3<f64>,

    /// Attitude quaternion (rotation from body to world frame)
    pub attitude: UnitQuaternion<f64>,

    /// Angular velocity in body frame [rad/s]
    pub angular_velocity: Vector3<f64>,
}

impl Default for SpatialComponent {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

impl SpatialComponent {
    pub fn at_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// World coordinates of a body-local point
    pub fn body_to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.position + self.attitude * local
    }

    /// Rotate to `attitude` about the body-local point `pivot`, keeping that point fixed
    /// in the world, and zero all velocities.
    pub fn reorient_about(&mut self, pivot: &Vector3<f64>, attitude: UnitQuaternion<f64>) {
        let pivot_world = self.body_to_world(pivot);
        self.attitude = attitude;
        self.position = pivot_world - attitude * pivot;
        self.velocity = Vector3::zeros();
        self.angular_velocity = Vector3::zeros();
    }
}

/// Tunnel attitude of the model: angle of attack and sideslip in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftPose {
    pub alpha_deg: f64,
    pub beta_deg: f64,
}

impl AircraftPose {
    pub fn new(alpha_deg: f64, beta_deg: f64) -> Self {
        Self {
            alpha_deg,
            beta_deg,
        }
    }

    /// Nose up by alpha, then yaw nose left by beta about the world vertical.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        yaw_rotation(deg_to_rad(self.beta_deg)) * pitch_rotation(deg_to_rad(self.alpha_deg))
    }
}
