use bevy::prelude::*;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct MassModel {
    /// Total mass of the aircraft (Kg).
    pub mass: f64,
    /// The inertia matrix (3x3) about the centre of mass, body axes.
    pub inertia: Matrix3<f64>,
    /// Precomputed inverse of the inertia matrix.
    pub inertia_inv: Matrix3<f64>,
    /// Height of the centre of gravity above the chord line (m).
    pub cg_height: f64,
}

impl Default for MassModel {
    fn default() -> Self {
        Self::trainer()
    }
}

impl MassModel {
    /// Creates a mass model from roll, yaw and pitch inertias in simulation body axes
    /// (x forward, y up, z starboard) with the roll/yaw product `ixy`.
    ///
    /// If the inertia matrix is not invertible a zero inverse is used and an error logged.
    pub fn new(mass: f64, ixx: f64, iyy: f64, izz: f64, ixy: f64, cg_height: f64) -> Self {
        let inertia = Matrix3::from_columns(&[
            Vector3::new(ixx, -ixy, 0.0),
            Vector3::new(-ixy, iyy, 0.0),
            Vector3::new(0.0, 0.0, izz),
        ]);
        let inertia_inv = inertia.try_inverse().unwrap_or_else(|| {
            error!("Inertia matrix is uninvertable, defaulting to zero matrix.");
            Matrix3::zeros()
        });

        Self {
            mass,
            inertia,
            inertia_inv,
            cg_height,
        }
    }

    pub fn trainer() -> Self {
        Self::new(6.0, 1.2, 1.9, 0.8, 0.05, -0.03)
    }
}
