use bevy::prelude::*;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Rigid-body mass properties and the loads gathered for the current step.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsComponent {
    pub mass: f64,
    pub inertia: Matrix3<f64>,
    pub inertia_inv: Matrix3<f64>,
    /// Body-local, relative to the origin at the MAC leading edge [m]
    pub centre_of_mass: Vector3<f64>,
    /// World axes
    pub net_force: Vector3<f64>,
    /// About the centre of mass, world axes
    pub net_moment: Vector3<f64>,
    pub forces: Vec<Force>,
    pub moments: Vec<Moment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Force {
    pub vector: Vector3<f64>,
    /// Lever from the centre of mass to the point of application, body axes
    pub point: Option<Vector3<f64>>,
    pub frame: ReferenceFrame,
    pub category: ForceCategory,
}

impl Force {
    /// A body-axis force applied at `lever` from the centre of mass.
    pub fn body_at(vector: Vector3<f64>, lever: Vector3<f64>, category: ForceCategory) -> Self {
        Self {
            vector,
            point: Some(lever),
            frame: ReferenceFrame::Body,
            category,
        }
    }

    /// A world-axis force through the centre of mass.
    pub fn inertial(vector: Vector3<f64>, category: ForceCategory) -> Self {
        Self {
            vector,
            point: None,
            frame: ReferenceFrame::Inertial,
            category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moment {
    pub vector: Vector3<f64>,
    pub frame: ReferenceFrame,
    pub category: ForceCategory,
}

impl Moment {
    pub fn body(vector: Vector3<f64>, category: ForceCategory) -> Self {
        Self {
            vector,
            frame: ReferenceFrame::Body,
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceFrame {
    Body,
    Inertial,
}

/// Where a load comes from. Balance loads are the mount's reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceCategory {
    Aerodynamic,
    Gravity,
    Balance,
}

impl PhysicsComponent {
    pub fn new(mass: f64, inertia: Matrix3<f64>, centre_of_mass: Vector3<f64>) -> Self {
        let inertia_inv = inertia.try_inverse().unwrap_or_else(|| {
            error!("Singular inertia tensor {:?}, using identity", inertia);
            Matrix3::identity()
        });
        Self {
            mass,
            inertia,
            inertia_inv,
            centre_of_mass,
            net_force: Vector3::zeros(),
            net_moment: Vector3::zeros(),
            forces: Vec::new(),
            moments: Vec::new(),
        }
    }

    pub fn weight(&self, gravity: &Vector3<f64>) -> Vector3<f64> {
        gravity * self.mass
    }

    pub fn add_force(&mut self, force: Force) {
        self.forces.push(force);
    }

    pub fn add_moment(&mut self, moment: Moment) {
        self.moments.push(moment);
    }

    /// Sum of the queued forces of one category, before any frame change.
    pub fn queued(&self, category: ForceCategory) -> Vector3<f64> {
        self.forces
            .iter()
            .filter(|force| force.category == category)
            .map(|force| force.vector)
            .sum()
    }

    pub fn clear_forces(&mut self) {
        self.forces.clear();
        self.moments.clear();
        self.net_force = Vector3::zeros();
        self.net_moment = Vector3::zeros();
    }
}
