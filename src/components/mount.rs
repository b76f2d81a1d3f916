use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Degrees of freedom the force balance leaves to the aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintMode {
    /// All six degrees of freedom locked
    #[default]
    Fixed,
    /// Free to roll only
    Lateral,
    /// Free to pitch only
    Longitudinal,
    /// Translation locked, rotation free
    Gimbal,
    /// Unconstrained
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    Locked,
    Free,
}

impl Motion {
    pub fn is_locked(self) -> bool {
        self == Motion::Locked
    }
}

/// Per-axis motion pattern in body-local axes (x forward, y up, z starboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMotions {
    pub linear: [Motion; 3],
    pub angular: [Motion; 3],
}

impl AxisMotions {
    pub const LOCKED: Self = Self {
        linear: [Motion::Locked; 3],
        angular: [Motion::Locked; 3],
    };

    pub const FREE: Self = Self {
        linear: [Motion::Free; 3],
        angular: [Motion::Free; 3],
    };

    /// Zero out locked components of a body-axis vector
    pub fn project_linear(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Self::project(&self.linear, v)
    }

    pub fn project_angular(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Self::project(&self.angular, v)
    }

    fn project(motions: &[Motion; 3], v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::from_fn(|i, _| if motions[i].is_locked() { 0.0 } else { v[i] })
    }
}

impl ConstraintMode {
    pub fn motions(self) -> AxisMotions {
        match self {
            ConstraintMode::Fixed => AxisMotions::LOCKED,
            ConstraintMode::Lateral => AxisMotions {
                linear: [Motion::Locked; 3],
                angular: [Motion::Free, Motion::Locked, Motion::Locked],
            },
            ConstraintMode::Longitudinal => AxisMotions {
                linear: [Motion::Locked; 3],
                angular: [Motion::Locked, Motion::Locked, Motion::Free],
            },
            ConstraintMode::Gimbal => AxisMotions {
                linear: [Motion::Locked; 3],
                angular: [Motion::Free; 3],
            },
            ConstraintMode::Free => AxisMotions::FREE,
        }
    }

    /// Every degree of freedom locked, the only mode a tare is valid in
    pub fn is_rigid(self) -> bool {
        self == ConstraintMode::Fixed
    }
}

/// An immutable six degree of freedom constraint between the aircraft and the world.
///
/// A constraint is never edited once attached: changing mode, pose or centre of
/// gravity means detaching it and attaching a freshly built one.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub mode: ConstraintMode,
    /// Anchor in body-local coordinates [m]
    pub anchor: Vector3<f64>,
    /// Anchor in world coordinates [m]
    pub connected_anchor: Vector3<f64>,
    pub motions: AxisMotions,
}

impl Constraint {
    pub fn new(
        mode: ConstraintMode,
        anchor: Vector3<f64>,
        connected_anchor: Vector3<f64>,
    ) -> Self {
        Self {
            mode,
            anchor,
            connected_anchor,
            motions: mode.motions(),
        }
    }
}

/// Instantaneous force and torque a constraint exerts on the body, world axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl Reaction {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// A constraint attached to a body in the virtual tunnel, with the reaction it
/// exerted during the most recent step.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ConstraintJoint {
    pub id: u64,
    pub constraint: Constraint,
    pub reaction: Reaction,
}

impl ConstraintJoint {
    pub fn new(id: u64, constraint: Constraint) -> Self {
        Self {
            id,
            constraint,
            reaction: Reaction::zero(),
        }
    }
}
