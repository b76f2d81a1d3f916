use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::resources::{RigError, RigResult};
use crate::systems::AxisTransform;
use crate::utils::is_finite_vector;

/// q = ½ρV²
pub fn dynamic_pressure(density: f64, speed: f64) -> f64 {
    0.5 * density * speed * speed
}

/// Non-dimensional force and moment coefficients from one balance reading.
///
/// `force` holds (CD, CL, CY) along the tunnel axes; `moment` holds (Cl, Cm, Cn)
/// in aircraft body axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeroCoefficients {
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}

impl AeroCoefficients {
    /// Coefficients from tare-corrected balance readings.
    ///
    /// The balance reads the reaction holding the model, so the aerodynamic load is
    /// its negative: `force = flip_axial(-F / qS)`, `moment = to_aircraft(-T / qSc)`.
    pub fn from_reading(
        force: &Vector3<f64>,
        torque: &Vector3<f64>,
        dynamic_pressure: f64,
        wing_area: f64,
        mac: f64,
    ) -> RigResult<Self> {
        if !(dynamic_pressure.is_finite() && dynamic_pressure > 0.0) {
            return Err(RigError::ZeroDynamicPressure(dynamic_pressure));
        }
        let force_scale = dynamic_pressure * wing_area;
        let moment_scale = force_scale * mac;

        let coefficients = Self {
            force: AxisTransform::flip_axial(&(-force / force_scale)),
            moment: AxisTransform::to_aircraft_moment(&(-torque / moment_scale)),
        };
        if !is_finite_vector(&coefficients.force) {
            return Err(RigError::NonFinite("force coefficients"));
        }
        if !is_finite_vector(&coefficients.moment) {
            return Err(RigError::NonFinite("moment coefficients"));
        }
        Ok(coefficients)
    }

    pub fn drag(&self) -> f64 {
        self.force.x
    }

    pub fn lift(&self) -> f64 {
        self.force.y
    }

    pub fn side(&self) -> f64 {
        self.force.z
    }

    pub fn roll(&self) -> f64 {
        self.moment.x
    }

    pub fn pitch(&self) -> f64 {
        self.moment.y
    }

    pub fn yaw(&self) -> f64 {
        self.moment.z
    }
}
