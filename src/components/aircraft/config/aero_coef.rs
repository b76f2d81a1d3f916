use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Linear aerodynamic model of the tunnel model, referenced to the quarter chord.
/// Angles and deflections are in radians, rates are non-dimensional.
#[derive(Component, Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AircraftAeroCoefficients {
    pub drag: DragCoefficients,
    pub lift: LiftCoefficients,
    pub side_force: SideForceCoefficients,
    pub roll: RollCoefficients,
    pub pitch: PitchCoefficients,
    pub yaw: YawCoefficients,
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DragCoefficients {
    /// Zero-lift drag coefficient.
    pub c_d_0: f64,
    /// Induced drag factor applied to CL².
    pub c_d_k: f64,
    /// Drag due to flap deflection magnitude.
    pub c_d_deltaf: f64,
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LiftCoefficients {
    pub c_l_0: f64,
    pub c_l_alpha: f64,
    pub c_l_q: f64,
    pub c_l_deltae: f64,
    pub c_l_deltaf: f64,
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SideForceCoefficients {
    pub c_y_beta: f64,
    pub c_y_deltaa: f64,
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RollCoefficients {
    pub c_l_beta: f64,
    pub c_l_p: f64,
    pub c_l_deltaa: f64,
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PitchCoefficients {
    pub c_m_0: f64,
    pub c_m_alpha: f64,
    pub c_m_q: f64,
    pub c_m_deltae: f64,
    pub c_m_deltaf: f64,
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YawCoefficients {
    pub c_n_beta: f64,
    pub c_n_r: f64,
    pub c_n_deltaa: f64,
}

impl AircraftAeroCoefficients {
    pub fn new(
        drag: DragCoefficients,
        lift: LiftCoefficients,
        side_force: SideForceCoefficients,
        roll: RollCoefficients,
        pitch: PitchCoefficients,
        yaw: YawCoefficients,
    ) -> Self {
        AircraftAeroCoefficients {
            drag,
            lift,
            side_force,
            roll,
            pitch,
            yaw,
        }
    }

    /// Neutral point near 40% MAC, so the model is statically stable with the
    /// centre of gravity at the quarter chord.
    pub fn trainer() -> Self {
        Self::new(
            DragCoefficients {
                c_d_0: 0.03,
                c_d_k: 0.05,
                c_d_deltaf: 0.1,
            },
            LiftCoefficients {
                c_l_0: 0.25,
                c_l_alpha: 5.0,
                c_l_q: 4.0,
                c_l_deltae: 0.35,
                c_l_deltaf: 0.9,
            },
            SideForceCoefficients {
                c_y_beta: -0.3,
                c_y_deltaa: 0.0,
            },
            RollCoefficients {
                c_l_beta: -0.05,
                c_l_p: -0.45,
                c_l_deltaa: 0.15,
            },
            PitchCoefficients {
                c_m_0: 0.02,
                c_m_alpha: -0.75,
                c_m_q: -12.0,
                c_m_deltae: -1.1,
                c_m_deltaf: -0.2,
            },
            YawCoefficients {
                c_n_beta: 0.08,
                c_n_r: -0.1,
                c_n_deltaa: -0.01,
            },
        )
    }
}
