use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Reference geometry of the model on the balance.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftGeometry {
    /// The total wing area of the aircraft (m²).
    pub wing_area: f64,
    /// The wingspan of the aircraft (m).
    pub wing_span: f64,
    /// The mean aerodynamic chord of the aircraft (m).
    pub mac: f64,
}

impl Default for AircraftGeometry {
    fn default() -> Self {
        Self::trainer()
    }
}

impl AircraftGeometry {
    pub fn new(wing_area: f64, wing_span: f64, mac: f64) -> Self {
        AircraftGeometry {
            wing_area,
            wing_span,
            mac,
        }
    }

    /// Small high-wing training model used in the tunnel.
    pub fn trainer() -> Self {
        Self::new(0.72, 3.09, 0.233)
    }

    /// Body-local point a fraction of the chord aft of the leading edge
    pub fn chord_station(&self, fraction: f64) -> f64 {
        -fraction * self.mac
    }
}
