use serde::{Deserialize, Serialize};

use crate::components::{
    AircraftAeroCoefficients, AircraftGeometry, ControlLimits, ControlPolarity, MassModel,
};
use crate::resources::ConfigError;

/// How control polarity is chosen for the tunnel's model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarityConfig {
    Fixed(ControlPolarity),
    /// Derived from a per-user identifier
    Seeded { identifier: String },
    /// Drawn from a master seed
    Random { seed: u64 },
}

impl Default for PolarityConfig {
    fn default() -> Self {
        PolarityConfig::Fixed(ControlPolarity::default())
    }
}

impl PolarityConfig {
    pub fn resolve(&self) -> ControlPolarity {
        match self {
            PolarityConfig::Fixed(polarity) => *polarity,
            PolarityConfig::Seeded { identifier } => ControlPolarity::seeded(identifier),
            PolarityConfig::Random { seed } => ControlPolarity::from_seed(*seed),
        }
    }
}

/// The model mounted in the virtual tunnel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    pub geometry: AircraftGeometry,
    pub mass: MassModel,
    pub aero: AircraftAeroCoefficients,
    pub polarity: PolarityConfig,
    pub limits: ControlLimits,
    /// Initial centre of gravity, percent MAC aft of the leading edge
    pub cg_percent_mac: f64,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            geometry: AircraftGeometry::trainer(),
            mass: MassModel::trainer(),
            aero: AircraftAeroCoefficients::trainer(),
            polarity: PolarityConfig::default(),
            limits: ControlLimits::default(),
            cg_percent_mac: 25.0,
        }
    }
}

impl TunnelConfig {
    pub fn with_polarity(mut self, polarity: PolarityConfig) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_cg(mut self, percent_mac: f64) -> Self {
        self.cg_percent_mac = percent_mac;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.geometry.mac.is_finite() && self.geometry.mac > 0.0) {
            return Err(ConfigError::invalid("mac", self.geometry.mac));
        }
        if !(self.mass.mass.is_finite() && self.mass.mass > 0.0) {
            return Err(ConfigError::invalid("mass", self.mass.mass));
        }
        if !(self.limits.max_deflection_deg.is_finite() && self.limits.max_deflection_deg > 0.0) {
            return Err(ConfigError::invalid(
                "max_deflection_deg",
                self.limits.max_deflection_deg,
            ));
        }
        if !self.cg_percent_mac.is_finite() {
            return Err(ConfigError::invalid("cg_percent_mac", self.cg_percent_mac));
        }
        Ok(())
    }
}
