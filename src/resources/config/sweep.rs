use serde::{Deserialize, Serialize};

use super::flow::FlowCondition;
use crate::components::AircraftGeometry;
use crate::resources::ConfigError;
use crate::utils::{MAX_SLOW_DOWN_FACTOR, MIN_SLOW_DOWN_FACTOR, SWEEP_BASE_TIMESTEP};

/// Runtime settings shared by every run of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    pub flow: FlowCondition,
    /// Reference area and chord used to non-dimensionalise readings
    pub reference: AircraftGeometry,
    /// Multiplier on the base sweep timestep, 1 to 20
    pub slow_down_factor: f64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            flow: FlowCondition::default(),
            reference: AircraftGeometry::trainer(),
            slow_down_factor: MIN_SLOW_DOWN_FACTOR,
        }
    }
}

impl SweepSettings {
    pub fn with_flow(mut self, flow: FlowCondition) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_reference(mut self, reference: AircraftGeometry) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_slow_down_factor(mut self, factor: f64) -> Self {
        self.slow_down_factor = factor;
        self
    }

    /// Physics timestep used while the sweep runs
    pub fn sweep_timestep(&self) -> f64 {
        SWEEP_BASE_TIMESTEP * self.slow_down_factor
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flow.validate()?;
        if !(self.reference.wing_area.is_finite() && self.reference.wing_area > 0.0) {
            return Err(ConfigError::invalid("wing_area", self.reference.wing_area));
        }
        if !(self.reference.mac.is_finite() && self.reference.mac > 0.0) {
            return Err(ConfigError::invalid("mac", self.reference.mac));
        }
        if !(MIN_SLOW_DOWN_FACTOR..=MAX_SLOW_DOWN_FACTOR).contains(&self.slow_down_factor) {
            return Err(ConfigError::invalid(
                "slow_down_factor",
                self.slow_down_factor,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sweep_timestep_scales() {
        let settings = SweepSettings::default().with_slow_down_factor(20.0);
        assert_relative_eq!(settings.sweep_timestep(), 0.02);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_slow_down_factor_bounds() {
        assert!(SweepSettings::default()
            .with_slow_down_factor(0.5)
            .validate()
            .is_err());
        assert!(SweepSettings::default()
            .with_slow_down_factor(21.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_non_positive_reference_rejected() {
        let settings =
            SweepSettings::default().with_reference(AircraftGeometry::new(0.0, 1.0, 0.2));
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }
}
