use serde::{Deserialize, Serialize};

use super::row::CoefficientKind;
use crate::components::AircraftPose;
use crate::resources::ConfigError;
use crate::utils::linspace;

/// Outer sweep variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PrimaryVariable {
    Alpha,
    /// Sideslip sweep at a fixed angle of attack
    Beta { alpha_deg: f64 },
}

impl PrimaryVariable {
    pub fn label(&self) -> &'static str {
        match self {
            PrimaryVariable::Alpha => "alpha",
            PrimaryVariable::Beta { .. } => "beta",
        }
    }

    pub fn pose(&self, value_deg: f64) -> AircraftPose {
        match self {
            PrimaryVariable::Alpha => AircraftPose::new(value_deg, 0.0),
            PrimaryVariable::Beta { alpha_deg } => AircraftPose::new(*alpha_deg, value_deg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimarySweep {
    pub variable: PrimaryVariable,
    values: Vec<f64>,
}

impl PrimarySweep {
    /// `points` evenly spaced values from `min` to `max` in degrees.
    pub fn linspace(
        variable: PrimaryVariable,
        min: f64,
        max: f64,
        points: usize,
    ) -> Result<Self, ConfigError> {
        if points == 0 {
            return Err(ConfigError::EmptyPrimarySweep);
        }
        if !min.is_finite() {
            return Err(ConfigError::invalid("min", min));
        }
        if !max.is_finite() {
            return Err(ConfigError::invalid("max", max));
        }
        if min > max {
            return Err(ConfigError::DescendingRange {
                name: variable.label().to_string(),
                min,
                max,
            });
        }
        Ok(Self {
            variable,
            values: linspace(min, max, points),
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Inner sweep variable. Deflections are in degrees, CG positions in percent MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecondaryVariable {
    Flap,
    Elevator,
    Aileron,
    CgPosition,
}

impl SecondaryVariable {
    pub fn label(&self) -> &'static str {
        match self {
            SecondaryVariable::Flap => "flap",
            SecondaryVariable::Elevator => "elevator",
            SecondaryVariable::Aileron => "aileron",
            SecondaryVariable::CgPosition => "CG",
        }
    }

    /// Decimal places used when the value appears in a column name
    pub fn precision(&self) -> usize {
        match self {
            SecondaryVariable::CgPosition => 4,
            _ => 2,
        }
    }

    pub fn default_outputs(&self) -> Vec<CoefficientKind> {
        match self {
            SecondaryVariable::Flap => vec![CoefficientKind::Lift, CoefficientKind::Drag],
            SecondaryVariable::Elevator => vec![CoefficientKind::Lift, CoefficientKind::Pitch],
            SecondaryVariable::Aileron => vec![CoefficientKind::Roll],
            SecondaryVariable::CgPosition => vec![CoefficientKind::Pitch],
        }
    }
}

/// One inner sweep. The first value is the trim value the variable returns to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondarySweep {
    pub variable: SecondaryVariable,
    pub values: Vec<f64>,
    pub outputs: Vec<CoefficientKind>,
}

impl SecondarySweep {
    pub fn new(variable: SecondaryVariable, values: Vec<f64>) -> Self {
        Self {
            variable,
            values,
            outputs: variable.default_outputs(),
        }
    }

    pub fn with_outputs(mut self, outputs: Vec<CoefficientKind>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn trim(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() || self.outputs.is_empty()
    }

    pub fn column_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.values.len() * self.outputs.len()
        }
    }
}

/// A primary sweep with its nested secondary sweeps, in measurement order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSpecification {
    pub primary: PrimarySweep,
    pub secondaries: Vec<SecondarySweep>,
}

impl SweepSpecification {
    pub fn new(primary: PrimarySweep) -> Self {
        Self {
            primary,
            secondaries: Vec::new(),
        }
    }

    pub fn with_secondary(mut self, sweep: SecondarySweep) -> Self {
        self.secondaries.push(sweep);
        self
    }

    /// Secondary sweeps that contribute columns
    pub fn active_secondaries(&self) -> impl Iterator<Item = &SecondarySweep> {
        self.secondaries.iter().filter(|s| !s.is_empty())
    }

    pub fn column_count(&self) -> usize {
        self.secondaries.iter().map(SecondarySweep::column_count).sum()
    }
}
