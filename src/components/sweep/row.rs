use serde::{Deserialize, Serialize};

use super::spec::SecondaryVariable;
use crate::systems::AeroCoefficients;

/// A single coefficient that can be recorded in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoefficientKind {
    Lift,
    Drag,
    Side,
    Roll,
    Pitch,
    Yaw,
}

impl CoefficientKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            CoefficientKind::Lift => "CL",
            CoefficientKind::Drag => "CD",
            CoefficientKind::Side => "CY",
            CoefficientKind::Roll => "Cl",
            CoefficientKind::Pitch => "Cm",
            CoefficientKind::Yaw => "Cn",
        }
    }

    pub fn select(&self, coefficients: &AeroCoefficients) -> f64 {
        match self {
            CoefficientKind::Lift => coefficients.lift(),
            CoefficientKind::Drag => coefficients.drag(),
            CoefficientKind::Side => coefficients.side(),
            CoefficientKind::Roll => coefficients.roll(),
            CoefficientKind::Pitch => coefficients.pitch(),
            CoefficientKind::Yaw => coefficients.yaw(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub kind: CoefficientKind,
    pub variable: SecondaryVariable,
    pub value: f64,
}

impl Column {
    /// e.g. `CL for flap at 20.00`
    pub fn label(&self) -> String {
        format!(
            "{} for {} at {:.*}",
            self.kind.symbol(),
            self.variable.label(),
            self.variable.precision(),
            self.value
        )
    }
}

/// Column layout of one output stream. The primary column comes first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub primary: String,
    pub columns: Vec<Column>,
}

impl Header {
    pub fn labels(&self) -> Vec<String> {
        std::iter::once(self.primary.clone())
            .chain(self.columns.iter().map(Column::label))
            .collect()
    }

    /// Total number of fields per row, including the primary
    pub fn width(&self) -> usize {
        self.columns.len() + 1
    }

    pub fn render(&self, delimiter: char) -> String {
        self.labels().join(&delimiter.to_string())
    }
}

/// One completed row: the primary value and its coefficients in header column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub primary: f64,
    pub values: Vec<f64>,
}

impl CoefficientRow {
    pub fn new(primary: f64) -> Self {
        Self {
            primary,
            values: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.values.len() + 1
    }

    pub fn fields(&self) -> Vec<String> {
        std::iter::once(format!("{:.2}", self.primary))
            .chain(self.values.iter().map(|v| format!("{:.4}", v)))
            .collect()
    }

    pub fn render(&self, delimiter: char) -> String {
        self.fields().join(&delimiter.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_labels() {
        let flap = Column {
            kind: CoefficientKind::Lift,
            variable: SecondaryVariable::Flap,
            value: 20.0,
        };
        assert_eq!(flap.label(), "CL for flap at 20.00");

        let cg = Column {
            kind: CoefficientKind::Pitch,
            variable: SecondaryVariable::CgPosition,
            value: 25.0,
        };
        assert_eq!(cg.label(), "Cm for CG at 25.0000");
    }

    #[test]
    fn test_row_render() {
        let row = CoefficientRow {
            primary: 5.0,
            values: vec![0.51234567, -0.0312],
        };
        assert_eq!(row.render('\t'), "5.00\t0.5123\t-0.0312");
        assert_eq!(row.width(), 3);
    }
}
