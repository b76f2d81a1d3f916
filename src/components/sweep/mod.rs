mod phase;
mod row;
mod spec;

pub use phase::{SweepPhase, SweepStatus};
pub use row::{CoefficientKind, CoefficientRow, Column, Header};
pub use spec::{PrimarySweep, PrimaryVariable, SecondarySweep, SecondaryVariable, SweepSpecification};
