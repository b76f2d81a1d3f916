pub mod aircraft;
pub mod mount;
pub mod physics;
pub mod spatial;
pub mod sweep;

pub use aircraft::{
    AirData, AircraftAeroCoefficients, AircraftGeometry, ControlLimits, ControlPolarity,
    ControlState, ControlSurface, MassModel,
};
pub use mount::{AxisMotions, Constraint, ConstraintJoint, ConstraintMode, Motion, Reaction};
pub use physics::{Force, ForceCategory, Moment, PhysicsComponent, ReferenceFrame};
pub use spatial::{AircraftPose, SpatialComponent};
pub use sweep::{
    CoefficientKind, CoefficientRow, Column, Header, PrimarySweep, PrimaryVariable,
    SecondarySweep, SecondaryVariable, SweepPhase, SweepSpecification, SweepStatus,
};
