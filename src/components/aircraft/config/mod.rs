mod aero_coef;
mod geometry;
mod mass;

pub use aero_coef::{
    AircraftAeroCoefficients, DragCoefficients, LiftCoefficients, PitchCoefficients,
    RollCoefficients, SideForceCoefficients, YawCoefficients,
};
pub use geometry::AircraftGeometry;
pub use mass::MassModel;
