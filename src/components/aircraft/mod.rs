mod air_data;
pub mod config;
mod controls;

pub use air_data::AirData;
pub use config::{
    AircraftAeroCoefficients, AircraftGeometry, DragCoefficients, LiftCoefficients, MassModel,
    PitchCoefficients, RollCoefficients, SideForceCoefficients, YawCoefficients,
};
pub use controls::{ControlLimits, ControlPolarity, ControlState, ControlSurface};
