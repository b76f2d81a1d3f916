pub mod aerodynamics;
mod axes;
mod balance;
mod coefficients;
mod mount;
pub mod physics;
mod readout;
pub mod sweep;
pub mod tunnel;

pub use aerodynamics::{
    aero_force_system, air_data_system, calculate_aerodynamic_forces_moments,
    calculate_air_data, AirDataValues,
};
pub use axes::AxisTransform;
pub use balance::{BalanceReading, ForceBalance};
pub use coefficients::{dynamic_pressure, AeroCoefficients};
pub use mount::ConstraintMount;
pub use physics::{
    calculate_net_forces_moments, calculate_reaction, constraint_reaction_system,
    force_calculator_system, physics_integrator_system,
};
pub use readout::{LiveBalance, TunnelReadout};
pub use sweep::{build_header, SweepController, SweepRun};
pub use tunnel::{
    centre_of_gravity, SharedTunnel, TunnelControls, TunnelEngine, TunnelFlow, VirtualTunnel,
};
