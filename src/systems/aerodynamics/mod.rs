mod air_data;
mod force_calculator;

pub use air_data::{air_data_system, calculate_air_data, AirDataValues};
pub use force_calculator::{aero_force_system, calculate_aerodynamic_forces_moments};
