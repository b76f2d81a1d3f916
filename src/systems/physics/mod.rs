mod constraint;
mod force_calculator;
mod integrator;

pub use constraint::{calculate_reaction, constraint_reaction_system};
pub use force_calculator::{calculate_net_forces_moments, force_calculator_system};
pub use integrator::physics_integrator_system;
