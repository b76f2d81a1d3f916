pub mod experiment;
pub mod flow;
pub mod physics;
pub mod sweep;
pub mod tunnel;

pub use experiment::{BetaSweepConfig, ExperimentConfig, PlannedRun};
pub use flow::FlowCondition;
pub use physics::PhysicsConfig;
pub use sweep::SweepSettings;
pub use tunnel::{PolarityConfig, TunnelConfig};
