pub mod config;
pub mod environment;
pub mod errors;
pub mod sink;
pub mod traits;

pub use config::{
    BetaSweepConfig, ExperimentConfig, FlowCondition, PhysicsConfig, PlannedRun,
    PolarityConfig, SweepSettings, TunnelConfig,
};
pub use environment::{wind_vector, EnvironmentResource};
pub use errors::{
    ConfigError, Result, RigError, RigResult, SinkError, SinkResult, SweepError,
};
pub use sink::{DataSink, DelimitedFileSink, MemorySink};
pub use traits::{AircraftControlInterface, ConstraintId, FlowSource, PhysicsEngine};
