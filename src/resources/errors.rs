use thiserror::Error;

use crate::components::ConstraintMode;

/// Faults raised by the rig: the mount, the force balance and the collaborators behind them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    #[error("Physics engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Aircraft control interface unavailable: {0}")]
    ControlsUnavailable(String),

    #[error("Flow source unavailable: {0}")]
    FlowUnavailable(String),

    #[error("No constraint is mounted")]
    NotMounted,

    #[error("Unknown constraint id {0}")]
    UnknownConstraint(u64),

    #[error("Constraint anchor is stale, the centre of mass moved without a rebuild")]
    StaleConstraint,

    #[error("Force balance read before it was tared")]
    NotTared,

    #[error("Tare requires a fixed mount, found {0:?}")]
    TareRequiresFixed(ConstraintMode),

    #[error("Tare requires zero flow, found {0} m/s")]
    TareWithFlow(f64),

    #[error("Dynamic pressure must be positive, found {0}")]
    ZeroDynamicPressure(f64),

    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Faults raised by data sinks.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row appended before a header was written")]
    NotStarted,

    #[error("Row has {found} values but the header has {expected} columns")]
    ColumnMismatch { expected: usize, found: usize },
}

/// Faults raised while loading or validating experiment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Primary sweep must contain at least one data point")]
    EmptyPrimarySweep,

    #[error("Sweep range for {name} must be ascending, found {min} to {max}")]
    DescendingRange { name: String, min: f64, max: f64 },

    #[error("Invalid parameter '{name}' with value '{value}'")]
    InvalidParameter { name: String, value: String },
}

impl ConfigError {
    pub fn invalid(name: &str, value: impl ToString) -> Self {
        ConfigError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Faults that terminate a sweep.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Rig error: {0}")]
    Rig(#[from] RigError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Non-finite {quantity} at run {run}, primary step {primary}, secondary sweep {sweep}, point {index}"
    )]
    NonFinite {
        quantity: &'static str,
        run: usize,
        primary: usize,
        sweep: usize,
        index: usize,
    },

    #[error(
        "Dynamic pressure {dynamic_pressure} unusable at run {run}, primary step {primary}, secondary sweep {sweep}, point {index}"
    )]
    DynamicPressure {
        dynamic_pressure: f64,
        run: usize,
        primary: usize,
        sweep: usize,
        index: usize,
    },

    #[error("Sweep has already finished")]
    AlreadyFinished,
}

pub type RigResult<T> = std::result::Result<T, RigError>;
pub type SinkResult<T> = std::result::Result<T, SinkError>;
pub type Result<T> = std::result::Result<T, SweepError>;
