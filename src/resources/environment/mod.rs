mod environment;

pub use environment::{wind_vector, EnvironmentResource};
