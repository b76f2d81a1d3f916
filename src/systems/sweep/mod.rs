mod controller;
mod header;

pub use controller::{SweepController, SweepRun};
pub use header::build_header;
