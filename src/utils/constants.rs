pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3

pub const DEFAULT_TIMESTEP: f64 = 1.0 / 120.0; // Free-running physics timestep
pub const SWEEP_BASE_TIMESTEP: f64 = 0.001; // Timestep during a sweep, before slow down
pub const MAX_TIMESTEP: f64 = 1.0 / 30.0; // Maximum physics timestep
pub const MIN_TIMESTEP: f64 = 1.0 / 10000.0; // Minimum physics timestep

// Slow down factor bounds for sweep visuals
pub const MIN_SLOW_DOWN_FACTOR: f64 = 1.0;
pub const MAX_SLOW_DOWN_FACTOR: f64 = 20.0;

// Nominal tunnel test condition
pub const TEST_FLOW_AZIMUTH: f64 = 180.0; // degrees
pub const TEST_FLOW_ELEVATION: f64 = 0.0; // degrees
pub const TEST_FLOW_SPEED: f64 = 10.0; // m/s

/// Tolerance used when comparing anchor points against the centre of mass [m]
pub const ANCHOR_TOLERANCE: f64 = 1e-9;
