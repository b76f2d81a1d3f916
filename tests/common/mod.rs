mod assertions;
mod fixtures;
mod test_app;

// Re-export
pub use assertions::{assert_coefficient_eq, assert_increasing, assert_rows_complete};
pub use fixtures::*;
pub use test_app::{TunnelTestApp, TunnelTestAppBuilder};
