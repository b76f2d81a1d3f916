mod handles;
mod virtual_tunnel;

pub use handles::{SharedTunnel, TunnelControls, TunnelEngine, TunnelFlow};
pub use virtual_tunnel::{centre_of_gravity, VirtualTunnel};
