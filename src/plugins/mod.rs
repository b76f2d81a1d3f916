mod physics;
mod wind_tunnel;

pub use physics::{TunnelPhysicsPlugin, TunnelResource, TunnelSet};
pub use wind_tunnel::{
    ActiveSweep, BoxedSink, CancelSweep, LatestReadout, LiveExperiment, LiveMount,
    SweepFinished, TunnelLiveBalance, TunnelSweep, WindTunnelPlugin,
};
