use bevy::prelude::*;

use crate::resources::PhysicsEngine;
use crate::systems::SharedTunnel;

/// Tunnel simulation stages
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum TunnelSet {
    Physics,
    Sweep,
    Readout,
}

/// The shared virtual tunnel stepped by [`TunnelPhysicsPlugin`].
#[derive(Resource, Clone, Deref)]
pub struct TunnelResource(pub SharedTunnel);

/// Steps a [`SharedTunnel`] once per `FixedUpdate`, keeping the app's fixed
/// timestep equal to the tunnel's integration timestep.
pub struct TunnelPhysicsPlugin {
    pub tunnel: SharedTunnel,
}

impl TunnelPhysicsPlugin {
    pub fn new(tunnel: SharedTunnel) -> Self {
        Self { tunnel }
    }
}

impl Plugin for TunnelPhysicsPlugin {
    fn build(&self, app: &mut App) {
        let timestep = match self.tunnel.engine().fixed_timestep() {
            Ok(timestep) => timestep,
            Err(e) => {
                error!("Unable to read tunnel timestep: {}", e);
                crate::utils::DEFAULT_TIMESTEP
            }
        };

        app.insert_resource(TunnelResource(self.tunnel.clone()))
            .insert_resource(Time::<Fixed>::from_seconds(timestep));

        app.configure_sets(
            FixedUpdate,
            (TunnelSet::Physics, TunnelSet::Sweep, TunnelSet::Readout).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (sync_fixed_timestep, step_tunnel_system)
                .chain()
                .in_set(TunnelSet::Physics),
        );
    }
}

/// Follow timestep changes made through the engine, such as a sweep's slow down.
fn sync_fixed_timestep(tunnel: Res<TunnelResource>, mut time: ResMut<Time<Fixed>>) {
    match tunnel.engine().fixed_timestep() {
        Ok(timestep) => {
            if (time.timestep().as_secs_f64() - timestep).abs() > f64::EPSILON {
                debug!("Fixed timestep now {:.4} s", timestep);
                time.set_timestep_seconds(timestep);
            }
        }
        Err(e) => warn!("Unable to read tunnel timestep: {}", e),
    }
}

fn step_tunnel_system(tunnel: Res<TunnelResource>) {
    if let Err(e) = tunnel.engine().step() {
        error!("Tunnel step failed: {}", e);
    }
}
