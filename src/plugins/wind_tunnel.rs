use bevy::prelude::*;

use super::physics::{TunnelPhysicsPlugin, TunnelResource, TunnelSet};
use crate::components::{ConstraintMode, SweepPhase, SweepStatus};
use crate::resources::{DataSink, SweepSettings};
use crate::systems::{
    LiveBalance, SharedTunnel, SweepController, TunnelControls, TunnelEngine, TunnelFlow,
    TunnelReadout,
};

pub type BoxedSink = Box<dyn DataSink + Send + Sync>;

/// A sweep controller wired to the handles of a shared tunnel.
pub type TunnelSweep = SweepController<TunnelEngine, TunnelFlow, TunnelControls, BoxedSink>;

/// The sweep currently being driven. Removed once it finishes.
#[derive(Resource)]
pub struct ActiveSweep(pub TunnelSweep);

pub type TunnelLiveBalance = LiveBalance<TunnelEngine, TunnelFlow>;

/// How to mount the model whenever no sweep is running.
#[derive(Resource, Debug, Clone)]
pub struct LiveExperiment {
    pub settings: SweepSettings,
    pub mode: ConstraintMode,
}

/// The balance mounted between sweeps. Released as soon as a sweep is inserted.
#[derive(Resource)]
pub struct LiveMount(pub TunnelLiveBalance);

/// Latest balance readout, refreshed every fixed update from the sweep or the live mount.
#[derive(Resource, Debug, Clone, Default)]
pub struct LatestReadout(pub Option<TunnelReadout>);

/// Ask the active sweep to stop at its next step.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CancelSweep;

#[derive(Event, Debug, Clone)]
pub struct SweepFinished {
    pub phase: SweepPhase,
    pub rows: usize,
    pub error: Option<String>,
}

/// Runs an [`ActiveSweep`] against the tunnel, one controller step per fixed update
/// after the physics has advanced.
pub struct WindTunnelPlugin {
    pub tunnel: SharedTunnel,
    pub exit_on_finish: bool,
    pub live: Option<LiveExperiment>,
}

impl WindTunnelPlugin {
    pub fn new(tunnel: SharedTunnel) -> Self {
        Self {
            tunnel,
            exit_on_finish: false,
            live: None,
        }
    }

    pub fn exit_on_finish(mut self) -> Self {
        self.exit_on_finish = true;
        self
    }

    /// Keep the model mounted in `mode` at the test flow while no sweep runs.
    pub fn with_live_experiment(mut self, settings: SweepSettings, mode: ConstraintMode) -> Self {
        self.live = Some(LiveExperiment { settings, mode });
        self
    }
}

impl Plugin for WindTunnelPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TunnelPhysicsPlugin::new(self.tunnel.clone()))
            .add_event::<CancelSweep>()
            .add_event::<SweepFinished>()
            .init_resource::<LatestReadout>()
            .add_systems(
                FixedUpdate,
                (
                    release_live_mount_system
                        .run_if(resource_exists::<ActiveSweep>)
                        .run_if(resource_exists::<LiveMount>),
                    sweep_step_system.run_if(resource_exists::<ActiveSweep>),
                    mount_live_system
                        .run_if(resource_exists::<LiveExperiment>)
                        .run_if(not(resource_exists::<ActiveSweep>))
                        .run_if(not(resource_exists::<LiveMount>)),
                )
                    .chain()
                    .in_set(TunnelSet::Sweep),
            )
            .add_systems(FixedUpdate, publish_readout_system.in_set(TunnelSet::Readout));

        if let Some(live) = &self.live {
            app.insert_resource(live.clone());
        }

        if self.exit_on_finish {
            app.add_systems(Update, exit_on_finish_system);
        }
    }
}

fn sweep_step_system(
    mut commands: Commands,
    mut sweep: ResMut<ActiveSweep>,
    mut cancels: EventReader<CancelSweep>,
    mut finished: EventWriter<SweepFinished>,
) {
    if cancels.read().count() > 0 {
        sweep.0.cancel();
    }

    let error = match sweep.0.step() {
        Ok(SweepStatus::Settling) => return,
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    };

    info!(
        "Sweep ended in {:?} with {} rows",
        sweep.0.phase(),
        sweep.0.rows_emitted()
    );
    finished.send(SweepFinished {
        phase: sweep.0.phase(),
        rows: sweep.0.rows_emitted(),
        error,
    });
    commands.remove_resource::<ActiveSweep>();
}

fn release_live_mount_system(mut commands: Commands, mut live: ResMut<LiveMount>) {
    info!("Releasing {:?} live balance for a sweep", live.0.mode());
    if let Err(e) = live.0.release() {
        warn!("Failed to release live balance: {}", e);
    }
    commands.remove_resource::<LiveMount>();
}

fn mount_live_system(
    mut commands: Commands,
    tunnel: Res<TunnelResource>,
    experiment: Res<LiveExperiment>,
) {
    match LiveBalance::mount(
        tunnel.engine(),
        tunnel.flow(),
        experiment.settings.clone(),
        experiment.mode,
    ) {
        Ok(live) => commands.insert_resource(LiveMount(live)),
        Err(e) => {
            error!("Unable to mount live balance: {}", e);
            commands.remove_resource::<LiveExperiment>();
        }
    }
}

fn publish_readout_system(
    sweep: Option<Res<ActiveSweep>>,
    live: Option<Res<LiveMount>>,
    mut latest: ResMut<LatestReadout>,
) {
    let readout = match (sweep, live) {
        (Some(sweep), _) => TunnelReadout::capture(sweep.0.balance(), sweep.0.settings()),
        (None, Some(live)) => live.0.readout(),
        (None, None) => return,
    };
    match readout {
        Ok(readout) => latest.0 = Some(readout),
        Err(e) => debug!("No balance readout: {}", e),
    }
}

fn exit_on_finish_system(mut finished: EventReader<SweepFinished>, mut exit: EventWriter<AppExit>) {
    for event in finished.read() {
        match &event.error {
            Some(e) => {
                error!("Sweep failed: {}", e);
                exit.send(AppExit::error());
            }
            None => {
                exit.send(AppExit::Success);
            }
        }
    }
}
