use bevy::{prelude::*, time::TimeUpdateStrategy};
use std::time::Duration;

use windtunnel::{
    components::{ConstraintMode, SweepSpecification},
    plugins::{ActiveSweep, BoxedSink, LatestReadout, LiveMount, SweepFinished, WindTunnelPlugin},
    resources::{MemorySink, SweepSettings},
    systems::{ForceBalance, SharedTunnel, SweepController, SweepRun, TunnelReadout},
};

/// Events seen by the test app
#[derive(Resource, Default)]
pub struct FinishedLog(pub Vec<SweepFinished>);

fn record_finished(mut events: EventReader<SweepFinished>, mut log: ResMut<FinishedLog>) {
    log.0.extend(events.read().cloned());
}

// Builder for a headless app driving one sweep through the plugins
pub struct TunnelTestAppBuilder {
    tunnel: SharedTunnel,
    specifications: Vec<SweepSpecification>,
    settings: SweepSettings,
    frame: Duration,
    live: Option<ConstraintMode>,
}

impl TunnelTestAppBuilder {
    pub fn new(tunnel: SharedTunnel) -> Self {
        Self {
            tunnel,
            specifications: Vec::new(),
            settings: SweepSettings::default(),
            frame: Duration::from_millis(20),
            live: None,
        }
    }

    pub fn with_run(mut self, specification: SweepSpecification) -> Self {
        self.specifications.push(specification);
        self
    }

    pub fn with_settings(mut self, settings: SweepSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Virtual time advanced per update
    pub fn with_frame(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }

    /// Mount the model in `mode` once the sweep is done
    pub fn with_live_mount(mut self, mode: ConstraintMode) -> Self {
        self.live = Some(mode);
        self
    }

    pub fn build(self) -> TunnelTestApp {
        let sinks: Vec<MemorySink> = self
            .specifications
            .iter()
            .map(|_| MemorySink::new())
            .collect();
        let runs = self
            .specifications
            .into_iter()
            .zip(sinks.iter())
            .map(|(specification, sink)| {
                let boxed: BoxedSink = Box::new(sink.clone());
                SweepRun::new(specification, boxed)
            })
            .collect();

        let mut plugin = WindTunnelPlugin::new(self.tunnel.clone());
        if let Some(mode) = self.live {
            plugin = plugin.with_live_experiment(self.settings.clone(), mode);
        }

        let sweep = SweepController::new(
            ForceBalance::new(self.tunnel.engine()),
            self.tunnel.flow(),
            self.tunnel.controls(),
            self.settings,
            runs,
        )
        .unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(plugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(self.frame))
            .init_resource::<FinishedLog>()
            .add_systems(Update, record_finished)
            .insert_resource(ActiveSweep(sweep));

        TunnelTestApp {
            app,
            tunnel: self.tunnel,
            sinks,
        }
    }
}

/// Main test application wrapper
pub struct TunnelTestApp {
    pub app: App,
    pub tunnel: SharedTunnel,
    pub sinks: Vec<MemorySink>,
}

impl TunnelTestApp {
    pub fn run_frame(&mut self) {
        self.app.update();
    }

    /// Update until the sweep reports it has finished, up to `max_frames`
    pub fn run_until_finished(&mut self, max_frames: usize) -> Option<SweepFinished> {
        for _ in 0..max_frames {
            self.app.update();
            if let Some(event) = self.app.world().resource::<FinishedLog>().0.first() {
                return Some(event.clone());
            }
        }
        None
    }

    pub fn send_event<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }

    pub fn is_sweeping(&self) -> bool {
        self.app.world().contains_resource::<ActiveSweep>()
    }

    pub fn is_live(&self) -> bool {
        self.app.world().contains_resource::<LiveMount>()
    }

    pub fn readout(&self) -> Option<TunnelReadout> {
        self.app.world().resource::<LatestReadout>().0
    }
}
