use bevy::{log::LogPlugin, prelude::*, time::common_conditions::on_timer};
use std::{env, time::Duration};

use windtunnel::{
    plugins::{ActiveSweep, BoxedSink, LatestReadout, TunnelSweep, WindTunnelPlugin},
    resources::{DelimitedFileSink, ExperimentConfig},
    systems::{ForceBalance, SharedTunnel, SweepController, SweepRun, VirtualTunnel},
};

/// Run the wind tunnel sweeps described by a YAML or JSON experiment file.
///
/// Usage: `windtunnel_sweep [experiment.yaml]`. Without a file the default
/// experiment is run. `--write-default <path>` writes the default experiment out
/// for editing. With `live_readout` set the model stays mounted after the sweeps
/// and the balance is logged every second until interrupted.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let config = match args.as_slice() {
        [] => ExperimentConfig::default(),
        [flag, path] if flag == "--write-default" => {
            ExperimentConfig::default().save(path)?;
            println!("Wrote default experiment to {}", path);
            return Ok(());
        }
        [path] => ExperimentConfig::load(path)?,
        _ => return Err("usage: windtunnel_sweep [experiment.yaml | --write-default <path>]".into()),
    };

    let planned = config.validate()?;
    let tunnel = SharedTunnel::new(VirtualTunnel::for_flow(
        &config.tunnel,
        &config.settings.flow,
    ));

    let runs = planned
        .into_iter()
        .map(|run| {
            let sink: BoxedSink = Box::new(DelimitedFileSink::new(&run.path));
            SweepRun::new(run.specification, sink)
        })
        .collect();

    let sweep: TunnelSweep = SweepController::new(
        ForceBalance::new(tunnel.engine()),
        tunnel.flow(),
        tunnel.controls(),
        config.settings.clone(),
        runs,
    )?;

    let plugin = if config.live_readout {
        WindTunnelPlugin::new(tunnel)
            .with_live_experiment(config.settings.clone(), config.mount_mode)
    } else {
        WindTunnelPlugin::new(tunnel).exit_on_finish()
    };

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(plugin)
        .insert_resource(ActiveSweep(sweep))
        .add_systems(
            Update,
            log_readout_system
                .run_if(not(resource_exists::<ActiveSweep>))
                .run_if(on_timer(Duration::from_secs(1))),
        );

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(format!("sweep failed with code {}", code).into()),
    }
}

fn log_readout_system(latest: Res<LatestReadout>) {
    let Some(readout) = &latest.0 else {
        return;
    };
    match (&readout.coefficients, &readout.attitude) {
        (Some(c), Some(attitude)) => {
            let (roll, pitch, yaw) = attitude.euler_angles();
            info!(
                "{:?} CL {:.4} CD {:.4} Cm {:.4} | attitude {:.2} {:.2} {:.2} rad",
                readout.mode,
                c.lift(),
                c.drag(),
                c.pitch(),
                roll,
                pitch,
                yaw
            );
        }
        (Some(c), None) => info!(
            "{:?} CL {:.4} CD {:.4} CY {:.4} Cl {:.4} Cm {:.4} Cn {:.4}",
            readout.mode,
            c.lift(),
            c.drag(),
            c.side(),
            c.roll(),
            c.pitch(),
            c.yaw()
        ),
        (None, _) => info!(
            "{:?} raw force {:?} raw torque {:?}",
            readout.mode, readout.raw_force, readout.raw_torque
        ),
    }
}
