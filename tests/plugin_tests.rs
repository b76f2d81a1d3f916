mod common;

use approx::assert_relative_eq;
use std::time::Duration;
use windtunnel::{
    components::{
        ConstraintMode, PrimarySweep, PrimaryVariable, SecondarySweep, SecondaryVariable,
        SweepPhase, SweepSpecification,
    },
    plugins::{ActiveSweep, BoxedSink, CancelSweep},
    resources::{FlowSource, MemorySink, PhysicsEngine, SweepSettings},
    systems::{ForceBalance, SweepController, SweepRun},
    utils::{DEFAULT_TIMESTEP, TEST_FLOW_SPEED},
};

use crate::common::{
    assert_coefficient_eq, assert_rows_complete, create_test_tunnel, flap_specification,
    TunnelTestAppBuilder, CL_0,
};

#[test]
fn test_plugin_drives_sweep_to_completion() {
    let mut app = TunnelTestAppBuilder::new(create_test_tunnel())
        .with_run(flap_specification(vec![0.0, 20.0]))
        .with_run(flap_specification(vec![40.0]))
        .build();

    let finished = app.run_until_finished(500).expect("Sweep never finished");
    assert_eq!(finished.phase, SweepPhase::Done);
    assert_eq!(finished.rows, 6);
    assert!(finished.error.is_none());
    assert!(!app.is_sweeping());

    assert_rows_complete(&app.sinks[0], 3);
    assert_rows_complete(&app.sinks[1], 3);
    assert!(app.sinks.iter().all(|sink| sink.is_finished()));
    assert_relative_eq!(
        app.tunnel.engine().fixed_timestep().unwrap(),
        DEFAULT_TIMESTEP
    );
}

#[test]
fn test_plugin_cancels_on_event() {
    let mut app = TunnelTestAppBuilder::new(create_test_tunnel())
        .with_run(flap_specification(vec![0.0, 20.0, 40.0]))
        .with_frame(Duration::from_millis(2))
        .build();

    for _ in 0..20 {
        if app.sinks[0].header().is_some() {
            break;
        }
        app.run_frame();
    }
    assert!(app.sinks[0].header().is_some(), "Sweep never started");
    assert!(app.is_sweeping());

    app.send_event(CancelSweep);
    let finished = app.run_until_finished(10).expect("Cancel was not honoured");
    assert_eq!(finished.phase, SweepPhase::Cancelled);
    assert!(app.sinks[0].is_finished());
    assert!(app.sinks[0].rows().len() < 3);
}

#[test]
fn test_live_readout_after_sweep() {
    let level = SweepSpecification::new(
        PrimarySweep::linspace(PrimaryVariable::Alpha, 0.0, 0.0, 1).unwrap(),
    )
    .with_secondary(SecondarySweep::new(SecondaryVariable::Flap, vec![0.0]));
    let mut app = TunnelTestAppBuilder::new(create_test_tunnel())
        .with_run(level)
        .with_live_mount(ConstraintMode::Fixed)
        .build();

    let finished = app.run_until_finished(500).expect("Sweep never finished");
    assert_eq!(finished.phase, SweepPhase::Done);
    for _ in 0..5 {
        app.run_frame();
    }
    assert!(app.is_live());
    assert_relative_eq!(app.tunnel.flow().speed().unwrap(), TEST_FLOW_SPEED, epsilon = 1e-12);

    let readout = app.readout().expect("No readout published");
    assert_eq!(readout.mode, ConstraintMode::Fixed);
    assert!(readout.attitude.is_none());
    assert_coefficient_eq(readout.coefficients.unwrap().lift(), CL_0, 1e-6);

    // Still refreshed every fixed update
    app.run_frame();
    assert!(app.readout().unwrap().step > readout.step);
}

#[test]
fn test_new_sweep_takes_over_live_mount() {
    let tunnel = create_test_tunnel();
    let mut app = TunnelTestAppBuilder::new(tunnel.clone())
        .with_run(flap_specification(vec![0.0]))
        .with_live_mount(ConstraintMode::Gimbal)
        .build();
    app.run_until_finished(500).expect("First sweep never finished");
    for _ in 0..3 {
        app.run_frame();
    }
    assert!(app.is_live());
    assert!(app.readout().unwrap().attitude.is_some());

    let sink = MemorySink::new();
    let boxed: BoxedSink = Box::new(sink.clone());
    let sweep = SweepController::new(
        ForceBalance::new(tunnel.engine()),
        tunnel.flow(),
        tunnel.controls(),
        SweepSettings::default(),
        vec![SweepRun::new(flap_specification(vec![0.0]), boxed)],
    )
    .unwrap();
    app.app.world_mut().insert_resource(ActiveSweep(sweep));

    app.run_frame();
    assert!(!app.is_live());
    assert!(sink.header().is_some());

    for _ in 0..500 {
        if !app.is_sweeping() {
            break;
        }
        app.run_frame();
    }
    assert!(!app.is_sweeping());
    assert_rows_complete(&sink, 3);

    app.run_frame();
    assert!(app.is_live());
}
