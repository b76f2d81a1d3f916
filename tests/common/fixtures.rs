use std::sync::{Arc, Mutex};

use windtunnel::{
    components::{
        CoefficientKind, CoefficientRow, Header, PrimarySweep, PrimaryVariable, SecondarySweep,
        SecondaryVariable, SweepSpecification,
    },
    resources::{
        AircraftControlInterface, DataSink, FlowCondition, MemorySink, RigError, RigResult,
        SinkResult, SweepSettings, TunnelConfig,
    },
    systems::{
        ForceBalance, SharedTunnel, SweepController, SweepRun, TunnelControls, TunnelEngine,
        TunnelFlow, VirtualTunnel,
    },
};

pub type MemoryController = SweepController<TunnelEngine, TunnelFlow, TunnelControls, MemorySink>;

/// Trainer lift at zero incidence, clean
pub const CL_0: f64 = 0.25;
pub const CL_DELTA_F: f64 = 0.9;

pub fn create_test_tunnel() -> SharedTunnel {
    create_tunnel_with(&TunnelConfig::default())
}

pub fn create_tunnel_with(config: &TunnelConfig) -> SharedTunnel {
    SharedTunnel::new(VirtualTunnel::from_config(config))
}

/// Trainer tunnel filled with air at the flow's density
pub fn create_tunnel_for(flow: &FlowCondition) -> SharedTunnel {
    SharedTunnel::new(VirtualTunnel::for_flow(&TunnelConfig::default(), flow))
}

/// Alpha at 0, 5 and 10 degrees
pub fn alpha_sweep() -> PrimarySweep {
    PrimarySweep::linspace(PrimaryVariable::Alpha, 0.0, 10.0, 3).unwrap()
}

pub fn flap_specification(flaps: Vec<f64>) -> SweepSpecification {
    SweepSpecification::new(alpha_sweep())
        .with_secondary(SecondarySweep::new(SecondaryVariable::Flap, flaps))
        .with_secondary(SecondarySweep::new(SecondaryVariable::Elevator, Vec::new()))
}

pub fn cg_specification(positions: Vec<f64>) -> SweepSpecification {
    SweepSpecification::new(PrimarySweep::linspace(PrimaryVariable::Alpha, 0.0, 0.0, 1).unwrap())
        .with_secondary(
            SecondarySweep::new(SecondaryVariable::CgPosition, positions)
                .with_outputs(vec![CoefficientKind::Pitch, CoefficientKind::Lift]),
        )
}

/// A controller over a fresh tunnel writing to one memory sink. The returned sink
/// and tunnel share state with the controller.
pub fn create_memory_controller(
    tunnel: &SharedTunnel,
    specification: SweepSpecification,
    settings: SweepSettings,
) -> (MemoryController, MemorySink) {
    let sink = MemorySink::new();
    let controller = SweepController::new(
        ForceBalance::new(tunnel.engine()),
        tunnel.flow(),
        tunnel.controls(),
        settings,
        vec![SweepRun::new(specification, sink.clone())],
    )
    .unwrap();
    (controller, sink)
}

/// Controls whose actuators never answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedControls;

impl AircraftControlInterface for DisconnectedControls {
    fn is_available(&self) -> RigResult<()> {
        Err(RigError::ControlsUnavailable("no servo link".to_string()))
    }

    fn set_flap_deflection(&mut self, _degrees: f64) -> RigResult<()> {
        self.is_available()
    }

    fn set_elevator_deflection(&mut self, _degrees: f64) -> RigResult<()> {
        self.is_available()
    }

    fn set_aileron_deflection(&mut self, _degrees: f64) -> RigResult<()> {
        self.is_available()
    }

    fn set_cg_offset(&mut self, _percent_mac: f64) -> RigResult<()> {
        self.is_available()
    }
}

/// Every actuator command and emitted row, in the order the controller issued them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigCall {
    Flap(f64),
    Elevator(f64),
    Aileron(f64),
    Cg(f64),
    Row(f64),
}

pub type CallLog = Arc<Mutex<Vec<RigCall>>>;

/// Tunnel controls that log each command before forwarding it.
#[derive(Clone)]
pub struct RecordingControls {
    inner: TunnelControls,
    log: CallLog,
}

impl RecordingControls {
    pub fn new(inner: TunnelControls, log: CallLog) -> Self {
        Self { inner, log }
    }

    fn record(&self, call: RigCall) {
        self.log.lock().unwrap().push(call);
    }
}

impl AircraftControlInterface for RecordingControls {
    fn is_available(&self) -> RigResult<()> {
        self.inner.is_available()
    }

    fn set_flap_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.record(RigCall::Flap(degrees));
        self.inner.set_flap_deflection(degrees)
    }

    fn set_elevator_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.record(RigCall::Elevator(degrees));
        self.inner.set_elevator_deflection(degrees)
    }

    fn set_aileron_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.record(RigCall::Aileron(degrees));
        self.inner.set_aileron_deflection(degrees)
    }

    fn set_cg_offset(&mut self, percent_mac: f64) -> RigResult<()> {
        self.record(RigCall::Cg(percent_mac));
        self.inner.set_cg_offset(percent_mac)
    }
}

/// Memory sink that also logs each row into a shared call log.
#[derive(Clone)]
pub struct RecordingSink {
    inner: MemorySink,
    log: CallLog,
}

impl RecordingSink {
    pub fn new(log: CallLog) -> Self {
        Self {
            inner: MemorySink::new(),
            log,
        }
    }

    pub fn memory(&self) -> &MemorySink {
        &self.inner
    }
}

impl DataSink for RecordingSink {
    fn begin(&mut self, header: &Header) -> SinkResult<()> {
        self.inner.begin(header)
    }

    fn append(&mut self, row: &CoefficientRow) -> SinkResult<()> {
        self.log.lock().unwrap().push(RigCall::Row(row.primary));
        self.inner.append(row)
    }

    fn finish(&mut self) -> SinkResult<()> {
        self.inner.finish()
    }
}
