use std::sync::{Arc, Mutex, MutexGuard};

use nalgebra::{UnitQuaternion, Vector3};

use super::virtual_tunnel::VirtualTunnel;
use crate::components::{Constraint, Reaction};
use crate::resources::{
    AircraftControlInterface, ConstraintId, FlowSource, PhysicsEngine, RigError, RigResult,
};

/// A virtual tunnel shared between the engine, flow and control handles a sweep holds.
#[derive(Clone)]
pub struct SharedTunnel {
    inner: Arc<Mutex<VirtualTunnel>>,
}

impl SharedTunnel {
    pub fn new(tunnel: VirtualTunnel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tunnel)),
        }
    }

    pub fn lock(&self) -> RigResult<MutexGuard<'_, VirtualTunnel>> {
        self.inner
            .lock()
            .map_err(|_| RigError::EngineUnavailable("virtual tunnel lock poisoned".to_string()))
    }

    pub fn engine(&self) -> TunnelEngine {
        TunnelEngine(self.clone())
    }

    pub fn flow(&self) -> TunnelFlow {
        TunnelFlow(self.clone())
    }

    pub fn controls(&self) -> TunnelControls {
        TunnelControls(self.clone())
    }
}

/// [`PhysicsEngine`] view of a shared tunnel.
#[derive(Clone)]
pub struct TunnelEngine(SharedTunnel);

/// [`FlowSource`] view of a shared tunnel.
#[derive(Clone)]
pub struct TunnelFlow(SharedTunnel);

/// [`AircraftControlInterface`] view of a shared tunnel.
#[derive(Clone)]
pub struct TunnelControls(SharedTunnel);

impl PhysicsEngine for TunnelEngine {
    fn is_ready(&self) -> RigResult<()> {
        self.0.lock()?.is_ready()
    }

    fn fixed_timestep(&self) -> RigResult<f64> {
        self.0.lock()?.fixed_timestep()
    }

    fn set_fixed_timestep(&mut self, timestep: f64) -> RigResult<()> {
        self.0.lock()?.set_fixed_timestep(timestep)
    }

    fn step(&mut self) -> RigResult<()> {
        self.0.lock()?.step()
    }

    fn step_count(&self) -> RigResult<u64> {
        self.0.lock()?.step_count()
    }

    fn centre_of_mass_local(&self) -> RigResult<Vector3<f64>> {
        self.0.lock()?.centre_of_mass_local()
    }

    fn centre_of_mass_world(&self) -> RigResult<Vector3<f64>> {
        self.0.lock()?.centre_of_mass_world()
    }

    fn attitude(&self) -> RigResult<UnitQuaternion<f64>> {
        self.0.lock()?.attitude()
    }

    fn set_attitude(&mut self, attitude: UnitQuaternion<f64>) -> RigResult<()> {
        self.0.lock()?.set_attitude(attitude)
    }

    fn attach(&mut self, constraint: Constraint) -> RigResult<ConstraintId> {
        self.0.lock()?.attach(constraint)
    }

    fn detach(&mut self, id: ConstraintId) -> RigResult<()> {
        self.0.lock()?.detach(id)
    }

    fn reaction(&self, id: ConstraintId) -> RigResult<Reaction> {
        self.0.lock()?.reaction(id)
    }
}

impl FlowSource for TunnelFlow {
    fn set_flow(
        &mut self,
        azimuth_deg: f64,
        elevation_deg: f64,
        speed: f64,
    ) -> RigResult<Vector3<f64>> {
        self.0
            .lock()
            .map_err(|e| RigError::FlowUnavailable(e.to_string()))?
            .set_flow(azimuth_deg, elevation_deg, speed)
    }

    fn speed(&self) -> RigResult<f64> {
        self.0
            .lock()
            .map_err(|e| RigError::FlowUnavailable(e.to_string()))?
            .speed()
    }
}

impl TunnelControls {
    fn with<R>(&self, f: impl FnOnce(&mut VirtualTunnel) -> RigResult<R>) -> RigResult<R> {
        let mut tunnel = self
            .0
            .lock()
            .map_err(|e| RigError::ControlsUnavailable(e.to_string()))?;
        f(&mut tunnel)
    }
}

impl AircraftControlInterface for TunnelControls {
    fn is_available(&self) -> RigResult<()> {
        self.with(|tunnel| tunnel.is_available())
    }

    fn set_flap_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.with(|tunnel| tunnel.set_flap_deflection(degrees))
    }

    fn set_elevator_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.with(|tunnel| tunnel.set_elevator_deflection(degrees))
    }

    fn set_aileron_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.with(|tunnel| tunnel.set_aileron_deflection(degrees))
    }

    fn set_cg_offset(&mut self, percent_mac: f64) -> RigResult<()> {
        self.with(|tunnel| tunnel.set_cg_offset(percent_mac))
    }
}
