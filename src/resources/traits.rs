use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::components::{Constraint, Reaction};
use crate::resources::errors::RigResult;

/// Handle to a constraint attached to a physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintId(pub u64);

/// The stepped rigid-body simulation the rig is mounted in.
///
/// Every query returns a `RigResult` so that implementations shared across threads can
/// report an unusable engine rather than panic.
pub trait PhysicsEngine {
    /// Ok when an aircraft body exists and can be constrained.
    fn is_ready(&self) -> RigResult<()>;

    fn fixed_timestep(&self) -> RigResult<f64>;

    fn set_fixed_timestep(&mut self, timestep: f64) -> RigResult<()>;

    /// Advance the simulation by exactly one fixed timestep.
    fn step(&mut self) -> RigResult<()>;

    /// Number of steps integrated since the engine was created.
    fn step_count(&self) -> RigResult<u64>;

    /// Centre of mass in body-local coordinates [m]
    fn centre_of_mass_local(&self) -> RigResult<Vector3<f64>>;

    /// Centre of mass in world coordinates [m]
    fn centre_of_mass_world(&self) -> RigResult<Vector3<f64>>;

    fn attitude(&self) -> RigResult<UnitQuaternion<f64>>;

    /// Rotate the body to `attitude` about its centre of mass and bring it to rest.
    fn set_attitude(&mut self, attitude: UnitQuaternion<f64>) -> RigResult<()>;

    fn attach(&mut self, constraint: Constraint) -> RigResult<ConstraintId>;

    fn detach(&mut self, id: ConstraintId) -> RigResult<()>;

    /// Reaction exerted by the constraint during the most recent step.
    fn reaction(&self, id: ConstraintId) -> RigResult<Reaction>;
}

/// The tunnel's free stream.
pub trait FlowSource {
    /// Set the flow from angles in degrees and a speed in m/s, returning the wind vector.
    fn set_flow(
        &mut self,
        azimuth_deg: f64,
        elevation_deg: f64,
        speed: f64,
    ) -> RigResult<Vector3<f64>>;

    fn speed(&self) -> RigResult<f64>;
}

/// Control surfaces and ballast of the mounted aircraft. Deflections are in degrees.
pub trait AircraftControlInterface {
    fn is_available(&self) -> RigResult<()>;

    fn set_flap_deflection(&mut self, degrees: f64) -> RigResult<()>;

    fn set_elevator_deflection(&mut self, degrees: f64) -> RigResult<()>;

    fn set_aileron_deflection(&mut self, degrees: f64) -> RigResult<()>;

    /// Move the centre of gravity to `percent_mac` aft of the leading edge.
    fn set_cg_offset(&mut self, percent_mac: f64) -> RigResult<()>;
}
