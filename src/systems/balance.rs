use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::resources::{FlowSource, PhysicsEngine, RigError, RigResult};
use crate::systems::ConstraintMount;

/// Raw reaction and the zero offsets captured at tare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceReading {
    pub raw_force: Vector3<f64>,
    pub raw_torque: Vector3<f64>,
    pub zero_force: Vector3<f64>,
    pub zero_torque: Vector3<f64>,
}

impl BalanceReading {
    pub fn corrected_force(&self) -> Vector3<f64> {
        self.raw_force + self.zero_force
    }

    pub fn corrected_torque(&self) -> Vector3<f64> {
        self.raw_torque + self.zero_torque
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ZeroOffsets {
    force: Vector3<f64>,
    torque: Vector3<f64>,
}

/// Force balance: a constraint mount plus the zero offsets that remove the
/// model's weight from every reading.
pub struct ForceBalance<E: PhysicsEngine> {
    mount: ConstraintMount<E>,
    zero: Option<ZeroOffsets>,
}

impl<E: PhysicsEngine> ForceBalance<E> {
    pub fn new(engine: E) -> Self {
        Self {
            mount: ConstraintMount::new(engine),
            zero: None,
        }
    }

    pub fn mount(&self) -> &ConstraintMount<E> {
        &self.mount
    }

    pub fn mount_mut(&mut self) -> &mut ConstraintMount<E> {
        &mut self.mount
    }

    pub fn engine(&self) -> &E {
        self.mount.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.mount.engine_mut()
    }

    pub fn is_tared(&self) -> bool {
        self.zero.is_some()
    }

    /// Discard the zero offsets; readings fail until the next tare.
    pub fn clear_tare(&mut self) {
        self.zero = None;
    }

    /// Capture zero offsets at still air with the model rigidly mounted.
    ///
    /// Rebuilds the constraint, advances the physics one step, and stores the
    /// negated reaction.
    pub fn tare<F: FlowSource + ?Sized>(&mut self, flow: &F) -> RigResult<()> {
        let mode = self.mount.mode();
        if !mode.is_rigid() {
            return Err(RigError::TareRequiresFixed(mode));
        }
        let speed = flow.speed()?;
        if speed != 0.0 {
            return Err(RigError::TareWithFlow(speed));
        }

        self.mount.rebuild()?;
        self.mount.engine_mut().step()?;

        let force = self.mount.current_force()?;
        let torque = self.mount.current_torque()?;
        self.zero = Some(ZeroOffsets {
            force: -force,
            torque: -torque,
        });
        debug!("Tared balance: force {:?}, torque {:?}", -force, -torque);
        Ok(())
    }

    fn offsets(&self) -> RigResult<ZeroOffsets> {
        self.zero.ok_or(RigError::NotTared)
    }

    /// Tare-corrected force, world axes.
    pub fn read_force(&self) -> RigResult<Vector3<f64>> {
        Ok(self.mount.current_force()? + self.offsets()?.force)
    }

    /// Tare-corrected torque about the anchor, world axes.
    pub fn read_torque(&self) -> RigResult<Vector3<f64>> {
        Ok(self.mount.current_torque()? + self.offsets()?.torque)
    }

    pub fn reading(&self) -> RigResult<BalanceReading> {
        let zero = self.offsets()?;
        Ok(BalanceReading {
            raw_force: self.mount.current_force()?,
            raw_torque: self.mount.current_torque()?,
            zero_force: zero.force,
            zero_torque: zero.torque,
        })
    }
}
