use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::components::ConstraintMode;
use crate::resources::{FlowSource, PhysicsEngine, RigResult, SweepSettings};
use crate::systems::{AeroCoefficients, BalanceReading, ForceBalance};

/// What the balance shows after a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TunnelReadout {
    pub step: u64,
    pub mode: ConstraintMode,
    /// Untared reaction at the anchor, world axes
    pub raw_force: Vector3<f64>,
    pub raw_torque: Vector3<f64>,
    /// Raw and zero offsets, once the balance is tared
    pub reading: Option<BalanceReading>,
    /// At the nominal test-flow dynamic pressure
    pub coefficients: Option<AeroCoefficients>,
    /// Only reported when the mount leaves rotation free
    pub attitude: Option<UnitQuaternion<f64>>,
}

impl TunnelReadout {
    pub fn capture<E: PhysicsEngine>(
        balance: &ForceBalance<E>,
        settings: &SweepSettings,
    ) -> RigResult<Self> {
        let mount = balance.mount();
        let mode = mount.mode();
        let raw_force = mount.current_force()?;
        let raw_torque = mount.current_torque()?;

        let reading = balance.reading().ok();
        let coefficients = reading.and_then(|reading| {
            AeroCoefficients::from_reading(
                &reading.corrected_force(),
                &reading.corrected_torque(),
                settings.flow.dynamic_pressure(),
                settings.reference.wing_area,
                settings.reference.mac,
            )
            .ok()
        });
        let attitude = if mode.is_rigid() {
            None
        } else {
            Some(balance.engine().attitude()?)
        };

        Ok(Self {
            step: balance.engine().step_count()?,
            mode,
            raw_force,
            raw_torque,
            reading,
            coefficients,
            attitude,
        })
    }
}

/// A tared balance left in the test flow outside a sweep, so the model can be
/// watched in any mount mode.
pub struct LiveBalance<E: PhysicsEngine, F: FlowSource> {
    balance: ForceBalance<E>,
    flow: F,
    settings: SweepSettings,
}

impl<E: PhysicsEngine, F: FlowSource> LiveBalance<E, F> {
    /// Tare rigidly in still air, remount in `mode` and turn the test flow on.
    pub fn mount(
        engine: E,
        mut flow: F,
        settings: SweepSettings,
        mode: ConstraintMode,
    ) -> RigResult<Self> {
        let test = settings.flow;
        let mut balance = ForceBalance::new(engine);

        flow.set_flow(test.azimuth_deg, test.elevation_deg, 0.0)?;
        balance.mount_mut().set_mode(ConstraintMode::Fixed)?;
        balance.tare(&flow)?;
        balance.mount_mut().set_mode(mode)?;
        flow.set_flow(test.azimuth_deg, test.elevation_deg, test.speed)?;

        info!("Live balance mounted {:?} at {:.1} m/s", mode, test.speed);
        Ok(Self {
            balance,
            flow,
            settings,
        })
    }

    pub fn balance(&self) -> &ForceBalance<E> {
        &self.balance
    }

    pub fn mode(&self) -> ConstraintMode {
        self.balance.mount().mode()
    }

    pub fn readout(&self) -> RigResult<TunnelReadout> {
        TunnelReadout::capture(&self.balance, &self.settings)
    }

    /// Detach the model and stop the flow, leaving the tunnel free for a sweep.
    pub fn release(&mut self) -> RigResult<()> {
        self.balance.mount_mut().remove()?;
        let test = self.settings.flow;
        self.flow
            .set_flow(test.azimuth_deg, test.elevation_deg, 0.0)?;
        debug!("Live balance released");
        Ok(())
    }
}
