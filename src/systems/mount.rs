use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{Constraint, ConstraintMode, Reaction};
use crate::resources::{ConstraintId, PhysicsEngine, RigError, RigResult};
use crate::utils::ANCHOR_TOLERANCE;

#[derive(Debug, Clone, Copy)]
struct Mounted {
    id: ConstraintId,
    constraint: Constraint,
}

/// Six degree of freedom mount between the aircraft and the world, anchored at the
/// centre of mass.
///
/// The live constraint is never edited. Every change of mode, pose or centre of
/// gravity detaches it and attaches a newly built one.
pub struct ConstraintMount<E: PhysicsEngine> {
    engine: E,
    mode: ConstraintMode,
    mounted: Option<Mounted>,
}

impl<E: PhysicsEngine> ConstraintMount<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            mode: ConstraintMode::default(),
            mounted: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn mode(&self) -> ConstraintMode {
        self.mode
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.mounted.as_ref().map(|m| &m.constraint)
    }

    /// Replace the constraint with a new one in `mode`, anchored at the current centre of mass.
    pub fn set_mode(&mut self, mode: ConstraintMode) -> RigResult<()> {
        self.remove()?;

        let anchor = self.engine.centre_of_mass_local()?;
        let connected_anchor = self.engine.centre_of_mass_world()?;
        let constraint = Constraint::new(mode, anchor, connected_anchor);
        let id = self.engine.attach(constraint)?;

        self.mode = mode;
        self.mounted = Some(Mounted { id, constraint });
        debug!(
            "Mounted {:?} constraint {} at local {:?}",
            mode, id.0, anchor
        );
        Ok(())
    }

    /// Destroy the constraint if one is attached.
    pub fn remove(&mut self) -> RigResult<()> {
        if let Some(mounted) = self.mounted.take() {
            self.engine.detach(mounted.id)?;
            debug!("Removed constraint {}", mounted.id.0);
        }
        Ok(())
    }

    /// Rebuild in the current mode.
    pub fn rebuild(&mut self) -> RigResult<()> {
        self.set_mode(self.mode)
    }

    /// Detach, apply a change to the body, then rebuild in the current mode.
    ///
    /// The only way pose or centre of gravity should change while mounted.
    pub fn reconfigure<F>(&mut self, change: F) -> RigResult<()>
    where
        F: FnOnce(&mut E) -> RigResult<()>,
    {
        self.remove()?;
        change(&mut self.engine)?;
        self.rebuild()
    }

    /// True while the live constraint is anchored at the body's centre of mass.
    pub fn is_anchor_current(&self) -> RigResult<bool> {
        let mounted = self.mounted.as_ref().ok_or(RigError::NotMounted)?;
        let centre = self.engine.centre_of_mass_local()?;
        Ok((mounted.constraint.anchor - centre).norm() <= ANCHOR_TOLERANCE)
    }

    fn reaction(&self) -> RigResult<Reaction> {
        let mounted = self.mounted.as_ref().ok_or(RigError::NotMounted)?;
        if !self.is_anchor_current()? {
            return Err(RigError::StaleConstraint);
        }
        self.engine.reaction(mounted.id)
    }

    /// Reaction force at the anchor, world axes.
    pub fn current_force(&self) -> RigResult<Vector3<f64>> {
        Ok(self.reaction()?.force)
    }

    /// Reaction torque about the anchor, world axes.
    pub fn current_torque(&self) -> RigResult<Vector3<f64>> {
        Ok(self.reaction()?.torque)
    }
}

/// A mount owns its constraint: dropping it leaves the body free.
impl<E: PhysicsEngine> Drop for ConstraintMount<E> {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            warn!("Failed to detach constraint: {}", e);
        }
    }
}
