use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::{deg_to_rad, RngManager};

/// Current control surface deflections in radians.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub flap: f64,
    pub elevator: f64,
    pub aileron: f64,
}

/// Per-surface sign applied to commanded deflections.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlPolarity {
    pub reverse_flap: bool,
    pub reverse_elevator: bool,
    pub reverse_aileron: bool,
}

impl ControlPolarity {
    /// Polarity drawn from a generator seeded with `identifier`, so each user sees the
    /// same reversals every session.
    pub fn seeded(identifier: &str) -> Self {
        Self::draw(&mut RngManager::from_identifier(identifier))
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::draw(&mut RngManager::new(seed).get_rng("polarity"))
    }

    fn draw(rng: &mut impl Rng) -> Self {
        Self {
            reverse_flap: rng.gen_bool(0.5),
            reverse_elevator: rng.gen_bool(0.5),
            reverse_aileron: rng.gen_bool(0.5),
        }
    }

    fn sign(reversed: bool) -> f64 {
        if reversed {
            -1.0
        } else {
            1.0
        }
    }
}

/// Commanded deflections are clamped to this throw either side of neutral.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    pub max_deflection_deg: f64,
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            max_deflection_deg: 45.0,
        }
    }
}

impl ControlLimits {
    fn clamp_deg(&self, degrees: f64) -> f64 {
        degrees.clamp(-self.max_deflection_deg, self.max_deflection_deg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSurface {
    Flap,
    Elevator,
    Aileron,
}

impl ControlState {
    /// Apply a commanded deflection in degrees after limits and polarity.
    pub fn command(
        &mut self,
        surface: ControlSurface,
        degrees: f64,
        polarity: &ControlPolarity,
        limits: &ControlLimits,
    ) {
        let clamped = limits.clamp_deg(degrees);
        if clamped != degrees {
            warn!(
                "{:?} command of {:.2} deg clamped to {:.2} deg",
                surface, degrees, clamped
            );
        }
        match surface {
            ControlSurface::Flap => {
                self.flap = ControlPolarity::sign(polarity.reverse_flap) * deg_to_rad(clamped)
            }
            ControlSurface::Elevator => {
                self.elevator =
                    ControlPolarity::sign(polarity.reverse_elevator) * deg_to_rad(clamped)
            }
            ControlSurface::Aileron => {
                self.aileron = ControlPolarity::sign(polarity.reverse_aileron) * deg_to_rad(clamped)
            }
        }
    }
}
