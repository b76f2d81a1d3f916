use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{sweep::SweepSettings, tunnel::TunnelConfig};
use crate::components::{
    ConstraintMode, PrimarySweep, PrimaryVariable, SecondarySweep, SecondaryVariable,
    SweepSpecification,
};
use crate::resources::ConfigError;

/// Optional sideslip run at a fixed angle of attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaSweepConfig {
    pub alpha_deg: f64,
    pub min: f64,
    pub max: f64,
}

/// A complete experiment as written in a YAML or JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Output files are named `<stem> alpha.txt` and `<stem> beta.txt`
    pub output_stem: PathBuf,
    /// Append the local start time to the stem so repeated runs never overwrite
    pub timestamp_outputs: bool,
    /// Number of primary points, shared by the alpha and beta runs
    pub points: usize,
    pub alpha_min: f64,
    pub alpha_max: f64,
    pub beta: Option<BetaSweepConfig>,
    pub flaps: Vec<f64>,
    pub elevators: Vec<f64>,
    pub ailerons: Vec<f64>,
    pub cg_positions: Vec<f64>,
    pub settings: SweepSettings,
    pub tunnel: TunnelConfig,
    /// Mount used once the sweeps are done. Sweeps always measure rigidly.
    pub mount_mode: ConstraintMode,
    /// Stay running after the sweeps with the model mounted in `mount_mode`
    pub live_readout: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            output_stem: PathBuf::from("Wind Tunnel Data"),
            timestamp_outputs: false,
            points: 100,
            alpha_min: -5.0,
            alpha_max: 15.0,
            beta: None,
            flaps: vec![0.0, 20.0, 40.0],
            elevators: vec![0.0, 20.0, 40.0],
            ailerons: Vec::new(),
            cg_positions: vec![25.0, 0.0, 50.0, 75.0],
            settings: SweepSettings::default(),
            tunnel: TunnelConfig::default(),
            mount_mode: ConstraintMode::Fixed,
            live_readout: false,
        }
    }
}

/// One output stream: where it goes and what it sweeps.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub path: PathBuf,
    pub specification: SweepSpecification,
}

impl ExperimentConfig {
    /// Load from YAML, or JSON when the extension is `.json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    pub fn with_alpha_range(mut self, min: f64, max: f64) -> Self {
        self.alpha_min = min;
        self.alpha_max = max;
        self
    }

    pub fn with_beta(mut self, beta: BetaSweepConfig) -> Self {
        self.beta = Some(beta);
        self
    }

    pub fn with_output_stem(mut self, stem: impl Into<PathBuf>) -> Self {
        self.output_stem = stem.into();
        self
    }

    fn secondaries(&self) -> Vec<SecondarySweep> {
        vec![
            SecondarySweep::new(SecondaryVariable::Flap, self.flaps.clone()),
            SecondarySweep::new(SecondaryVariable::Elevator, self.elevators.clone()),
            SecondarySweep::new(SecondaryVariable::Aileron, self.ailerons.clone()),
            SecondarySweep::new(SecondaryVariable::CgPosition, self.cg_positions.clone()),
        ]
    }

    fn output_path(&self, stamp: Option<&str>, suffix: &str) -> PathBuf {
        let mut name = self.output_stem.as_os_str().to_os_string();
        if let Some(stamp) = stamp {
            name.push(format!("_{}", stamp));
        }
        name.push(format!(" {}.txt", suffix));
        PathBuf::from(name)
    }

    /// Check every value and build the runs in execution order: alpha, then beta.
    pub fn validate(&self) -> Result<Vec<PlannedRun>, ConfigError> {
        self.settings.validate()?;
        self.tunnel.validate()?;

        for sweep in self.secondaries() {
            if let Some(value) = sweep.values.iter().find(|v| !v.is_finite()) {
                return Err(ConfigError::invalid(sweep.variable.label(), value));
            }
        }

        let stamp = self
            .timestamp_outputs
            .then(|| chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());

        let alpha = PrimarySweep::linspace(
            PrimaryVariable::Alpha,
            self.alpha_min,
            self.alpha_max,
            self.points,
        )?;
        let mut runs = vec![PlannedRun {
            path: self.output_path(stamp.as_deref(), "alpha"),
            specification: self.specification(alpha),
        }];

        if let Some(beta) = &self.beta {
            if !beta.alpha_deg.is_finite() {
                return Err(ConfigError::invalid("beta.alpha_deg", beta.alpha_deg));
            }
            let sweep = PrimarySweep::linspace(
                PrimaryVariable::Beta {
                    alpha_deg: beta.alpha_deg,
                },
                beta.min,
                beta.max,
                self.points,
            )?;
            runs.push(PlannedRun {
                path: self.output_path(stamp.as_deref(), "beta"),
                specification: self.specification(sweep),
            });
        }

        Ok(runs)
    }

    fn specification(&self, primary: PrimarySweep) -> SweepSpecification {
        self.secondaries()
            .into_iter()
            .fold(SweepSpecification::new(primary), |spec, sweep| {
                spec.with_secondary(sweep)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_plans_single_alpha_run() {
        let runs = ExperimentConfig::default().validate().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].path, PathBuf::from("Wind Tunnel Data alpha.txt"));
        assert_eq!(runs[0].specification.primary.len(), 100);
        // flap 3x2, elevator 3x2, CG 4x1
        assert_eq!(runs[0].specification.column_count(), 16);
    }

    #[test]
    fn test_beta_run_follows_alpha() {
        let config = ExperimentConfig::default()
            .with_output_stem("out/data")
            .with_beta(BetaSweepConfig {
                alpha_deg: 4.0,
                min: -10.0,
                max: 10.0,
            });
        let runs = config.validate().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].path, PathBuf::from("out/data beta.txt"));
        assert_eq!(
            runs[1].specification.primary.variable,
            PrimaryVariable::Beta { alpha_deg: 4.0 }
        );
    }

    #[test]
    fn test_timestamped_outputs_share_a_stamp() {
        let config = ExperimentConfig {
            timestamp_outputs: true,
            beta: Some(BetaSweepConfig {
                alpha_deg: 0.0,
                min: -5.0,
                max: 5.0,
            }),
            ..ExperimentConfig::default()
        };
        let runs = config.validate().unwrap();
        let alpha = runs[0].path.to_string_lossy().to_string();
        let beta = runs[1].path.to_string_lossy().to_string();

        assert!(alpha.starts_with("Wind Tunnel Data_"));
        assert!(alpha.ends_with(" alpha.txt"));
        assert_eq!(
            alpha.trim_end_matches(" alpha.txt"),
            beta.trim_end_matches(" beta.txt")
        );
    }

    #[test]
    fn test_zero_points_rejected() {
        let result = ExperimentConfig::default().with_points(0).validate();
        assert!(matches!(result, Err(ConfigError::EmptyPrimarySweep)));
    }

    #[test]
    fn test_non_finite_secondary_rejected() {
        let mut config = ExperimentConfig::default();
        config.flaps.push(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "points: 3\nalpha_min: 0.0\nalpha_max: 10.0\nflaps: [0.0, 20.0, 40.0]\nelevators: []\ncg_positions: []\n";
        let config: ExperimentConfig = serde_yaml::from_str(yaml).unwrap();
        let runs = config.validate().unwrap();
        assert_eq!(runs[0].specification.primary.values(), &[0.0, 5.0, 10.0]);
        assert_eq!(runs[0].specification.column_count(), 6);
        assert_eq!(config.settings, SweepSettings::default());
        assert_eq!(config.mount_mode, ConstraintMode::Fixed);
        assert!(!config.live_readout);
    }

    #[test]
    fn test_mount_mode_from_yaml() {
        let yaml = "mount_mode: Longitudinal\nlive_readout: true\nsettings:\n  flow:\n    density: 1.0\n";
        let config: ExperimentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.mount_mode, ConstraintMode::Longitudinal);
        assert!(config.live_readout);
        assert_eq!(config.settings.flow.density, 1.0);
        assert!(config.validate().is_ok());
    }
}
