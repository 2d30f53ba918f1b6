use nalgebra::Point3;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::ramachandran::empirical::DEFAULT_RESOLUTION_DEG;

/// Notional mass of every backbone atom, in the simulator's pseudo-units.
pub const DEFAULT_ATOM_MASS: f64 = 2.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Time-stepping parameters of a folding run.
///
/// Durations are in femtoseconds. Construct through [`SimulationConfigBuilder`],
/// which rejects non-positive or non-finite values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub duration_fs: f64,
    pub time_step_fs: f64,
    pub reset_velocity: bool,
    pub atom_mass: f64,
}

impl SimulationConfig {
    /// Number of integration steps needed to cover the full duration.
    ///
    /// Equals `ceil(duration / time_step)`, except that quotients within 1e-9 of an
    /// integer are rounded to it so `500 / 2` yields exactly 250 steps.
    pub fn total_steps(&self) -> u64 {
        let quotient = self.duration_fs / self.time_step_fs;
        let rounded = quotient.round();
        if (quotient - rounded).abs() <= 1e-9 {
            rounded as u64
        } else {
            quotient.ceil() as u64
        }
    }
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    duration_fs: Option<f64>,
    time_step_fs: Option<f64>,
    reset_velocity: Option<bool>,
    atom_mass: Option<f64>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration_fs(mut self, duration: f64) -> Self {
        self.duration_fs = Some(duration);
        self
    }

    pub fn time_step_fs(mut self, step: f64) -> Self {
        self.time_step_fs = Some(step);
        self
    }

    pub fn reset_velocity(mut self, reset: bool) -> Self {
        self.reset_velocity = Some(reset);
        self
    }

    pub fn atom_mass(mut self, mass: f64) -> Self {
        self.atom_mass = Some(mass);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let duration_fs = self
            .duration_fs
            .ok_or(ConfigError::MissingParameter("duration_fs"))?;
        let time_step_fs = self
            .time_step_fs
            .ok_or(ConfigError::MissingParameter("time_step_fs"))?;
        let atom_mass = self.atom_mass.unwrap_or(DEFAULT_ATOM_MASS);

        require_positive("duration_fs", duration_fs)?;
        require_positive("time_step_fs", time_step_fs)?;
        require_positive("atom_mass", atom_mass)?;

        Ok(SimulationConfig {
            duration_fs,
            time_step_fs,
            reset_velocity: self.reset_velocity.unwrap_or(false),
            atom_mass,
        })
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a positive finite number, got {}", value),
        })
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a non-negative finite number, got {}", value),
        })
    }
}

/// Optional peer contributors added next to the Ramachandran force field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceConfig {
    /// Bond spring constant. `None` leaves bond lengths unrestrained.
    pub bond_stiffness: Option<f64>,
    /// Compacting strength. `None` or zero disables the compacting force.
    pub compacting_strength: Option<f64>,
}

/// Where the angular preference surfaces come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceConfig {
    /// One fixed (phi, psi) target shared by every amino acid.
    FixedTarget { phi_deg: f64, psi_deg: f64 },
    /// A directory of per-type `<THREE-LETTER>.csv` density tables.
    Directory { path: PathBuf, resolution_deg: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldConfig {
    pub simulation: SimulationConfig,
    pub forces: ForceConfig,
    pub preference: PreferenceConfig,
    pub start_position: Point3<f64>,
}

#[derive(Default)]
pub struct FoldConfigBuilder {
    simulation: Option<SimulationConfig>,
    forces: ForceConfig,
    preference: Option<PreferenceConfig>,
    start_position: Option<Point3<f64>>,
}

impl FoldConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = Some(simulation);
        self
    }

    pub fn bond_stiffness(mut self, stiffness: f64) -> Self {
        self.forces.bond_stiffness = Some(stiffness);
        self
    }

    pub fn compacting_strength(mut self, strength: f64) -> Self {
        self.forces.compacting_strength = Some(strength);
        self
    }

    pub fn fixed_target(mut self, phi_deg: f64, psi_deg: f64) -> Self {
        self.preference = Some(PreferenceConfig::FixedTarget { phi_deg, psi_deg });
        self
    }

    pub fn preference_dir(mut self, path: PathBuf) -> Self {
        self.preference = Some(PreferenceConfig::Directory {
            path,
            resolution_deg: DEFAULT_RESOLUTION_DEG,
        });
        self
    }

    pub fn preference(mut self, preference: PreferenceConfig) -> Self {
        self.preference = Some(preference);
        self
    }

    pub fn start_position(mut self, start: Point3<f64>) -> Self {
        self.start_position = Some(start);
        self
    }

    pub fn build(self) -> Result<FoldConfig, ConfigError> {
        let simulation = self
            .simulation
            .ok_or(ConfigError::MissingParameter("simulation"))?;
        let preference = self
            .preference
            .ok_or(ConfigError::MissingParameter("preference"))?;

        if let Some(stiffness) = self.forces.bond_stiffness {
            require_non_negative("bond_stiffness", stiffness)?;
        }
        if let Some(strength) = self.forces.compacting_strength {
            require_non_negative("compacting_strength", strength)?;
        }
        match &preference {
            PreferenceConfig::FixedTarget { phi_deg, psi_deg } => {
                if !phi_deg.is_finite() || !psi_deg.is_finite() {
                    return Err(ConfigError::InvalidParameter {
                        name: "fixed_target",
                        reason: format!("target ({}, {}) is not finite", phi_deg, psi_deg),
                    });
                }
            }
            PreferenceConfig::Directory { resolution_deg, .. } => {
                require_positive("resolution_deg", *resolution_deg)?;
            }
        }

        Ok(FoldConfig {
            simulation,
            forces: self.forces,
            preference,
            start_position: self.start_position.unwrap_or_else(Point3::origin),
        })
    }
}
