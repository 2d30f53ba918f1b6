use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSimulationConfig {
    #[serde(rename = "duration-fs")]
    pub duration_fs: Option<f64>,
    #[serde(rename = "time-step-fs")]
    pub time_step_fs: Option<f64>,
    #[serde(rename = "reset-velocity")]
    pub reset_velocity: Option<bool>,
    #[serde(rename = "atom-mass")]
    pub atom_mass: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileForceConfig {
    #[serde(rename = "bond-stiffness")]
    pub bond_stiffness: Option<f64>,
    #[serde(rename = "compacting-strength")]
    pub compacting_strength: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileFixedTarget {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePreferenceConfig {
    #[serde(rename = "data-dir")]
    pub data_dir: Option<PathBuf>,
    #[serde(rename = "resolution-deg")]
    pub resolution_deg: Option<f64>,
    #[serde(rename = "fixed-target")]
    pub fixed_target: Option<FileFixedTarget>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub simulation: Option<FileSimulationConfig>,
    pub forces: Option<FileForceConfig>,
    pub preference: Option<FilePreferenceConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_every_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fold.toml");
        fs::write(
            &path,
            r#"
            [simulation]
            duration-fs = 1000.0
            time-step-fs = 1.0
            reset-velocity = false
            atom-mass = 3.0

            [forces]
            bond-stiffness = 0.1
            compacting-strength = 0.2

            [preference.fixed-target]
            phi = -120.0
            psi = 130.0
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let simulation = config.simulation.unwrap();
        assert_eq!(simulation.duration_fs, Some(1000.0));
        assert_eq!(simulation.reset_velocity, Some(false));
        assert_eq!(config.forces.unwrap().compacting_strength, Some(0.2));
        let target = config.preference.unwrap().fixed_target.unwrap();
        assert_eq!((target.phi, target.psi), (Some(-120.0), Some(130.0)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fold.toml");
        fs::write(&path, "[simulation]\ndurations = 5\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
