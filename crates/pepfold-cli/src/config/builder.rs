use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FilePreferenceConfig};
use super::models::AppConfig;
use crate::cli::FoldArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use pepfold::engine::config::{
    FoldConfigBuilder, PreferenceConfig, SimulationConfigBuilder,
};
use std::path::PathBuf;
use std::str::FromStr;

pub fn build_config(args: &FoldArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let sim_file = file_config.simulation.take().unwrap_or_default();
    let reset_velocity = if args.no_velocity_reset {
        false
    } else {
        sim_file.reset_velocity.unwrap_or(defaults.reset_velocity)
    };
    let simulation = SimulationConfigBuilder::new()
        .duration_fs(
            args.duration_fs
                .or(sim_file.duration_fs)
                .unwrap_or(defaults.duration_fs),
        )
        .time_step_fs(
            args.time_step_fs
                .or(sim_file.time_step_fs)
                .unwrap_or(defaults.time_step_fs),
        )
        .reset_velocity(reset_velocity)
        .atom_mass(sim_file.atom_mass.unwrap_or(defaults.atom_mass))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let forces_file = file_config.forces.take().unwrap_or_default();
    let preference = merge_preference(args, file_config.preference.take(), &defaults)?;

    let core_config = FoldConfigBuilder::new()
        .simulation(simulation)
        .bond_stiffness(
            forces_file
                .bond_stiffness
                .unwrap_or(defaults.bond_stiffness),
        )
        .compacting_strength(
            forces_file
                .compacting_strength
                .unwrap_or(defaults.compacting_strength),
        )
        .preference(preference)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        sequence: args.sequence.clone(),
        output_path: args.output.clone(),
        core_config,
    })
}

fn merge_preference(
    args: &FoldArgs,
    file_val: Option<FilePreferenceConfig>,
    defaults: &DefaultsConfig,
) -> Result<PreferenceConfig> {
    let file_val = file_val.unwrap_or_default();
    let resolution_deg = file_val.resolution_deg.unwrap_or(defaults.resolution_deg);

    if let Some(path) = &args.data_dir {
        return Ok(PreferenceConfig::Directory {
            path: path.clone(),
            resolution_deg,
        });
    }
    if let Some(target) = &args.target {
        let (phi_deg, psi_deg) =
            parser::parse_target(target).map_err(|e| CliError::Argument(e.to_string()))?;
        return Ok(PreferenceConfig::FixedTarget { phi_deg, psi_deg });
    }

    match (file_val.data_dir, file_val.fixed_target) {
        (Some(_), Some(_)) => Err(CliError::Config(
            "`preference.data-dir` and `preference.fixed-target` are mutually exclusive"
                .to_string(),
        )),
        (Some(path), None) => Ok(PreferenceConfig::Directory {
            path,
            resolution_deg,
        }),
        (None, Some(target)) => Ok(PreferenceConfig::FixedTarget {
            phi_deg: target.phi.ok_or_else(|| {
                CliError::Config("`preference.fixed-target` requires `phi`".to_string())
            })?,
            psi_deg: target.psi.ok_or_else(|| {
                CliError::Config("`preference.fixed-target` requires `psi`".to_string())
            })?,
        }),
        (None, None) => Ok(PreferenceConfig::FixedTarget {
            phi_deg: defaults.target_phi,
            psi_deg: defaults.target_psi,
        }),
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "simulation.duration-fs" => {
                config
                    .simulation
                    .get_or_insert_with(Default::default)
                    .duration_fs = Some(parse_value(key, value_str, "float")?);
            }
            "simulation.time-step-fs" => {
                config
                    .simulation
                    .get_or_insert_with(Default::default)
                    .time_step_fs = Some(parse_value(key, value_str, "float")?);
            }
            "simulation.reset-velocity" => {
                config
                    .simulation
                    .get_or_insert_with(Default::default)
                    .reset_velocity = Some(parse_value(key, value_str, "boolean")?);
            }
            "simulation.atom-mass" => {
                config
                    .simulation
                    .get_or_insert_with(Default::default)
                    .atom_mass = Some(parse_value(key, value_str, "float")?);
            }
            "forces.bond-stiffness" => {
                config
                    .forces
                    .get_or_insert_with(Default::default)
                    .bond_stiffness = Some(parse_value(key, value_str, "float")?);
            }
            "forces.compacting-strength" => {
                config
                    .forces
                    .get_or_insert_with(Default::default)
                    .compacting_strength = Some(parse_value(key, value_str, "float")?);
            }
            "preference.data-dir" => {
                config
                    .preference
                    .get_or_insert_with(Default::default)
                    .data_dir = Some(PathBuf::from(value_str));
            }
            "preference.resolution-deg" => {
                config
                    .preference
                    .get_or_insert_with(Default::default)
                    .resolution_deg = Some(parse_value(key, value_str, "float")?);
            }
            "preference.fixed-target.phi" => {
                config
                    .preference
                    .get_or_insert_with(Default::default)
                    .fixed_target
                    .get_or_insert_with(Default::default)
                    .phi = Some(parse_value(key, value_str, "float")?);
            }
            "preference.fixed-target.psi" => {
                config
                    .preference
                    .get_or_insert_with(Default::default)
                    .fixed_target
                    .get_or_insert_with(Default::default)
                    .psi = Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn base_fold_args() -> FoldArgs {
        FoldArgs {
            sequence: "AGA".to_string(),
            output: PathBuf::from("out.csv"),
            config: None,
            duration_fs: None,
            time_step_fs: None,
            no_velocity_reset: false,
            data_dir: None,
            target: None,
            set_values: vec![],
        }
    }

    #[test]
    fn defaults_fill_every_setting() {
        let app = build_config(&base_fold_args()).expect("build ok");
        let cfg = app.core_config;
        let defaults = DefaultsConfig::default();

        assert_eq!(app.sequence, "AGA");
        assert_eq!(cfg.simulation.duration_fs, defaults.duration_fs);
        assert_eq!(cfg.simulation.time_step_fs, defaults.time_step_fs);
        assert!(cfg.simulation.reset_velocity);
        assert_eq!(cfg.forces.bond_stiffness, Some(defaults.bond_stiffness));
        assert_eq!(cfg.forces.compacting_strength, Some(0.0));
        assert_eq!(
            cfg.preference,
            PreferenceConfig::FixedTarget {
                phi_deg: defaults.target_phi,
                psi_deg: defaults.target_psi
            }
        );
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("fold.toml");
        fs::write(
            &cfg_path,
            r#"
            [simulation]
            duration-fs = 1000.0
            time-step-fs = 1.0
            atom-mass = 4.0

            [forces]
            compacting-strength = 0.3

            [preference]
            data-dir = "tables"
            resolution-deg = 5.0
            "#,
        )
        .unwrap();

        let mut args = base_fold_args();
        args.config = Some(cfg_path);
        let cfg = build_config(&args).expect("build ok").core_config;

        assert_eq!(cfg.simulation.duration_fs, 1000.0);
        assert_eq!(cfg.simulation.time_step_fs, 1.0);
        assert_eq!(cfg.simulation.atom_mass, 4.0);
        assert_eq!(cfg.forces.compacting_strength, Some(0.3));
        assert_eq!(
            cfg.preference,
            PreferenceConfig::Directory {
                path: PathBuf::from("tables"),
                resolution_deg: 5.0
            }
        );
    }

    #[test]
    fn cli_overrides_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("fold.toml");
        fs::write(
            &cfg_path,
            r#"
            [simulation]
            duration-fs = 1000.0
            reset-velocity = true

            [preference.fixed-target]
            phi = -120.0
            psi = 130.0
            "#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "pepfold",
            "fold",
            "-s",
            "AAA",
            "-o",
            "out.csv",
            "-c",
            cfg_path.to_str().unwrap(),
            "--duration-fs",
            "200",
            "--no-velocity-reset",
            "--target",
            "-60,-45",
        ]);
        let Commands::Fold(args) = cli.command else {
            panic!("Expected 'fold' subcommand");
        };
        let cfg = build_config(&args).expect("build ok").core_config;

        assert_eq!(cfg.simulation.duration_fs, 200.0);
        assert!(!cfg.simulation.reset_velocity);
        assert_eq!(
            cfg.preference,
            PreferenceConfig::FixedTarget {
                phi_deg: -60.0,
                psi_deg: -45.0
            }
        );
    }

    #[test]
    fn set_values_override() {
        let mut args = base_fold_args();
        args.set_values = vec![
            "simulation.duration-fs=750".to_string(),
            "simulation.reset-velocity=false".to_string(),
            "forces.bond-stiffness=0.2".to_string(),
            "preference.fixed-target.phi=-90".to_string(),
            "preference.fixed-target.psi=-20".to_string(),
        ];
        let cfg = build_config(&args).expect("build ok").core_config;

        assert_eq!(cfg.simulation.duration_fs, 750.0);
        assert!(!cfg.simulation.reset_velocity);
        assert_eq!(cfg.forces.bond_stiffness, Some(0.2));
        assert_eq!(
            cfg.preference,
            PreferenceConfig::FixedTarget {
                phi_deg: -90.0,
                psi_deg: -20.0
            }
        );
    }

    #[test]
    fn unsupported_set_key_is_rejected() {
        let mut args = base_fold_args();
        args.set_values = vec!["optimization.num-solutions=3".to_string()];
        let result = build_config(&args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("Unsupported")));
    }

    #[test]
    fn invalid_set_value_is_rejected() {
        let mut args = base_fold_args();
        args.set_values = vec!["simulation.reset-velocity=maybe".to_string()];
        let result = build_config(&args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("boolean")));
    }

    #[test]
    fn conflicting_file_preferences_are_rejected() {
        let mut args = base_fold_args();
        args.set_values = vec![
            "preference.data-dir=tables".to_string(),
            "preference.fixed-target.phi=-60".to_string(),
            "preference.fixed-target.psi=-45".to_string(),
        ];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn incomplete_fixed_target_is_rejected() {
        let mut args = base_fold_args();
        args.set_values = vec!["preference.fixed-target.phi=-60".to_string()];
        let result = build_config(&args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("psi")));
    }

    #[test]
    fn invalid_simulation_values_surface_as_config_errors() {
        let mut args = base_fold_args();
        args.time_step_fs = Some(0.0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn malformed_target_is_an_argument_error() {
        let mut args = base_fold_args();
        args.target = Some("north".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));
    }
}
