use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "PepFold CLI - Reconstruct peptide backbones from sequence and fold them toward favoured Ramachandran regions.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel force evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconstruct the backbone of a sequence from (uniform) dihedral angles.
    Build(BuildArgs),
    /// Reconstruct a backbone and fold it under Ramachandran preference forces.
    Fold(FoldArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// One-letter amino-acid sequence, e.g. "MKTAYIAK".
    #[arg(short, long, required = true, value_name = "SEQ")]
    pub sequence: String,

    /// Path for the output coordinate table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Phi angle applied to every residue, in degrees.
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub phi: Option<f64>,

    /// Psi angle applied to every residue, in degrees.
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub psi: Option<f64>,

    /// Omega angle applied to every residue, in degrees.
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub omega: Option<f64>,
}

/// Arguments for the `fold` subcommand.
#[derive(Args, Debug)]
pub struct FoldArgs {
    // --- Core Arguments ---
    /// One-letter amino-acid sequence, e.g. "MKTAYIAK".
    #[arg(short, long, required = true, value_name = "SEQ")]
    pub sequence: String,

    /// Path for the output coordinate table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Simulation Overrides ---
    /// Override the total simulated duration, in femtoseconds.
    #[arg(long, value_name = "FS")]
    pub duration_fs: Option<f64>,

    /// Override the integration step, in femtoseconds.
    #[arg(long, value_name = "FS")]
    pub time_step_fs: Option<f64>,

    /// Keep atom velocities between steps instead of resetting them.
    #[arg(long)]
    pub no_velocity_reset: bool,

    // --- Preference Overrides ---
    /// Directory of per-residue `<THREE-LETTER>.csv` Ramachandran density tables.
    #[arg(long, value_name = "PATH", conflicts_with = "target")]
    pub data_dir: Option<PathBuf>,

    /// Fold every residue toward one fixed (phi, psi) target, in degrees.
    #[arg(long, value_name = "PHI,PSI", allow_hyphen_values = true)]
    pub target: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S simulation.duration-fs=1000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
