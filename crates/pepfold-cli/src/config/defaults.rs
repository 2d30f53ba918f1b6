use pepfold::core::forcefield::bond::DEFAULT_BOND_STIFFNESS;
use pepfold::core::ramachandran::empirical::DEFAULT_RESOLUTION_DEG;
use pepfold::engine::config::DEFAULT_ATOM_MASS;

pub struct DefaultsConfig {
    pub duration_fs: f64,
    pub time_step_fs: f64,
    pub reset_velocity: bool,
    pub atom_mass: f64,
    pub bond_stiffness: f64,
    pub compacting_strength: f64,
    pub target_phi: f64,
    pub target_psi: f64,
    pub resolution_deg: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            duration_fs: 500.0,
            time_step_fs: 2.0,
            reset_velocity: true,
            atom_mass: DEFAULT_ATOM_MASS,
            bond_stiffness: DEFAULT_BOND_STIFFNESS,
            compacting_strength: 0.0,
            // Right-handed alpha helix.
            target_phi: -57.0,
            target_psi: -47.0,
            resolution_deg: DEFAULT_RESOLUTION_DEG,
        }
    }
}
