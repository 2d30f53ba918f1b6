use super::empirical::{EmpiricalSurface, PreferenceLoadError};
use super::{AngularPreferenceSource, AngularPreferenceSurface, PreferenceGradient};
use crate::core::models::amino_acid::AminoAcid;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Preference surfaces indexed by amino-acid ordinal. Types without a surface have no
/// data and are reported as uncovered.
#[derive(Debug, Clone)]
pub struct PreferenceTable {
    surfaces: [Option<Arc<dyn AngularPreferenceSurface>>; AminoAcid::COUNT],
}

impl Default for PreferenceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self {
            surfaces: std::array::from_fn(|_| None),
        }
    }

    /// Shares one surface among all amino-acid types.
    pub fn uniform(surface: Arc<dyn AngularPreferenceSurface>) -> Self {
        Self {
            surfaces: std::array::from_fn(|_| Some(Arc::clone(&surface))),
        }
    }

    pub fn with_surface(
        mut self,
        amino_acid: AminoAcid,
        surface: Arc<dyn AngularPreferenceSurface>,
    ) -> Self {
        self.insert(amino_acid, surface);
        self
    }

    pub fn insert(&mut self, amino_acid: AminoAcid, surface: Arc<dyn AngularPreferenceSurface>) {
        self.surfaces[amino_acid.ordinal()] = Some(surface);
    }

    pub fn surface(&self, amino_acid: AminoAcid) -> Option<&Arc<dyn AngularPreferenceSurface>> {
        self.surfaces[amino_acid.ordinal()].as_ref()
    }

    pub fn covered(&self) -> impl Iterator<Item = AminoAcid> + '_ {
        AminoAcid::ALL
            .into_iter()
            .filter(|aa| self.surfaces[aa.ordinal()].is_some())
    }

    /// Loads `<THREE-LETTER-CODE>.csv` for every amino acid found in `dir`.
    ///
    /// Missing files leave that type uncovered. A directory with no table at all is
    /// an error.
    pub fn load_from_dir(dir: &Path, resolution: f64) -> Result<Self, PreferenceLoadError> {
        let dir_str = dir.to_string_lossy().to_string();
        if !dir.is_dir() {
            return Err(PreferenceLoadError::Io {
                path: dir_str,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "preference data directory does not exist",
                ),
            });
        }

        let mut table = Self::new();
        for amino_acid in AminoAcid::ALL {
            let path = dir.join(format!("{}.csv", amino_acid.three_letter_code()));
            if !path.is_file() {
                debug!(%amino_acid, path = %path.display(), "No preference table found.");
                continue;
            }
            let surface = EmpiricalSurface::load(&path, resolution)?;
            table.insert(amino_acid, Arc::new(surface));
        }

        let covered = table.covered().count();
        if covered == 0 {
            return Err(PreferenceLoadError::Empty { path: dir_str });
        }
        info!(
            directory = %dir.display(),
            covered,
            "Loaded empirical preference tables."
        );
        Ok(table)
    }
}

impl AngularPreferenceSource for PreferenceTable {
    fn gradient_at(
        &self,
        amino_acid: AminoAcid,
        phi: f64,
        psi: f64,
    ) -> Option<PreferenceGradient> {
        self.surface(amino_acid)
            .map(|surface| surface.gradient_at(phi, psi))
    }

    fn covers(&self, amino_acid: AminoAcid) -> bool {
        self.surface(amino_acid).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ramachandran::fixed::FixedTargetSurface;
    use std::fs;
    use tempfile::tempdir;

    fn write_table(dir: &Path, code: &str, peak_phi: f64) {
        let mut content = String::from("phi,psi,density\n");
        for a in 0..36 {
            let phi = -175.0 + 10.0 * a as f64;
            let distance = crate::core::utils::geometry::wrap_degrees(phi - peak_phi);
            let density = (-(distance * distance) / 1800.0).exp();
            for b in 0..36 {
                let psi = -175.0 + 10.0 * b as f64;
                content.push_str(&format!("{phi},{psi},{density}\n"));
            }
        }
        fs::write(dir.join(format!("{code}.csv")), content).unwrap();
    }

    #[test]
    fn new_table_covers_nothing() {
        let table = PreferenceTable::new();
        assert_eq!(table.covered().count(), 0);
        assert!(table.gradient_at(AminoAcid::Alanine, 0.0, 0.0).is_none());
    }

    #[test]
    fn uniform_table_shares_one_surface() {
        let table = PreferenceTable::uniform(Arc::new(FixedTargetSurface::new(-90.0, -20.0)));
        assert_eq!(table.covered().count(), AminoAcid::COUNT);
        let a = table.gradient_at(AminoAcid::Alanine, 0.0, 0.0).unwrap();
        let b = table.gradient_at(AminoAcid::Tryptophan, 0.0, 0.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn with_surface_covers_only_that_type() {
        let table = PreferenceTable::new().with_surface(
            AminoAcid::Glycine,
            Arc::new(FixedTargetSurface::new(80.0, 0.0)),
        );
        assert!(table.covers(AminoAcid::Glycine));
        assert!(!table.covers(AminoAcid::Alanine));
        assert_eq!(table.covered().collect::<Vec<_>>(), vec![AminoAcid::Glycine]);
    }

    #[test]
    fn load_from_dir_loads_available_types() {
        let dir = tempdir().unwrap();
        write_table(dir.path(), "ALA", -60.0);
        write_table(dir.path(), "GLY", 80.0);

        let table = PreferenceTable::load_from_dir(dir.path(), 10.0).unwrap();
        let covered: Vec<_> = table.covered().collect();
        assert_eq!(covered, vec![AminoAcid::Alanine, AminoAcid::Glycine]);

        let alanine = table.gradient_at(AminoAcid::Alanine, 0.0, 0.0).unwrap();
        let glycine = table.gradient_at(AminoAcid::Glycine, 0.0, 0.0).unwrap();
        assert!(alanine.d_phi < 0.0);
        assert!(glycine.d_phi > 0.0);
        assert!(table.gradient_at(AminoAcid::Serine, 0.0, 0.0).is_none());
    }

    #[test]
    fn load_from_dir_rejects_directory_without_tables() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.txt"), "nothing here").unwrap();
        let result = PreferenceTable::load_from_dir(dir.path(), 10.0);
        assert!(matches!(result, Err(PreferenceLoadError::Empty { .. })));
    }

    #[test]
    fn load_from_dir_rejects_missing_directory() {
        let dir = tempdir().unwrap();
        let result = PreferenceTable::load_from_dir(&dir.path().join("absent"), 10.0);
        assert!(matches!(result, Err(PreferenceLoadError::Io { .. })));
    }

    #[test]
    fn load_from_dir_propagates_broken_tables() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("LYS.csv"), "phi,psi,density\n").unwrap();
        let result = PreferenceTable::load_from_dir(dir.path(), 10.0);
        assert!(matches!(result, Err(PreferenceLoadError::Empty { path }) if path.contains("LYS")));
    }
}
