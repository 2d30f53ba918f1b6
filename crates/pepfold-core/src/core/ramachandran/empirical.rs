use super::{AngularPreferenceSurface, PreferenceGradient};
use crate::core::utils::geometry::wrap_degrees;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_RESOLUTION_DEG: f64 = 10.0;

const IN_MEMORY_ORIGIN: &str = "<in-memory samples>";

/// One row of a density table: dihedrals in degrees and a non-negative weight.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct DensitySample {
    pub phi: f64,
    pub psi: f64,
    pub density: f64,
}

#[derive(Debug, Error)]
pub enum PreferenceLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Density table '{path}' contains no positive samples")]
    Empty { path: String },
    #[error("Invalid sample ({phi}, {psi}) with density {density} in '{path}'")]
    InvalidSample {
        path: String,
        phi: f64,
        psi: f64,
        density: f64,
    },
    #[error("Grid resolution of {resolution} degrees does not divide 360 degrees into at least 3 bins")]
    InvalidResolution { resolution: f64 },
}

/// Preference surface derived from an empirical (phi, psi) density.
///
/// Samples are summed into a periodic square grid. The density gradient is taken by
/// central differences at every bin centre, scaled so the steepest bin has unit norm,
/// and interpolated bilinearly between bin centres.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalSurface {
    bins: usize,
    resolution: f64,
    gradients: Vec<PreferenceGradient>, // Row-major: phi bin, then psi bin
}

impl EmpiricalSurface {
    pub fn from_samples<I>(samples: I, resolution: f64) -> Result<Self, PreferenceLoadError>
    where
        I: IntoIterator<Item = DensitySample>,
    {
        Self::build(samples, resolution, IN_MEMORY_ORIGIN)
    }

    /// Loads a CSV table with a `phi,psi,density` header row.
    pub fn load(path: &Path, resolution: f64) -> Result<Self, PreferenceLoadError> {
        let origin = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|e| PreferenceLoadError::Csv {
            path: origin.clone(),
            source: e,
        })?;

        let samples = reader
            .deserialize::<DensitySample>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PreferenceLoadError::Csv {
                path: origin.clone(),
                source: e,
            })?;

        Self::build(samples, resolution, &origin)
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    fn build<I>(samples: I, resolution: f64, origin: &str) -> Result<Self, PreferenceLoadError>
    where
        I: IntoIterator<Item = DensitySample>,
    {
        let bins = grid_bins(resolution)?;
        let mut density = vec![0.0; bins * bins];
        let mut count = 0usize;

        for sample in samples {
            let valid = sample.phi.is_finite()
                && sample.psi.is_finite()
                && sample.density.is_finite()
                && sample.density >= 0.0;
            if !valid {
                return Err(PreferenceLoadError::InvalidSample {
                    path: origin.to_string(),
                    phi: sample.phi,
                    psi: sample.psi,
                    density: sample.density,
                });
            }
            let i = bin_index(sample.phi, resolution, bins);
            let j = bin_index(sample.psi, resolution, bins);
            density[i * bins + j] += sample.density;
            count += 1;
        }

        if !density.iter().any(|d| *d > 0.0) {
            return Err(PreferenceLoadError::Empty {
                path: origin.to_string(),
            });
        }

        let at = |i: usize, j: usize| density[(i % bins) * bins + (j % bins)];
        let mut gradients = Vec::with_capacity(bins * bins);
        for i in 0..bins {
            for j in 0..bins {
                let d_phi = (at(i + 1, j) - at(i + bins - 1, j)) / (2.0 * resolution);
                let d_psi = (at(i, j + 1) - at(i, j + bins - 1)) / (2.0 * resolution);
                gradients.push(PreferenceGradient::new(d_phi, d_psi));
            }
        }

        let steepest = gradients
            .iter()
            .map(PreferenceGradient::norm)
            .fold(0.0, f64::max);
        if steepest > 0.0 {
            for gradient in &mut gradients {
                gradient.d_phi /= steepest;
                gradient.d_psi /= steepest;
            }
        }

        debug!(
            origin,
            samples = count,
            bins,
            resolution,
            "Built empirical preference surface."
        );

        Ok(Self {
            bins,
            resolution,
            gradients,
        })
    }

    fn gradient_at_bin(&self, i: usize, j: usize) -> PreferenceGradient {
        self.gradients[i * self.bins + j]
    }

    /// Splits an angle into the lower neighbouring bin centre and the fraction of the
    /// way to the next one.
    fn locate(&self, angle: f64) -> (usize, usize, f64) {
        let u = (wrap_degrees(angle) + 180.0) / self.resolution - 0.5;
        let floor = u.floor();
        let lower = (floor as i64).rem_euclid(self.bins as i64) as usize;
        (lower, (lower + 1) % self.bins, u - floor)
    }
}

impl AngularPreferenceSurface for EmpiricalSurface {
    fn gradient_at(&self, phi: f64, psi: f64) -> PreferenceGradient {
        let (i0, i1, s) = self.locate(phi);
        let (j0, j1, t) = self.locate(psi);

        let g00 = self.gradient_at_bin(i0, j0);
        let g01 = self.gradient_at_bin(i0, j1);
        let g10 = self.gradient_at_bin(i1, j0);
        let g11 = self.gradient_at_bin(i1, j1);

        let blend = |a: f64, b: f64, c: f64, d: f64| {
            (1.0 - s) * ((1.0 - t) * a + t * b) + s * ((1.0 - t) * c + t * d)
        };

        PreferenceGradient::new(
            blend(g00.d_phi, g01.d_phi, g10.d_phi, g11.d_phi),
            blend(g00.d_psi, g01.d_psi, g10.d_psi, g11.d_psi),
        )
    }
}

fn grid_bins(resolution: f64) -> Result<usize, PreferenceLoadError> {
    let invalid = || PreferenceLoadError::InvalidResolution { resolution };
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(invalid());
    }
    let bins = (360.0 / resolution).round();
    if bins < 3.0 || (bins * resolution - 360.0).abs() > 1e-9 {
        return Err(invalid());
    }
    Ok(bins as usize)
}

fn bin_index(angle: f64, resolution: f64, bins: usize) -> usize {
    let index = ((wrap_degrees(angle) + 180.0) / resolution).floor() as usize;
    index.min(bins - 1)
}
