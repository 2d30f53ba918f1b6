use crate::error::{CliError, Result};
use pepfold::core::models::chain::Chain;
use pepfold::core::models::residue::Residue;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One row of the coordinate table. Coordinates are in picometres, angles in degrees.
#[derive(Debug, Serialize)]
struct CoordinateRow<'a> {
    residue: usize,
    amino_acid: &'a str,
    n_x: Option<f64>,
    n_y: Option<f64>,
    n_z: Option<f64>,
    ca_x: Option<f64>,
    ca_y: Option<f64>,
    ca_z: Option<f64>,
    c_x: Option<f64>,
    c_y: Option<f64>,
    c_z: Option<f64>,
    phi: Option<f64>,
    psi: Option<f64>,
    omega: Option<f64>,
}

impl<'a> CoordinateRow<'a> {
    fn new(index: usize, residue: &'a Residue) -> Self {
        let n = residue.nitrogen;
        let ca = residue.carbon_alpha;
        let c = residue.carbon;
        Self {
            residue: index + 1,
            amino_acid: residue.amino_acid().three_letter_code(),
            n_x: n.map(|p| p.x),
            n_y: n.map(|p| p.y),
            n_z: n.map(|p| p.z),
            ca_x: ca.map(|p| p.x),
            ca_y: ca.map(|p| p.y),
            ca_z: ca.map(|p| p.z),
            c_x: c.map(|p| p.x),
            c_y: c.map(|p| p.y),
            c_z: c.map(|p| p.z),
            phi: residue.phi,
            psi: residue.psi,
            omega: residue.omega,
        }
    }
}

/// Writes one CSV row per residue, with a header. Unset values are left empty.
pub fn write_coordinates<W: Write>(chain: &Chain, writer: W) -> std::result::Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, residue) in chain.residues().iter().enumerate() {
        csv_writer.serialize(CoordinateRow::new(index, residue))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_coordinates_to_path(chain: &Chain, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_coordinates(chain, file).map_err(|source| CliError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} residues to {:?}", chain.len(), path);
    Ok(())
}
