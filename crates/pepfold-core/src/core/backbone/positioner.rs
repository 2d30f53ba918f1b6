use crate::core::models::chain::Chain;
use crate::core::models::element::{Element, bond_length_pm};
use crate::core::models::residue::{BackboneAtom, BackbonePositions, Residue};
use crate::core::utils::geometry::{GeometryError, compute_position, dihedral_angle};
use nalgebra::{Point3, Vector3};
use thiserror::Error;
use tracing::{debug, instrument};

pub const CA_C_N_ANGLE_DEG: f64 = 116.2;
pub const C_N_CA_ANGLE_DEG: f64 = 121.7;
pub const N_CA_C_ANGLE_DEG: f64 = 111.2;

pub const DEFAULT_OMEGA_DEG: f64 = 180.0;
pub const DEFAULT_PHI_DEG: f64 = 0.0;
pub const DEFAULT_PSI_DEG: f64 = 0.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconstructionError {
    #[error("Either a previous residue or a start position must be supplied")]
    MissingReference,
    #[error("The previous residue is not fully positioned")]
    UnpositionedPrevious,
    #[error("Degenerate geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Failed to position residue {index}: {source}")]
    Residue {
        index: usize,
        source: Box<ReconstructionError>,
    },
}

impl ReconstructionError {
    fn at_residue(self, index: usize) -> Self {
        match self {
            ReconstructionError::MissingReference => self,
            other => ReconstructionError::Residue {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Residue index the failure is attributed to, if any.
    pub fn residue(&self) -> Option<usize> {
        match self {
            ReconstructionError::Residue { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The innermost cause, with residue context stripped.
    pub fn root(&self) -> &ReconstructionError {
        match self {
            ReconstructionError::Residue { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Ideal length of the bond between two backbone atoms, in picometres.
pub fn ideal_bond_length(a: BackboneAtom, b: BackboneAtom) -> f64 {
    bond_length_pm(a.element(), b.element())
}

/// Atoms of the preceding residue (real or virtual) needed to place the next one.
struct PrecedingFrame {
    carbon: Point3<f64>,
    carbon_alpha: Point3<f64>,
    nitrogen_to_carbon_alpha: Vector3<f64>,
}

impl PrecedingFrame {
    fn from_backbone(backbone: &BackbonePositions) -> Self {
        Self {
            carbon: backbone.carbon,
            carbon_alpha: backbone.carbon_alpha,
            nitrogen_to_carbon_alpha: backbone.carbon_alpha - backbone.nitrogen,
        }
    }

    /// The start point acts as a preceding carbon, with its Cα one C-C bond along -x
    /// and the preceding N→Cα bond along +y.
    fn virtual_start(start: &Point3<f64>) -> Self {
        let carbon_carbon = bond_length_pm(Element::Carbon, Element::Carbon);
        Self {
            carbon: *start,
            carbon_alpha: start + Vector3::new(-carbon_carbon, 0.0, 0.0),
            nitrogen_to_carbon_alpha: Vector3::y(),
        }
    }
}

/// Positions one residue from its predecessor, or from `start` if it is the first.
///
/// When both `previous` and `start` are given, `previous` wins. Unset omega and phi
/// default to 180° and 0° and are written back; the predecessor's psi defaults to 0°
/// and is back-filled. Angles that are already set are used and never overwritten.
///
/// A residue that is already fully positioned keeps its coordinates and needs no
/// reference; only its unset angles (and the predecessor's unset psi) are filled in
/// from the measured geometry.
pub fn position_residue(
    residue: &mut Residue,
    previous: Option<&mut Residue>,
    start: Option<&Point3<f64>>,
) -> Result<(), ReconstructionError> {
    let previous_backbone = match previous.as_deref() {
        Some(prev) => Some(
            prev.backbone()
                .ok_or(ReconstructionError::UnpositionedPrevious)?,
        ),
        None => None,
    };

    if let Some(current) = residue.backbone() {
        if let (Some(prev), Some(prev_backbone)) = (previous, previous_backbone) {
            backfill_measured_angles(residue, &current, prev, &prev_backbone);
        }
        return Ok(());
    }

    let frame = match (&previous_backbone, start) {
        (Some(backbone), _) => PrecedingFrame::from_backbone(backbone),
        (None, Some(start)) => PrecedingFrame::virtual_start(start),
        (None, None) => return Err(ReconstructionError::MissingReference),
    };

    let nitrogen_carbon = bond_length_pm(Element::Nitrogen, Element::Carbon);
    let carbon_carbon = bond_length_pm(Element::Carbon, Element::Carbon);

    let omega = residue.omega.unwrap_or(DEFAULT_OMEGA_DEG);
    let phi = residue.phi.unwrap_or(DEFAULT_PHI_DEG);
    let psi = previous
        .as_deref()
        .and_then(|prev| prev.psi)
        .unwrap_or(DEFAULT_PSI_DEG);

    let carbon_alpha_to_carbon = frame.carbon - frame.carbon_alpha;
    let nitrogen = compute_position(
        &frame.carbon,
        &carbon_alpha_to_carbon,
        &frame.nitrogen_to_carbon_alpha,
        nitrogen_carbon,
        CA_C_N_ANGLE_DEG,
        psi,
    )?;
    let carbon_to_nitrogen = nitrogen - frame.carbon;
    let carbon_alpha = compute_position(
        &nitrogen,
        &carbon_to_nitrogen,
        &carbon_alpha_to_carbon,
        nitrogen_carbon,
        C_N_CA_ANGLE_DEG,
        omega,
    )?;
    let carbon = compute_position(
        &carbon_alpha,
        &(carbon_alpha - nitrogen),
        &carbon_to_nitrogen,
        carbon_carbon,
        N_CA_C_ANGLE_DEG,
        phi,
    )?;

    residue.nitrogen = Some(nitrogen);
    residue.carbon_alpha = Some(carbon_alpha);
    residue.carbon = Some(carbon);
    residue.omega.get_or_insert(omega);
    residue.phi.get_or_insert(phi);
    if let Some(prev) = previous {
        prev.psi.get_or_insert(psi);
    }
    Ok(())
}

fn backfill_measured_angles(
    residue: &mut Residue,
    current: &BackbonePositions,
    previous: &mut Residue,
    previous_backbone: &BackbonePositions,
) {
    residue.omega.get_or_insert_with(|| {
        dihedral_angle(
            &previous_backbone.carbon_alpha,
            &previous_backbone.carbon,
            &current.nitrogen,
            &current.carbon_alpha,
        )
    });
    residue.phi.get_or_insert_with(|| {
        dihedral_angle(
            &previous_backbone.carbon,
            &current.nitrogen,
            &current.carbon_alpha,
            &current.carbon,
        )
    });
    previous.psi.get_or_insert_with(|| {
        dihedral_angle(
            &previous_backbone.nitrogen,
            &previous_backbone.carbon_alpha,
            &previous_backbone.carbon,
            &current.nitrogen,
        )
    });
}

/// Positions every residue of `chain` that is not yet fully positioned.
///
/// The first residue is anchored at `start`; later residues are placed from their
/// predecessor. Running this twice reproduces the same coordinates and leaves every
/// set angle untouched.
#[instrument(skip_all, name = "backbone_reconstruction", fields(residues = chain.len()))]
pub fn position_chain(
    chain: &mut Chain,
    start: Option<&Point3<f64>>,
) -> Result<(), ReconstructionError> {
    let residues = chain.residues_mut();
    for index in 0..residues.len() {
        let (head, tail) = residues.split_at_mut(index);
        let current = &mut tail[0];
        let was_positioned = current.is_positioned();

        position_residue(current, head.last_mut(), start).map_err(|e| e.at_residue(index))?;

        if was_positioned {
            debug!(index, "Residue already positioned; kept existing coordinates.");
        } else {
            debug!(
                index,
                amino_acid = %current.amino_acid(),
                phi = ?current.phi,
                omega = ?current.omega,
                "Positioned residue."
            );
        }
    }
    Ok(())
}
