use super::amino_acid::AminoAcid;
use super::element::Element;
use nalgebra::Point3;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackboneAtom {
    Nitrogen,    // Amide nitrogen (N)
    CarbonAlpha, // Alpha carbon (CA)
    Carbon,      // Carbonyl carbon (C)
}

impl BackboneAtom {
    /// Backbone atoms in bonding order along the chain.
    pub const ALL: [BackboneAtom; 3] = [
        BackboneAtom::Nitrogen,
        BackboneAtom::CarbonAlpha,
        BackboneAtom::Carbon,
    ];

    pub fn element(self) -> Element {
        match self {
            BackboneAtom::Nitrogen => Element::Nitrogen,
            BackboneAtom::CarbonAlpha | BackboneAtom::Carbon => Element::Carbon,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BackboneAtom::Nitrogen => "N",
            BackboneAtom::CarbonAlpha => "CA",
            BackboneAtom::Carbon => "C",
        }
    }
}

impl fmt::Display for BackboneAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three backbone positions of a fully positioned residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackbonePositions {
    pub nitrogen: Point3<f64>,
    pub carbon_alpha: Point3<f64>,
    pub carbon: Point3<f64>,
}

impl BackbonePositions {
    pub fn get(&self, atom: BackboneAtom) -> Point3<f64> {
        match atom {
            BackboneAtom::Nitrogen => self.nitrogen,
            BackboneAtom::CarbonAlpha => self.carbon_alpha,
            BackboneAtom::Carbon => self.carbon,
        }
    }
}

/// A single residue at backbone resolution.
///
/// Positions are in picometres and angles in degrees. Any of them may be unset; a
/// residue with all three positions set is *fully positioned*. The amino-acid identity
/// is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    amino_acid: AminoAcid,
    pub nitrogen: Option<Point3<f64>>,
    pub carbon_alpha: Option<Point3<f64>>,
    pub carbon: Option<Point3<f64>>,
    pub phi: Option<f64>,   // Rotation about N-CA
    pub psi: Option<f64>,   // Rotation about CA-C
    pub omega: Option<f64>, // Rotation about the peptide bond C(i-1)-N
}

impl Residue {
    pub fn new(amino_acid: AminoAcid) -> Self {
        Self {
            amino_acid,
            nitrogen: None,
            carbon_alpha: None,
            carbon: None,
            phi: None,
            psi: None,
            omega: None,
        }
    }

    pub fn with_positions(
        amino_acid: AminoAcid,
        nitrogen: Point3<f64>,
        carbon_alpha: Point3<f64>,
        carbon: Point3<f64>,
    ) -> Self {
        Self {
            nitrogen: Some(nitrogen),
            carbon_alpha: Some(carbon_alpha),
            carbon: Some(carbon),
            ..Self::new(amino_acid)
        }
    }

    pub fn with_angles(mut self, phi: Option<f64>, psi: Option<f64>, omega: Option<f64>) -> Self {
        self.phi = phi;
        self.psi = psi;
        self.omega = omega;
        self
    }

    #[inline]
    pub fn amino_acid(&self) -> AminoAcid {
        self.amino_acid
    }

    pub fn position(&self, atom: BackboneAtom) -> Option<Point3<f64>> {
        match atom {
            BackboneAtom::Nitrogen => self.nitrogen,
            BackboneAtom::CarbonAlpha => self.carbon_alpha,
            BackboneAtom::Carbon => self.carbon,
        }
    }

    pub fn position_mut(&mut self, atom: BackboneAtom) -> Option<&mut Point3<f64>> {
        match atom {
            BackboneAtom::Nitrogen => self.nitrogen.as_mut(),
            BackboneAtom::CarbonAlpha => self.carbon_alpha.as_mut(),
            BackboneAtom::Carbon => self.carbon.as_mut(),
        }
    }

    pub fn set_position(&mut self, atom: BackboneAtom, position: Point3<f64>) {
        let slot = match atom {
            BackboneAtom::Nitrogen => &mut self.nitrogen,
            BackboneAtom::CarbonAlpha => &mut self.carbon_alpha,
            BackboneAtom::Carbon => &mut self.carbon,
        };
        *slot = Some(position);
    }

    pub fn is_positioned(&self) -> bool {
        self.nitrogen.is_some() && self.carbon_alpha.is_some() && self.carbon.is_some()
    }

    /// Returns all three positions, or `None` unless the residue is fully positioned.
    pub fn backbone(&self) -> Option<BackbonePositions> {
        Some(BackbonePositions {
            nitrogen: self.nitrogen?,
            carbon_alpha: self.carbon_alpha?,
            carbon: self.carbon?,
        })
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        BackboneAtom::ALL
            .into_iter()
            .filter_map(move |atom| self.position(atom))
    }
}
