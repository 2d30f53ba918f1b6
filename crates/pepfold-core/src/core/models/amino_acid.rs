use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // Alanine (ALA)
    Glycine,    // Glycine (GLY)
    Isoleucine, // Isoleucine (ILE)
    Leucine,    // Leucine (LEU)
    Proline,    // Proline (PRO)
    Valine,     // Valine (VAL)

    // --- Aromatic ---
    Phenylalanine, // Phenylalanine (PHE)
    Tryptophan,    // Tryptophan (TRP)
    Tyrosine,      // Tyrosine (TYR)

    // --- Polar, Uncharged ---
    Asparagine, // Asparagine (ASN)
    Cysteine,   // Cysteine (CYS)
    Glutamine,  // Glutamine (GLN)
    Serine,     // Serine (SER)
    Threonine,  // Threonine (THR)
    Methionine, // Methionine (MET)

    // --- Positively Charged (Basic) ---
    Arginine,  // Arginine (ARG)
    Histidine, // Histidine (HIS)
    Lysine,    // Lysine (LYS)

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // Aspartic Acid (ASP)
    GlutamicAcid, // Glutamic Acid (GLU)
}

#[rustfmt::skip]
static ONE_LETTER_CODES: Map<char, AminoAcid> = phf_map! {
    'A' => AminoAcid::Alanine,       'G' => AminoAcid::Glycine,
    'I' => AminoAcid::Isoleucine,    'L' => AminoAcid::Leucine,
    'P' => AminoAcid::Proline,       'V' => AminoAcid::Valine,
    'F' => AminoAcid::Phenylalanine, 'W' => AminoAcid::Tryptophan,
    'Y' => AminoAcid::Tyrosine,      'N' => AminoAcid::Asparagine,
    'C' => AminoAcid::Cysteine,      'Q' => AminoAcid::Glutamine,
    'S' => AminoAcid::Serine,        'T' => AminoAcid::Threonine,
    'M' => AminoAcid::Methionine,    'R' => AminoAcid::Arginine,
    'H' => AminoAcid::Histidine,     'K' => AminoAcid::Lysine,
    'D' => AminoAcid::AsparticAcid,  'E' => AminoAcid::GlutamicAcid,
};

#[rustfmt::skip]
static THREE_LETTER_CODES: Map<&'static str, AminoAcid> = phf_map! {
    "ALA" => AminoAcid::Alanine,       "GLY" => AminoAcid::Glycine,
    "ILE" => AminoAcid::Isoleucine,    "LEU" => AminoAcid::Leucine,
    "PRO" => AminoAcid::Proline,       "VAL" => AminoAcid::Valine,
    "PHE" => AminoAcid::Phenylalanine, "TRP" => AminoAcid::Tryptophan,
    "TYR" => AminoAcid::Tyrosine,      "ASN" => AminoAcid::Asparagine,
    "CYS" => AminoAcid::Cysteine,      "GLN" => AminoAcid::Glutamine,
    "SER" => AminoAcid::Serine,        "THR" => AminoAcid::Threonine,
    "MET" => AminoAcid::Methionine,    "ARG" => AminoAcid::Arginine,
    "HIS" => AminoAcid::Histidine,     "LYS" => AminoAcid::Lysine,
    "ASP" => AminoAcid::AsparticAcid,  "GLU" => AminoAcid::GlutamicAcid,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown amino acid code: '{0}'")]
pub struct ParseAminoAcidError(pub String);

impl AminoAcid {
    /// Number of standard amino acids; the exclusive upper bound of [`AminoAcid::ordinal`].
    pub const COUNT: usize = 20;

    /// All amino acids in ordinal order.
    pub const ALL: [AminoAcid; Self::COUNT] = [
        AminoAcid::Alanine,
        AminoAcid::Glycine,
        AminoAcid::Isoleucine,
        AminoAcid::Leucine,
        AminoAcid::Proline,
        AminoAcid::Valine,
        AminoAcid::Phenylalanine,
        AminoAcid::Tryptophan,
        AminoAcid::Tyrosine,
        AminoAcid::Asparagine,
        AminoAcid::Cysteine,
        AminoAcid::Glutamine,
        AminoAcid::Serine,
        AminoAcid::Threonine,
        AminoAcid::Methionine,
        AminoAcid::Arginine,
        AminoAcid::Histidine,
        AminoAcid::Lysine,
        AminoAcid::AsparticAcid,
        AminoAcid::GlutamicAcid,
    ];

    /// Stable index in `0..COUNT`, used to address per-type lookup tables.
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    pub fn from_one_letter_code(code: char) -> Option<Self> {
        ONE_LETTER_CODES.get(&code.to_ascii_uppercase()).copied()
    }

    pub fn from_three_letter_code(code: &str) -> Option<Self> {
        THREE_LETTER_CODES
            .get(code.to_ascii_uppercase().as_str())
            .copied()
    }

    pub fn one_letter_code(self) -> char {
        match self {
            AminoAcid::Alanine => 'A',
            AminoAcid::Glycine => 'G',
            AminoAcid::Isoleucine => 'I',
            AminoAcid::Leucine => 'L',
            AminoAcid::Proline => 'P',
            AminoAcid::Valine => 'V',
            AminoAcid::Phenylalanine => 'F',
            AminoAcid::Tryptophan => 'W',
            AminoAcid::Tyrosine => 'Y',
            AminoAcid::Asparagine => 'N',
            AminoAcid::Cysteine => 'C',
            AminoAcid::Glutamine => 'Q',
            AminoAcid::Serine => 'S',
            AminoAcid::Threonine => 'T',
            AminoAcid::Methionine => 'M',
            AminoAcid::Arginine => 'R',
            AminoAcid::Histidine => 'H',
            AminoAcid::Lysine => 'K',
            AminoAcid::AsparticAcid => 'D',
            AminoAcid::GlutamicAcid => 'E',
        }
    }

    pub fn three_letter_code(self) -> &'static str {
        match self {
            AminoAcid::Alanine => "ALA",
            AminoAcid::Glycine => "GLY",
            AminoAcid::Isoleucine => "ILE",
            AminoAcid::Leucine => "LEU",
            AminoAcid::Proline => "PRO",
            AminoAcid::Valine => "VAL",
            AminoAcid::Phenylalanine => "PHE",
            AminoAcid::Tryptophan => "TRP",
            AminoAcid::Tyrosine => "TYR",
            AminoAcid::Asparagine => "ASN",
            AminoAcid::Cysteine => "CYS",
            AminoAcid::Glutamine => "GLN",
            AminoAcid::Serine => "SER",
            AminoAcid::Threonine => "THR",
            AminoAcid::Methionine => "MET",
            AminoAcid::Arginine => "ARG",
            AminoAcid::Histidine => "HIS",
            AminoAcid::Lysine => "LYS",
            AminoAcid::AsparticAcid => "ASP",
            AminoAcid::GlutamicAcid => "GLU",
        }
    }
}

impl FromStr for AminoAcid {
    type Err = ParseAminoAcidError;

    /// Accepts either a one-letter or a three-letter code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let parsed = match (chars.next(), chars.next()) {
            (Some(code), None) => Self::from_one_letter_code(code),
            _ => Self::from_three_letter_code(trimmed),
        };
        parsed.ok_or_else(|| ParseAminoAcidError(s.to_string()))
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.three_letter_code())
    }
}
