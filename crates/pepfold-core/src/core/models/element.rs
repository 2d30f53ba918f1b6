use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Hydrogen,
    Carbon,
    Nitrogen,
    Oxygen,
    Sulfur,
}

impl Element {
    /// Single-bond covalent radius in picometres (Cordero et al., 2008).
    pub fn covalent_radius_pm(self) -> f64 {
        match self {
            Element::Hydrogen => 31.0,
            Element::Carbon => 76.0,
            Element::Nitrogen => 71.0,
            Element::Oxygen => 66.0,
            Element::Sulfur => 105.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::Hydrogen => "H",
            Element::Carbon => "C",
            Element::Nitrogen => "N",
            Element::Oxygen => "O",
            Element::Sulfur => "S",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Ideal single-bond length between two elements, the sum of their covalent radii.
pub fn bond_length_pm(a: Element, b: Element) -> f64 {
    a.covalent_radius_pm() + b.covalent_radius_pm()
}
