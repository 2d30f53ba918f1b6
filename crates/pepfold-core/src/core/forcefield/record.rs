use crate::core::models::residue::BackboneAtom;
use nalgebra::Vector3;
use std::ops::{Add, AddAssign, Index};

/// Accumulated pseudo-force on the three backbone atoms of one residue.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceRecord {
    pub nitrogen: Vector3<f64>,
    pub carbon_alpha: Vector3<f64>,
    pub carbon: Vector3<f64>,
}

impl ForceRecord {
    pub fn new(nitrogen: Vector3<f64>, carbon_alpha: Vector3<f64>, carbon: Vector3<f64>) -> Self {
        Self {
            nitrogen,
            carbon_alpha,
            carbon,
        }
    }

    pub fn get(&self, atom: BackboneAtom) -> Vector3<f64> {
        match atom {
            BackboneAtom::Nitrogen => self.nitrogen,
            BackboneAtom::CarbonAlpha => self.carbon_alpha,
            BackboneAtom::Carbon => self.carbon,
        }
    }

    pub fn get_mut(&mut self, atom: BackboneAtom) -> &mut Vector3<f64> {
        match atom {
            BackboneAtom::Nitrogen => &mut self.nitrogen,
            BackboneAtom::CarbonAlpha => &mut self.carbon_alpha,
            BackboneAtom::Carbon => &mut self.carbon,
        }
    }

    #[inline]
    pub fn accumulate(&mut self, atom: BackboneAtom, force: Vector3<f64>) {
        *self.get_mut(atom) += force;
    }

    #[inline]
    pub fn total(&self) -> Vector3<f64> {
        self.nitrogen + self.carbon_alpha + self.carbon
    }

    pub fn is_finite(&self) -> bool {
        [self.nitrogen, self.carbon_alpha, self.carbon]
            .iter()
            .all(|v| v.iter().all(|c| c.is_finite()))
    }
}

impl Add for ForceRecord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            nitrogen: self.nitrogen + rhs.nitrogen,
            carbon_alpha: self.carbon_alpha + rhs.carbon_alpha,
            carbon: self.carbon + rhs.carbon,
        }
    }
}

impl AddAssign for ForceRecord {
    fn add_assign(&mut self, rhs: Self) {
        self.nitrogen += rhs.nitrogen;
        self.carbon_alpha += rhs.carbon_alpha;
        self.carbon += rhs.carbon;
    }
}

/// Forces for a whole chain, aligned with residue indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForceMap {
    records: Vec<ForceRecord>,
}

impl ForceMap {
    pub fn zeros(len: usize) -> Self {
        Self {
            records: vec![ForceRecord::default(); len],
        }
    }

    pub fn from_records(records: Vec<ForceRecord>) -> Self {
        Self { records }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ForceRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[ForceRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForceRecord> {
        self.records.iter()
    }

    /// Adds `force` to one atom. Panics if `index` is out of range.
    pub fn accumulate(&mut self, index: usize, atom: BackboneAtom, force: Vector3<f64>) {
        self.records[index].accumulate(atom, force);
    }

    pub fn add_record(&mut self, index: usize, record: ForceRecord) {
        self.records[index] += record;
    }

    /// Index of the first residue whose record holds a non-finite component.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.records.iter().position(|r| !r.is_finite())
    }
}

impl Index<usize> for ForceMap {
    type Output = ForceRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

/// Merges by index; a longer right-hand map extends this one.
impl AddAssign<&ForceMap> for ForceMap {
    fn add_assign(&mut self, rhs: &ForceMap) {
        if rhs.records.len() > self.records.len() {
            self.records.resize(rhs.records.len(), ForceRecord::default());
        }
        for (mine, theirs) in self.records.iter_mut().zip(&rhs.records) {
            *mine += *theirs;
        }
    }
}
