use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

const DEGENERACY_EPSILON: f64 = 1e-9;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Reference bond vectors are parallel; the local frame is undefined")]
    DegenerateFrame,
    #[error("Cannot normalize a zero-length vector")]
    ZeroLength,
}

pub fn try_normalize(vector: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
    vector
        .try_normalize(DEGENERACY_EPSILON)
        .ok_or(GeometryError::ZeroLength)
}

/// Wraps an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Places a new atom bonded to `current` from internal coordinates.
///
/// The local frame is right-handed: `z` is `reference_1` normalized, `x` is the
/// component of `reference_2` orthogonal to `z`, negated and normalized, and
/// `y = z × x`. The new bond leaves `current` at a polar angle of
/// `180° - bond_angle_deg` from `z` and an azimuth of `torsion_deg` about `z`.
///
/// With `reference_1` pointing along the bond into `current` and `reference_2` along
/// the bond before it, the dihedral measured over the four atoms equals `torsion_deg`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroLength`] if `reference_1` has no length, and
/// [`GeometryError::DegenerateFrame`] if `reference_2` has no component orthogonal
/// to it.
pub fn compute_position(
    current: &Point3<f64>,
    reference_1: &Vector3<f64>,
    reference_2: &Vector3<f64>,
    bond_length: f64,
    bond_angle_deg: f64,
    torsion_deg: f64,
) -> Result<Point3<f64>, GeometryError> {
    let z_axis = try_normalize(reference_1)?;
    let orthogonal = reference_2 - z_axis * reference_2.dot(&z_axis);
    if orthogonal.norm() <= DEGENERACY_EPSILON * reference_2.norm().max(1.0) {
        return Err(GeometryError::DegenerateFrame);
    }
    let x_axis = -orthogonal.normalize();
    let y_axis = z_axis.cross(&x_axis);
    let frame = Matrix3::from_columns(&[x_axis, y_axis, z_axis]);

    let polar = (180.0 - bond_angle_deg).to_radians();
    let azimuth = torsion_deg.to_radians();
    let local = Vector3::new(
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    );

    Ok(current + frame * local * bond_length)
}

/// Dihedral angle of four points in degrees, IUPAC sign convention, in `(-180, 180]`.
///
/// Degenerate inputs (collinear points) yield `0.0`.
pub fn dihedral_angle(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> f64 {
    let b1 = p1 - p0;
    let b2 = p2 - p1;
    let b3 = p3 - p2;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    let angle = y.atan2(x).to_degrees();
    if angle <= -180.0 { angle + 360.0 } else { angle }
}

/// Analytic gradient of [`dihedral_angle`] (in radians) with respect to each of the
/// four points, following Blondel and Karplus (1996).
///
/// The four vectors sum to zero, so moving all points along them is a pure torsion
/// about the `p1`-`p2` axis with no net translation.
pub fn dihedral_gradient(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Result<[Vector3<f64>; 4], GeometryError> {
    let f = p0 - p1;
    let g = p1 - p2;
    let h = p3 - p2;

    let a = f.cross(&g);
    let b = h.cross(&g);
    let g_norm = g.norm();
    let a_sq = a.norm_squared();
    let b_sq = b.norm_squared();

    if g_norm <= DEGENERACY_EPSILON {
        return Err(GeometryError::ZeroLength);
    }
    if a_sq <= DEGENERACY_EPSILON || b_sq <= DEGENERACY_EPSILON {
        return Err(GeometryError::DegenerateFrame);
    }

    let first = -a * (g_norm / a_sq);
    let last = b * (g_norm / b_sq);
    let a_term = a * (f.dot(&g) / (a_sq * g_norm));
    let b_term = b * (h.dot(&g) / (b_sq * g_norm));

    let second = -first + a_term - b_term;
    let third = -last - a_term + b_term;

    Ok([first, second, third, last])
}
