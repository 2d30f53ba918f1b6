use crate::core::models::chain::Chain;
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactnessMeasurement {
    /// Volume of the axis-aligned bounding box of all positioned atoms, in pm³.
    pub bounding_box_volume: f64,
    /// Root-mean-square distance of the atoms from their centroid, in pm.
    pub radius_of_gyration: f64,
    pub centroid: Point3<f64>,
}

/// Axis-aligned bounding-box volume of a set of points, or `None` for an empty set.
pub fn bounding_box_volume<I>(points: I) -> Option<f64>
where
    I: IntoIterator<Item = Point3<f64>>,
{
    let mut points = points.into_iter();
    let first = points.next()?;
    let (min, max) = points.fold((first, first), |(min, max), p| {
        (min.inf(&p), max.sup(&p))
    });
    let extent: Vector3<f64> = max - min;
    Some(extent.x * extent.y * extent.z)
}

pub fn centroid<I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = Point3<f64>>,
{
    let (sum, count) = points
        .into_iter()
        .fold((Vector3::zeros(), 0usize), |(sum, count), p| {
            (sum + p.coords, count + 1)
        });
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Measures every positioned backbone atom of the chain. Returns `None` if no atom
/// is positioned.
pub fn measure_compactness(chain: &Chain) -> Option<CompactnessMeasurement> {
    let points: Vec<_> = chain.positions().collect();
    let centroid = centroid(points.iter().copied())?;
    let bounding_box_volume = bounding_box_volume(points.iter().copied())?;
    let mean_square = points
        .iter()
        .map(|p| (p - centroid).norm_squared())
        .sum::<f64>()
        / points.len() as f64;

    Some(CompactnessMeasurement {
        bounding_box_volume,
        radius_of_gyration: mean_square.sqrt(),
        centroid,
    })
}
