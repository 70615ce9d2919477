//! Oriented boxes for flat sheets.

use mesh_types::IndexedMesh;
use nalgebra::{Matrix3, Point3, Vector3};
use skeleton_types::{SkeletonSheet, SurfaceSample};
use tracing::debug;

use crate::error::{MesherError, MesherResult};

/// Box faces over corner indices `x | y << 1 | z << 2`, wound outward in
/// a right-handed frame.
const BOX_FACES: [[usize; 3]; 12] = [
    [0, 2, 3],
    [0, 3, 1],
    [4, 5, 7],
    [4, 7, 6],
    [0, 1, 5],
    [0, 5, 4],
    [2, 6, 7],
    [2, 7, 3],
    [0, 4, 6],
    [0, 6, 2],
    [1, 3, 7],
    [1, 7, 5],
];

/// Right-handed orthonormal basis from a surface frame.
///
/// The `u` tangent is kept, the `v` tangent is orthogonalized against it,
/// and the third axis is their cross product. Falls back to the world axes
/// when the tangents are missing or parallel.
fn orthonormal_frame(sample: &SurfaceSample) -> Matrix3<f64> {
    let [du, dv, _] = sample.frame;
    let basis = du.try_normalize(1e-12).and_then(|e0| {
        let e1 = (dv - e0 * dv.dot(&e0)).try_normalize(1e-12)?;
        Some(Matrix3::from_columns(&[e0, e1, e0.cross(&e1)]))
    });
    basis.unwrap_or_else(Matrix3::identity)
}

/// Sum of the three frame directions, pushed `thickness` along it.
fn corner_push(sample: &SurfaceSample, thickness: f64) -> Vector3<f64> {
    let [a, b, c] = sample.frame;
    (a + b + c) * thickness
}

/// Thin box enclosing a flat sheet, as a 12-triangle soup.
///
/// The box lives in the orthonormalized frame of the sheet at `(0, 0)`.
/// Two opposite corners are taken from the sheet's `(0, 0)` and `(1, 1)`
/// positions, each pushed `thickness` along its own frame diagonal
/// (inward at the start, outward at the end). Their per-axis minimum and
/// maximum in the local frame span the box, so a reversed sheet still
/// yields a positive box.
///
/// # Errors
///
/// [`MesherError::InvalidOffset`] if `thickness` is not positive and
/// finite.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use skeleton_mesher::oriented_box;
/// use skeleton_types::SkeletonSheet;
///
/// let sheet = SkeletonSheet::from_corners(
///     Point3::origin(),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// let soup = oriented_box(&sheet, 0.1).unwrap();
/// assert_eq!(soup.face_count(), 12);
/// assert!((soup.signed_volume() - 1.2 * 1.2 * 0.2).abs() < 1e-9);
/// ```
pub fn oriented_box(sheet: &SkeletonSheet, thickness: f64) -> MesherResult<IndexedMesh> {
    if !(thickness > 0.0 && thickness.is_finite()) {
        return Err(MesherError::InvalidOffset(thickness));
    }

    let start = sheet.evaluate(0.0, 0.0);
    let end = sheet.evaluate(1.0, 1.0);
    let basis = orthonormal_frame(&start);
    let origin = start.position;

    let near = start.position - corner_push(&start, thickness);
    let far = end.position + corner_push(&end, thickness);
    let to_local = |p: Point3<f64>| basis.transpose() * (p - origin);
    let (a, b) = (to_local(near), to_local(far));
    let lo = a.inf(&b);
    let hi = a.sup(&b);

    let corners: [Point3<f64>; 8] = std::array::from_fn(|bits| {
        let pick = |axis: usize| if (bits >> axis) & 1 == 1 { hi[axis] } else { lo[axis] };
        origin + basis * Vector3::new(pick(0), pick(1), pick(2))
    });
    debug!(min = ?lo, max = ?hi, thickness, "oriented box");

    let mut soup = IndexedMesh::with_capacity(36, 12);
    for [i, j, k] in BOX_FACES {
        soup.push_triangle(corners[i], corners[j], corners[k]);
    }
    Ok(soup)
}
