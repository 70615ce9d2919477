//! Signed distance sampling on a regular grid.

use mesh_types::{Aabb, IndexedMesh, Triangle};
use nalgebra::Point3;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{SdfError, SdfResult};
use crate::query::{closest_point_on_triangle, solid_angle};

/// Placement of a regular voxel grid in world space.
///
/// Voxel `(i, j, k)` sits at `origin + dx·(i, j, k)`. Sampled values are
/// laid out x-fastest: `index = i + nx·(j + ny·k)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// World position of voxel `(0, 0, 0)`.
    pub origin: Point3<f64>,
    /// Edge length of one voxel.
    pub dx: f64,
    /// Voxel counts `[nx, ny, nz]`.
    pub dims: [usize; 3],
}

impl GridSpec {
    /// Create a grid description.
    #[must_use]
    pub const fn new(origin: Point3<f64>, dx: f64, dims: [usize; 3]) -> Self {
        Self { origin, dx, dims }
    }

    /// Check dimensions and voxel size, returning the voxel count.
    ///
    /// # Errors
    ///
    /// [`SdfError::InvalidGrid`] for a zero dimension or a non-positive /
    /// non-finite `dx`; [`SdfError::GridTooLarge`] if the count overflows.
    pub fn validate(&self) -> SdfResult<usize> {
        if self.dims.contains(&0) || !(self.dx > 0.0 && self.dx.is_finite()) {
            return Err(SdfError::InvalidGrid {
                dims: self.dims,
                dx: self.dx,
            });
        }
        self.voxel_count()
            .ok_or(SdfError::GridTooLarge { dims: self.dims })
    }

    /// Total number of voxels, or `None` on overflow.
    #[must_use]
    pub fn voxel_count(&self) -> Option<usize> {
        let [nx, ny, nz] = self.dims;
        nx.checked_mul(ny)?.checked_mul(nz)
    }

    /// World position of voxel `(i, j, k)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, i: usize, j: usize, k: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + i as f64 * self.dx,
            self.origin.y + j as f64 * self.dx,
            self.origin.z + k as f64 * self.dx,
        )
    }

    /// Flat index of voxel `(i, j, k)` in x-fastest order.
    #[must_use]
    pub const fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.dims[0] * (j + self.dims[1] * k)
    }
}

/// Samples a signed distance field of a triangle mesh onto a grid.
///
/// Implementations must be pure: same inputs, same outputs, no shared state.
/// Values are negative inside, positive outside, and clamped to
/// `±max_distance`; the layout follows [`GridSpec::index`].
pub trait DistanceSampler {
    /// Sample `mesh` at every voxel of `grid`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty mesh, an invalid grid, or faces that
    /// reference missing vertices.
    fn sample(&self, mesh: &IndexedMesh, grid: &GridSpec, max_distance: f64) -> SdfResult<Vec<f64>>;
}

/// Exact closest-triangle distance with winding-number sign.
///
/// Magnitude is the distance to the nearest triangle, found among triangles
/// whose bounds lie within `max_distance` of the voxel. Sign comes from the
/// generalized winding number, so open and zero-area inputs (ribbons,
/// single sheets) read as outside everywhere and produce a two-sided
/// offset at positive iso values.
///
/// # Example
///
/// ```
/// use mesh_sdf::{ClosestTriangleSampler, DistanceSampler, GridSpec};
/// use mesh_types::IndexedMesh;
/// use nalgebra::Point3;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.push_triangle(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// let grid = GridSpec::new(Point3::new(0.0, 0.0, -1.0), 1.0, [2, 2, 3]);
/// let values = ClosestTriangleSampler.sample(&mesh, &grid, 10.0).unwrap();
/// assert_eq!(values.len(), 12);
/// // Voxel (0, 0, 2) sits one unit above the triangle's corner
/// assert!((values[grid.index(0, 0, 2)] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestTriangleSampler;

impl DistanceSampler for ClosestTriangleSampler {
    fn sample(&self, mesh: &IndexedMesh, grid: &GridSpec, max_distance: f64) -> SdfResult<Vec<f64>> {
        let voxel_count = grid.validate()?;
        let triangles = collect_triangles(mesh)?;
        let max_distance = if max_distance.is_finite() {
            max_distance.abs()
        } else {
            f64::MAX
        };

        let bounds: Vec<Aabb> = triangles
            .iter()
            .map(|t| Aabb::from_points([t.v0, t.v1, t.v2].iter()))
            .collect();
        let max_sq = max_distance * max_distance;

        let [nx, ny, nz] = grid.dims;
        debug!(
            triangles = triangles.len(),
            nx, ny, nz, voxel_count, max_distance, "sampling signed distance"
        );

        let slab = nx * ny;
        let mut values = vec![max_distance; voxel_count];
        values
            .par_chunks_mut(slab)
            .enumerate()
            .for_each(|(k, slab_values)| {
                for j in 0..ny {
                    for i in 0..nx {
                        let p = grid.position(i, j, k);

                        let mut best_sq = max_sq;
                        for (tri, aabb) in triangles.iter().zip(&bounds) {
                            if aabb.distance_squared(&p) >= best_sq {
                                continue;
                            }
                            let c = closest_point_on_triangle(p, tri.v0, tri.v1, tri.v2);
                            best_sq = best_sq.min((c - p).norm_squared());
                        }

                        let magnitude = best_sq.sqrt().min(max_distance);
                        let inside = winding_number(p, &triangles).abs() > 0.5;
                        slab_values[i + nx * j] = if inside { -magnitude } else { magnitude };
                    }
                }
            });

        Ok(values)
    }
}

/// Generalized winding number of `triangles` around `point`.
///
/// About 1 inside a closed outward-wound surface, 0 outside, and
/// fractional near open boundaries.
#[must_use]
pub fn winding_number(point: Point3<f64>, triangles: &[Triangle]) -> f64 {
    let total: f64 = triangles
        .iter()
        .map(|t| solid_angle(point, t.v0, t.v1, t.v2))
        .sum();
    total / (4.0 * std::f64::consts::PI)
}

/// Signed distance from `point` to `mesh`, unclamped.
///
/// One-off variant of [`ClosestTriangleSampler`] for a single point.
///
/// # Errors
///
/// Same as [`DistanceSampler::sample`].
pub fn signed_distance(point: Point3<f64>, mesh: &IndexedMesh) -> SdfResult<f64> {
    let triangles = collect_triangles(mesh)?;
    let distance = triangles
        .iter()
        .map(|t| (closest_point_on_triangle(point, t.v0, t.v1, t.v2) - point).norm())
        .fold(f64::INFINITY, f64::min);
    if winding_number(point, &triangles).abs() > 0.5 {
        Ok(-distance)
    } else {
        Ok(distance)
    }
}

fn collect_triangles(mesh: &IndexedMesh) -> SdfResult<Vec<Triangle>> {
    if mesh.faces.is_empty() {
        return Err(SdfError::EmptyMesh);
    }
    let vertex_count = mesh.vertices.len();
    mesh.faces
        .iter()
        .enumerate()
        .map(|(face, &[a, b, c])| {
            let fetch = |vertex: u32| {
                mesh.vertices
                    .get(vertex as usize)
                    .map(|v| v.position)
                    .ok_or(SdfError::IndexOutOfRange {
                        face,
                        vertex,
                        vertex_count,
                    })
            };
            Ok(Triangle::new(fetch(a)?, fetch(b)?, fetch(c)?))
        })
        .collect()
}
