//! Isosurface extraction by marching tetrahedra.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::debug;

use crate::grid::ScalarGrid;

/// Extracts the `iso` level set of a scalar grid as triangles.
///
/// Triangles are returned in voxel-space coordinates (voxel `(i, j, k)` at
/// `(i, j, k)`); map them to world space with [`ScalarGrid::voxel_to_world`].
/// Samples below `iso` count as inside, and triangles face away from the
/// inside.
pub trait IsosurfaceExtractor {
    /// Extract the level set.
    fn extract(&self, grid: &ScalarGrid, iso: f64) -> Vec<[Point3<f64>; 3]>;
}

/// Cube corner offsets, bit 0 = x, bit 1 = y, bit 2 = z.
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Six tetrahedra around the 0-7 diagonal.
///
/// Every cube uses the same split, so faces shared by neighbouring cubes are
/// cut along the same diagonal and the output has no cracks.
const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 3, 2, 7],
    [0, 2, 6, 7],
    [0, 6, 4, 7],
    [0, 4, 5, 7],
    [0, 5, 1, 7],
];

/// Marching tetrahedra over a Freudenthal split of each cube.
///
/// Unlike marching cubes it needs no case table and has no ambiguous
/// configurations; the output is closed wherever the field is above `iso`
/// on the grid boundary. Edge crossings are always interpolated from the
/// lower-indexed sample, so a crossing shared by several tetrahedra is
/// bit-identical in each and welds exactly.
///
/// Z-slabs of cubes are processed in parallel and concatenated in slab
/// order, so the output is deterministic.
///
/// # Example
///
/// ```
/// use mesh_offset::{IsosurfaceExtractor, MarchingTetrahedra, ScalarGrid};
/// use mesh_sdf::GridSpec;
/// use nalgebra::Point3;
///
/// let spec = GridSpec::new(Point3::new(-2.0, -2.0, -2.0), 0.25, [17, 17, 17]);
/// let sphere = ScalarGrid::from_fn(spec, |p| p.coords.norm() - 1.0).unwrap();
///
/// let triangles = MarchingTetrahedra.extract(&sphere, 0.0);
/// assert!(!triangles.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MarchingTetrahedra;

impl IsosurfaceExtractor for MarchingTetrahedra {
    fn extract(&self, grid: &ScalarGrid, iso: f64) -> Vec<[Point3<f64>; 3]> {
        let [nx, ny, nz] = grid.dims();
        if nx < 2 || ny < 2 || nz < 2 {
            return Vec::new();
        }

        let slabs: Vec<Vec<[Point3<f64>; 3]>> = (0..nz - 1)
            .into_par_iter()
            .map(|k| {
                let mut out = Vec::new();
                for j in 0..ny - 1 {
                    for i in 0..nx - 1 {
                        polygonize_cube(grid, [i, j, k], iso, &mut out);
                    }
                }
                out
            })
            .collect();

        let triangles: Vec<_> = slabs.into_iter().flatten().collect();
        debug!(nx, ny, nz, iso, triangles = triangles.len(), "extracted isosurface");
        triangles
    }
}

/// One lattice sample: flat index (for canonical ordering), voxel position
/// and value.
#[derive(Clone, Copy)]
struct Sample {
    index: usize,
    position: Point3<f64>,
    value: f64,
}

#[allow(clippy::cast_precision_loss)]
fn polygonize_cube(grid: &ScalarGrid, base: [usize; 3], iso: f64, out: &mut Vec<[Point3<f64>; 3]>) {
    let spec = grid.spec();
    let values = grid.values();

    let corners: [Sample; 8] = CORNERS.map(|[ox, oy, oz]| {
        let (i, j, k) = (base[0] + ox, base[1] + oy, base[2] + oz);
        let index = spec.index(i, j, k);
        Sample {
            index,
            position: Point3::new(i as f64, j as f64, k as f64),
            value: values[index],
        }
    });

    // Fast reject: all corners on one side
    let inside = corners.iter().filter(|c| c.value < iso).count();
    if inside == 0 || inside == 8 {
        return;
    }

    for tet in TETRAHEDRA {
        let samples = tet.map(|c| corners[c]);
        polygonize_tetrahedron(&samples, iso, out);
    }
}

fn polygonize_tetrahedron(tet: &[Sample; 4], iso: f64, out: &mut Vec<[Point3<f64>; 3]>) {
    let (inside, outside): (Vec<Sample>, Vec<Sample>) = tet.iter().partition(|s| s.value < iso);

    match (inside.as_slice(), outside.as_slice()) {
        ([a], [b, c, d]) | ([b, c, d], [a]) => {
            let tri = [crossing(a, b, iso), crossing(a, c, iso), crossing(a, d, iso)];
            push_oriented(tri, &inside, &outside, out);
        }
        ([a, b], [c, d]) => {
            let ac = crossing(a, c, iso);
            let ad = crossing(a, d, iso);
            let bd = crossing(b, d, iso);
            let bc = crossing(b, c, iso);
            push_oriented([ac, ad, bd], &inside, &outside, out);
            push_oriented([ac, bd, bc], &inside, &outside, out);
        }
        _ => {}
    }
}

/// Interpolated crossing on edge `p-q`, always evaluated from the endpoint
/// with the lower lattice index.
fn crossing(p: &Sample, q: &Sample, iso: f64) -> Point3<f64> {
    let (lo, hi) = if p.index < q.index { (p, q) } else { (q, p) };
    let denom = hi.value - lo.value;
    let t = if denom.abs() > f64::MIN_POSITIVE {
        ((iso - lo.value) / denom).clamp(0.0, 1.0)
    } else {
        0.5
    };
    lo.position + (hi.position - lo.position) * t
}

/// Push `tri`, flipped if needed so its normal points from the inside
/// samples toward the outside samples.
fn push_oriented(
    tri: [Point3<f64>; 3],
    inside: &[Sample],
    outside: &[Sample],
    out: &mut Vec<[Point3<f64>; 3]>,
) {
    let normal = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    let toward_outside = centroid(outside) - centroid(inside);
    if normal.dot(&toward_outside) < 0.0 {
        out.push([tri[0], tri[2], tri[1]]);
    } else {
        out.push(tri);
    }
}

#[allow(clippy::cast_precision_loss)]
fn centroid(samples: &[Sample]) -> Vector3<f64> {
    let sum: Vector3<f64> = samples.iter().map(|s| s.position.coords).sum();
    sum / samples.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hashbrown::HashMap;
    use mesh_sdf::GridSpec;

    fn sphere_grid(radius: f64) -> ScalarGrid {
        let spec = GridSpec::new(Point3::new(-1.5, -1.5, -1.5), 0.1, [31, 31, 31]);
        ScalarGrid::from_fn(spec, |p| p.coords.norm() - radius).expect("valid grid")
    }

    fn key(p: &Point3<f64>) -> [u64; 3] {
        [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
    }

    /// Count of each undirected edge after exact welding.
    fn edge_counts(triangles: &[[Point3<f64>; 3]]) -> HashMap<([u64; 3], [u64; 3]), usize> {
        let mut counts = HashMap::new();
        for tri in triangles {
            for e in 0..3 {
                let a = key(&tri[e]);
                let b = key(&tri[(e + 1) % 3]);
                let edge = if a < b { (a, b) } else { (b, a) };
                *counts.entry(edge).or_insert(0) += 1;
            }
        }
        counts
    }

    #[test]
    fn uniform_field_has_no_surface() {
        let spec = GridSpec::new(Point3::origin(), 1.0, [4, 4, 4]);
        let grid = ScalarGrid::filled(spec, 1.0).expect("valid");
        assert!(MarchingTetrahedra.extract(&grid, 0.0).is_empty());
    }

    #[test]
    fn flat_grid_has_no_cubes() {
        let spec = GridSpec::new(Point3::origin(), 1.0, [4, 4, 1]);
        let grid = ScalarGrid::filled(spec, -1.0).expect("valid");
        assert!(MarchingTetrahedra.extract(&grid, 0.0).is_empty());
    }

    #[test]
    fn sphere_vertices_lie_near_radius() {
        let grid = sphere_grid(1.0);
        let triangles = MarchingTetrahedra.extract(&grid, 0.0);
        assert!(!triangles.is_empty());
        for tri in &triangles {
            for v in tri {
                let r = grid.voxel_to_world(v).coords.norm();
                assert!((r - 1.0).abs() < 0.02, "radius {r}");
            }
        }
    }

    #[test]
    fn sphere_surface_is_closed() {
        let triangles = MarchingTetrahedra.extract(&sphere_grid(0.93), 0.0);
        let counts = edge_counts(&triangles);
        assert!(!counts.is_empty());
        assert!(counts.values().all(|&n| n % 2 == 0));
    }

    #[test]
    fn sphere_faces_point_outward() {
        let grid = sphere_grid(0.93);
        let triangles = MarchingTetrahedra.extract(&grid, 0.0);
        let volume: f64 = triangles
            .iter()
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|p| grid.voxel_to_world(&p).coords);
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum();
        let expected = 4.0 / 3.0 * std::f64::consts::PI * 0.93_f64.powi(3);
        assert_relative_eq!(volume, expected, max_relative = 0.03);
    }

    #[test]
    fn iso_value_offsets_the_surface() {
        let grid = sphere_grid(0.5);
        let triangles = MarchingTetrahedra.extract(&grid, 0.3);
        let mean_r = triangles
            .iter()
            .flat_map(|t| t.iter())
            .map(|p| grid.voxel_to_world(p).coords.norm())
            .sum::<f64>()
            / (triangles.len() * 3) as f64;
        assert_relative_eq!(mean_r, 0.8, epsilon = 0.02);
    }

    #[test]
    fn output_is_deterministic() {
        let grid = sphere_grid(0.7);
        let a = MarchingTetrahedra.extract(&grid, 0.0);
        let b = MarchingTetrahedra.extract(&grid, 0.0);
        assert_eq!(a, b);
    }
}
