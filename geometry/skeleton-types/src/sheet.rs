//! Skeleton sheets: tensor-product Bézier patches over a control grid.

use std::cell::OnceCell;

use nalgebra::{Point3, Vector3};

use crate::error::{SkeletonError, SkeletonResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on tessellation steps per parameter direction.
const MAX_QUAD_STEPS: usize = 512;

/// Control grid size used by [`SkeletonSheet::from_corners`].
pub const DEFAULT_GRID_SIZE: usize = 4;

/// A point on the sheet with its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Surface position.
    pub position: Point3<f64>,
    /// Unit `[∂S/∂u, ∂S/∂v, normal]`. A direction that cannot be
    /// normalized (degenerate patch) is the zero vector.
    pub frame: [Vector3<f64>; 3],
}

/// One cell of the sheet's tessellation, corners in loop order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corners at `(u0,v0)`, `(u1,v0)`, `(u1,v1)`, `(u0,v1)`.
    pub p: [Point3<f64>; 4],
}

impl Quad {
    /// Split along the `p[0]`-`p[2]` diagonal into two triangles.
    #[must_use]
    pub fn triangles(&self) -> [[Point3<f64>; 3]; 2] {
        let [p0, p1, p2, p3] = self.p;
        [[p0, p1, p2], [p0, p2, p3]]
    }
}

/// A 2-D grid of control points defining a parametric patch.
///
/// Rows run along `u`, columns along `v`; both parameters live in `[0, 1]`.
/// The quad tessellation is memoized on first request and dropped whenever
/// the control grid is replaced.
///
/// # Example
///
/// ```
/// use skeleton_types::SkeletonSheet;
/// use nalgebra::Point3;
///
/// let sheet = SkeletonSheet::from_corners(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// let sample = sheet.evaluate(0.5, 0.5);
/// assert!((sample.position.x - 0.5).abs() < 1e-12);
/// assert!((sample.frame[2].z - 1.0).abs() < 1e-12);
///
/// let quads = sheet.quads_or_generate(0.25);
/// assert_eq!(quads.len(), 16);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonSheet {
    control_points: Vec<Vec<Point3<f64>>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    quads: OnceCell<Vec<Quad>>,
}

impl SkeletonSheet {
    /// Create a sheet from a rectangular control grid of at least 2×2 points.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is smaller than 2×2, ragged, or contains
    /// non-finite coordinates.
    pub fn new(control_points: Vec<Vec<Point3<f64>>>) -> SkeletonResult<Self> {
        validate_grid(&control_points)?;
        Ok(Self {
            control_points,
            quads: OnceCell::new(),
        })
    }

    /// Planar parallelogram sheet from three sketched corners.
    ///
    /// `origin` maps to `(0,0)`, `u_corner` to `(1,0)` and `v_corner` to
    /// `(0,1)`; the fourth corner completes the parallelogram.
    #[must_use]
    pub fn from_corners(origin: Point3<f64>, u_corner: Point3<f64>, v_corner: Point3<f64>) -> Self {
        Self::planar_grid(origin, u_corner, v_corner, DEFAULT_GRID_SIZE)
    }

    /// Like [`Self::from_corners`] with an explicit `size × size` control grid.
    ///
    /// `size` is raised to 2 if smaller.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn planar_grid(
        origin: Point3<f64>,
        u_corner: Point3<f64>,
        v_corner: Point3<f64>,
        size: usize,
    ) -> Self {
        let size = size.max(2);
        let du = u_corner - origin;
        let dv = v_corner - origin;
        let last = (size - 1) as f64;
        let control_points = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| origin + du * (i as f64 / last) + dv * (j as f64 / last))
                    .collect()
            })
            .collect();
        Self {
            control_points,
            quads: OnceCell::new(),
        }
    }

    /// The control grid, rows along `u`.
    #[must_use]
    pub fn control_points(&self) -> &[Vec<Point3<f64>>] {
        &self.control_points
    }

    /// Replace the control grid and drop the cached tessellation.
    ///
    /// # Errors
    ///
    /// Same validation as [`Self::new`]; on error the sheet is unchanged.
    pub fn set_control_points(&mut self, control_points: Vec<Vec<Point3<f64>>>) -> SkeletonResult<()> {
        validate_grid(&control_points)?;
        self.control_points = control_points;
        self.quads = OnceCell::new();
        Ok(())
    }

    /// Distance between the first and last control points of the grid.
    #[must_use]
    pub fn diagonal_extent(&self) -> f64 {
        match (self.control_points.first(), self.control_points.last()) {
            (Some(first_row), Some(last_row)) => match (first_row.first(), last_row.last()) {
                (Some(a), Some(b)) => (b - a).norm(),
                _ => 0.0,
            },
            _ => 0.0,
        }
    }

    /// Evaluate position and local frame at `(u, v)`, clamped to `[0, 1]²`.
    #[must_use]
    pub fn evaluate(&self, u: f64, v: f64) -> SurfaceSample {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let mut rows = Vec::with_capacity(self.control_points.len());
        let mut row_dv = Vec::with_capacity(self.control_points.len());
        for row in &self.control_points {
            let coords: Vec<Vector3<f64>> = row.iter().map(|p| p.coords).collect();
            let (p, d) = de_casteljau(&coords, v);
            rows.push(p);
            row_dv.push(d);
        }

        let (position, du) = de_casteljau(&rows, u);
        let (dv, _) = de_casteljau(&row_dv, u);

        let du = du.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        let dv = dv.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        let normal = du
            .cross(&dv)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        SurfaceSample {
            position: Point3::from(position),
            frame: [du, dv, normal],
        }
    }

    /// The cached tessellation, if one has been generated.
    #[must_use]
    pub fn quads(&self) -> Option<&[Quad]> {
        self.quads.get().map(Vec::as_slice)
    }

    /// The cached tessellation, generating it at `resolution` on first use.
    ///
    /// `resolution` is the target world-space edge length; the step count per
    /// direction follows the control polygon's length along that direction.
    /// Later calls return the cached quads whatever `resolution` they pass.
    pub fn quads_or_generate(&self, resolution: f64) -> &[Quad] {
        self.quads.get_or_init(|| self.tessellate(resolution))
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn tessellate(&self, resolution: f64) -> Vec<Quad> {
        let steps_for = |length: f64| -> usize {
            if resolution > 0.0 && resolution.is_finite() && length.is_finite() {
                ((length / resolution).ceil() as usize).clamp(1, MAX_QUAD_STEPS)
            } else {
                1
            }
        };
        let n_u = steps_for(self.polygon_length_u());
        let n_v = steps_for(self.polygon_length_v());

        let grid: Vec<Vec<Point3<f64>>> = (0..=n_u)
            .map(|i| {
                let u = i as f64 / n_u as f64;
                (0..=n_v)
                    .map(|j| self.evaluate(u, j as f64 / n_v as f64).position)
                    .collect()
            })
            .collect();

        let mut quads = Vec::with_capacity(n_u * n_v);
        for i in 0..n_u {
            for j in 0..n_v {
                quads.push(Quad {
                    p: [grid[i][j], grid[i + 1][j], grid[i + 1][j + 1], grid[i][j + 1]],
                });
            }
        }
        quads
    }

    /// Longest control-polygon length along `u` over all columns.
    fn polygon_length_u(&self) -> f64 {
        let cols = self.control_points.first().map_or(0, Vec::len);
        (0..cols)
            .map(|j| {
                self.control_points
                    .windows(2)
                    .map(|w| (w[1][j] - w[0][j]).norm())
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    }

    /// Longest control-polygon length along `v` over all rows.
    fn polygon_length_v(&self) -> f64 {
        self.control_points
            .iter()
            .map(|row| row.windows(2).map(|w| (w[1] - w[0]).norm()).sum::<f64>())
            .fold(0.0, f64::max)
    }
}

fn validate_grid(grid: &[Vec<Point3<f64>>]) -> SkeletonResult<()> {
    if grid.len() < 2 {
        return Err(SkeletonError::InsufficientPoints {
            required: 2,
            actual: grid.len(),
        });
    }
    let expected = grid[0].len();
    if expected < 2 {
        return Err(SkeletonError::InsufficientPoints {
            required: 2,
            actual: expected,
        });
    }
    for (row, points) in grid.iter().enumerate() {
        if points.len() != expected {
            return Err(SkeletonError::RaggedGrid {
                row,
                expected,
                actual: points.len(),
            });
        }
        if let Some(col) = points
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(SkeletonError::NonFinitePoint {
                index: row * expected + col,
            });
        }
    }
    Ok(())
}

/// Evaluate a Bézier curve and its derivative at `t`.
///
/// An empty control sequence yields zeros.
#[allow(clippy::cast_precision_loss)]
fn de_casteljau(control: &[Vector3<f64>], t: f64) -> (Vector3<f64>, Vector3<f64>) {
    let mut pts = control.to_vec();
    let n = pts.len();
    if n == 0 {
        return (Vector3::zeros(), Vector3::zeros());
    }
    if n == 1 {
        return (pts[0], Vector3::zeros());
    }

    // Reduce to the last two points; their difference gives the derivative
    for level in 1..n - 1 {
        for k in 0..n - level {
            pts[k] = pts[k] * (1.0 - t) + pts[k + 1] * t;
        }
    }
    let (a, b) = (pts[0], pts[1]);
    let position = a * (1.0 - t) + b * t;
    let derivative = (b - a) * (n - 1) as f64;
    (position, derivative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_sheet() -> SkeletonSheet {
        SkeletonSheet::from_corners(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn corners_interpolate_grid() {
        let sheet = unit_sheet();
        let s = sheet.evaluate(1.0, 1.0);
        assert_relative_eq!(s.position.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.position.y, 1.0, epsilon = 1e-12);
        let s = sheet.evaluate(0.0, 0.0);
        assert_relative_eq!(s.position.coords.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn frame_is_orthonormal_on_planar_sheet() {
        let s = unit_sheet().evaluate(0.3, 0.8);
        assert_relative_eq!(s.frame[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.frame[1].y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.frame[2].z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn curved_patch_derivative_matches_finite_difference() {
        let grid = vec![
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0), Point3::new(0.0, 2.0, 0.0)],
            vec![Point3::new(1.0, 0.0, 0.5), Point3::new(1.0, 1.0, 2.0), Point3::new(1.0, 2.0, 0.5)],
            vec![Point3::new(2.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0), Point3::new(2.0, 2.0, 0.0)],
        ];
        let sheet = SkeletonSheet::new(grid).expect("valid grid");
        let h = 1e-6;
        let a = sheet.evaluate(0.4 - h, 0.6).position;
        let b = sheet.evaluate(0.4 + h, 0.6).position;
        let fd = (b - a).normalize();
        let du = sheet.evaluate(0.4, 0.6).frame[0];
        assert_relative_eq!(fd, du, epsilon = 1e-6);
    }

    #[test]
    fn diagonal_extent_uses_grid_corners() {
        assert_relative_eq!(unit_sheet().diagonal_extent(), 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn quads_are_cached_until_points_change() {
        let mut sheet = unit_sheet();
        assert!(sheet.quads().is_none());
        assert_eq!(sheet.quads_or_generate(0.5).len(), 4);
        // Cached: a different resolution does not regenerate
        assert_eq!(sheet.quads_or_generate(0.1).len(), 4);

        sheet
            .set_control_points(vec![
                vec![Point3::origin(), Point3::new(0.0, 2.0, 0.0)],
                vec![Point3::new(2.0, 0.0, 0.0), Point3::new(2.0, 2.0, 0.0)],
            ])
            .expect("valid grid");
        assert!(sheet.quads().is_none());
        assert_eq!(sheet.quads_or_generate(0.5).len(), 16);
    }

    #[test]
    fn quad_triangles_share_diagonal() {
        let quads = unit_sheet().quads_or_generate(1.0).to_vec();
        assert_eq!(quads.len(), 1);
        let [t0, t1] = quads[0].triangles();
        assert_eq!(t0[0], t1[0]);
        assert_eq!(t0[2], t1[1]);
        let n = (t0[1] - t0[0]).cross(&(t0[2] - t0[0]));
        assert!(n.z > 0.0);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        assert!(matches!(
            SkeletonSheet::new(vec![vec![Point3::origin(), Point3::origin()]]),
            Err(SkeletonError::InsufficientPoints { .. })
        ));
        assert!(matches!(
            SkeletonSheet::new(vec![
                vec![Point3::origin(), Point3::origin()],
                vec![Point3::origin()],
            ]),
            Err(SkeletonError::RaggedGrid { row: 1, .. })
        ));
    }

    #[test]
    fn failed_update_keeps_cache() {
        let mut sheet = unit_sheet();
        let _ = sheet.quads_or_generate(0.5);
        assert!(sheet.set_control_points(Vec::new()).is_err());
        assert!(sheet.quads().is_some());
    }
}
