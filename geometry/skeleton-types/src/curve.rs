//! Skeleton curves (piecewise linear paths through control points).

use nalgebra::Point3;

use crate::error::{SkeletonError, SkeletonResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered sequence of control points defining a piecewise linear path.
///
/// Arc length is precomputed so uniform resampling is a binary search per
/// sample. A curve may hold fewer than two points (a half-finished sketch);
/// such a curve has zero length and resamples to nothing.
///
/// # Example
///
/// ```
/// use skeleton_types::SkeletonCurve;
/// use nalgebra::Point3;
///
/// let curve = SkeletonCurve::new(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ]);
///
/// assert!((curve.arc_length() - 2.0).abs() < 1e-10);
///
/// // Midpoint by arc length is the corner
/// let mid = curve.point_at_arc(1.0);
/// assert!((mid.x - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonCurve {
    /// The control points, in path order.
    control_points: Vec<Point3<f64>>,
    /// Cumulative arc lengths at each control point.
    cumulative_lengths: Vec<f64>,
    /// Total arc length.
    total_length: f64,
}

impl SkeletonCurve {
    /// Create a curve from sketched points.
    #[must_use]
    pub fn new(control_points: Vec<Point3<f64>>) -> Self {
        let (cumulative_lengths, total_length) = compute_cumulative_lengths(&control_points);
        Self {
            control_points,
            cumulative_lengths,
            total_length,
        }
    }

    /// Create a curve, rejecting fewer than two points or non-finite input.
    ///
    /// # Errors
    ///
    /// Returns [`SkeletonError::InsufficientPoints`] for fewer than two points
    /// and [`SkeletonError::NonFinitePoint`] for NaN/infinite coordinates.
    pub fn try_new(control_points: Vec<Point3<f64>>) -> SkeletonResult<Self> {
        if control_points.len() < 2 {
            return Err(SkeletonError::InsufficientPoints {
                required: 2,
                actual: control_points.len(),
            });
        }
        if let Some(index) = control_points
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(SkeletonError::NonFinitePoint { index });
        }
        Ok(Self::new(control_points))
    }

    /// The control points.
    #[must_use]
    pub fn control_points(&self) -> &[Point3<f64>] {
        &self.control_points
    }

    /// Number of control points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.control_points.len()
    }

    /// Whether the curve has no control points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    /// Total arc length of the path.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.total_length
    }

    /// Point at arc length `s` from the start, clamped to the path.
    ///
    /// Returns the origin for an empty curve.
    #[must_use]
    pub fn point_at_arc(&self, s: f64) -> Point3<f64> {
        match self.control_points.len() {
            0 => Point3::origin(),
            1 => self.control_points[0],
            _ => {
                let (seg_idx, local_t) = self.segment_at_arc(s);
                let p0 = self.control_points[seg_idx];
                let p1 = self.control_points[seg_idx + 1];
                p0 + (p1 - p0) * local_t
            }
        }
    }

    /// Resample the path at `count` points uniformly spaced by arc length.
    ///
    /// Both endpoints are included. Returns an empty vector when the curve
    /// has fewer than two control points or `count` is zero.
    ///
    /// ```
    /// use skeleton_types::SkeletonCurve;
    /// use nalgebra::Point3;
    ///
    /// let curve = SkeletonCurve::new(vec![Point3::origin(), Point3::new(0.0, 0.0, 1.0)]);
    /// let pts = curve.resample(3);
    /// assert!((pts[1].z - 0.5).abs() < 1e-12);
    ///
    /// let lonely = SkeletonCurve::new(vec![Point3::origin()]);
    /// assert!(lonely.resample(10).is_empty());
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn resample(&self, count: usize) -> Vec<Point3<f64>> {
        if self.control_points.len() < 2 || count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return vec![self.control_points[0]];
        }

        let step = self.total_length / (count - 1) as f64;
        (0..count)
            .map(|i| {
                if i == count - 1 {
                    // Avoid drift at the far end
                    self.control_points[self.control_points.len() - 1]
                } else {
                    self.point_at_arc(step * i as f64)
                }
            })
            .collect()
    }

    /// Find which segment contains the given arc length.
    ///
    /// Returns `(segment_index, local_t)` with `local_t ∈ [0, 1]`.
    /// Requires at least two control points.
    fn segment_at_arc(&self, arc: f64) -> (usize, f64) {
        let last_segment = self.control_points.len() - 2;
        if arc <= 0.0 {
            return (0, 0.0);
        }
        if arc >= self.total_length {
            return (last_segment, 1.0);
        }

        // First cumulative length >= arc
        let upper = self.cumulative_lengths.partition_point(|&len| len < arc);
        let seg_idx = upper.saturating_sub(1).min(last_segment);
        let seg_start = self.cumulative_lengths[seg_idx];
        let seg_len = self.cumulative_lengths[seg_idx + 1] - seg_start;

        let local_t = if seg_len > 1e-12 {
            ((arc - seg_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };

        (seg_idx, local_t)
    }
}

fn compute_cumulative_lengths(points: &[Point3<f64>]) -> (Vec<f64>, f64) {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    if let Some(first) = points.first() {
        cumulative.push(0.0);
        let mut prev = first;
        for p in &points[1..] {
            total += (p - prev).norm();
            cumulative.push(total);
            prev = p;
        }
    }
    (cumulative, total)
}
