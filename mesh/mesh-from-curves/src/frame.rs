//! Moving frames along polylines.
//!
//! [`DoubleReflection`] produces rotation-minimizing, right-handed frames
//! with `binormal = tangent × normal`.

use nalgebra::{Point3, Vector3};

/// A reference frame anchored at a point on a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Anchor point on the curve.
    pub origin: Point3<f64>,
    /// Tangent direction (forward along curve).
    pub tangent: Vector3<f64>,
    /// Normal direction (perpendicular to tangent).
    pub normal: Vector3<f64>,
    /// `tangent × normal`.
    pub binormal: Vector3<f64>,
}

impl Frame {
    /// Create a frame from an anchor and orthonormal axes.
    #[must_use]
    pub fn new(
        origin: Point3<f64>,
        tangent: Vector3<f64>,
        normal: Vector3<f64>,
        binormal: Vector3<f64>,
    ) -> Self {
        Self {
            origin,
            tangent,
            normal,
            binormal,
        }
    }

    /// Frame at `origin` with an arbitrary normal perpendicular to `tangent`.
    #[must_use]
    pub fn from_tangent(origin: Point3<f64>, tangent: Vector3<f64>) -> Self {
        let tangent = tangent.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
        let normal = find_perpendicular(tangent);
        Self {
            origin,
            tangent,
            normal,
            binormal: tangent.cross(&normal),
        }
    }

    /// Rotate `v` about the unit `axis` by `angle` (right-hand rule).
    #[must_use]
    pub fn rotate(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
        let (sin_a, cos_a) = angle.sin_cos();
        v * cos_a + axis.cross(v) * sin_a + axis * axis.dot(v) * (1.0 - cos_a)
    }
}

/// Produces one orthonormal frame per input point.
///
/// Implementations are pure functions of the point sequence. Fewer than two
/// points yield no frames.
pub trait FramePropagator {
    /// Frames along `points`, one per point.
    fn propagate(&self, points: &[Point3<f64>]) -> Vec<Frame>;
}

/// Rotation-minimizing frames by the double reflection method.
///
/// Wang, Jüttler, Zheng & Liu, "Computation of Rotation Minimizing Frames"
/// (ACM TOG 2008). Each step reflects the frame across the bisector plane of
/// the chord, then across the plane that maps the reflected tangent onto the
/// next tangent. Twist stays minimal through inflections and straight runs.
///
/// # Example
///
/// ```
/// use mesh_from_curves::{DoubleReflection, FramePropagator};
/// use nalgebra::Point3;
///
/// let points: Vec<_> = (0..10)
///     .map(|i| {
///         let t = f64::from(i) * 0.3;
///         Point3::new(t.cos(), t.sin(), 0.2 * t)
///     })
///     .collect();
///
/// let frames = DoubleReflection.propagate(&points);
/// assert_eq!(frames.len(), 10);
/// for f in &frames {
///     assert!(f.tangent.dot(&f.normal).abs() < 1e-9);
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleReflection;

impl FramePropagator for DoubleReflection {
    fn propagate(&self, points: &[Point3<f64>]) -> Vec<Frame> {
        let tangents = tangents(points);
        let Some(&first) = tangents.first() else {
            return Vec::new();
        };

        let mut frames = Vec::with_capacity(points.len());
        frames.push(Frame::from_tangent(points[0], first));

        for i in 0..points.len() - 1 {
            let prev = frames[i];
            let t_next = tangents[i + 1];

            let v1 = points[i + 1] - points[i];
            let c1 = v1.norm_squared();
            let normal = if c1 <= f64::EPSILON * f64::EPSILON {
                prev.normal
            } else {
                let r_l = prev.normal - v1 * (2.0 / c1 * v1.dot(&prev.normal));
                let t_l = prev.tangent - v1 * (2.0 / c1 * v1.dot(&prev.tangent));
                let v2 = t_next - t_l;
                let c2 = v2.norm_squared();
                if c2 <= f64::EPSILON * f64::EPSILON {
                    r_l
                } else {
                    r_l - v2 * (2.0 / c2 * v2.dot(&r_l))
                }
            };

            frames.push(orthonormal_frame(points[i + 1], t_next, normal, prev.normal));
        }

        frames
    }
}

/// Unit tangent per point: central chords inside, one-sided at the ends.
///
/// Zero-length chords inherit the previous tangent; a curve with no
/// non-zero chord at all uses `+Z`.
fn tangents(points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let fallback = points
        .windows(2)
        .find_map(|w| (w[1] - w[0]).try_normalize(f64::EPSILON))
        .unwrap_or_else(Vector3::z);

    let mut out: Vec<Vector3<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let chord = if i == 0 {
            points[1] - points[0]
        } else if i == n - 1 {
            points[n - 1] - points[n - 2]
        } else {
            points[i + 1] - points[i - 1]
        };
        let prev = out.last().copied().unwrap_or(fallback);
        out.push(chord.try_normalize(f64::EPSILON).unwrap_or(prev));
    }
    out
}

/// Gram-Schmidt `normal` against `tangent`, falling back to `previous`
/// (then any perpendicular) if it collapses.
fn orthonormal_frame(
    origin: Point3<f64>,
    tangent: Vector3<f64>,
    normal: Vector3<f64>,
    previous: Vector3<f64>,
) -> Frame {
    let project = |v: Vector3<f64>| (v - tangent * tangent.dot(&v)).try_normalize(1e-12);
    let normal = project(normal)
        .or_else(|| project(previous))
        .unwrap_or_else(|| find_perpendicular(tangent));
    Frame::new(origin, tangent, normal, tangent.cross(&normal))
}

/// Unit vector perpendicular to `v`.
fn find_perpendicular(v: Vector3<f64>) -> Vector3<f64> {
    // Cross with the axis least aligned with v
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    let axis = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&axis)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn helix(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f64 * 0.2;
                Point3::new(t.cos(), t.sin(), 0.3 * t)
            })
            .collect()
    }

    fn assert_orthonormal(frames: &[Frame]) {
        for f in frames {
            assert_relative_eq!(f.tangent.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(f.normal.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(f.tangent.dot(&f.normal), 0.0, epsilon = 1e-9);
            assert_relative_eq!(f.binormal, f.tangent.cross(&f.normal), epsilon = 1e-12);
        }
    }

    #[test]
    fn from_tangent_is_orthonormal() {
        for t in [Vector3::x(), Vector3::y(), Vector3::z(), Vector3::new(1.0, 2.0, -3.0)] {
            assert_orthonormal(&[Frame::from_tangent(Point3::origin(), t)]);
        }
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = Frame::rotate(&Vector3::x(), &Vector3::z(), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(r, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn straight_line_keeps_normal() {
        let points: Vec<_> = (0..5).map(|i| Point3::new(0.0, 0.0, f64::from(i))).collect();
        let frames = DoubleReflection.propagate(&points);
        assert_eq!(frames.len(), 5);
        for f in &frames {
            assert_relative_eq!(f.tangent, Vector3::z(), epsilon = 1e-12);
            assert_relative_eq!(f.normal, frames[0].normal, epsilon = 1e-12);
        }
    }

    #[test]
    fn frames_are_anchored_at_points() {
        let points = helix(8);
        let frames = DoubleReflection.propagate(&points);
        for (f, p) in frames.iter().zip(&points) {
            assert_eq!(f.origin, *p);
        }
    }

    #[test]
    fn helix_frames_are_orthonormal() {
        let points = helix(60);
        assert_orthonormal(&DoubleReflection.propagate(&points));
    }

    #[test]
    fn double_reflection_has_small_steps() {
        // Rotation-minimizing: the normal turns no faster than the tangent
        let points = helix(60);
        let frames = DoubleReflection.propagate(&points);
        for w in frames.windows(2) {
            let dn = (w[1].normal - w[0].normal).norm();
            let dt = (w[1].tangent - w[0].tangent).norm();
            assert!(dn <= dt * 1.05 + 1e-6, "dn {dn} dt {dt}");
        }
    }

    #[test]
    fn planar_curve_normal_stays_out_of_plane() {
        // For a planar curve the RMF binormal or normal stays along the plane normal
        let points: Vec<_> = (0..20)
            .map(|i| {
                let t = f64::from(i) * 0.15;
                Point3::new(t.cos(), t.sin(), 0.0)
            })
            .collect();
        let frames = DoubleReflection.propagate(&points);
        let z0 = frames[0].normal.z.abs().max(frames[0].binormal.z.abs());
        assert_relative_eq!(z0, 1.0, epsilon = 1e-9);
        for f in &frames {
            assert_relative_eq!(f.normal.z.abs().max(f.binormal.z.abs()), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn repeated_points_do_not_break_frames() {
        let points = vec![
            Point3::origin(),
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let frames = DoubleReflection.propagate(&points);
        assert_eq!(frames.len(), 5);
        assert_orthonormal(&frames);
    }

    #[test]
    fn too_few_points() {
        assert!(DoubleReflection.propagate(&[]).is_empty());
        assert!(DoubleReflection.propagate(&[Point3::origin()]).is_empty());
    }

    #[test]
    fn all_coincident_points_fall_back_to_z() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let frames = DoubleReflection.propagate(&[p, p, p]);
        assert_eq!(frames.len(), 3);
        assert_relative_eq!(frames[0].tangent, Vector3::z());
        assert_orthonormal(&frames);
    }
}
