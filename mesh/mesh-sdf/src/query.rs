//! Point/triangle queries used by the samplers.

use nalgebra::Point3;

/// Squared sine of the corner angle below which a triangle is treated as a
/// segment.
const DEGENERATE_SIN_SQ: f64 = 1e-20;

/// Closest point on triangle `(v0, v1, v2)` to `point`.
///
/// Voronoi-region walk from Ericson, *Real-Time Collision Detection* §5.1.5.
/// Collinear or collapsed triangles fall back to the nearest of their three
/// edges, so zero-area ribbons are measured like polylines.
///
/// # Example
///
/// ```
/// use mesh_sdf::closest_point_on_triangle;
/// use nalgebra::Point3;
///
/// let c = closest_point_on_triangle(
///     Point3::new(0.25, 0.25, 3.0),
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// assert!(c.z.abs() < 1e-12);
/// ```
#[must_use]
pub fn closest_point_on_triangle(
    point: Point3<f64>,
    v0: Point3<f64>,
    v1: Point3<f64>,
    v2: Point3<f64>,
) -> Point3<f64> {
    let ab = v1 - v0;
    let ac = v2 - v0;

    if ab.cross(&ac).norm_squared() <= DEGENERATE_SIN_SQ * ab.norm_squared() * ac.norm_squared() {
        return closest_point_on_edges(point, v0, v1, v2);
    }

    let ap = point - v0;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return v0;
    }

    let bp = point - v1;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return v1;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return v0 + ab * (d1 / (d1 - d3));
    }

    let cp = point - v2;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return v2;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return v0 + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return v1 + (v2 - v1) * w;
    }

    // Face interior
    let denom = 1.0 / (va + vb + vc);
    v0 + ab * (vb * denom) + ac * (vc * denom)
}

fn closest_point_on_edges(
    point: Point3<f64>,
    v0: Point3<f64>,
    v1: Point3<f64>,
    v2: Point3<f64>,
) -> Point3<f64> {
    [(v0, v1), (v1, v2), (v2, v0)]
        .into_iter()
        .map(|(a, b)| closest_point_on_segment(point, a, b))
        .min_by(|p, q| {
            (p - point)
                .norm_squared()
                .total_cmp(&(q - point).norm_squared())
        })
        .unwrap_or(v0)
}

/// Closest point on segment `ab` to `point`.
#[must_use]
pub fn closest_point_on_segment(point: Point3<f64>, a: Point3<f64>, b: Point3<f64>) -> Point3<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::MIN_POSITIVE {
        return a;
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Signed solid angle subtended by triangle `(v0, v1, v2)` at `point`.
///
/// Van Oosterom & Strackee (1983). Positive when the triangle winds
/// counter-clockwise as seen from `point`'s far side, i.e. when `point` lies
/// behind the triangle's front face. Returns zero for collapsed triangles.
#[must_use]
pub fn solid_angle(point: Point3<f64>, v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> f64 {
    let a = v0 - point;
    let b = v1 - point;
    let c = v2 - point;

    let ab = v1 - v0;
    let ac = v2 - v0;
    if ab.cross(&ac).norm_squared() <= DEGENERATE_SIN_SQ * ab.norm_squared() * ac.norm_squared() {
        return 0.0;
    }

    let la = a.norm();
    let lb = b.norm();
    let lc = c.norm();

    let numerator = a.dot(&b.cross(&c));
    let denominator = la * lb * lc + a.dot(&b) * lc + a.dot(&c) * lb + b.dot(&c) * la;
    2.0 * numerator.atan2(denominator)
}
