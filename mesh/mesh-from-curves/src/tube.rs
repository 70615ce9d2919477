//! Capped tube sweeps along polylines.

use std::f64::consts::{FRAC_PI_2, PI};

use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::{CurveError, CurveResult};
use crate::frame::{Frame, FramePropagator};

/// Shape of the tube's end caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapStyle {
    /// Hemispherical caps reaching one radius past each end.
    #[default]
    Round,
    /// Flat disks in the end cross-section planes.
    Flat,
}

/// Configuration for tube generation.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeConfig {
    /// Radius of the tube.
    pub radius: f64,
    /// Number of points on each cross-section ring.
    pub radial_segments: usize,
    /// End cap shape.
    pub caps: CapStyle,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            radial_segments: 20,
            caps: CapStyle::Round,
        }
    }
}

impl TubeConfig {
    /// Set the radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the number of points per cross-section ring.
    #[must_use]
    pub fn with_radial_segments(mut self, radial_segments: usize) -> Self {
        self.radial_segments = radial_segments;
        self
    }

    /// Set the cap style.
    #[must_use]
    pub fn with_caps(mut self, caps: CapStyle) -> Self {
        self.caps = caps;
        self
    }

    /// Number of latitude rings per cap, the polar ring included.
    ///
    /// Rings are one angular step apart from the equator to the pole, so a
    /// round 20-gon has 5 and a square has 1 (just the pole).
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn cap_rings(&self) -> usize {
        let step = 2.0 * PI / self.radial_segments.max(1) as f64;
        ((FRAC_PI_2 / step) + 1e-9).floor().max(1.0) as usize
    }
}

/// Sweep a closed, capped tube along `points`.
///
/// Frames come from `propagator`. Each sample gets a ring of
/// `radial_segments` points; each end gets [`TubeConfig::cap_rings`]
/// latitude rings that close at a polar ring of coincident points. Adjacent
/// rings are stitched into quads split along the `(i, j)`-`(i+1, j+1)`
/// diagonal, and the two triangles per quad that would collapse onto a
/// pole are omitted.
///
/// The result is a triangle soup wound outward; welding it merges each polar
/// ring into one vertex and yields a closed surface.
///
/// The sweep does not look for self-overlap. A curve that retraces itself
/// sweeps the shared stretch twice, so after welding those faces appear in
/// both windings and their edges are shared by four faces.
///
/// # Errors
///
/// - [`CurveError::TooFewPoints`] for fewer than two points
/// - [`CurveError::InvalidRadius`] for a non-positive or non-finite radius
/// - [`CurveError::TooFewSegments`] for fewer than three radial segments
/// - [`CurveError::DegenerateCurve`] if all points coincide
///
/// # Example
///
/// ```
/// use mesh_from_curves::{DoubleReflection, TubeConfig, capped_tube};
/// use nalgebra::Point3;
///
/// let points: Vec<_> = (0..20)
///     .map(|i| Point3::new(0.0, 0.0, f64::from(i) / 19.0))
///     .collect();
///
/// let config = TubeConfig::default().with_radius(0.1);
/// let soup = capped_tube(&points, &config, &DoubleReflection).unwrap();
///
/// // 30 rings, 29 transitions of 40 triangles, minus 20 at each pole
/// assert_eq!(soup.face_count(), 29 * 40 - 40);
/// ```
pub fn capped_tube(
    points: &[Point3<f64>],
    config: &TubeConfig,
    propagator: &dyn FramePropagator,
) -> CurveResult<IndexedMesh> {
    if points.len() < 2 {
        return Err(CurveError::TooFewPoints {
            min: 2,
            actual: points.len(),
        });
    }
    if !(config.radius > 0.0 && config.radius.is_finite()) {
        return Err(CurveError::InvalidRadius(config.radius));
    }
    if config.radial_segments < 3 {
        return Err(CurveError::TooFewSegments {
            min: 3,
            actual: config.radial_segments,
        });
    }
    let length: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    if length <= f64::EPSILON {
        return Err(CurveError::DegenerateCurve);
    }

    let frames = propagator.propagate(points);
    let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
        return Err(CurveError::TooFewPoints {
            min: 2,
            actual: points.len(),
        });
    };

    let rings = build_rings(&frames, first, last, config);
    let mesh = stitch(&rings);

    debug!(
        samples = points.len(),
        rings = rings.len(),
        radial = config.radial_segments,
        triangles = mesh.face_count(),
        "swept capped tube"
    );
    Ok(mesh)
}

#[allow(clippy::cast_precision_loss)]
fn build_rings(frames: &[Frame], first: &Frame, last: &Frame, config: &TubeConfig) -> Vec<Vec<Point3<f64>>> {
    let radial = config.radial_segments;
    let step = 2.0 * PI / radial as f64;
    let cap_rings = config.cap_rings();
    let mut rings = Vec::with_capacity(frames.len() + 2 * cap_rings);

    // Start cap from the pole toward the equator
    for k in 0..cap_rings {
        let phi = FRAC_PI_2 - k as f64 * step;
        rings.push(cap_ring(first, phi, true, step, radial, config));
    }

    for frame in frames {
        rings.push(
            (0..radial)
                .map(|j| {
                    let v = j as f64 * step;
                    frame.origin
                        + frame.normal * (-config.radius * v.cos())
                        + frame.binormal * (config.radius * v.sin())
                })
                .collect(),
        );
    }

    // End cap from the equator toward the pole
    for k in 1..=cap_rings {
        let phi = (k as f64 * step).min(FRAC_PI_2);
        rings.push(cap_ring(last, phi, false, step, radial, config));
    }

    rings
}

/// One latitude ring at angle `phi` from the end cross-section.
#[allow(clippy::cast_precision_loss)]
fn cap_ring(
    frame: &Frame,
    phi: f64,
    at_start: bool,
    step: f64,
    radial: usize,
    config: &TubeConfig,
) -> Vec<Point3<f64>> {
    let spin_axis = -frame.tangent;
    match config.caps {
        CapStyle::Round => {
            let tilt_axis = if at_start { frame.binormal } else { -frame.binormal };
            let meridian = Frame::rotate(&frame.normal, &tilt_axis, phi);
            (0..radial)
                .map(|j| {
                    let dir = Frame::rotate(&meridian, &spin_axis, j as f64 * step + PI);
                    frame.origin + dir * config.radius
                })
                .collect()
        }
        CapStyle::Flat => {
            let scale = config.radius * phi.cos();
            (0..radial)
                .map(|j| {
                    let dir: Vector3<f64> = Frame::rotate(&frame.normal, &spin_axis, j as f64 * step + PI);
                    frame.origin + dir * scale
                })
                .collect()
        }
    }
}

/// Stitch consecutive rings into triangles, skipping the pole-collapsed
/// half of the first and last transitions.
fn stitch(rings: &[Vec<Point3<f64>>]) -> IndexedMesh {
    let radial = rings.first().map_or(0, Vec::len);
    let transitions = rings.len().saturating_sub(1);
    let mut mesh = IndexedMesh::with_capacity(transitions * radial * 6, transitions * radial * 2);

    for i in 0..transitions {
        let (lower, upper) = (&rings[i], &rings[i + 1]);
        for j in 0..radial {
            let jp = (j + 1) % radial;
            let (a, b, c, d) = (lower[j], upper[j], upper[jp], lower[jp]);
            if i != 0 {
                mesh.push_triangle(a, b, d);
            }
            if i != transitions - 1 {
                mesh.push_triangle(b, c, d);
            }
        }
    }
    mesh
}
