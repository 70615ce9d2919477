//! Proxy triangle soups that seed the distance field.

use mesh_types::{Aabb, IndexedMesh};
use nalgebra::Point3;
use skeleton_types::{Skeleton, SkeletonCurve, SkeletonSheet};
use tracing::debug;

use crate::config::MesherConfig;

/// Triangle soup standing in for a skeleton, with its running bounds.
///
/// Only used as a distance source; it is dropped once sampled.
#[derive(Debug, Clone, Default)]
pub struct ProxyMesh {
    /// One vertex per triangle corner.
    pub mesh: IndexedMesh,
    /// Bounds of every emitted vertex; empty when nothing was emitted.
    pub bounds: Aabb,
}

impl ProxyMesh {
    fn push(&mut self, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) {
        for p in [&a, &b, &c] {
            self.bounds.expand_to_include(p);
        }
        self.mesh.push_triangle(a, b, c);
    }

    /// Whether no triangle was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mesh.faces.is_empty()
    }
}

/// Proxy for either skeleton kind.
#[must_use]
pub fn build_proxy(skeleton: &Skeleton, config: &MesherConfig) -> ProxyMesh {
    let proxy = match skeleton {
        Skeleton::Curve(curve) => curve_proxy(curve, config.curve_resample_factor),
        Skeleton::Sheet(sheet) => sheet_proxy(sheet, config.sheet_resolution_factor),
    };
    debug!(
        kind = skeleton.kind(),
        triangles = proxy.mesh.face_count(),
        "built proxy"
    );
    proxy
}

/// Zero-area ribbon along a resampled curve.
///
/// The control polyline is resampled uniformly by arc length to
/// `resample_factor` times its control-point count. Each consecutive pair
/// of samples becomes one triangle `(p0, p1, midpoint)`: no area, but its
/// distance field is that of the segment, so the offset is a tube.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use skeleton_mesher::curve_proxy;
/// use skeleton_types::SkeletonCurve;
///
/// let curve = SkeletonCurve::new(vec![Point3::origin(), Point3::new(0.0, 0.0, 1.0)]);
/// let proxy = curve_proxy(&curve, 5);
///
/// // 10 samples, 9 segments
/// assert_eq!(proxy.mesh.face_count(), 9);
/// assert!((proxy.bounds.max.z - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn curve_proxy(curve: &SkeletonCurve, resample_factor: usize) -> ProxyMesh {
    let samples = curve.resample(curve.len() * resample_factor);
    let mut proxy = ProxyMesh::default();
    for pair in samples.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        proxy.push(p0, p1, nalgebra::center(&p0, &p1));
    }
    proxy
}

/// Two triangles per quad of the sheet's tessellation.
///
/// The tessellation is generated on first use at a step of
/// `resolution_factor` times the sheet's diagonal extent and then reused.
/// Quads are split along their `p0-p2` diagonal.
#[must_use]
pub fn sheet_proxy(sheet: &SkeletonSheet, resolution_factor: f64) -> ProxyMesh {
    let resolution = sheet.diagonal_extent() * resolution_factor;
    let mut proxy = ProxyMesh::default();
    for quad in sheet.quads_or_generate(resolution) {
        for [a, b, c] in quad.triangles() {
            proxy.push(a, b, c);
        }
    }
    proxy
}
