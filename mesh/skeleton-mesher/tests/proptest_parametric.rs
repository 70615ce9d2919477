//! Property-based tests for the parametric pipelines.
//!
//! Run with: cargo test -p skeleton-mesher --test proptest_parametric

use mesh_repair::{validate_mesh, weld_vertices};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use skeleton_mesher::{OffsetParameters, SkeletonMesher, SurfaceMode, ThicknessLevel};
use skeleton_types::{Skeleton, SkeletonCurve, SkeletonSheet};

// =============================================================================
// Strategies
// =============================================================================

/// Polyline climbing in z, so it never doubles back on itself.
fn arb_polyline() -> impl Strategy<Value = Vec<Point3<f64>>> {
    let step = (-1.0..1.0f64, -1.0..1.0f64, 0.3..1.0f64);
    prop::collection::vec(step, 1..6).prop_map(|steps| {
        let mut p = Point3::origin();
        let mut points = vec![p];
        for (dx, dy, dz) in steps {
            p += Vector3::new(dx, dy, dz);
            points.push(p);
        }
        points
    })
}

/// Random walk in any direction, optionally returning to its start.
///
/// Covers curves that fold back, cross themselves or close into loops.
fn arb_wandering_polyline() -> impl Strategy<Value = Vec<Point3<f64>>> {
    let step = prop::array::uniform3(-1.0..1.0f64)
        .prop_map(Vector3::from)
        .prop_filter("step too short", |v| v.norm() > 0.1);
    (prop::collection::vec(step, 1..8), any::<bool>()).prop_map(|(steps, closed)| {
        let mut p = Point3::origin();
        let mut points = vec![p];
        for v in steps {
            p += v;
            points.push(p);
        }
        if closed {
            points.push(Point3::origin());
        }
        points
    })
}

fn arb_level() -> impl Strategy<Value = ThicknessLevel> {
    prop_oneof![
        Just(ThicknessLevel::None),
        Just(ThicknessLevel::Medium),
        Just(ThicknessLevel::Heavy),
    ]
}

/// Near-rectangular parallelogram sheet anywhere in space.
fn arb_sheet() -> impl Strategy<Value = SkeletonSheet> {
    (
        prop::array::uniform3(-5.0..5.0f64),
        0.5..2.0f64,
        0.5..2.0f64,
        prop::array::uniform4(-0.2..0.2f64),
    )
        .prop_map(|([x, y, z], lu, lv, [a, b, c, d])| {
            let origin = Point3::new(x, y, z);
            SkeletonSheet::from_corners(
                origin,
                origin + Vector3::new(lu, a, b),
                origin + Vector3::new(c, lv, d),
            )
        })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tube_is_watertight(
        points in arb_polyline(),
        radius in 0.01..0.1f64,
        square in any::<bool>(),
        flat in any::<bool>(),
    ) {
        let params = OffsetParameters::new(radius)
            .with_square_cross_section(square)
            .with_flat(flat);
        let skeleton = Skeleton::from(SkeletonCurve::new(points));
        let (out, _) = SkeletonMesher::default()
            .mesh_skeleton(&skeleton, &params, SurfaceMode::Regular)
            .expect("tube");

        let report = validate_mesh(&out.mesh);
        prop_assert!(report.is_watertight, "{}", report);
        prop_assert!(report.is_manifold, "{}", report);
        prop_assert!(report.is_consistently_oriented, "{}", report);
    }

    #[test]
    fn tube_weld_is_idempotent(points in arb_polyline(), radius in 0.01..0.1f64) {
        let mesher = SkeletonMesher::default();
        let skeleton = Skeleton::from(SkeletonCurve::new(points));
        let (out, _) = mesher
            .mesh_skeleton(&skeleton, &OffsetParameters::new(radius), SurfaceMode::Regular)
            .expect("tube");

        let mut again = out.mesh.clone();
        prop_assert_eq!(weld_vertices(&mut again, mesher.config().weld_epsilon), 0);
        prop_assert_eq!(again.faces.len(), out.face_count());
    }

    #[test]
    fn any_curve_meshes_within_reach(
        points in arb_wandering_polyline(),
        radius in 0.01..0.1f64,
        square in any::<bool>(),
        flat in any::<bool>(),
    ) {
        let reach = mesh_types::Aabb::from_points(points.iter()).expanded(radius + 1e-9);
        let params = OffsetParameters::new(radius)
            .with_square_cross_section(square)
            .with_flat(flat);
        let mesher = SkeletonMesher::default();
        let skeleton = Skeleton::from(SkeletonCurve::new(points));
        let (out, _) = mesher
            .mesh_skeleton(&skeleton, &params, SurfaceMode::Regular)
            .expect("tube");

        prop_assert!(out.face_count() > 0);
        #[allow(clippy::cast_possible_truncation)]
        let n = out.vertex_count() as u32;
        prop_assert!(out.mesh.faces.iter().flatten().all(|&v| v < n));
        prop_assert!(reach.distance_squared(&out.bounds.min) == 0.0);
        prop_assert!(reach.distance_squared(&out.bounds.max) == 0.0);

        let mut again = out.mesh.clone();
        prop_assert_eq!(weld_vertices(&mut again, mesher.config().weld_epsilon), 0);
    }

    #[test]
    fn flat_sheet_is_a_twelve_triangle_box(
        sheet in arb_sheet(),
        base in 0.01..0.2f64,
        level in arb_level(),
    ) {
        let params = OffsetParameters::new(base).with_flat(true).with_thickness(level);
        let (out, _) = SkeletonMesher::default()
            .mesh_skeleton(&Skeleton::from(sheet), &params, SurfaceMode::Regular)
            .expect("box");

        prop_assert_eq!(out.face_count(), 12);
        prop_assert_eq!(out.vertex_count(), 8);
        prop_assert!(validate_mesh(&out.mesh).is_closed());
    }
}
