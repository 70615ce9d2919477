//! End-to-end meshing through the model entry points.

use approx::assert_relative_eq;
use mesh_repair::{validate_mesh, weld_vertices};
use nalgebra::Point3;
use skeleton_mesher::{
    MesherConfig, MesherError, MeshingOutcome, Model, OffsetParameters, Shading, SkeletonMesher,
    SkeletonNode, SurfaceMode, ThicknessLevel,
};
use skeleton_types::{Skeleton, SkeletonCurve, SkeletonSheet};

fn straight_curve() -> SkeletonCurve {
    SkeletonCurve::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)])
}

fn unit_sheet() -> SkeletonSheet {
    SkeletonSheet::from_corners(
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    )
}

fn model_with(id: &str, skeleton: impl Into<Skeleton>) -> Model {
    let mut model = Model::new();
    model.add_node(SkeletonNode::new(id, skeleton));
    assert!(model.set_active(id));
    model
}

fn preview_mesher() -> SkeletonMesher {
    SkeletonMesher::new(MesherConfig::preview())
}

// =============================================================================
// Regular surface
// =============================================================================

#[test]
fn straight_curve_tube() {
    let mut model = model_with("stem", straight_curve());
    let outcome = SkeletonMesher::default()
        .generate_regular_surface(&mut model, &OffsetParameters::new(0.1))
        .expect("generate");
    assert!(matches!(&outcome, MeshingOutcome::Meshed { id, .. } if id == "stem"));

    let output = model.node("stem").and_then(|n| n.output.as_ref()).expect("output");
    assert_eq!(output.filename, "meshes/stem.obj");

    let out = &output.mesh;
    // 30 rings of 20: 28 full rings plus two poles
    assert_eq!(out.vertex_count(), 28 * 20 + 2);
    assert_eq!(out.face_count(), 29 * 40 - 40);
    assert_eq!(out.shading, Shading::Smooth);

    let report = validate_mesh(&out.mesh);
    assert!(report.is_closed(), "{report}");

    assert_relative_eq!(out.bounds.min.x, -0.1, epsilon = 1e-9);
    assert_relative_eq!(out.bounds.max.x, 0.1, epsilon = 1e-9);
    assert!(out.bounds.max.y <= 0.1 + 1e-9 && out.bounds.min.y >= -0.1 - 1e-9);
    assert_relative_eq!(out.bounds.min.z, -0.1, epsilon = 1e-9);
    assert_relative_eq!(out.bounds.max.z, 1.1, epsilon = 1e-9);
}

#[test]
fn flat_curve_tube_has_flat_caps() {
    let mesher = SkeletonMesher::default();
    let params = OffsetParameters::new(0.1).with_flat(true);
    let skeleton = Skeleton::from(straight_curve());
    let (out, _) = mesher
        .mesh_skeleton(&skeleton, &params, SurfaceMode::Regular)
        .expect("tube");

    assert_eq!(out.shading, Shading::Flat);
    assert_relative_eq!(out.bounds.min.z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(out.bounds.max.z, 1.0, epsilon = 1e-9);
    assert!(validate_mesh(&out.mesh).is_closed());
}

#[test]
fn heavy_tube_radius_is_eight_times_base() {
    let mesher = SkeletonMesher::default();
    let params = OffsetParameters::new(0.05).with_thickness(ThicknessLevel::Heavy);
    let (out, _) = mesher
        .mesh_skeleton(&Skeleton::from(straight_curve()), &params, SurfaceMode::Regular)
        .expect("tube");
    assert_relative_eq!(out.bounds.max.x, 0.4, epsilon = 1e-9);
}

#[test]
fn flat_sheet_box_welds_to_eight_vertices() {
    let mut model = model_with("panel", unit_sheet());
    let params = OffsetParameters::new(0.05)
        .with_flat(true)
        .with_thickness(ThicknessLevel::Medium);
    let outcome = SkeletonMesher::default()
        .generate_regular_surface(&mut model, &params)
        .expect("generate");
    assert!(outcome.is_meshed());

    let out = &model.node("panel").and_then(|n| n.output.as_ref()).expect("output").mesh;
    assert_eq!(out.face_count(), 12);
    assert_eq!(out.vertex_count(), 8);
    assert_eq!(out.shading, Shading::Flat);

    // Medium doubles the base thickness in the parametric pipeline
    assert_relative_eq!(out.bounds.min.z, -0.1, epsilon = 1e-12);
    assert_relative_eq!(out.bounds.max.z, 0.1, epsilon = 1e-12);
    assert!(validate_mesh(&out.mesh).is_closed());
}

#[test]
fn round_sheet_goes_through_distance_field() {
    let mesher = preview_mesher();
    let params = OffsetParameters::new(0.08);
    let (out, _) = mesher
        .mesh_skeleton(&Skeleton::from(unit_sheet()), &params, SurfaceMode::Regular)
        .expect("slab");

    assert_eq!(out.shading, Shading::Smooth);
    assert!(out.face_count() > 12);
    assert_relative_eq!(out.bounds.max.z, 0.08, epsilon = 0.04);
    assert_relative_eq!(out.bounds.min.z, -0.08, epsilon = 0.04);
    assert_relative_eq!(out.bounds.max.x, 1.08, epsilon = 0.04);
}

// =============================================================================
// Offset surface
// =============================================================================

#[test]
fn offset_capsule_is_watertight() {
    let curve = SkeletonCurve::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.6, 0.5, 0.8)]);
    let (out, _) = preview_mesher()
        .mesh_skeleton(&Skeleton::from(curve), &OffsetParameters::new(0.15), SurfaceMode::Offset)
        .expect("capsule");

    let report = validate_mesh(&out.mesh);
    assert!(report.is_watertight, "{report}");
    assert!(report.signed_volume > 0.0);
    assert_eq!(out.face_normals.len(), out.face_count());
}

#[test]
fn offset_grows_with_base_offset() {
    let mesher = preview_mesher();
    let skeleton = Skeleton::from(straight_curve());
    let volumes: Vec<f64> = [0.06, 0.1, 0.15, 0.2]
        .iter()
        .map(|&d| {
            let (out, _) = mesher
                .mesh_skeleton(&skeleton, &OffsetParameters::new(d), SurfaceMode::Offset)
                .expect("offset");
            out.bounds.volume()
        })
        .collect();

    for pair in volumes.windows(2) {
        assert!(pair[1] >= pair[0], "{volumes:?}");
    }
}

#[test]
fn offset_scale_levels() {
    let mesher = preview_mesher();
    let skeleton = Skeleton::from(straight_curve());
    let base = OffsetParameters::new(0.1);
    let extent = |level| {
        let (out, _) = mesher
            .mesh_skeleton(&skeleton, &base.clone().with_thickness(level), SurfaceMode::Offset)
            .expect("offset");
        out.bounds.max.z - 1.0
    };

    // Cap reach past the end follows the offset within a cell
    assert_relative_eq!(extent(ThicknessLevel::None), 0.1, epsilon = 0.04);
    assert_relative_eq!(extent(ThicknessLevel::Medium), 0.15, epsilon = 0.04);
    assert_relative_eq!(extent(ThicknessLevel::Heavy), 0.2, epsilon = 0.04);
}

#[test]
fn offset_mode_is_always_smooth() {
    let params = OffsetParameters::new(0.1).with_flat(true);
    let (out, _) = preview_mesher()
        .mesh_skeleton(&Skeleton::from(straight_curve()), &params, SurfaceMode::Offset)
        .expect("offset");
    assert_eq!(out.shading, Shading::Smooth);
}

#[test]
fn assembled_output_is_weld_stable() {
    let mesher = preview_mesher();
    let (out, _) = mesher
        .mesh_skeleton(&Skeleton::from(straight_curve()), &OffsetParameters::new(0.1), SurfaceMode::Offset)
        .expect("offset");
    let mut again = out.mesh.clone();
    assert_eq!(weld_vertices(&mut again, mesher.config().weld_epsilon), 0);
    assert_eq!(again.vertex_count(), out.vertex_count());
}

#[test]
fn retraced_curve_tube_overlaps_itself() {
    // Up and straight back down: both passes sweep the same cylinder
    let curve = SkeletonCurve::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, 0.0),
    ]);
    let (out, _) = SkeletonMesher::default()
        .mesh_skeleton(&Skeleton::from(curve), &OffsetParameters::new(0.1), SurfaceMode::Regular)
        .expect("tube");

    assert!(out.face_count() <= 29 * 40 - 40);
    let report = validate_mesh(&out.mesh);
    assert!(report.duplicate_face_count > 0, "{report}");
    assert!(!report.is_manifold, "{report}");
    assert!(out.bounds.max.z <= 1.0 + 1e-9);
}

// =============================================================================
// No-op paths
// =============================================================================

#[test]
fn no_active_node_is_a_no_op() {
    let mut model = Model::new();
    model.add_node(SkeletonNode::new("idle", straight_curve()));
    let outcome = SkeletonMesher::default()
        .generate_offset_surface(&mut model, &OffsetParameters::default())
        .expect("generate");
    assert!(matches!(outcome, MeshingOutcome::NoActiveNode));
    assert!(model.node("idle").and_then(|n| n.output.as_ref()).is_none());
}

#[test]
fn empty_curve_keeps_previous_output() {
    let mesher = preview_mesher();
    let mut model = model_with("stem", straight_curve());
    let params = OffsetParameters::new(0.1);
    assert!(mesher.generate_regular_surface(&mut model, &params).expect("first").is_meshed());
    let before = model.node("stem").and_then(|n| n.output.as_ref()).map(|o| o.mesh.vertex_count());

    if let Some(node) = model.active_node_mut() {
        node.skeleton = Skeleton::from(SkeletonCurve::new(Vec::new()));
    }
    for mode in [SurfaceMode::Regular, SurfaceMode::Offset] {
        let outcome = mesher.generate(&mut model, &params, mode).expect("no-op");
        assert!(matches!(outcome, MeshingOutcome::Skipped(_)), "{outcome:?}");
    }

    let after = model.node("stem").and_then(|n| n.output.as_ref()).map(|o| o.mesh.vertex_count());
    assert_eq!(before, after);
}

#[test]
fn single_point_curve_is_skipped() {
    let mut model = model_with("dot", SkeletonCurve::new(vec![Point3::new(1.0, 2.0, 3.0)]));
    let outcome = SkeletonMesher::default()
        .generate_regular_surface(&mut model, &OffsetParameters::new(0.1))
        .expect("no-op");
    let MeshingOutcome::Skipped(reason) = outcome else {
        panic!("expected skip, got {outcome:?}");
    };
    assert!(reason.is_insufficient_input());
}

#[test]
fn oversize_grid_is_an_error() {
    let mesher = SkeletonMesher::new(MesherConfig::default().with_max_voxels(1_000));
    let mut model = model_with("stem", straight_curve());
    let err = mesher
        .generate_offset_surface(&mut model, &OffsetParameters::new(0.1))
        .unwrap_err();
    assert!(matches!(err, MesherError::Offset(_)));
    assert!(model.node("stem").and_then(|n| n.output.as_ref()).is_none());
}
