//! Property-based tests for welding and validation.
//!
//! Run with: cargo test -p mesh-repair --test proptest_mesh

use mesh_repair::{
    RepairParams, remove_unreferenced_vertices, repair_mesh, validate_mesh, weld_vertices,
};
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-10.0..10.0f64)
}

/// Random mesh whose face indices are always in range.
fn arb_mesh(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = IndexedMesh> {
    (3..=max_vertices).prop_flat_map(move |n| {
        let vertices = prop::collection::vec(arb_position(), n);
        #[allow(clippy::cast_possible_truncation)]
        let faces = prop::collection::vec(prop::array::uniform3(0..n as u32), 1..=max_faces);
        (vertices, faces).prop_map(|(positions, faces)| IndexedMesh {
            vertices: positions
                .into_iter()
                .map(|[x, y, z]| Vertex::from_coords(x, y, z))
                .collect(),
            faces,
        })
    })
}

/// Closed octahedron, outward wound.
fn octahedron(scale: f64, center: Vector3<f64>) -> IndexedMesh {
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z) * scale + center;
    let (px, nx, py, ny, pz, nz) = (
        p(1.0, 0.0, 0.0),
        p(-1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
        p(0.0, -1.0, 0.0),
        p(0.0, 0.0, 1.0),
        p(0.0, 0.0, -1.0),
    );
    let mut mesh = IndexedMesh::new();
    for (a, b) in [(px, py), (py, nx), (nx, ny), (ny, px)] {
        mesh.push_triangle(a, b, pz);
        mesh.push_triangle(b, a, nz);
    }
    mesh
}

// =============================================================================
// Welding
// =============================================================================

proptest! {
    #[test]
    fn weld_is_idempotent(mesh in arb_mesh(40, 60), epsilon in 1e-6..2.0f64) {
        let mut welded = mesh;
        weld_vertices(&mut welded, epsilon);
        remove_unreferenced_vertices(&mut welded);
        let count = welded.vertices.len();

        prop_assert_eq!(weld_vertices(&mut welded, epsilon), 0);
        prop_assert_eq!(welded.vertices.len(), count);
    }

    #[test]
    fn weld_keeps_indices_valid(mesh in arb_mesh(40, 60), epsilon in 1e-6..2.0f64) {
        let mut welded = mesh;
        weld_vertices(&mut welded, epsilon);
        remove_unreferenced_vertices(&mut welded);

        #[allow(clippy::cast_possible_truncation)]
        let n = welded.vertices.len() as u32;
        for face in &welded.faces {
            prop_assert!(face.iter().all(|&v| v < n));
            prop_assert!(face[0] != face[1] && face[1] != face[2] && face[0] != face[2]);
        }
    }

    #[test]
    fn weld_never_adds_vertices_or_faces(mesh in arb_mesh(40, 60)) {
        let (vertices, faces) = (mesh.vertices.len(), mesh.faces.len());
        let mut welded = mesh;
        weld_vertices(&mut welded, 0.5);
        prop_assert!(welded.vertices.len() <= vertices);
        prop_assert!(welded.faces.len() <= faces);
    }

    #[test]
    fn validation_never_panics(mesh in arb_mesh(30, 60)) {
        let report = validate_mesh(&mesh);
        prop_assert_eq!(report.face_count, mesh.faces.len());
    }

    /// A closed surface broken into soup welds back into a closed surface.
    #[test]
    fn soup_of_closed_surface_welds_closed(
        scale in 0.01..100.0f64,
        center in arb_position(),
    ) {
        let mut mesh = octahedron(scale, Vector3::from(center));
        prop_assert_eq!(mesh.vertices.len(), 24);

        let summary = repair_mesh(&mut mesh, &RepairParams::default()).expect("valid params");
        prop_assert_eq!(summary.final_vertices, 6);
        prop_assert_eq!(summary.final_faces, 8);
        prop_assert!(validate_mesh(&mesh).is_closed());
    }
}
