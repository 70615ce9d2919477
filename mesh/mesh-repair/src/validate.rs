//! Mesh validation and health reporting.

use hashbrown::HashSet;
use mesh_types::IndexedMesh;

use crate::adjacency::MeshAdjacency;

/// Result of [`validate_mesh`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Distinct undirected edges.
    pub edge_count: usize,

    /// Faces referencing a missing vertex.
    pub invalid_face_count: usize,
    /// Faces at or below the area threshold, or repeating a vertex.
    pub degenerate_face_count: usize,
    /// Faces with the same vertex set as an earlier face.
    pub duplicate_face_count: usize,
    /// Edges used by one face.
    pub boundary_edge_count: usize,
    /// Edges used by more than two faces.
    pub non_manifold_edge_count: usize,
    /// Two-face edges traversed twice in the same direction.
    pub inconsistent_edge_count: usize,
    /// Vertices no face references.
    pub unreferenced_vertex_count: usize,

    /// No boundary edges.
    pub is_watertight: bool,
    /// No non-manifold edges.
    pub is_manifold: bool,
    /// Neighbouring faces agree on winding.
    pub is_consistently_oriented: bool,
    /// Enclosed volume by the divergence theorem; positive when wound
    /// outward.
    pub signed_volume: f64,
}

impl MeshReport {
    /// Watertight, manifold and consistently oriented with positive
    /// volume.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.face_count > 0
            && self.invalid_face_count == 0
            && self.is_watertight
            && self.is_manifold
            && self.is_consistently_oriented
            && self.signed_volume > 0.0
    }

    /// Whether any problem was counted.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }

    /// Sum of all problem counts.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.invalid_face_count
            + self.degenerate_face_count
            + self.duplicate_face_count
            + self.boundary_edge_count
            + self.non_manifold_edge_count
            + self.inconsistent_edge_count
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Watertight: {}", yes_no(self.is_watertight))?;
        writeln!(f, "  Manifold: {}", yes_no(self.is_manifold))?;
        writeln!(f, "  Oriented: {}", yes_no(self.is_consistently_oriented))?;
        writeln!(f, "  Volume: {:.6}", self.signed_volume)?;

        if self.has_issues() {
            writeln!(f, "  Issues:")?;
            for (label, count) in [
                ("Invalid faces", self.invalid_face_count),
                ("Degenerate faces", self.degenerate_face_count),
                ("Duplicate faces", self.duplicate_face_count),
                ("Boundary edges", self.boundary_edge_count),
                ("Non-manifold edges", self.non_manifold_edge_count),
                ("Inconsistent edges", self.inconsistent_edge_count),
            ] {
                if count > 0 {
                    writeln!(f, "    {label}: {count}")?;
                }
            }
        }
        Ok(())
    }
}

/// Options for [`validate_mesh_with_options`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOptions {
    /// Faces with area at or below this count as degenerate.
    pub degenerate_area_threshold: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            degenerate_area_threshold: 1e-14,
        }
    }
}

/// Validate a mesh with default options.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use mesh_repair::validate_mesh;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let report = validate_mesh(&mesh);
/// assert_eq!(report.boundary_edge_count, 3);
/// assert!(!report.is_closed());
/// ```
#[must_use]
pub fn validate_mesh(mesh: &IndexedMesh) -> MeshReport {
    validate_mesh_with_options(mesh, &ValidationOptions::default())
}

/// Validate a mesh.
#[must_use]
pub fn validate_mesh_with_options(mesh: &IndexedMesh, options: &ValidationOptions) -> MeshReport {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let vertex_count = mesh.vertices.len();

    let mut invalid_face_count = 0;
    let mut degenerate_face_count = adjacency.collapsed_face_count();
    let mut referenced = vec![false; vertex_count];
    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(mesh.faces.len());
    let mut duplicate_face_count = 0;

    for (i, face) in mesh.faces.iter().enumerate() {
        let mut sorted = *face;
        sorted.sort_unstable();
        if !seen.insert(sorted) {
            duplicate_face_count += 1;
        }

        let Some(tri) = mesh.triangle(i) else {
            invalid_face_count += 1;
            continue;
        };
        for &v in face {
            referenced[v as usize] = true;
        }
        let collapsed = face[0] == face[1] || face[1] == face[2] || face[0] == face[2];
        if !collapsed && tri.area() <= options.degenerate_area_threshold {
            degenerate_face_count += 1;
        }
    }

    MeshReport {
        vertex_count,
        face_count: mesh.faces.len(),
        edge_count: adjacency.edge_count(),
        invalid_face_count,
        degenerate_face_count,
        duplicate_face_count,
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        inconsistent_edge_count: adjacency.inconsistent_edge_count(),
        unreferenced_vertex_count: referenced.iter().filter(|&&r| !r).count(),
        is_watertight: adjacency.is_watertight(),
        is_manifold: adjacency.is_manifold(),
        is_consistently_oriented: adjacency.is_consistently_oriented(),
        signed_volume: mesh.signed_volume(),
    }
}
