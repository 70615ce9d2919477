//! Final cleanup shared by every pipeline.

use mesh_repair::{RepairSummary, compute_vertex_normals, face_normals, repair_mesh};
use mesh_types::{Aabb, IndexedMesh, MeshBounds};
use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::config::MesherConfig;
use crate::error::{MesherError, MesherResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a renderer should shade the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shading {
    /// Interpolate vertex normals.
    #[default]
    Smooth,
    /// One normal per face.
    Flat,
}

/// A finished, welded surface.
#[derive(Debug, Clone)]
pub struct OutputMesh {
    /// Welded vertices with normals, and their faces.
    pub mesh: IndexedMesh,
    /// Unit normal per face, parallel to `mesh.faces`.
    pub face_normals: Vec<Vector3<f64>>,
    /// Bounds of the welded vertices.
    pub bounds: Aabb,
    /// Shading tag for the renderer.
    pub shading: Shading,
}

impl OutputMesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }
}

/// What the assembler changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Soup vertices in.
    pub input_vertices: usize,
    /// Soup faces in.
    pub input_faces: usize,
    /// Faces dropped for out-of-range vertex indices.
    pub skipped_faces: usize,
    /// Vertices merged by welding.
    pub vertices_welded: usize,
    /// Faces dropped as collapsed or zero-area.
    pub degenerates_removed: usize,
}

impl From<&RepairSummary> for AssemblyReport {
    fn from(summary: &RepairSummary) -> Self {
        Self {
            input_vertices: summary.initial_vertices,
            input_faces: summary.initial_faces,
            skipped_faces: summary.invalid_faces_removed,
            vertices_welded: summary.vertices_welded,
            degenerates_removed: summary.degenerates_removed,
        }
    }
}

/// Weld a triangle soup into an [`OutputMesh`].
///
/// Faces with out-of-range indices are skipped, vertices within
/// [`MesherConfig::weld_epsilon`] are merged, collapsed and zero-area faces
/// are dropped and unused vertices are compacted. Face and area-weighted
/// vertex normals and the bounds are then computed on what remains.
///
/// # Errors
///
/// - [`MesherError::Repair`] for an unusable weld tolerance or threshold
/// - [`MesherError::EmptyMesh`] if no face survives
pub fn assemble(
    mut soup: IndexedMesh,
    config: &MesherConfig,
    shading: Shading,
) -> MesherResult<(OutputMesh, AssemblyReport)> {
    let summary = repair_mesh(&mut soup, &config.repair_params())?;
    let report = AssemblyReport::from(&summary);
    if report.skipped_faces > 0 {
        warn!(
            skipped = report.skipped_faces,
            "skipped faces with out-of-range vertex indices"
        );
    }
    if soup.faces.is_empty() {
        return Err(MesherError::EmptyMesh);
    }
    debug!(
        vertices = soup.vertex_count(),
        faces = soup.face_count(),
        welded = report.vertices_welded,
        "assembled mesh"
    );

    compute_vertex_normals(&mut soup);
    let face_normals = face_normals(&soup);
    let bounds = soup.bounds();
    Ok((
        OutputMesh {
            mesh: soup,
            face_normals,
            bounds,
            shading,
        },
        report,
    ))
}
