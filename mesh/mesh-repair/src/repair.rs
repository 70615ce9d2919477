//! Welding and cleanup of triangle soups.
//!
//! The geometry builders emit one vertex per triangle corner; these passes
//! turn that soup into an indexed mesh with shared vertices and no
//! zero-area faces.

use hashbrown::HashMap;
use mesh_types::IndexedMesh;
use nalgebra::Point3;
use tracing::debug;

use crate::error::{RepairError, RepairResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerances for [`repair_mesh`].
///
/// All thresholds are in mesh units.
///
/// # Example
///
/// ```
/// use mesh_repair::RepairParams;
///
/// let params = RepairParams::default()
///     .with_weld_epsilon(1e-5)
///     .with_degenerate_area_threshold(1e-12);
/// assert!(params.remove_unreferenced);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepairParams {
    /// Vertices closer than this are merged.
    ///
    /// Default: `1e-6`
    pub weld_epsilon: f64,

    /// Triangles with area at or below this are removed.
    ///
    /// Default: `1e-14`
    pub degenerate_area_threshold: f64,

    /// Compact away vertices no face references.
    ///
    /// Default: `true`
    pub remove_unreferenced: bool,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            weld_epsilon: 1e-6,
            degenerate_area_threshold: 1e-14,
            remove_unreferenced: true,
        }
    }
}

impl RepairParams {
    /// Set the weld tolerance.
    #[must_use]
    pub fn with_weld_epsilon(mut self, epsilon: f64) -> Self {
        self.weld_epsilon = epsilon;
        self
    }

    /// Set the degenerate area threshold.
    #[must_use]
    pub fn with_degenerate_area_threshold(mut self, threshold: f64) -> Self {
        self.degenerate_area_threshold = threshold;
        self
    }

    /// Set whether unreferenced vertices are compacted away.
    #[must_use]
    pub fn with_remove_unreferenced(mut self, remove: bool) -> Self {
        self.remove_unreferenced = remove;
        self
    }

    /// Check that both tolerances are finite and non-negative.
    ///
    /// # Errors
    ///
    /// [`RepairError::InvalidEpsilon`] or [`RepairError::InvalidAreaThreshold`].
    pub fn validate(&self) -> RepairResult<()> {
        if !(self.weld_epsilon >= 0.0 && self.weld_epsilon.is_finite()) {
            return Err(RepairError::InvalidEpsilon(self.weld_epsilon));
        }
        if !(self.degenerate_area_threshold >= 0.0 && self.degenerate_area_threshold.is_finite()) {
            return Err(RepairError::InvalidAreaThreshold(self.degenerate_area_threshold));
        }
        Ok(())
    }
}

/// Counts from one [`repair_mesh`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairSummary {
    /// Vertices before repair.
    pub initial_vertices: usize,
    /// Faces before repair.
    pub initial_faces: usize,
    /// Vertices after repair.
    pub final_vertices: usize,
    /// Faces after repair.
    pub final_faces: usize,
    /// Faces dropped for referencing missing vertices.
    pub invalid_faces_removed: usize,
    /// Vertices merged into another by welding.
    pub vertices_welded: usize,
    /// Faces that lost a corner to welding or fell under the area threshold.
    pub degenerates_removed: usize,
    /// Vertices compacted away.
    pub unreferenced_removed: usize,
}

impl RepairSummary {
    /// Whether any pass changed the mesh.
    #[must_use]
    pub fn had_changes(&self) -> bool {
        self.invalid_faces_removed > 0
            || self.vertices_welded > 0
            || self.degenerates_removed > 0
            || self.unreferenced_removed > 0
    }
}

impl std::fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repair: {} verts ({} welded, {} unreferenced), {} faces ({} degenerate, {} invalid)",
            self.final_vertices,
            self.vertices_welded,
            self.unreferenced_removed,
            self.final_faces,
            self.degenerates_removed,
            self.invalid_faces_removed
        )
    }
}

/// Remove faces that reference a vertex index past the end of the vertex
/// list. Returns how many were removed.
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use mesh_repair::remove_invalid_faces;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([0, 1, 7]);
///
/// assert_eq!(remove_invalid_faces(&mut mesh), 1);
/// assert_eq!(mesh.faces, vec![[0, 1, 2]]);
/// ```
pub fn remove_invalid_faces(mesh: &mut IndexedMesh) -> usize {
    let vertex_count = mesh.vertices.len();
    let before = mesh.faces.len();
    mesh.faces
        .retain(|face| face.iter().all(|&v| (v as usize) < vertex_count));
    before - mesh.faces.len()
}

/// Remove triangles whose area is at or below `area_threshold`, and any
/// triangle that repeats a vertex index.
///
/// Faces with out-of-range indices are removed too. Returns the number of
/// faces removed.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use mesh_repair::remove_degenerate_triangles;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(5.0, 0.0, 0.0)); // collinear
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(remove_degenerate_triangles(&mut mesh, 1e-14), 1);
/// ```
pub fn remove_degenerate_triangles(mesh: &mut IndexedMesh, area_threshold: f64) -> usize {
    let before = mesh.faces.len();
    let vertices = &mesh.vertices;

    mesh.faces.retain(|&[i0, i1, i2]| {
        if i0 == i1 || i1 == i2 || i0 == i2 {
            return false;
        }
        let (Some(v0), Some(v1), Some(v2)) = (
            vertices.get(i0 as usize),
            vertices.get(i1 as usize),
            vertices.get(i2 as usize),
        ) else {
            return false;
        };
        let area = (v1.position - v0.position)
            .cross(&(v2.position - v0.position))
            .norm()
            * 0.5;
        area > area_threshold
    });

    before - mesh.faces.len()
}

/// Merge vertices closer than `epsilon`.
///
/// Vertices are bucketed in a spatial hash of cell size `2·epsilon`, and
/// each not-yet-merged vertex absorbs every later vertex within `epsilon`
/// in its 27-cell neighbourhood. The surviving representatives keep their
/// positions and are pairwise at least `epsilon` apart, so welding again
/// merges nothing. Faces are remapped and faces left with a repeated index
/// are removed; the now-unreferenced vertices stay in place until
/// [`remove_unreferenced_vertices`].
///
/// A non-positive or non-finite `epsilon` merges only exactly coincident
/// vertices.
///
/// Returns the number of vertices merged.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use mesh_repair::weld_vertices;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0 + 1e-8, 0.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([0, 2, 3]);
///
/// assert_eq!(weld_vertices(&mut mesh, 1e-6), 1);
/// assert_eq!(mesh.faces[1], [0, 2, 1]);
/// ```
#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32
pub fn weld_vertices(mesh: &mut IndexedMesh, epsilon: f64) -> usize {
    let remap = if epsilon > 0.0 && epsilon.is_finite() {
        tolerance_remap(mesh, epsilon)
    } else {
        exact_remap(mesh)
    };

    let merged = remap
        .iter()
        .enumerate()
        .filter(|&(i, &target)| target as usize != i)
        .count();

    if merged > 0 {
        let vertex_count = remap.len();
        for face in &mut mesh.faces {
            for v in face.iter_mut() {
                if (*v as usize) < vertex_count {
                    *v = remap[*v as usize];
                }
            }
        }
        debug!(merged, epsilon, "welded vertices");
    }
    // Also catches faces that repeated an index before welding
    mesh.faces
        .retain(|&[i0, i1, i2]| i0 != i1 && i1 != i2 && i0 != i2);

    merged
}

/// Representative index for every vertex, merging within `epsilon`.
#[allow(clippy::cast_possible_truncation)]
fn tolerance_remap(mesh: &IndexedMesh, epsilon: f64) -> Vec<u32> {
    let cell_size = epsilon * 2.0;
    let mut buckets: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        buckets
            .entry(cell_of(&vertex.position, cell_size))
            .or_default()
            .push(idx as u32);
    }

    let mut remap: Vec<u32> = (0..mesh.vertices.len() as u32).collect();
    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        if remap[idx] as usize != idx {
            continue;
        }
        let [cx, cy, cz] = cell_of(&vertex.position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = buckets.get(&[cx + dx, cy + dy, cz + dz]) else {
                        continue;
                    };
                    for &other in candidates {
                        let o = other as usize;
                        if o <= idx || remap[o] as usize != o {
                            continue;
                        }
                        if (vertex.position - mesh.vertices[o].position).norm() < epsilon {
                            remap[o] = idx as u32;
                        }
                    }
                }
            }
        }
    }
    remap
}

/// Representative index for every vertex, merging only bitwise-equal
/// positions.
#[allow(clippy::cast_possible_truncation)]
fn exact_remap(mesh: &IndexedMesh) -> Vec<u32> {
    let mut first: HashMap<[u64; 3], u32> = HashMap::with_capacity(mesh.vertices.len());
    mesh.vertices
        .iter()
        .enumerate()
        .map(|(idx, vertex)| {
            let p = &vertex.position;
            // +0.0 so that 0.0 and -0.0 share a key
            let key = [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()];
            *first.entry(key).or_insert(idx as u32)
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn cell_of(pos: &Point3<f64>, cell_size: f64) -> [i64; 3] {
    [
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    ]
}

/// Remove vertices no face references and compact the vertex list,
/// preserving the relative order of the survivors.
///
/// Returns the number of vertices removed.
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use mesh_repair::remove_unreferenced_vertices;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(100.0, 100.0, 100.0)); // unused
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([1, 2, 3]);
///
/// assert_eq!(remove_unreferenced_vertices(&mut mesh), 1);
/// assert_eq!(mesh.faces[0], [0, 1, 2]);
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) -> usize {
    let before = mesh.vertices.len();
    let mut referenced = vec![false; before];
    for face in &mesh.faces {
        for &v in face {
            if let Some(slot) = referenced.get_mut(v as usize) {
                *slot = true;
            }
        }
    }
    if referenced.iter().all(|&r| r) {
        return 0;
    }

    let mut remap: Vec<Option<u32>> = vec![None; before];
    let mut next = 0u32;
    for (old, &used) in referenced.iter().enumerate() {
        if used {
            remap[old] = Some(next);
            next += 1;
        }
    }

    let mut idx = 0;
    mesh.vertices.retain(|_| {
        let keep = referenced[idx];
        idx += 1;
        keep
    });
    for face in &mut mesh.faces {
        for v in face.iter_mut() {
            if let Some(Some(new)) = remap.get(*v as usize) {
                *v = *new;
            }
        }
    }

    before - mesh.vertices.len()
}

/// Run the cleanup pipeline: drop faces with missing vertices, weld, drop
/// degenerate triangles, compact unreferenced vertices.
///
/// # Errors
///
/// Returns an error if `params` fails [`RepairParams::validate`].
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::{RepairParams, repair_mesh};
/// use nalgebra::Point3;
///
/// // Two triangles of soup sharing an edge
/// let mut mesh = IndexedMesh::new();
/// mesh.push_triangle(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0));
/// mesh.push_triangle(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0), Point3::new(0.0, 1.0, 0.0));
///
/// let summary = repair_mesh(&mut mesh, &RepairParams::default()).unwrap();
/// assert_eq!(summary.vertices_welded, 2);
/// assert_eq!(mesh.vertices.len(), 4);
/// ```
pub fn repair_mesh(mesh: &mut IndexedMesh, params: &RepairParams) -> RepairResult<RepairSummary> {
    params.validate()?;
    let initial_vertices = mesh.vertices.len();
    let initial_faces = mesh.faces.len();

    let invalid_faces_removed = remove_invalid_faces(mesh);
    let faces_before_weld = mesh.faces.len();
    let vertices_welded = weld_vertices(mesh, params.weld_epsilon);
    let collapsed = faces_before_weld - mesh.faces.len();
    let degenerates_removed =
        collapsed + remove_degenerate_triangles(mesh, params.degenerate_area_threshold);
    let unreferenced_removed = if params.remove_unreferenced {
        remove_unreferenced_vertices(mesh)
    } else {
        0
    };

    Ok(RepairSummary {
        initial_vertices,
        initial_faces,
        final_vertices: mesh.vertices.len(),
        final_faces: mesh.faces.len(),
        invalid_faces_removed,
        vertices_welded,
        degenerates_removed,
        unreferenced_removed,
    })
}
