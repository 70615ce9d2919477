//! Edge-to-face incidence.

use hashbrown::HashMap;

/// Edge incidence of an indexed triangle list.
///
/// Stores, for each undirected edge, the faces using it and how many of
/// them traverse it in the `min → max` direction. A consistently oriented
/// closed surface uses every edge exactly twice, once in each direction.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Keyed by `(min, max)` vertex index.
    edges: HashMap<(u32, u32), EdgeUse>,
    /// Faces skipped for repeating a vertex index.
    collapsed_faces: usize,
}

#[derive(Debug, Clone, Default)]
struct EdgeUse {
    faces: Vec<usize>,
    forward: usize,
}

impl MeshAdjacency {
    /// Build incidence from a list of faces.
    ///
    /// Faces that repeat a vertex index have no well-defined edges and are
    /// counted in [`collapsed_face_count`](Self::collapsed_face_count)
    /// instead.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_repair::MeshAdjacency;
    ///
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    /// let adj = MeshAdjacency::build(&faces);
    ///
    /// assert_eq!(adj.edge_count(), 5);
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// assert!(adj.is_consistently_oriented());
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut adjacency = Self {
            edges: HashMap::with_capacity(faces.len() * 3 / 2),
            collapsed_faces: 0,
        };

        for (face_idx, &[a, b, c]) in faces.iter().enumerate() {
            if a == b || b == c || a == c {
                adjacency.collapsed_faces += 1;
                continue;
            }
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let entry = adjacency
                    .edges
                    .entry((from.min(to), from.max(to)))
                    .or_default();
                entry.faces.push(face_idx);
                if from < to {
                    entry.forward += 1;
                }
            }
        }
        adjacency
    }

    /// Faces using the edge `v0-v1` in either direction.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edges
            .get(&(v0.min(v1), v0.max(v1)))
            .map(|e| e.faces.as_slice())
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges
            .iter()
            .filter(|(_, e)| e.faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Number of edges used by exactly one face.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edges.values().filter(|e| e.faces.len() == 1).count()
    }

    /// Number of edges used by more than two faces.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edges.values().filter(|e| e.faces.len() > 2).count()
    }

    /// Number of two-face edges whose faces traverse them in the same
    /// direction.
    #[must_use]
    pub fn inconsistent_edge_count(&self) -> usize {
        self.edges
            .values()
            .filter(|e| e.faces.len() == 2 && e.forward != 1)
            .count()
    }

    /// Faces skipped while building for repeating a vertex.
    #[must_use]
    pub fn collapsed_face_count(&self) -> usize {
        self.collapsed_faces
    }

    /// Every edge has at most two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count() == 0
    }

    /// Every edge has at least two faces.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count() == 0
    }

    /// Every two-face edge is traversed once in each direction.
    #[must_use]
    pub fn is_consistently_oriented(&self) -> bool {
        self.inconsistent_edge_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed tetrahedron, outward wound.
    fn tetrahedron() -> Vec<[u32; 3]> {
        vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]
    }

    #[test]
    fn single_triangle_is_all_boundary() {
        let adj = MeshAdjacency::build(&[[0, 1, 2]]);
        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.boundary_edge_count(), 3);
        assert!(!adj.is_watertight());
        assert!(adj.is_manifold());
    }

    #[test]
    fn tetrahedron_is_closed() {
        let adj = MeshAdjacency::build(&tetrahedron());
        assert_eq!(adj.edge_count(), 6);
        assert!(adj.is_watertight());
        assert!(adj.is_manifold());
        assert!(adj.is_consistently_oriented());
    }

    #[test]
    fn flipped_face_is_inconsistent() {
        let mut faces = tetrahedron();
        faces[0] = [0, 1, 2];
        let adj = MeshAdjacency::build(&faces);
        assert!(adj.is_watertight());
        assert_eq!(adj.inconsistent_edge_count(), 3);
    }

    #[test]
    fn fin_is_non_manifold() {
        let adj = MeshAdjacency::build(&[[0, 1, 2], [0, 1, 3], [1, 0, 4]]);
        assert_eq!(adj.non_manifold_edge_count(), 1);
        assert!(!adj.is_manifold());
    }

    #[test]
    fn edge_lookup_ignores_direction() {
        let adj = MeshAdjacency::build(&[[0, 1, 2], [1, 3, 2]]);
        assert_eq!(adj.faces_for_edge(2, 1), Some(&[0, 1][..]));
        assert_eq!(adj.faces_for_edge(0, 1), Some(&[0][..]));
        assert!(adj.faces_for_edge(0, 3).is_none());
        assert_eq!(adj.boundary_edges().count(), 4);
    }

    #[test]
    fn collapsed_faces_are_skipped() {
        let adj = MeshAdjacency::build(&[[0, 0, 1], [0, 1, 2]]);
        assert_eq!(adj.collapsed_face_count(), 1);
        assert_eq!(adj.edge_count(), 3);
    }
}
