//! Face and vertex normals.

use mesh_types::IndexedMesh;
use nalgebra::Vector3;

/// Unit normal per face from its winding, zero for degenerate faces and
/// faces with out-of-range indices.
#[must_use]
pub fn face_normals(mesh: &IndexedMesh) -> Vec<Vector3<f64>> {
    (0..mesh.faces.len())
        .map(|i| {
            mesh.triangle(i)
                .and_then(|t| t.normal())
                .unwrap_or_else(Vector3::zeros)
        })
        .collect()
}

/// Area-weighted average of the incident face normals at each vertex.
///
/// Each face contributes its unnormalized cross product, whose length is
/// twice its area. Vertices with no incident area get a zero vector.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
/// use mesh_repair::vertex_normals;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let normals = vertex_normals(&mesh);
/// assert!((normals[0].z - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn vertex_normals(mesh: &IndexedMesh) -> Vec<Vector3<f64>> {
    let mut normals = vec![Vector3::zeros(); mesh.vertices.len()];

    for (i, face) in mesh.faces.iter().enumerate() {
        let Some(tri) = mesh.triangle(i) else {
            continue;
        };
        let weighted = tri.normal_unnormalized();
        for &v in face {
            normals[v as usize] += weighted;
        }
    }

    for n in &mut normals {
        let len = n.norm();
        if len > f64::EPSILON {
            *n /= len;
        } else {
            *n = Vector3::zeros();
        }
    }
    normals
}

/// Store [`vertex_normals`] on the mesh's vertices.
///
/// Vertices without incident area get `None`.
pub fn compute_vertex_normals(mesh: &mut IndexedMesh) {
    let normals = vertex_normals(mesh);
    for (vertex, n) in mesh.vertices.iter_mut().zip(normals) {
        vertex.normal = (n != Vector3::zeros()).then_some(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::Vertex;

    /// Closed unit cube, outward wound.
    fn cube() -> IndexedMesh {
        let mut mesh = IndexedMesh::with_capacity(8, 12);
        for i in 0..8u32 {
            mesh.vertices.push(Vertex::from_coords(
                f64::from(i & 1),
                f64::from((i >> 1) & 1),
                f64::from((i >> 2) & 1),
            ));
        }
        mesh.faces.extend_from_slice(&[
            [0, 2, 3],
            [0, 3, 1],
            [4, 5, 7],
            [4, 7, 6],
            [0, 1, 5],
            [0, 5, 4],
            [2, 6, 7],
            [2, 7, 3],
            [0, 4, 6],
            [0, 6, 2],
            [1, 3, 7],
            [1, 7, 5],
        ]);
        mesh
    }

    #[test]
    fn cube_face_normals_are_axis_aligned() {
        let normals = face_normals(&cube());
        assert_relative_eq!(normals[0], -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(normals[2], Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(normals[10], Vector3::x(), epsilon = 1e-12);
        for n in &normals {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn cube_corner_normals_point_outward() {
        let mesh = cube();
        let center = Vector3::new(0.5, 0.5, 0.5);
        for (v, n) in mesh.vertices.iter().zip(vertex_normals(&mesh)) {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert!(n.dot(&(v.position.coords - center)) > 0.0);
        }
    }

    #[test]
    fn degenerate_and_isolated_get_zero() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(2.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));
        mesh.faces.push([0, 1, 2]);

        assert_eq!(face_normals(&mesh), vec![Vector3::zeros()]);
        compute_vertex_normals(&mut mesh);
        assert!(mesh.vertices.iter().all(|v| v.normal.is_none()));
    }

    #[test]
    fn compute_stores_normals() {
        let mut mesh = cube();
        compute_vertex_normals(&mut mesh);
        assert!(mesh.vertices.iter().all(|v| v.normal.is_some()));
    }
}
