//! Offset surfaces of triangle meshes via sampled distance fields.

use mesh_sdf::{ClosestTriangleSampler, DistanceSampler};
use mesh_types::{IndexedMesh, MeshBounds};
use tracing::{debug, warn};

use crate::error::{OffsetError, OffsetResult};
use crate::grid::{ScalarGrid, grid_for_bounds};
use crate::marching_tetrahedra::{IsosurfaceExtractor, MarchingTetrahedra};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for offset surface extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OffsetConfig {
    /// Voxel edge length of the sampling grid.
    pub cell_size: f64,
    /// Padding around the source bounds, in cells.
    pub padding: usize,
    /// Refuse grids with more voxels than this.
    pub max_voxels: Option<usize>,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.015,
            padding: 10,
            max_voxels: None,
        }
    }
}

impl OffsetConfig {
    /// Coarse grid for quick previews.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            cell_size: 0.04,
            padding: 4,
            max_voxels: None,
        }
    }

    /// Set the cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the padding in cells.
    #[must_use]
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Cap the number of voxels a single request may allocate.
    #[must_use]
    pub fn with_max_voxels(mut self, max_voxels: usize) -> Self {
        self.max_voxels = Some(max_voxels);
        self
    }

    /// World-space margin around the source bounds for a given offset.
    ///
    /// At least `padding` cells, widened when the offset itself would
    /// otherwise reach the grid boundary.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn margin_for(&self, distance: f64) -> f64 {
        let padding = self.padding as f64 * self.cell_size;
        padding.max(distance.abs() + 2.0 * self.cell_size)
    }
}

/// Offset surface of `mesh` at signed distance `distance`.
///
/// Uses [`ClosestTriangleSampler`] and [`MarchingTetrahedra`]. Output is a
/// triangle soup in world space, outward-wound.
///
/// # Errors
///
/// See [`offset_mesh_with`].
///
/// # Example
///
/// ```
/// use mesh_offset::{OffsetConfig, offset_mesh};
/// use mesh_types::IndexedMesh;
/// use nalgebra::Point3;
///
/// // A single segment, as a zero-area triangle
/// let mut mesh = IndexedMesh::new();
/// mesh.push_triangle(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(0.0, 0.0, 0.5),
/// );
///
/// let tube = offset_mesh(&mesh, 0.2, &OffsetConfig::preview()).unwrap();
/// assert!(tube.face_count() > 0);
/// ```
pub fn offset_mesh(mesh: &IndexedMesh, distance: f64, config: &OffsetConfig) -> OffsetResult<IndexedMesh> {
    offset_mesh_with(mesh, distance, config, &ClosestTriangleSampler, &MarchingTetrahedra)
}

/// Offset surface with explicit sampler and extractor.
///
/// The grid covers the mesh bounds plus [`OffsetConfig::margin_for`]; the
/// field is sampled to `2·|distance| + cell_size` and the level set at
/// `distance` is extracted and mapped back to world space.
///
/// # Errors
///
/// - [`OffsetError::EmptyMesh`] if `mesh` has no faces
/// - [`OffsetError::InvalidDistance`] / [`OffsetError::InvalidCellSize`]
///   for non-finite or non-positive parameters
/// - [`OffsetError::GridTooLarge`] if the grid exceeds `max_voxels`
/// - [`OffsetError::EmptyIsosurface`] if nothing crosses `distance`
/// - [`OffsetError::Sdf`] if sampling fails
pub fn offset_mesh_with(
    mesh: &IndexedMesh,
    distance: f64,
    config: &OffsetConfig,
    sampler: &dyn DistanceSampler,
    extractor: &dyn IsosurfaceExtractor,
) -> OffsetResult<IndexedMesh> {
    if mesh.faces.is_empty() {
        return Err(OffsetError::EmptyMesh);
    }
    if !distance.is_finite() {
        return Err(OffsetError::InvalidDistance(distance));
    }
    if !(config.cell_size > 0.0 && config.cell_size.is_finite()) {
        return Err(OffsetError::InvalidCellSize(config.cell_size));
    }

    let spec = grid_for_bounds(&mesh.bounds(), config.cell_size, config.margin_for(distance));
    let voxels = spec.validate()?;
    if let Some(limit) = config.max_voxels {
        if voxels > limit {
            warn!(dims = ?spec.dims, voxels, limit, "refusing oversize offset grid");
            return Err(OffsetError::GridTooLarge {
                dims: spec.dims,
                voxels,
                limit,
            });
        }
    }
    debug!(dims = ?spec.dims, voxels, distance, "offset grid");

    let max_distance = 2.0 * distance.abs() + config.cell_size;
    let values = sampler.sample(mesh, &spec, max_distance)?;
    let grid = ScalarGrid::from_samples(spec, values)?;

    let triangles = extractor.extract(&grid, distance);
    if triangles.is_empty() {
        return Err(OffsetError::EmptyIsosurface { iso: distance });
    }

    let mut out = IndexedMesh::with_capacity(triangles.len() * 3, triangles.len());
    for [a, b, c] in &triangles {
        out.push_triangle(grid.voxel_to_world(a), grid.voxel_to_world(b), grid.voxel_to_world(c));
    }
    Ok(out)
}
