//! 3D scalar grid for storing sampled field values.

use mesh_sdf::GridSpec;
use mesh_types::Aabb;
use nalgebra::{Point3, Vector3};

use crate::error::{OffsetError, OffsetResult};

/// A 3D grid of scalar samples on a regular lattice.
///
/// Values are stored x-fastest (`i + nx·(j + ny·k)`), the same layout the
/// distance samplers produce, so sampled buffers are adopted without copying.
/// Voxel `(i, j, k)` lives at `origin + cell_size·(i, j, k)` in world space.
#[derive(Debug, Clone)]
pub struct ScalarGrid {
    values: Vec<f64>,
    spec: GridSpec,
}

impl ScalarGrid {
    /// Create a grid filled with `fill`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_offset::ScalarGrid;
    /// use mesh_sdf::GridSpec;
    /// use nalgebra::Point3;
    ///
    /// let grid = ScalarGrid::filled(GridSpec::new(Point3::new(-5.0, -5.0, -5.0), 1.0, [10, 10, 10]), 0.0)
    ///     .unwrap();
    /// assert_eq!(grid.dims(), [10, 10, 10]);
    /// assert_eq!(grid.len(), 1000);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the grid description is invalid.
    pub fn filled(spec: GridSpec, fill: f64) -> OffsetResult<Self> {
        let count = spec.validate()?;
        Ok(Self {
            values: vec![fill; count],
            spec,
        })
    }

    /// Adopt a buffer of samples laid out per [`GridSpec::index`].
    ///
    /// # Errors
    ///
    /// Returns [`OffsetError::SampleCountMismatch`] if `values` does not hold
    /// exactly one sample per voxel.
    pub fn from_samples(spec: GridSpec, values: Vec<f64>) -> OffsetResult<Self> {
        let expected = spec.validate()?;
        if values.len() != expected {
            return Err(OffsetError::SampleCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { values, spec })
    }

    /// Fill a grid by evaluating `f` at every voxel's world position.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid description is invalid.
    pub fn from_fn(spec: GridSpec, f: impl Fn(Point3<f64>) -> f64) -> OffsetResult<Self> {
        let mut grid = Self::filled(spec, 0.0)?;
        let [nx, ny, nz] = spec.dims;
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let idx = spec.index(i, j, k);
                    grid.values[idx] = f(spec.position(i, j, k));
                }
            }
        }
        Ok(grid)
    }

    /// The grid placement.
    #[must_use]
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Voxel counts `[nx, ny, nz]`.
    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.spec.dims
    }

    /// World position of voxel `(0, 0, 0)`.
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        self.spec.origin
    }

    /// Voxel edge length.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.spec.dx
    }

    /// Sample at `(i, j, k)`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let [nx, ny, nz] = self.spec.dims;
        (i < nx && j < ny && k < nz).then(|| self.values[self.spec.index(i, j, k)])
    }

    /// All samples in storage order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grid holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Map a voxel-space (possibly fractional) coordinate to world space.
    #[must_use]
    pub fn voxel_to_world(&self, voxel: &Point3<f64>) -> Point3<f64> {
        self.spec.origin + voxel.coords * self.spec.dx
    }
}

/// Grid covering `bounds` plus `margin` on every side.
///
/// Dimensions are the padded extent divided by `cell_size`, rounded up
/// per axis; the origin is the padded minimum corner.
///
/// ```
/// use mesh_offset::grid_for_bounds;
/// use mesh_types::Aabb;
/// use nalgebra::Point3;
///
/// let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
/// let spec = grid_for_bounds(&bounds, 0.5, 1.0);
/// assert_eq!(spec.dims, [6, 4, 4]);
/// assert_eq!(spec.origin, Point3::new(-1.0, -1.0, -1.0));
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn grid_for_bounds(bounds: &Aabb, cell_size: f64, margin: f64) -> GridSpec {
    let padded = bounds.expanded(margin);
    let extent: Vector3<f64> = padded.size();
    let cells = |len: f64| (len / cell_size).ceil().max(0.0) as usize;
    GridSpec::new(
        padded.min,
        cell_size,
        [cells(extent.x), cells(extent.y), cells(extent.z)],
    )
}
