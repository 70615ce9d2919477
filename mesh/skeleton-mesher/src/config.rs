//! Meshing parameters and tunables.

use mesh_offset::OffsetConfig;
use mesh_repair::RepairParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which of the two generation entry points is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurfaceMode {
    /// Distance-field offset of any skeleton.
    Offset,
    /// Tube sweep for curves, box or offset for sheets.
    Regular,
}

/// Thickness multiplier chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ThicknessLevel {
    /// No scaling.
    #[default]
    None,
    /// Medium thickening.
    Medium,
    /// Heavy thickening.
    Heavy,
}

impl ThicknessLevel {
    /// Level from its UI index `0..=2`.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::None),
            1 => Some(Self::Medium),
            2 => Some(Self::Heavy),
            _ => None,
        }
    }

    /// Multiplier applied to the base offset in `mode`.
    ///
    /// ```
    /// use skeleton_mesher::{SurfaceMode, ThicknessLevel};
    ///
    /// assert_eq!(ThicknessLevel::Medium.factor(SurfaceMode::Offset), 1.5);
    /// assert_eq!(ThicknessLevel::Heavy.factor(SurfaceMode::Regular), 8.0);
    /// ```
    #[must_use]
    pub const fn factor(self, mode: SurfaceMode) -> f64 {
        match (mode, self) {
            (_, Self::None) => 1.0,
            (SurfaceMode::Offset, Self::Medium) => 1.5,
            (SurfaceMode::Offset, Self::Heavy) => 2.0,
            (SurfaceMode::Regular, Self::Medium) => 2.0,
            (SurfaceMode::Regular, Self::Heavy) => 8.0,
        }
    }
}

/// Thickness and style flags for one meshing request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OffsetParameters {
    /// Unscaled thickness: iso value, tube radius or box half-thickness.
    pub base_offset: f64,
    /// Multiplier level.
    pub thickness: ThicknessLevel,
    /// Flat shading, flat tube caps and the box path for sheets.
    pub is_flat: bool,
    /// Four-sided tube cross-section instead of a round one.
    pub is_square_cross_section: bool,
}

impl Default for OffsetParameters {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl OffsetParameters {
    /// Parameters with the given base offset and no style flags.
    #[must_use]
    pub const fn new(base_offset: f64) -> Self {
        Self {
            base_offset,
            thickness: ThicknessLevel::None,
            is_flat: false,
            is_square_cross_section: false,
        }
    }

    /// Set the thickness level.
    #[must_use]
    pub const fn with_thickness(mut self, thickness: ThicknessLevel) -> Self {
        self.thickness = thickness;
        self
    }

    /// Set the flat flag.
    #[must_use]
    pub const fn with_flat(mut self, is_flat: bool) -> Self {
        self.is_flat = is_flat;
        self
    }

    /// Set the square cross-section flag.
    #[must_use]
    pub const fn with_square_cross_section(mut self, square: bool) -> Self {
        self.is_square_cross_section = square;
        self
    }

    /// Base offset scaled for the pipeline of `mode`.
    #[must_use]
    pub fn effective_offset(&self, mode: SurfaceMode) -> f64 {
        self.base_offset * self.thickness.factor(mode)
    }
}

/// Sampling of the parametric tube sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TubeSampling {
    /// Arc-length-uniform samples along the curve, endpoints included.
    pub longitudinal_samples: usize,
    /// Ring size for round cross-sections.
    pub round_segments: usize,
    /// Ring size for square cross-sections.
    pub square_segments: usize,
}

impl Default for TubeSampling {
    fn default() -> Self {
        Self {
            longitudinal_samples: 20,
            round_segments: 20,
            square_segments: 4,
        }
    }
}

impl TubeSampling {
    /// Ring size for the requested cross-section.
    #[must_use]
    pub const fn radial_segments(&self, square: bool) -> usize {
        if square {
            self.square_segments
        } else {
            self.round_segments
        }
    }
}

/// Tunables shared by every meshing request.
///
/// # Example
///
/// ```
/// use skeleton_mesher::MesherConfig;
///
/// let config = MesherConfig::default()
///     .with_cell_size(0.03)
///     .with_max_voxels(8_000_000);
/// assert_eq!(config.padding, 10);
/// assert_eq!(config.offset_config().max_voxels, Some(8_000_000));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MesherConfig {
    /// Voxel edge length of the distance grid.
    pub cell_size: f64,
    /// Grid padding around the proxy bounds, in cells.
    pub padding: usize,
    /// Curve proxies resample to this many times the control-point count.
    pub curve_resample_factor: usize,
    /// Sheet tessellation step as a fraction of the sheet's diagonal.
    pub sheet_resolution_factor: f64,
    /// Weld tolerance of the assembler.
    pub weld_epsilon: f64,
    /// Triangles at or below this area are dropped by the assembler.
    pub degenerate_area_threshold: f64,
    /// Refuse distance grids with more voxels than this.
    pub max_voxels: Option<usize>,
    /// Tube sweep sampling.
    pub tube: TubeSampling,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.015,
            padding: 10,
            curve_resample_factor: 5,
            sheet_resolution_factor: 0.1,
            weld_epsilon: 1e-6,
            degenerate_area_threshold: 1e-14,
            max_voxels: None,
            tube: TubeSampling::default(),
        }
    }
}

impl MesherConfig {
    /// Coarse grid for quick previews and tests; the grid matches
    /// [`OffsetConfig::preview`].
    #[must_use]
    pub fn preview() -> Self {
        let grid = OffsetConfig::preview();
        Self {
            cell_size: grid.cell_size,
            padding: grid.padding,
            ..Self::default()
        }
    }

    /// Set the voxel size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the grid padding in cells.
    #[must_use]
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Set the weld tolerance.
    #[must_use]
    pub fn with_weld_epsilon(mut self, epsilon: f64) -> Self {
        self.weld_epsilon = epsilon;
        self
    }

    /// Cap the distance grid size.
    #[must_use]
    pub fn with_max_voxels(mut self, max_voxels: usize) -> Self {
        self.max_voxels = Some(max_voxels);
        self
    }

    /// Set the tube sampling.
    #[must_use]
    pub fn with_tube(mut self, tube: TubeSampling) -> Self {
        self.tube = tube;
        self
    }

    /// Grid settings for the offset stage.
    #[must_use]
    pub fn offset_config(&self) -> OffsetConfig {
        let config = OffsetConfig::default()
            .with_cell_size(self.cell_size)
            .with_padding(self.padding);
        match self.max_voxels {
            Some(limit) => config.with_max_voxels(limit),
            None => config,
        }
    }

    /// Tolerances for the assembler.
    #[must_use]
    pub fn repair_params(&self) -> RepairParams {
        RepairParams::default()
            .with_weld_epsilon(self.weld_epsilon)
            .with_degenerate_area_threshold(self.degenerate_area_threshold)
    }
}
