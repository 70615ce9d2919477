//! Error types for skeleton meshing.

use mesh_from_curves::CurveError;
use mesh_offset::OffsetError;
use mesh_repair::RepairError;
use thiserror::Error;

/// Result type for meshing operations.
pub type MesherResult<T> = Result<T, MesherError>;

/// Errors that can occur while meshing a skeleton.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MesherError {
    /// The proxy geometry for the implicit pipeline has no triangles.
    #[error("{kind} produced no proxy geometry")]
    EmptyProxy {
        /// Skeleton kind, `"curve"` or `"sheet"`.
        kind: &'static str,
    },

    /// Offset or thickness is not a usable number.
    #[error("invalid offset: {0}")]
    InvalidOffset(f64),

    /// Nothing survived welding and degenerate removal.
    #[error("assembled mesh is empty")]
    EmptyMesh,

    /// Distance field or isosurface stage failed.
    #[error("offset surface failed: {0}")]
    Offset(#[from] OffsetError),

    /// Tube sweep failed.
    #[error("tube sweep failed: {0}")]
    Curve(#[from] CurveError),

    /// Cleanup parameters were rejected.
    #[error("mesh repair failed: {0}")]
    Repair(#[from] RepairError),
}

impl MesherError {
    /// Whether the error means the skeleton did not carry enough geometry
    /// to mesh, as opposed to a configuration or resource problem.
    ///
    /// Callers treat these as an idle no-op and keep any previous mesh.
    #[must_use]
    pub fn is_insufficient_input(&self) -> bool {
        match self {
            Self::EmptyProxy { .. } | Self::InvalidOffset(_) | Self::EmptyMesh => true,
            Self::Offset(e) => matches!(
                e,
                OffsetError::EmptyMesh
                    | OffsetError::InvalidDistance(_)
                    | OffsetError::EmptyIsosurface { .. }
            ),
            Self::Curve(e) => matches!(
                e,
                CurveError::TooFewPoints { .. }
                    | CurveError::DegenerateCurve
                    | CurveError::InvalidRadius(_)
            ),
            Self::Repair(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_input_family() {
        assert!(MesherError::EmptyProxy { kind: "curve" }.is_insufficient_input());
        assert!(MesherError::from(CurveError::DegenerateCurve).is_insufficient_input());
        assert!(MesherError::from(OffsetError::EmptyIsosurface { iso: 0.1 }).is_insufficient_input());
        assert!(!MesherError::from(OffsetError::InvalidCellSize(0.0)).is_insufficient_input());
        assert!(
            !MesherError::from(OffsetError::GridTooLarge {
                dims: [10, 10, 10],
                voxels: 1000,
                limit: 10
            })
            .is_insufficient_input()
        );
        assert!(!MesherError::from(RepairError::InvalidEpsilon(-1.0)).is_insufficient_input());
    }

    #[test]
    fn messages_name_the_stage() {
        let err = MesherError::from(CurveError::DegenerateCurve);
        assert_eq!(err.to_string(), "tube sweep failed: curve has zero length");
        assert_eq!(
            MesherError::EmptyProxy { kind: "sheet" }.to_string(),
            "sheet produced no proxy geometry"
        );
    }
}
