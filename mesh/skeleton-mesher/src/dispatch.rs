//! Pipeline selection and the two generation entry points.

use mesh_from_curves::{CapStyle, DoubleReflection, FramePropagator, TubeConfig, capped_tube};
use mesh_offset::{IsosurfaceExtractor, MarchingTetrahedra};
use mesh_sdf::{ClosestTriangleSampler, DistanceSampler};
use mesh_types::IndexedMesh;
use skeleton_types::{Skeleton, SkeletonCurve, SkeletonSheet};
use tracing::{debug, info};

use crate::assemble::{AssemblyReport, OutputMesh, Shading, assemble};
use crate::box_builder::oriented_box;
use crate::config::{MesherConfig, OffsetParameters, SurfaceMode};
use crate::error::{MesherError, MesherResult};
use crate::implicit::offset_surface;
use crate::model::{MeshOutput, Model, export_filename};

/// The pipeline chosen for one request, with its scaled thickness.
#[derive(Debug, Clone, Copy)]
pub enum Pipeline<'a> {
    /// Distance field of the skeleton's proxy, extracted at `offset`.
    Implicit {
        /// Skeleton to thicken.
        skeleton: &'a Skeleton,
        /// Iso value.
        offset: f64,
    },
    /// Frame sweep along a curve.
    Tube {
        /// Curve to sweep.
        curve: &'a SkeletonCurve,
        /// Cross-section radius.
        radius: f64,
        /// Four-sided cross-section.
        square: bool,
        /// End cap shape.
        caps: CapStyle,
    },
    /// Oriented box around a flat sheet.
    Box {
        /// Sheet to enclose.
        sheet: &'a SkeletonSheet,
        /// Offset of each box corner along the sheet frame.
        thickness: f64,
    },
}

/// Choose the pipeline for `skeleton` under `mode`.
///
/// Offset mode always thickens implicitly. Regular mode sweeps curves,
/// boxes flat sheets and hands other sheets to the implicit pipeline with
/// the offset-mode scaling.
///
/// ```
/// use nalgebra::Point3;
/// use skeleton_mesher::{OffsetParameters, Pipeline, SurfaceMode, ThicknessLevel, select_pipeline};
/// use skeleton_types::{Skeleton, SkeletonCurve};
///
/// let curve = Skeleton::from(SkeletonCurve::new(vec![Point3::origin(), Point3::new(0.0, 0.0, 1.0)]));
/// let params = OffsetParameters::new(0.1).with_thickness(ThicknessLevel::Heavy);
///
/// match select_pipeline(&curve, &params, SurfaceMode::Regular) {
///     Pipeline::Tube { radius, .. } => assert!((radius - 0.8).abs() < 1e-12),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[must_use]
pub fn select_pipeline<'a>(
    skeleton: &'a Skeleton,
    params: &OffsetParameters,
    mode: SurfaceMode,
) -> Pipeline<'a> {
    let implicit = Pipeline::Implicit {
        skeleton,
        offset: params.effective_offset(SurfaceMode::Offset),
    };
    if mode == SurfaceMode::Offset {
        return implicit;
    }

    let scaled = params.effective_offset(SurfaceMode::Regular);
    match skeleton {
        Skeleton::Curve(curve) => Pipeline::Tube {
            curve,
            radius: scaled,
            square: params.is_square_cross_section,
            caps: if params.is_flat {
                CapStyle::Flat
            } else {
                CapStyle::Round
            },
        },
        Skeleton::Sheet(sheet) if params.is_flat => Pipeline::Box {
            sheet,
            thickness: scaled,
        },
        Skeleton::Sheet(_) => implicit,
    }
}

/// Shading tag for a request: flat only for flat regular surfaces.
#[must_use]
pub fn shading_for(params: &OffsetParameters, mode: SurfaceMode) -> Shading {
    match mode {
        SurfaceMode::Regular if params.is_flat => Shading::Flat,
        _ => Shading::Smooth,
    }
}

/// Result of a generation request against a [`Model`].
#[derive(Debug, Clone)]
pub enum MeshingOutcome {
    /// A new mesh was attached to the active node.
    Meshed {
        /// Node that received the mesh.
        id: String,
        /// Cleanup counts.
        report: AssemblyReport,
    },
    /// No node is active.
    NoActiveNode,
    /// The skeleton lacked geometry; its previous output was kept.
    Skipped(MesherError),
}

impl MeshingOutcome {
    /// Whether a mesh was produced.
    #[must_use]
    pub fn is_meshed(&self) -> bool {
        matches!(self, Self::Meshed { .. })
    }
}

/// Turns skeletons into closed meshes.
///
/// Holds the tunables and the three numerical collaborators. Each request
/// allocates its own proxy, grid and soup; nothing is shared between
/// requests.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use skeleton_mesher::{Model, OffsetParameters, SkeletonMesher, SkeletonNode};
/// use skeleton_types::SkeletonCurve;
///
/// let mut model = Model::new();
/// model.add_node(SkeletonNode::new(
///     "stem",
///     SkeletonCurve::new(vec![Point3::origin(), Point3::new(0.0, 0.0, 1.0)]),
/// ));
/// model.set_active("stem");
///
/// let mesher = SkeletonMesher::default();
/// let outcome = mesher
///     .generate_regular_surface(&mut model, &OffsetParameters::new(0.1))
///     .unwrap();
/// assert!(outcome.is_meshed());
///
/// let output = model.node("stem").and_then(|n| n.output.as_ref()).unwrap();
/// assert_eq!(output.filename, "meshes/stem.obj");
/// ```
pub struct SkeletonMesher {
    config: MesherConfig,
    sampler: Box<dyn DistanceSampler>,
    extractor: Box<dyn IsosurfaceExtractor>,
    frames: Box<dyn FramePropagator>,
}

impl std::fmt::Debug for SkeletonMesher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkeletonMesher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for SkeletonMesher {
    fn default() -> Self {
        Self::new(MesherConfig::default())
    }
}

impl SkeletonMesher {
    /// Mesher with the default collaborators.
    #[must_use]
    pub fn new(config: MesherConfig) -> Self {
        Self {
            config,
            sampler: Box::new(ClosestTriangleSampler),
            extractor: Box::new(MarchingTetrahedra),
            frames: Box::new(DoubleReflection),
        }
    }

    /// Replace the distance sampler.
    #[must_use]
    pub fn with_sampler(mut self, sampler: impl DistanceSampler + 'static) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    /// Replace the isosurface extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: impl IsosurfaceExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Replace the frame propagator.
    #[must_use]
    pub fn with_frame_propagator(mut self, frames: impl FramePropagator + 'static) -> Self {
        self.frames = Box::new(frames);
        self
    }

    /// The tunables.
    #[must_use]
    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Mesh one skeleton without touching any model.
    ///
    /// # Errors
    ///
    /// Any stage error; see [`MesherError::is_insufficient_input`] for the
    /// ones that mean "nothing to mesh".
    pub fn mesh_skeleton(
        &self,
        skeleton: &Skeleton,
        params: &OffsetParameters,
        mode: SurfaceMode,
    ) -> MesherResult<(OutputMesh, AssemblyReport)> {
        let pipeline = select_pipeline(skeleton, params, mode);
        debug!(kind = skeleton.kind(), ?mode, ?pipeline, "meshing skeleton");
        let soup = self.run(pipeline)?;
        assemble(soup, &self.config, shading_for(params, mode))
    }

    fn run(&self, pipeline: Pipeline<'_>) -> MesherResult<IndexedMesh> {
        match pipeline {
            Pipeline::Implicit { skeleton, offset } => offset_surface(
                skeleton,
                offset,
                &self.config,
                self.sampler.as_ref(),
                self.extractor.as_ref(),
            ),
            Pipeline::Tube {
                curve,
                radius,
                square,
                caps,
            } => {
                let points = curve.resample(self.config.tube.longitudinal_samples);
                let tube = TubeConfig::default()
                    .with_radius(radius)
                    .with_radial_segments(self.config.tube.radial_segments(square))
                    .with_caps(caps);
                Ok(capped_tube(&points, &tube, self.frames.as_ref())?)
            }
            Pipeline::Box { sheet, thickness } => oriented_box(sheet, thickness),
        }
    }

    /// Distance-field thickening of the active node.
    ///
    /// # Errors
    ///
    /// Errors other than insufficient input.
    pub fn generate_offset_surface(
        &self,
        model: &mut Model,
        params: &OffsetParameters,
    ) -> MesherResult<MeshingOutcome> {
        self.generate(model, params, SurfaceMode::Offset)
    }

    /// Tube, box or offset surface of the active node.
    ///
    /// # Errors
    ///
    /// Errors other than insufficient input.
    pub fn generate_regular_surface(
        &self,
        model: &mut Model,
        params: &OffsetParameters,
    ) -> MesherResult<MeshingOutcome> {
        self.generate(model, params, SurfaceMode::Regular)
    }

    /// Mesh the active node and attach the result to its output slot.
    ///
    /// No active node and insufficient input are not errors: the model is
    /// left as it was and the outcome says why.
    ///
    /// # Errors
    ///
    /// Configuration and resource errors, e.g. an invalid cell size or an
    /// oversize grid.
    pub fn generate(
        &self,
        model: &mut Model,
        params: &OffsetParameters,
        mode: SurfaceMode,
    ) -> MesherResult<MeshingOutcome> {
        let Some(node) = model.active_node_mut() else {
            debug!("no active node");
            return Ok(MeshingOutcome::NoActiveNode);
        };

        let (mesh, report) = match self.mesh_skeleton(&node.skeleton, params, mode) {
            Ok(done) => done,
            Err(e) if e.is_insufficient_input() => {
                debug!(id = %node.id, reason = %e, "skipping meshing");
                return Ok(MeshingOutcome::Skipped(e));
            }
            Err(e) => return Err(e),
        };

        info!(
            id = %node.id,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            shading = ?mesh.shading,
            "meshed skeleton"
        );
        node.output = Some(MeshOutput {
            mesh,
            filename: export_filename(&node.id),
        });
        Ok(MeshingOutcome::Meshed {
            id: node.id.clone(),
            report,
        })
    }
}
