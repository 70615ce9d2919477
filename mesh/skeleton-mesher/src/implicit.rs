//! Distance-field pipeline: proxy, sampled grid, isosurface.

use mesh_offset::{IsosurfaceExtractor, offset_mesh_with};
use mesh_sdf::DistanceSampler;
use mesh_types::IndexedMesh;
use skeleton_types::Skeleton;
use tracing::debug;

use crate::config::MesherConfig;
use crate::error::{MesherError, MesherResult};
use crate::proxy::build_proxy;

/// Offset surface of a skeleton at `offset`, as a world-space soup.
///
/// The proxy of the skeleton is sampled on a grid of
/// [`MesherConfig::cell_size`] covering its bounds plus the configured
/// padding (widened for large offsets), and the `offset` level set is
/// extracted.
///
/// # Errors
///
/// - [`MesherError::InvalidOffset`] for a non-finite offset
/// - [`MesherError::EmptyProxy`] if the skeleton yields no proxy triangles
/// - [`MesherError::Offset`] if sampling or extraction fails, including an
///   empty isosurface
pub fn offset_surface(
    skeleton: &Skeleton,
    offset: f64,
    config: &MesherConfig,
    sampler: &dyn DistanceSampler,
    extractor: &dyn IsosurfaceExtractor,
) -> MesherResult<IndexedMesh> {
    if !offset.is_finite() {
        return Err(MesherError::InvalidOffset(offset));
    }

    let proxy = build_proxy(skeleton, config);
    if proxy.is_empty() {
        return Err(MesherError::EmptyProxy {
            kind: skeleton.kind(),
        });
    }
    debug!(
        min = ?proxy.bounds.min,
        max = ?proxy.bounds.max,
        offset,
        "sampling proxy"
    );

    let soup = offset_mesh_with(&proxy.mesh, offset, &config.offset_config(), sampler, extractor)?;
    Ok(soup)
}
