//! Skeleton nodes and their output slots.

use skeleton_types::Skeleton;

use crate::assemble::OutputMesh;

/// Suggested export path for a node's mesh.
///
/// ```
/// assert_eq!(skeleton_mesher::export_filename("arm-2"), "meshes/arm-2.obj");
/// ```
#[must_use]
pub fn export_filename(id: &str) -> String {
    format!("meshes/{id}.obj")
}

/// A finished mesh attached to a node.
#[derive(Debug, Clone)]
pub struct MeshOutput {
    /// The mesh.
    pub mesh: OutputMesh,
    /// Where a collaborator should export it.
    pub filename: String,
}

/// A skeleton with its identifier and latest mesh.
#[derive(Debug, Clone)]
pub struct SkeletonNode {
    /// Identifier, also used for the export filename.
    pub id: String,
    /// The input shape.
    pub skeleton: Skeleton,
    /// Latest successful mesh; left alone when a request is skipped.
    pub output: Option<MeshOutput>,
}

impl SkeletonNode {
    /// Node without output.
    pub fn new(id: impl Into<String>, skeleton: impl Into<Skeleton>) -> Self {
        Self {
            id: id.into(),
            skeleton: skeleton.into(),
            output: None,
        }
    }
}

/// Nodes of a scene and which one is active.
#[derive(Debug, Clone, Default)]
pub struct Model {
    nodes: Vec<SkeletonNode>,
    active: Option<String>,
}

impl Model {
    /// Empty model with no active node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any node with the same id.
    pub fn add_node(&mut self, node: SkeletonNode) {
        match self.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    /// Make `id` the active node. Returns `false` (and changes nothing) for
    /// an unknown id.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        self.active = Some(id.to_owned());
        true
    }

    /// Deactivate.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// All nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&SkeletonNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The active node, if any.
    #[must_use]
    pub fn active_node(&self) -> Option<&SkeletonNode> {
        self.active.as_deref().and_then(|id| self.node(id))
    }

    /// The active node, mutably.
    pub fn active_node_mut(&mut self) -> Option<&mut SkeletonNode> {
        let id = self.active.as_deref()?;
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}
