// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation and property management.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};

use crate::filter::Filter;
use crate::transform::LocalTransform;

use super::change::TreeChange;
use super::id::{INVALID, NodeId, StageId, SurfaceId};
use super::mask::Mask;
use super::stage::Stage;

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Whether the node (and its subtree) is drawn, transformed, and counted
    /// in its parent's bounds.
    pub visible: bool,
    /// Whether the node takes part in hit testing. Attaching or detaching an
    /// interactive node marks its stage's interaction state dirty.
    pub interactive: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            visible: true,
            interactive: false,
        }
    }
}

/// A drawable surface placed in a node's local coordinate space.
///
/// Nodes with content draw it before their children and include
/// `frame` in their bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Content {
    /// The surface to draw.
    pub surface: SurfaceId,
    /// Where the surface lands, in local coordinates.
    pub frame: Rect,
}

/// A precomputed snapshot of a node's rendered subtree.
///
/// While set, [`update_transform`](DisplayTree::update_transform) stops at
/// the node, [`bounds`](DisplayTree::bounds) reports the snapshot frame, and
/// both backends draw the snapshot instead of recursing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CachedBitmap {
    /// The surface holding the snapshot.
    pub surface: SurfaceId,
    /// Local bounds of the subtree when the snapshot was taken, or `None` if
    /// it had no content.
    pub frame: Option<Rect>,
}

/// Struct-of-arrays storage for all nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct DisplayTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) stage: Vec<Option<StageId>>,

    // -- Local properties (set by callers) --
    pub(crate) transform: Vec<LocalTransform>,
    pub(crate) alpha: Vec<f64>,
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) mask: Vec<Option<Mask>>,
    pub(crate) filters: Vec<Vec<Filter>>,
    pub(crate) content: Vec<Option<Content>>,
    pub(crate) cached_bitmap: Vec<Option<CachedBitmap>>,

    // -- Computed properties (written by traversal) --
    pub(crate) world_transform: Vec<Affine>,
    pub(crate) world_alpha: Vec<f64>,
    pub(crate) bounds: Vec<Option<Rect>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Stages --
    pub(crate) stages: Vec<Stage>,

    // -- Change tracking --
    pub(crate) pending_changes: Vec<TreeChange>,
}

impl Default for DisplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            stage: Vec::new(),
            transform: Vec::new(),
            alpha: Vec::new(),
            flags: Vec::new(),
            mask: Vec::new(),
            filters: Vec::new(),
            content: Vec::new(),
            cached_bitmap: Vec::new(),
            world_transform: Vec::new(),
            world_alpha: Vec::new(),
            bounds: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            stages: Vec::new(),
            pending_changes: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new standalone node and returns its handle.
    ///
    /// The node starts with an identity transform, full opacity, visible,
    /// no mask, filters, or content, no parent, and no stage.
    pub fn create_node(&mut self) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.stage[i] = None;
            self.transform[i] = LocalTransform::IDENTITY;
            self.alpha[i] = 1.0;
            self.flags[i] = NodeFlags::default();
            self.mask[i] = None;
            self.filters[i].clear();
            self.content[i] = None;
            self.cached_bitmap[i] = None;
            self.world_transform[i] = Affine::IDENTITY;
            self.world_alpha[i] = 1.0;
            self.bounds[i] = None;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.stage.push(None);
            self.transform.push(LocalTransform::IDENTITY);
            self.alpha.push(1.0);
            self.flags.push(NodeFlags::default());
            self.mask.push(None);
            self.filters.push(Vec::new());
            self.content.push(None);
            self.cached_bitmap.push(None);
            self.world_transform.push(Affine::IDENTITY);
            self.world_alpha.push(1.0);
            self.bounds.push(None);
            self.generation.push(0);
            idx
        };

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// The node is removed from its parent first (clearing its stage
    /// reference if the parent was attached).
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first), if it is the
    /// root of a stage, or if the handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.children[idx as usize].is_empty(),
            "cannot destroy node with children"
        );
        assert!(
            !self.stages.iter().any(|stage| stage.root == id),
            "cannot destroy a stage root"
        );

        let p = self.parent[idx as usize];
        if p != INVALID
            && let Some(index) = self.position_in(p, idx)
        {
            self.detach_at(p, index);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns the handles of live nodes that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx))
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Returns and clears the topology changes recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<TreeChange> {
        core::mem::take(&mut self.pending_changes)
    }

    // -- Property getters (read-only) --

    /// Returns the local transform of a node.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> LocalTransform {
        self.validate(id);
        self.transform[id.idx as usize]
    }

    /// Returns the local alpha of a node.
    #[must_use]
    pub fn alpha(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.alpha[id.idx as usize]
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns whether a node is visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.flags(id).visible
    }

    /// Returns the mask of a node.
    #[must_use]
    pub fn mask(&self, id: NodeId) -> Option<Mask> {
        self.validate(id);
        self.mask[id.idx as usize]
    }

    /// Returns the filter list of a node (empty if it has none).
    #[must_use]
    pub fn filters(&self, id: NodeId) -> &[Filter] {
        self.validate(id);
        &self.filters[id.idx as usize]
    }

    /// Returns the content of a node.
    #[must_use]
    pub fn content(&self, id: NodeId) -> Option<Content> {
        self.validate(id);
        self.content[id.idx as usize]
    }

    /// Returns the cache-as-bitmap snapshot of a node, if one is set.
    #[must_use]
    pub fn cached_bitmap(&self, id: NodeId) -> Option<CachedBitmap> {
        self.validate(id);
        self.cached_bitmap[id.idx as usize]
    }

    /// Returns the computed world transform of a node.
    ///
    /// Only valid after [`update_transform`](Self::update_transform) has
    /// visited the node.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Affine {
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    /// Returns the computed world alpha of a node (product of ancestor
    /// alphas).
    ///
    /// Only valid after [`update_transform`](Self::update_transform) has
    /// visited the node.
    #[must_use]
    pub fn world_alpha(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.world_alpha[id.idx as usize]
    }

    /// Returns the rectangle stored by the last non-empty
    /// [`bounds`](Self::bounds) query on this node.
    ///
    /// A query that finds nothing does not clear it.
    #[must_use]
    pub fn cached_bounds(&self, id: NodeId) -> Option<Rect> {
        self.validate(id);
        self.bounds[id.idx as usize]
    }

    // -- Mutation API --

    /// Sets the local transform of a node.
    pub fn set_transform(&mut self, id: NodeId, transform: LocalTransform) {
        self.validate(id);
        self.transform[id.idx as usize] = transform;
    }

    /// Sets the position of a node, keeping scale, rotation, and pivot.
    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) {
        self.validate(id);
        self.transform[id.idx as usize].position = kurbo::Point::new(x, y);
    }

    /// Sets the scale of a node, keeping position, rotation, and pivot.
    pub fn set_scale(&mut self, id: NodeId, sx: f64, sy: f64) {
        self.validate(id);
        self.transform[id.idx as usize].scale = kurbo::Vec2::new(sx, sy);
    }

    /// Sets the rotation of a node in radians.
    pub fn set_rotation(&mut self, id: NodeId, radians: f64) {
        self.validate(id);
        self.transform[id.idx as usize].rotation = radians;
    }

    /// Sets the local alpha of a node.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) {
        self.validate(id);
        self.alpha[id.idx as usize] = alpha;
    }

    /// Sets the flags of a node.
    ///
    /// Toggling `interactive` on an attached node marks its stage's
    /// interaction state dirty.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.validate(id);
        let idx = id.idx as usize;
        if self.flags[idx].interactive != flags.interactive
            && let Some(stage) = self.stage[idx]
        {
            self.stages[stage.0 as usize].interaction_dirty = true;
        }
        self.flags[idx] = flags;
    }

    /// Shows or hides a node, keeping its other flags.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let flags = NodeFlags {
            visible,
            ..self.flags(id)
        };
        self.set_flags(id, flags);
    }

    /// Sets the mask of a node.
    pub fn set_mask(&mut self, id: NodeId, mask: Option<Mask>) {
        self.validate(id);
        self.mask[id.idx as usize] = mask;
    }

    /// Replaces the filter list of a node. An empty list removes all filters.
    pub fn set_filters(&mut self, id: NodeId, filters: Vec<Filter>) {
        self.validate(id);
        self.filters[id.idx as usize] = filters;
    }

    /// Sets the content of a node.
    pub fn set_content(&mut self, id: NodeId, content: Option<Content>) {
        self.validate(id);
        self.content[id.idx as usize] = content;
    }

    /// Drops the cache-as-bitmap snapshot of a node so its subtree is
    /// traversed again.
    pub fn clear_cached_bitmap(&mut self, id: NodeId) {
        self.validate(id);
        self.cached_bitmap[id.idx as usize] = None;
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Builds a handle for a live slot.
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }
}
