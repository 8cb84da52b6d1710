// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage attachment and propagation.
//!
//! A node is *attached* when its stage reference is set. Attachment flows
//! down the tree: inserting a subtree into an attached container attaches
//! every node in it, and removing it detaches them again. Whenever an
//! interactive node gains or loses its stage reference, the stage's
//! `interaction_dirty` flag is raised so hit-testing state can be rebuilt.

use super::id::{NodeId, StageId};
use super::store::DisplayTree;

/// The attachment root of a live tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stage {
    /// Root node of the stage.
    pub(crate) root: NodeId,
    /// Raised when an interactive node is attached or detached.
    pub(crate) interaction_dirty: bool,
}

impl Stage {
    /// Returns the stage's root node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns whether interaction state needs rebuilding.
    #[inline]
    #[must_use]
    pub const fn is_interaction_dirty(&self) -> bool {
        self.interaction_dirty
    }
}

impl DisplayTree {
    /// Creates a new stage together with its root node.
    ///
    /// The root node is attached to the new stage.
    pub fn create_stage(&mut self) -> StageId {
        let root = self.create_node();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "stage count is bounded by node count, which fits in u32"
        )]
        let id = StageId(self.stages.len() as u32);
        self.stages.push(Stage {
            root,
            interaction_dirty: false,
        });
        self.stage[root.idx as usize] = Some(id);
        id
    }

    /// Returns the stage record.
    ///
    /// # Panics
    ///
    /// Panics if `stage` was not created by this tree.
    #[must_use]
    pub fn stage_info(&self, stage: StageId) -> Stage {
        self.validate_stage(stage);
        self.stages[stage.0 as usize]
    }

    /// Returns the root node of a stage.
    #[must_use]
    pub fn stage_root(&self, stage: StageId) -> NodeId {
        self.stage_info(stage).root
    }

    /// Returns the stage a node is attached to, if any.
    #[must_use]
    pub fn stage(&self, id: NodeId) -> Option<StageId> {
        self.validate(id);
        self.stage[id.idx as usize]
    }

    /// Returns the stage's interaction-dirty flag and clears it.
    pub fn take_interaction_dirty(&mut self, stage: StageId) -> bool {
        self.validate_stage(stage);
        core::mem::take(&mut self.stages[stage.0 as usize].interaction_dirty)
    }

    /// Attaches `id` and its whole subtree to `stage`.
    ///
    /// Interactive nodes mark the stage's interaction state dirty.
    pub fn set_stage_reference(&mut self, id: NodeId, stage: StageId) {
        self.validate(id);
        self.validate_stage(stage);
        self.set_stage_reference_at(id.idx, stage);
    }

    /// Detaches `id` and its whole subtree from whatever stage they are
    /// attached to.
    ///
    /// Children are cleared before their parent. Interactive nodes mark the
    /// stage they are leaving dirty.
    pub fn remove_stage_reference(&mut self, id: NodeId) {
        self.validate(id);
        self.remove_stage_reference_at(id.idx);
    }

    pub(crate) fn set_stage_reference_at(&mut self, idx: u32, stage: StageId) {
        self.stage[idx as usize] = Some(stage);
        if self.flags[idx as usize].interactive {
            self.stages[stage.0 as usize].interaction_dirty = true;
        }
        for i in 0..self.children[idx as usize].len() {
            let child = self.children[idx as usize][i];
            self.set_stage_reference_at(child, stage);
        }
    }

    pub(crate) fn remove_stage_reference_at(&mut self, idx: u32) {
        for i in 0..self.children[idx as usize].len() {
            let child = self.children[idx as usize][i];
            self.remove_stage_reference_at(child);
        }
        if let Some(stage) = self.stage[idx as usize]
            && self.flags[idx as usize].interactive
        {
            self.stages[stage.0 as usize].interaction_dirty = true;
        }
        self.stage[idx as usize] = None;
    }

    /// Panics if the stage handle does not belong to this tree.
    pub(crate) fn validate_stage(&self, stage: StageId) {
        assert!(
            (stage.0 as usize) < self.stages.len(),
            "unknown StageId: {stage:?} ({} stages)",
            self.stages.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::error::TreeError;
    use crate::node::NodeFlags;

    fn interactive() -> NodeFlags {
        NodeFlags {
            interactive: true,
            ..NodeFlags::default()
        }
    }

    #[test]
    fn stage_root_is_attached() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        assert_eq!(tree.stage(root), Some(stage));
        assert!(!tree.stage_info(stage).is_interaction_dirty());
    }

    #[test]
    fn stage_root_cannot_join_another_stage() {
        let mut tree = DisplayTree::new();
        let a = tree.create_stage();
        let b = tree.create_stage();
        let root_a = tree.stage_root(a);
        let root_b = tree.stage_root(b);

        assert_eq!(tree.add_child(root_b, root_a), Err(TreeError::StageRoot));
        assert_eq!(tree.parent(root_a), None);
        assert_eq!(tree.num_children(root_b), 0);
        assert_eq!(tree.stage(root_a), Some(a));
        assert!(tree.drain_changes().is_empty());

        let leaf = tree.create_node();
        tree.add_child(root_a, leaf).unwrap();
        assert_eq!(tree.stage(leaf), Some(a));
    }

    #[test]
    fn stage_root_cannot_be_nested_under_plain_node() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let group = tree.create_node();

        assert_eq!(tree.add_child(group, root), Err(TreeError::StageRoot));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.stage(root), Some(stage));
    }

    #[test]
    fn adding_to_attached_container_propagates_stage() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let group = tree.create_node();
        let leaf = tree.create_node();
        tree.add_child(group, leaf).unwrap();
        assert_eq!(tree.stage(leaf), None);

        tree.add_child(root, group).unwrap();
        assert_eq!(tree.stage(group), Some(stage));
        assert_eq!(tree.stage(leaf), Some(stage));
    }

    #[test]
    fn removing_from_attached_container_clears_stage() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let group = tree.create_node();
        let leaf = tree.create_node();
        tree.add_child(root, group).unwrap();
        tree.add_child(group, leaf).unwrap();

        tree.remove_child(root, group);
        assert_eq!(tree.stage(group), None);
        assert_eq!(tree.stage(leaf), None);
    }

    #[test]
    fn adding_to_detached_container_does_not_attach() {
        let mut tree = DisplayTree::new();
        let _stage = tree.create_stage();
        let group = tree.create_node();
        let leaf = tree.create_node();
        tree.add_child(group, leaf).unwrap();
        assert_eq!(tree.stage(leaf), None);
    }

    #[test]
    fn set_then_remove_is_inverse() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let a = tree.create_node();
        let b = tree.create_node();
        let c = tree.create_node();
        tree.add_child(a, b).unwrap();
        tree.add_child(b, c).unwrap();
        tree.set_flags(c, interactive());

        tree.set_stage_reference(a, stage);
        for id in [a, b, c] {
            assert_eq!(tree.stage(id), Some(stage));
        }
        assert!(tree.take_interaction_dirty(stage));

        tree.remove_stage_reference(a);
        for id in [a, b, c] {
            assert_eq!(tree.stage(id), None);
        }
        assert!(
            tree.stage_info(stage).is_interaction_dirty(),
            "detaching an interactive node marks the stage it left"
        );
    }

    #[test]
    fn non_interactive_subtree_leaves_stage_clean() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let nodes: Vec<_> = (0..4).map(|_| tree.create_node()).collect();
        for &n in &nodes {
            tree.add_child(root, n).unwrap();
        }
        tree.remove_children(root, ..).unwrap();
        for &n in &nodes {
            assert_eq!(tree.stage(n), None);
        }
        assert!(!tree.take_interaction_dirty(stage));
    }

    #[test]
    fn remove_children_detaches_and_marks_interactive() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let group = tree.create_node();
        let button = tree.create_node();
        let label = tree.create_node();
        let icon = tree.create_node();
        tree.set_flags(button, interactive());
        tree.add_child(root, group).unwrap();
        tree.add_child(group, button).unwrap();
        tree.add_child(group, label).unwrap();
        tree.add_child(button, icon).unwrap();
        assert!(tree.take_interaction_dirty(stage));

        tree.remove_children(group, ..).unwrap();
        for id in [button, label, icon] {
            assert_eq!(tree.stage(id), None);
        }
        assert_eq!(tree.stage(group), Some(stage));
        assert!(tree.take_interaction_dirty(stage));
    }

    #[test]
    fn take_interaction_dirty_resets() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let button = tree.create_node();
        tree.set_flags(button, interactive());
        tree.add_child(root, button).unwrap();

        assert!(tree.take_interaction_dirty(stage));
        assert!(!tree.take_interaction_dirty(stage));
    }

    #[test]
    #[should_panic(expected = "unknown StageId")]
    fn foreign_stage_panics() {
        let mut other = DisplayTree::new();
        let _ = other.create_stage();
        let foreign = other.create_stage();

        let mut tree = DisplayTree::new();
        let _ = tree.create_stage();
        let _ = tree.stage_root(foreign);
    }
}
