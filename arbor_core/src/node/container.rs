// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container mutation and query operations.
//!
//! Every node can hold an ordered list of children. These methods keep the
//! child lists, parent back-references, and stage references consistent:
//!
//! - a node is listed in at most one container, and its parent reference
//!   names that container;
//! - inserting into an attached container attaches the inserted subtree, and
//!   removing from one detaches it;
//! - index-checked operations fail with a [`TreeError`] instead of clamping,
//!   and leave the tree untouched when they do.

use alloc::vec::Vec;
use core::ops::{Bound, RangeBounds};

use crate::error::TreeError;

use super::change::{TreeChange, TreeChangeKind};
use super::id::{INVALID, NodeId};
use super::store::DisplayTree;
use super::traverse::Children;

impl DisplayTree {
    /// Appends `child` to the end of `parent`'s child list.
    ///
    /// Equivalent to `add_child_at(parent, child, num_children(parent))`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, TreeError> {
        let len = self.num_children(parent);
        self.add_child_at(parent, child, len)
    }

    /// Inserts `child` into `parent`'s child list at `index`, shifting later
    /// children up by one.
    ///
    /// `index` may equal the current child count (append). If `child` already
    /// has a parent it is removed from that parent first. If `parent` is
    /// attached to a stage, the stage is propagated into `child`'s subtree.
    ///
    /// # Errors
    ///
    /// - [`TreeError::IndexOutOfBounds`] if `index > num_children(parent)`.
    /// - [`TreeError::WouldCycle`] if `child` is `parent` or one of its
    ///   ancestors.
    /// - [`TreeError::StageRoot`] if `child` is the root of a stage.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child_at(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<NodeId, TreeError> {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;

        let len = self.children[p as usize].len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        if self.is_ancestor_or_self(c, p) {
            return Err(TreeError::WouldCycle);
        }
        if self.stages.iter().any(|stage| stage.root == child) {
            return Err(TreeError::StageRoot);
        }

        let old_parent = self.parent[c as usize];
        if old_parent != INVALID
            && let Some(old_index) = self.position_in(old_parent, c)
        {
            self.detach_at(old_parent, old_index);
        }

        // Re-adding into the same container shortens the list by one.
        let index = index.min(self.children[p as usize].len());
        self.children[p as usize].insert(index, c);
        self.parent[c as usize] = p;

        if let Some(stage) = self.stage[p as usize] {
            self.set_stage_reference_at(c, stage);
        }

        self.pending_changes.push(TreeChange {
            node: c,
            parent: p,
            kind: TreeChangeKind::Added,
        });
        Ok(child)
    }

    /// Removes `child` from `parent` if it is a direct child.
    ///
    /// Returns `None` (and does nothing) when `child` is not a member.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        self.validate(parent);
        self.validate(child);
        let index = self.position_in(parent.idx, child.idx)?;
        let removed = self.detach_at(parent.idx, index);
        Some(self.id_at(removed))
    }

    /// Removes and returns the child at `index`.
    ///
    /// If `parent` is attached, the removed subtree is detached from the stage
    /// before its parent link is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndexOutOfBounds`] if `index >= num_children(parent)`.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        self.validate(parent);
        let len = self.children[parent.idx as usize].len();
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let removed = self.detach_at(parent.idx, index);
        Ok(self.id_at(removed))
    }

    /// Removes and returns the children in `range`.
    ///
    /// An unbounded start means `0` and an unbounded end means the child
    /// count, so `remove_children(parent, ..)` empties the container. With
    /// `span = end - begin`, the call succeeds when `span > 0 && span <= end`,
    /// or when `span == 0` and the container is already empty (returning an
    /// empty list). Positions past the end of the child list are skipped
    /// rather than rejected, so the returned list may be shorter than `span`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidRange`] for every other begin/end pair,
    /// including `end < begin` and an empty range on a non-empty container.
    pub fn remove_children(
        &mut self,
        parent: NodeId,
        range: impl RangeBounds<usize>,
    ) -> Result<Vec<NodeId>, TreeError> {
        self.validate(parent);
        let p = parent.idx;
        let len = self.children[p as usize].len();

        let begin = match range.start_bound() {
            Bound::Included(&b) => b,
            Bound::Excluded(&b) => b.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        let invalid = TreeError::InvalidRange { begin, end, len };

        let Some(span) = end.checked_sub(begin) else {
            return Err(invalid);
        };
        // `span <= end` is the historical bound check; it does not compare
        // against `len`.
        if span > 0 && span <= end {
            let lo = begin.min(len);
            let hi = end.min(len);
            let removed: Vec<u32> = self.children[p as usize].drain(lo..hi).collect();
            let attached = self.stage[p as usize].is_some();
            for &c in &removed {
                if attached {
                    self.remove_stage_reference_at(c);
                }
                self.parent[c as usize] = INVALID;
                self.pending_changes.push(TreeChange {
                    node: c,
                    parent: p,
                    kind: TreeChangeKind::Removed,
                });
            }
            Ok(removed.into_iter().map(|c| self.id_at(c)).collect())
        } else if span == 0 && len == 0 {
            Ok(Vec::new())
        } else {
            Err(invalid)
        }
    }

    /// Exchanges the positions of two children.
    ///
    /// Does nothing if `a == b`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] unless both are direct children of
    /// `parent`.
    pub fn swap_children(&mut self, parent: NodeId, a: NodeId, b: NodeId) -> Result<(), TreeError> {
        if a == b {
            return Ok(());
        }
        self.validate(parent);
        self.validate(a);
        self.validate(b);
        let (Some(ia), Some(ib)) = (
            self.position_in(parent.idx, a.idx),
            self.position_in(parent.idx, b.idx),
        ) else {
            return Err(TreeError::NotAChild);
        };
        self.children[parent.idx as usize].swap(ia, ib);
        for node in [a.idx, b.idx] {
            self.pending_changes.push(TreeChange {
                node,
                parent: parent.idx,
                kind: TreeChangeKind::Reordered,
            });
        }
        Ok(())
    }

    /// Returns the index of `child` within `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] if `child` is not a direct child.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Result<usize, TreeError> {
        self.validate(parent);
        self.validate(child);
        self.position_in(parent.idx, child.idx)
            .ok_or(TreeError::NotAChild)
    }

    /// Moves `child` to `index` within `parent`.
    ///
    /// # Errors
    ///
    /// - [`TreeError::IndexOutOfBounds`] if `index >= num_children(parent)`.
    /// - [`TreeError::NotAChild`] if `child` is not a direct child.
    pub fn set_child_index(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        self.validate(parent);
        let len = self.children[parent.idx as usize].len();
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let current = self.child_index(parent, child)?;
        let list = &mut self.children[parent.idx as usize];
        list.remove(current);
        list.insert(index, child.idx);
        self.pending_changes.push(TreeChange {
            node: child.idx,
            parent: parent.idx,
            kind: TreeChangeKind::Reordered,
        });
        Ok(())
    }

    /// Returns the child at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndexOutOfBounds`] if `index >= num_children(parent)`.
    pub fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        self.validate(parent);
        let list = &self.children[parent.idx as usize];
        list.get(index)
            .map(|&idx| self.id_at(idx))
            .ok_or(TreeError::IndexOutOfBounds {
                index,
                len: list.len(),
            })
    }

    /// Returns the number of direct children of a node.
    #[must_use]
    pub fn num_children(&self, id: NodeId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.children[id.idx as usize])
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns whether `node` is `ancestor` or lies in its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        self.is_ancestor_or_self(ancestor.idx, node.idx)
    }

    // -- Internal helpers --

    pub(crate) fn position_in(&self, parent: u32, child: u32) -> Option<usize> {
        self.children[parent as usize]
            .iter()
            .position(|&c| c == child)
    }

    /// Removes the child at `index` from `parent`, clearing its stage first
    /// when `parent` is attached.
    pub(crate) fn detach_at(&mut self, parent: u32, index: usize) -> u32 {
        let child = self.children[parent as usize][index];
        if self.stage[parent as usize].is_some() {
            self.remove_stage_reference_at(child);
        }
        self.parent[child as usize] = INVALID;
        self.children[parent as usize].remove(index);
        self.pending_changes.push(TreeChange {
            node: child,
            parent,
            kind: TreeChangeKind::Removed,
        });
        child
    }

    /// Walks up from `node` looking for `ancestor`.
    fn is_ancestor_or_self(&self, ancestor: u32, node: u32) -> bool {
        let mut current = node;
        while current != INVALID {
            if current == ancestor {
                return true;
            }
            current = self.parent[current as usize];
        }
        false
    }
}
