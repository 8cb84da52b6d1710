// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down transform propagation.
//!
//! [`update_transform`](DisplayTree::update_transform) recomputes, for every
//! visible node in a subtree, `world_transform = parent_world * local` and
//! `world_alpha = parent_world_alpha * alpha`. Roots use the identity
//! transform and an alpha of `1.0` as their parent values. Children are
//! visited in index order. Nothing is cached between calls; each frame runs
//! the full pass.

use kurbo::Affine;

use super::id::{INVALID, NodeId};
use super::store::DisplayTree;

impl DisplayTree {
    /// Recomputes world transforms and world alpha for `id` and its
    /// descendants.
    ///
    /// Does nothing if `id` is invisible; invisible descendants are skipped
    /// together with their subtrees and keep their previous world values.
    /// Stops at `id` without visiting children when it carries a
    /// [cache-as-bitmap snapshot](super::CachedBitmap).
    pub fn update_transform(&mut self, id: NodeId) {
        self.validate(id);
        self.update_transform_at(id.idx);
    }

    pub(crate) fn update_transform_at(&mut self, idx: u32) {
        let i = idx as usize;
        if !self.flags[i].visible {
            return;
        }

        let parent = self.parent[i];
        let (parent_world, parent_alpha) = if parent != INVALID {
            (
                self.world_transform[parent as usize],
                self.world_alpha[parent as usize],
            )
        } else {
            (Affine::IDENTITY, 1.0)
        };
        self.world_transform[i] = parent_world * self.transform[i].to_affine();
        self.world_alpha[i] = parent_alpha * self.alpha[i];

        if self.cached_bitmap[i].is_some() {
            return;
        }
        self.update_children_at(idx);
    }

    /// Runs [`update_transform_at`](Self::update_transform_at) on every child
    /// of `idx`, using `idx`'s current world values as the parent values.
    pub(crate) fn update_children_at(&mut self, idx: u32) {
        for n in 0..self.children[idx as usize].len() {
            let child = self.children[idx as usize][n];
            self.update_transform_at(child);
        }
    }
}
