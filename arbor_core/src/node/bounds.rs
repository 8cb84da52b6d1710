// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-up bounds aggregation.
//!
//! Bounds are axis-aligned rectangles in the space of the world transforms
//! last written by [`update_transform`](DisplayTree::update_transform). A
//! node's bounds are the union of its own content frame and the bounds of
//! its visible children. `None` means "no content"; it is never conflated
//! with a zero-sized rectangle at the origin.
//!
//! Bounds are recomputed on every query. A non-empty result is also stored
//! on the node and can be read back with
//! [`cached_bounds`](DisplayTree::cached_bounds); an empty result leaves the
//! stored rectangle as it was.

use kurbo::{Affine, Rect};

use super::id::{NodeId, SurfaceId};
use super::store::{CachedBitmap, DisplayTree};

impl DisplayTree {
    /// Computes the bounds of `id` and its visible descendants in world
    /// space.
    ///
    /// Invisible children are skipped together with their subtrees; the
    /// visibility of `id` itself is not consulted. Returns `None` if nothing
    /// contributed, which includes nodes without content whose children are
    /// all invisible or empty.
    pub fn bounds(&mut self, id: NodeId) -> Option<Rect> {
        self.validate(id);
        self.bounds_at(id.idx)
    }

    /// Computes the bounds of `id` in its own coordinate space.
    ///
    /// The node's world transform is replaced by the identity for the
    /// duration of the call and its children are re-transformed relative to
    /// it. The node's own world transform is restored afterwards; the
    /// children's world transforms stay local until the next
    /// [`update_transform`](Self::update_transform).
    pub fn local_bounds(&mut self, id: NodeId) -> Option<Rect> {
        self.validate(id);
        let i = id.idx as usize;
        let saved = self.world_transform[i];
        self.world_transform[i] = Affine::IDENTITY;
        self.update_children_at(id.idx);
        let bounds = self.bounds_at(id.idx);
        self.world_transform[i] = saved;
        bounds
    }

    /// Returns the horizontal extent of the node: `scale.x` times the width
    /// of its local bounds, or `0.0` if it has none.
    pub fn width(&mut self, id: NodeId) -> f64 {
        let scale = self.transform(id).scale.x;
        scale * self.local_bounds(id).map_or(0.0, |r| r.width())
    }

    /// Returns the vertical extent of the node: `scale.y` times the height
    /// of its local bounds, or `0.0` if it has none.
    pub fn height(&mut self, id: NodeId) -> f64 {
        let scale = self.transform(id).scale.y;
        scale * self.local_bounds(id).map_or(0.0, |r| r.height())
    }

    /// Adjusts `scale.x` so that [`width`](Self::width) returns `width`.
    ///
    /// Nodes with zero local width get a scale of `1.0`.
    pub fn set_width(&mut self, id: NodeId, width: f64) {
        let local = self.local_bounds(id).map_or(0.0, |r| r.width());
        let scale = if local != 0.0 { width / local } else { 1.0 };
        self.transform[id.idx as usize].scale.x = scale;
    }

    /// Adjusts `scale.y` so that [`height`](Self::height) returns `height`.
    ///
    /// Nodes with zero local height get a scale of `1.0`.
    pub fn set_height(&mut self, id: NodeId, height: f64) {
        let local = self.local_bounds(id).map_or(0.0, |r| r.height());
        let scale = if local != 0.0 { height / local } else { 1.0 };
        self.transform[id.idx as usize].scale.y = scale;
    }

    /// Freezes the node's subtree into a snapshot drawn from `surface`.
    ///
    /// The snapshot frame is the node's current
    /// [local bounds](Self::local_bounds). The caller is responsible for
    /// rendering the subtree into `surface`.
    pub fn cache_as_bitmap(&mut self, id: NodeId, surface: SurfaceId) -> CachedBitmap {
        self.validate(id);
        self.cached_bitmap[id.idx as usize] = None;
        let frame = self.local_bounds(id);
        let bitmap = CachedBitmap { surface, frame };
        self.cached_bitmap[id.idx as usize] = Some(bitmap);
        bitmap
    }

    pub(crate) fn bounds_at(&mut self, idx: u32) -> Option<Rect> {
        let i = idx as usize;
        let world = self.world_transform[i];

        if let Some(bitmap) = self.cached_bitmap[i] {
            let bounds = bitmap.frame.map(|f| world.transform_rect_bbox(f.abs()));
            if bounds.is_some() {
                self.bounds[i] = bounds;
            }
            return bounds;
        }

        let mut acc = self.content[i].map(|c| world.transform_rect_bbox(c.frame.abs()));
        for n in 0..self.children[i].len() {
            let child = self.children[i][n];
            if !self.flags[child as usize].visible {
                continue;
            }
            if let Some(child_bounds) = self.bounds_at(child) {
                acc = Some(acc.map_or(child_bounds, |a| a.union(child_bounds)));
            }
        }

        if acc.is_some() {
            self.bounds[i] = acc;
        }
        acc
    }
}
