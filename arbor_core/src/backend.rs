// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render dispatch contract for drawing backends.
//!
//! Arbor does not draw anything itself. A backend opens a *session* for a
//! frame and the tree walks itself into it, calling back for every piece of
//! content and every mask or filter scope it enters. Two kinds of session are
//! supported:
//!
//! - **Accelerated** ([`AcceleratedSession`]): a batching shader pipeline.
//!   Draw calls are accumulated in a batch; masks and filters are stack-based
//!   and need the batch stopped, flushed, and restarted around them. Filters
//!   render their subtree into an offscreen target.
//!
//! - **Immediate** ([`ImmediateSession`]): a rasterizer that draws as it
//!   goes. Only masks are supported; filters are ignored.
//!
//! [`render_accelerated`] and [`render_immediate`] implement the traversal
//! protocol for each kind. [`RenderSession`] wraps either one so frame
//! drivers can stay backend-agnostic.
//!
//! Both traversals read the world transforms and world alpha written by the
//! last [`update_transform`](DisplayTree::update_transform); they never
//! recompute them.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(tree: &mut DisplayTree, stage: StageId, backend: &mut impl AcceleratedSession) {
//!     let root = tree.stage_root(stage);
//!     tree.update_transform(root);
//!     render(tree, root, RenderSession::Accelerated(backend));
//! }
//! ```

use kurbo::Affine;

use crate::filter::Filter;
use crate::node::{CachedBitmap, Content, DisplayTree, Mask, NodeId};

/// Starts and stops the accelerated backend's draw-call batch.
pub trait BatchController {
    /// Submits all pending draw calls without ending the batch.
    fn flush(&mut self);
    /// Begins accumulating draw calls.
    fn start(&mut self);
    /// Submits pending draw calls and ends the batch.
    fn stop(&mut self);
}

/// Offscreen filter stack of the accelerated backend.
pub trait FilterStack {
    /// Redirects subsequent draws into an offscreen target that will be
    /// post-processed with `filters` when popped.
    fn push_filter(&mut self, node: NodeId, filters: &[Filter]);
    /// Applies the innermost filter scope and composites it back.
    fn pop_filter(&mut self);
}

/// Clip stack shared by both backends.
pub trait MaskStack {
    /// Clips subsequent draws to `mask`, given in the local space of a node
    /// whose world transform is `transform`.
    fn push_mask(&mut self, mask: &Mask, transform: Affine);
    /// Removes the innermost clip.
    fn pop_mask(&mut self);
}

/// Receives the drawable pieces of the tree.
pub trait DrawTarget {
    /// Draws a node's content at the given world transform and alpha.
    fn draw_content(&mut self, node: NodeId, content: &Content, transform: Affine, alpha: f64);
    /// Draws a node's cache-as-bitmap snapshot in place of its subtree.
    fn draw_cached(&mut self, node: NodeId, bitmap: &CachedBitmap, transform: Affine, alpha: f64);
}

/// A frame in progress on the accelerated backend.
pub trait AcceleratedSession: DrawTarget {
    /// Returns the draw-call batch.
    fn batch(&mut self) -> &mut dyn BatchController;
    /// Returns the filter stack.
    fn filters(&mut self) -> &mut dyn FilterStack;
    /// Returns the mask stack.
    fn masks(&mut self) -> &mut dyn MaskStack;
}

/// A frame in progress on the immediate backend.
pub trait ImmediateSession: DrawTarget {
    /// Returns the mask stack.
    fn masks(&mut self) -> &mut dyn MaskStack;
}

/// Which kind of backend a [`RenderSession`] targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Batching shader pipeline.
    Accelerated,
    /// Immediate-mode rasterizer.
    Immediate,
}

/// A session on either backend.
pub enum RenderSession<'a> {
    /// Dispatches to [`render_accelerated`].
    Accelerated(&'a mut dyn AcceleratedSession),
    /// Dispatches to [`render_immediate`].
    Immediate(&'a mut dyn ImmediateSession),
}

impl RenderSession<'_> {
    /// Returns the backend kind of this session.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Accelerated(_) => BackendKind::Accelerated,
            Self::Immediate(_) => BackendKind::Immediate,
        }
    }
}

impl core::fmt::Debug for RenderSession<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("RenderSession").field(&self.kind()).finish()
    }
}

/// Renders `id` and its subtree into whichever backend `session` targets.
pub fn render(tree: &DisplayTree, id: NodeId, session: RenderSession<'_>) {
    match session {
        RenderSession::Accelerated(s) => render_accelerated(tree, id, s),
        RenderSession::Immediate(s) => render_immediate(tree, id, s),
    }
}

/// Renders `id` and its subtree into an accelerated session.
///
/// Nothing is drawn for invisible nodes or nodes whose world alpha is zero
/// or less. A node carrying a cache-as-bitmap snapshot draws the snapshot
/// instead of its subtree. A node with a mask or filters brackets its content
/// and children like this:
///
/// ```text
/// flush, push_filter          (filters only)
/// stop, push_mask, start      (mask only)
/// ... content, children ...
/// stop
/// pop_mask                    (mask only)
/// pop_filter                  (filters only)
/// start
/// ```
pub fn render_accelerated(tree: &DisplayTree, id: NodeId, session: &mut dyn AcceleratedSession) {
    tree.validate(id);
    render_accelerated_at(tree, id.idx, session);
}

/// Renders `id` and its subtree into an immediate session.
///
/// Nothing is drawn for invisible nodes or nodes whose world alpha is zero
/// or less. A node carrying a cache-as-bitmap snapshot draws the snapshot
/// instead of its subtree. Masks bracket content and children; filters are
/// not supported by this backend and are skipped.
pub fn render_immediate(tree: &DisplayTree, id: NodeId, session: &mut dyn ImmediateSession) {
    tree.validate(id);
    render_immediate_at(tree, id.idx, session);
}

fn render_accelerated_at(tree: &DisplayTree, idx: u32, session: &mut dyn AcceleratedSession) {
    let i = idx as usize;
    if !tree.flags[i].visible || tree.world_alpha[i] <= 0.0 {
        return;
    }
    if draw_cached_at(tree, idx, session) {
        return;
    }

    let mask = tree.mask[i];
    let filters = &tree.filters[i];
    if mask.is_none() && filters.is_empty() {
        draw_content_at(tree, idx, session);
        for &child in &tree.children[i] {
            render_accelerated_at(tree, child, session);
        }
        return;
    }

    if !filters.is_empty() {
        session.batch().flush();
        session.filters().push_filter(tree.id_at(idx), filters);
    }
    if let Some(mask) = &mask {
        session.batch().stop();
        session.masks().push_mask(mask, tree.world_transform[i]);
        session.batch().start();
    }

    draw_content_at(tree, idx, session);
    for &child in &tree.children[i] {
        render_accelerated_at(tree, child, session);
    }

    session.batch().stop();
    if mask.is_some() {
        session.masks().pop_mask();
    }
    if !filters.is_empty() {
        session.filters().pop_filter();
    }
    session.batch().start();
}

fn render_immediate_at(tree: &DisplayTree, idx: u32, session: &mut dyn ImmediateSession) {
    let i = idx as usize;
    if !tree.flags[i].visible || tree.world_alpha[i] <= 0.0 {
        return;
    }
    if draw_cached_at(tree, idx, session) {
        return;
    }

    let mask = tree.mask[i];
    if let Some(mask) = &mask {
        session.masks().push_mask(mask, tree.world_transform[i]);
    }
    draw_content_at(tree, idx, session);
    for &child in &tree.children[i] {
        render_immediate_at(tree, child, session);
    }
    if mask.is_some() {
        session.masks().pop_mask();
    }
}

/// Draws the snapshot of `idx` if it has one. Returns whether it did.
fn draw_cached_at(tree: &DisplayTree, idx: u32, target: &mut (impl DrawTarget + ?Sized)) -> bool {
    let i = idx as usize;
    let Some(bitmap) = &tree.cached_bitmap[i] else {
        return false;
    };
    target.draw_cached(
        tree.id_at(idx),
        bitmap,
        tree.world_transform[i],
        tree.world_alpha[i],
    );
    true
}

fn draw_content_at(tree: &DisplayTree, idx: u32, target: &mut (impl DrawTarget + ?Sized)) {
    let i = idx as usize;
    if let Some(content) = &tree.content[i] {
        target.draw_content(
            tree.id_at(idx),
            content,
            tree.world_transform[i],
            tree.world_alpha[i],
        );
    }
}
