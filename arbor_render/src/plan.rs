// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of backend commands for one frame.

use arbor_core::backend::{
    AcceleratedSession, BatchController, DrawTarget, FilterStack, ImmediateSession, MaskStack,
};
use arbor_core::filter::Filter;
use arbor_core::node::{CachedBitmap, Content, Mask, NodeId, SurfaceId};
use kurbo::{Affine, Rect};

/// A single command recorded by a [`RenderPlan`].
///
/// Commands are produced in back-to-front order, matching the tree's
/// traversal order.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    /// Pending draws were submitted without ending the batch.
    Flush,
    /// The batch was (re)started.
    BatchStart,
    /// The batch was stopped.
    BatchStop,
    /// An offscreen filter scope was opened for `node`.
    PushFilter {
        /// The node whose subtree is filtered.
        node: NodeId,
        /// Filters applied when the scope is popped.
        filters: Vec<Filter>,
    },
    /// The innermost filter scope was closed.
    PopFilter,
    /// A clip was pushed.
    PushMask {
        /// Clip shape in local coordinates.
        mask: Mask,
        /// World transform of the masked node.
        transform: Affine,
    },
    /// The innermost clip was popped.
    PopMask,
    /// Content was drawn.
    Draw {
        /// The node owning the content.
        node: NodeId,
        /// The surface drawn.
        surface: SurfaceId,
        /// Local frame of the surface.
        frame: Rect,
        /// World transform.
        transform: Affine,
        /// Effective alpha, accumulated from ancestors.
        alpha: f64,
    },
    /// A cache-as-bitmap snapshot was drawn in place of a subtree.
    DrawCached {
        /// The node owning the snapshot.
        node: NodeId,
        /// The snapshot surface.
        surface: SurfaceId,
        /// Local frame of the snapshot, if the subtree had any content.
        frame: Option<Rect>,
        /// World transform.
        transform: Affine,
        /// Effective alpha, accumulated from ancestors.
        alpha: f64,
    },
}

/// An ordered list of backend commands for a single frame.
///
/// `RenderPlan` implements both [`AcceleratedSession`] and
/// [`ImmediateSession`], so it can stand in for either backend. Backends
/// replay the commands into native draw calls; tests compare them directly.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    commands: Vec<RenderCommand>,
    batching: bool,
    mask_depth: usize,
    filter_depth: usize,
}

impl Default for RenderPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPlan {
    /// Creates an empty plan with batching started.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            batching: true,
            mask_depth: 0,
            filter_depth: 0,
        }
    }

    /// Returns the recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns the number of draw commands, cached or not.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw { .. } | RenderCommand::DrawCached { .. }))
            .count()
    }

    /// Returns the surfaces drawn, in order.
    pub fn drawn_surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Draw { surface, .. } | RenderCommand::DrawCached { surface, .. } => {
                Some(*surface)
            }
            _ => None,
        })
    }

    /// Returns whether every pushed mask and filter has been popped and the
    /// batch is running.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.batching && self.mask_depth == 0 && self.filter_depth == 0
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl BatchController for RenderPlan {
    fn flush(&mut self) {
        self.commands.push(RenderCommand::Flush);
    }

    fn start(&mut self) {
        self.batching = true;
        self.commands.push(RenderCommand::BatchStart);
    }

    fn stop(&mut self) {
        self.batching = false;
        self.commands.push(RenderCommand::BatchStop);
    }
}

impl FilterStack for RenderPlan {
    fn push_filter(&mut self, node: NodeId, filters: &[Filter]) {
        self.filter_depth += 1;
        self.commands.push(RenderCommand::PushFilter {
            node,
            filters: filters.to_vec(),
        });
    }

    fn pop_filter(&mut self) {
        debug_assert!(self.filter_depth > 0, "filter stack underflow");
        self.filter_depth = self.filter_depth.saturating_sub(1);
        self.commands.push(RenderCommand::PopFilter);
    }
}

impl MaskStack for RenderPlan {
    fn push_mask(&mut self, mask: &Mask, transform: Affine) {
        self.mask_depth += 1;
        self.commands.push(RenderCommand::PushMask {
            mask: *mask,
            transform,
        });
    }

    fn pop_mask(&mut self) {
        debug_assert!(self.mask_depth > 0, "mask stack underflow");
        self.mask_depth = self.mask_depth.saturating_sub(1);
        self.commands.push(RenderCommand::PopMask);
    }
}

impl DrawTarget for RenderPlan {
    fn draw_content(&mut self, node: NodeId, content: &Content, transform: Affine, alpha: f64) {
        self.commands.push(RenderCommand::Draw {
            node,
            surface: content.surface,
            frame: content.frame,
            transform,
            alpha,
        });
    }

    fn draw_cached(&mut self, node: NodeId, bitmap: &CachedBitmap, transform: Affine, alpha: f64) {
        self.commands.push(RenderCommand::DrawCached {
            node,
            surface: bitmap.surface,
            frame: bitmap.frame,
            transform,
            alpha,
        });
    }
}

impl AcceleratedSession for RenderPlan {
    fn batch(&mut self) -> &mut dyn BatchController {
        self
    }

    fn filters(&mut self) -> &mut dyn FilterStack {
        self
    }

    fn masks(&mut self) -> &mut dyn MaskStack {
        self
    }
}

impl ImmediateSession for RenderPlan {
    fn masks(&mut self) -> &mut dyn MaskStack {
        self
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::backend::{RenderSession, render};
    use arbor_core::filter::BlurFilter;
    use arbor_core::node::DisplayTree;
    use arbor_core::transform::LocalTransform;

    use super::*;

    fn leaf(tree: &mut DisplayTree, surface: u32) -> NodeId {
        let id = tree.create_node();
        tree.set_content(
            id,
            Some(Content {
                surface: SurfaceId(surface),
                frame: Rect::new(0.0, 0.0, 10.0, 10.0),
            }),
        );
        id
    }

    #[test]
    fn new_plan_is_empty_and_balanced() {
        let plan = RenderPlan::new();
        assert!(plan.commands().is_empty());
        assert!(plan.is_balanced());
        assert_eq!(plan.draw_count(), 0);
    }

    #[test]
    fn draws_carry_world_transform_and_alpha() {
        let mut tree = DisplayTree::new();
        let group = tree.create_node();
        let a = leaf(&mut tree, 1);
        tree.add_child(group, a).unwrap();
        tree.set_transform(group, LocalTransform::from_position(10.0, 20.0));
        tree.set_alpha(group, 0.5);
        tree.set_alpha(a, 0.5);
        tree.update_transform(group);

        let mut plan = RenderPlan::new();
        render(&tree, group, RenderSession::Immediate(&mut plan));

        assert_eq!(
            plan.commands(),
            &[RenderCommand::Draw {
                node: a,
                surface: SurfaceId(1),
                frame: Rect::new(0.0, 0.0, 10.0, 10.0),
                transform: Affine::translate((10.0, 20.0)),
                alpha: 0.25,
            }]
        );
    }

    #[test]
    fn accelerated_scopes_leave_plan_balanced() {
        let mut tree = DisplayTree::new();
        let group = tree.create_node();
        let inner = tree.create_node();
        let a = leaf(&mut tree, 1);
        let b = leaf(&mut tree, 2);
        tree.add_child(group, inner).unwrap();
        tree.add_child(inner, a).unwrap();
        tree.add_child(group, b).unwrap();
        tree.set_filters(group, vec![Filter::Blur(BlurFilter::new(2.0))]);
        tree.set_mask(inner, Some(Mask::Rect(Rect::new(0.0, 0.0, 4.0, 4.0))));
        tree.update_transform(group);

        let mut plan = RenderPlan::new();
        render(&tree, group, RenderSession::Accelerated(&mut plan));

        assert!(plan.is_balanced());
        assert_eq!(plan.draw_count(), 2);
        assert_eq!(
            plan.drawn_surfaces().collect::<Vec<_>>(),
            vec![SurfaceId(1), SurfaceId(2)]
        );
        assert!(matches!(
            plan.commands().first(),
            Some(RenderCommand::Flush)
        ));
        assert!(matches!(
            &plan.commands()[1],
            RenderCommand::PushFilter { node, filters } if *node == group && filters.len() == 1
        ));
    }

    #[test]
    fn cached_subtree_draws_once() {
        let mut tree = DisplayTree::new();
        let group = tree.create_node();
        let a = leaf(&mut tree, 1);
        let b = leaf(&mut tree, 2);
        tree.add_child(group, a).unwrap();
        tree.add_child(group, b).unwrap();
        tree.update_transform(group);
        tree.cache_as_bitmap(group, SurfaceId(9));

        let mut plan = RenderPlan::new();
        render(&tree, group, RenderSession::Accelerated(&mut plan));
        assert_eq!(plan.draw_count(), 1);
        assert_eq!(plan.drawn_surfaces().collect::<Vec<_>>(), vec![SurfaceId(9)]);
    }

    #[test]
    fn clear_resets_state() {
        let mut plan = RenderPlan::new();
        plan.stop();
        plan.push_mask(&Mask::Rect(Rect::ZERO), Affine::IDENTITY);
        assert!(!plan.is_balanced());
        plan.clear();
        assert!(plan.is_balanced());
        assert!(plan.commands().is_empty());
    }
}
