// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame driver.

use arbor_core::backend::{RenderSession, render};
use arbor_core::node::{DisplayTree, StageId};
use arbor_core::trace::{
    FrameSummary, InteractionDirtyEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer,
};

/// Runs one frame for `stage` and dispatches it to `session`.
///
/// In order: drains the tree's topology changes, reads and resets the
/// stage's interaction-dirty flag, propagates world transforms from the stage
/// root, computes the root's bounds, and renders. Each pass is bracketed by
/// phase events on `tracer`, and the returned [`FrameSummary`] is also
/// emitted to it.
pub fn render_frame(
    tree: &mut DisplayTree,
    stage: StageId,
    session: RenderSession<'_>,
    frame_index: u64,
    tracer: &mut Tracer<'_>,
) -> FrameSummary {
    let changes = tree.drain_changes();
    #[cfg(feature = "trace-rich")]
    tracer.tree_changes(frame_index, &changes);

    let interaction_dirty = tree.take_interaction_dirty(stage);
    if interaction_dirty {
        tracer.interaction_dirty(&InteractionDirtyEvent { frame_index, stage });
    }

    let root = tree.stage_root(stage);

    phase(tracer, frame_index, PhaseKind::UpdateTransform, || {
        tree.update_transform(root);
    });
    let bounds = phase(tracer, frame_index, PhaseKind::Bounds, || tree.bounds(root));
    let backend = session.kind();
    phase(tracer, frame_index, PhaseKind::Render, || {
        render(tree, root, session);
    });

    let summary = FrameSummary {
        frame_index,
        backend,
        interaction_dirty,
        tree_changes: changes.len(),
        bounds,
    };
    tracer.frame_summary(&summary);
    summary
}

fn phase<T>(
    tracer: &mut Tracer<'_>,
    frame_index: u64,
    phase: PhaseKind,
    f: impl FnOnce() -> T,
) -> T {
    tracer.phase_begin(&PhaseBeginEvent { frame_index, phase });
    let out = f();
    tracer.phase_end(&PhaseEndEvent { frame_index, phase });
    out
}

#[cfg(test)]
mod tests {
    use arbor_core::backend::BackendKind;
    use arbor_core::node::{Content, NodeFlags, NodeId, SurfaceId};
    use arbor_core::transform::LocalTransform;
    use kurbo::Rect;

    use super::*;
    use crate::RenderPlan;

    fn sprite(tree: &mut DisplayTree, surface: u32, x: f64, y: f64) -> NodeId {
        let id = tree.create_node();
        tree.set_content(
            id,
            Some(Content {
                surface: SurfaceId(surface),
                frame: Rect::new(0.0, 0.0, 10.0, 10.0),
            }),
        );
        tree.set_transform(id, LocalTransform::from_position(x, y));
        id
    }

    #[test]
    fn frame_updates_bounds_and_renders() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let a = sprite(&mut tree, 1, 0.0, 0.0);
        let b = sprite(&mut tree, 2, 20.0, 20.0);
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();

        let mut plan = RenderPlan::new();
        let summary = render_frame(
            &mut tree,
            stage,
            RenderSession::Immediate(&mut plan),
            0,
            &mut Tracer::none(),
        );

        assert_eq!(summary.frame_index, 0);
        assert_eq!(summary.backend, BackendKind::Immediate);
        assert_eq!(summary.tree_changes, 2);
        assert!(!summary.interaction_dirty);
        assert_eq!(summary.bounds, Some(Rect::new(0.0, 0.0, 30.0, 30.0)));
        assert_eq!(plan.draw_count(), 2);
    }

    #[test]
    fn changes_and_dirty_flag_are_consumed() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let button = sprite(&mut tree, 1, 0.0, 0.0);
        tree.set_flags(
            button,
            NodeFlags {
                interactive: true,
                ..NodeFlags::default()
            },
        );
        tree.add_child(root, button).unwrap();

        let mut plan = RenderPlan::new();
        let first = render_frame(
            &mut tree,
            stage,
            RenderSession::Accelerated(&mut plan),
            1,
            &mut Tracer::none(),
        );
        assert!(first.interaction_dirty);
        assert_eq!(first.tree_changes, 1);
        assert_eq!(first.backend, BackendKind::Accelerated);

        plan.clear();
        let second = render_frame(
            &mut tree,
            stage,
            RenderSession::Accelerated(&mut plan),
            2,
            &mut Tracer::none(),
        );
        assert!(!second.interaction_dirty);
        assert_eq!(second.tree_changes, 0);
        assert_eq!(plan.draw_count(), 1);
    }

    #[test]
    fn empty_stage_has_no_bounds() {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let mut plan = RenderPlan::new();
        let summary = render_frame(
            &mut tree,
            stage,
            RenderSession::Immediate(&mut plan),
            0,
            &mut Tracer::none(),
        );
        assert_eq!(summary.bounds, None);
        assert!(plan.commands().is_empty());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn phases_are_traced_in_order() {
        use arbor_core::trace::TraceSink;

        #[derive(Default)]
        struct Phases(Vec<(PhaseKind, bool)>);
        impl TraceSink for Phases {
            fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
                self.0.push((e.phase, true));
            }
            fn on_phase_end(&mut self, e: &PhaseEndEvent) {
                self.0.push((e.phase, false));
            }
        }

        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let mut plan = RenderPlan::new();
        let mut sink = Phases::default();
        let mut tracer = Tracer::new(&mut sink);
        render_frame(
            &mut tree,
            stage,
            RenderSession::Immediate(&mut plan),
            0,
            &mut tracer,
        );
        drop(tracer);

        assert_eq!(
            sink.0,
            vec![
                (PhaseKind::UpdateTransform, true),
                (PhaseKind::UpdateTransform, false),
                (PhaseKind::Bounds, true),
                (PhaseKind::Bounds, false),
                (PhaseKind::Render, true),
                (PhaseKind::Render, false),
            ]
        );
    }
}
