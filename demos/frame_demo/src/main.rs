// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop over a small display tree.
//!
//! Builds a stage with a row of sprites, a blurred group, and a masked
//! interactive button, then runs 12 frames that mutate the tree between
//! renders. Even frames go to the accelerated backend and odd frames to the
//! immediate one. Events are printed with a
//! [`PrettyPrintSink`](arbor_debug::pretty::PrettyPrintSink) and recorded with
//! a [`RecorderSink`](arbor_debug::recorder::RecorderSink); the recording and
//! a final tree snapshot are written as JSON.

use std::f64::consts::TAU;
use std::fs::File;
use std::io::BufWriter;

use arbor_core::backend::RenderSession;
use arbor_core::filter::{BlurFilter, Filter};
use arbor_core::node::{Content, DisplayTree, Mask, NodeFlags, NodeId, SurfaceId, TreeChange};
use arbor_core::trace::{
    FrameSummary, InteractionDirtyEvent, PhaseBeginEvent, PhaseEndEvent, TraceSink, Tracer,
};
use arbor_debug::pretty::PrettyPrintSink;
use arbor_debug::recorder::RecorderSink;
use arbor_render::{BlurKernel, RenderCommand, RenderPlan, render_frame};
use kurbo::{Rect, RoundedRect};

const FRAME_COUNT: u64 = 12;
const SPRITE_COUNT: u32 = 4;

/// Forwards every event to both sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_interaction_dirty(&mut self, e: &InteractionDirtyEvent) {
        self.pretty.on_interaction_dirty(e);
        self.recorder.on_interaction_dirty(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.recorder.on_frame_summary(s);
    }

    fn on_tree_changes(&mut self, frame_index: u64, changes: &[TreeChange]) {
        self.pretty.on_tree_changes(frame_index, changes);
        self.recorder.on_tree_changes(frame_index, changes);
    }
}

fn sprite(tree: &mut DisplayTree, surface: u32, x: f64, y: f64) -> NodeId {
    let id = tree.create_node();
    tree.set_content(
        id,
        Some(Content {
            surface: SurfaceId(surface),
            frame: Rect::new(0.0, 0.0, 32.0, 32.0),
        }),
    );
    tree.set_position(id, x, y);
    id
}

fn main() {
    // -- tree --------------------------------------------------------------
    let mut tree = DisplayTree::new();
    let stage = tree.create_stage();
    let root = tree.stage_root(stage);

    let row = tree.create_node();
    tree.set_position(row, 16.0, 16.0);
    let sprites: Vec<NodeId> = (0..SPRITE_COUNT)
        .map(|i| sprite(&mut tree, i, f64::from(i) * 48.0, 0.0))
        .collect();
    for &s in &sprites {
        tree.add_child(row, s).expect("append to row");
    }

    let blurred = tree.create_node();
    tree.set_position(blurred, 16.0, 96.0);
    tree.set_filters(
        blurred,
        vec![Filter::Blur(BlurFilter::new(6.0).with_seed(0.25))],
    );
    let halo = sprite(&mut tree, 100, 0.0, 0.0);
    tree.add_child(blurred, halo).expect("append to blurred group");

    let button = sprite(&mut tree, 200, 160.0, 96.0);
    tree.set_flags(
        button,
        NodeFlags {
            interactive: true,
            ..NodeFlags::default()
        },
    );
    tree.set_mask(
        button,
        Some(Mask::RoundedRect(RoundedRect::from_rect(
            Rect::new(0.0, 0.0, 32.0, 32.0),
            6.0,
        ))),
    );

    tree.add_child(root, row).expect("attach row");
    tree.add_child(root, blurred).expect("attach blurred group");
    tree.add_child(root, button).expect("attach button");

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut plan = RenderPlan::new();

    // -- simulated loop ----------------------------------------------------
    for frame_index in 0..FRAME_COUNT {
        // Animate: spin the row and pulse the halo.
        let t = frame_index as f64 / FRAME_COUNT as f64;
        tree.set_rotation(row, t * TAU * 0.1);
        tree.set_alpha(halo, 0.5 + 0.5 * (t * TAU).cos());

        // Mutate: rotate the sprite order, and take the button on and off
        // stage to exercise interaction tracking.
        match frame_index % 4 {
            1 => {
                let first = tree.child_at(row, 0).expect("row is not empty");
                let last = tree.num_children(row) - 1;
                tree.set_child_index(row, first, last)
                    .expect("reorder sprite");
            }
            2 => {
                tree.remove_child(root, button);
            }
            3 => {
                tree.add_child(root, button).expect("reattach button");
            }
            _ => {}
        }

        plan.clear();
        let session = if frame_index % 2 == 0 {
            RenderSession::Accelerated(&mut plan)
        } else {
            RenderSession::Immediate(&mut plan)
        };
        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        let summary = render_frame(&mut tree, stage, session, frame_index, &mut tracer);

        let filters = plan
            .commands()
            .iter()
            .filter(|c| matches!(c, RenderCommand::PushFilter { .. }))
            .count();
        println!(
            "  frame {frame_index}: {} draws, {filters} filter scopes, balanced={}, width={:.1}",
            plan.draw_count(),
            plan.is_balanced(),
            tree.width(root),
        );
        debug_assert!(plan.is_balanced(), "frame {} left scopes open", summary.frame_index);
        // `width` leaves the children in local space.
        tree.update_transform(root);
    }

    // -- blur reference ----------------------------------------------------
    let kernel = BlurKernel::new(BlurFilter::new(3.0).without_dither());
    let mut src = vec![[0.0_f32; 4]; 16];
    src[8] = [1.0; 4];
    let mut dst = vec![[0.0_f32; 4]; 16];
    kernel.apply_horizontal(&src, &mut dst, 16, 1);
    let profile: Vec<String> = dst.iter().map(|p| format!("{:.3}", p[0])).collect();
    println!("blur impulse response: [{}]", profile.join(", "));

    // -- export ------------------------------------------------------------
    let path = "arbor-trace.json";
    let file = File::create(path).expect("failed to create arbor-trace.json");
    recorder
        .to_json(&mut BufWriter::new(file))
        .expect("failed to write trace recording");
    println!("Wrote {path} ({} events)", recorder.events().len());

    let path = "arbor-snapshot.json";
    let file = File::create(path).expect("failed to create arbor-snapshot.json");
    arbor_debug::snapshot::write_snapshot(&tree, root, &mut BufWriter::new(file))
        .expect("failed to write tree snapshot");
    println!("Wrote {path} ({} nodes)", tree.node_count());
}
