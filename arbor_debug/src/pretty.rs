// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use arbor_core::node::{TreeChange, TreeChangeKind};
use arbor_core::trace::{
    FrameSummary, InteractionDirtyEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
};
use kurbo::Rect;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::UpdateTransform => "transform",
        PhaseKind::Bounds => "bounds",
        PhaseKind::Render => "render",
    }
}

fn format_bounds(bounds: Option<Rect>) -> String {
    match bounds {
        Some(r) => format!("({:.1}, {:.1})..({:.1}, {:.1})", r.x0, r.y0, r.x1, r.y1),
        None => "empty".to_owned(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_interaction_dirty(&mut self, e: &InteractionDirtyEvent) {
        let _ = writeln!(
            self.writer,
            "[interaction] frame={} stage={} dirty",
            e.frame_index,
            e.stage.index(),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let dirty = if s.interaction_dirty { "dirty" } else { "clean" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} backend={:?} changes={} interaction={dirty} bounds={}",
            s.frame_index,
            s.backend,
            s.tree_changes,
            format_bounds(s.bounds),
        );
    }

    fn on_tree_changes(&mut self, frame_index: u64, changes: &[TreeChange]) {
        let count = |kind: TreeChangeKind| changes.iter().filter(|c| c.kind == kind).count();
        let _ = writeln!(
            self.writer,
            "[tree] frame={frame_index} added={} removed={} reordered={}",
            count(TreeChangeKind::Added),
            count(TreeChangeKind::Removed),
            count(TreeChangeKind::Reordered),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::backend::BackendKind;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_phase() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 1,
            phase: PhaseKind::Bounds,
        });
        let output = output(sink);
        assert!(output.contains("[phase:begin]"), "got: {output}");
        assert!(output.contains("frame=1 bounds"), "got: {output}");
    }

    #[test]
    fn pretty_print_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_summary(&FrameSummary {
            frame_index: 4,
            backend: BackendKind::Accelerated,
            interaction_dirty: false,
            tree_changes: 3,
            bounds: None,
        });
        let output = output(sink);
        assert!(output.contains("backend=Accelerated"), "got: {output}");
        assert!(output.contains("changes=3"), "got: {output}");
        assert!(output.contains("bounds=empty"), "got: {output}");
    }

    #[test]
    fn pretty_print_tree_changes() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let change = |kind| TreeChange {
            node: 1,
            parent: 0,
            kind,
        };
        sink.on_tree_changes(
            2,
            &[
                change(TreeChangeKind::Added),
                change(TreeChangeKind::Added),
                change(TreeChangeKind::Removed),
            ],
        );
        let output = output(sink);
        assert!(
            output.contains("added=2 removed=1 reordered=0"),
            "got: {output}"
        );
    }
}
