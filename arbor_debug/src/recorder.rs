// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event it
//! receives as a [`RecordedEvent`]. Tree change batches are stored as counts
//! per kind. [`RecorderSink::to_json`] exports the recording as a JSON array
//! for offline inspection.

use std::io::{self, Write};

use arbor_core::node::{TreeChange, TreeChangeKind};
use arbor_core::trace::{
    FrameSummary, InteractionDirtyEvent, PhaseBeginEvent, PhaseEndEvent, TraceSink,
};
use serde_json::{Value, json};

use crate::snapshot::rect_json;

/// A single recorded trace event.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A pass started.
    PhaseBegin(PhaseBeginEvent),
    /// A pass ended.
    PhaseEnd(PhaseEndEvent),
    /// A stage's interaction state was dirty.
    InteractionDirty(InteractionDirtyEvent),
    /// End-of-frame summary.
    FrameSummary(FrameSummary),
    /// A batch of topology changes, counted by kind.
    TreeChanges {
        /// Frame counter.
        frame_index: u64,
        /// Number of insertions.
        added: usize,
        /// Number of removals.
        removed: usize,
        /// Number of in-place moves.
        reordered: usize,
    },
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Returns the recorded frame summaries in arrival order.
    pub fn summaries(&self) -> impl Iterator<Item = &FrameSummary> {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::FrameSummary(s) => Some(s),
            _ => None,
        })
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Writes the recording as a pretty-printed JSON array.
    pub fn to_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        let events: Vec<Value> = self.events.iter().map(event_json).collect();
        serde_json::to_writer_pretty(writer, &events)?;
        Ok(())
    }
}

fn event_json(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::PhaseBegin(e) => json!({
            "event": "PhaseBegin",
            "frame_index": e.frame_index,
            "phase": format!("{:?}", e.phase),
        }),
        RecordedEvent::PhaseEnd(e) => json!({
            "event": "PhaseEnd",
            "frame_index": e.frame_index,
            "phase": format!("{:?}", e.phase),
        }),
        RecordedEvent::InteractionDirty(e) => json!({
            "event": "InteractionDirty",
            "frame_index": e.frame_index,
            "stage": e.stage.index(),
        }),
        RecordedEvent::FrameSummary(s) => json!({
            "event": "FrameSummary",
            "frame_index": s.frame_index,
            "backend": format!("{:?}", s.backend),
            "interaction_dirty": s.interaction_dirty,
            "tree_changes": s.tree_changes,
            "bounds": s.bounds.map(rect_json),
        }),
        RecordedEvent::TreeChanges {
            frame_index,
            added,
            removed,
            reordered,
        } => json!({
            "event": "TreeChanges",
            "frame_index": frame_index,
            "added": added,
            "removed": removed,
            "reordered": reordered,
        }),
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.events.push(RecordedEvent::PhaseBegin(*e));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.events.push(RecordedEvent::PhaseEnd(*e));
    }

    fn on_interaction_dirty(&mut self, e: &InteractionDirtyEvent) {
        self.events.push(RecordedEvent::InteractionDirty(*e));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.events.push(RecordedEvent::FrameSummary(*s));
    }

    fn on_tree_changes(&mut self, frame_index: u64, changes: &[TreeChange]) {
        let count = |kind: TreeChangeKind| changes.iter().filter(|c| c.kind == kind).count();
        self.events.push(RecordedEvent::TreeChanges {
            frame_index,
            added: count(TreeChangeKind::Added),
            removed: count(TreeChangeKind::Removed),
            reordered: count(TreeChangeKind::Reordered),
        });
    }
}
