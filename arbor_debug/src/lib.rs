// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, event recording, and JSON tree snapshots for arbor
//! diagnostics.
//!
//! This crate provides [`TraceSink`](arbor_core::trace::TraceSink)
//! implementations and tree dumps for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory event recording for assertions
//!   and replay.
//! - [`snapshot`]: JSON dump of a subtree's local and computed state.

pub mod pretty;
pub mod recorder;
pub mod snapshot;
