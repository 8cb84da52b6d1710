// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording render sessions, blur reference kernel, and frame driver for
//! arbor.
//!
//! This crate sits between [`arbor_core`]'s display tree and a concrete
//! drawing backend. It provides:
//!
//! - [`RenderPlan`]: a session that implements both the accelerated and the
//!   immediate backend contracts by recording an ordered list of
//!   [`RenderCommand`]s
//! - [`BlurKernel`]: the CPU reference for the blur leaf effect
//! - [`render_frame`]: one frame of transform update, bounds, and render
//!   dispatch with trace instrumentation
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `arbor_core/trace`.
//! - `trace-rich` (disabled by default, implies `trace`): Reports drained
//!   tree changes to the trace sink every frame.

mod blur;
mod frame;
mod plan;

pub use blur::{BlurKernel, Rgba};
pub use frame::render_frame;
pub use plan::{RenderCommand, RenderPlan};
