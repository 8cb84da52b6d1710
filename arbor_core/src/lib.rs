// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display tree, bounds, and render dispatch for 2D scene graphs.
//!
//! `arbor_core` manages a hierarchical display tree: every node owns an
//! ordered list of children, composes a local transform into a cached world
//! transform, and can be attached to a [`Stage`](node::Stage). It is `no_std`
//! compatible (with `alloc`) and stores nodes in struct-of-arrays layout
//! addressed by generational handles.
//!
//! # Architecture
//!
//! A frame runs two passes over the tree and then hands it to a backend:
//!
//! ```text
//!   mutation (add / remove / reorder)
//!       │
//!       ▼
//!   DisplayTree::update_transform() ──► world transforms, world alpha
//!       │
//!       ├──► DisplayTree::bounds() ──► Option<Rect>
//!       │
//!       ▼
//!   backend::render() ──► AcceleratedSession | ImmediateSession
//! ```
//!
//! **[`node`]**: Struct-of-arrays display tree with generational handles,
//! the container mutation contract, transform propagation, bounds, and stage
//! attachment.
//!
//! **[`backend`]**: Session traits for the accelerated and immediate
//! backends and the two render-dispatch functions.
//!
//! **[`filter`]**: Opaque post-processing effects pushed onto a backend's
//! filter stack.
//!
//! **[`transform`]**: Position/scale/rotation/pivot composition into a
//! [`kurbo::Affine`].
//!
//! **[`error`]**: [`TreeError`](error::TreeError), returned by every
//! index- and membership-checked operation.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-frame tree
//!   change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod error;
pub mod filter;
pub mod node;
pub mod trace;
pub mod transform;
