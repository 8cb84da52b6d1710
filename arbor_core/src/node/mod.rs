// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display tree storage, mutation, and traversal.
//!
//! All nodes live in a single [`DisplayTree`] and are addressed by
//! generational [`NodeId`] handles. Using a handle after its node has been
//! destroyed panics.
//!
//! The tree is mutated through the container operations
//! ([`add_child`](DisplayTree::add_child),
//! [`remove_child`](DisplayTree::remove_child),
//! [`set_child_index`](DisplayTree::set_child_index), and friends), which keep
//! parent links, child lists, and [stage](Stage) attachment consistent and
//! record a [`TreeChange`] for each structural edit.

mod bounds;
mod change;
mod container;
mod id;
mod mask;
mod stage;
mod store;
mod traverse;
mod update;

pub use change::{TreeChange, TreeChangeKind};
pub use id::{INVALID, NodeId, StageId, SurfaceId};
pub use mask::Mask;
pub use stage::Stage;
pub use store::{CachedBitmap, Content, DisplayTree, NodeFlags};
pub use traverse::Children;
