// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topology change records.

/// What happened to a node's position in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeChangeKind {
    /// The node was inserted into a container.
    Added,
    /// The node was removed from a container.
    Removed,
    /// The node moved to a different index within the same container.
    Reordered,
}

/// A single topology mutation, recorded by the
/// [`DisplayTree`](super::DisplayTree) and drained with
/// [`drain_changes`](super::DisplayTree::drain_changes).
///
/// Uses raw slot indices so records stay meaningful after the node is
/// destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeChange {
    /// Slot index of the node that moved.
    pub node: u32,
    /// Slot index of the container involved.
    pub parent: u32,
    /// Kind of change.
    pub kind: TreeChangeKind,
}
