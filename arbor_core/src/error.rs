// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by display tree operations.

use core::fmt;

/// Errors from index- and membership-checked [`DisplayTree`] operations.
///
/// Every operation that returns one of these leaves the tree unmodified.
///
/// [`DisplayTree`]: crate::node::DisplayTree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// An index was outside the valid range for the operation.
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The container's child count at the time of the call.
        len: usize,
    },
    /// A node passed as an operand is not a direct child of the container.
    NotAChild,
    /// The begin/end pair passed to
    /// [`remove_children`](crate::node::DisplayTree::remove_children) failed
    /// its validity check.
    InvalidRange {
        /// Start of the requested range.
        begin: usize,
        /// End of the requested range (exclusive).
        end: usize,
        /// The container's child count at the time of the call.
        len: usize,
    },
    /// The insertion would make a node its own ancestor.
    WouldCycle,
    /// A stage root was passed as the child of an insertion.
    ///
    /// Stage roots stay attached to their own stage and never get a parent.
    StageRoot,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "child index {index} out of bounds (len {len})")
            }
            Self::NotAChild => f.write_str("node is not a child of the container"),
            Self::InvalidRange { begin, end, len } => {
                write!(f, "invalid child range {begin}..{end} (len {len})")
            }
            Self::WouldCycle => f.write_str("node cannot be added to its own subtree"),
            Self::StageRoot => f.write_str("stage root cannot be added to a container"),
        }
    }
}

impl core::error::Error for TreeError {}
