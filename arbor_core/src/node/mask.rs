// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mask shapes for node clipping.

use kurbo::{Affine, Rect};

/// A shape, in the node's local coordinates, that clips the node's content and
/// descendants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mask {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A rectangle with rounded corners.
    RoundedRect(kurbo::RoundedRect),
}

impl Mask {
    /// Returns the axis-aligned bounding box of the mask after applying
    /// `transform`.
    #[must_use]
    pub fn bounding_box(&self, transform: Affine) -> Rect {
        let local = match self {
            Self::Rect(rect) => *rect,
            Self::RoundedRect(rounded) => rounded.rect(),
        };
        transform.transform_rect_bbox(local)
    }
}
