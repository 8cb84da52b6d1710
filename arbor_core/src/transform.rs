// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local transform state for display nodes.
//!
//! A node's placement is described by a position, a non-uniform scale, a
//! rotation, and a pivot. [`LocalTransform::to_affine`] composes them into a
//! [`kurbo::Affine`], which the tree multiplies with the parent's world
//! transform during [`update_transform`](crate::node::DisplayTree::update_transform).

use kurbo::{Affine, Point, Vec2};

/// Position, scale, rotation, and pivot of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    /// Translation in the parent's coordinate space.
    pub position: Point,
    /// Non-uniform scale factors.
    pub scale: Vec2,
    /// Rotation in radians (clockwise in a y-down coordinate system).
    pub rotation: f64,
    /// Point in local space that maps onto `position`.
    pub pivot: Point,
}

impl LocalTransform {
    /// Position at the origin, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        position: Point::ORIGIN,
        scale: Vec2::new(1.0, 1.0),
        rotation: 0.0,
        pivot: Point::ORIGIN,
    };

    /// Creates a transform with only a translation.
    #[inline]
    #[must_use]
    pub const fn from_position(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::IDENTITY
        }
    }

    /// Returns a copy with the given scale factors.
    #[inline]
    #[must_use]
    pub const fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale = Vec2::new(sx, sy);
        self
    }

    /// Returns a copy with the given rotation (radians).
    #[inline]
    #[must_use]
    pub const fn with_rotation(mut self, radians: f64) -> Self {
        self.rotation = radians;
        self
    }

    /// Returns a copy with the given pivot.
    #[inline]
    #[must_use]
    pub const fn with_pivot(mut self, x: f64, y: f64) -> Self {
        self.pivot = Point::new(x, y);
        self
    }

    /// Composes the transform as `translate(position) · rotate · scale ·
    /// translate(-pivot)`.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let mut affine = Affine::translate(self.position.to_vec2());
        if self.rotation != 0.0 {
            affine = affine * Affine::rotate(self.rotation);
        }
        affine = affine * Affine::scale_non_uniform(self.scale.x, self.scale.y);
        if self.pivot != Point::ORIGIN {
            affine = affine * Affine::translate(-self.pivot.to_vec2());
        }
        affine
    }

    /// Is every component of this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.scale.is_finite()
            && self.rotation.is_finite()
            && self.pivot.is_finite()
    }
}

impl Default for LocalTransform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_eq(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(LocalTransform::default().to_affine(), Affine::IDENTITY);
    }

    #[test]
    fn position_translates() {
        let t = LocalTransform::from_position(3.0, 4.0);
        assert_point_eq(t.to_affine() * Point::new(1.0, 1.0), Point::new(4.0, 5.0));
    }

    #[test]
    fn scale_applies_before_translation() {
        let t = LocalTransform::from_position(10.0, 0.0).with_scale(2.0, 3.0);
        assert_point_eq(t.to_affine() * Point::new(1.0, 1.0), Point::new(12.0, 3.0));
    }

    #[test]
    fn pivot_maps_onto_position() {
        let t = LocalTransform::from_position(50.0, 50.0)
            .with_pivot(5.0, 5.0)
            .with_rotation(core::f64::consts::FRAC_PI_2);
        assert_point_eq(t.to_affine() * Point::new(5.0, 5.0), Point::new(50.0, 50.0));
    }

    #[test]
    fn rotation_quarter_turn() {
        let t = LocalTransform::IDENTITY.with_rotation(core::f64::consts::FRAC_PI_2);
        assert_point_eq(t.to_affine() * Point::new(1.0, 0.0), Point::new(0.0, 1.0));
    }

    #[test]
    fn nan_is_not_finite() {
        let t = LocalTransform::IDENTITY.with_rotation(f64::NAN);
        assert!(!t.is_finite());
        assert!(LocalTransform::IDENTITY.is_finite());
    }
}
