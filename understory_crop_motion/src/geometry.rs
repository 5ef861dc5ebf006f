// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// Velocity in view/device units per second, one component per axis.
pub type Velocity = Vec2;

/// One of the two translation axes of the viewport.
///
/// Both axis controllers share one implementation; this selector picks which
/// component of a [`Transform`] or which edges of a [`Rect`] they operate on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis; near edge is the left edge.
    Horizontal,
    /// The Y axis; near edge is the top edge.
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// Selects this axis' component of `v`.
    #[must_use]
    pub fn of(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// Replaces this axis' component of `v`.
    pub fn set(self, v: &mut Vec2, value: f64) {
        match self {
            Self::Horizontal => v.x = value,
            Self::Vertical => v.y = value,
        }
    }

    /// Returns the `(near, far)` edges of `rect` along this axis.
    #[must_use]
    pub fn span(self, rect: Rect) -> (f64, f64) {
        match self {
            Self::Horizontal => (rect.x0, rect.x1),
            Self::Vertical => (rect.y0, rect.y1),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }
}

/// Placement of the object inside the viewport.
///
/// The transform is applied to the object's layout rectangle: it is scaled
/// about the layout centre and then offset by `translation`. An identity
/// transform renders the object exactly at its layout rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Offset from the layout position, in view units.
    pub translation: Vec2,
    /// Per-axis scale factor about the layout centre.
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Creates a transform from a translation and a per-axis scale.
    #[must_use]
    pub const fn new(translation: Vec2, scale: Vec2) -> Self {
        Self { translation, scale }
    }

    /// Translation component along `axis`.
    #[must_use]
    pub fn translation_on(&self, axis: Axis) -> f64 {
        axis.of(self.translation)
    }

    /// Sets the translation component along `axis`.
    pub fn set_translation_on(&mut self, axis: Axis, value: f64) {
        axis.set(&mut self.translation, value);
    }

    /// Scale component along `axis`.
    #[must_use]
    pub fn scale_on(&self, axis: Axis) -> f64 {
        axis.of(self.scale)
    }

    /// Sets the scale component along `axis`.
    pub fn set_scale_on(&mut self, axis: Axis, value: f64) {
        axis.set(&mut self.scale, value);
    }

    /// Screen-space rectangle the object occupies when laid out at `layout`.
    ///
    /// Negative scales are not supported; the result is normalized
    /// regardless.
    #[must_use]
    pub fn object_bounds(&self, layout: Rect) -> Rect {
        let center = layout.center() + self.translation;
        let half = Vec2::new(
            layout.width() * self.scale.x * 0.5,
            layout.height() * self.scale.y * 0.5,
        );
        Rect::from_points(center - half, center + half)
    }

    /// Affine mapping the object's layout rectangle onto its rendered bounds.
    ///
    /// Render sinks can use this directly as the object's draw transform.
    #[must_use]
    pub fn to_affine(&self, layout: Rect) -> Affine {
        let center = layout.center().to_vec2();
        Affine::translate(center + self.translation)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-center)
    }

    /// Maps a point in viewport space back into the object's layout space.
    ///
    /// Returns `None` when either scale component is zero.
    #[must_use]
    pub fn view_to_layout_point(&self, layout: Rect, pt: Point) -> Option<Point> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return None;
        }
        Some(self.to_affine(layout).inverse() * pt)
    }
}
