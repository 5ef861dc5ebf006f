// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary resolution: decides whether a transform leaves the object outside
//! the allowed region and where it has to go to get back in.
//!
//! Everything here is a pure function of its inputs. Controllers call into it
//! whenever a gesture ends or a fling advances.

use kurbo::Rect;

use crate::config::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};
use crate::error::ConfigError;
use crate::geometry::{Axis, Transform};

/// Lower bound applied to a scale before it is used as a divisor.
pub const MIN_SCALE_EPSILON: f64 = 1e-6;

/// Allowed scale interval.
///
/// Invariant: `min <= 1 <= max`. A live pinch may drift above `max` or below
/// `1`; corrections always bring it back to `max` or `1` respectively. `min`
/// is a hard floor for the live pinch so the object never collapses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    min: f64,
    max: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SCALE,
            max: DEFAULT_MAX_SCALE,
        }
    }
}

impl ScaleRange {
    /// Creates a scale range, rejecting values that break `min <= 1 <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > 1.0 || max < 1.0 {
            return Err(ConfigError::InvalidScaleRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Smallest scale a live pinch may reach.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest scale the object may rest at.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Scale used to measure overshoot: `scale` clamped into `[1, max]`.
    #[must_use]
    pub fn effective(&self, scale: f64) -> f64 {
        if scale > self.max {
            self.max
        } else if scale < 1.0 {
            1.0
        } else {
            scale
        }
    }
}

/// Geometry that stays fixed for a crop session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropFrame {
    /// The object's untransformed rectangle in viewport coordinates.
    pub layout: Rect,
    /// Region the object must fully cover, in viewport coordinates.
    pub restriction: Rect,
    /// Allowed scale interval.
    pub scale_range: ScaleRange,
}

impl CropFrame {
    /// Creates a frame from a layout rectangle, a restriction rectangle and a
    /// scale range.
    #[must_use]
    pub fn new(layout: Rect, restriction: Rect, scale_range: ScaleRange) -> Self {
        Self {
            layout,
            restriction,
            scale_range,
        }
    }
}

/// Translation along `axis` that brings the object back inside the
/// restriction rectangle, or `None` when it already covers it on that axis.
///
/// Overshoot is measured as if the object were rendered at its effective
/// scale (see [`ScaleRange::effective`]), centred on its current centre, so a
/// pan gap and a scale overshoot resolve to the same resting position.
///
/// When the object is smaller than the restriction on this axis, both edges
/// show a gap; the near edge wins and the object is pinned to it.
#[must_use]
pub fn resolve_axis_correction(transform: &Transform, frame: &CropFrame, axis: Axis) -> Option<f64> {
    let (layout_near, layout_far) = axis.span(frame.layout);
    let (restrict_near, restrict_far) = axis.span(frame.restriction);
    let layout_len = layout_far - layout_near;
    let center = (layout_near + layout_far) * 0.5 + transform.translation_on(axis);

    let scale = transform.scale_on(axis).max(MIN_SCALE_EPSILON);
    let effective = frame.scale_range.effective(scale);
    let current_len = layout_len * scale;
    let half = current_len * (effective / scale) * 0.5;

    let near = center - half;
    let far = center + half;
    let layout_center = (layout_near + layout_far) * 0.5;

    if restrict_near < near {
        Some(restrict_near + half - layout_center)
    } else if far < restrict_far {
        Some(restrict_far - half - layout_center)
    } else {
        None
    }
}

/// Scale the object has to return to, or `None` when `scale` is in range.
///
/// Returns exactly `max` above the range and exactly `1.0` below it. `min` is
/// never a target: the object must not rest smaller than its layout size.
#[must_use]
pub fn resolve_scale_correction(scale: f64, min: f64, max: f64) -> Option<f64> {
    debug_assert!(min <= 1.0 && 1.0 <= max, "scale range must contain 1");
    if scale > max {
        Some(max)
    } else if scale < 1.0 {
        Some(1.0)
    } else {
        None
    }
}

/// Returns `true` when neither axis nor either scale component needs a
/// correction.
///
/// A transform with a non-finite component is never within bounds.
#[must_use]
pub fn is_within_bounds(transform: &Transform, frame: &CropFrame) -> bool {
    if !(transform.translation.is_finite() && transform.scale.is_finite()) {
        return false;
    }
    let range = frame.scale_range;
    Axis::ALL.into_iter().all(|axis| {
        resolve_axis_correction(transform, frame, axis).is_none()
            && resolve_scale_correction(transform.scale_on(axis), range.min(), range.max())
                .is_none()
    })
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Vec2};

    use super::{
        CropFrame, ScaleRange, is_within_bounds, resolve_axis_correction,
        resolve_scale_correction,
    };
    use crate::geometry::{Axis, Transform};

    fn frame(layout: Rect, restriction: Rect) -> CropFrame {
        CropFrame::new(layout, restriction, ScaleRange::new(0.5, 2.0).unwrap())
    }

    #[test]
    fn scale_range_rejects_broken_invariant() {
        assert!(ScaleRange::new(1.5, 2.0).is_err());
        assert!(ScaleRange::new(0.5, 0.9).is_err());
        assert!(ScaleRange::new(0.0, 2.0).is_err());
        assert!(ScaleRange::new(f64::NAN, 2.0).is_err());
        assert!(ScaleRange::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn covering_object_needs_no_correction() {
        let f = frame(
            Rect::new(-50.0, -50.0, 150.0, 150.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        let t = Transform::new(Vec2::new(30.0, -30.0), Vec2::new(1.0, 1.0));
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Horizontal), None);
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Vertical), None);
        assert!(is_within_bounds(&t, &f));
    }

    #[test]
    fn near_gap_aligns_near_edges() {
        let f = frame(
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Rect::new(50.0, 50.0, 150.0, 150.0),
        );
        // Left edge at 60, restriction starts at 50.
        let t = Transform::new(Vec2::new(60.0, 0.0), Vec2::new(1.0, 1.0));
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Horizontal), Some(50.0));
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Vertical), None);
    }

    #[test]
    fn far_gap_aligns_far_edges() {
        let f = frame(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        let t = Transform::new(Vec2::new(0.0, -5.0), Vec2::new(1.0, 1.0));
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Vertical), Some(0.0));
        assert!(!is_within_bounds(&t, &f));
    }

    #[test]
    fn overscaled_object_measures_at_max_scale() {
        let f = frame(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        // At 3x the object spans -100..200 after panning by 0; at the max
        // scale of 2x it would span -50..150 and still cover. Pan it right by
        // 60: at 2x it would span 10..210, leaving a 10px gap on the left.
        let t = Transform::new(Vec2::new(60.0, 0.0), Vec2::new(3.0, 3.0));
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Horizontal), Some(50.0));
        let t = Transform::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 3.0));
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Horizontal), None);
    }

    #[test]
    fn underscaled_object_measures_at_unit_scale() {
        let f = frame(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        // At 0.5x the object never covers, but at the effective 1x it does.
        let t = Transform::new(Vec2::ZERO, Vec2::new(0.5, 0.5));
        assert_eq!(resolve_axis_correction(&t, &f, Axis::Horizontal), None);
        assert!(!is_within_bounds(&t, &f));
    }

    #[test]
    fn undersized_object_pins_to_near_edge() {
        let f = frame(
            Rect::new(25.0, 0.0, 75.0, 100.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        // 50 wide inside a 100 wide restriction: gaps on both sides.
        let target = resolve_axis_correction(&Transform::IDENTITY, &f, Axis::Horizontal);
        assert_eq!(target, Some(-25.0));
    }

    #[test]
    fn degenerate_scale_does_not_divide_by_zero() {
        let f = frame(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        let t = Transform::new(Vec2::new(10.0, 0.0), Vec2::ZERO);
        let target = resolve_axis_correction(&t, &f, Axis::Horizontal)
            .expect("a zero scale leaves a gap at unit effective scale");
        assert!(target.is_finite());
        assert!(target.abs() < 1e-6);
    }

    #[test]
    fn scale_correction_is_exact() {
        let eps = 1e-3;
        assert_eq!(resolve_scale_correction(2.0 + eps, 0.5, 2.0), Some(2.0));
        assert_eq!(resolve_scale_correction(1.0 - eps, 0.5, 2.0), Some(1.0));
        assert_eq!(resolve_scale_correction(1.0, 0.5, 2.0), None);
        assert_eq!(resolve_scale_correction(2.0, 0.5, 2.0), None);
        assert_eq!(resolve_scale_correction(1.7, 0.5, 2.0), None);
    }

    #[test]
    fn non_finite_transform_is_out_of_bounds() {
        let f = frame(
            Rect::new(-50.0, -50.0, 150.0, 150.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        let nan = Transform::new(Vec2::new(f64::NAN, 0.0), Vec2::new(1.0, 1.0));
        assert_eq!(resolve_axis_correction(&nan, &f, Axis::Horizontal), None);
        assert!(!is_within_bounds(&nan, &f));
        let inf = Transform::new(Vec2::ZERO, Vec2::new(1.0, f64::INFINITY));
        assert!(!is_within_bounds(&inf, &f));
        assert!(is_within_bounds(&Transform::IDENTITY, &f));
    }
}
