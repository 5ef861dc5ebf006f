// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

use crate::bounds::{CropFrame, ScaleRange};
use crate::error::ConfigError;
use crate::physics::{FrictionParams, SpringParams};

/// Default fraction of the viewport width covered by the crop area.
pub const DEFAULT_RESULT_WIDTH: f64 = 0.8;
/// Default fraction of the viewport height covered by the crop area.
pub const DEFAULT_RESULT_HEIGHT: f64 = 0.8;
/// Default maximum resting scale.
pub const DEFAULT_MAX_SCALE: f64 = 2.0;
/// Default floor for a live pinch.
pub const DEFAULT_MIN_SCALE: f64 = 0.5;
/// Largest maximum scale [`CropConfig`] accepts.
pub const MAX_SUPPORTED_SCALE: f64 = 5.0;

/// Physics tuning shared by all controllers of an orchestrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Spring used for translation corrections.
    pub spring: SpringParams,
    /// Spring used for scale corrections.
    pub scale_spring: SpringParams,
    /// Friction applied to translation flings.
    pub friction: FrictionParams,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            spring: SpringParams::default(),
            scale_spring: SpringParams::LOW_NO_BOUNCY,
            friction: FrictionParams::default(),
        }
    }
}

impl MotionConfig {
    /// Replaces the translation correction spring.
    #[must_use]
    pub fn with_spring(mut self, spring: SpringParams) -> Self {
        self.spring = spring;
        self
    }

    /// Replaces the scale correction spring.
    #[must_use]
    pub fn with_scale_spring(mut self, spring: SpringParams) -> Self {
        self.scale_spring = spring;
        self
    }

    /// Replaces the fling friction.
    #[must_use]
    pub fn with_friction(mut self, friction: FrictionParams) -> Self {
        self.friction = friction;
        self
    }
}

/// Describes the crop area relative to the viewport and the allowed scales.
///
/// The crop area (restriction rectangle) is centred in the viewport and sized
/// as a fraction of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropConfig {
    result_width: f64,
    result_height: f64,
    scale_range: ScaleRange,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            result_width: DEFAULT_RESULT_WIDTH,
            result_height: DEFAULT_RESULT_HEIGHT,
            scale_range: ScaleRange::default(),
        }
    }
}

impl CropConfig {
    /// Creates a crop configuration.
    ///
    /// - `result_width` / `result_height` are fractions of the viewport in
    ///   `0..=1`.
    /// - `max_scale` must lie in `1..=5`.
    /// - `min_scale` must lie in `(0, 1]`.
    pub fn new(
        result_width: f64,
        result_height: f64,
        min_scale: f64,
        max_scale: f64,
    ) -> Result<Self, ConfigError> {
        check_fraction("result width", result_width)?;
        check_fraction("result height", result_height)?;
        if !(1.0..=MAX_SUPPORTED_SCALE).contains(&max_scale) {
            return Err(ConfigError::MaxScaleOutOfRange(max_scale));
        }
        Ok(Self {
            result_width,
            result_height,
            scale_range: ScaleRange::new(min_scale, max_scale)?,
        })
    }

    /// Fraction of the viewport width covered by the crop area.
    #[must_use]
    pub fn result_width(&self) -> f64 {
        self.result_width
    }

    /// Fraction of the viewport height covered by the crop area.
    #[must_use]
    pub fn result_height(&self) -> f64 {
        self.result_height
    }

    /// Allowed scale interval.
    #[must_use]
    pub fn scale_range(&self) -> ScaleRange {
        self.scale_range
    }

    /// Crop area for a viewport of the given size, centred in it.
    #[must_use]
    pub fn restriction_for(&self, viewport: Size) -> Rect {
        let w = viewport.width * self.result_width;
        let h = viewport.height * self.result_height;
        Rect::new(
            (viewport.width - w) * 0.5,
            (viewport.height - h) * 0.5,
            (viewport.width + w) * 0.5,
            (viewport.height + h) * 0.5,
        )
    }

    /// Frame for an object of `object` size laid out centred in `viewport`.
    #[must_use]
    pub fn frame_for(&self, viewport: Size, object: Size) -> CropFrame {
        let layout = Rect::from_center_size(viewport.to_rect().center(), object);
        CropFrame::new(layout, self.restriction_for(viewport), self.scale_range)
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { name, value })
    }
}
