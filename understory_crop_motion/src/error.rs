// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Rejected configuration values.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The scale range does not satisfy `min <= 1 <= max`.
    #[error("scale range must satisfy min <= 1 <= max, got {min}..{max}")]
    InvalidScaleRange {
        /// Requested minimum scale.
        min: f64,
        /// Requested maximum scale.
        max: f64,
    },
    /// A result size fraction lies outside `0..=1`.
    #[error("{name} must be a fraction in 0..=1, got {value}")]
    FractionOutOfRange {
        /// Which setting was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The maximum scale lies outside the supported `1..=5`.
    #[error("max scale must be within 1..=5, got {0}")]
    MaxScaleOutOfRange(f64),
    /// A physics parameter must be finite and strictly positive.
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Reasons a crop request is refused.
///
/// A refused crop never mutates the transform; callers are expected to wait
/// for motion to settle (or report the failure) and try again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CropError {
    /// No crop session has been started.
    #[error("no crop session is active")]
    NoSession,
    /// A fling, correction, or gesture is still in progress.
    #[error("the object is still moving")]
    NotSettled,
    /// The object does not fully cover the restriction rectangle.
    #[error("the object does not cover the crop area")]
    OutOfBounds,
}
