// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_crop_motion --heading-base-level=0

//! Understory Crop Motion: constrained pan, fling, and zoom for crop views.
//!
//! This crate provides a small, headless motion core for placing an object
//! (typically an image) under a fixed crop area. The user can drag, fling and
//! pinch the object freely; whenever it would come to rest without fully
//! covering the crop area, or outside the allowed scale range, it springs back.
//!
//! It focuses on:
//! - Per-axis translation controllers arbitrating drag, fling, and spring
//!   correction, with exactly one live animation per axis.
//! - A scale controller with direct pinch updates and spring correction.
//! - Pure boundary resolution shared by all controllers.
//! - Crop gating: deciding when the object may be cropped, and which region.
//!
//! It does **not** capture input, render, or decode images. Callers are
//! expected to:
//! - Turn pointer/touch events into pan deltas, fling velocities and pinch
//!   factors.
//! - Drive [`MotionOrchestrator::tick`] from their frame clock while
//!   [`MotionOrchestrator::is_animating`] is `true`.
//! - Draw the object with [`Transform::to_affine`] and extract pixels from
//!   [`MotionOrchestrator::crop_region`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_crop_motion::{CropConfig, MotionOrchestrator, Transform};
//!
//! // 400x400 viewport, 600x400 image centred in it, 80% crop area.
//! let frame = CropConfig::default().frame_for(Size::new(400.0, 400.0), Size::new(600.0, 400.0));
//! let mut motion = MotionOrchestrator::default();
//! motion.begin_session(frame, Transform::IDENTITY);
//!
//! // Drag far to the right, then let go.
//! motion.on_pan_delta(250.0, 0.0);
//! motion.on_pan_released(0.0, 0.0);
//! assert!(motion.is_animating());
//! assert!(!motion.is_crop_allowed());
//!
//! // The host frame clock advances the snap-back.
//! while motion.is_animating() {
//!     motion.tick(1.0 / 60.0);
//! }
//! assert!(motion.is_crop_allowed());
//! let region = motion.crop_region().unwrap();
//! assert_eq!(region.width(), 320.0);
//! ```
//!
//! ## Design notes
//!
//! - Animations are advanced explicitly with a time delta; nothing runs on
//!   its own and nothing calls back into the caller.
//! - Both translation axes share one controller type parameterised by
//!   [`Axis`]; [`AxisMotion`] and [`ScaleMotion`] are the narrow seams.
//! - Springs and flings integrate in closed form, so results do not depend
//!   on the frame rate.
//! - An object smaller than the crop area on some axis is pinned to the near
//!   edge (left or top) rather than centred.
//!
//! State transitions are logged with `tracing` at `debug` level, per-frame
//! progress at `trace` level.
//!
//! This crate is `no_std`.

#![no_std]

mod axis;
mod bounds;
mod config;
mod error;
mod geometry;
mod orchestrator;
mod physics;
mod scale;

pub use axis::{AxisController, AxisMotion};
pub use bounds::{
    CropFrame, MIN_SCALE_EPSILON, ScaleRange, is_within_bounds, resolve_axis_correction,
    resolve_scale_correction,
};
pub use config::{
    CropConfig, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_RESULT_HEIGHT, DEFAULT_RESULT_WIDTH,
    MAX_SUPPORTED_SCALE, MotionConfig,
};
pub use error::{ConfigError, CropError};
pub use geometry::{Axis, Transform, Velocity};
pub use orchestrator::{CropInfo, MotionOrchestrator};
pub use physics::{
    DAMPING_RATIO_NO_BOUNCY, DEFAULT_FRICTION, Fling, FrictionParams, MIN_VISIBLE_CHANGE_PIXELS,
    MIN_VISIBLE_CHANGE_SCALE, MotionState, Progress, STIFFNESS_LOW, STIFFNESS_VERY_LOW, Spring,
    SpringParams,
};
pub use scale::{ScaleController, ScaleMotion};
