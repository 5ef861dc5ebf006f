// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Vec2};
use tracing::{debug, trace};

use crate::axis::{AxisController, AxisMotion};
use crate::bounds::{CropFrame, MIN_SCALE_EPSILON, is_within_bounds};
use crate::config::MotionConfig;
use crate::error::CropError;
use crate::geometry::{Axis, Transform, Velocity};
use crate::physics::{MotionState, Progress};
use crate::scale::{ScaleController, ScaleMotion};

/// Snapshot of the crop state, suitable for change notifications.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropInfo {
    /// Current transform of the object.
    pub transform: Transform,
    /// Current screen-space bounds of the object.
    pub object_bounds: Rect,
    /// Region the object must cover.
    pub restriction: Rect,
    /// Revision the snapshot was taken at.
    pub revision: u64,
}

/// Drives both translation axes and the scale of one object.
///
/// The orchestrator owns the shared [`Transform`]. Gesture input arrives as
/// plain numbers through the `on_*` methods; the host frame clock calls
/// [`MotionOrchestrator::tick`] while [`MotionOrchestrator::is_animating`]
/// reports `true`, and renders [`MotionOrchestrator::current_transform`].
///
/// Before [`MotionOrchestrator::begin_session`] every gesture is a no-op.
#[derive(Clone, Debug)]
pub struct MotionOrchestrator {
    config: MotionConfig,
    frame: Option<CropFrame>,
    transform: Transform,
    horizontal: AxisController,
    vertical: AxisController,
    scale: ScaleController,
    revision: u64,
}

impl Default for MotionOrchestrator {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

impl MotionOrchestrator {
    /// Creates an orchestrator with no active session.
    #[must_use]
    pub fn new(config: MotionConfig) -> Self {
        Self {
            horizontal: AxisController::new(Axis::Horizontal, &config),
            vertical: AxisController::new(Axis::Vertical, &config),
            scale: ScaleController::new(&config),
            config,
            frame: None,
            transform: Transform::IDENTITY,
            revision: 0,
        }
    }

    /// Physics configuration in use.
    #[must_use]
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Starts a crop session with `frame` and an initial placement.
    ///
    /// The initial transform is taken as-is; it is not corrected until the
    /// first gesture ends or [`MotionOrchestrator::settle`] is called.
    pub fn begin_session(&mut self, frame: CropFrame, initial: Transform) {
        debug!(?frame, ?initial, "crop session started");
        self.frame = Some(frame);
        self.transform = initial;
        self.horizontal.begin_session(frame, &self.transform);
        self.vertical.begin_session(frame, &self.transform);
        self.scale.begin_session(frame, &self.transform);
        self.revision += 1;
    }

    /// Ends the session, dropping all animations. The transform is kept.
    pub fn end_session(&mut self) {
        if self.frame.take().is_some() {
            debug!("crop session ended");
        }
        self.horizontal.end_session();
        self.vertical.end_session();
        self.scale.end_session();
    }

    /// Returns `true` while a session is active.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.frame.is_some()
    }

    /// Session geometry, if a session is active.
    #[must_use]
    pub fn frame(&self) -> Option<CropFrame> {
        self.frame
    }

    /// Replaces the session geometry after the viewport changed.
    ///
    /// Axes that are not flinging are corrected against the new geometry.
    pub fn set_frame(&mut self, frame: CropFrame) {
        if self.frame.is_none() || self.frame == Some(frame) {
            return;
        }
        debug!(?frame, "crop frame changed");
        self.frame = Some(frame);
        self.horizontal.set_frame(frame);
        self.vertical.set_frame(frame);
        self.scale.set_frame(frame);
        self.settle();
    }

    /// Replaces only the restriction rectangle.
    pub fn set_restriction(&mut self, restriction: Rect) {
        if let Some(frame) = self.frame {
            self.set_frame(CropFrame {
                restriction,
                ..frame
            });
        }
    }

    /// Region the object must cover, if a session is active.
    #[must_use]
    pub fn restriction(&self) -> Option<Rect> {
        self.frame.map(|frame| frame.restriction)
    }

    /// Current transform for rendering.
    #[must_use]
    pub fn current_transform(&self) -> Transform {
        self.transform
    }

    /// Current screen-space bounds of the object, if a session is active.
    #[must_use]
    pub fn object_bounds(&self) -> Option<Rect> {
        self.frame.map(|frame| self.transform.object_bounds(frame.layout))
    }

    /// Counter bumped every time the transform changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot of the current crop state, if a session is active.
    #[must_use]
    pub fn crop_info(&self) -> Option<CropInfo> {
        self.frame.map(|frame| CropInfo {
            transform: self.transform,
            object_bounds: self.transform.object_bounds(frame.layout),
            restriction: frame.restriction,
            revision: self.revision,
        })
    }

    /// Velocity of the running translation animations, per axis.
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        Velocity::new(self.horizontal.velocity(), self.vertical.velocity())
    }

    /// Motion state of one translation axis.
    #[must_use]
    pub fn axis_state(&self, axis: Axis) -> MotionState {
        self.axis(axis).state()
    }

    /// Motion state of the scale.
    #[must_use]
    pub fn scale_state(&self) -> MotionState {
        self.scale.state()
    }

    /// The controller for `axis`.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisController {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    /// The scale controller.
    #[must_use]
    pub fn scale_controller(&self) -> &ScaleController {
        &self.scale
    }

    /// Direct pan by `(dx, dy)`. Returns the new translation.
    pub fn on_pan_delta(&mut self, dx: f64, dy: f64) -> Vec2 {
        let before = self.transform;
        let x = self.horizontal.move_by(&mut self.transform, dx);
        let y = self.vertical.move_by(&mut self.transform, dy);
        self.commit(before);
        Vec2::new(x, y)
    }

    /// Pan gesture ended with release velocity `(vx, vy)`.
    ///
    /// Axes that are flinging are left alone; the others are corrected if
    /// they ended out of bounds. Returns the resting translation.
    pub fn on_pan_released(&mut self, vx: f64, vy: f64) -> Vec2 {
        let x = Self::release(&mut self.horizontal, &self.transform, vx);
        let y = Self::release(&mut self.vertical, &self.transform, vy);
        Vec2::new(x, y)
    }

    /// Fling with initial velocity `(vx, vy)` in view units per second.
    pub fn on_fling_velocity(&mut self, vx: f64, vy: f64) {
        self.horizontal.fling(&self.transform, vx);
        self.vertical.fling(&self.transform, vy);
    }

    /// Direct pinch by `factor`. Returns the new scale.
    pub fn on_pinch(&mut self, factor: f64) -> Vec2 {
        let before = self.transform;
        let scale = self.scale.scale(&mut self.transform, factor);
        self.commit(before);
        scale
    }

    /// Pinch gesture ended.
    ///
    /// The scale is corrected into range, and translation is corrected
    /// against the scale it will come to rest at. Returns the resting scale.
    pub fn on_pinch_released(&mut self) -> Vec2 {
        let target = self.scale.settle_scale_if_needed(&self.transform);
        Self::release(&mut self.horizontal, &self.transform, 0.0);
        Self::release(&mut self.vertical, &self.transform, 0.0);
        target
    }

    /// Corrects everything that is not flinging, with zero initial velocity.
    pub fn settle(&mut self) {
        self.scale.settle_scale_if_needed(&self.transform);
        Self::release(&mut self.horizontal, &self.transform, 0.0);
        Self::release(&mut self.vertical, &self.transform, 0.0);
    }

    /// Moves the object to an absolute translation and corrects from there.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let before = self.transform;
        self.horizontal.move_to(&mut self.transform, x);
        self.vertical.move_to(&mut self.transform, y);
        self.commit(before);
    }

    /// Returns the object to unit scale and zero translation.
    pub fn reset(&mut self) {
        let before = self.transform;
        self.scale.reset(&mut self.transform);
        self.horizontal.move_to(&mut self.transform, 0.0);
        self.vertical.move_to(&mut self.transform, 0.0);
        self.commit(before);
    }

    /// Advances every running animation by `dt` seconds.
    ///
    /// Returns [`Progress::Continuing`] while any controller still animates.
    pub fn tick(&mut self, dt: f64) -> Progress {
        let before = self.transform;
        let progress = self
            .horizontal
            .advance(&mut self.transform, dt)
            .and(self.vertical.advance(&mut self.transform, dt))
            .and(self.scale.advance(&mut self.transform, dt));
        trace!(dt, ?progress, transform = ?self.transform, "tick");
        self.commit(before);
        progress
    }

    /// Returns `true` while any controller is flinging or correcting.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        let animating = |state: MotionState| {
            matches!(state, MotionState::Flinging | MotionState::Correcting)
        };
        animating(self.horizontal.state())
            || animating(self.vertical.state())
            || animating(self.scale.state())
    }

    /// Returns `true` when a crop may proceed: nothing is moving and the
    /// object fully covers the restriction rectangle at an allowed scale.
    #[must_use]
    pub fn is_crop_allowed(&self) -> bool {
        self.check_crop().is_ok()
    }

    /// Restriction rectangle in the object's unscaled layout coordinates,
    /// relative to the layout origin.
    ///
    /// A crop executor maps this onto the source image. The request is
    /// refused, without touching the transform, unless
    /// [`MotionOrchestrator::is_crop_allowed`] holds.
    pub fn crop_region(&self) -> Result<Rect, CropError> {
        let frame = self.check_crop().inspect_err(|err| {
            debug!(%err, "crop rejected");
        })?;
        let bounds = self.transform.object_bounds(frame.layout);
        let sx = self.transform.scale.x.max(MIN_SCALE_EPSILON);
        let sy = self.transform.scale.y.max(MIN_SCALE_EPSILON);
        let r = frame.restriction;
        Ok(Rect::new(
            (r.x0 - bounds.x0) / sx,
            (r.y0 - bounds.y0) / sy,
            (r.x1 - bounds.x0) / sx,
            (r.y1 - bounds.y0) / sy,
        ))
    }

    fn check_crop(&self) -> Result<CropFrame, CropError> {
        let frame = self.frame.ok_or(CropError::NoSession)?;
        let idle = self.horizontal.state() == MotionState::Idle
            && self.vertical.state() == MotionState::Idle
            && self.scale.state() == MotionState::Idle;
        if !idle {
            return Err(CropError::NotSettled);
        }
        if !is_within_bounds(&self.transform, &frame) {
            return Err(CropError::OutOfBounds);
        }
        Ok(frame)
    }

    fn release(axis: &mut AxisController, transform: &Transform, velocity: f64) -> f64 {
        if axis.is_settled() {
            axis.settle_if_needed(transform, velocity)
        } else {
            axis.position()
        }
    }

    fn commit(&mut self, before: Transform) {
        if self.transform != before {
            self.revision += 1;
        }
    }
}
