// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale controller: direct pinch updates plus spring correction back into
//! `[1, max]`. Pinches have no throw, so there is no fling on scale.

use kurbo::Vec2;
use tracing::{debug, trace};

use crate::bounds::{CropFrame, resolve_scale_correction};
use crate::config::MotionConfig;
use crate::geometry::{Axis, Transform};
use crate::physics::{MIN_VISIBLE_CHANGE_SCALE, MotionState, Progress, Spring, SpringParams};

/// Scale motion of the object.
pub trait ScaleMotion {
    /// Cancels any correction and multiplies the scale by `factor` at once.
    ///
    /// Returns the new scale. Non-positive or non-finite factors are ignored.
    fn scale(&mut self, transform: &mut Transform, factor: f64) -> Vec2;

    /// Springs each scale component back into range if needed.
    ///
    /// A correction already running toward the same targets keeps going.
    /// Returns the scale the object will come to rest at.
    fn settle_scale_if_needed(&mut self, transform: &Transform) -> Vec2;

    /// Returns `true` while no animation needs to be waited on.
    ///
    /// Scale never flings, so this always holds.
    fn is_settled(&self) -> bool;

    /// Advances a running correction by `dt` seconds.
    fn advance(&mut self, transform: &mut Transform, dt: f64) -> Progress;
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Idle,
    Pinching,
    // One spring per component; `None` for components already in range.
    Correcting([Option<Spring>; 2]),
}

impl Motion {
    fn state(&self) -> MotionState {
        match self {
            Self::Idle => MotionState::Idle,
            Self::Pinching => MotionState::Dragging,
            Self::Correcting(_) => MotionState::Correcting,
        }
    }
}

/// Controller for the object's scale.
#[derive(Clone, Debug)]
pub struct ScaleController {
    frame: Option<CropFrame>,
    motion: Motion,
    last_scale: Vec2,
    spring: SpringParams,
}

impl ScaleController {
    /// Creates an idle controller with no session.
    #[must_use]
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            frame: None,
            motion: Motion::Idle,
            last_scale: Vec2::new(1.0, 1.0),
            spring: config.scale_spring,
        }
    }

    /// Current motion state. A live pinch reports [`MotionState::Dragging`].
    #[must_use]
    pub fn state(&self) -> MotionState {
        self.motion.state()
    }

    /// Last scale this controller wrote or observed.
    #[must_use]
    pub fn current(&self) -> Vec2 {
        self.last_scale
    }

    /// Attaches the controller to a session and syncs its scale.
    pub fn begin_session(&mut self, frame: CropFrame, transform: &Transform) {
        self.frame = Some(frame);
        self.last_scale = transform.scale;
        self.transition(Motion::Idle);
    }

    /// Replaces the session geometry, keeping the current motion.
    pub fn set_frame(&mut self, frame: CropFrame) {
        self.frame = Some(frame);
    }

    /// Detaches from the session and drops any animation.
    pub fn end_session(&mut self) {
        self.transition(Motion::Idle);
        self.frame = None;
    }

    /// Sets the scale back to `1` directly and settles from there.
    pub fn reset(&mut self, transform: &mut Transform) {
        if self.frame.is_none() {
            return;
        }
        self.transition(Motion::Pinching);
        transform.scale = Vec2::new(1.0, 1.0);
        self.last_scale = transform.scale;
        self.settle_scale_if_needed(transform);
    }

    fn transition(&mut self, next: Motion) {
        let from = self.motion.state();
        let to = next.state();
        if from != to {
            debug!(?from, ?to, "scale motion changed");
        }
        self.motion = next;
    }
}

impl ScaleMotion for ScaleController {
    fn scale(&mut self, transform: &mut Transform, factor: f64) -> Vec2 {
        let Some(frame) = self.frame else {
            return self.last_scale;
        };
        if !factor.is_finite() || factor <= 0.0 {
            return transform.scale;
        }
        self.transition(Motion::Pinching);
        let floor = frame.scale_range.min();
        for axis in Axis::ALL {
            let next = (transform.scale_on(axis) * factor).max(floor);
            transform.set_scale_on(axis, next);
        }
        self.last_scale = transform.scale;
        transform.scale
    }

    fn settle_scale_if_needed(&mut self, transform: &Transform) -> Vec2 {
        let Some(frame) = self.frame else {
            return self.last_scale;
        };
        self.last_scale = transform.scale;
        let range = frame.scale_range;

        let mut target = transform.scale;
        let mut targets = [None; 2];
        for axis in Axis::ALL {
            let to = resolve_scale_correction(transform.scale_on(axis), range.min(), range.max());
            if let Some(to) = to {
                axis.set(&mut target, to);
            }
            targets[axis.index()] = to;
        }

        if targets.iter().all(Option::is_none) {
            if self.motion == Motion::Pinching {
                self.transition(Motion::Idle);
            }
            return target;
        }
        if let Motion::Correcting(running) = &self.motion
            && Axis::ALL
                .into_iter()
                .all(|axis| running[axis.index()].map(|s| s.target()) == targets[axis.index()])
        {
            return target;
        }

        let mut springs = [None; 2];
        for axis in Axis::ALL {
            springs[axis.index()] = targets[axis.index()].map(|to| {
                Spring::new(
                    self.spring,
                    transform.scale_on(axis),
                    0.0,
                    to,
                    MIN_VISIBLE_CHANGE_SCALE,
                )
            });
        }
        debug!(from = ?transform.scale, to = ?target, "correcting scale");
        self.transition(Motion::Correcting(springs));
        target
    }

    fn is_settled(&self) -> bool {
        true
    }

    fn advance(&mut self, transform: &mut Transform, dt: f64) -> Progress {
        let Motion::Correcting(springs) = &mut self.motion else {
            return Progress::Settled;
        };
        let mut progress = Progress::Settled;
        for axis in Axis::ALL {
            if let Some(spring) = &mut springs[axis.index()] {
                progress = progress.and(spring.step(dt));
                transform.set_scale_on(axis, spring.value());
            }
        }
        trace!(scale = ?transform.scale, "scale tick");
        self.last_scale = transform.scale;
        if progress.is_settled() {
            self.transition(Motion::Idle);
        }
        progress
    }
}
