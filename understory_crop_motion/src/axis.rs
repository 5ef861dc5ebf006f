// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis translation controller.
//!
//! Each axis arbitrates between direct drags, friction flings, and spring
//! corrections. The live animation is held inside the controller's state, so
//! starting a new motion drops the old one and nothing from it can advance
//! afterwards.
//!
//! ## State machine
//!
//! ```text
//! Idle --move--> Dragging --release--> Idle | Correcting
//! Idle --fling--> Flinging --tick out of bounds--> Correcting
//!                 Flinging --comes to rest--> Idle
//! Correcting --spring at rest--> Idle
//! ```
//!
//! `move`, `fling` and `move_to` are accepted from any state.

use tracing::{debug, trace};

use crate::bounds::{CropFrame, resolve_axis_correction};
use crate::config::MotionConfig;
use crate::geometry::{Axis, Transform};
use crate::physics::{
    Fling, FrictionParams, MIN_VISIBLE_CHANGE_PIXELS, MotionState, Progress, Spring, SpringParams,
};

/// Translation motion along one axis.
///
/// Every operation takes the shared [`Transform`]; a controller only ever
/// touches its own axis' translation component.
pub trait AxisMotion {
    /// Cancels any animation and moves the object by `delta` immediately.
    ///
    /// Returns the new position, or the last known position when no session
    /// is active. A non-finite `delta` is ignored.
    fn move_by(&mut self, transform: &mut Transform, delta: f64) -> f64;

    /// Starts a spring back into bounds if the object is out of bounds.
    ///
    /// Returns the spring's target, or the current position when no
    /// correction is needed (in which case no animation is started). A
    /// non-finite `velocity` is treated as zero.
    fn settle_if_needed(&mut self, transform: &Transform, velocity: f64) -> f64;

    /// Cancels any animation and starts a friction fling at `velocity`.
    ///
    /// A non-finite `velocity` is treated as zero.
    fn fling(&mut self, transform: &Transform, velocity: f64);

    /// Returns `true` unless a fling is in progress.
    fn is_settled(&self) -> bool;

    /// Jumps to `value` and corrects from there with zero initial velocity.
    ///
    /// A non-finite `value` is ignored.
    fn move_to(&mut self, transform: &mut Transform, value: f64);

    /// Advances the live animation by `dt` seconds.
    fn advance(&mut self, transform: &mut Transform, dt: f64) -> Progress;
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Idle,
    Dragging,
    Flinging(Fling),
    Correcting(Spring),
}

impl Motion {
    fn state(&self) -> MotionState {
        match self {
            Self::Idle => MotionState::Idle,
            Self::Dragging => MotionState::Dragging,
            Self::Flinging(_) => MotionState::Flinging,
            Self::Correcting(_) => MotionState::Correcting,
        }
    }
}

/// Controller for one translation axis.
#[derive(Clone, Debug)]
pub struct AxisController {
    axis: Axis,
    frame: Option<CropFrame>,
    motion: Motion,
    last_position: f64,
    spring: SpringParams,
    friction: FrictionParams,
}

impl AxisController {
    /// Creates an idle controller for `axis` with no session.
    #[must_use]
    pub fn new(axis: Axis, config: &MotionConfig) -> Self {
        Self {
            axis,
            frame: None,
            motion: Motion::Idle,
            last_position: 0.0,
            spring: config.spring,
            friction: config.friction,
        }
    }

    /// The axis this controller drives.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Current motion state.
    #[must_use]
    pub fn state(&self) -> MotionState {
        self.motion.state()
    }

    /// Last position this controller wrote or observed.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.last_position
    }

    /// Velocity of the running fling or correction; zero otherwise.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        match &self.motion {
            Motion::Flinging(fling) => fling.velocity(),
            Motion::Correcting(spring) => spring.velocity(),
            Motion::Idle | Motion::Dragging => 0.0,
        }
    }

    /// Target of the running correction, if any.
    #[must_use]
    pub fn correction_target(&self) -> Option<f64> {
        match &self.motion {
            Motion::Correcting(spring) => Some(spring.target()),
            _ => None,
        }
    }

    /// Attaches the controller to a session and syncs its position.
    pub fn begin_session(&mut self, frame: CropFrame, transform: &Transform) {
        self.frame = Some(frame);
        self.last_position = transform.translation_on(self.axis);
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

    fn transition(&mut self, next: Motion) {
        let from = self.motion.state();
        let to = next.state();
        if from != to {
            debug!(axis = ?self.axis, ?from, ?to, "axis motion changed");
        }
        self.motion = next;
    }

    fn write(&mut self, transform: &mut Transform, value: f64) {
        transform.set_translation_on(self.axis, value);
        self.last_position = value;
    }

    fn progress(&self) -> Progress {
        match self.motion {
            Motion::Flinging(_) | Motion::Correcting(_) => Progress::Continuing,
            Motion::Idle | Motion::Dragging => Progress::Settled,
        }
    }
}

impl AxisMotion for AxisController {
    fn move_by(&mut self, transform: &mut Transform, delta: f64) -> f64 {
        if self.frame.is_none() {
            return self.last_position;
        }
        if !delta.is_finite() {
            return transform.translation_on(self.axis);
        }
        self.transition(Motion::Dragging);
        let position = transform.translation_on(self.axis) + delta;
        self.write(transform, position);
        position
    }

    fn settle_if_needed(&mut self, transform: &Transform, velocity: f64) -> f64 {
        let Some(frame) = self.frame else {
            return self.last_position;
        };
        let velocity = finite_or_zero(velocity);
        let current = transform.translation_on(self.axis);
        self.last_position = current;

        let Some(target) = resolve_axis_correction(transform, &frame, self.axis) else {
            if self.motion == Motion::Dragging {
                self.transition(Motion::Idle);
            }
            return current;
        };

        if let Motion::Correcting(spring) = &self.motion
            && (spring.target() - target).abs() < f64::EPSILON
        {
            return target;
        }
        debug!(axis = ?self.axis, from = current, target, velocity, "correcting");
        self.transition(Motion::Correcting(Spring::new(
            self.spring,
            current,
            velocity,
            target,
            MIN_VISIBLE_CHANGE_PIXELS,
        )));
        target
    }

    fn fling(&mut self, transform: &Transform, velocity: f64) {
        if self.frame.is_none() {
            return;
        }
        let velocity = finite_or_zero(velocity);
        let start = transform.translation_on(self.axis);
        self.last_position = start;
        debug!(axis = ?self.axis, start, velocity, "fling");
        self.transition(Motion::Flinging(Fling::new(
            self.friction,
            start,
            velocity,
            MIN_VISIBLE_CHANGE_PIXELS,
        )));
    }

    fn is_settled(&self) -> bool {
        self.state() != MotionState::Flinging
    }

    fn move_to(&mut self, transform: &mut Transform, value: f64) {
        if self.frame.is_none() || !value.is_finite() {
            return;
        }
        self.transition(Motion::Idle);
        self.write(transform, value);
        self.settle_if_needed(transform, 0.0);
    }

    fn advance(&mut self, transform: &mut Transform, dt: f64) -> Progress {
        match &mut self.motion {
            Motion::Idle | Motion::Dragging => Progress::Settled,
            Motion::Flinging(fling) => {
                let progress = fling.step(dt);
                let (value, velocity) = (fling.value(), fling.velocity());
                trace!(axis = ?self.axis, value, velocity, "fling tick");
                self.write(transform, value);
                if progress.is_settled() {
                    self.transition(Motion::Idle);
                }
                // A fling that crosses the boundary hands over to a spring
                // carrying its current velocity.
                self.settle_if_needed(transform, velocity);
                self.progress()
            }
            Motion::Correcting(spring) => {
                let progress = spring.step(dt);
                let value = spring.value();
                trace!(axis = ?self.axis, value, velocity = spring.velocity(), "spring tick");
                self.write(transform, value);
                if progress.is_settled() {
                    self.transition(Motion::Idle);
                }
                progress
            }
        }
    }
}

fn finite_or_zero(velocity: f64) -> f64 {
    if velocity.is_finite() { velocity } else { 0.0 }
}
