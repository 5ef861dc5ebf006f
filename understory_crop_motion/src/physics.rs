// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick-driven motion primitives: a damped spring and a friction fling.
//!
//! Both integrate in closed form, so the result of a step depends only on the
//! elapsed time and not on how a span of time is divided into frames. Neither
//! owns a clock; callers advance them with the frame delta in seconds.

use crate::error::ConfigError;

/// Spring stiffness for a slow, gentle return.
pub const STIFFNESS_VERY_LOW: f64 = 50.0;
/// Spring stiffness for a moderately quick return.
pub const STIFFNESS_LOW: f64 = 200.0;
/// Damping ratio of a critically damped spring (no overshoot).
pub const DAMPING_RATIO_NO_BOUNCY: f64 = 1.0;
/// Default fling friction.
pub const DEFAULT_FRICTION: f64 = 3.0;

/// Smallest position change worth animating, for pixel-valued properties.
pub const MIN_VISIBLE_CHANGE_PIXELS: f64 = 1.0;
/// Smallest scale change worth animating.
pub const MIN_VISIBLE_CHANGE_SCALE: f64 = 1.0 / 500.0;

// Friction is expressed on a user-friendly scale; this converts it into the
// exponential decay rate per second.
const FRICTION_SCALE: f64 = -4.2;
// Settle thresholds: a fraction of the visible change for values, and that
// value threshold per 16 ms frame for velocities.
const VALUE_THRESHOLD_MULTIPLIER: f64 = 0.75;
const VELOCITY_THRESHOLD_MULTIPLIER: f64 = 1000.0 / 16.0;

/// Whether an animation still needs frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The animation has more motion to do; keep ticking.
    Continuing,
    /// The animation reached rest (or there was nothing to animate).
    Settled,
}

impl Progress {
    /// Combines two results; continuing wins.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        if self == Self::Continuing || other == Self::Continuing {
            Self::Continuing
        } else {
            Self::Settled
        }
    }

    /// Returns `true` for [`Progress::Settled`].
    #[must_use]
    pub fn is_settled(self) -> bool {
        self == Self::Settled
    }
}

/// What a controller is doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MotionState {
    /// At rest; nothing is animating.
    #[default]
    Idle,
    /// Following direct gesture input.
    Dragging,
    /// Coasting under friction after a fling.
    Flinging,
    /// Springing back toward a corrected target.
    Correcting,
}

/// Spring tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    stiffness: f64,
    damping_ratio: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::VERY_LOW_NO_BOUNCY
    }
}

impl SpringParams {
    /// Very low stiffness without overshoot: a slow, gentle snap.
    pub const VERY_LOW_NO_BOUNCY: Self = Self {
        stiffness: STIFFNESS_VERY_LOW,
        damping_ratio: DAMPING_RATIO_NO_BOUNCY,
    };

    /// Low stiffness without overshoot.
    pub const LOW_NO_BOUNCY: Self = Self {
        stiffness: STIFFNESS_LOW,
        damping_ratio: DAMPING_RATIO_NO_BOUNCY,
    };

    /// Creates spring parameters; both values must be finite and positive.
    pub fn new(stiffness: f64, damping_ratio: f64) -> Result<Self, ConfigError> {
        check_positive("stiffness", stiffness)?;
        check_positive("damping ratio", damping_ratio)?;
        Ok(Self {
            stiffness,
            damping_ratio,
        })
    }

    /// Spring stiffness (natural frequency squared, unit mass).
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping ratio; `1.0` is critically damped.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }
}

/// Fling tuning. Higher friction stops the fling sooner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrictionParams {
    friction: f64,
}

impl Default for FrictionParams {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
        }
    }
}

impl FrictionParams {
    /// Creates friction parameters; `friction` must be finite and positive.
    pub fn new(friction: f64) -> Result<Self, ConfigError> {
        check_positive("friction", friction)?;
        Ok(Self { friction })
    }

    /// The configured friction.
    #[must_use]
    pub fn friction(&self) -> f64 {
        self.friction
    }

    fn decay_rate(&self) -> f64 {
        self.friction * FRICTION_SCALE
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn value_threshold(min_visible_change: f64) -> f64 {
    min_visible_change.abs() * VALUE_THRESHOLD_MULTIPLIER
}

fn velocity_threshold(min_visible_change: f64) -> f64 {
    value_threshold(min_visible_change) * VELOCITY_THRESHOLD_MULTIPLIER
}

/// A damped spring pulling a value toward a fixed target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    params: SpringParams,
    target: f64,
    value: f64,
    velocity: f64,
    value_threshold: f64,
    velocity_threshold: f64,
}

impl Spring {
    /// Creates a spring at `start` moving with `velocity`, heading to `target`.
    ///
    /// `min_visible_change` sets the settle thresholds: the spring comes to
    /// rest once it is within a fraction of that distance of the target and
    /// slow enough that it would not move visibly in a frame.
    #[must_use]
    pub fn new(
        params: SpringParams,
        start: f64,
        velocity: f64,
        target: f64,
        min_visible_change: f64,
    ) -> Self {
        Self {
            params,
            target,
            value: start,
            velocity,
            value_threshold: value_threshold(min_visible_change),
            velocity_threshold: velocity_threshold(min_visible_change),
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Value the spring is pulling toward.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns `true` once the spring is close enough and slow enough to stop.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.velocity.abs() < self.velocity_threshold
            && (self.value - self.target).abs() < self.value_threshold
    }

    /// Advances the spring by `dt` seconds.
    ///
    /// On rest the value snaps exactly onto the target and velocity drops to
    /// zero.
    pub fn step(&mut self, dt: f64) -> Progress {
        let t = dt.max(0.0);
        let x0 = self.value - self.target;
        let v0 = self.velocity;
        let omega = libm::sqrt(self.params.stiffness);
        let zeta = self.params.damping_ratio;

        let (x, v) = if (zeta - 1.0).abs() < 1e-9 {
            // Critically damped.
            let b = v0 + omega * x0;
            let decay = libm::exp(-omega * t);
            let x = (x0 + b * t) * decay;
            let v = (b - omega * (x0 + b * t)) * decay;
            (x, v)
        } else if zeta > 1.0 {
            // Overdamped.
            let root = omega * libm::sqrt(zeta * zeta - 1.0);
            let gamma_plus = -zeta * omega + root;
            let gamma_minus = -zeta * omega - root;
            let b = (gamma_minus * x0 - v0) / (gamma_minus - gamma_plus);
            let a = x0 - b;
            let e_minus = libm::exp(gamma_minus * t);
            let e_plus = libm::exp(gamma_plus * t);
            let x = a * e_minus + b * e_plus;
            let v = a * gamma_minus * e_minus + b * gamma_plus * e_plus;
            (x, v)
        } else {
            // Underdamped.
            let damped = omega * libm::sqrt(1.0 - zeta * zeta);
            let cos_c = x0;
            let sin_c = (zeta * omega * x0 + v0) / damped;
            let decay = libm::exp(-zeta * omega * t);
            let (sin, cos) = (libm::sin(damped * t), libm::cos(damped * t));
            let x = decay * (cos_c * cos + sin_c * sin);
            let v = -zeta * omega * x + decay * damped * (sin_c * cos - cos_c * sin);
            (x, v)
        };

        self.value = self.target + x;
        self.velocity = v;
        if self.is_at_rest() {
            self.value = self.target;
            self.velocity = 0.0;
            Progress::Settled
        } else {
            Progress::Continuing
        }
    }
}

/// Momentum that decays exponentially under friction; it has no endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fling {
    decay_rate: f64,
    value: f64,
    velocity: f64,
    velocity_threshold: f64,
}

impl Fling {
    /// Creates a fling starting at `start` with `velocity` units per second.
    #[must_use]
    pub fn new(params: FrictionParams, start: f64, velocity: f64, min_visible_change: f64) -> Self {
        Self {
            decay_rate: params.decay_rate(),
            value: start,
            velocity,
            velocity_threshold: velocity_threshold(min_visible_change),
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Advances the fling by `dt` seconds, stopping once it is too slow to
    /// move visibly.
    pub fn step(&mut self, dt: f64) -> Progress {
        let t = dt.max(0.0);
        let decay = libm::exp(self.decay_rate * t);
        self.value += self.velocity / self.decay_rate * (decay - 1.0);
        self.velocity *= decay;
        if self.velocity.abs() < self.velocity_threshold {
            self.velocity = 0.0;
            Progress::Settled
        } else {
            Progress::Continuing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DAMPING_RATIO_NO_BOUNCY, Fling, FrictionParams, MIN_VISIBLE_CHANGE_PIXELS, Progress,
        Spring, SpringParams, STIFFNESS_LOW,
    };

    const FRAME: f64 = 1.0 / 60.0;

    fn run_spring(mut spring: Spring, max_frames: usize) -> (Spring, usize) {
        for frame in 1..=max_frames {
            if spring.step(FRAME) == Progress::Settled {
                return (spring, frame);
            }
        }
        (spring, max_frames + 1)
    }

    #[test]
    fn params_reject_non_positive_values() {
        assert!(SpringParams::new(0.0, 1.0).is_err());
        assert!(SpringParams::new(50.0, -1.0).is_err());
        assert!(SpringParams::new(f64::INFINITY, 1.0).is_err());
        assert!(FrictionParams::new(0.0).is_err());
        assert!(FrictionParams::new(3.0).is_ok());
    }

    #[test]
    fn critically_damped_spring_lands_on_target() {
        let spring = Spring::new(
            SpringParams::default(),
            120.0,
            0.0,
            0.0,
            MIN_VISIBLE_CHANGE_PIXELS,
        );
        let (spring, frames) = run_spring(spring, 600);
        assert!(frames <= 600, "spring did not settle");
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn no_bounce_spring_never_crosses_target_from_rest() {
        let mut spring = Spring::new(
            SpringParams::default(),
            -80.0,
            0.0,
            20.0,
            MIN_VISIBLE_CHANGE_PIXELS,
        );
        for _ in 0..600 {
            let done = spring.step(FRAME).is_settled();
            assert!(spring.value() <= 20.0 + 1e-9);
            if done {
                break;
            }
        }
        assert_eq!(spring.value(), 20.0);
    }

    #[test]
    fn under_and_over_damped_springs_converge() {
        for ratio in [0.2, 0.75, DAMPING_RATIO_NO_BOUNCY, 1.5, 4.0] {
            let params = SpringParams::new(STIFFNESS_LOW, ratio).unwrap();
            let spring = Spring::new(params, 0.0, 900.0, 50.0, MIN_VISIBLE_CHANGE_PIXELS);
            let (spring, frames) = run_spring(spring, 5_000);
            assert!(frames <= 5_000, "ratio {ratio} did not settle");
            assert_eq!(spring.value(), 50.0);
        }
    }

    #[test]
    fn spring_step_is_frame_rate_independent() {
        let params = SpringParams::new(STIFFNESS_LOW, 0.5).unwrap();
        let mut coarse = Spring::new(params, 10.0, -40.0, 0.0, MIN_VISIBLE_CHANGE_PIXELS);
        let mut fine = coarse;
        coarse.step(0.1);
        for _ in 0..10 {
            fine.step(0.01);
        }
        assert!((coarse.value() - fine.value()).abs() < 1e-9);
        assert!((coarse.velocity() - fine.velocity()).abs() < 1e-9);
    }

    #[test]
    fn spring_at_target_settles_immediately() {
        let mut spring = Spring::new(
            SpringParams::default(),
            5.0,
            0.0,
            5.0,
            MIN_VISIBLE_CHANGE_PIXELS,
        );
        assert!(spring.is_at_rest());
        assert_eq!(spring.step(FRAME), Progress::Settled);
    }

    #[test]
    fn fling_decays_and_travels_in_velocity_direction() {
        let mut fling = Fling::new(FrictionParams::default(), 0.0, 1_500.0, MIN_VISIBLE_CHANGE_PIXELS);
        let mut last_velocity = fling.velocity();
        let mut frames = 0;
        while fling.step(FRAME) == Progress::Continuing {
            assert!(fling.velocity() < last_velocity);
            last_velocity = fling.velocity();
            frames += 1;
            assert!(frames < 1_000, "fling did not stop");
        }
        assert!(fling.value() > 0.0);
        // Total travel approaches v0 / (friction * 4.2).
        assert!(fling.value() < 1_500.0 / (3.0 * 4.2));
        assert_eq!(fling.velocity(), 0.0);
    }

    #[test]
    fn higher_friction_stops_sooner() {
        let count = |friction: f64| {
            let params = FrictionParams::new(friction).unwrap();
            let mut fling = Fling::new(params, 0.0, 2_000.0, MIN_VISIBLE_CHANGE_PIXELS);
            let mut frames = 1;
            while fling.step(FRAME) == Progress::Continuing {
                frames += 1;
            }
            frames
        };
        assert!(count(6.0) < count(3.0));
    }

    #[test]
    fn progress_combines_toward_continuing() {
        assert_eq!(Progress::Settled.and(Progress::Settled), Progress::Settled);
        assert_eq!(Progress::Settled.and(Progress::Continuing), Progress::Continuing);
        assert!(Progress::Settled.is_settled());
    }
}
