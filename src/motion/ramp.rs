//! Stair-step acceleration ramp.
//!
//! The ideal constant-acceleration step interval `c0 · (√(n+1) − √n)` is too
//! expensive to evaluate per step inside an interrupt handler, so the ramp is
//! quantised into a small table of "stairs". Each stair is held for a
//! power-of-two number of steps, which lets the state machine find the stair for
//! a ramp position with a shift instead of a division.
//!
//! The requested acceleration is inflated so that exactly `stairs` entries span
//! the whole speed range; holding each stair for `steps_per_stair` steps brings
//! the effective acceleration back down to (at least) the requested one. The
//! resulting ramp is slightly steeper than requested, never shallower.
//!
//! The table is derived by a `const fn`, so a `const` table with invalid
//! parameters fails the build:
//!
//! ```rust
//! use mount_stepper::config::units::{RadiansPerSec, RadiansPerSecSquared};
//! use mount_stepper::motion::{RampParams, RampTable};
//!
//! const RA_RAMP: RampTable = RampTable::new(RampParams {
//!     stairs: 64,
//!     timer_frequency_hz: 16_000_000,
//!     steps_per_revolution: 224_000,
//!     max_speed: RadiansPerSec(0.0349),
//!     acceleration: RadiansPerSecSquared(0.0175),
//! });
//!
//! assert_eq!(RA_RAMP.stairs(), 64);
//! ```

use crate::config::units::{Radians, RadiansPerSec, RadiansPerSecSquared};
use crate::error::RampError;

use super::math::{floor_pow2, sqrt};

/// Capacity of the interval table (the largest supported stair count).
pub const MAX_STAIRS: usize = 128;

/// Stair count used when a configuration does not specify one.
pub const DEFAULT_STAIRS: u8 = 64;

/// Physical parameters a ramp is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampParams {
    /// Number of speed stairs (power of two, `1..=128`).
    pub stairs: u8,
    /// Tick frequency of the interval timer.
    pub timer_frequency_hz: u32,
    /// Steps per output revolution, including microstepping and gearing.
    pub steps_per_revolution: u32,
    /// Highest speed the ramp reaches.
    pub max_speed: RadiansPerSec,
    /// Requested acceleration.
    pub acceleration: RadiansPerSecSquared,
}

/// Immutable table of inter-step tick intervals, one per stair.
///
/// `interval_for_stair(0)` is the `u32::MAX` sentinel standing for zero speed;
/// it is never waited on.
#[derive(Debug, Clone, PartialEq)]
pub struct RampTable {
    intervals: [u32; MAX_STAIRS],
    stairs: u8,
    steps_per_stair: u8,
    stair_shift: u8,
    timer_frequency_hz: u32,
    step_angle: f32,
    max_speed: f32,
    util_acceleration: f32,
    /// `timer_frequency · step_angle`
    speed_interval_numerator: f32,
    /// `2 · step_angle · util_acceleration`
    stair_divisor: f32,
}

impl RampTable {
    /// Derive a ramp, panicking on invalid parameters.
    ///
    /// Intended for `const` items, where the panic becomes a compile error.
    pub const fn new(params: RampParams) -> Self {
        match Self::try_new(params) {
            Ok(table) => table,
            Err(e) => panic!("{}", e.as_str()),
        }
    }

    /// Derive a ramp from physical parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`RampError`] naming the first violated invariant.
    pub const fn try_new(params: RampParams) -> Result<Self, RampError> {
        let stairs = params.stairs;
        if stairs == 0 || stairs > MAX_STAIRS as u8 || !stairs.is_power_of_two() {
            return Err(RampError::InvalidStairCount(stairs));
        }
        if params.timer_frequency_hz == 0 {
            return Err(RampError::InvalidTimerFrequency);
        }
        if params.steps_per_revolution == 0 {
            return Err(RampError::InvalidStepsPerRevolution);
        }

        let max_speed = params.max_speed.0 as f64;
        if !(max_speed > 0.0) {
            return Err(RampError::InvalidMaxSpeed);
        }
        let acceleration = params.acceleration.0 as f64;
        if !(acceleration > 0.0) {
            return Err(RampError::InvalidAcceleration);
        }

        let frequency = params.timer_frequency_hz as f64;
        let step_angle = 2.0 * core::f64::consts::PI / params.steps_per_revolution as f64;

        // steps an ideal ramp needs to reach max speed
        let max_steps = max_speed * max_speed / (2.0 * step_angle * acceleration);
        let util_acceleration = acceleration * max_steps / stairs as f64;

        let steps_per_stair_ideal = util_acceleration / acceleration;
        if !(steps_per_stair_ideal >= 1.0) || steps_per_stair_ideal > 128.0 {
            return Err(RampError::StepsPerStairOutOfRange);
        }
        let steps_per_stair = floor_pow2(steps_per_stair_ideal as u32);

        let c0 = frequency * sqrt(2.0 * step_angle / util_acceleration);
        if !(c0 < u32::MAX as f64) {
            return Err(RampError::IntervalOverflow);
        }

        let mut intervals = [0u32; MAX_STAIRS];
        intervals[0] = u32::MAX;
        if stairs > 1 {
            intervals[1] = c0 as u32;
            if intervals[1] == 0 {
                return Err(RampError::NonMonotonicIntervals);
            }
        }
        let mut i = 2;
        while i < stairs as usize {
            intervals[i] = (c0 * (sqrt((i + 1) as f64) - sqrt(i as f64))) as u32;
            if intervals[i] == 0 || intervals[i] >= intervals[i - 1] {
                return Err(RampError::NonMonotonicIntervals);
            }
            i += 1;
        }

        Ok(Self {
            intervals,
            stairs,
            steps_per_stair: steps_per_stair as u8,
            stair_shift: steps_per_stair.trailing_zeros() as u8,
            timer_frequency_hz: params.timer_frequency_hz,
            step_angle: step_angle as f32,
            max_speed: max_speed as f32,
            util_acceleration: util_acceleration as f32,
            speed_interval_numerator: (frequency * step_angle) as f32,
            stair_divisor: (2.0 * step_angle * util_acceleration) as f32,
        })
    }

    /// Number of stairs, including the zero-speed sentinel.
    #[inline]
    pub const fn stairs(&self) -> u8 {
        self.stairs
    }

    /// Steps spent on each stair while ramping.
    #[inline]
    pub const fn steps_per_stair(&self) -> u8 {
        self.steps_per_stair
    }

    /// Timer tick frequency the intervals are expressed in.
    #[inline]
    pub const fn timer_frequency_hz(&self) -> u32 {
        self.timer_frequency_hz
    }

    /// Angle covered by one step.
    #[inline]
    pub fn step_angle(&self) -> Radians {
        Radians(self.step_angle)
    }

    /// Speed at which the ramp saturates.
    #[inline]
    pub fn max_speed(&self) -> RadiansPerSec {
        RadiansPerSec(self.max_speed)
    }

    /// The inflated acceleration the table was computed with.
    #[inline]
    pub fn util_acceleration(&self) -> RadiansPerSecSquared {
        RadiansPerSecSquared(self.util_acceleration)
    }

    /// Tick interval for a stair; saturates to the last stair.
    #[inline]
    pub fn interval_for_stair(&self, stair: u8) -> u32 {
        self.interval_at(stair as u32)
    }

    /// Tick interval for a steady speed.
    ///
    /// Zero speed maps to `u32::MAX`; the result is never zero.
    pub fn interval_for_speed(&self, speed: RadiansPerSec) -> u32 {
        let speed = speed.abs();
        if !(speed > 0.0) {
            return u32::MAX;
        }
        let ticks = self.speed_interval_numerator / speed + 0.5;
        if ticks >= u32::MAX as f32 {
            u32::MAX
        } else {
            (ticks as u32).max(1)
        }
    }

    /// Highest stair a move at `speed` accelerates to.
    pub fn max_accel_stairs(&self, speed: RadiansPerSec) -> u8 {
        let last = self.stairs - 1;
        let speed = speed.abs();
        if speed >= self.max_speed {
            return last;
        }
        let stairs = (speed * speed) / self.stair_divisor + 0.5;
        if stairs >= last as f32 {
            last
        } else {
            stairs as u8
        }
    }

    /// Ramp position (in steps) corresponding to a stair.
    #[inline]
    pub fn level_for_stair(&self, stair: u8) -> u32 {
        (stair as u32) << self.stair_shift
    }

    /// Stair the axis is on after `level` ramp steps.
    #[inline]
    pub fn stair_for_level(&self, level: u32) -> u8 {
        ((level + self.steps_per_stair as u32 - 1) >> self.stair_shift) as u8
    }

    /// Steps into the current stair for a ramp position.
    #[inline]
    pub fn stair_step_for_level(&self, level: u32) -> u8 {
        (level.wrapping_sub(1) & (self.steps_per_stair as u32 - 1)) as u8
    }

    /// Interval before an accelerating step taken at ramp position `level`.
    #[inline]
    pub fn accel_interval(&self, level: u32) -> u32 {
        self.interval_at((level >> self.stair_shift) + 1)
    }

    /// Interval before a decelerating step leaving ramp position `level`.
    ///
    /// Mirrors [`accel_interval`](Self::accel_interval): decelerating from
    /// `level` to `level - 1` waits exactly as long as the step that
    /// accelerated from `level - 1` to `level`.
    #[inline]
    pub fn decel_interval(&self, level: u32) -> u32 {
        self.accel_interval(level.saturating_sub(1))
    }

    #[inline]
    fn interval_at(&self, stair: u32) -> u32 {
        let last = self.stairs as u32 - 1;
        self.intervals[stair.min(last) as usize]
    }
}
