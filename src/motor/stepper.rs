//! Per-axis motion state machine.
//!
//! A [`Stepper`] owns one axis: its driver, its interval timer, its ramp, and
//! the mutable motion state shared between foreground calls and the timer
//! interrupt. Foreground calls (`move_*`, `run`, `stop`) only plan and arm the
//! timer; every step is taken from [`Stepper::on_timer_interrupt`].
//!
//! Each interrupt issues the pulse first, then does its bookkeeping, so the
//! latency from interrupt to pulse does not depend on the phase:
//!
//! 1. step the driver and update the position,
//! 2. account the step against the phase it belonged to,
//! 3. select the phase of the next step and arm the timer with its interval,
//!    or come to rest and fire the completion callback.

use crate::config::units::{Radians, RadiansPerSec, Steps};
use crate::error::Result;
use crate::motion::{
    plan, Direction, MotionPhase, MotionPlan, MotionRequest, RampState, RampTable, Travel,
};
use crate::timer::{IntervalTimer, PolledTimer};

use super::driver::StepDriver;
use super::position::Position;

/// Completion notification, called once when the axis comes to rest.
///
/// Runs in interrupt context and must not block. Through a
/// [`SharedStepper`](super::SharedStepper) it is called after the axis has
/// been released, so it may start the next move on the same axis.
pub type OnComplete = fn();

/// Motion state machine for one axis.
#[derive(Debug)]
pub struct Stepper<D, T> {
    driver: D,
    timer: T,
    ramp: RampTable,
    position: Position,
    /// Direction of motion, `None` at rest.
    direction: Option<Direction>,
    /// Last direction written to the driver.
    driver_direction: Option<Direction>,
    /// Phase of the pending step.
    phase: MotionPhase,
    /// Ramp position in steps, `0` at rest or below the first stair.
    level: u32,
    /// What is left of the active plan.
    plan: MotionPlan,
    on_complete: Option<OnComplete>,
    /// Callback due but not yet called, when completion is deferred.
    completed: Option<OnComplete>,
    defer_completion: bool,
    /// Swap the meaning of the driver's direction signal.
    invert_direction: bool,
}

impl<D, T> Stepper<D, T>
where
    D: StepDriver,
    T: IntervalTimer,
{
    /// Create an idle axis at position zero.
    pub fn new(driver: D, timer: T, ramp: RampTable) -> Self {
        Self {
            driver,
            timer,
            position: Position::new(ramp.step_angle()),
            ramp,
            direction: None,
            driver_direction: None,
            phase: MotionPhase::Idle,
            level: 0,
            plan: MotionPlan::empty(Direction::Forward),
            on_complete: None,
            completed: None,
            defer_completion: false,
            invert_direction: false,
        }
    }

    /// Reset the timer to a stopped state. Call once before the first move.
    pub fn init(&mut self) {
        self.timer.init();
    }

    // ---- queries ----

    /// Current position in steps.
    #[inline]
    pub fn position(&self) -> Steps {
        self.position.steps()
    }

    /// Current position as an angle.
    #[inline]
    pub fn position_angle(&self) -> Radians {
        self.position.angle()
    }

    /// Redefine the current position without moving.
    pub fn set_position(&mut self, steps: Steps) {
        self.position.set_steps(steps);
    }

    /// Redefine the current position as an angle, rounded to the nearest step.
    pub fn set_position_angle(&mut self, angle: Radians) {
        self.position.set_angle(angle);
    }

    /// Whether the axis is moving (or about to).
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase != MotionPhase::Idle
    }

    /// Phase of the next step.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Ramp position in steps.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current ramp stair, `0` when stationary.
    #[inline]
    pub fn current_stair(&self) -> u8 {
        self.ramp.stair_for_level(self.level)
    }

    /// Steps already taken on the current stair.
    #[inline]
    pub fn stair_step(&self) -> u8 {
        if self.level == 0 {
            0
        } else {
            self.ramp.stair_step_for_level(self.level)
        }
    }

    /// `1` moving forward, `-1` moving in reverse, `0` at rest.
    #[inline]
    pub fn movement_direction(&self) -> i8 {
        self.direction.map_or(0, |d| d.sign() as i8)
    }

    /// The axis ramp.
    #[inline]
    pub fn ramp(&self) -> &RampTable {
        &self.ramp
    }

    /// The driver.
    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver, mutably.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The timer.
    #[inline]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// The timer, mutably.
    #[inline]
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Whether forward motion is signalled to the driver as reverse.
    #[inline]
    pub fn invert_direction(&self) -> bool {
        self.invert_direction
    }

    /// Swap the direction signal for motors wired the other way round.
    ///
    /// Takes effect on the next direction write; set it while the axis is idle.
    pub fn set_invert_direction(&mut self, invert: bool) {
        if invert != self.invert_direction {
            self.invert_direction = invert;
            self.driver_direction = None;
        }
    }

    /// Hold completion callbacks until [`take_completed`](Self::take_completed)
    /// instead of calling them from inside the axis.
    pub(crate) fn set_deferred_completion(&mut self, defer: bool) {
        self.defer_completion = defer;
    }

    /// Callback that came due while completion was deferred.
    pub(crate) fn take_completed(&mut self) -> Option<OnComplete> {
        self.completed.take()
    }

    /// Tear down the axis, returning driver and timer.
    pub fn release(mut self) -> (D, T) {
        self.timer.stop();
        (self.driver, self.timer)
    }

    // ---- commands ----

    /// Move to an absolute step position.
    ///
    /// The sign of `speed` is ignored; the direction follows the target.
    pub fn move_to(
        &mut self,
        speed: RadiansPerSec,
        target: Steps,
        on_complete: Option<OnComplete>,
    ) -> Result<()> {
        let delta = target.0.saturating_sub(self.position.steps().0);
        self.move_by(speed, delta, on_complete)
    }

    /// Move by a signed number of steps.
    ///
    /// The sign of `speed` is ignored; the direction follows `delta`. One move
    /// covers at most `u32::MAX` steps; a longer `delta` stops after that many.
    pub fn move_by(
        &mut self,
        speed: RadiansPerSec,
        delta: i64,
        on_complete: Option<OnComplete>,
    ) -> Result<()> {
        if is_zero(speed) {
            return self.stop_or_replace(on_complete);
        }
        let request = MotionRequest::by_steps(&self.ramp, speed, delta);
        self.start(request, on_complete)
    }

    /// Move at `speed` for `millis` milliseconds; the sign of `speed` picks the direction.
    pub fn move_for_duration(
        &mut self,
        speed: RadiansPerSec,
        millis: u32,
        on_complete: Option<OnComplete>,
    ) -> Result<()> {
        if is_zero(speed) {
            return self.stop_or_replace(on_complete);
        }
        let request = MotionRequest::for_duration(&self.ramp, speed, millis);
        self.start(request, on_complete)
    }

    /// Move to an absolute angle, rounded to the nearest step.
    pub fn move_to_angle(
        &mut self,
        speed: RadiansPerSec,
        target: Radians,
        on_complete: Option<OnComplete>,
    ) -> Result<()> {
        let delta = self.position.steps_to(target);
        self.move_by(speed, delta, on_complete)
    }

    /// Move by a relative angle, rounded to the nearest step.
    pub fn move_by_angle(
        &mut self,
        speed: RadiansPerSec,
        delta: Radians,
        on_complete: Option<OnComplete>,
    ) -> Result<()> {
        let steps = Steps::from_radians(delta, self.position.step_angle());
        self.move_by(speed, steps.0, on_complete)
    }

    /// Run at `speed` until stopped or given a new move.
    ///
    /// The sign of `speed` picks the direction. Any pending completion callback
    /// is dropped; arm one with [`stop_with`](Self::stop_with).
    pub fn run(&mut self, speed: RadiansPerSec) -> Result<()> {
        if is_zero(speed) {
            return self.stop();
        }
        let request = MotionRequest::continuous(&self.ramp, speed);
        self.start(request, None)
    }

    /// Decelerate to rest along the ramp.
    ///
    /// Keeps the completion callback of the current move. On an idle axis a
    /// pending callback fires immediately.
    pub fn stop(&mut self) -> Result<()> {
        let direction = match self.direction {
            Some(direction) if self.phase != MotionPhase::Idle => direction,
            _ => {
                self.complete();
                return Ok(());
            }
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("stop from level {} in {}", self.level, self.phase);

        self.begin(MotionPlan::decelerate(direction))
    }

    /// Decelerate to rest and call `on_complete` once there.
    pub fn stop_with(&mut self, on_complete: OnComplete) -> Result<()> {
        self.on_complete = Some(on_complete);
        self.stop()
    }

    /// Timer expiry handler. Takes exactly one step if the axis is moving.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if the driver fails; the axis is halted
    /// in place and its completion callback discarded.
    pub fn on_timer_interrupt(&mut self) -> Result<()> {
        let result = self.advance();
        if result.is_err() {
            self.halt();
        }
        result
    }

    // ---- internals ----

    fn stop_or_replace(&mut self, on_complete: Option<OnComplete>) -> Result<()> {
        match on_complete {
            Some(callback) => self.stop_with(callback),
            None => self.stop(),
        }
    }

    fn start(&mut self, request: MotionRequest, on_complete: Option<OnComplete>) -> Result<()> {
        self.on_complete = on_complete;
        let current = RampState {
            direction: if self.is_running() { self.direction } else { None },
            level: self.level,
        };
        let plan = plan(&self.ramp, current, &request);

        #[cfg(feature = "defmt")]
        defmt::debug!("plan {} from level {}", plan, self.level);

        self.begin(plan)
    }

    /// Install a plan from the foreground. The next interval counts from now.
    fn begin(&mut self, plan: MotionPlan) -> Result<()> {
        self.timer.stop();
        self.plan = plan;
        let result = self.schedule_next();
        if result.is_err() {
            self.halt();
        }
        result
    }

    fn advance(&mut self) -> Result<()> {
        let direction = match self.direction {
            Some(direction) if self.phase != MotionPhase::Idle => direction,
            _ => return Ok(()),
        };

        self.driver.step()?;
        self.position.advance(direction);

        match self.phase {
            MotionPhase::PreDecelerating => {
                self.level = self.level.saturating_sub(1);
                self.plan.pre_decel_steps = self.plan.pre_decel_steps.saturating_sub(1);
            }
            MotionPhase::Accelerating => {
                self.level += 1;
                self.plan.accel_steps = self.plan.accel_steps.saturating_sub(1);
            }
            MotionPhase::Running => {
                if let Travel::Steps(left) = &mut self.plan.run {
                    *left = left.saturating_sub(1);
                }
            }
            MotionPhase::Decelerating => {
                self.level = self.level.saturating_sub(1);
            }
            MotionPhase::Idle => {}
        }

        self.schedule_next()
    }

    /// Select the phase of the next step and arm the timer, or come to rest.
    fn schedule_next(&mut self) -> Result<()> {
        let (phase, interval) = if self.plan.pre_decel_steps > 0 {
            (MotionPhase::PreDecelerating, self.ramp.decel_interval(self.level))
        } else if self.plan.accel_steps > 0 {
            (MotionPhase::Accelerating, self.ramp.accel_interval(self.level))
        } else if self.plan.run != Travel::Steps(0) {
            (MotionPhase::Running, self.plan.run_interval)
        } else if self.level > 0 {
            (MotionPhase::Decelerating, self.ramp.decel_interval(self.level))
        } else {
            self.complete();
            return Ok(());
        };

        if phase != MotionPhase::PreDecelerating {
            self.set_direction(self.plan.direction)?;
        }
        self.phase = phase;
        self.timer.set_interval(interval);
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        // turning around is only allowed at rest
        debug_assert!(self.level == 0 || self.direction.map_or(true, |d| d == direction));

        if self.driver_direction != Some(direction) {
            self.driver
                .set_direction(direction.is_forward() != self.invert_direction)?;
            self.driver_direction = Some(direction);
        }
        self.direction = Some(direction);
        Ok(())
    }

    /// Come to rest and fire the completion callback, if any.
    fn complete(&mut self) {
        self.timer.stop();
        self.phase = MotionPhase::Idle;
        self.direction = None;
        self.level = 0;
        self.plan = MotionPlan::empty(Direction::Forward);
        if let Some(callback) = self.on_complete.take() {
            if self.defer_completion {
                self.completed = Some(callback);
            } else {
                callback();
            }
        }
    }

    /// Stop dead after a driver failure.
    fn halt(&mut self) {
        self.on_complete = None;
        self.driver_direction = None;
        self.complete();
    }
}

impl<D> Stepper<D, PolledTimer>
where
    D: StepDriver,
{
    /// Advance the polled timer by `elapsed` ticks and take every step that
    /// came due. Returns the number of steps taken.
    pub fn poll(&mut self, elapsed: u32) -> Result<u32> {
        let mut steps = 0;
        let mut due = self.timer.tick(elapsed);
        while due {
            self.on_timer_interrupt()?;
            steps += 1;
            due = self.timer.tick(0);
        }
        Ok(steps)
    }
}

fn is_zero(speed: RadiansPerSec) -> bool {
    !(speed.abs() > 0.0)
}
