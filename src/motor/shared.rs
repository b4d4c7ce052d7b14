//! Interrupt-safe holder for an axis.
//!
//! Foreground code and the timer interrupt both need the same [`Stepper`].
//! [`SharedStepper`] is meant to live in a `static` and hands out access only
//! inside a critical section, so a foreground re-plan can never interleave
//! with a step.
//!
//! ```rust,ignore
//! static RA_AXIS: SharedStepper<RaDriver, OverflowScheduler<Timer1>> = SharedStepper::new();
//!
//! RA_AXIS.install(stepper);
//! RA_AXIS.with(|axis| axis.run(SIDEREAL_RATE))??;
//!
//! #[interrupt]
//! fn TIMER1_OVF() {
//!     let _ = RA_AXIS.on_overflow();
//! }
//!
//! #[interrupt]
//! fn TIMER1_COMPA() {
//!     let _ = RA_AXIS.on_compare_match();
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::units::Steps;
use crate::error::{Error, MotorError, Result};
use crate::timer::{CompareCounter, IntervalTimer, OverflowScheduler};

use super::driver::StepDriver;
use super::stepper::Stepper;

/// A [`Stepper`] shared between foreground code and its timer interrupt.
pub struct SharedStepper<D, T> {
    inner: Mutex<RefCell<Option<Stepper<D, T>>>>,
}

impl<D, T> SharedStepper<D, T> {
    /// An empty slot, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<D, T> Default for SharedStepper<D, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, T> SharedStepper<D, T>
where
    D: StepDriver,
    T: IntervalTimer,
{
    /// Install an axis, returning the one it replaces.
    pub fn install(&self, mut stepper: Stepper<D, T>) -> Option<Stepper<D, T>> {
        stepper.set_deferred_completion(true);
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(stepper))
            .map(detach)
    }

    /// Remove the axis.
    pub fn take(&self) -> Option<Stepper<D, T>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take()).map(detach)
    }

    /// Run `f` on the axis with interrupts masked.
    ///
    /// A completion callback that came due inside `f` is called once the axis
    /// is released and interrupts are restored.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::NotInstalled` if no axis is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut Stepper<D, T>) -> R) -> Result<R> {
        let (result, completed) = critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let stepper = slot.as_mut().ok_or(MotorError::NotInstalled)?;
            let result = f(stepper);
            Ok::<_, Error>((result, stepper.take_completed()))
        })?;

        if let Some(callback) = completed {
            callback();
        }
        Ok(result)
    }

    /// Position read with interrupts masked.
    pub fn position(&self) -> Result<Steps> {
        self.with(|stepper| stepper.position())
    }

    /// Whether the axis is moving.
    pub fn is_running(&self) -> Result<bool> {
        self.with(|stepper| stepper.is_running())
    }

    /// Timer expiry entry point for interrupt handlers.
    pub fn on_interrupt(&self) -> Result<()> {
        self.with(|stepper| stepper.on_timer_interrupt())?
    }
}

fn detach<D, T>(mut stepper: Stepper<D, T>) -> Stepper<D, T>
where
    D: StepDriver,
    T: IntervalTimer,
{
    stepper.set_deferred_completion(false);
    stepper
}

impl<D, C> SharedStepper<D, OverflowScheduler<C>>
where
    D: StepDriver,
    C: CompareCounter,
{
    /// Counter overflow entry point.
    pub fn on_overflow(&self) -> Result<()> {
        self.with(|stepper| stepper.timer_mut().on_overflow())
    }

    /// Compare-match entry point; steps the axis when the interval expired.
    pub fn on_compare_match(&self) -> Result<()> {
        self.with(|stepper| {
            if stepper.timer_mut().on_compare_match() {
                stepper.on_timer_interrupt()
            } else {
                Ok(())
            }
        })?
    }
}
