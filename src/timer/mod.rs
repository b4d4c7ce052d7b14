//! Interval timers.
//!
//! The stepper state machine only needs one capability from a timer: fire once
//! after N ticks, where N is re-armed from inside the handler before the next
//! firing. [`IntervalTimer`] is that capability.
//!
//! Two implementations are provided:
//!
//! - [`OverflowScheduler`] stretches a 16-bit compare/overflow counter to full
//!   32-bit intervals by counting overflows first and arming a single
//!   compare-match last.
//! - [`PolledTimer`] is driven by elapsed-tick reports from a periodic task, for
//!   targets without a spare timer interrupt (and for simulation).
//!
//! Neither masks interrupts itself. Callers reprogramming a timer that is also
//! serviced from an interrupt must hold a critical section, which
//! [`SharedStepper`](crate::motor::SharedStepper) does.

mod overflow;
mod polled;

pub use overflow::{CompareCounter, OverflowScheduler, COUNTER_PERIOD};
pub use polled::PolledTimer;

/// A one-shot, re-armable tick timer.
pub trait IntervalTimer {
    /// Tick frequency intervals are counted in.
    fn frequency_hz(&self) -> u32;

    /// Reset the counter hardware to a stopped state.
    fn init(&mut self);

    /// Arm the timer to expire `ticks` ticks from the last expiry, or from
    /// now when stopped. `ticks` is never zero.
    ///
    /// The expiry handler re-arms with this directly. Re-arming from anywhere
    /// else must [`stop`](Self::stop) first, or ticks already counted toward
    /// the old interval shorten or stretch the new one.
    fn set_interval(&mut self, ticks: u32);

    /// Disable the timer and zero its counter. Idempotent.
    fn stop(&mut self);
}
