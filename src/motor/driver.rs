//! Step/direction driver capability.
//!
//! The state machine only ever asks a driver for one pulse or a direction
//! change. [`PinDriver`] implements that over embedded-hal 1.0 output pins for
//! the common STEP/DIR driver boards.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};

/// STEP high time used unless configured otherwise.
pub const DEFAULT_PULSE_WIDTH_NS: u32 = 2_000;

/// Longest STEP high time accepted; the pulse is held inside the timer interrupt.
pub const MAX_PULSE_WIDTH_NS: u32 = 20_000;

/// Converts "step" and "set direction" into electrical signals.
pub trait StepDriver {
    /// Emit one step pulse.
    fn step(&mut self) -> Result<()>;

    /// Select the rotation direction for following pulses.
    fn set_direction(&mut self, forward: bool) -> Result<()>;
}

/// STEP/DIR driver over two embedded-hal output pins.
///
/// STEP is held high for a short, bounded pulse width so driver boards with a
/// minimum high time register every step. DIR is high for forward; wiring
/// inversion is applied by the [`Stepper`](super::Stepper).
#[derive(Debug)]
pub struct PinDriver<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = forward).
    dir_pin: DIR,

    /// Delay provider holding STEP high.
    delay: DELAY,

    /// STEP high time in nanoseconds.
    pulse_width_ns: u32,
}

impl<STEP, DIR, DELAY> PinDriver<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a driver over the given pins with the default pulse width.
    pub fn new(step_pin: STEP, dir_pin: DIR, delay: DELAY) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            pulse_width_ns: DEFAULT_PULSE_WIDTH_NS,
        }
    }

    /// Set the STEP high time, capped at [`MAX_PULSE_WIDTH_NS`].
    pub fn with_pulse_width_ns(mut self, pulse_width_ns: u32) -> Self {
        self.pulse_width_ns = pulse_width_ns.min(MAX_PULSE_WIDTH_NS);
        self
    }

    /// STEP high time in nanoseconds.
    #[inline]
    pub fn pulse_width_ns(&self) -> u32 {
        self.pulse_width_ns
    }

    /// Release the pins and the delay provider.
    pub fn release(self) -> (STEP, DIR, DELAY) {
        (self.step_pin, self.dir_pin, self.delay)
    }
}

impl<STEP, DIR, DELAY> StepDriver for PinDriver<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn step(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_ns(self.pulse_width_ns);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }

    fn set_direction(&mut self, forward: bool) -> Result<()> {
        if forward {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }
        Ok(())
    }
}
