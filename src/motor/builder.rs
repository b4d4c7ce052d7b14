//! Builder pattern for Stepper.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Steps;
use crate::config::{AxisConfig, AxisConstraints, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::motion::{RampParams, RampTable};
use crate::timer::IntervalTimer;

use super::driver::{PinDriver, StepDriver};
use super::stepper::Stepper;

/// Builder for creating Stepper instances.
pub struct StepperBuilder<D, T> {
    driver: Option<D>,
    timer: Option<T>,
    ramp: Option<RampTable>,
    ramp_params: Option<RampParams>,
    invert_direction: bool,
    position: Steps,
}

impl<D, T> Default for StepperBuilder<D, T>
where
    D: StepDriver,
    T: IntervalTimer,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, T> StepperBuilder<D, T>
where
    D: StepDriver,
    T: IntervalTimer,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            driver: None,
            timer: None,
            ramp: None,
            ramp_params: None,
            invert_direction: false,
            position: Steps::default(),
        }
    }

    /// Set the step/direction driver.
    pub fn driver(mut self, driver: D) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Set the interval timer.
    pub fn timer(mut self, timer: T) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Use a prebuilt ramp (typically a `const` table).
    pub fn ramp(mut self, ramp: RampTable) -> Self {
        self.ramp = Some(ramp);
        self
    }

    /// Derive the ramp from parameters at build time.
    pub fn ramp_params(mut self, params: RampParams) -> Self {
        self.ramp_params = Some(params);
        self
    }

    /// Swap the meaning of the driver's direction signal.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the starting position.
    pub fn position(mut self, steps: Steps) -> Self {
        self.position = steps;
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.ramp_params = Some(AxisConstraints::from_config(config).ramp_params());
        self.invert_direction = config.invert_direction;
        self
    }

    /// Configure from SystemConfig by axis name.
    pub fn from_config(self, config: &SystemConfig, axis_name: &str) -> Result<Self> {
        let axis_config = config.axis(axis_name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                heapless::String::try_from(axis_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_axis_config(axis_config))
    }

    /// Build the Stepper, initializing its timer.
    ///
    /// # Errors
    ///
    /// Returns an error if a required part is missing, the ramp cannot be
    /// derived, or the timer and ramp disagree on the tick frequency.
    pub fn build(self) -> Result<Stepper<D, T>> {
        let driver = self
            .driver
            .ok_or(Error::Config(ConfigError::MissingField("driver")))?;

        let timer = self
            .timer
            .ok_or(Error::Config(ConfigError::MissingField("timer")))?;

        let ramp = match (self.ramp, self.ramp_params) {
            (Some(ramp), _) => ramp,
            (None, Some(params)) => RampTable::try_new(params)?,
            (None, None) => return Err(Error::Config(ConfigError::MissingField("ramp"))),
        };

        if timer.frequency_hz() != ramp.timer_frequency_hz() {
            return Err(Error::Config(ConfigError::TimerFrequencyMismatch {
                timer: timer.frequency_hz(),
                ramp: ramp.timer_frequency_hz(),
            }));
        }

        let mut stepper = Stepper::new(driver, timer, ramp);
        stepper.init();
        stepper.set_invert_direction(self.invert_direction);
        stepper.set_position(self.position);
        Ok(stepper)
    }
}

impl<STEP, DIR, DELAY, T> StepperBuilder<PinDriver<STEP, DIR, DELAY>, T>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    T: IntervalTimer,
{
    /// Drive STEP/DIR pins directly, pulsing STEP for the default width.
    pub fn pins(mut self, step_pin: STEP, dir_pin: DIR, delay: DELAY) -> Self {
        self.driver = Some(PinDriver::new(step_pin, dir_pin, delay));
        self
    }
}
