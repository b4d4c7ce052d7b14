//! Axis system facade for multi-axis configuration.
//!
//! Provides a high-level API for building several axes from a single configuration.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::{FnvIndexMap, String};

use crate::config::{AxisConfig, AxisConstraints, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::motion::RampTable;
use crate::timer::IntervalTimer;

use super::builder::StepperBuilder;
use super::driver::{PinDriver, StepDriver};
use super::stepper::Stepper;

/// A facade for building mount axes from configuration.
///
/// Ramp tables are derived once per axis when the system is created. Axes are
/// planned independently; the system does not synchronise them.
///
/// # Example
///
/// ```rust,ignore
/// use mount_stepper::AxisSystem;
///
/// let config = mount_stepper::parse_config(MOUNT_TOML)?;
/// let mut system = AxisSystem::from_config(config)?;
///
/// let ra = system.build_pin_axis("ra", ra_step, ra_dir, delay, ra_timer)?;
/// let dec = system.build_pin_axis("dec", dec_step, dec_dir, delay, dec_timer)?;
/// ```
pub struct AxisSystem {
    /// The system configuration.
    config: SystemConfig,
    /// Derived ramp per axis.
    ramps: FnvIndexMap<String<32>, RampTable, 8>,
}

impl AxisSystem {
    /// Create a system, deriving every axis ramp.
    ///
    /// # Errors
    ///
    /// Returns `Error::Ramp` if any axis has unusable ramp parameters.
    pub fn from_config(config: SystemConfig) -> Result<Self> {
        let mut ramps = FnvIndexMap::new();
        for (name, axis) in config.axes.iter() {
            let ramp = AxisConstraints::from_config(axis).ramp()?;
            // same capacity as the config map, cannot overflow
            let _ = ramps.insert(name.clone(), ramp);
        }
        Ok(Self { config, ramps })
    }

    /// Get the system configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Get an axis configuration by name.
    pub fn axis_config(&self, name: &str) -> Option<&AxisConfig> {
        self.config.axis(name)
    }

    /// Get derived constraints for an axis by name.
    pub fn constraints(&self, name: &str) -> Option<AxisConstraints> {
        self.config.axis(name).map(AxisConstraints::from_config)
    }

    /// Get the derived ramp for an axis by name.
    pub fn ramp(&self, name: &str) -> Option<&RampTable> {
        self.ramps
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Check if an axis name exists in the configuration.
    pub fn has_axis(&self, name: &str) -> bool {
        self.config.axis(name).is_some()
    }

    /// List all configured axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.config.axis_names()
    }

    /// Build an axis over any driver and timer, honouring the configured
    /// direction inversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is not configured or the timer frequency
    /// does not match the configuration.
    pub fn build_axis<D, T>(&self, name: &str, driver: D, timer: T) -> Result<Stepper<D, T>>
    where
        D: StepDriver,
        T: IntervalTimer,
    {
        let config = self.config.axis(name).ok_or_else(|| not_found(name))?;
        let ramp = self.ramp(name).ok_or_else(|| not_found(name))?;

        StepperBuilder::new()
            .invert_direction(config.invert_direction)
            .driver(driver)
            .timer(timer)
            .ramp(ramp.clone())
            .build()
    }

    /// Build an axis driving STEP/DIR pins, honouring the configured inversion.
    ///
    /// # Errors
    ///
    /// Same as [`build_axis`](Self::build_axis).
    pub fn build_pin_axis<STEP, DIR, DELAY, T>(
        &self,
        name: &str,
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        timer: T,
    ) -> Result<Stepper<PinDriver<STEP, DIR, DELAY>, T>>
    where
        STEP: OutputPin,
        DIR: OutputPin,
        DELAY: DelayNs,
        T: IntervalTimer,
    {
        self.build_axis(name, PinDriver::new(step_pin, dir_pin, delay), timer)
    }
}

fn not_found(name: &str) -> Error {
    Error::Config(ConfigError::AxisNotFound(
        String::try_from(name).unwrap_or_default(),
    ))
}
