//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, AxisConstraints, SystemConfig};

/// Validate a system configuration.
///
/// Checks, per axis:
/// - Gear ratio, max speed and acceleration are positive
/// - The acceleration ramp can be derived from the axis parameters
///
/// Axes are checked in declaration order; the first failure is returned.
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for axis in config.axes.values() {
        validate_axis(axis)?;
    }

    Ok(())
}

fn validate_axis(config: &AxisConfig) -> Result<()> {
    // Gear ratio must be positive
    if !(config.gear_ratio > 0.0) {
        return Err(Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)));
    }

    if !(config.max_speed.0 > 0.0) {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(config.max_speed.0)));
    }

    if !(config.acceleration.0 > 0.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration.0,
        )));
    }

    // Stair count, timer frequency and step geometry are checked by the derivation
    AxisConstraints::from_config(config).ramp()?;

    Ok(())
}
