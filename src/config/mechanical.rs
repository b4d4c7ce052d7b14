//! Mechanical constraints derived from axis configuration.

use crate::error::Result;
use crate::motion::{RampParams, RampTable};

use super::axis::AxisConfig;
use super::units::{Radians, RadiansPerSec, RadiansPerSecSquared};

/// Derived mechanical parameters computed from axis configuration.
///
/// These are computed once at initialization and feed the ramp derivation.
#[derive(Debug, Clone)]
pub struct AxisConstraints {
    /// Total steps per output revolution (steps × microsteps × gear_ratio).
    pub steps_per_revolution: u32,

    /// Angle of one step at the output.
    pub step_angle: Radians,

    /// Maximum speed at the output.
    pub max_speed: RadiansPerSec,

    /// Acceleration at the output.
    pub acceleration: RadiansPerSecSquared,

    /// Ramp stair count.
    pub ramp_stairs: u8,

    /// Axis timer tick frequency.
    pub timer_frequency_hz: u32,
}

impl AxisConstraints {
    /// Compute constraints from axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        let steps_per_revolution = config.total_steps_per_revolution();
        let step_angle = if steps_per_revolution > 0 {
            2.0 * core::f32::consts::PI / steps_per_revolution as f32
        } else {
            0.0
        };

        Self {
            steps_per_revolution,
            step_angle: Radians(step_angle),
            max_speed: config.max_speed.to_radians(),
            acceleration: config.acceleration.to_radians(),
            ramp_stairs: config.ramp_stairs,
            timer_frequency_hz: config.timer_frequency_hz,
        }
    }

    /// Parameters for this axis' acceleration ramp.
    pub fn ramp_params(&self) -> RampParams {
        RampParams {
            stairs: self.ramp_stairs,
            timer_frequency_hz: self.timer_frequency_hz,
            steps_per_revolution: self.steps_per_revolution,
            max_speed: self.max_speed,
            acceleration: self.acceleration,
        }
    }

    /// Derive the acceleration ramp.
    ///
    /// # Errors
    ///
    /// Returns `Error::Ramp` if the parameters cannot produce a valid table.
    pub fn ramp(&self) -> Result<RampTable> {
        Ok(RampTable::try_new(self.ramp_params())?)
    }
}
