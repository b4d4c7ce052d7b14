//! Axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::motion::DEFAULT_STAIRS;

use super::units::{DegreesPerSec, DegreesPerSecSquared, Microsteps};

/// Timer tick frequency used when a configuration does not specify one.
pub const DEFAULT_TIMER_FREQUENCY_HZ: u32 = 16_000_000;

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Base motor steps per revolution (typically 200 or 400).
    pub steps_per_revolution: u16,

    /// Microstep setting (1, 2, 4, 8, 16, 32, etc.).
    pub microsteps: Microsteps,

    /// Gear ratio (output:input, e.g. 35.0 for a worm drive).
    #[serde(default = "default_gear_ratio")]
    pub gear_ratio: f32,

    /// Maximum slew speed of the axis in degrees per second.
    #[serde(rename = "max_speed_deg_per_sec")]
    pub max_speed: DegreesPerSec,

    /// Axis acceleration in degrees per second squared.
    #[serde(rename = "acceleration_deg_per_sec2")]
    pub acceleration: DegreesPerSecSquared,

    /// Number of ramp stairs (power of two, 1..=128).
    #[serde(default = "default_ramp_stairs")]
    pub ramp_stairs: u8,

    /// Tick frequency of the axis timer.
    #[serde(default = "default_timer_frequency")]
    pub timer_frequency_hz: u32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,
}

fn default_gear_ratio() -> f32 {
    1.0
}

fn default_ramp_stairs() -> u8 {
    DEFAULT_STAIRS
}

fn default_timer_frequency() -> u32 {
    DEFAULT_TIMER_FREQUENCY_HZ
}

impl AxisConfig {
    /// Calculate total steps per output revolution.
    pub fn total_steps_per_revolution(&self) -> u32 {
        (self.steps_per_revolution as f32 * self.microsteps.value() as f32 * self.gear_ratio)
            as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_steps() {
        let config = AxisConfig {
            name: String::try_from("ra").unwrap(),
            steps_per_revolution: 400,
            microsteps: Microsteps::SIXTEENTH,
            gear_ratio: 35.0,
            max_speed: DegreesPerSec(2.0),
            acceleration: DegreesPerSecSquared(1.0),
            ramp_stairs: DEFAULT_STAIRS,
            timer_frequency_hz: DEFAULT_TIMER_FREQUENCY_HZ,
            invert_direction: false,
        };

        // 400 * 16 * 35.0 = 224000
        assert_eq!(config.total_steps_per_revolution(), 224_000);
    }
}
