//! Unit tests for configuration validation.

use mount_stepper::config::{validate_config, SystemConfig};
use mount_stepper::error::{ConfigError, Error, RampError};

fn config(axis_body: &str) -> SystemConfig {
    let toml_str = format!(
        r#"
[axes.ra]
name = "Right Ascension"
steps_per_revolution = 200
microsteps = 16
{axis_body}
"#
    );
    toml::from_str(&toml_str).expect("Failed to parse TOML")
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = config(
        r#"
gear_ratio = 100.0
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
"#,
    );
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a non-positive gear ratio.
#[test]
fn test_invalid_gear_ratio() {
    let config = config(
        r#"
gear_ratio = 0.0
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidGearRatio(_)))
    ));
}

/// Test validation fails for a negative max speed.
#[test]
fn test_invalid_max_speed() {
    let config = config(
        r#"
max_speed_deg_per_sec = -2.0
acceleration_deg_per_sec2 = 1.0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidMaxSpeed(_)))
    ));
}

/// Test validation fails for zero acceleration.
#[test]
fn test_invalid_acceleration() {
    let config = config(
        r#"
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 0.0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAcceleration(_)))
    ));
}

/// Test validation fails for a stair count that is not a power of two.
#[test]
fn test_invalid_stair_count() {
    let config = config(
        r#"
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
ramp_stairs = 48
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Ramp(RampError::InvalidStairCount(48)))
    ));
}

/// Test validation fails when the ramp would need less than one step per stair.
#[test]
fn test_ramp_too_steep() {
    let config = config(
        r#"
max_speed_deg_per_sec = 1.0
acceleration_deg_per_sec2 = 10000.0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Ramp(RampError::StepsPerStairOutOfRange))
    ));
}

/// Test validation fails for a zero timer frequency.
#[test]
fn test_zero_timer_frequency() {
    let config = config(
        r#"
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
timer_frequency_hz = 0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Ramp(RampError::InvalidTimerFrequency))
    ));
}
