//! Unit tests for TOML configuration parsing.

use mount_stepper::config::{load_config, AxisConstraints, SystemConfig};

/// Test parsing a valid axis configuration from TOML.
#[test]
fn test_parse_axis_config() {
    let toml_str = r#"
[axes.ra]
name = "Right Ascension"
steps_per_revolution = 200
microsteps = 16
gear_ratio = 144.0
max_speed_deg_per_sec = 3.0
acceleration_deg_per_sec2 = 1.5
ramp_stairs = 32
timer_frequency_hz = 2000000
invert_direction = true
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let axis = config.axis("ra").expect("Axis not found");

    assert_eq!(axis.name.as_str(), "Right Ascension");
    assert_eq!(axis.steps_per_revolution, 200);
    assert_eq!(axis.microsteps.value(), 16);
    assert_eq!(axis.gear_ratio, 144.0);
    assert_eq!(axis.max_speed.0, 3.0);
    assert_eq!(axis.acceleration.0, 1.5);
    assert_eq!(axis.ramp_stairs, 32);
    assert_eq!(axis.timer_frequency_hz, 2_000_000);
    assert!(axis.invert_direction);
}

/// Test that optional fields fall back to their defaults.
#[test]
fn test_parse_axis_defaults() {
    let toml_str = r#"
[axes.focus]
name = "Focuser"
steps_per_revolution = 200
microsteps = 1
max_speed_deg_per_sec = 180.0
acceleration_deg_per_sec2 = 360.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let axis = config.axis("focus").expect("Axis not found");

    assert_eq!(axis.gear_ratio, 1.0);
    assert_eq!(axis.ramp_stairs, 64);
    assert_eq!(axis.timer_frequency_hz, 16_000_000);
    assert!(!axis.invert_direction);
}

/// Test parsing several axes keeps declaration order.
#[test]
fn test_parse_multiple_axes() {
    let toml_str = r#"
[axes.ra]
name = "Right Ascension"
steps_per_revolution = 400
microsteps = 32
max_speed_deg_per_sec = 4.0
acceleration_deg_per_sec2 = 2.0

[axes.dec]
name = "Declination"
steps_per_revolution = 400
microsteps = 32
max_speed_deg_per_sec = 4.0
acceleration_deg_per_sec2 = 2.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let names: Vec<_> = config.axis_names().collect();
    assert_eq!(names, vec!["ra", "dec"]);
    assert!(config.axis("alt").is_none());
}

/// Test derived constraints for a geared axis.
#[test]
fn test_constraints_from_config() {
    let toml_str = r#"
[axes.ra]
name = "Right Ascension"
steps_per_revolution = 200
microsteps = 16
gear_ratio = 180.0
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let constraints = AxisConstraints::from_config(config.axis("ra").unwrap());

    // 200 * 16 * 180
    assert_eq!(constraints.steps_per_revolution, 576_000);
    assert!((constraints.max_speed.0 - 2.0f32.to_radians()).abs() < 1e-6);

    let ramp = constraints.ramp().expect("Ramp should derive");
    assert_eq!(ramp.stairs(), 64);
    assert_eq!(ramp.timer_frequency_hz(), 16_000_000);
}

/// Test that a malformed file is reported as a parse error.
#[test]
fn test_parse_missing_field() {
    let toml_str = r#"
[axes.ra]
name = "Right Ascension"
microsteps = 16
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}

/// Test loading from a file that does not exist.
#[test]
fn test_load_missing_file() {
    let result = load_config("does/not/exist/mount.toml");
    assert!(matches!(
        result,
        Err(mount_stepper::Error::Config(
            mount_stepper::error::ConfigError::IoError(_)
        ))
    ));
}
