//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use mount_stepper::load_config;
///
/// let config = load_config("mount.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::Config(ConfigError::IoError(truncated(&e.to_string()))))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(truncated(e.message()))))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

/// Copy as much of `message` as fits, cutting on a char boundary.
fn truncated<const N: usize>(message: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in message.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[axes.ra]
name = "Right Ascension"
steps_per_revolution = 400
microsteps = 16
gear_ratio = 35.0
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
"#;

        let config = parse_config(toml).unwrap();
        let ra = config.axis("ra").unwrap();
        assert_eq!(ra.ramp_stairs, 64);
        assert_eq!(ra.timer_frequency_hz, 16_000_000);
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/mount.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }

    #[test]
    fn test_truncated_message() {
        let short: heapless::String<4> = truncated("déclinaison");
        assert_eq!(short.as_str(), "déc");
    }
}
