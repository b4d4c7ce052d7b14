//! Configuration module for mount-stepper.
//!
//! Provides types for loading and validating axis configurations from TOML
//! files (with `std` feature) or pre-parsed data.

mod axis;
mod mechanical;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxisConfig, DEFAULT_TIMER_FREQUENCY_HZ};
pub use mechanical::AxisConstraints;
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{
    Degrees, DegreesPerSec, DegreesPerSecSquared, Microsteps, Radians, RadiansPerSec,
    RadiansPerSecSquared, Steps,
};
