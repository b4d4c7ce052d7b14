//! Error types for mount-stepper.
//!
//! Provides unified error handling across configuration, ramp derivation and motor control.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all mount-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor or timer operation error
    Motor(MotorError),
    /// Acceleration ramp derivation error
    Ramp(RampError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Invalid gear ratio (must be > 0)
    InvalidGearRatio(f32),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// A required builder field was not provided
    MissingField(&'static str),
    /// Timer and ramp disagree on the tick frequency
    TimerFrequencyMismatch {
        /// Frequency of the supplied timer
        timer: u32,
        /// Frequency the ramp was derived for
        ramp: u32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor and timer operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// STEP or DIR pin operation failed
    PinError,
    /// Shared axis accessed before a stepper was installed
    NotInstalled,
}

/// Ramp table derivation errors.
///
/// Kept `Copy` and payload-light so the derivation can run in `const` context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampError {
    /// Stair count must be a power of two in `1..=128`
    InvalidStairCount(u8),
    /// Timer frequency must be greater than zero
    InvalidTimerFrequency,
    /// Steps per revolution must be greater than zero
    InvalidStepsPerRevolution,
    /// Max speed must be greater than zero
    InvalidMaxSpeed,
    /// Acceleration must be greater than zero
    InvalidAcceleration,
    /// Steps per stair must land in `1..=128`
    StepsPerStairOutOfRange,
    /// First stair interval does not fit the 32 bit tick counter
    IntervalOverflow,
    /// Rounded intervals are not strictly decreasing (or reach zero)
    NonMonotonicIntervals,
}

impl RampError {
    /// Static description, usable from `const` context.
    pub const fn as_str(self) -> &'static str {
        match self {
            RampError::InvalidStairCount(_) => "stair count must be a power of two in 1..=128",
            RampError::InvalidTimerFrequency => "timer frequency must be greater than zero",
            RampError::InvalidStepsPerRevolution => "steps per revolution must be greater than zero",
            RampError::InvalidMaxSpeed => "max speed must be greater than zero",
            RampError::InvalidAcceleration => "acceleration must be greater than zero",
            RampError::StepsPerStairOutOfRange => "steps per stair must be in 1..=128",
            RampError::IntervalOverflow => "first stair interval exceeds u32 ticks",
            RampError::NonMonotonicIntervals => "ramp intervals are not strictly decreasing",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Ramp(e) => write!(f, "Ramp error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be > 0", v),
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidAcceleration(v) => write!(f, "Invalid acceleration: {}. Must be > 0", v),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            ConfigError::TimerFrequencyMismatch { timer, ramp } => write!(
                f,
                "Timer runs at {} Hz but the ramp was derived for {} Hz",
                timer, ramp
            ),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::NotInstalled => write!(f, "No stepper installed for this axis"),
        }
    }
}

impl fmt::Display for RampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RampError::InvalidStairCount(n) => write!(f, "Invalid stair count {}: {}", n, self.as_str()),
            _ => f.write_str(self.as_str()),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<RampError> for Error {
    fn from(e: RampError) -> Self {
        Error::Ramp(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for RampError {}
