//! # mount-stepper
//!
//! Real-time stepper motion engine for telescope mount axes, on embedded-hal 1.0.
//!
//! ## Features
//!
//! - **Stair-step ramps**: acceleration tables derived by `const fn`, so a bad
//!   parameter set is a build failure
//! - **Long intervals on 16-bit timers**: overflow-then-compare scheduling
//! - **Re-planning mid-motion**: speed changes and reversals always pass
//!   through the ramp, and every completed move lands exactly on target
//! - **Open-ended runs**: tracking at rates below the first ramp stair
//! - **no_std compatible**: core library works without standard library
//! - **Configuration-driven**: define axes in TOML files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mount_stepper::{AxisSystem, RadiansPerSec, SharedStepper, Steps};
//!
//! static RA: SharedStepper<RaDriver, OverflowScheduler<Timer1>> = SharedStepper::new();
//!
//! // Load configuration from TOML and derive the ramps
//! let system = AxisSystem::from_config(mount_stepper::load_config("mount.toml")?)?;
//!
//! // Hand the axis to the interrupt-safe slot
//! RA.install(system.build_pin_axis("ra", step_pin, dir_pin, delay, timer1)?);
//!
//! // Slew, then track
//! RA.with(|ra| ra.move_to(RadiansPerSec(0.03), Steps(120_000), Some(start_tracking)))??;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod timer;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, AxisConstraints, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionPhase, MotionPlan, MotionRequest, RampParams, RampTable, Travel};
pub use motor::{AxisSystem, OnComplete, PinDriver, SharedStepper, StepDriver, Stepper, StepperBuilder};
pub use timer::{CompareCounter, IntervalTimer, OverflowScheduler, PolledTimer};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{
    Degrees, DegreesPerSec, DegreesPerSecSquared, Microsteps, Radians, RadiansPerSec,
    RadiansPerSecSquared, Steps,
};
