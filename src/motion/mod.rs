//! Motion module for mount-stepper.
//!
//! Provides ramp derivation and move planning. Nothing here touches hardware.

mod math;
mod planner;
mod profile;
mod ramp;

pub use planner::{plan, MotionRequest, RampState};
pub use profile::{Direction, MotionPhase, MotionPlan, Travel};
pub use ramp::{RampParams, RampTable, DEFAULT_STAIRS, MAX_STAIRS};
