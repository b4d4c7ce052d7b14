//! Motor module for mount-stepper.
//!
//! Provides the per-axis motion state machine, the driver capability it steps
//! through, and the glue for sharing an axis with its timer interrupt.

mod builder;
mod driver;
mod position;
mod shared;
mod stepper;
mod system;

pub use builder::StepperBuilder;
pub use driver::{PinDriver, StepDriver};
pub use position::Position;
pub use shared::SharedStepper;
pub use stepper::{OnComplete, Stepper};
pub use system::AxisSystem;
