//! Position tracking for an axis.
//!
//! Provides absolute position tracking in steps with angle conversions.

use crate::config::units::{Radians, Steps};
use crate::motion::Direction;

/// Axis position tracker.
///
/// Maintains absolute position in steps and converts through the step angle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Current position in steps (from origin)
    steps: Steps,
    /// Angle of one step
    step_angle: Radians,
}

impl Position {
    /// Create a new position tracker at the origin.
    #[inline]
    pub fn new(step_angle: Radians) -> Self {
        Self {
            steps: Steps::default(),
            step_angle,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Get current position as an angle.
    #[inline]
    pub fn angle(&self) -> Radians {
        self.steps.to_radians(self.step_angle)
    }

    /// Set position in steps.
    #[inline]
    pub fn set_steps(&mut self, steps: Steps) {
        self.steps = steps;
    }

    /// Set position from an angle, rounded to the nearest step.
    #[inline]
    pub fn set_angle(&mut self, angle: Radians) {
        self.steps = Steps::from_radians(angle, self.step_angle);
    }

    /// Record one step in `direction`.
    #[inline]
    pub fn advance(&mut self, direction: Direction) {
        self.steps = Steps(self.steps.0 + direction.sign());
    }

    /// Get the step angle.
    #[inline]
    pub fn step_angle(&self) -> Radians {
        self.step_angle
    }

    /// Steps from here to an absolute angle.
    #[inline]
    pub fn steps_to(&self, target: Radians) -> i64 {
        Steps::from_radians(target, self.step_angle).0 - self.steps.0
    }
}
