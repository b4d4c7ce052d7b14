//! Motion profile types.
//!
//! A planned move is a trapezoidal profile split into up to four phases:
//! pre-deceleration, acceleration, constant run, deceleration.

/// Direction of axis motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count.
    Forward,
    /// Negative step count.
    Reverse,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Whether this is the forward direction.
    #[inline]
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}

/// Phase of the step the axis will take next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Stopped.
    #[default]
    Idle,
    /// Decelerating before a direction change or speed reduction.
    PreDecelerating,
    /// Climbing the ramp.
    Accelerating,
    /// Constant interval, bounded or open-ended.
    Running,
    /// Descending the ramp to rest.
    Decelerating,
}

/// Distance a move covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Travel {
    /// A fixed number of steps.
    Steps(u32),
    /// Run until stopped or re-planned.
    Unbounded,
}

impl Travel {
    /// Add steps to a bounded travel.
    #[inline]
    pub fn extended(self, steps: u32) -> Self {
        match self {
            Travel::Steps(n) => Travel::Steps(n.saturating_add(steps)),
            Travel::Unbounded => Travel::Unbounded,
        }
    }
}

/// Phase lengths for one move.
///
/// The deceleration phase has no explicit length: after the run the axis
/// always descends the ramp from wherever it is to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionPlan {
    /// Direction of travel once any pre-deceleration is complete.
    pub direction: Direction,

    /// Steps to decelerate in the current direction before anything else.
    pub pre_decel_steps: u32,

    /// Steps to climb the ramp.
    pub accel_steps: u32,

    /// Steps at the run interval.
    pub run: Travel,

    /// Tick interval for the run phase.
    pub run_interval: u32,
}

impl MotionPlan {
    /// A plan that takes no step at all.
    pub fn empty(direction: Direction) -> Self {
        Self {
            direction,
            pre_decel_steps: 0,
            accel_steps: 0,
            run: Travel::Steps(0),
            run_interval: 0,
        }
    }

    /// A plan that only descends the ramp from its current position.
    pub fn decelerate(direction: Direction) -> Self {
        Self::empty(direction)
    }
}
