//! Move planning.
//!
//! Splits a request into pre-deceleration, acceleration, run and deceleration
//! phase lengths given where the axis currently sits on the ramp. The planner
//! is pure: the state machine in [`crate::motor::Stepper`] executes the plan.
//!
//! Positions on the ramp are counted in steps ("levels"): level `0` is rest,
//! each stair spans `steps_per_stair` levels, and descending from level `n`
//! to rest always takes exactly `n` steps. That last property is what lets
//! every completed move land exactly on its target.

use crate::config::units::RadiansPerSec;

use super::profile::{Direction, MotionPlan, Travel};
use super::ramp::RampTable;

/// A move request, resolved against a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionRequest {
    /// Direction of travel.
    pub direction: Direction,
    /// Steps to travel from the current position.
    pub travel: Travel,
    /// Tick interval at the requested speed.
    pub run_interval: u32,
    /// Stair the requested speed corresponds to.
    pub target_stair: u8,
}

impl MotionRequest {
    /// Travel `delta` steps; the sign of `delta` picks the direction.
    pub fn by_steps(ramp: &RampTable, speed: RadiansPerSec, delta: i64) -> Self {
        let steps = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
        Self::resolve(ramp, speed, Direction::from_steps(delta), Travel::Steps(steps))
    }

    /// Travel for `millis` at `speed`; the sign of `speed` picks the direction.
    pub fn for_duration(ramp: &RampTable, speed: RadiansPerSec, millis: u32) -> Self {
        let steps = speed.abs() / ramp.step_angle().value() * millis as f32 / 1000.0;
        let steps = if steps >= u32::MAX as f32 { u32::MAX } else { steps as u32 };
        Self::resolve(ramp, speed, speed_direction(speed), Travel::Steps(steps))
    }

    /// Run at `speed` until stopped; the sign of `speed` picks the direction.
    pub fn continuous(ramp: &RampTable, speed: RadiansPerSec) -> Self {
        Self::resolve(ramp, speed, speed_direction(speed), Travel::Unbounded)
    }

    fn resolve(ramp: &RampTable, speed: RadiansPerSec, direction: Direction, travel: Travel) -> Self {
        Self {
            direction,
            travel,
            run_interval: ramp.interval_for_speed(speed),
            target_stair: ramp.max_accel_stairs(speed),
        }
    }
}

fn speed_direction(speed: RadiansPerSec) -> Direction {
    if speed.value() >= 0.0 {
        Direction::Forward
    } else {
        Direction::Reverse
    }
}

/// Where an axis sits on the ramp when a move is planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RampState {
    /// Current direction, `None` when stopped.
    pub direction: Option<Direction>,
    /// Ramp position in steps.
    pub level: u32,
}

/// Plan a move from the current ramp state.
pub fn plan(ramp: &RampTable, current: RampState, request: &MotionRequest) -> MotionPlan {
    let target_level = ramp.level_for_stair(request.target_stair);
    let level = current.level;

    let moving = match current.direction {
        Some(direction) if level > 0 => direction,
        _ => {
            return from_rest(
                ramp,
                request.direction,
                request.travel,
                target_level,
                request.run_interval,
            )
        }
    };

    if request.direction != moving {
        // full stop first; the steps spent stopping are walked back afterwards
        let travel = request.travel.extended(level);
        return MotionPlan {
            pre_decel_steps: level,
            ..from_rest(ramp, request.direction, travel, target_level, request.run_interval)
        };
    }

    match request.travel {
        Travel::Steps(steps) if steps < level => {
            // cannot stop in time: overshoot, stop, and compensate backwards
            MotionPlan {
                pre_decel_steps: level,
                ..from_rest(
                    ramp,
                    moving.reversed(),
                    Travel::Steps(level - steps),
                    target_level,
                    request.run_interval,
                )
            }
        }
        travel => continue_moving(ramp, moving, level, travel, request, target_level),
    }
}

/// Same direction, enough room to come to rest at (or beyond) the target.
fn continue_moving(
    ramp: &RampTable,
    direction: Direction,
    level: u32,
    travel: Travel,
    request: &MotionRequest,
    target_level: u32,
) -> MotionPlan {
    let stair = ramp.stair_for_level(level);
    let base = MotionPlan::empty(direction);

    // after any change of stair the remaining steps are run, then the ramp is descended
    let run_after_level = |from_level: u32| match travel {
        Travel::Steps(steps) => Travel::Steps(steps - from_level),
        Travel::Unbounded => Travel::Unbounded,
    };

    if request.target_stair == stair {
        return MotionPlan {
            run: run_after_level(level),
            run_interval: request.run_interval,
            ..base
        };
    }

    if request.target_stair < stair {
        return MotionPlan {
            pre_decel_steps: level - target_level,
            run: run_after_level(level),
            run_interval: request.run_interval,
            ..base
        };
    }

    let climb = target_level - level;
    match travel {
        Travel::Unbounded => MotionPlan {
            accel_steps: climb,
            run: Travel::Unbounded,
            run_interval: request.run_interval,
            ..base
        },
        Travel::Steps(steps) if steps >= climb + target_level => MotionPlan {
            accel_steps: climb,
            run: Travel::Steps(steps - climb - target_level),
            run_interval: request.run_interval,
            ..base
        },
        Travel::Steps(steps) => {
            // triangular: climb part-way, descend from the peak
            let spare = steps - level;
            let accel_steps = spare / 2;
            MotionPlan {
                accel_steps,
                run: Travel::Steps(spare & 1),
                run_interval: ramp.decel_interval(level + accel_steps),
                ..base
            }
        }
    }
}

/// Plan starting at rest.
fn from_rest(
    ramp: &RampTable,
    direction: Direction,
    travel: Travel,
    target_level: u32,
    run_interval: u32,
) -> MotionPlan {
    let base = MotionPlan::empty(direction);

    match travel {
        Travel::Unbounded => MotionPlan {
            accel_steps: target_level,
            run: Travel::Unbounded,
            run_interval,
            ..base
        },
        // below the first stair: no ramp at all
        Travel::Steps(steps) if target_level == 0 => MotionPlan {
            run: Travel::Steps(steps),
            run_interval,
            ..base
        },
        Travel::Steps(steps) if steps >= 2 * target_level => MotionPlan {
            accel_steps: target_level,
            run: Travel::Steps(steps - 2 * target_level),
            run_interval,
            ..base
        },
        Travel::Steps(steps) => {
            let accel_steps = steps / 2;
            MotionPlan {
                accel_steps,
                run: Travel::Steps(steps & 1),
                run_interval: ramp.decel_interval(accel_steps),
                ..base
            }
        }
    }
}
