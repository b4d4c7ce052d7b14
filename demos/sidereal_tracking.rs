//! Example: slew an RA axis, then track at the sidereal rate.
//!
//! This example demonstrates how to:
//! - Define mount axes in TOML and derive their ramps
//! - Build a pin-driven axis over a software timer
//! - Share the axis between "foreground" and "interrupt" code
//! - Chain a slew into open-ended tracking from a completion callback
//!
//! The timer is simulated, so the example runs at host speed.
//!
//! Run with: `cargo run --example sidereal_tracking --features std`

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use mount_stepper::{
    AxisSystem, Degrees, MotionPhase, PinDriver, PolledTimer, RadiansPerSec, Result,
    SharedStepper,
};

const MOUNT_TOML: &str = r#"
[axes.ra]
name = "Right Ascension"
steps_per_revolution = 400
microsteps = 16
gear_ratio = 144.0
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0

[axes.dec]
name = "Declination"
steps_per_revolution = 400
microsteps = 16
gear_ratio = 144.0
max_speed_deg_per_sec = 2.0
acceleration_deg_per_sec2 = 1.0
invert_direction = true
"#;

/// One sidereal day in seconds.
const SIDEREAL_DAY: f32 = 86_164.09;

/// Earth's rotation rate.
const SIDEREAL_RATE: RadiansPerSec = RadiansPerSec(2.0 * core::f32::consts::PI / SIDEREAL_DAY);

static SLEW_DONE: AtomicBool = AtomicBool::new(false);
static STEP_PULSES: AtomicU32 = AtomicU32::new(0);

static RA: SharedStepper<PinDriver<StepPin, DirPin, HostDelay>, PolledTimer> =
    SharedStepper::new();

/// Runs once the slew has landed and starts tracking on the same axis.
fn on_slew_done() {
    SLEW_DONE.store(true, Ordering::SeqCst);
    if let Ok(Err(e)) = RA.with(|ra| ra.run(SIDEREAL_RATE)) {
        println!("  tracking failed to start: {e}");
    }
}

/// STEP pin that counts rising edges.
struct StepPin;

impl embedded_hal::digital::ErrorType for StepPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for StepPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        STEP_PULSES.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// DIR pin that reports changes.
struct DirPin;

impl embedded_hal::digital::ErrorType for DirPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for DirPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        println!("  DIR -> low");
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        println!("  DIR -> high");
        Ok(())
    }
}

/// Pulse-width delay; simulated time only advances through the timer.
struct HostDelay;

impl embedded_hal::delay::DelayNs for HostDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Let simulated time pass, stepping whenever the timer expires, until
/// `ticks` have elapsed or `done` returns true. Returns the ticks simulated.
fn simulate(ticks: u64, done: impl Fn() -> bool) -> Result<u64> {
    let mut elapsed = 0u64;
    while elapsed < ticks && !done() {
        let Some(wait) = RA.with(|ra| ra.timer().remaining())? else {
            break;
        };
        let wait = (wait as u64).min(ticks - elapsed) as u32;
        RA.with(|ra| ra.poll(wait))??;
        elapsed += wait as u64;
    }
    Ok(elapsed)
}

fn main() -> Result<()> {
    println!("=== Sidereal Tracking Example ===\n");

    let config = mount_stepper::parse_config(MOUNT_TOML)?;
    let system = AxisSystem::from_config(config)?;

    for name in system.axis_names() {
        let constraints = system.constraints(name).expect("listed axis");
        let ramp = system.ramp(name).expect("listed axis");
        println!(
            "Axis '{}': {} steps/rev, {} stairs x {} steps",
            name,
            constraints.steps_per_revolution,
            ramp.stairs(),
            ramp.steps_per_stair()
        );
    }

    let frequency = system.constraints("ra").expect("ra axis").timer_frequency_hz;
    let ra = system.build_pin_axis("ra", StepPin, DirPin, HostDelay, PolledTimer::new(frequency))?;
    RA.install(ra);

    // Slew 10 degrees east at full speed; the callback takes over with tracking
    let target = Degrees(10.0).to_radians();
    RA.with(|ra| {
        let slew_speed = ra.ramp().max_speed();
        println!("\nSlewing to {:.2} deg at {:.4} rad/s", 10.0, slew_speed.0);
        ra.move_to_angle(slew_speed, target, Some(on_slew_done))
    })??;

    let slew_ticks = simulate(u64::MAX, || SLEW_DONE.load(Ordering::SeqCst))?;
    let (position, angle) = RA.with(|ra| (ra.position(), ra.position_angle()))?;
    println!(
        "Slew finished after {:.2} s at step {} ({:.4} deg), {} pulses",
        slew_ticks as f64 / frequency as f64,
        position.0,
        angle.to_degrees().0,
        STEP_PULSES.load(Ordering::Relaxed)
    );

    // Tracking was started by the callback; let a simulated minute pass
    println!("\nTracking at {:.3e} rad/s", SIDEREAL_RATE.0);
    simulate(60 * frequency as u64, || false)?;
    let (tracked, phase) = RA.with(|ra| (ra.position().0 - position.0, ra.phase()))?;
    println!("Tracked {} steps in 60 s ({:?})", tracked, phase);

    RA.with(|ra| ra.stop())??;
    simulate(u64::MAX, || !RA.is_running().unwrap_or(false))?;
    let ra = RA.take().expect("installed axis");
    assert_eq!(ra.phase(), MotionPhase::Idle);
    println!("\nStopped at {:.4} deg", ra.position_angle().to_degrees().0);

    println!("\n=== Example Complete ===");
    Ok(())
}
