//! Overflow-then-compare scheduling over a 16-bit counter.

use super::IntervalTimer;

/// Ticks in one full period of the hardware counter.
pub const COUNTER_PERIOD: u32 = 1 << 16;

/// Register-level access to a 16-bit timer/counter.
///
/// The counter raises an overflow interrupt each time it wraps and, in compare
/// mode, a compare-match interrupt when it reaches the compare register, after
/// which it restarts from zero. Implementations hold nothing but register
/// access; all bookkeeping lives in [`OverflowScheduler`].
pub trait CompareCounter {
    /// Tick frequency of the running counter.
    fn frequency_hz(&self) -> u32;

    /// Reset control registers and the counter, counter stopped, overflow
    /// interrupt enabled.
    fn reset(&mut self);

    /// Start counting.
    fn start(&mut self);

    /// Stop counting and zero the counter.
    fn halt(&mut self);

    /// Program the compare register.
    fn set_compare(&mut self, value: u16);

    /// Switch between free-running (overflow only) and clear-on-compare mode.
    ///
    /// Enabling compare mode must also clear a compare flag latched while the
    /// counter was free-running, or the compare interrupt fires immediately.
    fn set_compare_mode(&mut self, enabled: bool);
}

/// [`IntervalTimer`] over a [`CompareCounter`].
///
/// An interval of `ticks` is split into `overflows` full counter periods and a
/// final compare of `1..=65536` ticks. The overflow interrupt only counts down;
/// the compare-match that ends the interval is the single interrupt that does
/// real work. Both interrupt vectors must be routed here:
///
/// ```rust,ignore
/// #[interrupt]
/// fn TIMER1_OVF() {
///     let _ = RA_AXIS.on_overflow();
/// }
///
/// #[interrupt]
/// fn TIMER1_COMPA() {
///     let _ = RA_AXIS.on_compare_match();
/// }
/// ```
#[derive(Debug)]
pub struct OverflowScheduler<C> {
    counter: C,
    /// Full periods per interval.
    overflows: u16,
    /// Periods still to wait in the current interval.
    overflows_left: u16,
}

impl<C: CompareCounter> OverflowScheduler<C> {
    /// Wrap a counter. Call [`IntervalTimer::init`] before arming.
    pub const fn new(counter: C) -> Self {
        Self {
            counter,
            overflows: 0,
            overflows_left: 0,
        }
    }

    /// Split an interval into full counter periods and a final compare value.
    ///
    /// The compare part is always in `1..=COUNTER_PERIOD`, so
    /// `overflows · COUNTER_PERIOD + compare == ticks` for every non-zero
    /// interval.
    pub const fn decompose(ticks: u32) -> (u16, u32) {
        let ticks = if ticks == 0 { 1 } else { ticks };
        let overflows = (ticks - 1) >> 16;
        (overflows as u16, ticks - (overflows << 16))
    }

    /// Service the counter overflow interrupt.
    ///
    /// Overflows while the final compare is pending are ignored.
    pub fn on_overflow(&mut self) {
        if self.overflows_left == 0 {
            return;
        }
        self.overflows_left -= 1;
        if self.overflows_left == 0 {
            self.counter.set_compare_mode(true);
        }
    }

    /// Service the compare-match interrupt.
    ///
    /// Returns `true` when the armed interval has expired and the step handler
    /// should run. The same interval is re-armed; the handler may reprogram it.
    pub fn on_compare_match(&mut self) -> bool {
        if self.overflows_left != 0 {
            return false;
        }
        if self.overflows > 0 {
            self.counter.set_compare_mode(false);
            self.overflows_left = self.overflows;
        }
        true
    }

    /// The wrapped counter.
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// The wrapped counter, mutably.
    pub fn counter_mut(&mut self) -> &mut C {
        &mut self.counter
    }

    /// Unwrap the counter.
    pub fn release(self) -> C {
        self.counter
    }
}

impl<C: CompareCounter> IntervalTimer for OverflowScheduler<C> {
    fn frequency_hz(&self) -> u32 {
        self.counter.frequency_hz()
    }

    fn init(&mut self) {
        self.counter.reset();
        self.overflows = 0;
        self.overflows_left = 0;
    }

    fn set_interval(&mut self, ticks: u32) {
        let (overflows, compare) = Self::decompose(ticks);
        self.overflows = overflows;
        self.overflows_left = overflows;
        // clear-on-compare counts 0..=register, one tick more than the register value
        self.counter.set_compare((compare - 1) as u16);
        self.counter.set_compare_mode(overflows == 0);
        self.counter.start();
    }

    fn stop(&mut self) {
        self.counter.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tick-accurate model of a 16-bit counter with overflow and CTC compare.
    #[derive(Debug, Default)]
    struct SimCounter {
        count: u32,
        compare: u16,
        compare_mode: bool,
        running: bool,
        resets: u32,
    }

    enum Event {
        Overflow,
        Compare,
    }

    impl SimCounter {
        fn tick(&mut self) -> Option<Event> {
            if !self.running {
                return None;
            }
            self.count += 1;
            if self.compare_mode && self.count == self.compare as u32 + 1 {
                self.count = 0;
                return Some(Event::Compare);
            }
            if self.count == COUNTER_PERIOD {
                self.count = 0;
                return Some(Event::Overflow);
            }
            None
        }
    }

    impl CompareCounter for SimCounter {
        fn frequency_hz(&self) -> u32 {
            16_000_000
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.running = false;
            self.count = 0;
            self.compare_mode = false;
        }

        fn start(&mut self) {
            self.running = true;
        }

        fn halt(&mut self) {
            self.running = false;
            self.count = 0;
        }

        fn set_compare(&mut self, value: u16) {
            self.compare = value;
        }

        fn set_compare_mode(&mut self, enabled: bool) {
            self.compare_mode = enabled;
        }
    }

    /// Ticks until the scheduler reports expiry.
    fn ticks_to_expiry(scheduler: &mut OverflowScheduler<SimCounter>) -> u32 {
        let mut ticks = 0;
        loop {
            ticks += 1;
            match scheduler.counter_mut().tick() {
                Some(Event::Overflow) => scheduler.on_overflow(),
                Some(Event::Compare) => {
                    if scheduler.on_compare_match() {
                        return ticks;
                    }
                }
                None => {}
            }
            assert!(ticks < 1_000_000, "timer never fired");
        }
    }

    #[test]
    fn test_decompose() {
        type S = OverflowScheduler<SimCounter>;
        assert_eq!(S::decompose(1), (0, 1));
        assert_eq!(S::decompose(65_535), (0, 65_535));
        assert_eq!(S::decompose(65_536), (0, 65_536));
        assert_eq!(S::decompose(65_537), (1, 1));
        assert_eq!(S::decompose(131_072), (1, 65_536));
        assert_eq!(S::decompose(200_000), (3, 3_392));
        assert_eq!(S::decompose(u32::MAX), (65_535, 65_535));
    }

    #[test]
    fn test_interval_fires_after_exact_ticks() {
        for interval in [1, 2, 1_000, 65_535, 65_536, 65_537, 131_072, 200_000] {
            let mut scheduler = OverflowScheduler::new(SimCounter::default());
            scheduler.init();
            scheduler.set_interval(interval);

            assert_eq!(ticks_to_expiry(&mut scheduler), interval, "first period of {}", interval);
            // expiry re-arms the same interval
            assert_eq!(ticks_to_expiry(&mut scheduler), interval, "second period of {}", interval);
        }
    }

    #[test]
    fn test_reprogram_from_expiry() {
        let mut scheduler = OverflowScheduler::new(SimCounter::default());
        scheduler.init();
        scheduler.set_interval(150_000);
        assert_eq!(ticks_to_expiry(&mut scheduler), 150_000);

        scheduler.set_interval(500);
        assert_eq!(ticks_to_expiry(&mut scheduler), 500);

        scheduler.set_interval(70_000);
        assert_eq!(ticks_to_expiry(&mut scheduler), 70_000);
    }

    /// Run the counter for `ticks` ticks without reaching an expiry.
    fn run_for(scheduler: &mut OverflowScheduler<SimCounter>, ticks: u32) {
        for _ in 0..ticks {
            match scheduler.counter_mut().tick() {
                Some(Event::Overflow) => scheduler.on_overflow(),
                Some(Event::Compare) => assert!(!scheduler.on_compare_match(), "expired early"),
                None => {}
            }
        }
    }

    #[test]
    fn test_rearm_mid_interval_counts_from_now() {
        let mut scheduler = OverflowScheduler::new(SimCounter::default());
        scheduler.init();

        // counter already past the new compare value
        scheduler.set_interval(2_000);
        assert_eq!(ticks_to_expiry(&mut scheduler), 2_000);
        run_for(&mut scheduler, 1_500);
        scheduler.stop();
        scheduler.set_interval(1_000);
        assert_eq!(ticks_to_expiry(&mut scheduler), 1_000);

        // part-way through the overflow countdown
        scheduler.set_interval(200_000);
        assert_eq!(ticks_to_expiry(&mut scheduler), 200_000);
        run_for(&mut scheduler, 100_000);
        scheduler.stop();
        scheduler.set_interval(70_000);
        assert_eq!(ticks_to_expiry(&mut scheduler), 70_000);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut scheduler = OverflowScheduler::new(SimCounter::default());
        scheduler.init();
        assert_eq!(scheduler.counter().resets, 1);

        scheduler.set_interval(10);
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.counter().running);
        assert_eq!(scheduler.counter().count, 0);
        assert!(scheduler.counter_mut().tick().is_none());
    }

    #[test]
    fn test_stray_events_ignored() {
        let mut scheduler = OverflowScheduler::new(SimCounter::default());
        scheduler.init();
        scheduler.set_interval(200_000);

        // compare flag raised while still counting overflows
        assert!(!scheduler.on_compare_match());

        scheduler.set_interval(100);
        scheduler.on_overflow();
        assert!(scheduler.counter().compare_mode);
    }
}
