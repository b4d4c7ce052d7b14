//! Software timer advanced by a periodic polling task.

use super::IntervalTimer;

/// [`IntervalTimer`] driven by elapsed-tick reports instead of an interrupt.
///
/// A fixed-period task (for example once per millisecond on a dedicated core)
/// reports how many ticks passed via [`tick`](Self::tick). Ticks past an
/// expiry carry into the next interval, so the long-run step rate does not
/// drift with the polling period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolledTimer {
    frequency_hz: u32,
    interval: u32,
    elapsed: u32,
    armed: bool,
}

impl PolledTimer {
    /// Create a stopped timer counting at `frequency_hz`.
    pub const fn new(frequency_hz: u32) -> Self {
        Self {
            frequency_hz,
            interval: 0,
            elapsed: 0,
            armed: false,
        }
    }

    /// Advance by `ticks`. Returns `true` if the armed interval expired.
    ///
    /// At most one expiry is reported per call; call again with `0` to drain
    /// further expiries when `ticks` spanned several intervals.
    pub fn tick(&mut self, ticks: u32) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(ticks);
        if self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            true
        } else {
            false
        }
    }

    /// Armed interval, `None` while stopped.
    pub fn interval(&self) -> Option<u32> {
        self.armed.then_some(self.interval)
    }

    /// Ticks until the next expiry, `None` while stopped.
    pub fn remaining(&self) -> Option<u32> {
        self.armed
            .then(|| self.interval.saturating_sub(self.elapsed))
    }

    /// Whether an interval is armed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl IntervalTimer for PolledTimer {
    fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    fn init(&mut self) {
        self.stop();
    }

    fn set_interval(&mut self, ticks: u32) {
        self.interval = ticks.max(1);
        self.armed = true;
    }

    fn stop(&mut self) {
        self.armed = false;
        self.interval = 0;
        self.elapsed = 0;
    }
}
