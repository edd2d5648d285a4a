//! Run clock and the repeating display tick.
//!
//! `RunClock` is pure bookkeeping over caller-supplied wall-clock timestamps
//! (`now` in milliseconds, as `performance.now()` / `Date.now()` deliver
//! them). The repeating task that refreshes the elapsed-time display sits
//! behind the `Ticker` trait so the browser can use `setInterval` while
//! native hosts and tests drive ticks by hand.

/// Display refresh period of the browser ticker.
pub const TICK_INTERVAL_MS: i32 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunClock {
    start_ms: Option<f64>,
    elapsed_secs: u32,
    running: bool,
}

impl RunClock {
    /// Starts the clock once; later calls are ignored. Returns whether it started now.
    pub fn start(&mut self, now: f64) -> bool {
        if self.start_ms.is_some() {
            return false;
        }
        self.start_ms = Some(now);
        self.running = true;
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Refreshes elapsed whole seconds while running.
    pub fn sync(&mut self, now: f64) -> u32 {
        if let (true, Some(start)) = (self.running, self.start_ms) {
            self.elapsed_secs = ((now - start).max(0.0) / 1000.0).floor() as u32;
        }
        self.elapsed_secs
    }

    /// Freezes the elapsed time.
    pub fn stop(&mut self, now: f64) -> u32 {
        let elapsed = self.sync(now);
        self.running = false;
        elapsed
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }
}

/// A cancellable repeating task. `start` on an armed ticker must not arm a
/// second one; `stop` on an idle ticker is a no-op.
pub trait Ticker {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_armed(&self) -> bool;
}

/// Ticker for hosts that call `Session::tick` themselves.
#[derive(Debug, Default)]
pub struct ManualTicker {
    armed: bool,
    /// How many times a task was actually armed.
    pub arm_count: u32,
}

impl Ticker for ManualTicker {
    fn start(&mut self) {
        if !self.armed {
            self.armed = true;
            self.arm_count += 1;
        }
    }

    fn stop(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_lazily_and_only_once() {
        let mut clock = RunClock::default();
        assert_eq!(clock.sync(5_000.0), 0);
        assert!(clock.start(1_000.0));
        assert!(!clock.start(2_000.0));
        assert_eq!(clock.sync(3_999.0), 2);
        assert_eq!(clock.sync(4_000.0), 3);
    }

    #[test]
    fn stopped_clock_ignores_later_ticks() {
        let mut clock = RunClock::default();
        clock.start(0.0);
        assert_eq!(clock.stop(61_500.0), 61);
        assert_eq!(clock.sync(120_000.0), 61);
        assert!(!clock.is_running());
    }

    #[test]
    fn manual_ticker_arms_once() {
        let mut ticker = ManualTicker::default();
        ticker.start();
        ticker.start();
        assert_eq!(ticker.arm_count, 1);
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_armed());
    }
}
