//! Auto-refresh clock state.
//!
//! `tick` only ever increases. A tick of 0 means "nothing has forced a
//! refresh yet" and lets the fetchers serve fresh cache entries; any other
//! value bypasses the caches.

use serde::Serialize;

/// Intervals offered by the refresh selector, in milliseconds. 0 is off.
pub const REFRESH_CHOICES: [(u64, &str); 4] = [
    (0, "Off"),
    (60_000, "1m"),
    (300_000, "5m"),
    (900_000, "15m"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AutoRefresh {
    pub interval_ms: u64,
    pub tick: u64,
}

impl AutoRefresh {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            tick: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval_ms > 0
    }

    /// Returns true when the interval actually changed, meaning the driver
    /// must drop its timer and install a new one.
    pub fn set_interval(&mut self, interval_ms: u64) -> bool {
        let changed = self.interval_ms != interval_ms;
        self.interval_ms = interval_ms;
        changed
    }

    /// Manual refresh, independent of the timer.
    pub fn trigger(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    /// Timer callback. Ignored while disabled so a late firing from a
    /// dropped timer cannot advance the clock.
    pub fn on_timer(&mut self) -> Option<u64> {
        self.is_enabled().then(|| self.trigger())
    }

    pub fn allows_cache(&self) -> bool {
        allows_cache(self.tick)
    }
}

pub fn allows_cache(tick: u64) -> bool {
    tick == 0
}

/// Selector label for an interval, falling back to seconds.
pub fn interval_label(interval_ms: u64) -> String {
    REFRESH_CHOICES
        .iter()
        .find(|(ms, _)| *ms == interval_ms)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{}s", interval_ms / 1000))
}
