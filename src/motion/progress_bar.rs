//! Iteration timing helpers for the optional progress UI.
//!
//! Used by the per-probe loops in [`ensemble`](crate::motion::ensemble) when the
//! `progress` feature is enabled: [`IterTimer`] keeps an exponential moving average of
//! per-probe durations (`ema ← α·dt + (1−α)·ema`), and [`fmt_dur`] renders durations
//! compactly for the progress-bar message.
use std::time::{Duration, Instant};

pub struct IterTimer {
    last: Instant,
    ema_ns: f64,
    alpha: f64,
    count: u64,
}

impl IterTimer {
    pub fn new(alpha: f64) -> Self {
        Self {
            last: Instant::now(),
            ema_ns: 0.0,
            alpha,
            count: 0,
        }
    }

    /// Record an iteration boundary and return the duration since the previous one.
    ///
    /// The first tick initializes the average to the first duration.
    #[inline]
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.count += 1;

        let dt_ns = dt.as_nanos() as f64;
        self.ema_ns = if self.count == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.ema_ns
        };

        dt
    }

    /// Smoothed per-iteration duration.
    #[inline]
    pub fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.ema_ns as u64)
        }
    }
}

/// Render a duration as `"253µs"`, `"42ms"`, or `"3.14s"` depending on scale.
#[inline]
pub fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else {
        let ms = d.as_millis();
        if ms < 1_000 {
            format!("{ms}ms")
        } else {
            let s = d.as_secs_f32();
            format!("{s:.2}s")
        }
    }
}
