//! Wall-clock source for credential expiry checks.

/// Milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real wall clock: `Date.now()` in the browser, `SystemTime` natively.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(feature = "hydrate")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(feature = "hydrate"))]
    #[allow(clippy::cast_precision_loss)]
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0.0, |d| d.as_millis() as f64)
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl FixedClock {
    /// Pin the clock to a whole Unix second.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn at_secs(secs: i64) -> Self {
        Self(secs as f64 * 1000.0)
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.0
    }
}

/// Convert a millisecond timestamp to whole seconds, rounding to nearest.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_unix_secs(now_ms: f64) -> i64 {
    (now_ms * 0.001).round() as i64
}
