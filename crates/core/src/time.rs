use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// A value that is visible for a fixed time after being raised, then clears itself.
///
/// Expiry is evaluated against whatever instant the reader passes in, so nothing has
/// to run when the deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transient<T> {
    value: T,
    raised_at: DateTime<Utc>,
    ttl: Duration,
}

impl<T> Transient<T> {
    #[must_use]
    pub fn raise(value: T, raised_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            raised_at,
            ttl,
        }
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.raised_at + self.ttl
    }

    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    /// The value while the signal is active.
    #[must_use]
    pub fn get(&self, now: DateTime<Utc>) -> Option<&T> {
        self.is_active(now).then_some(&self.value)
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(5));
    }

    #[test]
    fn transient_clears_after_ttl() {
        let signal = Transient::raise(10_u64, fixed_now(), Duration::seconds(2));
        assert_eq!(signal.get(fixed_now()), Some(&10));
        assert_eq!(signal.get(fixed_now() + Duration::milliseconds(1999)), Some(&10));
        assert_eq!(signal.get(fixed_now() + Duration::seconds(2)), None);
        assert!(!signal.is_active(fixed_now() + Duration::seconds(60)));
    }
}
