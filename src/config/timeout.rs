//! Startup timeout with a unit.

use std::fmt;
use std::time::Duration;

/// Unit of a [`Timeout`] length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in nanoseconds.
    fn nanos(self) -> u128 {
        match self {
            Self::Nanoseconds => 1,
            Self::Microseconds => 1_000,
            Self::Milliseconds => 1_000_000,
            Self::Seconds => 1_000_000_000,
            Self::Minutes => 60 * 1_000_000_000,
            Self::Hours => 60 * 60 * 1_000_000_000,
            Self::Days => 24 * 60 * 60 * 1_000_000_000,
        }
    }

    /// Converts `length` expressed in `source` into this unit.
    ///
    /// Conversions to a coarser unit truncate; conversions that overflow saturate.
    pub fn convert(self, length: u64, source: TimeUnit) -> u64 {
        let nanos = u128::from(length) * source.nanos();
        u64::try_from(nanos / self.nanos()).unwrap_or(u64::MAX)
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
        }
    }
}

/// How long to wait for the server to accept connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    length: u64,
    unit: TimeUnit,
}

impl Timeout {
    /// Creates a timeout of `length` units.
    pub const fn new(length: u64, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// Returns the timeout expressed in `target` units.
    pub fn to(&self, target: TimeUnit) -> u64 {
        target.convert(self.length, self.unit)
    }

    /// Returns the timeout as a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.to(TimeUnit::Nanoseconds))
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::new(30, TimeUnit::Seconds)
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self::new(millis, TimeUnit::Milliseconds)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}
