//! Server timezone, independent of the host's.

use crate::error::{MysqlError, Result};
use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:UTC|GMT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid offset regex")
});

/// Timezone applied to the launched server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeZone {
    #[default]
    Utc,
    /// Fixed offset from UTC in minutes.
    Offset(i32),
    /// Named zone from the tz database, e.g. `Asia/Shanghai`.
    Named(Tz),
}

impl TimeZone {
    /// Parses a zone id: `UTC`, an offset such as `+08:00` or `GMT-5`, or a tz database name.
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();
        if matches!(id.to_ascii_uppercase().as_str(), "UTC" | "GMT" | "Z" | "ETC/UTC") {
            return Ok(Self::Utc);
        }

        if let Some(caps) = OFFSET.captures(id) {
            let hours: i32 = caps[2].parse().unwrap_or(0);
            let minutes: i32 = caps.get(3).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            if hours > 14 || minutes > 59 {
                return Err(Self::invalid(id));
            }
            let total = hours * 60 + minutes;
            return Ok(match (&caps[1], total) {
                (_, 0) => Self::Utc,
                ("-", total) => Self::Offset(-total),
                (_, total) => Self::Offset(total),
            });
        }

        id.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| Self::invalid(id))
    }

    fn invalid(id: &str) -> MysqlError {
        MysqlError::invalid_configuration(format!("Unknown timezone id '{id}'"))
    }

    /// Offset from UTC in minutes at `instant`.
    pub fn offset_minutes_at(&self, instant: DateTime<Utc>) -> i32 {
        match self {
            Self::Utc => 0,
            Self::Offset(minutes) => *minutes,
            Self::Named(tz) => {
                instant.with_timezone(tz).offset().fix().local_minus_utc() / 60
            }
        }
    }

    /// Value for mysqld's `--default-time-zone` at `instant`.
    ///
    /// Always a `±HH:MM` offset: a freshly initialized data directory has
    /// empty time zone tables, so mysqld rejects zone names.
    pub fn server_value_at(&self, instant: DateTime<Utc>) -> String {
        let minutes = self.offset_minutes_at(instant);
        let sign = if minutes < 0 { '-' } else { '+' };
        let abs = minutes.abs();
        format!("{sign}{:02}:{:02}", abs / 60, abs % 60)
    }

    /// Value for mysqld's `--default-time-zone` right now.
    pub fn server_value(&self) -> String {
        self.server_value_at(Utc::now())
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("UTC"),
            Self::Offset(_) => write!(f, "UTC{}", self.server_value()),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}
