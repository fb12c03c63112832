use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ClockError;

/// Source of the current time for trace and log stamps.
///
/// Failures are fatal to the single call that asked; there is no fallback
/// timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<DateTime<Utc>, ClockError>;

    /// RFC 3339, UTC, microsecond precision, `Z` suffix.
    fn timestamp(&self) -> Result<String, ClockError> {
        Ok(self.now()?.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Float seconds since the Unix epoch.
    fn epoch_seconds(&self) -> Result<f64, ClockError> {
        let now = self.now()?;
        if now.timestamp() < 0 {
            return Err(ClockError(format!("time {now} precedes the Unix epoch")));
        }
        Ok(now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0)
    }
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        Ok(Utc::now())
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at_epoch_seconds(secs: i64) -> Result<Self, ClockError> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(FixedClock)
            .ok_or_else(|| ClockError(format!("{secs} is not a representable timestamp")))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        Ok(self.0)
    }
}
