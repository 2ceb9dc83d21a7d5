//! Conversions between UTC instants stored in the database and the shop's
//! local wall clock, which is what pickup slots and "today" refer to.

use brewline_core::errors::{ShopError, ShopResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy)]
pub struct ShopClock {
    tz: Tz,
}

impl ShopClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Current shop-local wall-clock time.
    pub fn now_local(&self) -> NaiveDateTime {
        self.to_local(Utc::now())
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// Resolves a shop-local time to a UTC instant. Ambiguous times (clocks
    /// going back) resolve to the earlier instant; skipped times are invalid.
    pub fn to_utc(&self, local: NaiveDateTime) -> ShopResult<DateTime<Utc>> {
        self.tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| ShopError::Validation(format!("{} does not exist in {}", local, self.tz)))
    }

    /// UTC bounds `[start, end)` of a shop-local calendar day.
    pub fn day_bounds(&self, date: NaiveDate) -> ShopResult<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.to_utc(date.and_time(NaiveTime::MIN))?;
        let next = date
            .succ_opt()
            .ok_or_else(|| ShopError::Validation(format!("No day after {}", date)))?;
        let end = self.to_utc(next.and_time(NaiveTime::MIN))?;
        Ok((start, end))
    }

    /// Bounds of the shop-local day containing `now_local`.
    pub fn today_bounds(&self, now_local: NaiveDateTime) -> ShopResult<(DateTime<Utc>, DateTime<Utc>)> {
        self.day_bounds(now_local.date())
    }
}
