// ==========================================
// Resource Planner - calendar interval
// ==========================================
// Closed date range [start, end], both days inclusive
// Invariant: start <= end, immutable after construction
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CalendarInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl CalendarInterval {
    /// Builds an interval, failing with `InvalidRange` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day interval.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn overlaps(&self, other: &CalendarInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains(&self, other: &CalendarInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shared days of two intervals, `None` when they do not overlap.
    pub fn intersection(&self, other: &CalendarInterval) -> Option<CalendarInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(CalendarInterval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

impl fmt::Display for CalendarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

// Deserialization goes through `new` so a stored start > end never sneaks in.
impl<'de> Deserialize<'de> for CalendarInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: NaiveDate,
            end: NaiveDate,
        }

        let raw = Raw::deserialize(deserializer)?;
        CalendarInterval::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
