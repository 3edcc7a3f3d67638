// File: crates/series-reduce/src/smooth/calendar.rs
// Summary: Process-wide calendar table for month bucketing with amortized O(1) lookup.
// Notes:
// - Built once on first use, read-only afterwards; safe for concurrent readers.
// - Covers 1970-01-01 .. 2070-01-01 UTC. Timestamps outside that span are rejected.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};

use crate::error::{ReduceError, Result};
use crate::types::DAY_MS;

pub const YEAR_OFFSET: i32 = 1970;
pub const YEARS: usize = 100;

static INDEX: OnceLock<CalendarIndex> = OnceLock::new();

/// Position of a month in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: usize,
    pub month: usize,
}

impl MonthCursor {
    fn next(self) -> Option<Self> {
        match (self.year, self.month) {
            (y, 11) if y + 1 < YEARS => Some(Self { year: y + 1, month: 0 }),
            (_, 11) => None,
            (y, m) => Some(Self { year: y, month: m + 1 }),
        }
    }
}

pub struct CalendarIndex {
    /// Jan 1st of every year plus the end of the last one.
    year_starts: Vec<i64>,
    month_starts: Vec<[i64; 12]>,
    mid_month: Vec<[i64; 12]>,
}

fn month_start_ms(year: i32, month: u32) -> i64 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first day of a month between 1970 and 2070 is a valid date")
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

impl CalendarIndex {
    /// The shared table, built on first call.
    pub fn global() -> &'static CalendarIndex {
        INDEX.get_or_init(CalendarIndex::build)
    }

    fn build() -> Self {
        let mut year_starts = Vec::with_capacity(YEARS + 1);
        let mut month_starts = Vec::with_capacity(YEARS);
        for y in 0..YEARS {
            let year = YEAR_OFFSET + y as i32;
            year_starts.push(month_start_ms(year, 1));
            let mut months = [0i64; 12];
            for (m, slot) in months.iter_mut().enumerate() {
                *slot = month_start_ms(year, m as u32 + 1);
            }
            month_starts.push(months);
        }
        year_starts.push(month_start_ms(YEAR_OFFSET + YEARS as i32, 1));

        let mut index = Self { year_starts, month_starts, mid_month: Vec::with_capacity(YEARS) };
        for y in 0..YEARS {
            let mut mids = [0i64; 12];
            for (m, slot) in mids.iter_mut().enumerate() {
                let cursor = MonthCursor { year: y, month: m };
                let mid = (index.month_start(cursor) + index.month_end(cursor)) / 2;
                // rounded down to midnight
                *slot = mid - mid.rem_euclid(DAY_MS);
            }
            index.mid_month.push(mids);
        }
        index
    }

    pub fn year_start(&self, year: usize) -> i64 { self.year_starts[year] }

    pub fn month_start(&self, c: MonthCursor) -> i64 { self.month_starts[c.year][c.month] }

    /// Exclusive end of the month.
    pub fn month_end(&self, c: MonthCursor) -> i64 {
        if c.month < 11 { self.month_starts[c.year][c.month + 1] } else { self.year_starts[c.year + 1] }
    }

    /// Canonical bucket key of the month (its middle, at midnight).
    pub fn mid_month(&self, c: MonthCursor) -> i64 { self.mid_month[c.year][c.month] }

    fn contains(&self, c: MonthCursor, ts: i64) -> bool {
        self.month_start(c) <= ts && ts < self.month_end(c)
    }

    /// Binary search: year first, then month within the year.
    pub fn locate(&self, ts: i64) -> Option<MonthCursor> {
        if ts < self.year_starts[0] || ts >= self.year_starts[YEARS] { return None; }
        let year = self.year_starts.partition_point(|&s| s <= ts) - 1;
        let month = self.month_starts[year].partition_point(|&s| s <= ts) - 1;
        Some(MonthCursor { year, month })
    }

    /// Resolve the month of `ts`, trying the cursor's month and its successor
    /// before searching. `cursor` is updated to the resolved month.
    pub fn resolve(&self, ts: i64, cursor: &mut Option<MonthCursor>) -> Result<MonthCursor> {
        let predicted = cursor.and_then(|c| {
            if self.contains(c, ts) { return Some(c); }
            c.next().filter(|n| self.contains(*n, ts))
        });
        let found = match predicted {
            Some(c) => c,
            None => self.locate(ts).ok_or(ReduceError::OutOfCalendarRange(ts))?,
        };
        *cursor = Some(found);
        Ok(found)
    }

    /// Bucket key for `ts` (mid-month timestamp of its calendar month).
    pub fn month_key(&self, ts: i64, cursor: &mut Option<MonthCursor>) -> Result<i64> {
        self.resolve(ts, cursor).map(|c| self.mid_month(c))
    }
}
