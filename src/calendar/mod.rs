/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Calendar arithmetic for the leave window.
//!
//! Pure date helpers, kept as free functions so they can be used and tested
//! independently of the scheduler.  Everything here works on
//! [`chrono::NaiveDate`]; time of day and timezones never enter the planner.

use chrono::{Datelike, NaiveDate, Weekday};

// ── Teaching dates ────────────────────────────────────────────────────────────

/// Returns `true` for Monday through Friday.
pub fn is_teaching_date(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All teaching dates strictly after `after`, up to and including `until`.
///
/// The reference date itself is never a candidate (leave starts tomorrow at
/// the earliest).  Returns an empty vector whenever `until <= after`.
pub fn teaching_dates(after: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = after;
    while let Some(next) = current.succ_opt() {
        if next > until {
            break;
        }
        if is_teaching_date(next) {
            dates.push(next);
        }
        current = next;
    }
    dates
}

// ── Week buckets ──────────────────────────────────────────────────────────────

/// Grouping key for the weekly leave cap: `(year, month, day-of-month / 7)`.
///
/// A bucket never spans a month boundary, so the first days of a month always
/// start a fresh bucket even mid-week.  That is the intended grouping for the
/// cap, not an approximation of ISO weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekBucket {
    pub year: i32,
    pub month: u32,
    pub index: u32,
}

impl WeekBucket {
    /// The bucket a calendar date falls in.
    pub fn of(date: NaiveDate) -> Self {
        WeekBucket {
            year: date.year(),
            month: date.month(),
            index: date.day() / 7,
        }
    }
}

impl std::fmt::Display for WeekBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}/w{}", self.year, self.month, self.index)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
