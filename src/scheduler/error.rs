/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error and diagnostic types for the leave scheduler.
//!
//! Two types model the two layers:
//!
//! * [`RejectReason`] — why a single candidate date was passed over
//!   (diagnostic, logged at debug level, never returned to the caller).
//! * [`ScheduleError`] — top-level failure returned from
//!   [`LeaveScheduler::compute`](super::LeaveScheduler::compute).
//!
//! Every variant carries enough structured data to emit a fully-qualified
//! `tracing` event without re-deriving values at the call site.

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::WeekBucket;

// ── Candidate rejection ───────────────────────────────────────────────────────

/// Detailed reason why a candidate date was rejected during the greedy pass.
///
/// A rejection is part of normal operation, not a failure: the scheduler
/// simply moves on to the next shuffled candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// The two preceding calendar days are already selected; accepting this
    /// date would create a three-day absence run.
    ConsecutiveRun,

    /// The candidate's week bucket has already reached the weekly leave cap.
    WeekFull { bucket: WeekBucket },

    /// Skipping this date would drop a subject below the attendance floor.
    FloorBreached {
        subject: String,
        projected_pct: f64,
    },

    /// The candidate is not a Monday..Friday date.  Enumeration never
    /// produces these; the variant exists so a caller feeding hand-built
    /// dates gets a diagnostic instead of a panic.
    NotTeachingDay,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::ConsecutiveRun => {
                write!(f, "previous two calendar days are already leave days")
            }

            RejectReason::WeekFull { bucket } => {
                write!(f, "week {} already has the maximum leave days", bucket)
            }

            RejectReason::FloorBreached {
                subject,
                projected_pct,
            } => write!(
                f,
                "'{}' would drop to {:.1}% attendance",
                subject, projected_pct
            ),

            RejectReason::NotTeachingDay => write!(f, "not a teaching day"),
        }
    }
}

// ── Top-level scheduler error ─────────────────────────────────────────────────

/// Top-level error type returned by
/// [`LeaveScheduler::compute`](super::LeaveScheduler::compute).
///
/// Malformed subject data never reaches the scheduler (the model rejects it
/// first), so an invalid window is the only failure path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The end date is not strictly after the reference date.
    #[error("end date {end_date} is not after the reference date {today}")]
    InvalidWindow {
        today: NaiveDate,
        end_date: NaiveDate,
    },
}
