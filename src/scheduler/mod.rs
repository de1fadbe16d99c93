/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Leave-date selection.
//!
//! [`LeaveScheduler`] takes a [`TimetableModel`] snapshot and a date window
//! and produces a [`LeaveResult`]: the weekdays the student can mark as leave
//! without any subject dropping below the attendance floor, plus a
//! safe / not-possible classification of the subjects themselves.
//!
//! # Algorithm
//! Candidate weekdays strictly after `today` through `end_date` are shuffled
//! and then evaluated greedily.  A candidate is accepted only if all three
//! rules hold:
//!
//! | Rule | Constraint |
//! |---|---|
//! | Consecutive run | the two preceding calendar days are not both leave days |
//! | Weekly cap | at most [`WEEKLY_LEAVE_CAP`] leave days per week bucket |
//! | Attendance floor | every subject's projected percentage stays at or above 75% |
//!
//! The shuffle keeps the planner from systematically favouring early dates
//! when several equally valid leave sets exist; the reported list is
//! re-sorted chronologically.  Each projection reads the subject's stored
//! counters, so accepted dates do not compound into later checks.
//!
//! # Example
//! ```rust,ignore
//! let scheduler = LeaveScheduler::new();
//! let result = scheduler.compute(&model, today, end_date)?;
//! ```

pub mod error;
pub mod feasibility;

pub use error::{RejectReason, ScheduleError};

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::calendar::{self, WeekBucket};
use crate::model::{TeachingDay, TimetableModel};

use feasibility::{projected_pct, ATTENDANCE_FLOOR_PCT};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Maximum leave dates accepted per week bucket.
pub const WEEKLY_LEAVE_CAP: usize = 2;

// ── LeaveResult ───────────────────────────────────────────────────────────────

/// Outcome of one leave computation.  Fresh and immutable per call; the
/// scheduler retains nothing between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveResult {
    /// Selected leave dates in chronological order, all weekdays.
    pub leave_dates: Vec<NaiveDate>,

    /// Subjects currently at or above the attendance floor, in model order.
    pub safe_subjects: Vec<String>,

    /// Subjects below the floor (or with no conducted classes).  Disjoint
    /// from `safe_subjects`; together they cover every subject.
    pub not_possible_subjects: Vec<String>,
}

// ── LeaveScheduler ────────────────────────────────────────────────────────────

/// The leave scheduler.
///
/// Stateless: all per-run state (accepted set, week load) is allocated inside
/// `compute` and dropped at the end of the call, so the scheduler is
/// `Send + Sync` and safe to call repeatedly or from several threads with
/// their own model snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveScheduler;

impl LeaveScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Compute leave dates using the process RNG.
    ///
    /// Repeated calls with identical inputs may pick different (individually
    /// valid) leave sets; use [`compute_with`](Self::compute_with) with a
    /// seeded RNG for reproducible output.
    pub fn compute(
        &self,
        model: &TimetableModel,
        today: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<LeaveResult, ScheduleError> {
        self.compute_with(model, today, end_date, &mut rand::rng())
    }

    /// Compute leave dates, drawing shuffle order from the supplied RNG.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidWindow`] if `end_date <= today`.  An empty
    /// model or a window with no weekdays is not an error; the result simply
    /// carries empty lists.
    pub fn compute_with<R: Rng + ?Sized>(
        &self,
        model: &TimetableModel,
        today: NaiveDate,
        end_date: NaiveDate,
        rng: &mut R,
    ) -> Result<LeaveResult, ScheduleError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        if end_date <= today {
            return Err(ScheduleError::InvalidWindow { today, end_date });
        }

        // ── Candidate enumeration ─────────────────────────────────────────────
        let mut candidates = calendar::teaching_dates(today, end_date);
        candidates.shuffle(rng);

        info!(
            subject_count = model.subjects().len(),
            candidate_count = candidates.len(),
            today = %today,
            end_date = %end_date,
            "=== LeaveScheduler::compute() ==="
        );

        // ── Greedy acceptance ─────────────────────────────────────────────────
        // BTreeSet doubles as the membership index for the consecutive-run
        // rule and as the chronological sort of the final list.
        let mut accepted: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut week_load: BTreeMap<WeekBucket, usize> = BTreeMap::new();

        for date in candidates {
            match Self::check_candidate(model, &accepted, &week_load, date) {
                Ok(()) => {
                    *week_load.entry(WeekBucket::of(date)).or_default() += 1;
                    accepted.insert(date);
                    debug!(date = %date, "✓ leave day accepted");
                }
                Err(reason) => {
                    debug!(date = %date, reason = %reason, "✗ candidate rejected");
                }
            }
        }

        // ── Finalize ──────────────────────────────────────────────────────────
        let leave_dates: Vec<NaiveDate> = accepted.into_iter().collect();
        let (safe_subjects, not_possible_subjects) = feasibility::classify(model.subjects());

        info!(
            leave_count = leave_dates.len(),
            safe_count = safe_subjects.len(),
            not_possible_count = not_possible_subjects.len(),
            "=== Leave computation complete ==="
        );

        Ok(LeaveResult {
            leave_dates,
            safe_subjects,
            not_possible_subjects,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Acceptance rules
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluate the acceptance rules for one candidate date; the first
    /// failing rule wins.
    ///
    /// The floor projection always reads the stored counters: leave days
    /// accepted earlier in the pass never feed back into the denominator.
    fn check_candidate(
        model: &TimetableModel,
        accepted: &BTreeSet<NaiveDate>,
        week_load: &BTreeMap<WeekBucket, usize>,
        date: NaiveDate,
    ) -> Result<(), RejectReason> {
        // Rule 1: no three-day absence run.  Calendar days, not candidate
        // days: the predecessors may fall on a weekend.
        let prev = date.pred_opt();
        let prev2 = prev.and_then(|d| d.pred_opt());
        if let (Some(prev), Some(prev2)) = (prev, prev2) {
            if accepted.contains(&prev) && accepted.contains(&prev2) {
                return Err(RejectReason::ConsecutiveRun);
            }
        }

        // Rule 2: weekly cap
        let bucket = WeekBucket::of(date);
        if week_load.get(&bucket).copied().unwrap_or(0) >= WEEKLY_LEAVE_CAP {
            return Err(RejectReason::WeekFull { bucket });
        }

        // Rule 3: attendance floor, projected per subject
        let Some(day) = TeachingDay::from_date(date) else {
            return Err(RejectReason::NotTeachingDay);
        };
        for (index, subject) in model.subjects().iter().enumerate() {
            let extra = model.periods_on(index, day);
            if let Some(pct) = projected_pct(subject.attended, subject.total, extra) {
                if pct < ATTENDANCE_FLOOR_PCT {
                    return Err(RejectReason::FloorBreached {
                        subject: subject.name.clone(),
                        projected_pct: pct,
                    });
                }
            }
        }

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
