/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core timetable data structures for the leave planner.
//!
//! Two concerns live side by side in [`TimetableModel`]:
//!
//! ```text
//! Subject  – per-subject attendance counters (attended / conducted)
//! Slot grid – (day, period) → subject index, one owner per slot
//! ```
//!
//! # Ownership model
//! A `TimetableModel` is **owned** by the caller (the plan loader, the
//! account-document layer, or a test) and passed by shared reference into
//! `LeaveScheduler::compute`.  The scheduler never mutates it; all mutation
//! goes through the validating setters below.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

// ── Teaching day ──────────────────────────────────────────────────────────────

/// Day of the teaching week.
///
/// Carrying the typed enum through the whole pipeline (instead of a raw day
/// index) makes it impossible to hold a weekend or out-of-range day inside the
/// model.  The conversion back to an integer only happens at the plan-file and
/// account-document boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeachingDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl TeachingDay {
    /// All teaching days in week order.
    pub const ALL: [TeachingDay; 5] = [
        TeachingDay::Monday,
        TeachingDay::Tuesday,
        TeachingDay::Wednesday,
        TeachingDay::Thursday,
        TeachingDay::Friday,
    ];

    /// Parse from the integer form used by plan files and account documents
    /// (`0` = Monday .. `4` = Friday).  Returns `None` for anything else.
    pub fn from_index(v: u32) -> Option<Self> {
        match v {
            0 => Some(TeachingDay::Monday),
            1 => Some(TeachingDay::Tuesday),
            2 => Some(TeachingDay::Wednesday),
            3 => Some(TeachingDay::Thursday),
            4 => Some(TeachingDay::Friday),
            _ => None,
        }
    }

    /// Convert to the integer form used at the serialisation boundaries.
    pub fn index(self) -> u32 {
        match self {
            TeachingDay::Monday => 0,
            TeachingDay::Tuesday => 1,
            TeachingDay::Wednesday => 2,
            TeachingDay::Thursday => 3,
            TeachingDay::Friday => 4,
        }
    }

    /// The teaching day a calendar date falls on, or `None` for weekends.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        match date.weekday() {
            Weekday::Mon => Some(TeachingDay::Monday),
            Weekday::Tue => Some(TeachingDay::Tuesday),
            Weekday::Wed => Some(TeachingDay::Wednesday),
            Weekday::Thu => Some(TeachingDay::Thursday),
            Weekday::Fri => Some(TeachingDay::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }
}

impl fmt::Display for TeachingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TeachingDay::Monday => "Monday",
            TeachingDay::Tuesday => "Tuesday",
            TeachingDay::Wednesday => "Wednesday",
            TeachingDay::Thursday => "Thursday",
            TeachingDay::Friday => "Friday",
        };
        f.write_str(name)
    }
}

// ── Slot ──────────────────────────────────────────────────────────────────────

/// One weekly meeting time: a day of the week and a period index within that
/// day.
///
/// `Ord` is derived so the slot grid can live in a `BTreeMap` with
/// deterministic (day-major, then period) iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub day: TeachingDay,
    pub period: u32,
}

// ── Subject ───────────────────────────────────────────────────────────────────

/// Attendance counters for one subject.
///
/// The structural invariant `attended <= total` is enforced by
/// [`TimetableModel::set_subjects`]; the unsigned types make negative counts
/// unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    /// Subject name, unique within a model.
    pub name: String,

    /// Classes the student has attended so far.
    pub attended: u32,

    /// Classes conducted so far.
    pub total: u32,
}

impl Subject {
    pub fn new(name: impl Into<String>, attended: u32, total: u32) -> Self {
        Self {
            name: name.into(),
            attended,
            total,
        }
    }

    /// Current attendance percentage: `attended / total * 100`.
    ///
    /// Returns `0.0` when `total` is zero; the classification logic treats
    /// such a subject as below the floor.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.attended as f64 / self.total as f64 * 100.0
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Structural validation failures raised by the [`TimetableModel`] mutators
/// and by the plan-file / account-document conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The model was created with `periods_per_day == 0`.
    #[error("periods per day must be at least 1")]
    ZeroPeriods,

    /// A subject arrived with an empty (or whitespace-only) name.
    #[error("subject at position {index} has an empty name")]
    EmptyName { index: usize },

    /// A subject claims more attended classes than were conducted.
    #[error("subject '{name}' has attended {attended} of {total} classes; attended cannot exceed conducted")]
    AttendedExceedsTotal {
        name: String,
        attended: u32,
        total: u32,
    },

    /// Two subjects share a name.  Names are the identifiers the result
    /// partition is reported in, so they must be unique.
    #[error("duplicate subject name '{name}'")]
    DuplicateName { name: String },

    /// A slot assignment referenced a subject index past the end of the list.
    #[error("subject index {index} is out of range ({count} subjects)")]
    SubjectOutOfRange { index: usize, count: usize },

    /// A slot's period index is outside the configured day length.
    #[error("period {period} is out of range ({periods_per_day} periods per day)")]
    PeriodOutOfRange { period: u32, periods_per_day: u32 },

    /// A raw day index from a plan file or account document was not 0..=4.
    #[error("day index {day} is out of range (0 = Monday .. 4 = Friday)")]
    DayOutOfRange { day: u32 },
}

// ── TimetableModel ────────────────────────────────────────────────────────────

/// Subjects plus the weekly slot grid they meet in.
///
/// The grid maps each [`Slot`] to **at most one** subject index; assigning an
/// occupied slot replaces the previous owner, mirroring the single selector
/// per timetable cell in the input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableModel {
    subjects: Vec<Subject>,
    slots: BTreeMap<Slot, usize>,
    periods_per_day: u32,
}

impl TimetableModel {
    /// Create an empty model with the given day length.
    ///
    /// # Errors
    /// [`ModelError::ZeroPeriods`] if `periods_per_day` is zero.
    pub fn new(periods_per_day: u32) -> Result<Self, ModelError> {
        if periods_per_day == 0 {
            return Err(ModelError::ZeroPeriods);
        }
        Ok(Self {
            subjects: Vec::new(),
            slots: BTreeMap::new(),
            periods_per_day,
        })
    }

    pub fn periods_per_day(&self) -> u32 {
        self.periods_per_day
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Replace the whole subject list.
    ///
    /// The slot grid is cleared as a side effect: existing assignments index
    /// into the old list and would dangle.  Callers re-assign slots after a
    /// successful call.
    ///
    /// # Errors
    /// Rejects empty names, `attended > total`, and duplicate names; on error
    /// the model is left unchanged.
    pub fn set_subjects(&mut self, subjects: Vec<Subject>) -> Result<(), ModelError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(subjects.len());
        for (index, subject) in subjects.iter().enumerate() {
            if subject.name.trim().is_empty() {
                return Err(ModelError::EmptyName { index });
            }
            if subject.attended > subject.total {
                return Err(ModelError::AttendedExceedsTotal {
                    name: subject.name.clone(),
                    attended: subject.attended,
                    total: subject.total,
                });
            }
            if !seen.insert(subject.name.as_str()) {
                return Err(ModelError::DuplicateName {
                    name: subject.name.clone(),
                });
            }
        }

        self.subjects = subjects;
        self.slots.clear();
        Ok(())
    }

    /// Assign (`Some(index)`) or clear (`None`) one timetable slot.
    ///
    /// Assigning an occupied slot silently replaces the previous owner.
    ///
    /// # Errors
    /// [`ModelError::PeriodOutOfRange`] or [`ModelError::SubjectOutOfRange`].
    pub fn set_slot(
        &mut self,
        day: TeachingDay,
        period: u32,
        subject: Option<usize>,
    ) -> Result<(), ModelError> {
        if period >= self.periods_per_day {
            return Err(ModelError::PeriodOutOfRange {
                period,
                periods_per_day: self.periods_per_day,
            });
        }

        let slot = Slot { day, period };
        match subject {
            Some(index) => {
                if index >= self.subjects.len() {
                    return Err(ModelError::SubjectOutOfRange {
                        index,
                        count: self.subjects.len(),
                    });
                }
                self.slots.insert(slot, index);
            }
            None => {
                self.slots.remove(&slot);
            }
        }
        Ok(())
    }

    /// The subject index assigned to a slot, if any.
    pub fn slot_owner(&self, day: TeachingDay, period: u32) -> Option<usize> {
        self.slots.get(&Slot { day, period }).copied()
    }

    /// All slots assigned to one subject, in grid order.
    pub fn subject_slots(&self, index: usize) -> Vec<Slot> {
        self.slots
            .iter()
            .filter(|(_, &owner)| owner == index)
            .map(|(&slot, _)| slot)
            .collect()
    }

    /// Number of periods a subject meets on the given day.
    ///
    /// This is the "slot load" the scheduler adds to the conducted count when
    /// projecting a leave day.
    pub fn periods_on(&self, index: usize, day: TeachingDay) -> u32 {
        self.slots
            .iter()
            .filter(|(slot, &owner)| slot.day == day && owner == index)
            .count() as u32
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
