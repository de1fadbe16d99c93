/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Remote account-store document.
//!
//! The account store itself (transport, authentication, retry) lives outside
//! this crate; this module only defines the JSON document exchanged with it
//! and the mapping onto the in-memory model:
//!
//! ```json
//! {
//!   "subjects": [
//!     { "name": "Mathematics", "classesAttended": 30, "classesConducted": 40,
//!       "timetable": [ { "day": 0, "period": 0 } ] }
//!   ],
//!   "safeLeaveDates": ["2026-09-14", "2026-09-18"],
//!   "endDate": "2026-12-18",
//!   "periodsPerDay": 6
//! }
//! ```
//!
//! Older documents used the short field names `attended` / `total`; both
//! spellings are accepted on input, and the long form is always written.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{ModelError, Subject, TeachingDay, TimetableModel};

// ── Document types ────────────────────────────────────────────────────────────

/// One user's saved state, as the account store shapes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(default)]
    pub subjects: Vec<SubjectRecord>,

    /// Leave dates from the last computation, ISO `YYYY-MM-DD`.
    #[serde(default)]
    pub safe_leave_dates: Vec<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    pub periods_per_day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub name: String,

    #[serde(alias = "attended")]
    pub classes_attended: u32,

    #[serde(alias = "total")]
    pub classes_conducted: u32,

    #[serde(default)]
    pub timetable: Vec<SlotRecord>,
}

/// Wire form of a slot: raw indices, validated on conversion to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub day: u32,
    pub period: u32,
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl UserDocument {
    /// Build the document to save after a computation.
    pub fn from_parts(
        model: &TimetableModel,
        leave_dates: &[NaiveDate],
        end_date: Option<NaiveDate>,
    ) -> Self {
        let subjects = model
            .subjects()
            .iter()
            .enumerate()
            .map(|(index, subject)| SubjectRecord {
                name: subject.name.clone(),
                classes_attended: subject.attended,
                classes_conducted: subject.total,
                timetable: model
                    .subject_slots(index)
                    .into_iter()
                    .map(|slot| SlotRecord {
                        day: slot.day.index(),
                        period: slot.period,
                    })
                    .collect(),
            })
            .collect();

        UserDocument {
            subjects,
            safe_leave_dates: leave_dates.to_vec(),
            end_date,
            periods_per_day: model.periods_per_day(),
        }
    }

    /// Rebuild a validated [`TimetableModel`] from the document.
    ///
    /// # Errors
    /// Any [`ModelError`] raised by the model setters, plus
    /// [`ModelError::DayOutOfRange`] for a corrupt day index.
    pub fn to_model(&self) -> Result<TimetableModel, ModelError> {
        let mut model = TimetableModel::new(self.periods_per_day)?;

        let subjects: Vec<Subject> = self
            .subjects
            .iter()
            .map(|record| {
                Subject::new(
                    record.name.clone(),
                    record.classes_attended,
                    record.classes_conducted,
                )
            })
            .collect();
        model.set_subjects(subjects)?;

        for (index, record) in self.subjects.iter().enumerate() {
            for slot in &record.timetable {
                let day = TeachingDay::from_index(slot.day)
                    .ok_or(ModelError::DayOutOfRange { day: slot.day })?;
                model.set_slot(day, slot.period, Some(index))?;
            }
        }

        Ok(model)
    }

    // ── File I/O ──────────────────────────────────────────────────────────────

    /// Read a document from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<UserDocument> {
        info!("Loading account document from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open account document: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse account document: {}", path.display()))
    }

    /// Write the document as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialise account document")?;

        std::fs::write(path, json)
            .with_context(|| format!("Cannot write account document: {}", path.display()))?;

        info!("Saved account document to: {}", path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_model() -> TimetableModel {
        let mut model = TimetableModel::new(6).unwrap();
        model
            .set_subjects(vec![
                Subject::new("Mathematics", 30, 40),
                Subject::new("Physics", 26, 32),
            ])
            .unwrap();
        model.set_slot(TeachingDay::Monday, 0, Some(0)).unwrap();
        model.set_slot(TeachingDay::Wednesday, 2, Some(0)).unwrap();
        model.set_slot(TeachingDay::Tuesday, 1, Some(1)).unwrap();
        model
    }

    // ── Field naming ──────────────────────────────────────────────────────────

    #[test]
    fn document_serialises_with_camel_case_store_fields() {
        let doc = UserDocument::from_parts(&sample_model(), &[date(2026, 9, 14)], None);
        let json = serde_json::to_string(&doc).unwrap();

        assert!(json.contains("\"classesAttended\":30"));
        assert!(json.contains("\"classesConducted\":40"));
        assert!(json.contains("\"safeLeaveDates\":[\"2026-09-14\"]"));
        assert!(json.contains("\"periodsPerDay\":6"));
    }

    #[test]
    fn legacy_short_field_names_are_accepted() {
        let json = r#"{
            "subjects": [
                { "name": "Mathematics", "attended": 30, "total": 40 }
            ],
            "periodsPerDay": 6
        }"#;
        let doc: UserDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.subjects[0].classes_attended, 30);
        assert_eq!(doc.subjects[0].classes_conducted, 40);
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let doc: UserDocument = serde_json::from_str(r#"{ "periodsPerDay": 4 }"#).unwrap();
        assert!(doc.subjects.is_empty());
        assert!(doc.safe_leave_dates.is_empty());
        assert_eq!(doc.end_date, None);
    }

    // ── Model conversion ──────────────────────────────────────────────────────

    #[test]
    fn to_model_rebuilds_counters_and_slots() {
        let original = sample_model();
        let doc = UserDocument::from_parts(&original, &[], Some(date(2026, 12, 18)));
        let rebuilt = doc.to_model().unwrap();

        assert_eq!(rebuilt, original);
        assert_eq!(rebuilt.periods_on(0, TeachingDay::Monday), 1);
        assert_eq!(rebuilt.periods_on(1, TeachingDay::Tuesday), 1);
    }

    #[test]
    fn to_model_rejects_corrupt_day_index() {
        let mut doc = UserDocument::from_parts(&sample_model(), &[], None);
        doc.subjects[0].timetable.push(SlotRecord { day: 9, period: 0 });
        assert_eq!(doc.to_model().unwrap_err(), ModelError::DayOutOfRange { day: 9 });
    }

    #[test]
    fn to_model_rejects_inconsistent_counters() {
        let json = r#"{
            "subjects": [
                { "name": "Mathematics", "classesAttended": 50, "classesConducted": 40 }
            ],
            "periodsPerDay": 6
        }"#;
        let doc: UserDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(
            doc.to_model().unwrap_err(),
            ModelError::AttendedExceedsTotal { .. }
        ));
    }

    // ── File I/O ──────────────────────────────────────────────────────────────

    #[test]
    fn save_and_reload_preserves_the_document() {
        let doc = UserDocument::from_parts(
            &sample_model(),
            &[date(2026, 9, 14), date(2026, 9, 18)],
            Some(date(2026, 12, 18)),
        );

        let file = tempfile::NamedTempFile::new().unwrap();
        doc.save_to_file(file.path()).unwrap();
        let reloaded = UserDocument::load_from_file(file.path()).unwrap();

        assert_eq!(reloaded, doc);
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(UserDocument::load_from_file(Path::new("/nonexistent/doc.json")).is_err());
    }

    #[test]
    fn malformed_json_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        file.write_all(b"{ not json").unwrap();
        assert!(UserDocument::load_from_file(file.path()).is_err());
    }
}
