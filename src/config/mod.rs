//! Attendance plan loading.
//!
//! A plan file is the human-edited input: subject counters, the weekly slot
//! grid, and the planning horizon.  The expected YAML structure is:
//! ```yaml
//! periods_per_day: 6
//! end_date: 2026-12-18        # optional, the CLI may override it
//! subjects:
//!   - name: Mathematics
//!     attended: 30
//!     total: 40
//!     slots:
//!       - { day: 0, period: 0 }   # day: 0 = Monday .. 4 = Friday
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::model::{ModelError, Subject, TeachingDay, TimetableModel};

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
///
/// This is kept private – callers work with [`Plan`] instead.
#[derive(Debug, Deserialize)]
struct PlanFile {
    periods_per_day: u32,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    subjects: Vec<PlanSubject>,
}

#[derive(Debug, Deserialize)]
struct PlanSubject {
    name: String,
    attended: u32,
    total: u32,
    /// Weekly meeting slots; optional so counters can be entered first and
    /// the grid filled in later.
    #[serde(default)]
    slots: Vec<PlanSlot>,
}

#[derive(Debug, Deserialize)]
struct PlanSlot {
    day: u32,
    period: u32,
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// A validated attendance plan: the model plus the stored horizon.
#[derive(Debug, Clone)]
pub struct Plan {
    pub model: TimetableModel,

    /// End of the planning window, if the file carries one.  The CLI's
    /// `--end-date` takes precedence.
    pub end_date: Option<NaiveDate>,
}

impl Plan {
    /// Parse `path` into a validated [`Plan`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is
    /// structurally invalid, or the subject/slot data fails model validation.
    pub fn load_from_file(path: &Path) -> Result<Plan> {
        info!("Loading attendance plan from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open plan file: {}", path.display()))?;

        let file: PlanFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML plan: {}", path.display()))?;

        Self::from_plan_file(file)
    }

    fn from_plan_file(file: PlanFile) -> Result<Plan> {
        let mut model = TimetableModel::new(file.periods_per_day)
            .context("invalid periods_per_day in plan")?;

        if file.subjects.is_empty() {
            warn!("Plan contains no subjects; only the spacing rules will constrain leave dates");
        }

        let subjects: Vec<Subject> = file
            .subjects
            .iter()
            .map(|s| Subject::new(s.name.clone(), s.attended, s.total))
            .collect();
        model
            .set_subjects(subjects)
            .context("invalid subject list in plan")?;

        for (index, subject) in file.subjects.iter().enumerate() {
            for slot in &subject.slots {
                let day = TeachingDay::from_index(slot.day)
                    .ok_or(ModelError::DayOutOfRange { day: slot.day })
                    .with_context(|| format!("invalid slot for subject '{}'", subject.name))?;

                if let Some(previous) = model.slot_owner(day, slot.period) {
                    warn!(
                        day = %day,
                        period = slot.period,
                        previous = %file.subjects[previous].name,
                        "slot listed more than once; keeping the later assignment"
                    );
                }

                model
                    .set_slot(day, slot.period, Some(index))
                    .with_context(|| format!("invalid slot for subject '{}'", subject.name))?;
            }

            debug!(
                subject = %subject.name,
                attended = subject.attended,
                total = subject.total,
                slot_count = subject.slots.len(),
                "subject loaded"
            );
        }

        info!(
            subject_count = model.subjects().len(),
            periods_per_day = model.periods_per_day(),
            end_date = ?file.end_date,
            "Attendance plan loaded"
        );

        Ok(Plan {
            model,
            end_date: file.end_date,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load_full_plan() {
        let yaml = r#"
periods_per_day: 6
end_date: 2026-12-18
subjects:
  - name: Mathematics
    attended: 30
    total: 40
    slots:
      - { day: 0, period: 0 }
      - { day: 2, period: 3 }
  - name: Physics
    attended: 26
    total: 32
"#;
        let f = yaml_tempfile(yaml);
        let plan = Plan::load_from_file(f.path()).unwrap();

        assert_eq!(plan.model.subjects().len(), 2);
        assert_eq!(plan.model.periods_per_day(), 6);
        assert_eq!(
            plan.end_date,
            Some(NaiveDate::from_ymd_opt(2026, 12, 18).unwrap())
        );

        let math = &plan.model.subjects()[0];
        assert_eq!(math.name, "Mathematics");
        assert_eq!((math.attended, math.total), (30, 40));
        assert_eq!(plan.model.slot_owner(TeachingDay::Monday, 0), Some(0));
        assert_eq!(plan.model.slot_owner(TeachingDay::Wednesday, 3), Some(0));
        assert_eq!(plan.model.periods_on(1, TeachingDay::Monday), 0);
    }

    #[test]
    fn end_date_is_optional() {
        let yaml = "periods_per_day: 4\nsubjects: []\n";
        let f = yaml_tempfile(yaml);
        let plan = Plan::load_from_file(f.path()).unwrap();
        assert_eq!(plan.end_date, None);
        assert!(plan.model.subjects().is_empty());
    }

    #[test]
    fn duplicate_slot_keeps_the_later_assignment() {
        let yaml = r#"
periods_per_day: 6
subjects:
  - name: Mathematics
    attended: 30
    total: 40
    slots:
      - { day: 1, period: 2 }
  - name: Physics
    attended: 26
    total: 32
    slots:
      - { day: 1, period: 2 }
"#;
        let f = yaml_tempfile(yaml);
        let plan = Plan::load_from_file(f.path()).unwrap();
        assert_eq!(plan.model.slot_owner(TeachingDay::Tuesday, 2), Some(1));
    }

    #[test]
    fn invalid_day_index_returns_error() {
        let yaml = r#"
periods_per_day: 6
subjects:
  - name: Mathematics
    attended: 30
    total: 40
    slots:
      - { day: 5, period: 0 }
"#;
        let f = yaml_tempfile(yaml);
        assert!(Plan::load_from_file(f.path()).is_err());
    }

    #[test]
    fn period_out_of_range_returns_error() {
        let yaml = r#"
periods_per_day: 2
subjects:
  - name: Mathematics
    attended: 30
    total: 40
    slots:
      - { day: 0, period: 2 }
"#;
        let f = yaml_tempfile(yaml);
        assert!(Plan::load_from_file(f.path()).is_err());
    }

    #[test]
    fn attended_above_total_returns_error() {
        let yaml = r#"
periods_per_day: 6
subjects:
  - name: Mathematics
    attended: 41
    total: 40
"#;
        let f = yaml_tempfile(yaml);
        assert!(Plan::load_from_file(f.path()).is_err());
    }

    #[test]
    fn zero_periods_per_day_returns_error() {
        let f = yaml_tempfile("periods_per_day: 0\nsubjects: []\n");
        assert!(Plan::load_from_file(f.path()).is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = Plan::load_from_file(Path::new("/nonexistent/plan.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(Plan::load_from_file(f.path()).is_err());
    }
}
