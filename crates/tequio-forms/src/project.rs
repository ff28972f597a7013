//! Pre-submission validation for project records.
//!
//! The checks run synchronously over state the form already holds and
//! short-circuit on the first failure, in a fixed order: student, date
//! range, uniqueness. A rejection is a value, not a panic — the caller
//! renders the message and the form stays open with its input intact. No
//! network call happens on a rejected draft.

use tequio_core::record::{Project, ProjectDraft};
use thiserror::Error;

/// Why a project submission was refused. All variants are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("select a student before saving")]
  MissingStudent,

  #[error("the end date must be on or after the start date")]
  InvalidDateRange,

  /// Carries the conflicting project's name so the operator is told which
  /// project already holds the student.
  #[error("this student is already assigned to project \"{project}\"")]
  DuplicateStudentAssignment { project: String },
}

/// Run the pre-submission checks against the fetched project collection.
///
/// The date check only applies when both dates are present (equal dates
/// pass). The uniqueness scan skips the record being edited — a new draft
/// has no id and therefore never matches itself.
pub fn validate(
  draft: &ProjectDraft,
  projects: &[Project],
) -> Result<(), ValidationError> {
  let Some(student_id) = draft.student_id else {
    return Err(ValidationError::MissingStudent);
  };

  if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
    if end < start {
      return Err(ValidationError::InvalidDateRange);
    }
  }

  if let Some(taken) = projects
    .iter()
    .find(|p| p.student_id == Some(student_id) && draft.id != Some(p.id))
  {
    return Err(ValidationError::DuplicateStudentAssignment {
      project: taken.name.clone(),
    });
  }

  Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use tequio_core::{
    id::{ProjectId, StudentId},
    record::ProjectStatus,
  };

  use super::*;

  fn project(id: i64, student: i64, name: &str) -> Project {
    Project {
      id: ProjectId(id),
      name: name.into(),
      description: String::new(),
      status: ProjectStatus::InProgress,
      coordinator_id: None,
      institution_id: None,
      student_id: Some(StudentId(student)),
      start_date: None,
      end_date: None,
      student: None,
      coordinator: None,
      institution: None,
    }
  }

  fn draft_with_student(student: i64) -> ProjectDraft {
    ProjectDraft {
      student_id: Some(StudentId(student)),
      ..ProjectDraft::default()
    }
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  // ── Ordering ──────────────────────────────────────────────────────────

  #[test]
  fn missing_student_wins_over_everything_else() {
    // Bad dates AND a would-be duplicate: the student check still fires
    // first.
    let draft = ProjectDraft {
      student_id: None,
      start_date: Some(date(2025, 3, 10)),
      end_date: Some(date(2025, 3, 1)),
      ..ProjectDraft::default()
    };
    let existing = vec![project(1, 7, "Alfa")];
    assert_eq!(
      validate(&draft, &existing),
      Err(ValidationError::MissingStudent)
    );
  }

  #[test]
  fn date_check_runs_before_uniqueness() {
    let draft = ProjectDraft {
      start_date: Some(date(2025, 3, 10)),
      end_date: Some(date(2025, 3, 1)),
      ..draft_with_student(7)
    };
    let existing = vec![project(1, 7, "Alfa")];
    assert_eq!(
      validate(&draft, &existing),
      Err(ValidationError::InvalidDateRange)
    );
  }

  // ── Date boundaries ───────────────────────────────────────────────────

  #[test]
  fn equal_dates_are_accepted() {
    let draft = ProjectDraft {
      start_date: Some(date(2025, 3, 10)),
      end_date: Some(date(2025, 3, 10)),
      ..draft_with_student(7)
    };
    assert_eq!(validate(&draft, &[]), Ok(()));
  }

  #[test]
  fn end_one_day_before_start_is_rejected() {
    let draft = ProjectDraft {
      start_date: Some(date(2025, 3, 10)),
      end_date: Some(date(2025, 3, 9)),
      ..draft_with_student(7)
    };
    assert_eq!(validate(&draft, &[]), Err(ValidationError::InvalidDateRange));
  }

  #[test]
  fn missing_either_date_skips_the_range_check() {
    let draft = ProjectDraft {
      start_date: Some(date(2025, 3, 10)),
      end_date: None,
      ..draft_with_student(7)
    };
    assert_eq!(validate(&draft, &[]), Ok(()));
  }

  // ── Uniqueness ────────────────────────────────────────────────────────

  #[test]
  fn new_draft_with_taken_student_names_the_conflict() {
    let existing = vec![project(1, 7, "Alfa"), project(2, 8, "Beta")];
    assert_eq!(
      validate(&draft_with_student(7), &existing),
      Err(ValidationError::DuplicateStudentAssignment {
        project: "Alfa".into()
      })
    );
  }

  #[test]
  fn editing_a_project_may_keep_its_own_student() {
    let existing = vec![project(1, 7, "Alfa")];
    let draft = ProjectDraft {
      id: Some(ProjectId(1)),
      ..draft_with_student(7)
    };
    assert_eq!(validate(&draft, &existing), Ok(()));
  }

  #[test]
  fn editing_cannot_steal_another_projects_student() {
    let existing = vec![project(1, 7, "Alfa"), project(2, 8, "Beta")];
    let draft = ProjectDraft {
      id: Some(ProjectId(2)),
      ..draft_with_student(7)
    };
    assert_eq!(
      validate(&draft, &existing),
      Err(ValidationError::DuplicateStudentAssignment {
        project: "Alfa".into()
      })
    );
  }

  #[test]
  fn finished_projects_still_hold_their_student() {
    let mut p = project(1, 7, "Alfa");
    p.status = ProjectStatus::Finished;
    assert_eq!(
      validate(&draft_with_student(7), &[p]),
      Err(ValidationError::DuplicateStudentAssignment {
        project: "Alfa".into()
      })
    );
  }
}
