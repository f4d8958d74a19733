//! Input validation for rosters.
//!
//! Checks structural integrity of participants before matching.
//! Detects:
//! - Duplicate IDs
//! - Empty names or schools
//! - Non-finite or non-positive weights
//! - Grades outside Pre-K..=12
//!
//! The matcher assumes a roster that passed these checks and does not
//! re-validate field values.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Participant, GRADE_MAX, GRADE_PRE_K};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two participants share the same ID.
    DuplicateId,
    /// First or last name is blank.
    EmptyName,
    /// School is blank.
    EmptySchool,
    /// Weight is NaN, infinite, zero, or negative.
    InvalidWeight,
    /// Grade is outside `GRADE_PRE_K..=GRADE_MAX`.
    InvalidGrade,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster.
///
/// Checks:
/// 1. No duplicate participant IDs
/// 2. First and last names are non-blank
/// 3. School is non-blank
/// 4. Weight is finite and positive
/// 5. Grade lies in [`GRADE_PRE_K`]..=[`GRADE_MAX`]
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(roster: &[Participant]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for p in roster {
        if !ids.insert(p.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate participant ID: {}", p.id),
            ));
        }

        if p.first_name.trim().is_empty() || p.last_name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Participant {} has a blank name", p.id),
            ));
        }

        if p.school.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySchool,
                format!("Participant {} has no school", p.id),
            ));
        }

        if !p.weight.is_finite() || p.weight <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!("Participant {} has invalid weight {}", p.id, p.weight),
            ));
        }

        if !(GRADE_PRE_K..=GRADE_MAX).contains(&p.grade) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidGrade,
                format!("Participant {} has invalid grade {}", p.id, p.grade),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
