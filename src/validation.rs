//! Input validation for job-shop problem definitions.
//!
//! Checks the structural integrity of a raw [`ProblemDefinition`] before a
//! [`ProblemInstance`](crate::models::ProblemInstance) is built from it.
//! Detects:
//! - Empty machine or job sets
//! - Blank and duplicate IDs
//! - Jobs without operations
//! - Operations referencing unknown machines
//! - Non-positive durations
//! - Total processing time exceeding `i64`
//!
//! Every violation is reported, not just the first one.

use crate::models::ProblemDefinition;
use std::collections::HashSet;
use thiserror::Error;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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
    /// The machine list is empty.
    EmptyMachineSet,
    /// The job list is empty.
    EmptyJobSet,
    /// A machine or job ID is empty or whitespace-only.
    BlankId,
    /// Two machines or two jobs share the same ID.
    DuplicateId,
    /// A job has no operations.
    EmptyJob,
    /// An operation references a machine that doesn't exist.
    InvalidMachineReference,
    /// An operation duration is zero or negative.
    NonPositiveDuration,
    /// The sum of all durations does not fit in `i64`.
    TotalDurationOverflow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn is_blank(id: &str) -> bool {
    id.trim().is_empty()
}

/// Validates a raw problem definition.
///
/// Checks:
/// 1. At least one machine, at least one job
/// 2. No blank machine or job IDs
/// 3. No duplicate machine IDs, no duplicate job IDs
/// 4. Every job has at least one operation
/// 5. Every operation names an existing machine
/// 6. Every operation has a strictly positive duration
/// 7. The sum of all durations fits in `i64`, which bounds every decoded
///    end time and every job total
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_definition(definition: &ProblemDefinition) -> ValidationResult {
    let mut errors = Vec::new();

    if definition.machines.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyMachineSet,
            "Machine list cannot be empty",
        ));
    }

    let mut machine_ids = HashSet::new();
    for machine_id in &definition.machines {
        if is_blank(machine_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::BlankId,
                "Machine ID cannot be empty or whitespace",
            ));
            continue;
        }
        if !machine_ids.insert(machine_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate machine ID: {machine_id}"),
            ));
        }
    }

    if definition.jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyJobSet,
            "Job list cannot be empty",
        ));
    }

    let mut job_ids = HashSet::new();
    let mut total_duration: Option<i64> = Some(0);
    for job in &definition.jobs {
        if is_blank(&job.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::BlankId,
                "Job ID cannot be empty or whitespace",
            ));
        } else if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }

        if job.operations.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyJob,
                format!("Job '{}' has no operations", job.id),
            ));
        }

        for (index, op) in job.operations.iter().enumerate() {
            if !machine_ids.contains(op.machine.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMachineReference,
                    format!(
                        "Job '{}' op {} references unknown machine '{}'",
                        job.id, index, op.machine
                    ),
                ));
            }
            if op.duration <= 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonPositiveDuration,
                    format!(
                        "Job '{}' op {} has non-positive duration {}",
                        job.id, index, op.duration
                    ),
                ));
            } else {
                total_duration = total_duration.and_then(|total| total.checked_add(op.duration));
            }
        }
    }

    if total_duration.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::TotalDurationOverflow,
            "Total processing time overflows i64",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
