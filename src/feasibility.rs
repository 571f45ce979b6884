//! Feasibility checking for decoded schedules.
//!
//! Re-validates a schedule's recorded times against the instance without
//! trusting the decoder:
//!
//! - **Precedence**: within every job that has recorded times, each
//!   operation starts no earlier than its predecessor ends.
//! - **Exclusivity**: on every machine, consecutive operations of the
//!   machine order do not overlap.
//! - **Windows**: every sequenced operation starts at or after 0 and lasts
//!   exactly its duration.
//!
//! Only the supplied order is certified. No alternative order is explored.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 7: Job Shops

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{OperationKey, ProblemInstance, Schedule, TimeWindow};

/// A constraint violation found in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub kind: ViolationKind,
    /// Related entity ID (job, machine or operation key).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// An operation that must be timed has no recorded window.
    MissingTimes,
    /// A job ID is not part of the instance.
    UnknownJob,
    /// A machine ID is not part of the instance.
    UnknownMachine,
    /// An operation index exceeds its job's operation count.
    OperationOutOfRange,
    /// An operation is sequenced on a machine it is not bound to.
    MachineMismatch,
    /// An operation starts before its job predecessor ends.
    PrecedenceViolation,
    /// Two consecutive operations on a machine overlap.
    MachineOverlap,
    /// A window starts before time 0.
    NegativeStart,
    /// A window's length differs from the operation's duration.
    DurationMismatch,
}

impl Violation {
    fn new(kind: ViolationKind, entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}): {}", self.kind, self.entity_id, self.message)
    }
}

/// Whether a schedule satisfies every precedence, exclusivity and window constraint.
pub fn is_feasible(schedule: &Schedule, instance: &ProblemInstance) -> bool {
    check(schedule, instance).is_ok()
}

/// Collects every violation in a schedule.
///
/// # Returns
/// `Ok(())` if the schedule is feasible, `Err(violations)` otherwise.
pub fn check(schedule: &Schedule, instance: &ProblemInstance) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();
    check_precedence(schedule, instance, &mut violations);
    check_machines(schedule, instance, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        tracing::trace!(count = violations.len(), "schedule is infeasible");
        Err(violations)
    }
}

fn check_precedence(schedule: &Schedule, instance: &ProblemInstance, violations: &mut Vec<Violation>) {
    for job_id in schedule.operation_times().keys() {
        let Some(job) = instance.job(job_id) else {
            violations.push(Violation::new(
                ViolationKind::UnknownJob,
                job_id,
                format!("Recorded times for unknown job '{job_id}'"),
            ));
            continue;
        };

        for index in 1..job.operation_count() {
            let prev = OperationKey::new(job_id.as_str(), index - 1);
            let next = OperationKey::new(job_id.as_str(), index);
            match (schedule.time_window(&prev), schedule.time_window(&next)) {
                (Some(before), Some(after)) => {
                    if after.start < before.end {
                        violations.push(Violation::new(
                            ViolationKind::PrecedenceViolation,
                            next.to_string(),
                            format!(
                                "{next} starts at {} before {prev} ends at {}",
                                after.start, before.end
                            ),
                        ));
                    }
                }
                (before, after) => {
                    for (key, window) in [(prev, before), (next, after)] {
                        if window.is_none() {
                            violations.push(missing_times(&key));
                        }
                    }
                }
            }
        }
    }
}

fn check_machines(schedule: &Schedule, instance: &ProblemInstance, violations: &mut Vec<Violation>) {
    for (machine_id, sequence) in schedule.machine_order() {
        if instance.machine(machine_id).is_none() {
            violations.push(Violation::new(
                ViolationKind::UnknownMachine,
                machine_id,
                format!("Machine order references unknown machine '{machine_id}'"),
            ));
            continue;
        }

        for key in sequence {
            match instance.job(&key.job_id) {
                None => violations.push(Violation::new(
                    ViolationKind::UnknownJob,
                    key.to_string(),
                    format!("{key} on {machine_id} references unknown job '{}'", key.job_id),
                )),
                Some(job) => match job.operation(key.op_index) {
                    None => violations.push(Violation::new(
                        ViolationKind::OperationOutOfRange,
                        key.to_string(),
                        format!(
                            "{key} is out of range (job has {} operations)",
                            job.operation_count()
                        ),
                    )),
                    Some(op) if op.machine_id() != machine_id => violations.push(Violation::new(
                        ViolationKind::MachineMismatch,
                        key.to_string(),
                        format!(
                            "{key} is bound to {} but sequenced on {machine_id}",
                            op.machine_id()
                        ),
                    )),
                    Some(op) => {
                        if let Some(window) = schedule.time_window(key) {
                            check_window(key, window, op.duration(), violations);
                        }
                    }
                },
            }
            if schedule.time_window(key).is_none() {
                violations.push(missing_times(key));
            }
        }

        for pair in sequence.windows(2) {
            let (Some(prev), Some(next)) = (schedule.time_window(&pair[0]), schedule.time_window(&pair[1])) else {
                continue;
            };
            if next.start < prev.end {
                violations.push(Violation::new(
                    ViolationKind::MachineOverlap,
                    machine_id,
                    format!(
                        "{} [{},{}] overlaps {} [{},{}] on {machine_id}",
                        pair[0], prev.start, prev.end, pair[1], next.start, next.end
                    ),
                ));
            }
        }
    }
}

fn check_window(key: &OperationKey, window: TimeWindow, duration: i64, violations: &mut Vec<Violation>) {
    if window.start < 0 {
        violations.push(Violation::new(
            ViolationKind::NegativeStart,
            key.to_string(),
            format!("{key} starts at {}", window.start),
        ));
    }
    if window.end.checked_sub(window.start) != Some(duration) {
        violations.push(Violation::new(
            ViolationKind::DurationMismatch,
            key.to_string(),
            format!(
                "{key} window [{},{}] does not match duration {duration}",
                window.start, window.end
            ),
        ));
    }
}

fn missing_times(key: &OperationKey) -> Violation {
    Violation::new(
        ViolationKind::MissingTimes,
        key.to_string(),
        format!("{key} has no recorded times"),
    )
}
