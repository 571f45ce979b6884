//! Operation model.
//!
//! An operation is the smallest schedulable unit of work: one step of a job,
//! bound to exactly one machine for a fixed duration.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable reference to an operation: `(job_id, op_index)`.
///
/// Schedules store keys instead of operations so that they never alias
/// data owned by the [`ProblemInstance`](super::ProblemInstance).
///
/// Keys order lexicographically by job id, then by index. Dispatch
/// heuristics rely on this ordering for deterministic tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationKey {
    /// Owning job identifier.
    pub job_id: String,
    /// Position within the job (0-indexed).
    pub op_index: usize,
}

impl OperationKey {
    /// Creates a new operation key.
    pub fn new(job_id: impl Into<String>, op_index: usize) -> Self {
        Self {
            job_id: job_id.into(),
            op_index,
        }
    }

    /// Key of the job predecessor, or `None` for a job's first operation.
    pub fn predecessor(&self) -> Option<OperationKey> {
        self.op_index
            .checked_sub(1)
            .map(|index| OperationKey::new(self.job_id.clone(), index))
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.job_id, self.op_index)
    }
}

/// An operation bound to one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    job_id: String,
    index: usize,
    machine_id: String,
    duration: i64,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(
        job_id: impl Into<String>,
        index: usize,
        machine_id: impl Into<String>,
        duration: i64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            index,
            machine_id: machine_id.into(),
            duration,
        }
    }

    /// Owning job identifier.
    #[inline]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Position within the job.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Machine this operation must run on.
    #[inline]
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    /// Processing time.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Stable key for this operation.
    pub fn key(&self) -> OperationKey {
        OperationKey::new(self.job_id.clone(), self.index)
    }

    /// Job predecessor key: `(job_id, index - 1)`, `None` for index 0.
    pub fn predecessor(&self) -> Option<OperationKey> {
        self.key().predecessor()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Op({}#{}, M={}, dur={})",
            self.job_id, self.index, self.machine_id, self.duration
        )
    }
}
