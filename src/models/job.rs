//! Job model.
//!
//! A job is an ordered sequence of operations. Index 0..n-1 is the
//! mandatory processing order: operation `i + 1` may not start before
//! operation `i` ends.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Operation;

/// A job to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: String,
    operations: Vec<Operation>,
}

impl Job {
    /// Creates a job from its ordered operations.
    pub fn new(id: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            id: id.into(),
            operations,
        }
    }

    /// Creates a job from `(machine_id, duration)` steps, assigning indices
    /// in the given order.
    pub fn from_steps<I, M>(id: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = (M, i64)>,
        M: Into<String>,
    {
        let id = id.into();
        let operations = steps
            .into_iter()
            .enumerate()
            .map(|(index, (machine, duration))| Operation::new(id.clone(), index, machine, duration))
            .collect();
        Self { id, operations }
    }

    /// Job identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Operations in processing order.
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operation at `index`, if in range.
    pub fn operation(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Sum of all operation durations.
    pub fn total_processing_time(&self) -> i64 {
        self.operations.iter().map(Operation::duration).sum()
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Job({}, total={}, ops=[",
            self.id,
            self.total_processing_time()
        )?;
        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{op}")?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_from_steps() {
        let job = Job::from_steps("J1", [("M1", 10), ("M2", 5), ("M3", 8)]);
        assert_eq!(job.id(), "J1");
        assert_eq!(job.operation_count(), 3);
        assert_eq!(job.operations()[1].machine_id(), "M2");
        assert_eq!(job.operations()[2].index(), 2);
        assert_eq!(job.operations()[2].job_id(), "J1");
    }

    #[test]
    fn test_job_total_processing_time() {
        let job = Job::from_steps("J1", [("M1", 10), ("M2", 5), ("M3", 8)]);
        assert_eq!(job.total_processing_time(), 23);
    }

    #[test]
    fn test_job_operation_lookup() {
        let job = Job::from_steps("J2", [("M2", 3), ("M1", 7)]);
        assert_eq!(job.operation(1).map(Operation::duration), Some(7));
        assert!(job.operation(2).is_none());
    }

    #[test]
    fn test_job_empty() {
        let job = Job::new("empty", Vec::new());
        assert_eq!(job.total_processing_time(), 0);
        assert_eq!(job.operation_count(), 0);
    }
}
