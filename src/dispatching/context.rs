//! Dispatch context and ready-operation view.

use std::collections::BTreeSet;

use crate::models::{Job, Operation, OperationKey};

/// A dispatch candidate: the next unscheduled operation of a job.
#[derive(Debug, Clone, Copy)]
pub struct ReadyOperation<'a> {
    /// The owning job.
    pub job: &'a Job,
    /// The candidate operation.
    pub operation: &'a Operation,
}

impl<'a> ReadyOperation<'a> {
    /// Creates a candidate for `job`'s operation at `index`.
    ///
    /// Returns `None` if the job has no operation at that index.
    pub fn new(job: &'a Job, index: usize) -> Option<Self> {
        job.operation(index)
            .map(|operation| Self { job, operation })
    }

    /// Key of the candidate operation.
    pub fn key(&self) -> OperationKey {
        self.operation.key()
    }
}

/// State shared with dispatching rules during construction.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Jobs that finish at the makespan of a reference schedule.
    pub critical_jobs: BTreeSet<String>,
}

impl DispatchContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a job as critical.
    pub fn with_critical_job(mut self, job_id: impl Into<String>) -> Self {
        self.critical_jobs.insert(job_id.into());
        self
    }

    /// Marks several jobs as critical.
    pub fn with_critical_jobs<I, S>(mut self, job_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.critical_jobs
            .extend(job_ids.into_iter().map(Into::into));
        self
    }

    /// Whether a job is critical.
    pub fn is_critical(&self, job_id: &str) -> bool {
        self.critical_jobs.contains(job_id)
    }
}
