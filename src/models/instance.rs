//! Problem instance: the validated, immutable input of every computation.
//!
//! An instance owns all jobs and machines, keyed by unique ID. It is built
//! once from a [`ProblemDefinition`] (directly, through
//! [`InstanceBuilder`], or from JSON) and only borrowed afterwards.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "machines": ["M1", "M2"],
//!   "jobs": [
//!     { "id": "J1", "operations": [{ "machine": "M1", "duration": 5 },
//!                                  { "machine": "M2", "duration": 3 }] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::{Job, Machine, Operation, OperationKey};
use crate::validation::{validate_definition, ValidationError};

/// Raw operation definition: machine reference and duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDefinition {
    /// Machine ID.
    pub machine: String,
    /// Processing time (must be > 0).
    pub duration: i64,
}

/// Raw job definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefinition {
    /// Job ID.
    pub id: String,
    /// Operations in processing order.
    pub operations: Vec<OperationDefinition>,
}

/// Raw, unvalidated problem definition (mirrors the JSON file format).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    /// Machine IDs.
    pub machines: Vec<String>,
    /// Jobs.
    pub jobs: Vec<JobDefinition>,
}

/// Errors raised while constructing a [`ProblemInstance`].
#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("invalid problem definition: {}", summarize(.0))]
    Invalid(Vec<ValidationError>),
    #[error("malformed problem JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for InstanceError {
    fn from(errors: Vec<ValidationError>) -> Self {
        InstanceError::Invalid(errors)
    }
}

/// A validated job-shop problem instance.
///
/// Jobs and machines are stored in ID order, so every ID-keyed iteration
/// is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInstance {
    machines: BTreeMap<String, Machine>,
    jobs: BTreeMap<String, Job>,
}

impl ProblemInstance {
    /// Starts a fluent builder.
    ///
    /// # Example
    /// ```
    /// use jobshop_core::models::ProblemInstance;
    ///
    /// let instance = ProblemInstance::builder()
    ///     .machines(["M1", "M2"])
    ///     .job("J1", [("M1", 5), ("M2", 3)])
    ///     .job("J2", [("M2", 2), ("M1", 4)])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(instance.operation_count(), 4);
    /// ```
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::default()
    }

    /// Validates a raw definition and builds the instance.
    pub fn from_definition(definition: ProblemDefinition) -> Result<Self, InstanceError> {
        validate_definition(&definition)?;

        let machines = definition
            .machines
            .into_iter()
            .map(|id| (id.clone(), Machine::new(id)))
            .collect();
        let jobs = definition
            .jobs
            .into_iter()
            .map(|job| {
                let steps = job.operations.into_iter().map(|op| (op.machine, op.duration));
                (job.id.clone(), Job::from_steps(job.id, steps))
            })
            .collect();

        Ok(Self { machines, jobs })
    }

    /// Parses and validates an instance from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, InstanceError> {
        let definition: ProblemDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    /// Converts back into a raw definition (e.g. for serialization).
    pub fn to_definition(&self) -> ProblemDefinition {
        ProblemDefinition {
            machines: self.machines.keys().cloned().collect(),
            jobs: self
                .jobs
                .values()
                .map(|job| JobDefinition {
                    id: job.id().to_string(),
                    operations: job
                        .operations()
                        .iter()
                        .map(|op| OperationDefinition {
                            machine: op.machine_id().to_string(),
                            duration: op.duration(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Looks up a machine.
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.get(id)
    }

    /// Looks up a job.
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Looks up the operation behind a key.
    pub fn operation(&self, key: &OperationKey) -> Option<&Operation> {
        self.job(&key.job_id)
            .and_then(|job| job.operation(key.op_index))
    }

    /// Machines in ID order.
    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.values()
    }

    /// Jobs in ID order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Total number of operations across all jobs.
    pub fn operation_count(&self) -> usize {
        self.jobs.values().map(Job::operation_count).sum()
    }

    /// Sum of all operation durations.
    pub fn total_processing_time(&self) -> i64 {
        self.jobs.values().map(Job::total_processing_time).sum()
    }
}

impl fmt::Display for ProblemInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machines:")?;
        for machine in self.machines.values() {
            writeln!(f, "  {machine}")?;
        }
        writeln!(f, "Jobs:")?;
        for job in self.jobs.values() {
            writeln!(f, "  {job}")?;
        }
        Ok(())
    }
}

/// Fluent builder for [`ProblemInstance`]. Validation happens in
/// [`build`](InstanceBuilder::build).
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    definition: ProblemDefinition,
}

impl InstanceBuilder {
    /// Adds a machine.
    pub fn machine(mut self, id: impl Into<String>) -> Self {
        self.definition.machines.push(id.into());
        self
    }

    /// Adds several machines.
    pub fn machines<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition
            .machines
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds a job from `(machine_id, duration)` steps in processing order.
    pub fn job<I, M>(mut self, id: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = (M, i64)>,
        M: Into<String>,
    {
        self.definition.jobs.push(JobDefinition {
            id: id.into(),
            operations: steps
                .into_iter()
                .map(|(machine, duration)| OperationDefinition {
                    machine: machine.into(),
                    duration,
                })
                .collect(),
        });
        self
    }

    /// Validates and builds the instance.
    pub fn build(self) -> Result<ProblemInstance, InstanceError> {
        ProblemInstance::from_definition(self.definition)
    }
}
