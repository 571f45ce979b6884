//! Random problem instance generation.
//!
//! Produces Taillard-style job-shop instances: every job visits every
//! machine exactly once, in a random order, with uniformly drawn integer
//! durations.
//!
//! # Reference
//! Taillard (1993), "Benchmarks for basic scheduling problems"

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{InstanceError, JobDefinition, OperationDefinition, ProblemDefinition, ProblemInstance};

/// Generator of random job-shop instances.
///
/// # Example
/// ```
/// use jobshop_core::generator::InstanceGenerator;
///
/// let instance = InstanceGenerator::new(4, 3).generate_seeded(42).unwrap();
/// assert_eq!(instance.job_count(), 4);
/// assert_eq!(instance.operation_count(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    num_jobs: usize,
    num_machines: usize,
    min_duration: i64,
    max_duration: i64,
}

impl InstanceGenerator {
    /// Creates a generator with durations in `1..=99`.
    pub fn new(num_jobs: usize, num_machines: usize) -> Self {
        Self {
            num_jobs,
            num_machines,
            min_duration: 1,
            max_duration: 99,
        }
    }

    /// Sets the inclusive duration range. The bounds are swapped if given
    /// in reverse.
    pub fn with_duration_range(mut self, min: i64, max: i64) -> Self {
        self.min_duration = min.min(max);
        self.max_duration = min.max(max);
        self
    }

    /// Generates an instance from the given random source.
    ///
    /// # Errors
    /// Returns [`InstanceError::Invalid`] for zero jobs, zero machines or a
    /// non-positive duration range.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<ProblemInstance, InstanceError> {
        let machines: Vec<String> = (1..=self.num_machines).map(|m| format!("M{m}")).collect();

        let jobs = (1..=self.num_jobs)
            .map(|j| {
                let mut route = machines.clone();
                route.shuffle(rng);
                JobDefinition {
                    id: format!("J{j}"),
                    operations: route
                        .into_iter()
                        .map(|machine| OperationDefinition {
                            machine,
                            duration: rng.random_range(self.min_duration..=self.max_duration),
                        })
                        .collect(),
                }
            })
            .collect();

        let instance = ProblemInstance::from_definition(ProblemDefinition { machines, jobs })?;
        tracing::debug!(
            jobs = instance.job_count(),
            machines = instance.machine_count(),
            "generated instance"
        );
        Ok(instance)
    }

    /// Generates an instance from a seeded [`StdRng`].
    pub fn generate_seeded(&self, seed: u64) -> Result<ProblemInstance, InstanceError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }
}
