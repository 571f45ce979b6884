//! Construct-then-improve scheduling pipeline.
//!
//! # Algorithm
//!
//! 1. Build a schedule with each configured [`Heuristic`].
//! 2. Improve each one with adjacent-swap local search (unless disabled).
//! 3. Keep the lowest makespan. Ties go to the heuristic listed first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kpi::{makespan, ScheduleKpi};
use crate::decoder::{DecodeError, DecoderConfig};
use crate::dispatching::{DispatchError, Heuristic};
use crate::models::{ProblemInstance, Schedule};
use crate::search::{LocalSearch, LocalSearchConfig};

/// Errors raised by [`Scheduler::schedule`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("no heuristics configured")]
    NoHeuristics,
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Per-heuristic summary of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicRun {
    /// Heuristic used for construction.
    pub heuristic: Heuristic,
    /// Makespan straight out of the heuristic.
    pub constructed_makespan: i64,
    /// Makespan after local search (equal to the above when disabled).
    pub improved_makespan: i64,
    /// Local search sweeps performed.
    pub iterations: usize,
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Best decoded schedule.
    pub best: Schedule,
    /// Makespan of `best`.
    pub makespan: i64,
    /// Heuristic that produced `best`.
    pub heuristic: Heuristic,
    /// One entry per heuristic, in configuration order.
    pub runs: Vec<HeuristicRun>,
}

impl ScheduleOutcome {
    /// KPIs of the best schedule.
    pub fn kpi(&self, instance: &ProblemInstance) -> Option<ScheduleKpi> {
        ScheduleKpi::calculate(&self.best, instance)
    }
}

/// Construct-then-improve scheduler.
///
/// # Example
///
/// ```
/// use jobshop_core::models::ProblemInstance;
/// use jobshop_core::scheduler::Scheduler;
///
/// let instance = ProblemInstance::builder()
///     .machines(["M1", "M2"])
///     .job("J1", [("M1", 5), ("M2", 3)])
///     .job("J2", [("M2", 2), ("M1", 4)])
///     .build()
///     .unwrap();
///
/// let outcome = Scheduler::new().schedule(&instance).unwrap();
/// assert_eq!(outcome.makespan, 9);
/// assert_eq!(outcome.runs.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    heuristics: Vec<Heuristic>,
    local_search: Option<LocalSearchConfig>,
    decoder: DecoderConfig,
}

impl Scheduler {
    /// Creates a scheduler running SPT, LJF and CP, each followed by
    /// local search with default settings.
    pub fn new() -> Self {
        Self {
            heuristics: Heuristic::ALL.to_vec(),
            local_search: Some(LocalSearchConfig::default()),
            decoder: DecoderConfig::default(),
        }
    }

    /// Sets the heuristics to run, in tie-breaking order.
    pub fn with_heuristics(mut self, heuristics: Vec<Heuristic>) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Enables local search with the given configuration.
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = Some(config);
        self
    }

    /// Disables local search.
    pub fn without_improvement(mut self) -> Self {
        self.local_search = None;
        self
    }

    /// Sets the decoder for construction and for the current local search.
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        if let Some(config) = self.local_search.as_mut() {
            config.decoder = decoder;
        }
        self
    }

    /// Configured heuristics.
    pub fn heuristics(&self) -> &[Heuristic] {
        &self.heuristics
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    /// [`SchedulerError::NoHeuristics`] for an empty heuristic list. A
    /// failing heuristic or search aborts the whole run.
    #[tracing::instrument(level = "debug", skip_all, fields(jobs = instance.job_count(), machines = instance.machine_count()))]
    pub fn schedule(&self, instance: &ProblemInstance) -> Result<ScheduleOutcome, SchedulerError> {
        let mut runs = Vec::with_capacity(self.heuristics.len());
        let mut best: Option<(Heuristic, Schedule, i64)> = None;

        for &heuristic in &self.heuristics {
            let constructed = heuristic.build(instance, &self.decoder)?;
            let constructed_makespan = makespan(&constructed);

            let (schedule, improved_makespan, iterations) = match &self.local_search {
                Some(config) => {
                    let outcome = LocalSearch::new(instance)
                        .with_config(*config)
                        .run(&constructed)?;
                    (outcome.schedule, outcome.makespan, outcome.iterations)
                }
                None => (constructed, constructed_makespan, 0),
            };

            tracing::debug!(
                heuristic = heuristic.name(),
                constructed_makespan,
                improved_makespan,
                iterations,
                "heuristic run finished"
            );
            runs.push(HeuristicRun {
                heuristic,
                constructed_makespan,
                improved_makespan,
                iterations,
            });

            let better = match &best {
                Some((_, _, incumbent)) => improved_makespan < *incumbent,
                None => true,
            };
            if better {
                best = Some((heuristic, schedule, improved_makespan));
            }
        }

        let (heuristic, best, makespan) = best.ok_or(SchedulerError::NoHeuristics)?;
        tracing::debug!(heuristic = heuristic.name(), makespan, "best schedule selected");
        Ok(ScheduleOutcome {
            best,
            makespan,
            heuristic,
            runs,
        })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
