//! Greedy schedule construction from dispatching rules.
//!
//! # Algorithm
//!
//! 1. Track the next unscheduled operation index of every job.
//! 2. Rank all ready operations with a [`RuleEngine`] and append the best
//!    one to its machine's sequence.
//! 3. Repeat until every operation is placed, then decode the order.
//!
//! Every operation is placed exactly once, and each machine sequence lists
//! a job's operations in job order.
//!
//! # Reference
//! Giffler & Thompson (1960), "Algorithms for Solving Production-Scheduling Problems"

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use super::rules::{CriticalFirst, Ljf, Spt};
use super::{DispatchContext, ReadyOperation, RuleEngine};
use crate::decoder::{decode_schedule, DecodeError, DecoderConfig};
use crate::models::{MachineOrder, ProblemInstance, Schedule};

/// Errors raised while building a schedule by dispatching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no ready operation with {placed} of {total} operations placed")]
    NoReadyOperation { placed: usize, total: usize },
    #[error("constructed order failed to decode: {0}")]
    Decode(#[from] DecodeError),
}

/// Built-in construction heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heuristic {
    /// Shortest Processing Time.
    Spt,
    /// Longest Job First.
    Ljf,
    /// SPT, then a rebuild that favors the jobs finishing at its makespan.
    CriticalPath,
}

impl Heuristic {
    /// All heuristics, in their default evaluation order.
    pub const ALL: [Heuristic; 3] = [Heuristic::Spt, Heuristic::Ljf, Heuristic::CriticalPath];

    /// Short name.
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Spt => "SPT",
            Heuristic::Ljf => "LJF",
            Heuristic::CriticalPath => "CP",
        }
    }

    /// Builds a decoded schedule with this heuristic.
    pub fn build(&self, instance: &ProblemInstance, decoder: &DecoderConfig) -> Result<Schedule, DispatchError> {
        match self {
            Heuristic::Spt => build_spt_with(instance, decoder),
            Heuristic::Ljf => build_ljf_with(instance, decoder),
            Heuristic::CriticalPath => build_critical_path_with(instance, decoder),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds a decoded schedule by greedy dispatching.
pub fn construct(
    instance: &ProblemInstance,
    engine: &RuleEngine,
    context: &DispatchContext,
    decoder: &DecoderConfig,
) -> Result<Schedule, DispatchError> {
    let total = instance.operation_count();
    let mut next: BTreeMap<&str, usize> = instance.jobs().map(|job| (job.id(), 0)).collect();
    let mut order: MachineOrder = instance
        .machines()
        .map(|machine| (machine.id().to_string(), Vec::new()))
        .collect();

    for placed in 0..total {
        let ready: Vec<ReadyOperation<'_>> = instance
            .jobs()
            .filter_map(|job| ReadyOperation::new(job, next.get(job.id()).copied().unwrap_or_default()))
            .collect();

        let Some(best) = engine.select_best(&ready, context) else {
            tracing::error!(placed, total, "no ready operation while operations remain");
            return Err(DispatchError::NoReadyOperation { placed, total });
        };

        let chosen = ready[best];
        tracing::trace!(operation = %chosen.operation, candidates = ready.len(), "dispatched");
        order
            .entry(chosen.operation.machine_id().to_string())
            .or_default()
            .push(chosen.key());
        if let Some(index) = next.get_mut(chosen.job.id()) {
            *index += 1;
        }
    }

    let mut schedule = Schedule::from_machine_order(order);
    decode_schedule(&mut schedule, instance, decoder)?;
    Ok(schedule)
}

/// Jobs with an operation ending exactly at the schedule's makespan.
///
/// Several jobs may tie. Empty for an undecoded schedule.
pub fn critical_jobs(schedule: &Schedule) -> BTreeSet<String> {
    let Some(makespan) = schedule.makespan() else {
        return BTreeSet::new();
    };
    schedule
        .operation_times()
        .iter()
        .filter(|(_, ops)| ops.values().any(|w| w.end == makespan))
        .map(|(job_id, _)| job_id.clone())
        .collect()
}

/// Shortest Processing Time heuristic.
pub fn build_spt(instance: &ProblemInstance) -> Result<Schedule, DispatchError> {
    build_spt_with(instance, &DecoderConfig::default())
}

/// [`build_spt`] with an explicit decoder configuration.
pub fn build_spt_with(instance: &ProblemInstance, decoder: &DecoderConfig) -> Result<Schedule, DispatchError> {
    let engine = RuleEngine::new().with_rule(Spt);
    finish("SPT", construct(instance, &engine, &DispatchContext::new(), decoder))
}

/// Longest Job First heuristic.
pub fn build_ljf(instance: &ProblemInstance) -> Result<Schedule, DispatchError> {
    build_ljf_with(instance, &DecoderConfig::default())
}

/// [`build_ljf`] with an explicit decoder configuration.
pub fn build_ljf_with(instance: &ProblemInstance, decoder: &DecoderConfig) -> Result<Schedule, DispatchError> {
    let engine = RuleEngine::new().with_rule(Ljf);
    finish("LJF", construct(instance, &engine, &DispatchContext::new(), decoder))
}

/// Critical-path heuristic.
///
/// Builds an SPT schedule, marks the jobs finishing at its makespan as
/// critical, then rebuilds from scratch dispatching critical jobs first
/// (SPT among equals).
pub fn build_critical_path(instance: &ProblemInstance) -> Result<Schedule, DispatchError> {
    build_critical_path_with(instance, &DecoderConfig::default())
}

/// [`build_critical_path`] with an explicit decoder configuration.
pub fn build_critical_path_with(
    instance: &ProblemInstance,
    decoder: &DecoderConfig,
) -> Result<Schedule, DispatchError> {
    let reference = build_spt_with(instance, decoder)?;
    let critical = critical_jobs(&reference);
    tracing::trace!(?critical, "critical jobs from SPT schedule");

    let engine = RuleEngine::new()
        .with_rule(CriticalFirst)
        .with_tie_breaker(Spt);
    let context = DispatchContext::new().with_critical_jobs(critical);
    finish("CP", construct(instance, &engine, &context, decoder))
}

fn finish(name: &str, result: Result<Schedule, DispatchError>) -> Result<Schedule, DispatchError> {
    match &result {
        Ok(schedule) => tracing::debug!(heuristic = name, makespan = ?schedule.makespan(), "heuristic finished"),
        Err(e) => tracing::debug!(heuristic = name, error = %e, "heuristic failed"),
    }
    result
}
