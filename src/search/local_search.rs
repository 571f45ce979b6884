//! Best-improvement adjacent-swap local search.
//!
//! # Algorithm
//!
//! 1. Decode the input schedule (failure aborts the search).
//! 2. Evaluate every candidate of the [`AdjacentSwaps`] neighborhood:
//!    decode, check feasibility, compute the makespan.
//! 3. Accept the candidate with the lowest makespan strictly below the
//!    current one (first in enumeration order on ties).
//! 4. Repeat until no candidate improves or the iteration limit is hit.
//!
//! The returned makespan never exceeds the input's decoded makespan.

use serde::{Deserialize, Serialize};

use super::{AdjacentSwap, AdjacentSwaps};
use crate::decoder::{decode_schedule, DecodeError, DecoderConfig};
use crate::feasibility::is_feasible;
use crate::models::{OperationKey, ProblemInstance, Schedule};
use crate::scheduler::kpi::{makespan, MAKESPAN_SENTINEL};

/// Local search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSearchConfig {
    /// Maximum number of neighborhood sweeps.
    pub max_iterations: usize,
    /// Decoder used for the input and every candidate.
    pub decoder: DecoderConfig,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            decoder: DecoderConfig::default(),
        }
    }
}

impl LocalSearchConfig {
    /// Sets the iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the decoder configuration.
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }
}

/// An accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMove {
    /// Machine whose sequence was modified.
    pub machine_id: String,
    /// Index of the first swapped entry.
    pub position: usize,
    /// Operation moved from `position` to `position + 1`.
    pub first: OperationKey,
    /// Operation moved from `position + 1` to `position`.
    pub second: OperationKey,
    /// Makespan after the move.
    pub makespan: i64,
}

impl SwapMove {
    fn accepted(swap: AdjacentSwap, makespan: i64) -> Self {
        Self {
            machine_id: swap.machine_id,
            position: swap.position,
            first: swap.first,
            second: swap.second,
            makespan,
        }
    }
}

/// Result of a local search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Best schedule found, decoded.
    pub schedule: Schedule,
    /// Makespan of `schedule`.
    pub makespan: i64,
    /// Makespan of the decoded input.
    pub initial_makespan: i64,
    /// Neighborhood sweeps performed, including a final non-improving one.
    pub iterations: usize,
    /// Accepted moves, in order.
    pub accepted_moves: Vec<SwapMove>,
}

impl SearchOutcome {
    /// Whether any move was accepted.
    pub fn improved(&self) -> bool {
        !self.accepted_moves.is_empty()
    }

    /// Collapses a search result into a makespan, [`MAKESPAN_SENTINEL`] on
    /// decode failure.
    pub fn makespan_or_sentinel(result: &Result<SearchOutcome, DecodeError>) -> i64 {
        result
            .as_ref()
            .map_or(MAKESPAN_SENTINEL, |outcome| outcome.makespan)
    }
}

/// Adjacent-swap local search bound to a problem instance.
///
/// # Example
/// ```
/// use jobshop_core::dispatching::build_spt;
/// use jobshop_core::models::ProblemInstance;
/// use jobshop_core::search::{LocalSearch, LocalSearchConfig};
///
/// let instance = ProblemInstance::builder()
///     .machines(["M1", "M2"])
///     .job("J1", [("M1", 5), ("M2", 3)])
///     .job("J2", [("M2", 2), ("M1", 4)])
///     .build()
///     .unwrap();
/// let start = build_spt(&instance).unwrap();
///
/// let outcome = LocalSearch::new(&instance)
///     .with_config(LocalSearchConfig::default().with_max_iterations(10))
///     .run(&start)
///     .unwrap();
/// assert!(outcome.makespan <= outcome.initial_makespan);
/// ```
#[derive(Debug, Clone)]
pub struct LocalSearch<'a> {
    instance: &'a ProblemInstance,
    config: LocalSearchConfig,
}

impl<'a> LocalSearch<'a> {
    /// Creates a search with the default configuration.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            config: LocalSearchConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: LocalSearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    /// Improves a schedule. The input is never modified.
    ///
    /// # Errors
    /// Returns the decode error if the input's machine order cannot be
    /// decoded. Candidates that fail to decode are skipped.
    #[tracing::instrument(level = "debug", skip_all, fields(max_iterations = self.config.max_iterations))]
    pub fn run(&self, schedule: &Schedule) -> Result<SearchOutcome, DecodeError> {
        let mut current = schedule.clone();
        if let Err(e) = decode_schedule(&mut current, self.instance, &self.config.decoder) {
            tracing::debug!(error = %e, "input schedule failed to decode");
            return Err(e);
        }

        let initial_makespan = makespan(&current);
        let mut current_makespan = initial_makespan;
        let mut accepted_moves = Vec::new();
        let mut iterations = 0;
        tracing::debug!(initial_makespan, "local search started");

        while iterations < self.config.max_iterations {
            iterations += 1;

            let Some((swap, candidate, candidate_makespan)) = self.best_neighbor(&current, current_makespan) else {
                break;
            };

            tracing::debug!(
                iteration = iterations,
                machine = %swap.machine_id,
                position = swap.position,
                makespan = candidate_makespan,
                "accepted move"
            );
            accepted_moves.push(SwapMove::accepted(swap, candidate_makespan));
            current = candidate;
            current_makespan = candidate_makespan;
        }

        tracing::debug!(
            initial_makespan,
            makespan = current_makespan,
            iterations,
            moves = accepted_moves.len(),
            "local search finished"
        );

        Ok(SearchOutcome {
            schedule: current,
            makespan: current_makespan,
            initial_makespan,
            iterations,
            accepted_moves,
        })
    }

    /// Best feasible neighbor strictly better than `threshold`.
    fn best_neighbor(&self, current: &Schedule, threshold: i64) -> Option<(AdjacentSwap, Schedule, i64)> {
        let mut best: Option<(AdjacentSwap, Schedule, i64)> = None;

        for (swap, mut candidate) in AdjacentSwaps::new(current) {
            if let Err(e) = decode_schedule(&mut candidate, self.instance, &self.config.decoder) {
                tracing::trace!(machine = %swap.machine_id, position = swap.position, error = %e, "candidate rejected");
                continue;
            }
            if !is_feasible(&candidate, self.instance) {
                tracing::trace!(machine = %swap.machine_id, position = swap.position, "candidate infeasible");
                continue;
            }

            let candidate_makespan = makespan(&candidate);
            tracing::trace!(
                machine = %swap.machine_id,
                position = swap.position,
                makespan = candidate_makespan,
                "candidate evaluated"
            );

            let bar = best.as_ref().map_or(threshold, |(_, _, m)| *m);
            if candidate_makespan < bar {
                best = Some((swap, candidate, candidate_makespan));
            }
        }

        best
    }
}

/// Improves a schedule with the default decoder and `max_iterations` sweeps.
pub fn improve(
    schedule: &Schedule,
    instance: &ProblemInstance,
    max_iterations: usize,
) -> Result<SearchOutcome, DecodeError> {
    LocalSearch::new(instance)
        .with_max_iterations(max_iterations)
        .run(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::{build_ljf, build_spt, Heuristic};
    use crate::models::MachineOrder;

    fn key(job: &str, index: usize) -> OperationKey {
        OperationKey::new(job, index)
    }

    fn two_job_instance() -> ProblemInstance {
        ProblemInstance::builder()
            .machines(["M1", "M2"])
            .job("J1", [("M1", 5), ("M2", 3)])
            .job("J2", [("M2", 2), ("M1", 4)])
            .build()
            .unwrap()
    }

    fn three_job_instance() -> ProblemInstance {
        ProblemInstance::builder()
            .machines(["M1", "M2", "M3"])
            .job("J1", [("M1", 10), ("M2", 5), ("M3", 8)])
            .job("J2", [("M2", 3), ("M1", 7), ("M3", 4)])
            .job("J3", [("M3", 2), ("M2", 6), ("M1", 9)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_improves_spt_two_jobs() {
        // SPT gives 14; swapping M1 gives the optimal order with makespan 9.
        let instance = two_job_instance();
        let spt = build_spt(&instance).unwrap();
        assert_eq!(spt.makespan(), Some(14));

        let outcome = improve(&spt, &instance, 100).unwrap();
        assert_eq!(outcome.initial_makespan, 14);
        assert_eq!(outcome.makespan, 9);
        assert_eq!(outcome.iterations, 2);
        assert_eq!(
            outcome.accepted_moves,
            vec![SwapMove {
                machine_id: "M1".into(),
                position: 0,
                first: key("J2", 1),
                second: key("J1", 0),
                makespan: 9,
            }]
        );
        assert!(outcome.improved());
        assert!(is_feasible(&outcome.schedule, &instance));
        assert_eq!(outcome.schedule.makespan(), Some(9));
    }

    #[test]
    fn test_monotone_on_three_jobs() {
        let instance = three_job_instance();
        for heuristic in Heuristic::ALL {
            let start = heuristic.build(&instance, &DecoderConfig::default()).unwrap();
            let outcome = improve(&start, &instance, 100).unwrap();
            assert!(outcome.makespan <= start.makespan().unwrap());
            assert!(is_feasible(&outcome.schedule, &instance));

            let mut previous = outcome.initial_makespan;
            for mv in &outcome.accepted_moves {
                assert!(mv.makespan < previous);
                previous = mv.makespan;
            }
            assert_eq!(previous, outcome.makespan);
        }
    }

    #[test]
    fn test_input_is_not_modified() {
        let instance = three_job_instance();
        let start = build_ljf(&instance).unwrap();
        let copy = start.clone();
        let _ = improve(&start, &instance, 100).unwrap();
        assert_eq!(start, copy);
    }

    #[test]
    fn test_zero_iterations() {
        let instance = two_job_instance();
        let spt = build_spt(&instance).unwrap();
        let outcome = improve(&spt, &instance, 0).unwrap();
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.makespan, 14);
        assert!(!outcome.improved());
    }

    #[test]
    fn test_local_optimum_stops_after_one_sweep() {
        let instance = two_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J1", 0), key("J2", 1)]);
        order.insert("M2".into(), vec![key("J2", 0), key("J1", 1)]);

        let outcome = improve(&Schedule::from_machine_order(order), &instance, 100).unwrap();
        assert_eq!(outcome.makespan, 9);
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.accepted_moves.is_empty());
    }

    #[test]
    fn test_undecodable_input() {
        let instance = two_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J2", 1), key("J1", 0)]);
        order.insert("M2".into(), vec![key("J1", 1), key("J2", 0)]);

        let result = improve(&Schedule::from_machine_order(order), &instance, 100);
        assert!(matches!(result, Err(DecodeError::Unsatisfiable { .. })));
        assert_eq!(SearchOutcome::makespan_or_sentinel(&result), MAKESPAN_SENTINEL);
    }

    #[test]
    fn test_sweep_decoder_agrees() {
        let instance = three_job_instance();
        let start = build_spt(&instance).unwrap();
        let sweep = DecoderConfig::default().with_strategy(crate::decoder::DecodeStrategy::Sweep);

        let by_queue = improve(&start, &instance, 100).unwrap();
        let by_sweep = LocalSearch::new(&instance)
            .with_config(LocalSearchConfig::default().with_decoder(sweep))
            .run(&start)
            .unwrap();
        assert_eq!(by_queue, by_sweep);
    }

    #[test]
    fn test_config_serde() {
        let config = LocalSearchConfig::default().with_max_iterations(7);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LocalSearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.decoder, DecoderConfig::default());
    }
}
