//! Schedule decoder: machine order → start/end times.
//!
//! Decoding is a deterministic simulation with exactly one output per input
//! ordering. Each operation starts at
//!
//! ```text
//! start = max(end of job predecessor, end of previous operation on the machine)
//! ```
//!
//! with 0 for a missing predecessor, and ends at `start + duration`.
//!
//! # Strategies
//!
//! - [`DecodeStrategy::ReadyQueue`] (default): topological evaluation over
//!   the DAG of job edges and machine-sequence edges. A machine that stalls
//!   on an untimed job predecessor is re-queued exactly when that
//!   predecessor gets timed.
//! - [`DecodeStrategy::Sweep`]: repeated passes over all machines until a
//!   full pass makes no progress, bounded by [`DecoderConfig::max_sweeps`].
//!
//! Both strategies produce identical windows.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

use crate::models::{MachineOrder, OperationKey, OperationTimes, ProblemInstance, Schedule, TimeWindow};

/// Errors that can occur while decoding a machine order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("operation {key} references unknown job")]
    UnknownJob { key: OperationKey },
    #[error("operation {key} is out of range (job has {operation_count} operations)")]
    OperationOutOfRange {
        key: OperationKey,
        operation_count: usize,
    },
    #[error("operation {key} is bound to machine {expected} but sequenced on {found}")]
    MachineMismatch {
        key: OperationKey,
        expected: String,
        found: String,
    },
    #[error("machine order references unknown machine {0}")]
    UnknownMachine(String),
    #[error("operation {0} appears more than once in the machine order")]
    DuplicateOperation(OperationKey),
    #[error("unsatisfiable machine order: only {timed} of {referenced} operations could be timed")]
    Unsatisfiable { timed: usize, referenced: usize },
    #[error("decoding did not settle within {sweeps} sweeps")]
    SweepLimitExceeded { sweeps: usize },
}

/// How the decoder walks the machine order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeStrategy {
    /// Event-driven topological evaluation.
    #[default]
    ReadyQueue,
    /// Repeated sweeps over all machines.
    Sweep,
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Evaluation strategy.
    pub strategy: DecodeStrategy,
    /// Safety valve for [`DecodeStrategy::Sweep`]. Ignored by the ready queue.
    pub max_sweeps: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            strategy: DecodeStrategy::ReadyQueue,
            max_sweeps: 10_000,
        }
    }
}

impl DecoderConfig {
    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: DecodeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the sweep ceiling.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }
}

/// Decodes a machine order with the default configuration.
///
/// # Example
/// ```
/// use jobshop_core::decoder::decode;
/// use jobshop_core::models::{MachineOrder, OperationKey, ProblemInstance};
///
/// let instance = ProblemInstance::builder()
///     .machines(["M1", "M2"])
///     .job("J1", [("M1", 5), ("M2", 3)])
///     .job("J2", [("M2", 2), ("M1", 4)])
///     .build()
///     .unwrap();
///
/// let mut order = MachineOrder::new();
/// order.insert("M1".into(), vec![OperationKey::new("J1", 0), OperationKey::new("J2", 1)]);
/// order.insert("M2".into(), vec![OperationKey::new("J2", 0), OperationKey::new("J1", 1)]);
///
/// let times = decode(&order, &instance).unwrap();
/// assert_eq!(times["J2"][&1].end, 9);
/// ```
pub fn decode(order: &MachineOrder, instance: &ProblemInstance) -> Result<OperationTimes, DecodeError> {
    decode_with(order, instance, &DecoderConfig::default())
}

/// Decodes a machine order with an explicit configuration.
pub fn decode_with(
    order: &MachineOrder,
    instance: &ProblemInstance,
    config: &DecoderConfig,
) -> Result<OperationTimes, DecodeError> {
    let durations = resolve(order, instance)?;
    let referenced = durations.len();

    let (times, timed) = match config.strategy {
        DecodeStrategy::ReadyQueue => ready_queue(order, &durations),
        DecodeStrategy::Sweep => sweep(order, &durations, config.max_sweeps)?,
    };

    if timed < referenced {
        tracing::debug!(timed, referenced, "machine order is unsatisfiable");
        return Err(DecodeError::Unsatisfiable { timed, referenced });
    }
    Ok(times)
}

/// Decodes a schedule in place: clears its times and records fresh ones.
///
/// On failure the schedule is left with no times.
pub fn decode_schedule(
    schedule: &mut Schedule,
    instance: &ProblemInstance,
    config: &DecoderConfig,
) -> Result<(), DecodeError> {
    schedule.clear_times();
    let times = decode_with(schedule.machine_order(), instance, config)?;
    schedule.set_operation_times(times);
    Ok(())
}

/// Checks every key against the instance and returns each key's duration.
fn resolve<'a>(
    order: &'a MachineOrder,
    instance: &ProblemInstance,
) -> Result<HashMap<&'a OperationKey, i64>, DecodeError> {
    let mut durations = HashMap::new();

    for (machine_id, sequence) in order {
        if instance.machine(machine_id).is_none() {
            return Err(DecodeError::UnknownMachine(machine_id.clone()));
        }

        for key in sequence {
            let job = instance
                .job(&key.job_id)
                .ok_or_else(|| DecodeError::UnknownJob { key: key.clone() })?;
            let op = job
                .operation(key.op_index)
                .ok_or_else(|| DecodeError::OperationOutOfRange {
                    key: key.clone(),
                    operation_count: job.operation_count(),
                })?;
            if op.machine_id() != machine_id {
                return Err(DecodeError::MachineMismatch {
                    key: key.clone(),
                    expected: op.machine_id().to_string(),
                    found: machine_id.clone(),
                });
            }
            if durations.insert(key, op.duration()).is_some() {
                return Err(DecodeError::DuplicateOperation(key.clone()));
            }
        }
    }

    Ok(durations)
}

/// Per-machine simulation state shared by both strategies.
struct MachineCursor<'a> {
    sequence: &'a [OperationKey],
    position: usize,
    available: i64,
}

/// Outcome of trying to dispatch the operation at a machine's cursor.
enum Step<'a> {
    Timed(&'a OperationKey),
    Blocked(OperationKey),
    Done,
}

impl<'a> MachineCursor<'a> {
    fn new(sequence: &'a [OperationKey]) -> Self {
        Self {
            sequence,
            position: 0,
            available: 0,
        }
    }

    fn step(&mut self, durations: &HashMap<&OperationKey, i64>, times: &mut OperationTimes) -> Step<'a> {
        let Some(key) = self.sequence.get(self.position) else {
            return Step::Done;
        };

        let ready = match key.predecessor() {
            None => 0,
            Some(pred) => match times.get(&pred.job_id).and_then(|ops| ops.get(&pred.op_index)) {
                Some(window) => window.end,
                None => return Step::Blocked(pred),
            },
        };

        // Keys were resolved up front, so the lookup cannot miss.
        let duration = durations.get(key).copied().unwrap_or_default();
        let window = TimeWindow::starting_at(ready.max(self.available), duration);
        times
            .entry(key.job_id.clone())
            .or_default()
            .insert(key.op_index, window);

        self.available = window.end;
        self.position += 1;
        Step::Timed(key)
    }
}

fn ready_queue(order: &MachineOrder, durations: &HashMap<&OperationKey, i64>) -> (OperationTimes, usize) {
    let mut cursors: Vec<MachineCursor<'_>> = order
        .values()
        .map(|sequence| MachineCursor::new(sequence))
        .collect();
    let mut times = OperationTimes::new();
    let mut timed = 0;

    // Stalled machine index keyed by the predecessor it waits for.
    let mut waiting: HashMap<OperationKey, usize> = HashMap::new();
    let mut queue: VecDeque<usize> = (0..cursors.len()).collect();

    while let Some(machine) = queue.pop_front() {
        loop {
            match cursors[machine].step(durations, &mut times) {
                Step::Timed(key) => {
                    timed += 1;
                    if let Some(unblocked) = waiting.remove(key) {
                        queue.push_back(unblocked);
                    }
                }
                Step::Blocked(pred) => {
                    waiting.insert(pred, machine);
                    break;
                }
                Step::Done => break,
            }
        }
    }

    (times, timed)
}

fn sweep(
    order: &MachineOrder,
    durations: &HashMap<&OperationKey, i64>,
    max_sweeps: usize,
) -> Result<(OperationTimes, usize), DecodeError> {
    let mut cursors: Vec<MachineCursor<'_>> = order
        .values()
        .map(|sequence| MachineCursor::new(sequence))
        .collect();
    let mut times = OperationTimes::new();
    let mut timed = 0;
    let mut sweeps = 0;
    let mut progress = true;

    while progress {
        if sweeps == max_sweeps {
            if timed < durations.len() {
                return Err(DecodeError::SweepLimitExceeded { sweeps });
            }
            break;
        }
        sweeps += 1;
        progress = false;

        for cursor in &mut cursors {
            if let Step::Timed(_) = cursor.step(durations, &mut times) {
                timed += 1;
                progress = true;
            }
        }
    }

    Ok((times, timed))
}

/// Returns every operation key referenced more than once, or never, in a
/// machine order relative to the full instance. Empty means the order is a
/// complete permutation of the instance's operations.
pub fn coverage_gaps(order: &MachineOrder, instance: &ProblemInstance) -> Vec<OperationKey> {
    let mut seen = HashSet::new();
    let mut gaps = Vec::new();
    for key in order.values().flatten() {
        if !seen.insert(key) {
            gaps.push(key.clone());
        }
    }
    for job in instance.jobs() {
        for op in job.operations() {
            let key = op.key();
            if !seen.contains(&key) {
                gaps.push(key);
            }
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn two_job_order() -> MachineOrder {
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J1", 0), key("J2", 1)]);
        order.insert("M2".into(), vec![key("J2", 0), key("J1", 1)]);
        order
    }

    fn both_strategies() -> [DecoderConfig; 2] {
        [
            DecoderConfig::default(),
            DecoderConfig::default().with_strategy(DecodeStrategy::Sweep),
        ]
    }

    #[test]
    fn test_decode_two_jobs() {
        let instance = two_job_instance();
        for config in both_strategies() {
            let times = decode_with(&two_job_order(), &instance, &config).unwrap();
            assert_eq!(times["J1"][&0], TimeWindow::new(0, 5));
            assert_eq!(times["J2"][&0], TimeWindow::new(0, 2));
            assert_eq!(times["J2"][&1], TimeWindow::new(5, 9));
            assert_eq!(times["J1"][&1], TimeWindow::new(5, 8));
        }
    }

    #[test]
    fn test_decode_is_deterministic() {
        let instance = two_job_instance();
        let first = decode(&two_job_order(), &instance).unwrap();
        let second = decode(&two_job_order(), &instance).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_strategies_agree_on_cross_machine_chain() {
        // M3 is listed last, yet J3#0 on M3 gates M2 and M1.
        let instance = three_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J3", 2), key("J1", 0), key("J2", 1)]);
        order.insert("M2".into(), vec![key("J3", 1), key("J2", 0), key("J1", 1)]);
        order.insert("M3".into(), vec![key("J3", 0), key("J1", 2), key("J2", 2)]);

        let [queue_config, sweep_config] = both_strategies();
        let by_queue = decode_with(&order, &instance, &queue_config).unwrap();
        let by_sweep = decode_with(&order, &instance, &sweep_config).unwrap();
        assert_eq!(by_queue, by_sweep);

        // J3: [0,2] -> [2,8] -> [8,17]; J1#0 waits for M1 until 17.
        assert_eq!(by_queue["J3"][&2], TimeWindow::new(8, 17));
        assert_eq!(by_queue["J1"][&0], TimeWindow::new(17, 27));
    }

    #[test]
    fn test_precedence_and_exclusivity_hold() {
        let instance = three_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J1", 0), key("J2", 1), key("J3", 2)]);
        order.insert("M2".into(), vec![key("J2", 0), key("J1", 1), key("J3", 1)]);
        order.insert("M3".into(), vec![key("J3", 0), key("J1", 2), key("J2", 2)]);
        let times = decode(&order, &instance).unwrap();

        for job in instance.jobs() {
            let ops = &times[job.id()];
            for i in 1..job.operation_count() {
                assert!(ops[&(i - 1)].end <= ops[&i].start);
            }
        }
        for sequence in order.values() {
            for pair in sequence.windows(2) {
                let a = times[&pair[0].job_id][&pair[0].op_index];
                let b = times[&pair[1].job_id][&pair[1].op_index];
                assert!(a.end <= b.start);
            }
        }
    }

    #[test]
    fn test_unknown_job() {
        let instance = two_job_instance();
        let mut order = two_job_order();
        order.get_mut("M1").unwrap().push(key("J9", 0));
        assert_eq!(
            decode(&order, &instance),
            Err(DecodeError::UnknownJob { key: key("J9", 0) })
        );
    }

    #[test]
    fn test_out_of_range() {
        let instance = two_job_instance();
        let mut order = two_job_order();
        order.get_mut("M2").unwrap().push(key("J1", 5));
        assert_eq!(
            decode(&order, &instance),
            Err(DecodeError::OperationOutOfRange {
                key: key("J1", 5),
                operation_count: 2
            })
        );
    }

    #[test]
    fn test_machine_mismatch() {
        let instance = two_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J2", 0)]);
        let err = decode(&order, &instance).unwrap_err();
        assert!(matches!(err, DecodeError::MachineMismatch { ref expected, .. } if expected == "M2"));
    }

    #[test]
    fn test_unknown_machine() {
        let instance = two_job_instance();
        let mut order = two_job_order();
        order.insert("M7".into(), Vec::new());
        assert_eq!(
            decode(&order, &instance),
            Err(DecodeError::UnknownMachine("M7".into()))
        );
    }

    #[test]
    fn test_duplicate_operation() {
        let instance = two_job_instance();
        let mut order = two_job_order();
        order.get_mut("M1").unwrap().push(key("J1", 0));
        assert_eq!(
            decode(&order, &instance),
            Err(DecodeError::DuplicateOperation(key("J1", 0)))
        );
    }

    #[test]
    fn test_cyclic_order_is_unsatisfiable() {
        // M1 waits on J2#1 (needs J2#0), M2 puts J1#1 (needs J1#0) before J2#0.
        let instance = two_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J2", 1), key("J1", 0)]);
        order.insert("M2".into(), vec![key("J1", 1), key("J2", 0)]);

        for config in both_strategies() {
            assert_eq!(
                decode_with(&order, &instance, &config),
                Err(DecodeError::Unsatisfiable {
                    timed: 0,
                    referenced: 4
                })
            );
        }
    }

    #[test]
    fn test_missing_predecessor_is_unsatisfiable() {
        let instance = two_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M2".into(), vec![key("J1", 1)]);
        let err = decode(&order, &instance).unwrap_err();
        assert!(matches!(err, DecodeError::Unsatisfiable { timed: 0, referenced: 1 }));
    }

    #[test]
    fn test_partial_order_decodes() {
        let instance = two_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J1", 0)]);
        order.insert("M2".into(), vec![key("J1", 1)]);

        let times = decode(&order, &instance).unwrap();
        assert_eq!(times["J1"][&1], TimeWindow::new(5, 8));
        assert!(!times.contains_key("J2"));
    }

    #[test]
    fn test_sweep_limit() {
        // Chain J3#0 (M3) -> J3#1 (M2) -> J3#2 (M1) needs three sweeps when
        // M1 and M2 are visited first.
        let instance = three_job_instance();
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J3", 2)]);
        order.insert("M2".into(), vec![key("J3", 1)]);
        order.insert("M3".into(), vec![key("J3", 0)]);

        let tight = DecoderConfig::default()
            .with_strategy(DecodeStrategy::Sweep)
            .with_max_sweeps(2);
        assert_eq!(
            decode_with(&order, &instance, &tight),
            Err(DecodeError::SweepLimitExceeded { sweeps: 2 })
        );

        let enough = tight.with_max_sweeps(3);
        assert!(decode_with(&order, &instance, &enough).is_ok());
    }

    #[test]
    fn test_decode_schedule_in_place() {
        let instance = two_job_instance();
        let mut schedule = Schedule::from_machine_order(two_job_order());
        decode_schedule(&mut schedule, &instance, &DecoderConfig::default()).unwrap();
        assert!(schedule.is_decoded());
        assert_eq!(schedule.makespan(), Some(9));

        schedule.set_sequence("M1", vec![key("J2", 1), key("J1", 0)]);
        schedule.set_sequence("M2", vec![key("J1", 1), key("J2", 0)]);
        assert!(decode_schedule(&mut schedule, &instance, &DecoderConfig::default()).is_err());
        assert!(schedule.operation_times().is_empty());
    }

    #[test]
    fn test_empty_order() {
        let instance = two_job_instance();
        let times = decode(&MachineOrder::new(), &instance).unwrap();
        assert!(times.is_empty());
    }

    #[test]
    fn test_coverage_gaps() {
        let instance = two_job_instance();
        assert!(coverage_gaps(&two_job_order(), &instance).is_empty());

        let mut order = two_job_order();
        order.get_mut("M2").unwrap().pop();
        order.get_mut("M1").unwrap().push(key("J1", 0));
        let gaps = coverage_gaps(&order, &instance);
        assert_eq!(gaps, vec![key("J1", 0), key("J1", 1)]);
    }
}
