//! Schedule (solution) model.
//!
//! A schedule holds two independent maps:
//!
//! - **Machine order**: machine id → ordered operation keys. This is the
//!   decision variable that heuristics build and local search mutates.
//! - **Operation times**: job id → (op index → [`TimeWindow`]). This is the
//!   decode result. It is derived and disposable, and is cleared by every
//!   machine-order mutator on this type.
//!
//! A schedule is *decoded* iff every operation referenced in the machine
//! order has a recorded window.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::OperationKey;

/// Machine id → operations in processing order.
pub type MachineOrder = BTreeMap<String, Vec<OperationKey>>;

/// Job id → (operation index → time window).
pub type OperationTimes = BTreeMap<String, BTreeMap<usize, TimeWindow>>;

/// A processing interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start time (inclusive).
    pub start: i64,
    /// End time (exclusive).
    pub end: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Creates a window of `duration` starting at `start`.
    pub fn starting_at(start: i64, duration: i64) -> Self {
        Self::new(start, start + duration)
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A job-shop schedule: machine order plus (optionally) decoded times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    machine_order: MachineOrder,
    operation_times: OperationTimes,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an undecoded schedule from a machine order.
    pub fn from_machine_order(machine_order: MachineOrder) -> Self {
        Self {
            machine_order,
            operation_times: OperationTimes::new(),
        }
    }

    /// The decision variable.
    #[inline]
    pub fn machine_order(&self) -> &MachineOrder {
        &self.machine_order
    }

    /// Operation sequence of one machine.
    pub fn sequence(&self, machine_id: &str) -> Option<&[OperationKey]> {
        self.machine_order.get(machine_id).map(Vec::as_slice)
    }

    /// Replaces the whole machine order. Clears decoded times.
    pub fn set_machine_order(&mut self, machine_order: MachineOrder) {
        self.machine_order = machine_order;
        self.operation_times.clear();
    }

    /// Replaces one machine's sequence. Clears decoded times.
    pub fn set_sequence(&mut self, machine_id: impl Into<String>, sequence: Vec<OperationKey>) {
        self.machine_order.insert(machine_id.into(), sequence);
        self.operation_times.clear();
    }

    /// Swaps positions `position` and `position + 1` on a machine.
    ///
    /// Returns `false` (leaving the schedule untouched) if the machine is
    /// unknown or `position + 1` is out of range. Clears decoded times on
    /// success.
    pub fn swap_adjacent(&mut self, machine_id: &str, position: usize) -> bool {
        let Some(sequence) = self.machine_order.get_mut(machine_id) else {
            return false;
        };
        if position.checked_add(1).map_or(true, |next| next >= sequence.len()) {
            return false;
        }
        sequence.swap(position, position + 1);
        self.operation_times.clear();
        true
    }

    /// Decoded times.
    #[inline]
    pub fn operation_times(&self) -> &OperationTimes {
        &self.operation_times
    }

    /// Replaces decoded times wholesale.
    pub fn set_operation_times(&mut self, operation_times: OperationTimes) {
        self.operation_times = operation_times;
    }

    /// Records a window for one operation, overwriting any previous value.
    ///
    /// Intended for hand-built schedules that are then certified with
    /// [`feasibility::check`](crate::feasibility::check).
    pub fn set_time_window(&mut self, job_id: impl Into<String>, op_index: usize, window: TimeWindow) {
        self.operation_times
            .entry(job_id.into())
            .or_default()
            .insert(op_index, window);
    }

    /// Drops all decoded times.
    pub fn clear_times(&mut self) {
        self.operation_times.clear();
    }

    /// Recorded window for an operation.
    pub fn time_window(&self, key: &OperationKey) -> Option<TimeWindow> {
        self.operation_times
            .get(&key.job_id)
            .and_then(|ops| ops.get(&key.op_index))
            .copied()
    }

    /// Iterates over every referenced operation key, machine by machine.
    pub fn operation_keys(&self) -> impl Iterator<Item = &OperationKey> {
        self.machine_order.values().flatten()
    }

    /// Number of operation keys in the machine order.
    pub fn operation_count(&self) -> usize {
        self.machine_order.values().map(Vec::len).sum()
    }

    /// Whether every referenced operation has a recorded window.
    pub fn is_decoded(&self) -> bool {
        self.operation_keys()
            .all(|key| self.time_window(key).is_some())
    }

    /// Latest end time across all recorded windows, `None` if there are none.
    pub fn makespan(&self) -> Option<i64> {
        self.operation_times
            .values()
            .flat_map(|ops| ops.values())
            .map(|w| w.end)
            .max()
    }

    /// Completion time of a job (latest end among its recorded windows).
    pub fn job_completion_time(&self, job_id: &str) -> Option<i64> {
        self.operation_times
            .get(job_id)
            .and_then(|ops| ops.values().map(|w| w.end).max())
    }

    /// Total busy time of a machine, summed over the windows recorded for
    /// its sequence.
    pub fn machine_busy_time(&self, machine_id: &str) -> i64 {
        self.sequence(machine_id)
            .unwrap_or_default()
            .iter()
            .filter_map(|key| self.time_window(key))
            .map(|w| w.duration())
            .sum()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule:")?;
        for (machine_id, sequence) in &self.machine_order {
            write!(f, "  {machine_id}: ")?;
            for (i, key) in sequence.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{key}")?;
                if let Some(w) = self.time_window(key) {
                    write!(f, "[{},{}]", w.start, w.end)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(job: &str, index: usize) -> OperationKey {
        OperationKey::new(job, index)
    }

    fn sample_schedule() -> Schedule {
        let mut order = MachineOrder::new();
        order.insert("M1".into(), vec![key("J1", 0), key("J2", 1)]);
        order.insert("M2".into(), vec![key("J2", 0), key("J1", 1)]);
        let mut s = Schedule::from_machine_order(order);
        s.set_time_window("J1", 0, TimeWindow::new(0, 5));
        s.set_time_window("J2", 0, TimeWindow::new(0, 2));
        s.set_time_window("J2", 1, TimeWindow::new(5, 9));
        s.set_time_window("J1", 1, TimeWindow::new(5, 8));
        s
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::starting_at(3, 4);
        assert_eq!(w, TimeWindow::new(3, 7));
        assert_eq!(w.duration(), 4);
        assert!(w.overlaps(&TimeWindow::new(6, 10)));
        assert!(!w.overlaps(&TimeWindow::new(7, 10)));
    }

    #[test]
    fn test_schedule_makespan() {
        assert_eq!(sample_schedule().makespan(), Some(9));
        assert_eq!(Schedule::new().makespan(), None);
    }

    #[test]
    fn test_is_decoded() {
        let s = sample_schedule();
        assert!(s.is_decoded());

        let mut partial = Schedule::from_machine_order(s.machine_order().clone());
        partial.set_time_window("J1", 0, TimeWindow::new(0, 5));
        assert!(!partial.is_decoded());
    }

    #[test]
    fn test_order_mutation_clears_times() {
        let mut s = sample_schedule();
        assert!(s.swap_adjacent("M1", 0));
        assert!(s.operation_times().is_empty());
        assert_eq!(s.sequence("M1"), Some(&[key("J2", 1), key("J1", 0)][..]));

        let mut s = sample_schedule();
        s.set_sequence("M2", vec![key("J1", 1), key("J2", 0)]);
        assert!(s.operation_times().is_empty());
    }

    #[test]
    fn test_swap_adjacent_out_of_range() {
        let mut s = sample_schedule();
        assert!(!s.swap_adjacent("M1", 1));
        assert!(!s.swap_adjacent("M9", 0));
        assert!(!s.swap_adjacent("M1", usize::MAX));
        assert!(s.is_decoded());
    }

    #[test]
    fn test_job_completion_and_busy_time() {
        let s = sample_schedule();
        assert_eq!(s.job_completion_time("J1"), Some(8));
        assert_eq!(s.job_completion_time("J2"), Some(9));
        assert_eq!(s.job_completion_time("J9"), None);
        assert_eq!(s.machine_busy_time("M1"), 9);
        assert_eq!(s.machine_busy_time("M2"), 5);
    }

    #[test]
    fn test_operation_count() {
        let s = sample_schedule();
        assert_eq!(s.operation_count(), 4);
        assert_eq!(s.operation_keys().count(), 4);
    }

    #[test]
    fn test_display() {
        let text = sample_schedule().to_string();
        assert!(text.contains("M1: J1#0[0,5] -> J2#1[5,9]"));
    }
}
