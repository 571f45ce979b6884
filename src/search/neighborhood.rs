//! Adjacent-swap neighborhood.

use crate::models::{OperationKey, Schedule};

/// One adjacent interchange: positions `position` and `position + 1` of a
/// machine sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentSwap {
    /// Machine whose sequence is modified.
    pub machine_id: String,
    /// Index of the first swapped entry.
    pub position: usize,
    /// Operation originally at `position`.
    pub first: OperationKey,
    /// Operation originally at `position + 1`.
    pub second: OperationKey,
}

/// Iterator over every adjacent swap of a schedule.
///
/// Machines are visited in ID order and positions left to right. Pairs of
/// operations from the same job are skipped since swapping them always
/// breaks precedence. Each item is an independent copy of the schedule with
/// the swap applied and its times cleared.
pub struct AdjacentSwaps<'a> {
    schedule: &'a Schedule,
    machines: Vec<(&'a str, &'a [OperationKey])>,
    machine: usize,
    position: usize,
}

impl<'a> AdjacentSwaps<'a> {
    /// Creates the neighborhood of `schedule`.
    pub fn new(schedule: &'a Schedule) -> Self {
        Self {
            schedule,
            machines: schedule
                .machine_order()
                .iter()
                .map(|(id, sequence)| (id.as_str(), sequence.as_slice()))
                .collect(),
            machine: 0,
            position: 0,
        }
    }
}

impl Iterator for AdjacentSwaps<'_> {
    type Item = (AdjacentSwap, Schedule);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(machine_id, sequence)) = self.machines.get(self.machine) {
            while self.position + 1 < sequence.len() {
                let position = self.position;
                self.position += 1;

                let (first, second) = (&sequence[position], &sequence[position + 1]);
                if first.job_id == second.job_id {
                    continue;
                }

                let mut candidate = self.schedule.clone();
                candidate.swap_adjacent(machine_id, position);
                let swap = AdjacentSwap {
                    machine_id: machine_id.to_string(),
                    position,
                    first: first.clone(),
                    second: second.clone(),
                };
                return Some((swap, candidate));
            }
            self.machine += 1;
            self.position = 0;
        }
        None
    }
}
