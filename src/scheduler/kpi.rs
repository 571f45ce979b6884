//! Schedule quality metrics (KPIs).
//!
//! Computes standard scheduling performance indicators from a decoded
//! schedule and its problem instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Total Processing | Sum of all operation durations |
//! | Utilization | Machine busy time / makespan |
//! | Mean Flow Time | Mean job completion (all jobs released at 0) |
//! | Total Idle Time | Sum over machines of makespan - busy time |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ProblemInstance, Schedule};

/// Makespan reported for a schedule with no recorded times.
pub const MAKESPAN_SENTINEL: i64 = -1;

/// Latest end time across all recorded windows, or [`MAKESPAN_SENTINEL`]
/// if the schedule has no times.
pub fn makespan(schedule: &Schedule) -> i64 {
    schedule.makespan().unwrap_or(MAKESPAN_SENTINEL)
}

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: i64,
    /// Sum of all operation durations in the instance.
    pub total_processing_time: i64,
    /// Per-machine utilization (0.0..1.0).
    pub utilization_by_machine: BTreeMap<String, f64>,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Completion time per job.
    pub job_completion: BTreeMap<String, i64>,
    /// Mean job completion time.
    pub mean_flow_time: f64,
    /// Total machine idle time within the makespan.
    pub total_idle_time: i64,
}

impl ScheduleKpi {
    /// Computes KPIs from a decoded schedule.
    ///
    /// Returns `None` if the schedule has no recorded times or a
    /// non-positive makespan.
    pub fn calculate(schedule: &Schedule, instance: &ProblemInstance) -> Option<Self> {
        let makespan = schedule.makespan().filter(|&m| m > 0)?;

        let mut utilization_by_machine = BTreeMap::new();
        let mut total_idle_time: i64 = 0;
        for machine in instance.machines() {
            let busy = schedule.machine_busy_time(machine.id());
            total_idle_time = total_idle_time.saturating_add(makespan - busy);
            utilization_by_machine.insert(machine.id().to_string(), busy as f64 / makespan as f64);
        }

        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_machine.values().sum();
            sum / utilization_by_machine.len() as f64
        };

        let job_completion: BTreeMap<String, i64> = instance
            .jobs()
            .filter_map(|job| {
                schedule
                    .job_completion_time(job.id())
                    .map(|c| (job.id().to_string(), c))
            })
            .collect();

        let mean_flow_time = if job_completion.is_empty() {
            0.0
        } else {
            job_completion.values().map(|&c| c as f64).sum::<f64>() / job_completion.len() as f64
        };

        Some(Self {
            makespan,
            total_processing_time: instance.total_processing_time(),
            utilization_by_machine,
            avg_utilization,
            job_completion,
            mean_flow_time,
            total_idle_time,
        })
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: i64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}
