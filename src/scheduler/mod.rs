//! Schedule evaluation and the scheduling pipeline.
//!
//! # KPI
//!
//! [`makespan`] and [`ScheduleKpi`] compute schedule quality metrics:
//! makespan, utilization, flow time and idle time.
//!
//! # Pipeline
//!
//! [`Scheduler`] runs every configured dispatch heuristic, improves each
//! result with local search and keeps the best.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1, 7
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

pub mod kpi;
mod pipeline;

pub use kpi::{makespan, ScheduleKpi, MAKESPAN_SENTINEL};
pub use pipeline::{HeuristicRun, ScheduleOutcome, Scheduler, SchedulerError};
