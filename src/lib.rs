//! Job-shop scheduling core.
//!
//! Decodes machine orders into timed schedules, certifies their
//! feasibility, builds schedules with dispatch heuristics and improves them
//! with adjacent-swap local search.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Operation`, `Job`, `Machine`,
//!   `ProblemInstance`, `Schedule`, `TimeWindow`
//! - **`validation`**: Input integrity checks (empty sets, duplicate IDs,
//!   machine references, durations)
//! - **`decoder`**: Machine order → start/end times
//! - **`feasibility`**: Precedence and machine-exclusivity checks
//! - **`dispatching`**: Rules, rule engine and SPT / LJF / Critical-Path
//!   construction
//! - **`search`**: Best-improvement adjacent-swap local search
//! - **`scheduler`**: Makespan, KPIs and the construct-then-improve pipeline
//! - **`generator`**: Seeded random instances
//!
//! # Example
//!
//! ```
//! use jobshop_core::models::ProblemInstance;
//! use jobshop_core::scheduler::Scheduler;
//! use jobshop_core::feasibility::is_feasible;
//!
//! let instance = ProblemInstance::builder()
//!     .machines(["M1", "M2", "M3"])
//!     .job("J1", [("M1", 10), ("M2", 5), ("M3", 8)])
//!     .job("J2", [("M2", 3), ("M1", 7), ("M3", 4)])
//!     .job("J3", [("M3", 2), ("M2", 6), ("M1", 9)])
//!     .build()
//!     .unwrap();
//!
//! let outcome = Scheduler::new().schedule(&instance).unwrap();
//! assert!(is_feasible(&outcome.best, &instance));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"
//! - Blazewicz et al. (2019), "Handbook on Scheduling"

pub mod decoder;
pub mod dispatching;
pub mod feasibility;
pub mod generator;
pub mod models;
pub mod scheduler;
pub mod search;
pub mod validation;
