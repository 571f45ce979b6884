//! Dispatching rules, rule engine and greedy schedule construction.
//!
//! A dispatch heuristic builds a machine order one operation at a time.
//! At every step the candidates are the **ready operations**: the next
//! unscheduled operation of each unfinished job. A [`RuleEngine`] ranks
//! them and the winner is appended to its machine's sequence.
//!
//! # Usage
//!
//! ```
//! use jobshop_core::dispatching::{build_spt, RuleEngine, rules};
//! use jobshop_core::models::ProblemInstance;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::CriticalFirst)
//!     .with_tie_breaker(rules::Spt);
//!
//! let instance = ProblemInstance::builder()
//!     .machines(["M1", "M2"])
//!     .job("J1", [("M1", 5), ("M2", 3)])
//!     .job("J2", [("M2", 2), ("M1", 4)])
//!     .build()
//!     .unwrap();
//! let schedule = build_spt(&instance).unwrap();
//! assert!(schedule.is_decoded());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod builder;
mod context;
mod engine;
pub mod rules;

pub use builder::{
    build_critical_path, build_critical_path_with, build_ljf, build_ljf_with, build_spt,
    build_spt_with, construct, critical_jobs, DispatchError, Heuristic,
};
pub use context::{DispatchContext, ReadyOperation};
pub use engine::RuleEngine;

use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first). Durations are
/// integers, so scores compare exactly.
pub type RuleScore = i64;

/// A dispatching rule that evaluates the priority of a ready operation.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for operations that should be dispatched first.
///
/// # Reference
/// Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "LJF").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a ready operation.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, ready: &ReadyOperation<'_>, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
