//! Built-in dispatching rules.
//!
//! - **SPT**: shortest operation first
//! - **LJF**: operation of the longest job first
//! - **CRIT**: operations of critical jobs first
//!
//! # Score Convention
//! All rules return lower scores for higher priority operations.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use super::{DispatchContext, DispatchingRule, ReadyOperation, RuleScore};

/// Shortest Processing Time.
///
/// Prioritizes the ready operation with the shortest duration.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, ready: &ReadyOperation<'_>, _context: &DispatchContext) -> RuleScore {
        ready.operation.duration()
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Job First.
///
/// Prioritizes operations whose job has the largest total processing time.
/// The score is the job's own total, not its remaining work.
#[derive(Debug, Clone, Copy)]
pub struct Ljf;

impl DispatchingRule for Ljf {
    fn name(&self) -> &'static str {
        "LJF"
    }

    fn evaluate(&self, ready: &ReadyOperation<'_>, _context: &DispatchContext) -> RuleScore {
        -ready.job.total_processing_time()
    }

    fn description(&self) -> &'static str {
        "Longest Job First"
    }
}

/// Critical jobs first.
///
/// Scores 0 for operations of jobs in [`DispatchContext::critical_jobs`],
/// 1 otherwise. Meant to be followed by a tie-breaking rule.
#[derive(Debug, Clone, Copy)]
pub struct CriticalFirst;

impl DispatchingRule for CriticalFirst {
    fn name(&self) -> &'static str {
        "CRIT"
    }

    fn evaluate(&self, ready: &ReadyOperation<'_>, context: &DispatchContext) -> RuleScore {
        if context.is_critical(ready.job.id()) {
            0
        } else {
            1
        }
    }

    fn description(&self) -> &'static str {
        "Critical Jobs First"
    }
}
