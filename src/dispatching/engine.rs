//! Rule engine for multi-criteria dispatching.
//!
//! Composes dispatching rules sequentially: the next rule is consulted
//! only when all earlier rules tie. Remaining ties are broken by operation
//! key, `(job_id, op_index)` in lexicographic order, so the outcome never
//! depends on candidate order.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchContext, DispatchingRule, ReadyOperation, RuleScore};

/// A composable rule engine for operation prioritization.
///
/// # Example
/// ```
/// use jobshop_core::dispatching::{RuleEngine, rules};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Ljf)
///     .with_tie_breaker(rules::Spt);
/// assert_eq!(engine.rule_names(), vec!["LJF", "SPT"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
}

impl RuleEngine {
    /// Creates an empty rule engine. With no rules, candidates are ranked
    /// by key alone.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a primary rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a tie-breaking rule, consulted after every rule added before it.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts candidates by priority (highest priority first).
    ///
    /// Returns indices into the candidate slice.
    pub fn sort_indices(&self, candidates: &[ReadyOperation<'_>], context: &DispatchContext) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&candidates[a], &candidates[b], context));
        indices
    }

    /// Returns the index of the highest-priority candidate.
    pub fn select_best(&self, candidates: &[ReadyOperation<'_>], context: &DispatchContext) -> Option<usize> {
        (0..candidates.len()).min_by(|&a, &b| self.compare(&candidates[a], &candidates[b], context))
    }

    /// Evaluates a single candidate and returns the score of each rule.
    pub fn evaluate(&self, ready: &ReadyOperation<'_>, context: &DispatchContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(ready, context))
            .collect()
    }

    fn compare(&self, a: &ReadyOperation<'_>, b: &ReadyOperation<'_>, context: &DispatchContext) -> Ordering {
        for rule in &self.rules {
            let ordering = rule.evaluate(a, context).cmp(&rule.evaluate(b, context));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        // All rules tied
        (a.operation.job_id(), a.operation.index()).cmp(&(b.operation.job_id(), b.operation.index()))
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::Job;

    fn jobs() -> Vec<Job> {
        vec![
            Job::from_steps("long", [("M1", 5), ("M2", 9)]),
            Job::from_steps("short", [("M2", 1), ("M1", 1)]),
            Job::from_steps("medium", [("M1", 3), ("M2", 3)]),
        ]
    }

    fn firsts(jobs: &[Job]) -> Vec<ReadyOperation<'_>> {
        jobs.iter()
            .filter_map(|job| ReadyOperation::new(job, 0))
            .collect()
    }

    fn job_at<'a>(candidates: &[ReadyOperation<'a>], index: usize) -> &'a str {
        candidates[index].job.id()
    }

    #[test]
    fn test_spt_ordering() {
        let jobs = jobs();
        let candidates = firsts(&jobs);
        let engine = RuleEngine::new().with_rule(rules::Spt);

        let indices = engine.sort_indices(&candidates, &DispatchContext::new());
        assert_eq!(job_at(&candidates, indices[0]), "short");
        assert_eq!(job_at(&candidates, indices[1]), "medium");
        assert_eq!(job_at(&candidates, indices[2]), "long");
    }

    #[test]
    fn test_ljf_ordering() {
        let jobs = jobs();
        let candidates = firsts(&jobs);
        let engine = RuleEngine::new().with_rule(rules::Ljf);

        let best = engine.select_best(&candidates, &DispatchContext::new());
        assert_eq!(best.map(|i| job_at(&candidates, i)), Some("long"));
    }

    #[test]
    fn test_sequential_with_tie_breaker() {
        let jobs = jobs();
        let candidates = firsts(&jobs);
        let ctx = DispatchContext::new().with_critical_jobs(["long", "medium"]);
        let engine = RuleEngine::new()
            .with_rule(rules::CriticalFirst)
            .with_tie_breaker(rules::Spt);

        let indices = engine.sort_indices(&candidates, &ctx);
        // Critical first, SPT among critical jobs
        assert_eq!(job_at(&candidates, indices[0]), "medium");
        assert_eq!(job_at(&candidates, indices[1]), "long");
        assert_eq!(job_at(&candidates, indices[2]), "short");
    }

    #[test]
    fn test_key_tie_breaker() {
        let jobs = vec![
            Job::from_steps("B", [("M1", 4)]),
            Job::from_steps("A", [("M2", 4)]),
        ];
        let candidates = firsts(&jobs);
        let engine = RuleEngine::new().with_rule(rules::Spt);

        let best = engine.select_best(&candidates, &DispatchContext::new());
        assert_eq!(best, Some(1));
    }

    #[test]
    fn test_empty_candidates() {
        let engine = RuleEngine::new().with_rule(rules::Spt);
        let ctx = DispatchContext::new();
        assert!(engine.sort_indices(&[], &ctx).is_empty());
        assert!(engine.select_best(&[], &ctx).is_none());
    }

    #[test]
    fn test_evaluate_scores() {
        let jobs = jobs();
        let candidates = firsts(&jobs);
        let engine = RuleEngine::new()
            .with_rule(rules::Spt)
            .with_rule(rules::Ljf);

        let scores = engine.evaluate(&candidates[0], &DispatchContext::new());
        assert_eq!(scores, vec![5, -14]);
    }

    #[test]
    fn test_debug_lists_rules() {
        let engine = RuleEngine::new().with_rule(rules::Spt);
        assert_eq!(format!("{engine:?}"), r#"RuleEngine { rules: ["SPT"] }"#);
    }
}
