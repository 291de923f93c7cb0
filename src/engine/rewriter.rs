//! Applies rules to a single node. The caller decides which nodes to visit and what to do
//! with a replacement.
use super::matching::{Match, Matcher};
use super::objects::{Lookup, PlanTree};
use super::rules::{Rule, RuleContext, RuleError, RuleResult, RuleSet, RuleSetAdapter};

pub struct Rewriter<'a, N> {
    lookup: &'a dyn Lookup<N>,
}

impl<'a, N: PlanTree> Rewriter<'a, N> {
    pub fn new(lookup: &'a dyn Lookup<N>) -> Rewriter<'a, N> {
        Rewriter { lookup }
    }

    pub fn matches(&self, rule: &dyn Rule<N>, node: &N) -> Match<N> {
        Matcher::new(self.lookup).match_pattern(rule.pattern(), node)
    }

    /// Runs `rule` on `node` if it is enabled and its pattern matches, otherwise reports
    /// `Unchanged`. Errors from the rule are passed through untouched.
    pub fn apply(&self, rule: &dyn Rule<N>, node: &N) -> Result<RuleResult<N>, RuleError> {
        if !rule.is_enabled() {
            trace!("Rule {} is disabled", rule.name());
            return Ok(RuleResult::Unchanged);
        }

        match self.matches(rule, node).into_parts() {
            None => Ok(RuleResult::Unchanged),
            Some((value, captures)) => {
                let context = RuleContext::new(self.lookup);
                rule.apply(&value, &captures, &context)
            }
        }
    }

    pub fn apply_set(&self, rule_set: &RuleSet<N>, node: &N) -> Result<RuleResult<N>, RuleError> {
        let adapter = RuleSetAdapter::new(rule_set.clone());
        self.apply(&adapter, node)
    }
}
