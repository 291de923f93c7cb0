use super::{Rule, RuleContext, RuleError, RuleResult};
use crate::engine::matching::{Captures, Matcher, Pattern, PatternError};
use crate::engine::objects::{Lookup, PlanTree};
use std::sync::Arc;
use thiserror::Error;

/// Unordered collection of rules with distinct names.
#[derive(Clone)]
pub struct RuleSet<N: PlanTree> {
    rules: Vec<Arc<dyn Rule<N>>>,
}

impl<N: PlanTree> RuleSet<N> {
    pub fn new() -> RuleSet<N> {
        RuleSet { rules: vec![] }
    }

    pub fn with_rule<R: Rule<N> + 'static>(mut self, rule: R) -> Result<RuleSet<N>, RuleSetError> {
        self.add(Arc::new(rule))?;
        Ok(self)
    }

    pub fn add(&mut self, rule: Arc<dyn Rule<N>>) -> Result<(), RuleSetError> {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            return Err(RuleSetError::DuplicateRule(rule.name().to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[Arc<dyn Rule<N>>] {
        &self.rules
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<N: PlanTree> Default for RuleSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a `RuleSet` as a single rule.
///
/// Every member is matched against the node. No match leaves the node unchanged, a single
/// match applies that rule and more than one is an error: overlapping rules would make the
/// outcome depend on iteration order, so the set is reported instead of picking one.
pub struct RuleSetAdapter<N: PlanTree> {
    rule_set: RuleSet<N>,
    pattern: Pattern<N>,
}

impl<N: PlanTree> RuleSetAdapter<N> {
    pub fn new(rule_set: RuleSet<N>) -> RuleSetAdapter<N> {
        RuleSetAdapter {
            rule_set,
            pattern: Pattern::any(),
        }
    }

    pub fn rule_set(&self) -> &RuleSet<N> {
        &self.rule_set
    }

    /// Finds the one enabled member whose pattern matches `node`, along with the match.
    /// `None` when nothing matches, an `AmbiguousRuleSet` error when several do.
    pub fn select(
        &self,
        node: &N,
        lookup: &dyn Lookup<N>,
    ) -> Result<Option<(&dyn Rule<N>, N, Captures)>, RuleError> {
        let mut matching: Vec<(&dyn Rule<N>, N, Captures)> = vec![];
        for rule in self.rule_set.rules().iter().filter(|r| r.is_enabled()) {
            let matcher = Matcher::new(lookup);
            let attempt = matcher.match_pattern(rule.pattern(), node);
            if let Some((value, captures)) = attempt.into_parts() {
                trace!("Rule {} matches {}", rule.name(), node);
                matching.push((rule.as_ref(), value, captures));
            }
        }

        if matching.len() > 1 {
            let mut rules: Vec<String> = matching
                .iter()
                .map(|(r, _, _)| r.name().to_string())
                .collect();
            rules.sort();
            warn!("Ambiguous rule set, {:?} all match {}", rules, node);
            return Err(RuleError::AmbiguousRuleSet {
                node: node.to_string(),
                rules,
            });
        }

        Ok(matching.pop())
    }
}

impl<N: PlanTree> Rule<N> for RuleSetAdapter<N> {
    fn name(&self) -> &str {
        "RuleSetAdapter"
    }

    fn pattern(&self) -> &Pattern<N> {
        &self.pattern
    }

    fn apply(
        &self,
        node: &N,
        _captures: &Captures,
        context: &RuleContext<'_, N>,
    ) -> Result<RuleResult<N>, RuleError> {
        match self.select(node, context.lookup())? {
            None => Ok(RuleResult::Unchanged),
            Some((rule, value, captures)) => {
                debug!("Applying rule {} to {}", rule.name(), node);
                rule.apply(&value, &captures, context)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("Rule {0} is already part of the set")]
    DuplicateRule(String),
    #[error(transparent)]
    PatternError(#[from] PatternError),
}
