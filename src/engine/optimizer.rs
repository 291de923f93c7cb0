//! Drives a rule set over a whole plan until no member fires anywhere.
//!
//! The plan is loaded into a `Memo` so a rewrite only ever swaps the contents of one group.
//! Groups are explored depth first: a group is rewritten until nothing matches, then its
//! children are explored, and if any child changed the group itself is tried again.
use super::objects::{Memo, MemoError, PlanNode};
use super::rules::{RuleContext, RuleError, RuleResult, RuleSet, RuleSetAdapter};
use crate::constants::optimizer_settings::{ENABLE_TRACE, MAX_ITERATIONS};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    /// Upper bound on rule invocations for one `optimize` call.
    pub max_iterations: usize,
    /// Record a full before/after snapshot of the plan for every rewrite.
    pub enable_trace: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            max_iterations: MAX_ITERATIONS,
            enable_trace: ENABLE_TRACE,
        }
    }
}

impl OptimizerConfig {
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_trace(mut self, enable: bool) -> Self {
        self.enable_trace = enable;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleTrace {
    pub rule_name: String,
    pub before: String,
    pub after: String,
}

#[derive(Clone, Debug)]
pub struct OptimizedPlan {
    pub plan: PlanNode,
    /// Rule invocations, including ones that matched but left their node alone.
    pub iterations: usize,
    pub rules_applied: usize,
    /// False when the iteration limit cut the run short.
    pub reached_fixpoint: bool,
    pub trace: Vec<RuleTrace>,
}

pub struct IterativeOptimizer {
    adapter: RuleSetAdapter<PlanNode>,
    config: OptimizerConfig,
}

struct Exploration {
    memo: Memo,
    iterations: usize,
    rules_applied: usize,
    exhausted: bool,
    trace: Vec<RuleTrace>,
}

impl IterativeOptimizer {
    pub fn new(rule_set: RuleSet<PlanNode>, config: OptimizerConfig) -> IterativeOptimizer {
        IterativeOptimizer {
            adapter: RuleSetAdapter::new(rule_set),
            config,
        }
    }

    pub fn rule_set(&self) -> &RuleSet<PlanNode> {
        self.adapter.rule_set()
    }

    pub fn optimize(&self, plan: PlanNode) -> Result<OptimizedPlan, OptimizerError> {
        debug!("Optimizing with rules {:?}", self.rule_set().names());
        let mut state = Exploration {
            memo: Memo::new(plan)?,
            iterations: 0,
            rules_applied: 0,
            exhausted: false,
            trace: vec![],
        };

        let root = state.memo.root_group();
        self.explore_group(&mut state, root)?;

        if state.exhausted {
            warn!(
                "Optimizer stopped after {} iterations without reaching a fixpoint",
                self.config.max_iterations
            );
        } else {
            debug!(
                "Optimizer reached a fixpoint after {} iterations, {} rewrites",
                state.iterations, state.rules_applied
            );
        }

        Ok(OptimizedPlan {
            plan: state.memo.extract()?,
            iterations: state.iterations,
            rules_applied: state.rules_applied,
            reached_fixpoint: !state.exhausted,
            trace: state.trace,
        })
    }

    fn explore_group(&self, state: &mut Exploration, group: usize) -> Result<bool, OptimizerError> {
        let mut progress = self.explore_node(state, group)?;

        while !state.exhausted && self.explore_children(state, group)? {
            progress = true;
            if !self.explore_node(state, group)? {
                break;
            }
        }

        Ok(progress)
    }

    fn explore_children(
        &self,
        state: &mut Exploration,
        group: usize,
    ) -> Result<bool, OptimizerError> {
        let mut progress = false;
        for child in state.memo.child_groups(group)? {
            if state.exhausted {
                break;
            }
            if self.explore_group(state, child)? {
                progress = true;
            }
        }
        Ok(progress)
    }

    fn explore_node(&self, state: &mut Exploration, group: usize) -> Result<bool, OptimizerError> {
        let mut progress = false;

        while !state.exhausted {
            let node = state.memo.node(group)?.clone();
            let (rule, value, captures) = match self.adapter.select(&node, &state.memo)? {
                Some(selected) => selected,
                None => break,
            };

            if state.iterations >= self.config.max_iterations {
                state.exhausted = true;
                break;
            }
            state.iterations += 1;

            let context = RuleContext::new(&state.memo);
            let replacement = match rule.apply(&value, &captures, &context)? {
                RuleResult::Replaced(n) => n,
                RuleResult::Unchanged => break,
            };

            let before = if self.config.enable_trace {
                Some(state.memo.extract()?.explain())
            } else {
                None
            };

            debug!("Rule {} rewrote group {}: {} => {}", rule.name(), group, node, replacement);
            state.memo.replace(group, replacement)?;
            state.rules_applied += 1;
            progress = true;

            if let Some(before) = before {
                state.trace.push(RuleTrace {
                    rule_name: rule.name().to_string(),
                    before,
                    after: state.memo.extract()?.explain(),
                });
            }
        }

        Ok(progress)
    }
}

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Memo(#[from] MemoError),
}
