//! Assertions for exercising a single rule, or a rule set, against a hand built plan.
//!
//! ```
//! use planrewritelib::engine::objects::{Expression, PlanNode};
//! use planrewritelib::engine::rule_tester::RuleTester;
//! use planrewritelib::engine::rules::RemoveTrueFilter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scan = PlanNode::table_scan("orders", &["id"]);
//! RuleTester::assert_that(RemoveTrueFilter::new()?)
//!     .on(PlanNode::filter(scan.clone(), Expression::boolean(true)))
//!     .matches(&scan)?;
//! # Ok(())
//! # }
//! ```
use super::objects::{NoopLookup, PlanNode};
use super::rewriter::Rewriter;
use super::rules::{Rule, RuleError, RuleResult, RuleSet, RuleSetAdapter};
use thiserror::Error;

pub struct RuleTester {}

impl RuleTester {
    pub fn assert_that<R: Rule<PlanNode> + 'static>(rule: R) -> RuleAssert {
        RuleAssert {
            rule: Box::new(rule),
            plan: None,
        }
    }

    pub fn assert_that_set(rule_set: RuleSet<PlanNode>) -> RuleAssert {
        RuleTester::assert_that(RuleSetAdapter::new(rule_set))
    }
}

pub struct RuleAssert {
    rule: Box<dyn Rule<PlanNode>>,
    plan: Option<PlanNode>,
}

impl RuleAssert {
    pub fn on(mut self, plan: PlanNode) -> RuleAssert {
        self.plan = Some(plan);
        self
    }

    /// Passes when the rule does not match, or matches and leaves the plan alone.
    pub fn does_not_fire(self) -> Result<(), RuleAssertError> {
        match self.run()? {
            RuleResult::Unchanged => Ok(()),
            RuleResult::Replaced(actual) => Err(RuleAssertError::Fired(
                self.rule.name().to_string(),
                actual.explain(),
            )),
        }
    }

    /// Passes when the rule fires and its replacement has the same shape as `expected`.
    /// Node ids are not compared.
    pub fn matches(self, expected: &PlanNode) -> Result<(), RuleAssertError> {
        match self.run()? {
            RuleResult::Unchanged => Err(RuleAssertError::DidNotFire(
                self.rule.name().to_string(),
            )),
            RuleResult::Replaced(actual) if actual.same_shape(expected) => Ok(()),
            RuleResult::Replaced(actual) => Err(RuleAssertError::Mismatch {
                expected: expected.explain(),
                actual: actual.explain(),
            }),
        }
    }

    fn run(&self) -> Result<RuleResult<PlanNode>, RuleAssertError> {
        let plan = self.plan.as_ref().ok_or(RuleAssertError::MissingPlan())?;
        let lookup = NoopLookup {};
        let rewriter: Rewriter<PlanNode> = Rewriter::new(&lookup);
        Ok(rewriter.apply(self.rule.as_ref(), plan)?)
    }
}

#[derive(Debug, Error)]
pub enum RuleAssertError {
    #[error("Expected {0} not to fire, it produced\n{1}")]
    Fired(String, String),
    #[error("Expected {0} to fire but it left the plan unchanged")]
    DidNotFire(String),
    #[error("Plan mismatch, expected\n{expected}\nactual\n{actual}")]
    Mismatch { expected: String, actual: String },
    #[error("No plan was given to run the rule on")]
    MissingPlan(),
    #[error(transparent)]
    Rule(#[from] RuleError),
}
