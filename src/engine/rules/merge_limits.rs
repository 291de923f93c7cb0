//! A limit directly over another limit keeps only the smaller of the two.
use super::{required_capture, Rule, RuleContext, RuleError, RuleResult};
use crate::engine::matching::{Capture, Captures, Pattern, PatternError};
use crate::engine::objects::{LimitNode, PlanNode, PlanNodeKind};
use std::cmp::min;

pub struct MergeLimits {
    count: Capture<u64>,
    child: Capture<PlanNode>,
    pattern: Pattern<PlanNode>,
}

impl MergeLimits {
    pub fn new() -> Result<MergeLimits, PatternError> {
        let count = Capture::new("count");
        let child = Capture::new("child");
        let pattern = Pattern::type_of(PlanNodeKind::Limit)
            .capturing(&count, |n: &PlanNode| match n {
                PlanNode::Limit(l) => Some(l.count),
                _ => None,
            })?
            .with_source(Pattern::type_of(PlanNodeKind::Limit).captured_as(&child)?)?;
        Ok(MergeLimits {
            count,
            child,
            pattern,
        })
    }
}

impl Rule<PlanNode> for MergeLimits {
    fn name(&self) -> &str {
        "MergeLimits"
    }

    fn pattern(&self) -> &Pattern<PlanNode> {
        &self.pattern
    }

    fn apply(
        &self,
        node: &PlanNode,
        captures: &Captures,
        _context: &RuleContext<'_, PlanNode>,
    ) -> Result<RuleResult<PlanNode>, RuleError> {
        let count = *required_capture(self.name(), captures, &self.count)?;
        let child = match required_capture(self.name(), captures, &self.child)? {
            PlanNode::Limit(c) => c,
            other => {
                return Err(RuleError::UnexpectedNode {
                    rule: self.name().to_string(),
                    node: other.to_string(),
                })
            }
        };

        Ok(RuleResult::Replaced(PlanNode::Limit(LimitNode {
            id: node.id(),
            source: child.source.clone(),
            count: min(count, child.count),
        })))
    }
}
