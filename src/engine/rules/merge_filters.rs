//! Two stacked filters become one filter over the conjunction of their predicates.
use super::{required_capture, Rule, RuleContext, RuleError, RuleResult};
use crate::engine::matching::{Capture, Captures, Pattern, PatternError};
use crate::engine::objects::{Expression, FilterNode, PlanNode, PlanNodeKind};

pub struct MergeFilters {
    child: Capture<PlanNode>,
    pattern: Pattern<PlanNode>,
}

impl MergeFilters {
    pub fn new() -> Result<MergeFilters, PatternError> {
        let child = Capture::new("child");
        //A literal true parent belongs to RemoveTrueFilter
        let pattern = Pattern::type_of(PlanNodeKind::Filter)
            .matching(|n: &PlanNode| matches!(n, PlanNode::Filter(f) if !f.predicate.is_true()))
            .with_source(Pattern::type_of(PlanNodeKind::Filter).captured_as(&child)?)?;
        Ok(MergeFilters { child, pattern })
    }
}

impl Rule<PlanNode> for MergeFilters {
    fn name(&self) -> &str {
        "MergeFilters"
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
        let child = required_capture(self.name(), captures, &self.child)?;
        let (parent, child) = match (node, child) {
            (PlanNode::Filter(p), PlanNode::Filter(c)) => (p, c),
            _ => {
                return Err(RuleError::UnexpectedNode {
                    rule: self.name().to_string(),
                    node: node.to_string(),
                })
            }
        };

        Ok(RuleResult::Replaced(PlanNode::Filter(FilterNode {
            id: parent.id,
            source: child.source.clone(),
            predicate: Expression::and(child.predicate.clone(), parent.predicate.clone()),
        })))
    }
}
