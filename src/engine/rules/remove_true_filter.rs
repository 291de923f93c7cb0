//! A filter whose predicate is the literal `true` keeps every row.
use super::{required_capture, Rule, RuleContext, RuleError, RuleResult};
use crate::engine::matching::{Capture, Captures, Pattern, PatternError};
use crate::engine::objects::{PlanNode, PlanNodeKind};

pub struct RemoveTrueFilter {
    source: Capture<PlanNode>,
    pattern: Pattern<PlanNode>,
}

impl RemoveTrueFilter {
    pub fn new() -> Result<RemoveTrueFilter, PatternError> {
        let source = Capture::new("source");
        let pattern = Pattern::type_of(PlanNodeKind::Filter)
            .matching(|n: &PlanNode| matches!(n, PlanNode::Filter(f) if f.predicate.is_true()))
            .with_source(Pattern::any().captured_as(&source)?)?;
        Ok(RemoveTrueFilter { source, pattern })
    }
}

impl Rule<PlanNode> for RemoveTrueFilter {
    fn name(&self) -> &str {
        "RemoveTrueFilter"
    }

    fn pattern(&self) -> &Pattern<PlanNode> {
        &self.pattern
    }

    fn apply(
        &self,
        _node: &PlanNode,
        captures: &Captures,
        _context: &RuleContext<'_, PlanNode>,
    ) -> Result<RuleResult<PlanNode>, RuleError> {
        let source = required_capture(self.name(), captures, &self.source)?;
        Ok(RuleResult::Replaced(source.clone()))
    }
}
