//! A projection that passes its source through untouched does nothing, so its source takes its place.
use super::{required_capture, Rule, RuleContext, RuleError, RuleResult};
use crate::engine::matching::{Capture, Captures, Pattern, PatternError};
use crate::engine::objects::{PlanNode, PlanNodeKind};

pub struct RemoveRedundantProject {
    child: Capture<PlanNode>,
    pattern: Pattern<PlanNode>,
}

impl RemoveRedundantProject {
    pub fn new() -> Result<RemoveRedundantProject, PatternError> {
        let child = Capture::new("child");
        let pattern = Pattern::type_of(PlanNodeKind::Project)
            .matching(|n: &PlanNode| matches!(n, PlanNode::Project(p) if p.is_identity()))
            .with_source(Pattern::any().captured_as(&child)?)?;
        Ok(RemoveRedundantProject { child, pattern })
    }
}

impl Rule<PlanNode> for RemoveRedundantProject {
    fn name(&self) -> &str {
        "RemoveRedundantProject"
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
        let child = required_capture(self.name(), captures, &self.child)?;
        Ok(RuleResult::Replaced(child.clone()))
    }
}
