//! Limits are moved below projections so they sit closer to the rows they cut off.
use super::{required_capture, Rule, RuleContext, RuleError, RuleResult};
use crate::engine::matching::{Capture, Captures, Pattern, PatternError};
use crate::engine::objects::{LimitNode, PlanNode, PlanNodeKind, ProjectNode};
use std::sync::Arc;

pub struct PushLimitThroughProject {
    project: Capture<PlanNode>,
    pattern: Pattern<PlanNode>,
}

impl PushLimitThroughProject {
    pub fn new() -> Result<PushLimitThroughProject, PatternError> {
        let project = Capture::new("project");
        let pattern = Pattern::type_of(PlanNodeKind::Limit)
            .with_source(Pattern::type_of(PlanNodeKind::Project).captured_as(&project)?)?;
        Ok(PushLimitThroughProject { project, pattern })
    }
}

impl Rule<PlanNode> for PushLimitThroughProject {
    fn name(&self) -> &str {
        "PushLimitThroughProject"
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
        let project = required_capture(self.name(), captures, &self.project)?;
        let (limit, project) = match (node, project) {
            (PlanNode::Limit(l), PlanNode::Project(p)) => (l, p),
            _ => {
                return Err(RuleError::UnexpectedNode {
                    rule: self.name().to_string(),
                    node: node.to_string(),
                })
            }
        };

        let pushed = PlanNode::Limit(LimitNode {
            id: limit.id,
            source: project.source.clone(),
            count: limit.count,
        });

        Ok(RuleResult::Replaced(PlanNode::Project(ProjectNode {
            id: project.id,
            source: Arc::new(pushed),
            assignments: project.assignments.clone(),
        })))
    }
}
