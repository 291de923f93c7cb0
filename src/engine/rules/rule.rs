use crate::engine::matching::{Capture, Captures, Pattern};
use crate::engine::objects::{Lookup, PlanTree, UnresolvedReferenceError};
use thiserror::Error;

/// A named rewrite: a pattern that selects nodes and a transformation applied to them.
///
/// Rules hold no mutable state, the same rule may be applied from several threads at once
/// and applying it twice to the same input must give the same answer.
pub trait Rule<N: PlanTree>: Send + Sync {
    fn name(&self) -> &str;

    fn pattern(&self) -> &Pattern<N>;

    fn is_enabled(&self) -> bool {
        true
    }

    /// Only called after `pattern` matched `node`, with the captures of that match.
    /// `Unchanged` means the rule matched but chose not to rewrite.
    fn apply(
        &self,
        node: &N,
        captures: &Captures,
        context: &RuleContext<'_, N>,
    ) -> Result<RuleResult<N>, RuleError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum RuleResult<N> {
    Unchanged,
    Replaced(N),
}

impl<N> RuleResult<N> {
    pub fn is_changed(&self) -> bool {
        matches!(self, RuleResult::Replaced(_))
    }

    pub fn replaced(self) -> Option<N> {
        match self {
            RuleResult::Replaced(n) => Some(n),
            RuleResult::Unchanged => None,
        }
    }
}

/// Services the driver lends to a rule while it runs. Read only.
pub struct RuleContext<'a, N> {
    lookup: &'a dyn Lookup<N>,
}

impl<'a, N> RuleContext<'a, N> {
    pub fn new(lookup: &'a dyn Lookup<N>) -> RuleContext<'a, N> {
        RuleContext { lookup }
    }

    pub fn lookup(&self) -> &'a dyn Lookup<N> {
        self.lookup
    }
}

impl<'a, N> Clone for RuleContext<'a, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, N> Copy for RuleContext<'a, N> {}

/// Fetches a capture a rule's own pattern is guaranteed to bind.
pub fn required_capture<'c, V: 'static>(
    rule: &str,
    captures: &'c Captures,
    capture: &Capture<V>,
) -> Result<&'c V, RuleError> {
    captures
        .get(capture)
        .ok_or_else(|| RuleError::MissingCapture(rule.to_string(), capture.name()))
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rules {rules:?} all match {node}, rules in a set must not overlap")]
    AmbiguousRuleSet { node: String, rules: Vec<String> },
    #[error("Rule {0} is missing capture {1}")]
    MissingCapture(String, &'static str),
    #[error("Rule {rule} cannot rewrite {node}")]
    UnexpectedNode { rule: String, node: String },
    #[error(transparent)]
    UnresolvedReference(#[from] UnresolvedReferenceError),
    #[error("Rule {0} failed: {1}")]
    Transformation(String, String),
}
