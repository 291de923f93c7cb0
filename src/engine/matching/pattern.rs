use super::Capture;
use crate::engine::objects::PlanTree;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

type Predicate<N> = Arc<dyn Fn(&N) -> bool + Send + Sync>;
type Extractor<N> = Arc<dyn Fn(&N) -> Option<Arc<dyn Any + Send + Sync>> + Send + Sync>;

/// Immutable description of the nodes a rule applies to.
///
/// A pattern is a chain of steps that must all hold for the same node, in order.
/// Steps that descend into children carry their own patterns, so a pattern is a tree.
///
/// ```
/// use planrewritelib::engine::matching::{Capture, Pattern};
/// use planrewritelib::engine::objects::{PlanNode, PlanNodeKind};
///
/// let child: Capture<PlanNode> = Capture::new("child");
/// let pattern = Pattern::type_of(PlanNodeKind::Project)
///     .with_source(Pattern::any().captured_as(&child)?)?;
/// assert_eq!(pattern.capture_count(), 1);
/// # Ok::<(), planrewritelib::engine::matching::PatternError>(())
/// ```
#[derive(Clone)]
pub struct Pattern<N: PlanTree> {
    steps: Vec<Step<N>>,
    capture_ids: HashSet<Uuid>,
}

#[derive(Clone)]
pub(super) enum Step<N: PlanTree> {
    TypeOf(Vec<N::Kind>),
    Filter(Predicate<N>),
    Source(Pattern<N>),
    Sources(Vec<Pattern<N>>),
    CaptureNode {
        id: Uuid,
        name: &'static str,
    },
    CaptureProperty {
        id: Uuid,
        name: &'static str,
        extract: Extractor<N>,
    },
}

impl<N: PlanTree> Pattern<N> {
    /// Matches every node.
    pub fn any() -> Pattern<N> {
        Pattern {
            steps: vec![],
            capture_ids: HashSet::new(),
        }
    }

    pub fn type_of(kind: N::Kind) -> Pattern<N> {
        Pattern::kind_in(&[kind])
    }

    /// Matches nodes whose variant is one of `kinds`.
    pub fn kind_in(kinds: &[N::Kind]) -> Pattern<N> {
        Pattern::any().push(Step::TypeOf(kinds.to_vec()))
    }

    /// Adds a predicate over the node's fields.
    pub fn matching<F>(self, predicate: F) -> Pattern<N>
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        self.push(Step::Filter(Arc::new(predicate)))
    }

    /// Requires exactly one child, resolved, that matches `source`.
    pub fn with_source(self, source: Pattern<N>) -> Result<Pattern<N>, PatternError> {
        self.absorb_captures(&source)?.push_ok(Step::Source(source))
    }

    /// Requires one pattern per child, matched positionally against the resolved children.
    pub fn with_sources(self, sources: Vec<Pattern<N>>) -> Result<Pattern<N>, PatternError> {
        let mut pattern = self;
        for source in &sources {
            pattern = pattern.absorb_captures(source)?;
        }
        pattern.push_ok(Step::Sources(sources))
    }

    /// Binds the matched node to `capture`.
    pub fn captured_as(self, capture: &Capture<N>) -> Result<Pattern<N>, PatternError> {
        self.claim(capture.id(), capture.name())?
            .push_ok(Step::CaptureNode {
                id: capture.id(),
                name: capture.name(),
            })
    }

    /// Binds a value read off the node to `capture`. The pattern does not match when
    /// `extract` returns `None`, so it doubles as a property filter.
    pub fn capturing<V, F>(self, capture: &Capture<V>, extract: F) -> Result<Pattern<N>, PatternError>
    where
        V: Send + Sync + 'static,
        F: Fn(&N) -> Option<V> + Send + Sync + 'static,
    {
        let extract: Extractor<N> = Arc::new(move |node: &N| {
            extract(node).map(|v| Arc::new(v) as Arc<dyn Any + Send + Sync>)
        });
        self.claim(capture.id(), capture.name())?
            .push_ok(Step::CaptureProperty {
                id: capture.id(),
                name: capture.name(),
                extract,
            })
    }

    /// Number of capture slots bound anywhere in this pattern tree.
    pub fn capture_count(&self) -> usize {
        self.capture_ids.len()
    }

    pub(super) fn steps(&self) -> &[Step<N>] {
        &self.steps
    }

    fn push(mut self, step: Step<N>) -> Pattern<N> {
        self.steps.push(step);
        self
    }

    fn push_ok(self, step: Step<N>) -> Result<Pattern<N>, PatternError> {
        Ok(self.push(step))
    }

    fn claim(mut self, id: Uuid, name: &'static str) -> Result<Pattern<N>, PatternError> {
        if !self.capture_ids.insert(id) {
            return Err(PatternError::DuplicateCapture(name));
        }
        Ok(self)
    }

    fn absorb_captures(mut self, source: &Pattern<N>) -> Result<Pattern<N>, PatternError> {
        if let Some((_, name)) = source
            .capture_names()
            .into_iter()
            .find(|(id, _)| self.capture_ids.contains(id))
        {
            return Err(PatternError::DuplicateCapture(name));
        }
        self.capture_ids.extend(source.capture_ids.iter().copied());
        Ok(self)
    }

    fn capture_names(&self) -> Vec<(Uuid, &'static str)> {
        let mut names = vec![];
        for step in &self.steps {
            match step {
                Step::CaptureNode { id, name } | Step::CaptureProperty { id, name, .. } => {
                    names.push((*id, *name))
                }
                Step::Source(p) => names.extend(p.capture_names()),
                Step::Sources(ps) => ps.iter().for_each(|p| names.extend(p.capture_names())),
                Step::TypeOf(_) | Step::Filter(_) => {}
            }
        }
        names
    }
}

impl<N: PlanTree> fmt::Debug for Pattern<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "any");
        }

        let mut first = true;
        for step in &self.steps {
            if !first {
                write!(f, " -> ")?;
            }
            first = false;
            match step {
                Step::TypeOf(kinds) => write!(f, "typeOf{:?}", kinds)?,
                Step::Filter(_) => write!(f, "filter")?,
                Step::Source(p) => write!(f, "source({:?})", p)?,
                Step::Sources(ps) => write!(f, "sources({:?})", ps)?,
                Step::CaptureNode { name, .. } => write!(f, "capturedAs({})", name)?,
                Step::CaptureProperty { name, .. } => write!(f, "capturing({})", name)?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PatternError {
    #[error("Capture {0} is bound more than once in the same pattern")]
    DuplicateCapture(&'static str),
}
