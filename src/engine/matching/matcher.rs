use super::pattern::Step;
use super::{Captures, Match, Pattern};
use crate::engine::objects::{Lookup, PlanTree, UnresolvedReferenceError};
use std::sync::Arc;

/// Evaluates patterns against nodes, resolving indirect children through a `Lookup`.
///
/// A matcher holds nothing but the lookup, so it is cheap to build one per attempt.
pub struct Matcher<'a, N> {
    lookup: &'a dyn Lookup<N>,
}

impl<'a, N: PlanTree> Matcher<'a, N> {
    pub fn new(lookup: &'a dyn Lookup<N>) -> Matcher<'a, N> {
        Matcher { lookup }
    }

    /// Matches `pattern` against `node`. A child that cannot be resolved makes the
    /// attempt a `NoMatch`, it is never raised.
    pub fn match_pattern(&self, pattern: &Pattern<N>, node: &N) -> Match<N> {
        match self.try_match(pattern, node) {
            Ok(m) => m,
            Err(e) => {
                debug!("Treating {} as no match for {:?}: {}", node, pattern, e);
                Match::NoMatch
            }
        }
    }

    /// Same as `match_pattern` but reports unresolved references, for callers that need
    /// to tell a malformed tree apart from a plain mismatch.
    pub fn try_match(
        &self,
        pattern: &Pattern<N>,
        node: &N,
    ) -> Result<Match<N>, UnresolvedReferenceError> {
        Ok(match self.match_steps(pattern, node)? {
            Some(captures) => Match::Matched {
                value: node.clone(),
                captures,
            },
            None => Match::NoMatch,
        })
    }

    fn match_steps(
        &self,
        pattern: &Pattern<N>,
        node: &N,
    ) -> Result<Option<Captures>, UnresolvedReferenceError> {
        let mut captures = Captures::empty();

        for step in pattern.steps() {
            match step {
                Step::TypeOf(kinds) => {
                    if !kinds.contains(&node.kind()) {
                        return Ok(None);
                    }
                }
                Step::Filter(predicate) => {
                    if !predicate(node) {
                        return Ok(None);
                    }
                }
                Step::Source(source_pattern) => {
                    let sources = node.sources();
                    if sources.len() != 1 {
                        return Ok(None);
                    }
                    match self.match_source(source_pattern, &sources[0])? {
                        Some(c) => captures = captures.merge(c),
                        None => return Ok(None),
                    }
                }
                Step::Sources(source_patterns) => {
                    let sources = node.sources();
                    if sources.len() != source_patterns.len() {
                        return Ok(None);
                    }
                    for (source_pattern, source) in source_patterns.iter().zip(sources.iter()) {
                        match self.match_source(source_pattern, source)? {
                            Some(c) => captures = captures.merge(c),
                            None => return Ok(None),
                        }
                    }
                }
                Step::CaptureNode { id, name } => {
                    captures = captures.bind(*id, *name, Arc::new(node.clone()));
                }
                Step::CaptureProperty { id, name, extract } => match extract(node) {
                    Some(value) => captures = captures.bind(*id, *name, value),
                    None => return Ok(None),
                },
            }
        }

        Ok(Some(captures))
    }

    fn match_source(
        &self,
        pattern: &Pattern<N>,
        source: &N,
    ) -> Result<Option<Captures>, UnresolvedReferenceError> {
        let resolved = self.lookup.resolve(source)?;
        self.match_steps(pattern, &resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Capture;
    use super::*;
    use crate::engine::objects::{
        Expression, JoinType, Memo, NoopLookup, PlanNode, PlanNodeKind,
    };

    fn project_over_filter() -> PlanNode {
        PlanNode::identity_project(PlanNode::filter(
            PlanNode::table_scan("orders", &["id", "total"]),
            Expression::equal(Expression::column("id"), Expression::integer(1)),
        ))
    }

    #[test]
    fn type_filter_and_capture() -> Result<(), Box<dyn std::error::Error>> {
        let child: Capture<PlanNode> = Capture::new("child");
        let pattern =
            Pattern::type_of(PlanNodeKind::Project).with_source(Pattern::any().captured_as(&child)?)?;

        let plan = project_over_filter();
        let lookup = NoopLookup {};
        let matcher: Matcher<PlanNode> = Matcher::new(&lookup);

        let (value, captures) = matcher
            .match_pattern(&pattern, &plan)
            .into_parts()
            .ok_or("Expected a match")?;
        assert_eq!(value, plan);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures.get(&child), Some(&plan.sources()[0]));

        let filter = plan.sources()[0].clone();
        assert!(!matcher.match_pattern(&pattern, &filter).is_match());
        Ok(())
    }

    #[test]
    fn variant_sets_and_predicates() -> Result<(), Box<dyn std::error::Error>> {
        let lookup = NoopLookup {};
        let matcher: Matcher<PlanNode> = Matcher::new(&lookup);

        let small_limit = PlanNode::limit(PlanNode::table_scan("orders", &["id"]), 5);
        let big_limit = PlanNode::limit(PlanNode::table_scan("orders", &["id"]), 500);
        let scan = PlanNode::table_scan("orders", &["id"]);

        let either = Pattern::kind_in(&[PlanNodeKind::Limit, PlanNodeKind::TableScan]);
        assert!(matcher.match_pattern(&either, &small_limit).is_match());
        assert!(matcher.match_pattern(&either, &scan).is_match());
        assert!(!matcher
            .match_pattern(&Pattern::type_of(PlanNodeKind::Filter), &scan)
            .is_match());

        let count: Capture<u64> = Capture::new("count");
        let small = Pattern::type_of(PlanNodeKind::Limit)
            .matching(|n: &PlanNode| matches!(n, PlanNode::Limit(l) if l.count < 10))
            .capturing(&count, |n: &PlanNode| match n {
                PlanNode::Limit(l) => Some(l.count),
                _ => None,
            })?;

        let matched = matcher.match_pattern(&small, &small_limit);
        assert_eq!(matched.captures().and_then(|c| c.get(&count)), Some(&5));
        assert!(!matcher.match_pattern(&small, &big_limit).is_match());
        Ok(())
    }

    #[test]
    fn positional_sources() -> Result<(), Box<dyn std::error::Error>> {
        let left: Capture<PlanNode> = Capture::new("left");
        let pattern = Pattern::type_of(PlanNodeKind::Join).with_sources(vec![
            Pattern::type_of(PlanNodeKind::TableScan).captured_as(&left)?,
            Pattern::type_of(PlanNodeKind::Values),
        ])?;

        let scan = PlanNode::table_scan("orders", &["id"]);
        let values = PlanNode::values(&["x"], vec![vec![Expression::integer(1)]]);
        let join = PlanNode::join(JoinType::Inner, scan.clone(), values.clone(), vec![]);
        let reversed = PlanNode::join(JoinType::Inner, values, scan.clone(), vec![]);

        let lookup = NoopLookup {};
        let matcher: Matcher<PlanNode> = Matcher::new(&lookup);
        let matched = matcher.match_pattern(&pattern, &join);
        assert_eq!(matched.captures().and_then(|c| c.get(&left)), Some(&scan));
        assert!(!matcher.match_pattern(&pattern, &reversed).is_match());

        //Single source patterns refuse nodes with two children
        let single = Pattern::type_of(PlanNodeKind::Join).with_source(Pattern::any())?;
        assert!(!matcher.match_pattern(&single, &join).is_match());
        Ok(())
    }

    #[test]
    fn children_resolved_through_lookup() -> Result<(), Box<dyn std::error::Error>> {
        let memo = Memo::new(project_over_filter())?;
        let root = memo.node(memo.root_group())?.clone();

        let child: Capture<PlanNode> = Capture::new("child");
        let pattern = Pattern::type_of(PlanNodeKind::Project).with_source(
            Pattern::type_of(PlanNodeKind::Filter).captured_as(&child)?,
        )?;

        let matcher: Matcher<PlanNode> = Matcher::new(&memo);
        let matched = matcher.match_pattern(&pattern, &root);
        let captured = matched
            .captures()
            .and_then(|c| c.get(&child))
            .ok_or("Expected the resolved filter")?;
        assert_eq!(captured.kind(), PlanNodeKind::Filter);

        //The same node without the memo cannot be resolved
        let lookup = NoopLookup {};
        let unresolved: Matcher<PlanNode> = Matcher::new(&lookup);
        assert!(!unresolved.match_pattern(&pattern, &root).is_match());
        assert!(unresolved.try_match(&pattern, &root).is_err());
        Ok(())
    }

    #[test]
    fn matching_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
        let child: Capture<PlanNode> = Capture::new("child");
        let pattern =
            Pattern::type_of(PlanNodeKind::Project).with_source(Pattern::any().captured_as(&child)?)?;
        let plan = project_over_filter();
        let lookup = NoopLookup {};
        let matcher: Matcher<PlanNode> = Matcher::new(&lookup);

        let first = matcher.match_pattern(&pattern, &plan);
        let second = matcher.match_pattern(&pattern, &plan);
        assert_eq!(first.is_match(), second.is_match());
        assert_eq!(first.value(), second.value());
        assert_eq!(
            first.captures().map(|c| c.names()),
            second.captures().map(|c| c.names())
        );
        assert_eq!(
            first.captures().and_then(|c| c.get(&child)),
            second.captures().and_then(|c| c.get(&child))
        );
        Ok(())
    }
}
