//! Node registry used while iterating rules over a plan.
//!
//! Every node lives in its own numbered group and refers to its children only through
//! `GroupReference` nodes. Rewriting a node then means swapping the contents of one group,
//! parents keep pointing at the group and see the new node on their next resolve.
use super::{Lookup, PlanNode, PlanNodeError, PlanTree, UnresolvedReferenceError};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct Memo {
    root_group: usize,
    groups: Vec<PlanNode>,
}

impl Memo {
    pub fn new(plan: PlanNode) -> Result<Memo, MemoError> {
        let mut memo = Memo {
            root_group: 0,
            groups: vec![],
        };
        memo.root_group = memo.insert_recursive(plan)?;
        Ok(memo)
    }

    pub fn root_group(&self) -> usize {
        self.root_group
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The node stored in a group, its sources are always group references.
    pub fn node(&self, group: usize) -> Result<&PlanNode, MemoError> {
        self.groups.get(group).ok_or(MemoError::UnknownGroup(group))
    }

    /// Group ids of a group's children, in source order.
    pub fn child_groups(&self, group: usize) -> Result<Vec<usize>, MemoError> {
        self.node(group)?
            .sources()
            .iter()
            .map(|s| match s {
                PlanNode::GroupReference(r) => Ok(r.group),
                other => Err(MemoError::NotAReference(other.to_string())),
            })
            .collect()
    }

    /// Swaps the contents of a group. Children of the new node that are not yet references
    /// are inserted as new groups. A bare reference copies the referenced group's node in.
    ///
    /// Parents hold the group's outputs in their references, so the new node must produce
    /// exactly the same columns.
    pub fn replace(&mut self, group: usize, node: PlanNode) -> Result<(), MemoError> {
        let expected = self.node(group)?.outputs();
        let actual = node.outputs();
        if expected != actual {
            return Err(MemoError::OutputsChanged {
                group,
                expected,
                actual,
            });
        }

        let node = match node {
            PlanNode::GroupReference(r) => self.node(r.group)?.clone(),
            other => self.insert_children(other)?,
        };

        self.groups[group] = node;
        Ok(())
    }

    /// Rebuilds the fully materialized plan from the root group.
    pub fn extract(&self) -> Result<PlanNode, MemoError> {
        self.extract_group(self.root_group)
    }

    fn extract_group(&self, group: usize) -> Result<PlanNode, MemoError> {
        let node = self.node(group)?;
        let sources = self
            .child_groups(group)?
            .into_iter()
            .map(|g| self.extract_group(g))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(node.replace_sources(sources)?)
    }

    fn insert_recursive(&mut self, node: PlanNode) -> Result<usize, MemoError> {
        if let PlanNode::GroupReference(r) = &node {
            self.node(r.group)?;
            return Ok(r.group);
        }

        let node = self.insert_children(node)?;
        self.groups.push(node);
        Ok(self.groups.len() - 1)
    }

    fn insert_children(&mut self, node: PlanNode) -> Result<PlanNode, MemoError> {
        let mut references = vec![];
        for source in node.sources() {
            let outputs = source.outputs();
            let group = self.insert_recursive(source)?;
            references.push(PlanNode::group_reference(group, outputs));
        }
        Ok(node.replace_sources(references)?)
    }
}

impl Lookup<PlanNode> for Memo {
    fn resolve(&self, node: &PlanNode) -> Result<PlanNode, UnresolvedReferenceError> {
        match node {
            PlanNode::GroupReference(r) => self
                .node(r.group)
                .cloned()
                .map_err(|_| UnresolvedReferenceError(node.to_string())),
            _ => Ok(node.clone()),
        }
    }
}

#[derive(Debug, Error)]
pub enum MemoError {
    #[error("Group {0} does not exist")]
    UnknownGroup(usize),
    #[error("Group {group} produces {expected:?}, replacement produces {actual:?}")]
    OutputsChanged {
        group: usize,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Memo node source {0} is not a group reference")]
    NotAReference(String),
    #[error(transparent)]
    PlanNodeError(#[from] PlanNodeError),
}

#[cfg(test)]
mod tests {
    use super::super::{Expression, JoinType};
    use super::*;

    fn sample_plan() -> PlanNode {
        PlanNode::limit(
            PlanNode::join(
                JoinType::Inner,
                PlanNode::filter(
                    PlanNode::table_scan("orders", &["id", "customer"]),
                    Expression::equal(Expression::column("id"), Expression::integer(7)),
                ),
                PlanNode::table_scan("customers", &["customer_id"]),
                vec![("customer".to_string(), "customer_id".to_string())],
            ),
            20,
        )
    }

    #[test]
    fn memo_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let plan = sample_plan();
        let memo = Memo::new(plan.clone())?;

        assert_eq!(memo.group_count(), 5);
        assert_eq!(memo.extract()?, plan);

        let root = memo.node(memo.root_group())?;
        assert!(matches!(root.sources()[0], PlanNode::GroupReference(_)));
        Ok(())
    }

    #[test]
    fn memo_resolves_references() -> Result<(), Box<dyn std::error::Error>> {
        let memo = Memo::new(sample_plan())?;
        let root = memo.node(memo.root_group())?.clone();
        let child = memo.resolve(&root.sources()[0])?;
        assert!(matches!(child, PlanNode::Join(_)));

        let dangling = PlanNode::group_reference(99, vec![]);
        assert!(memo.resolve(&dangling).is_err());
        Ok(())
    }

    #[test]
    fn memo_replace_with_reference_copies_group() -> Result<(), Box<dyn std::error::Error>> {
        let scan = PlanNode::table_scan("orders", &["id"]);
        let plan = PlanNode::identity_project(scan.clone());
        let mut memo = Memo::new(plan)?;

        let root = memo.root_group();
        let child_reference = memo.node(root)?.sources()[0].clone();
        memo.replace(root, child_reference)?;

        assert_eq!(memo.extract()?, scan);
        assert!(matches!(memo.replace(42, scan), Err(MemoError::UnknownGroup(42))));
        Ok(())
    }

    #[test]
    fn memo_replace_must_keep_outputs() -> Result<(), Box<dyn std::error::Error>> {
        let plan = PlanNode::identity_project(PlanNode::limit(
            PlanNode::table_scan("orders", &["id", "total"]),
            4,
        ));
        let mut memo = Memo::new(plan.clone())?;
        let child = memo.child_groups(memo.root_group())?[0];

        match memo.replace(child, PlanNode::table_scan("orders", &["id"])) {
            Err(MemoError::OutputsChanged {
                group,
                expected,
                actual,
            }) => {
                assert_eq!(group, child);
                assert_eq!(expected, vec!["id".to_string(), "total".to_string()]);
                assert_eq!(actual, vec!["id".to_string()]);
            }
            other => panic!("Expected an outputs mismatch, got {:?}", other),
        }

        //The rejected replacement leaves the memo untouched
        assert_eq!(memo.extract()?, plan);

        memo.replace(child, PlanNode::table_scan("orders", &["id", "total"]))?;
        assert_eq!(
            memo.extract()?.explain(),
            "Project[id := id, total := total]\n  TableScan[orders](id, total)\n"
        );
        Ok(())
    }
}
