//! Logical plan nodes, loosely following the postgres plan tree.
//! See here: https://www.postgresql.org/docs/current/planner-optimizer.html
use super::{Expression, PlanTree};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum PlanNode {
    TableScan(TableScanNode),
    Values(ValuesNode),
    Filter(FilterNode),
    Project(ProjectNode),
    Limit(LimitNode),
    Join(JoinNode),
    GroupReference(GroupReferenceNode),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PlanNodeKind {
    TableScan,
    Values,
    Filter,
    Project,
    Limit,
    Join,
    GroupReference,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableScanNode {
    pub id: Uuid,
    pub table: String,
    pub columns: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValuesNode {
    pub id: Uuid,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Expression>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterNode {
    pub id: Uuid,
    pub source: Arc<PlanNode>,
    pub predicate: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectNode {
    pub id: Uuid,
    pub source: Arc<PlanNode>,
    pub assignments: Vec<(String, Expression)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LimitNode {
    pub id: Uuid,
    pub source: Arc<PlanNode>,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JoinNode {
    pub id: Uuid,
    pub join_type: JoinType,
    pub left: Arc<PlanNode>,
    pub right: Arc<PlanNode>,
    //Equi-join criteria as (left column, right column)
    pub criteria: Vec<(String, String)>,
}

/// Stand in for a child that lives in a memo group, only a `Lookup` knows what is behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupReferenceNode {
    pub id: Uuid,
    pub group: usize,
    pub outputs: Vec<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinType {
    Inner,
    OuterLeft,
    OuterRight,
    OuterFull,
}

impl PlanNode {
    pub fn table_scan(table: &str, columns: &[&str]) -> PlanNode {
        PlanNode::TableScan(TableScanNode {
            id: Uuid::new_v4(),
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        })
    }

    pub fn values(columns: &[&str], rows: Vec<Vec<Expression>>) -> PlanNode {
        PlanNode::Values(ValuesNode {
            id: Uuid::new_v4(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    pub fn filter(source: PlanNode, predicate: Expression) -> PlanNode {
        PlanNode::Filter(FilterNode {
            id: Uuid::new_v4(),
            source: Arc::new(source),
            predicate,
        })
    }

    pub fn project(source: PlanNode, assignments: Vec<(String, Expression)>) -> PlanNode {
        PlanNode::Project(ProjectNode {
            id: Uuid::new_v4(),
            source: Arc::new(source),
            assignments,
        })
    }

    /// Projection that passes every output of its source through unchanged.
    pub fn identity_project(source: PlanNode) -> PlanNode {
        let assignments = source
            .outputs()
            .into_iter()
            .map(|c| {
                let expr = Expression::Column(c.clone());
                (c, expr)
            })
            .collect();
        PlanNode::project(source, assignments)
    }

    pub fn limit(source: PlanNode, count: u64) -> PlanNode {
        PlanNode::Limit(LimitNode {
            id: Uuid::new_v4(),
            source: Arc::new(source),
            count,
        })
    }

    pub fn join(
        join_type: JoinType,
        left: PlanNode,
        right: PlanNode,
        criteria: Vec<(String, String)>,
    ) -> PlanNode {
        PlanNode::Join(JoinNode {
            id: Uuid::new_v4(),
            join_type,
            left: Arc::new(left),
            right: Arc::new(right),
            criteria,
        })
    }

    pub fn group_reference(group: usize, outputs: Vec<String>) -> PlanNode {
        PlanNode::GroupReference(GroupReferenceNode {
            id: Uuid::new_v4(),
            group,
            outputs,
        })
    }

    pub fn id(&self) -> Uuid {
        match self {
            PlanNode::TableScan(n) => n.id,
            PlanNode::Values(n) => n.id,
            PlanNode::Filter(n) => n.id,
            PlanNode::Project(n) => n.id,
            PlanNode::Limit(n) => n.id,
            PlanNode::Join(n) => n.id,
            PlanNode::GroupReference(n) => n.id,
        }
    }

    /// Column names this node produces, in order.
    pub fn outputs(&self) -> Vec<String> {
        match self {
            PlanNode::TableScan(n) => n.columns.clone(),
            PlanNode::Values(n) => n.columns.clone(),
            PlanNode::Filter(n) => n.source.outputs(),
            PlanNode::Project(n) => n.assignments.iter().map(|a| a.0.clone()).collect(),
            PlanNode::Limit(n) => n.source.outputs(),
            PlanNode::Join(n) => {
                let mut outputs = n.left.outputs();
                outputs.extend(n.right.outputs());
                outputs
            }
            PlanNode::GroupReference(n) => n.outputs.clone(),
        }
    }

    /// Copy of this node with its children swapped out, keeping the node's id.
    pub fn replace_sources(&self, sources: Vec<PlanNode>) -> Result<PlanNode, PlanNodeError> {
        let expected = self.sources().len();
        if sources.len() != expected {
            return Err(PlanNodeError::SourceCountMismatch(
                self.kind(),
                expected,
                sources.len(),
            ));
        }

        let mut sources = sources.into_iter().map(Arc::new);
        //The length check above guarantees the iterator holds exactly what each arm takes
        let mut next = || sources.next().ok_or(PlanNodeError::MissingSource());

        Ok(match self {
            PlanNode::TableScan(_) | PlanNode::Values(_) | PlanNode::GroupReference(_) => {
                self.clone()
            }
            PlanNode::Filter(n) => PlanNode::Filter(FilterNode {
                source: next()?,
                ..n.clone()
            }),
            PlanNode::Project(n) => PlanNode::Project(ProjectNode {
                source: next()?,
                ..n.clone()
            }),
            PlanNode::Limit(n) => PlanNode::Limit(LimitNode {
                source: next()?,
                ..n.clone()
            }),
            PlanNode::Join(n) => PlanNode::Join(JoinNode {
                left: next()?,
                right: next()?,
                ..n.clone()
            }),
        })
    }

    /// Compares two plans ignoring node ids.
    pub fn same_shape(&self, other: &PlanNode) -> bool {
        let local = match (self, other) {
            (PlanNode::TableScan(a), PlanNode::TableScan(b)) => {
                a.table == b.table && a.columns == b.columns
            }
            (PlanNode::Values(a), PlanNode::Values(b)) => a.columns == b.columns && a.rows == b.rows,
            (PlanNode::Filter(a), PlanNode::Filter(b)) => a.predicate == b.predicate,
            (PlanNode::Project(a), PlanNode::Project(b)) => a.assignments == b.assignments,
            (PlanNode::Limit(a), PlanNode::Limit(b)) => a.count == b.count,
            (PlanNode::Join(a), PlanNode::Join(b)) => {
                a.join_type == b.join_type && a.criteria == b.criteria
            }
            (PlanNode::GroupReference(a), PlanNode::GroupReference(b)) => a.group == b.group,
            (_, _) => false,
        };

        local
            && self
                .sources()
                .iter()
                .zip(other.sources().iter())
                .all(|(a, b)| a.same_shape(b))
    }

    /// Multi line rendering of the whole tree, one node per line.
    pub fn explain(&self) -> String {
        let mut output = String::new();
        self.explain_into(&mut output, 0);
        output
    }

    fn explain_into(&self, output: &mut String, depth: usize) {
        output.push_str(&"  ".repeat(depth));
        output.push_str(&self.to_string());
        output.push('\n');
        for source in self.sources() {
            source.explain_into(output, depth + 1);
        }
    }
}

impl PlanTree for PlanNode {
    type Kind = PlanNodeKind;

    fn kind(&self) -> PlanNodeKind {
        match self {
            PlanNode::TableScan(_) => PlanNodeKind::TableScan,
            PlanNode::Values(_) => PlanNodeKind::Values,
            PlanNode::Filter(_) => PlanNodeKind::Filter,
            PlanNode::Project(_) => PlanNodeKind::Project,
            PlanNode::Limit(_) => PlanNodeKind::Limit,
            PlanNode::Join(_) => PlanNodeKind::Join,
            PlanNode::GroupReference(_) => PlanNodeKind::GroupReference,
        }
    }

    fn sources(&self) -> Vec<PlanNode> {
        match self {
            PlanNode::TableScan(_) | PlanNode::Values(_) | PlanNode::GroupReference(_) => vec![],
            PlanNode::Filter(n) => vec![n.source.as_ref().clone()],
            PlanNode::Project(n) => vec![n.source.as_ref().clone()],
            PlanNode::Limit(n) => vec![n.source.as_ref().clone()],
            PlanNode::Join(n) => vec![n.left.as_ref().clone(), n.right.as_ref().clone()],
        }
    }
}

impl ProjectNode {
    /// True when every source column is passed through under its own name, in order.
    pub fn is_identity(&self) -> bool {
        let source_outputs = self.source.outputs();
        source_outputs.len() == self.assignments.len()
            && self
                .assignments
                .iter()
                .zip(source_outputs.iter())
                .all(|((name, expr), source)| name == source && expr.as_column() == Some(source.as_str()))
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanNode::TableScan(n) => write!(f, "TableScan[{}]({})", n.table, n.columns.join(", ")),
            PlanNode::Values(n) => write!(f, "Values({}) rows={}", n.columns.join(", "), n.rows.len()),
            PlanNode::Filter(n) => write!(f, "Filter[{}]", n.predicate),
            PlanNode::Project(n) => {
                let rendered: Vec<String> = n
                    .assignments
                    .iter()
                    .map(|(name, expr)| format!("{} := {}", name, expr))
                    .collect();
                write!(f, "Project[{}]", rendered.join(", "))
            }
            PlanNode::Limit(n) => write!(f, "Limit[{}]", n.count),
            PlanNode::Join(n) => {
                let rendered: Vec<String> = n
                    .criteria
                    .iter()
                    .map(|(l, r)| format!("{} = {}", l, r))
                    .collect();
                write!(f, "Join[{:?}]({})", n.join_type, rendered.join(" AND "))
            }
            PlanNode::GroupReference(n) => write!(f, "GroupReference[{}]", n.group),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanNodeError {
    #[error("{0:?} node takes {1} sources, got {2}")]
    SourceCountMismatch(PlanNodeKind, usize, usize),
    #[error("Ran out of sources while rebuilding a node")]
    MissingSource(),
}
