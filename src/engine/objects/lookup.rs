//! Resolution of indirect children. The driver owns whatever registry sits behind a `Lookup`.
use super::PlanNode;
use thiserror::Error;

pub trait Lookup<N>: Send + Sync {
    /// Returns the node a reference stands for. Nodes that are not references resolve to themselves.
    fn resolve(&self, node: &N) -> Result<N, UnresolvedReferenceError>;
}

/// Lookup for fully materialized trees, any reference found in one is malformed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLookup {}

impl Lookup<PlanNode> for NoopLookup {
    fn resolve(&self, node: &PlanNode) -> Result<PlanNode, UnresolvedReferenceError> {
        match node {
            PlanNode::GroupReference(_) => Err(UnresolvedReferenceError(node.to_string())),
            _ => Ok(node.clone()),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Unable to resolve reference {0}")]
pub struct UnresolvedReferenceError(pub String);
