//! The view of a tree the rewriting engine needs, everything else about a node is opaque to it.
use std::fmt::{Debug, Display};

pub trait PlanTree: Clone + Debug + Display + Send + Sync + 'static {
    /// Runtime variant of a node, what a type filter pattern tests against.
    type Kind: Copy + Debug + Eq + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;

    /// Direct children in positional order. These may be indirect references
    /// that only a `Lookup` can turn into real nodes.
    fn sources(&self) -> Vec<Self>;
}
