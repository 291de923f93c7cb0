//! Pattern based rule application over query plans.
//!
//! `matching` decides whether a rule applies to a node, `rules` holds the rules themselves
//! and `rewriter` glues the two together for a single node. `optimizer` drives a rule set
//! over a whole plan until nothing more fires.
pub mod matching;

pub mod objects;

pub mod optimizer;
pub use optimizer::IterativeOptimizer;
pub use optimizer::OptimizerConfig;
pub use optimizer::OptimizerError;

pub mod rewriter;
pub use rewriter::Rewriter;

pub mod rule_tester;

pub mod rules;
