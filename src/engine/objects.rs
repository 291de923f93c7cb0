mod expression;
pub use expression::ComparisonOperator;
pub use expression::Expression;
pub use expression::Literal;

mod lookup;
pub use lookup::Lookup;
pub use lookup::NoopLookup;
pub use lookup::UnresolvedReferenceError;

mod memo;
pub use memo::Memo;
pub use memo::MemoError;

mod plan_node;
pub use plan_node::FilterNode;
pub use plan_node::GroupReferenceNode;
pub use plan_node::JoinNode;
pub use plan_node::JoinType;
pub use plan_node::LimitNode;
pub use plan_node::PlanNode;
pub use plan_node::PlanNodeError;
pub use plan_node::PlanNodeKind;
pub use plan_node::ProjectNode;
pub use plan_node::TableScanNode;
pub use plan_node::ValuesNode;

mod plan_tree;
pub use plan_tree::PlanTree;
