use log::LevelFilter;
use planrewritelib::engine::objects::{ComparisonOperator, Expression, JoinType, PlanNode};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

pub fn _init_logging() {
    //Every test in a binary calls this, only the first one wins
    let _ = CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

pub fn _orders() -> PlanNode {
    PlanNode::table_scan("orders", &["id", "customer", "total"])
}

pub fn _customers() -> PlanNode {
    PlanNode::table_scan("customers", &["customer_id", "name"])
}

pub fn _orders_by_customer(join_type: JoinType) -> PlanNode {
    PlanNode::join(
        join_type,
        _orders(),
        _customers(),
        vec![("customer".to_string(), "customer_id".to_string())],
    )
}

pub fn _big_orders() -> Expression {
    Expression::compare(
        ComparisonOperator::GreaterThan,
        Expression::column("total"),
        Expression::integer(100),
    )
}
