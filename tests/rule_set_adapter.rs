mod common;
use planrewritelib::engine::matching::{Captures, Pattern};
use planrewritelib::engine::objects::{Expression, JoinType, NoopLookup, PlanNode, PlanNodeKind};
use planrewritelib::engine::rewriter::Rewriter;
use planrewritelib::engine::rule_tester::RuleTester;
use planrewritelib::engine::rules::{
    default_rule_set, RemoveRedundantProject, Rule, RuleContext, RuleError, RuleResult, RuleSet,
};

struct FlipJoin {
    pattern: Pattern<PlanNode>,
}

impl FlipJoin {
    fn new() -> FlipJoin {
        FlipJoin {
            pattern: Pattern::type_of(PlanNodeKind::Join)
                .matching(|n: &PlanNode| matches!(n, PlanNode::Join(j) if j.join_type == JoinType::Inner)),
        }
    }
}

impl Rule<PlanNode> for FlipJoin {
    fn name(&self) -> &str {
        "FlipJoin"
    }

    fn pattern(&self) -> &Pattern<PlanNode> {
        &self.pattern
    }

    fn apply(
        &self,
        node: &PlanNode,
        _captures: &Captures,
        _context: &RuleContext<'_, PlanNode>,
    ) -> Result<RuleResult<PlanNode>, RuleError> {
        match node {
            PlanNode::Join(j) => Ok(RuleResult::Replaced(PlanNode::join(
                j.join_type,
                j.right.as_ref().clone(),
                j.left.as_ref().clone(),
                j.criteria.iter().map(|(l, r)| (r.clone(), l.clone())).collect(),
            ))),
            _ => Ok(RuleResult::Unchanged),
        }
    }
}

struct AnyInnerJoin {
    pattern: Pattern<PlanNode>,
}

impl Rule<PlanNode> for AnyInnerJoin {
    fn name(&self) -> &str {
        "AnyInnerJoin"
    }

    fn pattern(&self) -> &Pattern<PlanNode> {
        &self.pattern
    }

    fn apply(
        &self,
        _node: &PlanNode,
        _captures: &Captures,
        _context: &RuleContext<'_, PlanNode>,
    ) -> Result<RuleResult<PlanNode>, RuleError> {
        Ok(RuleResult::Unchanged)
    }
}

#[test]
fn project_over_filter_promotes_filter() -> Result<(), Box<dyn std::error::Error>> {
    common::_init_logging();

    let filter = PlanNode::filter(common::_orders(), common::_big_orders());
    RuleTester::assert_that(RemoveRedundantProject::new()?)
        .on(PlanNode::identity_project(filter.clone()))
        .matches(&filter)?;

    let renaming = PlanNode::project(
        filter,
        vec![("amount".to_string(), Expression::column("total"))],
    );
    RuleTester::assert_that(RemoveRedundantProject::new()?)
        .on(renaming)
        .does_not_fire()?;
    Ok(())
}

#[test]
fn set_applies_its_single_matching_member() -> Result<(), Box<dyn std::error::Error>> {
    common::_init_logging();

    let rule_set = RuleSet::new()
        .with_rule(FlipJoin::new())?
        .with_rule(RemoveRedundantProject::new()?)?;

    let expected = PlanNode::join(
        JoinType::Inner,
        common::_customers(),
        common::_orders(),
        vec![("customer_id".to_string(), "customer".to_string())],
    );
    RuleTester::assert_that_set(rule_set.clone())
        .on(common::_orders_by_customer(JoinType::Inner))
        .matches(&expected)?;

    RuleTester::assert_that_set(rule_set)
        .on(common::_orders_by_customer(JoinType::OuterLeft))
        .does_not_fire()?;
    Ok(())
}

#[test]
fn overlapping_members_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    common::_init_logging();

    let rule_set = RuleSet::new().with_rule(FlipJoin::new())?.with_rule(AnyInnerJoin {
        pattern: Pattern::type_of(PlanNodeKind::Join),
    })?;

    let lookup = NoopLookup {};
    let rewriter: Rewriter<PlanNode> = Rewriter::new(&lookup);
    let join = common::_orders_by_customer(JoinType::Inner);

    match rewriter.apply_set(&rule_set, &join) {
        Err(RuleError::AmbiguousRuleSet { node, rules }) => {
            assert_eq!(rules, vec!["AnyInnerJoin", "FlipJoin"]);
            assert_eq!(node, join.to_string());
        }
        other => panic!("Expected an ambiguity, got {:?}", other),
    }

    //Outside of the overlap the set behaves normally
    let left = common::_orders_by_customer(JoinType::OuterLeft);
    assert_eq!(rewriter.apply_set(&rule_set, &left)?, RuleResult::Unchanged);
    Ok(())
}

#[test]
fn default_rules_are_disjoint() -> Result<(), Box<dyn std::error::Error>> {
    common::_init_logging();

    let rule_set = default_rule_set()?;
    assert_eq!(rule_set.len(), 5);

    let plans = vec![
        PlanNode::filter(
            PlanNode::filter(common::_orders(), Expression::boolean(true)),
            Expression::boolean(true),
        ),
        PlanNode::limit(PlanNode::limit(common::_orders(), 1), 2),
        PlanNode::limit(PlanNode::identity_project(common::_orders()), 2),
        PlanNode::identity_project(PlanNode::identity_project(common::_orders())),
        PlanNode::filter(
            PlanNode::filter(common::_orders(), common::_big_orders()),
            common::_big_orders(),
        ),
    ];

    let lookup = NoopLookup {};
    let rewriter: Rewriter<PlanNode> = Rewriter::new(&lookup);
    for plan in plans {
        assert!(
            rewriter.apply_set(&rule_set, &plan)?.is_changed(),
            "Nothing fired on\n{}",
            plan.explain()
        );
    }
    Ok(())
}
