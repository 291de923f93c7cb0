use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use planrewritelib::engine::objects::{Expression, NoopLookup, PlanNode};
use planrewritelib::engine::optimizer::{IterativeOptimizer, OptimizerConfig};
use planrewritelib::engine::rewriter::Rewriter;
use planrewritelib::engine::rules::default_rule_set;

// A tall plan of alternating filters and limits gives every rule something to do
fn stacked_plan(depth: usize) -> PlanNode {
    let mut plan = PlanNode::table_scan("orders", &["id", "total"]);
    for i in 0..depth {
        plan = if i % 2 == 0 {
            PlanNode::filter(
                plan,
                Expression::equal(Expression::column("id"), Expression::integer(i as i64)),
            )
        } else {
            PlanNode::limit(PlanNode::identity_project(plan), (depth - i) as u64)
        };
    }
    plan
}

fn rule_set_matching(c: &mut Criterion) {
    let rule_set = default_rule_set().unwrap();
    let lookup = NoopLookup {};
    let rewriter: Rewriter<PlanNode> = Rewriter::new(&lookup);
    let plan = stacked_plan(2);

    c.bench_function("rule_set_single_node", |b| {
        b.iter(|| rewriter.apply_set(&rule_set, &plan).unwrap())
    });
}

fn optimize_stacked(c: &mut Criterion) {
    let optimizer = IterativeOptimizer::new(
        default_rule_set().unwrap(),
        OptimizerConfig::default().with_max_iterations(10_000),
    );

    for depth in [8usize, 32, 128].iter() {
        c.bench_with_input(
            BenchmarkId::new("optimize_stacked", depth),
            depth,
            |b, &depth| {
                let plan = stacked_plan(depth);
                b.iter(|| optimizer.optimize(plan.clone()).unwrap())
            },
        );
    }
}

criterion_group!(benches, rule_set_matching, optimize_stacked);
criterion_main!(benches);
