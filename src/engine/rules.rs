//! Rules pair a pattern with a transformation. A `RuleSet` groups rules whose patterns
//! must never overlap and `RuleSetAdapter` runs such a set as if it were one rule.
mod rule;
pub use rule::required_capture;
pub use rule::Rule;
pub use rule::RuleContext;
pub use rule::RuleError;
pub use rule::RuleResult;

mod rule_set;
pub use rule_set::RuleSet;
pub use rule_set::RuleSetAdapter;
pub use rule_set::RuleSetError;

mod merge_filters;
pub use merge_filters::MergeFilters;

mod merge_limits;
pub use merge_limits::MergeLimits;

mod push_limit_through_project;
pub use push_limit_through_project::PushLimitThroughProject;

mod remove_redundant_project;
pub use remove_redundant_project::RemoveRedundantProject;

mod remove_true_filter;
pub use remove_true_filter::RemoveTrueFilter;

use super::objects::PlanNode;

/// Every bundled plan rule in one set. Their patterns are disjoint, so the set never
/// reports an ambiguity on a well formed plan.
pub fn default_rule_set() -> Result<RuleSet<PlanNode>, RuleSetError> {
    RuleSet::new()
        .with_rule(MergeFilters::new()?)?
        .with_rule(MergeLimits::new()?)?
        .with_rule(PushLimitThroughProject::new()?)?
        .with_rule(RemoveRedundantProject::new()?)?
        .with_rule(RemoveTrueFilter::new()?)
}
