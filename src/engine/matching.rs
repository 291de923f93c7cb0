//! Declarative patterns over plan trees and the matcher that evaluates them.
//!
//! A `Pattern` is built once, usually when a rule is constructed, and describes which nodes
//! qualify: their variant, predicates over their fields, patterns over their children and the
//! `Capture` slots that record pieces of the matched tree. The `Matcher` evaluates a pattern
//! against a node, resolving indirect children through a `Lookup`, and produces a `Match`.
mod capture;
pub use capture::Capture;

mod captures;
pub use captures::Captures;

mod match_result;
pub use match_result::Match;

mod matcher;
pub use matcher::Matcher;

mod pattern;
pub use pattern::Pattern;
pub use pattern::PatternError;
