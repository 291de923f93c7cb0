//! Defaults for the iterative optimizer, overridable through `OptimizerConfig`.

/// Upper bound on rule invocations in a single optimizer run.
pub const MAX_ITERATIONS: usize = 100;

/// Rule traces keep a rendered before/after plan which is costly, so they are opt in.
pub const ENABLE_TRACE: bool = false;
