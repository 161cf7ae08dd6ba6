//! Statistics the engine publishes.

use std::time::Duration;

/// Monotonic counters and accumulated timers for one solver instance.
///
/// Counters only ever increase; the caller may snapshot (`clone`) and
/// diff across checks.
#[derive(Debug, Default, Clone)]
pub struct SimplexStats {
    /// Number of pivot operations performed.
    pub pivots: u64,
    /// Number of non-basic assignment updates.
    pub updates: u64,
    /// Conflicts detected directly inside `assert_upper`.
    pub assert_upper_conflicts: u64,
    /// Conflicts detected directly inside `assert_lower`.
    pub assert_lower_conflicts: u64,
    /// Conflicts detected by the main update loop.
    pub update_conflicts: u64,
    /// Basic variables ejected from the tableau. Reserved for the
    /// ejection heuristic; currently never incremented.
    pub ejections: u64,
    /// Ejected variables reinjected into the tableau. Reserved for the
    /// ejection heuristic; currently never incremented.
    pub unejections: u64,
    /// Conflicts found by the initial-conflict scan before any pivoting.
    pub early_conflicts: u64,
    /// Checks in which the initial-conflict scan replaced its chosen
    /// conflict at least twice.
    pub early_conflict_improvements: u64,
    /// Pivots performed after a conflict had already been found in the
    /// same check pass.
    pub pivots_after_conflict: u64,
    /// Checks that performed at least one pivot after a conflict had
    /// already been found.
    pub checks_with_wasteful_pivots: u64,
    /// Total time spent scanning for an initial conflict.
    pub select_initial_conflict_time: Duration,
    /// Total time spent in pivot-and-update.
    pub pivot_time: Duration,
}
