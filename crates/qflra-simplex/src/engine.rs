//! The dual simplex decision procedure.
//!
//! `SimplexSolver` combines the tableau, the partial model, and the two
//! work queues into the bound-driven check of Dutertre & de Moura.
//! Assertions install bounds (or report an immediate conflict between a
//! new bound and the opposite installed one); the main loop then repairs
//! violated basic variables by pivoting until the model satisfies every
//! bound or some violating row proves the bounds unsatisfiable.
//!
//! Check passes run in two stages sharing the queues. The Griggio stage
//! pops the largest violation first and prefers slack variables with few
//! row occurrences; it is fast but bounded to one iteration per variable.
//! If the budget runs out, surviving work migrates to the Bland stage,
//! which picks the smallest variable id everywhere and therefore cannot
//! cycle.

use crate::config::SimplexConfig;
use crate::delta::DeltaRational;
use crate::model::PartialModel;
use crate::queue::{BlandQueue, GriggioEntry, GriggioQueue};
use crate::stats::SimplexStats;
use crate::tableau::Tableau;
use crate::ArithVar;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use qflra_core::{Conflict, ConflictSink, TermId};
use std::time::Instant;
use tracing::{debug, trace};

fn var_at(idx: usize) -> ArithVar {
    ArithVar::new(u32::try_from(idx).expect("variable id overflow"))
}

/// Bound-driven dual simplex engine.
///
/// The engine owns the tableau, the partial model, and the work queues;
/// the conflict sink `S` is the output channel through which conflicts
/// detected inside `assert_*` reach the SAT layer. Conflicts detected by
/// [`SimplexSolver::update_inconsistent_vars`] are returned instead.
///
/// The engine is single-threaded and non-reentrant. Precondition
/// violations (pivoting on a zero coefficient, updating a basic variable,
/// asking for the row of a non-basic) indicate broken invariants and
/// panic.
#[derive(Debug)]
pub struct SimplexSolver<S> {
    tableau: Tableau,
    model: PartialModel,
    griggio_queue: GriggioQueue,
    bland_queue: BlandQueue,
    /// True while the check is in (or queueing for) the Griggio stage.
    pivot_stage: bool,
    found_a_conflict: bool,
    pivots_since_conflict: u32,
    num_variables: usize,
    config: SimplexConfig,
    stats: SimplexStats,
    out: S,
}

impl<S: ConflictSink> SimplexSolver<S> {
    /// Create a solver with the default configuration.
    #[must_use]
    pub fn new(out: S) -> Self {
        Self::with_config(out, SimplexConfig::default())
    }

    /// Create a solver with an explicit configuration.
    #[must_use]
    pub fn with_config(out: S, config: SimplexConfig) -> Self {
        SimplexSolver {
            tableau: Tableau::new(),
            model: PartialModel::new(),
            griggio_queue: GriggioQueue::new(),
            bland_queue: BlandQueue::new(),
            pivot_stage: true,
            found_a_conflict: false,
            pivots_since_conflict: 0,
            num_variables: 0,
            config,
            stats: SimplexStats::default(),
            out,
        }
    }

    /// Allocate the next variable id, assigned zero and unbounded.
    pub fn new_variable(&mut self) -> ArithVar {
        let var = var_at(self.num_variables);
        self.num_variables += 1;
        self.tableau.ensure_variable(var);
        self.model.ensure_variable(var);
        var
    }

    /// Number of variables allocated so far.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Introduce the linear definition `basic = Σ c_j · x_j` as a tableau
    /// row and align the assignment of `basic` with it.
    pub fn add_row(&mut self, basic: ArithVar, combination: Vec<(ArithVar, BigRational)>) {
        self.tableau.add_row(basic, combination);
        let safe = self.compute_row_value(basic, true);
        let current = self.compute_row_value(basic, false);
        self.model.set_safe_assignment(basic, safe);
        self.model.set_assignment(basic, current);
    }

    /// The partial model (read-only).
    #[must_use]
    pub fn model(&self) -> &PartialModel {
        &self.model
    }

    /// The tableau (read-only).
    #[must_use]
    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    /// Statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &SimplexStats {
        &self.stats
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }

    /// The conflict sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.out
    }

    /// Mutable access to the conflict sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.out
    }

    /// Assert `x >= c`. Returns true (and reports to the sink) when the
    /// new bound contradicts the installed upper bound of `x`.
    pub fn assert_lower(&mut self, x: ArithVar, c: DeltaRational, reason: TermId) -> bool {
        debug!("assert_lower({x} >= {c})");

        if self.model.below_lower_bound(x, &c, false) {
            return false; // no tighter than the installed bound
        }
        if self.model.above_upper_bound(x, &c, true) {
            let upper = self
                .model
                .upper_constraint(x)
                .expect("upper bound without originating constraint");
            self.stats.assert_lower_conflicts += 1;
            self.emit_conflict(Conflict::new(vec![upper, reason]));
            return true;
        }

        self.model.set_lower_constraint(x, reason);
        self.model.set_lower_bound(x, c.clone());
        self.model.reset_activity(x);

        if !self.tableau.is_basic(x) {
            if self.model.assignment(x) < &c {
                self.update(x, c);
            }
        } else {
            self.check_basic_variable(x);
        }
        false
    }

    /// Assert `x <= c`. Returns true (and reports to the sink) when the
    /// new bound contradicts the installed lower bound of `x`.
    pub fn assert_upper(&mut self, x: ArithVar, c: DeltaRational, reason: TermId) -> bool {
        debug!("assert_upper({x} <= {c})");

        if self.model.above_upper_bound(x, &c, false) {
            return false;
        }
        if self.model.below_lower_bound(x, &c, true) {
            let lower = self
                .model
                .lower_constraint(x)
                .expect("lower bound without originating constraint");
            self.stats.assert_upper_conflicts += 1;
            self.emit_conflict(Conflict::new(vec![lower, reason]));
            return true;
        }

        self.model.set_upper_constraint(x, reason);
        self.model.set_upper_bound(x, c.clone());
        self.model.reset_activity(x);

        if !self.tableau.is_basic(x) {
            if self.model.assignment(x) > &c {
                self.update(x, c);
            }
        } else {
            self.check_basic_variable(x);
        }
        false
    }

    /// Assert `x = c`, the intersection of the two bounds. The same
    /// `reason` becomes the originating constraint of both.
    pub fn assert_equality(&mut self, x: ArithVar, c: DeltaRational, reason: TermId) -> bool {
        debug!("assert_equality({x} = {c})");

        // l >= c and u <= c can both hold already when c <= x and x <= c
        // were asserted separately.
        if self.model.below_lower_bound(x, &c, false) && self.model.above_upper_bound(x, &c, false)
        {
            return false;
        }
        if self.model.above_upper_bound(x, &c, true) {
            let upper = self
                .model
                .upper_constraint(x)
                .expect("upper bound without originating constraint");
            self.emit_conflict(Conflict::new(vec![upper, reason]));
            return true;
        }
        if self.model.below_lower_bound(x, &c, true) {
            let lower = self
                .model
                .lower_constraint(x)
                .expect("lower bound without originating constraint");
            self.emit_conflict(Conflict::new(vec![lower, reason]));
            return true;
        }

        self.model.set_lower_constraint(x, reason);
        self.model.set_lower_bound(x, c.clone());
        self.model.set_upper_constraint(x, reason);
        self.model.set_upper_bound(x, c.clone());
        self.model.reset_activity(x);

        if !self.tableau.is_basic(x) {
            if self.model.assignment(x) != &c {
                self.update(x, c);
            }
        } else {
            self.check_basic_variable(x);
        }
        false
    }

    /// Drain the inconsistency queues by pivoting. Returns a conflict when
    /// the asserted bounds are unsatisfiable, `None` when the model now
    /// satisfies all of them.
    pub fn update_inconsistent_vars(&mut self) -> Option<Conflict> {
        if self.griggio_queue.is_empty() {
            return None;
        }

        self.found_a_conflict = false;
        self.pivots_since_conflict = 0;

        let mut conflict = None;
        if self.config.early_conflict_selection && self.griggio_queue.len() > 1 {
            conflict = self.select_initial_conflict();
        }
        if conflict.is_none() {
            conflict = self.private_update_inconsistent_vars();
        }
        debug_assert!(conflict.is_some() || self.griggio_queue.is_empty());
        debug_assert!(conflict.is_some() || self.bland_queue.is_empty());

        self.pivot_stage = true;
        self.griggio_queue.clear();
        self.bland_queue.clear();

        conflict
    }

    /// Value of the row of `basic` under the current (or safe) assignment
    /// of its non-basic variables.
    #[must_use]
    pub fn compute_row_value(&self, basic: ArithVar, use_safe: bool) -> DeltaRational {
        let row = self.tableau.row(basic);
        let mut sum = DeltaRational::zero();
        for (var, coeff) in row.iter() {
            if var == basic {
                continue;
            }
            let assignment = if use_safe {
                self.model.safe_assignment(var)
            } else {
                self.model.assignment(var)
            };
            sum = &sum + &(assignment * coeff);
        }
        sum
    }

    /// Verify that every basic assignment equals its row value exactly.
    /// Very expensive; panics on violation. Run automatically inside the
    /// engine when `paranoid_checks` is enabled.
    pub fn check_tableau(&self) {
        for basic in self.tableau.basic_variables() {
            let computed = self.compute_row_value(basic, false);
            let stored = self.model.assignment(basic);
            assert!(
                computed == *stored,
                "tableau row of {basic} disagrees with its assignment: {computed} != {stored}"
            );
        }
    }

    fn emit_conflict(&mut self, conflict: Conflict) {
        debug!("conflict with {} conjuncts", conflict.len());
        self.out.conflict(conflict);
    }

    /// Move the non-basic `xi` to `v` and propagate the change through
    /// every row that mentions it. No pivot occurs.
    fn update(&mut self, xi: ArithVar, v: DeltaRational) {
        assert!(
            !self.tableau.is_basic(xi),
            "update() requires non-basic {xi}"
        );
        self.stats.updates += 1;
        trace!("update {xi}: {} |-> {v}", self.model.assignment(xi));

        let diff = &v - self.model.assignment(xi);
        for idx in 0..self.num_variables {
            let xb = var_at(idx);
            if !self.tableau.is_basic(xb) {
                continue;
            }
            let Some(coeff) = self.tableau.row(xb).coeff(xi).cloned() else {
                continue;
            };
            let next = self.model.assignment(xb) + &(&diff * &coeff);
            self.model.set_assignment(xb, next);
            self.model.bump_activity(xb);
            self.check_basic_variable(xb);
        }
        self.model.set_assignment(xi, v);

        if self.config.paranoid_checks {
            self.check_tableau();
        }
    }

    /// Set the violating basic `xi` to `v`, absorb the difference into the
    /// non-basic `xj`, and pivot them.
    fn pivot_and_update(&mut self, xi: ArithVar, xj: ArithVar, v: DeltaRational) {
        assert!(xi != xj, "pivot_and_update on a single variable {xi}");
        let start = Instant::now();
        trace!("pivot_and_update {xi} |-> {xj}, target {v}");

        let a_ij = self.tableau.row(xi).lookup(xj).clone();
        let theta = &(&v - self.model.assignment(xi)) * &a_ij.recip();

        self.model.set_assignment(xi, v);
        let next_j = self.model.assignment(xj) + &theta;
        self.model.set_assignment(xj, next_j);

        for idx in 0..self.num_variables {
            let xk = var_at(idx);
            if xk == xi || !self.tableau.is_basic(xk) {
                continue;
            }
            let Some(a_kj) = self.tableau.row(xk).coeff(xj).cloned() else {
                continue;
            };
            let next = self.model.assignment(xk) + &(&theta * &a_kj);
            self.model.set_assignment(xk, next);
            self.model.bump_activity(xk);
            self.check_basic_variable(xk);
        }

        self.stats.pivots += 1;
        if self.found_a_conflict {
            self.pivots_since_conflict += 1;
            if self.pivots_since_conflict == 1 {
                self.stats.checks_with_wasteful_pivots += 1;
            }
            self.stats.pivots_after_conflict += 1;
        }

        self.tableau.pivot(xi, xj);
        self.check_basic_variable(xj);

        // Side check: the entering variable may already be hopeless. The
        // main loop re-detects this through check_basic_for_conflict; the
        // flag here additionally guards the wasteful-pivot counters.
        if !self.found_a_conflict {
            let beta_j = self.model.assignment(xj).clone();
            if self.model.below_lower_bound(xj, &beta_j, true) {
                if self.select_slack_below(xj).is_none() {
                    self.found_a_conflict = true;
                }
            } else if self.model.above_upper_bound(xj, &beta_j, true)
                && self.select_slack_above(xj).is_none()
            {
                self.found_a_conflict = true;
            }
        }

        self.stats.pivot_time += start.elapsed();
    }

    /// Queue `basic` if its assignment violates one of its bounds.
    fn check_basic_variable(&mut self, basic: ArithVar) {
        debug_assert!(self.tableau.is_basic(basic));
        if self.model.assignment_is_consistent(basic) {
            return;
        }
        if self.pivot_stage {
            let beta = self.model.assignment(basic);
            let violation = if self.model.below_lower_bound(basic, beta, true) {
                self.model.lower_bound(basic).expect("violated bound exists") - beta
            } else {
                beta - self.model.upper_bound(basic).expect("violated bound exists")
            };
            self.griggio_queue.push(basic, violation);
        } else {
            self.bland_queue.push(basic);
        }
    }

    /// Next live queue entry for the current stage: still basic, still
    /// inconsistent. Stale entries are popped and dropped; a live entry is
    /// left on its queue.
    fn select_smallest_inconsistent_var(&mut self) -> Option<ArithVar> {
        if self.pivot_stage {
            loop {
                let var = self.griggio_queue.peek().map(|entry| entry.var)?;
                if self.tableau.is_basic(var) && !self.model.assignment_is_consistent(var) {
                    return Some(var);
                }
                self.griggio_queue.pop();
            }
        } else {
            loop {
                let var = self.bland_queue.peek()?;
                if self.tableau.is_basic(var) && !self.model.assignment_is_consistent(var) {
                    return Some(var);
                }
                self.bland_queue.pop();
            }
        }
    }

    fn select_slack_above(&self, xi: ArithVar) -> Option<ArithVar> {
        self.select_slack(xi, true)
    }

    fn select_slack_below(&self, xi: ArithVar) -> Option<ArithVar> {
        self.select_slack(xi, false)
    }

    /// A non-basic variable of the row of `xi` whose coefficient sign and
    /// bound margin allow it to absorb a corrective change. In the Griggio
    /// stage ties break toward the smallest row count (touching a sparse
    /// column disturbs fewer rows); in the Bland stage the first candidate
    /// in row order wins, which is the smallest-index rule since rows
    /// iterate in increasing variable order.
    fn select_slack(&self, xi: ArithVar, above: bool) -> Option<ArithVar> {
        let row = self.tableau.row(xi);
        let mut slack = None;
        let mut best_row_count = u32::MAX;

        for (var, coeff) in row.iter() {
            if var == xi {
                continue;
            }
            let positive = coeff.is_positive();
            let usable = if above {
                // β(xi) > u_i: xi must decrease.
                (!positive && self.model.strictly_below_upper_bound(var))
                    || (positive && self.model.strictly_above_lower_bound(var))
            } else {
                // β(xi) < l_i: xi must increase.
                (positive && self.model.strictly_below_upper_bound(var))
                    || (!positive && self.model.strictly_above_lower_bound(var))
            };
            if !usable {
                continue;
            }
            if self.pivot_stage {
                let count = self.tableau.row_count(var);
                if count < best_row_count {
                    slack = Some(var);
                    best_row_count = count;
                }
            } else {
                return Some(var);
            }
        }
        slack
    }

    /// Conflict for a basic `xi` with `β(xi) > u_i` and no slack: its
    /// upper bound together with the bound each row variable is stuck at.
    fn generate_conflict_above(&self, xi: ArithVar) -> Conflict {
        let row = self.tableau.row(xi);
        let mut conjuncts = Vec::with_capacity(row.len());
        conjuncts.push(
            self.model
                .upper_constraint(xi)
                .expect("violated upper bound has a constraint"),
        );
        for (var, coeff) in row.iter() {
            if var == xi {
                continue;
            }
            let bound = if coeff.is_negative() {
                self.model.upper_constraint(var)
            } else {
                self.model.lower_constraint(var)
            };
            conjuncts.push(bound.expect("slack-free row variable is at a bound"));
        }
        debug!("generate_conflict_above({xi}): {} conjuncts", conjuncts.len());
        Conflict::new(conjuncts)
    }

    /// Dual of [`SimplexSolver::generate_conflict_above`] for
    /// `β(xi) < l_i`.
    fn generate_conflict_below(&self, xi: ArithVar) -> Conflict {
        let row = self.tableau.row(xi);
        let mut conjuncts = Vec::with_capacity(row.len());
        conjuncts.push(
            self.model
                .lower_constraint(xi)
                .expect("violated lower bound has a constraint"),
        );
        for (var, coeff) in row.iter() {
            if var == xi {
                continue;
            }
            let bound = if coeff.is_negative() {
                self.model.lower_constraint(var)
            } else {
                self.model.upper_constraint(var)
            };
            conjuncts.push(bound.expect("slack-free row variable is at a bound"));
        }
        debug!("generate_conflict_below({xi}): {} conjuncts", conjuncts.len());
        Conflict::new(conjuncts)
    }

    /// If `basic` violates a bound with no slack in that direction, the
    /// conflict read off its row; otherwise `None`.
    fn check_basic_for_conflict(&self, basic: ArithVar) -> Option<Conflict> {
        debug_assert!(self.tableau.is_basic(basic));
        let beta = self.model.assignment(basic);
        if self.model.below_lower_bound(basic, beta, true) {
            if self.select_slack_below(basic).is_none() {
                return Some(self.generate_conflict_below(basic));
            }
        } else if self.model.above_upper_bound(basic, beta, true)
            && self.select_slack_above(basic).is_none()
        {
            return Some(self.generate_conflict_above(basic));
        }
        None
    }

    /// Before any pivoting, scan the queued violations for rows that are
    /// already conflicting and keep the conflict with the fewest
    /// conjuncts. The queue is rebuilt so the main loop sees the original
    /// work.
    fn select_initial_conflict(&mut self) -> Option<Conflict> {
        let start = Instant::now();

        let mut live = Vec::new();
        while let Some(entry) = self.griggio_queue.pop() {
            if self.tableau.is_basic(entry.var) && !self.model.assignment_is_consistent(entry.var) {
                live.push(entry);
            }
        }

        let mut best: Option<Conflict> = None;
        let mut replacements = 0u32;
        for entry in live {
            let GriggioEntry { var, violation } = entry;
            self.griggio_queue.push(var, violation);

            if let Some(candidate) = self.check_basic_for_conflict(var) {
                self.stats.early_conflicts += 1;
                let replace = best
                    .as_ref()
                    .map_or(true, |current| candidate.len() < current.len());
                if replace {
                    best = Some(candidate);
                    replacements += 1;
                }
            }
        }
        if replacements > 1 {
            self.stats.early_conflict_improvements += 1;
        }

        self.stats.select_initial_conflict_time += start.elapsed();
        best
    }

    /// The check loop proper (Check() in the Dutertre–de Moura
    /// presentation), run first under the Griggio rule with an iteration
    /// budget of one per variable, then under Bland's rule with no budget.
    fn private_update_inconsistent_vars(&mut self) -> Option<Conflict> {
        debug_assert!(self.pivot_stage || self.griggio_queue.is_empty());

        let mut iterations = 0usize;
        while !self.pivot_stage || iterations <= self.num_variables {
            if self.config.paranoid_checks {
                self.check_tableau();
            }

            let Some(xi) = self.select_smallest_inconsistent_var() else {
                trace!("no inconsistent variables left");
                return None; // sat
            };
            iterations += 1;

            let beta_i = self.model.assignment(xi).clone();
            let xj;
            if self.model.below_lower_bound(xi, &beta_i, true) {
                let target = self
                    .model
                    .lower_bound(xi)
                    .expect("violated bound exists")
                    .clone();
                match self.select_slack_below(xi) {
                    None => {
                        self.stats.update_conflicts += 1;
                        return Some(self.generate_conflict_below(xi));
                    }
                    Some(slack) => {
                        xj = slack;
                        self.pivot_and_update(xi, xj, target);
                    }
                }
            } else {
                debug_assert!(self.model.above_upper_bound(xi, &beta_i, true));
                let target = self
                    .model
                    .upper_bound(xi)
                    .expect("violated bound exists")
                    .clone();
                match self.select_slack_above(xi) {
                    None => {
                        self.stats.update_conflicts += 1;
                        return Some(self.generate_conflict_above(xi));
                    }
                    Some(slack) => {
                        xj = slack;
                        self.pivot_and_update(xi, xj, target);
                    }
                }
            }

            // The entering variable may be hopeless already; surfacing
            // that now avoids pivoting past a decided conflict.
            if let Some(conflict) = self.check_basic_for_conflict(xj) {
                return Some(conflict);
            }
        }

        // Griggio budget exhausted: hand surviving basics to the Bland
        // queue and restart under the smallest-index rule.
        debug_assert!(self.pivot_stage);
        trace!("griggio budget exhausted, switching to bland stage");
        while let Some(entry) = self.griggio_queue.pop() {
            if self.tableau.is_basic(entry.var) {
                self.bland_queue.push(entry.var);
            }
        }
        self.pivot_stage = false;
        self.private_update_inconsistent_vars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qflra_core::{ConflictBuffer, Sort, TermStore};

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    fn dr(n: i64) -> DeltaRational {
        DeltaRational::from_integer(n)
    }

    struct Fixture {
        store: TermStore,
        solver: SimplexSolver<ConflictBuffer>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                store: TermStore::new(),
                solver: SimplexSolver::new(ConflictBuffer::new()),
            }
        }

        fn atom(&mut self, name: &str) -> TermId {
            self.store.mk_var(name, Sort::Bool)
        }
    }

    #[test]
    fn test_single_variable_bound_conflict() {
        let mut fx = Fixture::new();
        let x = fx.solver.new_variable();
        let ge2 = fx.atom("x >= 2");
        let le1 = fx.atom("x <= 1");

        assert!(!fx.solver.assert_lower(x, dr(2), ge2));
        assert!(fx.solver.assert_upper(x, dr(1), le1));

        let conflict = fx.solver.sink().last().expect("conflict reported");
        assert_eq!(conflict.conjuncts(), &[ge2, le1]);
        assert_eq!(fx.solver.stats().assert_upper_conflicts, 1);
    }

    #[test]
    fn test_redundant_bounds_are_ignored() {
        let mut fx = Fixture::new();
        let x = fx.solver.new_variable();
        let ge2 = fx.atom("x >= 2");
        let ge1 = fx.atom("x >= 1");

        assert!(!fx.solver.assert_lower(x, dr(2), ge2));
        // Weaker bound: no effect, original constraint stays installed.
        assert!(!fx.solver.assert_lower(x, dr(1), ge1));
        assert_eq!(fx.solver.model().lower_constraint(x), Some(ge2));
        assert_eq!(*fx.solver.model().lower_bound(x).unwrap(), dr(2));
    }

    #[test]
    fn test_strict_bounds_meet_in_conflict() {
        let mut fx = Fixture::new();
        let x = fx.solver.new_variable();
        let gt1 = fx.atom("x > 1");
        let le1 = fx.atom("x <= 1");

        // x > 1 encoded as x >= 1 + δ.
        assert!(!fx.solver.assert_lower(x, DeltaRational::just_above(rat(1)), gt1));
        assert!(fx.solver.assert_upper(x, dr(1), le1));
        assert_eq!(fx.solver.sink().last().unwrap().conjuncts(), &[gt1, le1]);
    }

    #[test]
    fn test_equality_installs_both_bounds() {
        let mut fx = Fixture::new();
        let x = fx.solver.new_variable();
        let eq3 = fx.atom("x = 3");

        assert!(!fx.solver.assert_equality(x, dr(3), eq3));
        assert_eq!(fx.solver.model().lower_constraint(x), Some(eq3));
        assert_eq!(fx.solver.model().upper_constraint(x), Some(eq3));
        assert_eq!(*fx.solver.model().assignment(x), dr(3));
    }

    #[test]
    fn test_equality_conflicts_do_not_bump_assert_counters() {
        let mut fx = Fixture::new();
        let x = fx.solver.new_variable();
        let le2 = fx.atom("x <= 2");
        let eq3 = fx.atom("x = 3");

        assert!(!fx.solver.assert_upper(x, dr(2), le2));
        assert!(fx.solver.assert_equality(x, dr(3), eq3));
        assert_eq!(fx.solver.sink().last().unwrap().conjuncts(), &[le2, eq3]);
        assert_eq!(fx.solver.stats().assert_lower_conflicts, 0);
        assert_eq!(fx.solver.stats().assert_upper_conflicts, 0);
    }

    #[test]
    fn test_update_moves_dependent_basics() {
        let mut fx = Fixture::new();
        let x0 = fx.solver.new_variable();
        let x1 = fx.solver.new_variable();
        let x2 = fx.solver.new_variable();
        fx.solver.add_row(x2, vec![(x0, rat(1)), (x1, rat(1))]);

        let ge1 = fx.atom("x0 >= 1");
        assert!(!fx.solver.assert_lower(x0, dr(1), ge1));

        assert_eq!(*fx.solver.model().assignment(x0), dr(1));
        assert_eq!(*fx.solver.model().assignment(x2), dr(1));
        assert_eq!(fx.solver.stats().updates, 1);
        fx.solver.check_tableau();
    }

    #[test]
    fn test_update_inconsistent_vars_is_idempotent_on_sat_state() {
        let mut fx = Fixture::new();
        let x0 = fx.solver.new_variable();
        let x1 = fx.solver.new_variable();
        let x2 = fx.solver.new_variable();
        fx.solver.add_row(x2, vec![(x0, rat(1)), (x1, rat(1))]);

        let ge1 = fx.atom("x0 >= 1");
        assert!(!fx.solver.assert_lower(x0, dr(1), ge1));
        assert!(fx.solver.update_inconsistent_vars().is_none());

        // Already satisfied: no pivots may happen.
        let pivots_before = fx.solver.stats().pivots;
        assert!(fx.solver.update_inconsistent_vars().is_none());
        assert_eq!(fx.solver.stats().pivots, pivots_before);
    }

    #[test]
    fn test_paranoid_checks_pass_during_repair() {
        let mut store = TermStore::new();
        let config = {
            let mut config = crate::SimplexConfig::default();
            config.set("paranoid-checks", "true").unwrap();
            config
        };
        let mut solver = SimplexSolver::with_config(ConflictBuffer::new(), config);

        let x0 = solver.new_variable();
        let x1 = solver.new_variable();
        let x2 = solver.new_variable();
        solver.add_row(x2, vec![(x0, rat(1)), (x1, rat(-2))]);

        let a = store.mk_var("x2 >= 4", Sort::Bool);
        let b = store.mk_var("x1 >= 1", Sort::Bool);
        assert!(!solver.assert_lower(x2, dr(4), a));
        assert!(!solver.assert_lower(x1, dr(1), b));
        assert!(solver.update_inconsistent_vars().is_none());
        assert!(solver.model().assignment_is_consistent(x2));
    }

    #[test]
    fn test_compute_row_value_tracks_assignment() {
        let mut fx = Fixture::new();
        let x0 = fx.solver.new_variable();
        let x1 = fx.solver.new_variable();
        let x2 = fx.solver.new_variable();
        fx.solver.add_row(x2, vec![(x0, rat(2)), (x1, rat(-1))]);

        let ge3 = fx.atom("x0 >= 3");
        assert!(!fx.solver.assert_lower(x0, dr(3), ge3));
        assert_eq!(fx.solver.compute_row_value(x2, false), dr(6));
        assert_eq!(*fx.solver.model().assignment(x2), dr(6));
        // The safe assignment has not moved.
        assert_eq!(fx.solver.compute_row_value(x2, true), dr(0));
    }
}
