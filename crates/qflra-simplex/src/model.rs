//! The partial model: assignments, bounds, and their explanations.
//!
//! Every variable carries a current assignment `β(x)`, a "safe"
//! assignment the outer driver may roll back to, optional lower/upper
//! bounds, and for each installed bound the term that asserted it. The
//! bound predicates here are total and side-effect-free; absent bounds
//! behave as `-∞`/`+∞`.
//!
//! The activity counters are reserved storage for a variable-ejection
//! heuristic: the engine resets and bumps them but nothing reads them yet.

use crate::delta::DeltaRational;
use crate::ArithVar;
use num_traits::Zero;
use qflra_core::TermId;

/// Per-variable assignment and bound records.
#[derive(Debug, Default)]
pub struct PartialModel {
    assignments: Vec<DeltaRational>,
    safe_assignments: Vec<DeltaRational>,
    lower_bounds: Vec<Option<DeltaRational>>,
    upper_bounds: Vec<Option<DeltaRational>>,
    lower_constraints: Vec<Option<TermId>>,
    upper_constraints: Vec<Option<TermId>>,
    activity: Vec<u64>,
}

impl PartialModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the per-variable tables to cover `var`, with assignment zero
    /// and no bounds.
    pub(crate) fn ensure_variable(&mut self, var: ArithVar) {
        let len = var.index() + 1;
        if self.assignments.len() < len {
            self.assignments.resize_with(len, DeltaRational::zero);
            self.safe_assignments.resize_with(len, DeltaRational::zero);
            self.lower_bounds.resize_with(len, || None);
            self.upper_bounds.resize_with(len, || None);
            self.lower_constraints.resize(len, None);
            self.upper_constraints.resize(len, None);
            self.activity.resize(len, 0);
        }
    }

    /// Record (or overwrite) the lower bound of `var`.
    pub fn set_lower_bound(&mut self, var: ArithVar, bound: DeltaRational) {
        self.lower_bounds[var.index()] = Some(bound);
    }

    /// Record (or overwrite) the upper bound of `var`.
    pub fn set_upper_bound(&mut self, var: ArithVar, bound: DeltaRational) {
        self.upper_bounds[var.index()] = Some(bound);
    }

    /// Record the term that asserted the lower bound of `var`.
    pub fn set_lower_constraint(&mut self, var: ArithVar, term: TermId) {
        self.lower_constraints[var.index()] = Some(term);
    }

    /// Record the term that asserted the upper bound of `var`.
    pub fn set_upper_constraint(&mut self, var: ArithVar, term: TermId) {
        self.upper_constraints[var.index()] = Some(term);
    }

    /// The installed lower bound, if any.
    #[must_use]
    pub fn lower_bound(&self, var: ArithVar) -> Option<&DeltaRational> {
        self.lower_bounds[var.index()].as_ref()
    }

    /// The installed upper bound, if any.
    #[must_use]
    pub fn upper_bound(&self, var: ArithVar) -> Option<&DeltaRational> {
        self.upper_bounds[var.index()].as_ref()
    }

    /// The term that asserted the lower bound, if one is installed.
    #[must_use]
    pub fn lower_constraint(&self, var: ArithVar) -> Option<TermId> {
        self.lower_constraints[var.index()]
    }

    /// The term that asserted the upper bound, if one is installed.
    #[must_use]
    pub fn upper_constraint(&self, var: ArithVar) -> Option<TermId> {
        self.upper_constraints[var.index()]
    }

    /// Set the current assignment `β(var)`.
    pub fn set_assignment(&mut self, var: ArithVar, value: DeltaRational) {
        self.assignments[var.index()] = value;
    }

    /// Set both the current and the safe assignment of `var`.
    pub fn set_assignment_and_safe(&mut self, var: ArithVar, value: DeltaRational) {
        self.safe_assignments[var.index()] = value.clone();
        self.assignments[var.index()] = value;
    }

    /// Set only the safe assignment of `var`.
    pub fn set_safe_assignment(&mut self, var: ArithVar, value: DeltaRational) {
        self.safe_assignments[var.index()] = value;
    }

    /// The current assignment `β(var)`.
    #[must_use]
    pub fn assignment(&self, var: ArithVar) -> &DeltaRational {
        &self.assignments[var.index()]
    }

    /// The last-known-safe assignment of `var`.
    #[must_use]
    pub fn safe_assignment(&self, var: ArithVar) -> &DeltaRational {
        &self.safe_assignments[var.index()]
    }

    /// True iff `value < l(var)` (strict) or `value <= l(var)`
    /// (non-strict). False when no lower bound is installed.
    #[must_use]
    pub fn below_lower_bound(&self, var: ArithVar, value: &DeltaRational, strict: bool) -> bool {
        match self.lower_bound(var) {
            None => false,
            Some(lower) => {
                if strict {
                    value < lower
                } else {
                    value <= lower
                }
            }
        }
    }

    /// True iff `value > u(var)` (strict) or `value >= u(var)`
    /// (non-strict). False when no upper bound is installed.
    #[must_use]
    pub fn above_upper_bound(&self, var: ArithVar, value: &DeltaRational, strict: bool) -> bool {
        match self.upper_bound(var) {
            None => false,
            Some(upper) => {
                if strict {
                    value > upper
                } else {
                    value >= upper
                }
            }
        }
    }

    /// True iff `β(var) < u(var)`, treating a missing upper bound as `+∞`.
    #[must_use]
    pub fn strictly_below_upper_bound(&self, var: ArithVar) -> bool {
        match self.upper_bound(var) {
            None => true,
            Some(upper) => self.assignment(var) < upper,
        }
    }

    /// True iff `β(var) > l(var)`, treating a missing lower bound as `-∞`.
    #[must_use]
    pub fn strictly_above_lower_bound(&self, var: ArithVar) -> bool {
        match self.lower_bound(var) {
            None => true,
            Some(lower) => self.assignment(var) > lower,
        }
    }

    /// True iff `l(var) <= β(var) <= u(var)` under whichever bounds exist.
    #[must_use]
    pub fn assignment_is_consistent(&self, var: ArithVar) -> bool {
        let beta = self.assignment(var);
        !self.below_lower_bound(var, beta, true) && !self.above_upper_bound(var, beta, true)
    }

    /// Reset the activity counter of `var`.
    pub fn reset_activity(&mut self, var: ArithVar) {
        self.activity[var.index()] = 0;
    }

    /// Bump the activity counter of `var`.
    pub fn bump_activity(&mut self, var: ArithVar) {
        self.activity[var.index()] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::BigRational;

    fn var(id: u32) -> ArithVar {
        ArithVar::new(id)
    }

    fn model_with_vars(n: u32) -> PartialModel {
        let mut model = PartialModel::new();
        model.ensure_variable(var(n - 1));
        model
    }

    #[test]
    fn test_predicates_without_bounds() {
        let model = model_with_vars(1);
        let zero = DeltaRational::zero();

        assert!(!model.below_lower_bound(var(0), &zero, false));
        assert!(!model.above_upper_bound(var(0), &zero, false));
        assert!(model.strictly_below_upper_bound(var(0)));
        assert!(model.strictly_above_lower_bound(var(0)));
        assert!(model.assignment_is_consistent(var(0)));
    }

    #[test]
    fn test_strict_and_nonstrict_bound_comparisons() {
        let mut model = model_with_vars(1);
        model.set_lower_bound(var(0), DeltaRational::from_integer(2));

        let two = DeltaRational::from_integer(2);
        let one = DeltaRational::from_integer(1);

        // Non-strict: v <= l.
        assert!(model.below_lower_bound(var(0), &two, false));
        assert!(model.below_lower_bound(var(0), &one, false));
        // Strict: v < l.
        assert!(!model.below_lower_bound(var(0), &two, true));
        assert!(model.below_lower_bound(var(0), &one, true));
    }

    #[test]
    fn test_delta_bounds_order_strictly() {
        let mut model = model_with_vars(1);
        // x > 1, encoded as l = 1 + δ.
        model.set_lower_bound(var(0), DeltaRational::just_above(BigRational::from_integer(1.into())));
        model.set_assignment(var(0), DeltaRational::from_integer(1));

        assert!(!model.assignment_is_consistent(var(0)));
        model.set_assignment(
            var(0),
            DeltaRational::just_above(BigRational::from_integer(1.into())),
        );
        assert!(model.assignment_is_consistent(var(0)));
    }

    #[test]
    fn test_consistency_between_bounds() {
        let mut model = model_with_vars(1);
        model.set_lower_bound(var(0), DeltaRational::from_integer(0));
        model.set_upper_bound(var(0), DeltaRational::from_integer(2));

        model.set_assignment(var(0), DeltaRational::from_integer(1));
        assert!(model.assignment_is_consistent(var(0)));
        assert!(model.strictly_below_upper_bound(var(0)));
        assert!(model.strictly_above_lower_bound(var(0)));

        model.set_assignment(var(0), DeltaRational::from_integer(2));
        assert!(model.assignment_is_consistent(var(0)));
        assert!(!model.strictly_below_upper_bound(var(0)));

        model.set_assignment(var(0), DeltaRational::from_integer(3));
        assert!(!model.assignment_is_consistent(var(0)));
    }

    #[test]
    fn test_safe_assignment_tracks_separately() {
        let mut model = model_with_vars(1);
        model.set_assignment_and_safe(var(0), DeltaRational::from_integer(5));
        model.set_assignment(var(0), DeltaRational::from_integer(7));

        assert_eq!(*model.assignment(var(0)), DeltaRational::from_integer(7));
        assert_eq!(*model.safe_assignment(var(0)), DeltaRational::from_integer(5));
    }
}
