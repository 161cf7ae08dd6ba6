//! The simplex tableau.
//!
//! A [`Tableau`] owns one [`ReducedRow`] per basic variable, stored densely
//! by variable id so that iteration over basics is deterministic. It also
//! maintains, for every variable, the number of rows that mention it — the
//! row-count heuristic consulted when choosing a slack variable — and the
//! [`BasicManager`] answering "is this variable currently basic".
//!
//! Rows are created once (`add_row`) and pivoted in place afterwards; they
//! are never deleted.

use crate::row::ReducedRow;
use crate::ArithVar;
use num_rational::BigRational;
use tracing::trace;

/// Tracks which variables are currently basic.
#[derive(Debug, Default)]
pub struct BasicManager {
    flags: Vec<bool>,
}

impl BasicManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, len: usize) {
        if self.flags.len() < len {
            self.flags.resize(len, false);
        }
    }

    /// True when `var` is currently basic.
    #[must_use]
    pub fn is_basic(&self, var: ArithVar) -> bool {
        self.flags.get(var.index()).copied().unwrap_or(false)
    }

    fn set_basic(&mut self, var: ArithVar, basic: bool) {
        self.ensure(var.index() + 1);
        self.flags[var.index()] = basic;
    }
}

fn adjust_row_counts(counts: &mut [u32], row: &ReducedRow, increment: bool) {
    for var in row.variables() {
        if increment {
            counts[var.index()] += 1;
        } else {
            counts[var.index()] -= 1;
        }
    }
}

/// The set of basic variables and their defining rows.
#[derive(Debug, Default)]
pub struct Tableau {
    /// Row of each basic variable, indexed by variable id. `None` for
    /// non-basic variables.
    rows: Vec<Option<ReducedRow>>,
    /// Number of rows mentioning each variable.
    row_counts: Vec<u32>,
    basics: BasicManager,
}

impl Tableau {
    /// Create an empty tableau.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the per-variable tables to cover `var`.
    pub(crate) fn ensure_variable(&mut self, var: ArithVar) {
        let len = var.index() + 1;
        if self.rows.len() < len {
            self.rows.resize_with(len, || None);
            self.row_counts.resize(len, 0);
        }
        self.basics.ensure(len);
    }

    /// Number of variables the tableau knows about.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.rows.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.is_some()).count()
    }

    /// True when `var` is currently basic.
    #[must_use]
    pub fn is_basic(&self, var: ArithVar) -> bool {
        self.basics.is_basic(var)
    }

    /// The basic-variable predicate as a component.
    #[must_use]
    pub fn basics(&self) -> &BasicManager {
        &self.basics
    }

    /// Number of rows in which `var` occurs with a nonzero coefficient.
    #[must_use]
    pub fn row_count(&self, var: ArithVar) -> u32 {
        self.row_counts[var.index()]
    }

    /// The defining row of `basic`. Panics when `basic` is not basic;
    /// that is a caller bug, not a recoverable condition.
    #[must_use]
    pub fn row(&self, basic: ArithVar) -> &ReducedRow {
        self.rows[basic.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("{basic} is not basic"))
    }

    /// Basic variables in increasing id order.
    pub fn basic_variables(&self) -> impl Iterator<Item = ArithVar> + '_ {
        self.rows.iter().enumerate().filter_map(|(idx, row)| {
            row.as_ref()
                .map(|_| ArithVar::new(u32::try_from(idx).expect("variable id overflow")))
        })
    }

    /// Install the row `basic = Σ c_j · x_j`, making `basic` basic.
    ///
    /// Variables in the combination that are themselves basic are
    /// substituted out through their defining rows, so the installed row
    /// mentions only non-basic variables. `basic` must be fresh to the
    /// tableau: not basic, and not mentioned by any existing row.
    pub fn add_row(&mut self, basic: ArithVar, combination: Vec<(ArithVar, BigRational)>) {
        self.ensure_variable(basic);
        for (var, _) in &combination {
            self.ensure_variable(*var);
        }
        assert!(!self.is_basic(basic), "{basic} already owns a row");
        assert!(
            self.row_counts[basic.index()] == 0,
            "{basic} is mentioned by an existing row"
        );

        let mut row = ReducedRow::new(basic, combination);
        loop {
            let inner = row
                .variables()
                .find(|&var| var != basic && self.is_basic(var));
            let Some(var) = inner else { break };
            let coeff = row.lookup(var).clone();
            row.add_multiple(self.row(var), &coeff);
        }

        adjust_row_counts(&mut self.row_counts, &row, true);
        self.basics.set_basic(basic, true);
        self.rows[basic.index()] = Some(row);
    }

    /// Exchange the basic/non-basic roles of `xi` and `xj`.
    ///
    /// `xi` must be basic with a nonzero coefficient on the non-basic
    /// `xj`. The row of `xi` is re-solved for `xj` and substituted into
    /// every other row mentioning `xj`; row counts are maintained exactly.
    pub fn pivot(&mut self, xi: ArithVar, xj: ArithVar) {
        assert!(xi != xj, "pivoting {xi} onto itself");
        assert!(self.is_basic(xi), "{xi} is not basic");
        assert!(!self.is_basic(xj), "{xj} is already basic");
        trace!("pivot {xi} -> {xj}");

        let mut pivot_row = self.rows[xi.index()].take().unwrap_or_else(|| {
            panic!("{xi} is not basic");
        });
        assert!(pivot_row.has(xj), "{xj} has zero coefficient in row of {xi}");

        // Rescaling changes no nonzero pattern, so counts are untouched.
        pivot_row.pivot_to(xj);
        self.basics.set_basic(xi, false);
        self.basics.set_basic(xj, true);

        for idx in 0..self.rows.len() {
            let Some(row) = self.rows[idx].as_mut() else {
                continue;
            };
            let Some(coeff) = row.coeff(xj).cloned() else {
                continue;
            };
            adjust_row_counts(&mut self.row_counts, row, false);
            row.add_multiple(&pivot_row, &coeff);
            adjust_row_counts(&mut self.row_counts, row, true);
        }

        self.rows[xj.index()] = Some(pivot_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    fn var(id: u32) -> ArithVar {
        ArithVar::new(id)
    }

    #[test]
    fn test_add_row_tracks_counts_and_basics() {
        let mut tableau = Tableau::new();
        tableau.add_row(var(2), vec![(var(0), rat(1)), (var(1), rat(1))]);

        assert!(tableau.is_basic(var(2)));
        assert!(!tableau.is_basic(var(0)));
        assert_eq!(tableau.row_count(var(0)), 1);
        assert_eq!(tableau.row_count(var(1)), 1);
        assert_eq!(tableau.row_count(var(2)), 1);
        assert_eq!(tableau.num_rows(), 1);
    }

    #[test]
    fn test_add_row_substitutes_existing_basics() {
        let mut tableau = Tableau::new();
        // x2 = x0 + x1
        tableau.add_row(var(2), vec![(var(0), rat(1)), (var(1), rat(1))]);
        // x3 = x2 + x1, which must install as x3 = x0 + 2·x1
        tableau.add_row(var(3), vec![(var(2), rat(1)), (var(1), rat(1))]);

        let row = tableau.row(var(3));
        assert!(!row.has(var(2)));
        assert_eq!(*row.lookup(var(0)), rat(1));
        assert_eq!(*row.lookup(var(1)), rat(2));
        assert_eq!(tableau.row_count(var(2)), 1);
        assert_eq!(tableau.row_count(var(1)), 2);
    }

    #[test]
    fn test_pivot_substitutes_and_maintains_counts() {
        let mut tableau = Tableau::new();
        // x2 = x0 + x1 and x3 = x0 - x1.
        tableau.add_row(var(2), vec![(var(0), rat(1)), (var(1), rat(1))]);
        tableau.add_row(var(3), vec![(var(0), rat(1)), (var(1), rat(-1))]);
        assert_eq!(tableau.row_count(var(0)), 2);

        tableau.pivot(var(2), var(0));

        assert!(tableau.is_basic(var(0)));
        assert!(!tableau.is_basic(var(2)));

        // x0 = x2 - x1.
        let row0 = tableau.row(var(0));
        assert_eq!(*row0.lookup(var(2)), rat(1));
        assert_eq!(*row0.lookup(var(1)), rat(-1));
        assert_eq!(*row0.lookup(var(0)), rat(-1));

        // x3 = (x2 - x1) - x1 = x2 - 2·x1.
        let row3 = tableau.row(var(3));
        assert!(!row3.has(var(0)));
        assert_eq!(*row3.lookup(var(2)), rat(1));
        assert_eq!(*row3.lookup(var(1)), rat(-2));

        // Counts reflect the new patterns exactly.
        assert_eq!(tableau.row_count(var(0)), 1);
        assert_eq!(tableau.row_count(var(1)), 2);
        assert_eq!(tableau.row_count(var(2)), 2);
        assert_eq!(tableau.row_count(var(3)), 1);
    }

    #[test]
    #[should_panic(expected = "zero coefficient")]
    fn test_pivot_requires_nonzero_coefficient() {
        let mut tableau = Tableau::new();
        tableau.add_row(var(1), vec![(var(0), rat(1))]);
        tableau.ensure_variable(var(2));
        tableau.pivot(var(1), var(2));
    }
}
