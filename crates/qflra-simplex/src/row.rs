//! Sparse reduced row vectors.
//!
//! A [`ReducedRow`] stores one tableau equation `Σ c_k · x_k = 0` in which
//! the basic variable carries coefficient exactly `-1`, i.e. it denotes
//! `x_b = Σ_{j≠b} c_j · x_j`. Entries live in a vector sorted by variable
//! id, which makes iteration order deterministic; a position index restores
//! O(1) coefficient lookup. Both are rebuilt together by every mutation,
//! so they cannot drift apart.

use crate::ArithVar;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;

fn neg_one() -> BigRational {
    -BigRational::one()
}

/// One tableau row: the basic variable's defining linear combination.
#[derive(Debug, Clone)]
pub struct ReducedRow {
    basic: ArithVar,
    /// Nonzero entries sorted by variable id. Contains `basic` with
    /// coefficient `-1`.
    entries: Vec<(ArithVar, BigRational)>,
    /// Variable → index into `entries`.
    positions: FxHashMap<ArithVar, usize>,
}

impl ReducedRow {
    /// Build the row `basic = Σ c_j · x_j` from the given combination.
    ///
    /// Duplicate variables are merged and zero coefficients dropped. The
    /// combination must not mention `basic` itself.
    #[must_use]
    pub fn new(basic: ArithVar, combination: Vec<(ArithVar, BigRational)>) -> Self {
        let mut merged: Vec<(ArithVar, BigRational)> = combination;
        merged.sort_by_key(|(var, _)| *var);

        let mut entries: Vec<(ArithVar, BigRational)> = Vec::with_capacity(merged.len() + 1);
        for (var, coeff) in merged {
            assert!(var != basic, "row combination mentions its own basic {basic}");
            match entries.last_mut() {
                Some((last, sum)) if *last == var => *sum += coeff,
                _ => entries.push((var, coeff)),
            }
        }
        entries.retain(|(_, coeff)| !coeff.is_zero());
        entries.push((basic, neg_one()));
        entries.sort_by_key(|(var, _)| *var);

        let mut row = ReducedRow {
            basic,
            entries,
            positions: FxHashMap::default(),
        };
        row.rebuild_positions();
        row
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (idx, (var, _)) in self.entries.iter().enumerate() {
            self.positions.insert(*var, idx);
        }
    }

    /// The basic variable this row defines.
    #[must_use]
    pub fn basic(&self) -> ArithVar {
        self.basic
    }

    /// True when `var` has a nonzero coefficient in this row.
    #[must_use]
    pub fn has(&self, var: ArithVar) -> bool {
        self.positions.contains_key(&var)
    }

    /// Coefficient of `var`, if nonzero.
    #[must_use]
    pub fn coeff(&self, var: ArithVar) -> Option<&BigRational> {
        self.positions.get(&var).map(|&idx| &self.entries[idx].1)
    }

    /// Coefficient of `var`. Panics when `var` does not occur in the row;
    /// callers must check [`ReducedRow::has`] first.
    #[must_use]
    pub fn lookup(&self, var: ArithVar) -> &BigRational {
        self.coeff(var)
            .unwrap_or_else(|| panic!("variable {var} not in row of {}", self.basic))
    }

    /// Nonzero entries in increasing variable order, including the basic
    /// variable with its `-1` coefficient.
    pub fn iter(&self) -> impl Iterator<Item = (ArithVar, &BigRational)> + '_ {
        self.entries.iter().map(|(var, coeff)| (*var, coeff))
    }

    /// Variables mentioned by this row, in increasing order.
    pub fn variables(&self) -> impl Iterator<Item = ArithVar> + '_ {
        self.entries.iter().map(|(var, _)| *var)
    }

    /// Number of nonzero entries (including the basic variable).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the row has no entries. Never holds for a well-formed row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-solve the row for `new_basic`: rescale so that `new_basic`
    /// carries coefficient `-1` and becomes the row's basic variable.
    ///
    /// The nonzero pattern is unchanged; the former basic variable keeps a
    /// nonzero coefficient. Panics when `new_basic` does not occur in the
    /// row.
    pub fn pivot_to(&mut self, new_basic: ArithVar) {
        assert!(new_basic != self.basic, "pivoting row onto its own basic");
        let coeff = self.lookup(new_basic).clone();
        let factor = neg_one() / coeff;
        for (_, c) in &mut self.entries {
            *c *= &factor;
        }
        self.basic = new_basic;
        debug_assert!(*self.lookup(new_basic) == neg_one());
    }

    /// In-place linear combination `self += c · other`.
    ///
    /// Entries whose coefficients cancel to zero are removed. Substituting
    /// a pivoted definition row for its basic variable is this operation
    /// with `c` set to that variable's coefficient in `self`: the `-1` in
    /// `other` cancels it exactly.
    pub fn add_multiple(&mut self, other: &ReducedRow, c: &BigRational) {
        if c.is_zero() {
            return;
        }
        debug_assert!(
            !other.has(self.basic),
            "combination would disturb the basic coefficient of {}",
            self.basic
        );

        let mut merged: Vec<(ArithVar, BigRational)> =
            Vec::with_capacity(self.entries.len() + other.entries.len());
        let mut lhs = self.entries.iter().peekable();
        let mut rhs = other.entries.iter().peekable();
        loop {
            match (lhs.peek(), rhs.peek()) {
                (Some((lv, lc)), Some((rv, rc))) => {
                    if lv < rv {
                        merged.push((*lv, lc.clone()));
                        lhs.next();
                    } else if rv < lv {
                        merged.push((*rv, rc * c));
                        rhs.next();
                    } else {
                        let sum = lc + &(rc * c);
                        if !sum.is_zero() {
                            merged.push((*lv, sum));
                        }
                        lhs.next();
                        rhs.next();
                    }
                }
                (Some((lv, lc)), None) => {
                    merged.push((*lv, lc.clone()));
                    lhs.next();
                }
                (None, Some((rv, rc))) => {
                    merged.push((*rv, rc * c));
                    rhs.next();
                }
                (None, None) => break,
            }
        }

        self.entries = merged;
        self.rebuild_positions();
        debug_assert!(*self.lookup(self.basic) == neg_one());
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
    fn test_new_merges_and_drops_zeros() {
        // x2 = x0 + 2·x1 + (-2)·x1 + 3·x1  ==  x0 + 3·x1
        let row = ReducedRow::new(
            var(2),
            vec![
                (var(0), rat(1)),
                (var(1), rat(2)),
                (var(1), rat(-2)),
                (var(1), rat(3)),
            ],
        );
        assert_eq!(row.basic(), var(2));
        assert_eq!(row.len(), 3);
        assert_eq!(*row.lookup(var(0)), rat(1));
        assert_eq!(*row.lookup(var(1)), rat(3));
        assert_eq!(*row.lookup(var(2)), rat(-1));

        let order: Vec<ArithVar> = row.variables().collect();
        assert_eq!(order, vec![var(0), var(1), var(2)]);
    }

    #[test]
    fn test_pivot_to_rescales() {
        // x2 = 2·x0 - x1, pivoted to x0: x0 = 1/2·x1 + 1/2·x2
        let mut row = ReducedRow::new(var(2), vec![(var(0), rat(2)), (var(1), rat(-1))]);
        row.pivot_to(var(0));

        assert_eq!(row.basic(), var(0));
        assert_eq!(*row.lookup(var(0)), rat(-1));
        assert_eq!(*row.lookup(var(1)), BigRational::new(1.into(), 2.into()));
        assert_eq!(*row.lookup(var(2)), BigRational::new(1.into(), 2.into()));
    }

    #[test]
    fn test_add_multiple_cancels_substituted_variable() {
        // Definition of x0 after a pivot: x0 = 1/2·x1 + 1/2·x2.
        let mut definition = ReducedRow::new(var(2), vec![(var(0), rat(2)), (var(1), rat(-1))]);
        definition.pivot_to(var(0));

        // x3 = 4·x0 + x1; substituting x0 gives x3 = 3·x1 + 2·x2.
        let mut row = ReducedRow::new(var(3), vec![(var(0), rat(4)), (var(1), rat(1))]);
        let c = row.lookup(var(0)).clone();
        row.add_multiple(&definition, &c);

        assert!(!row.has(var(0)));
        assert_eq!(*row.lookup(var(1)), rat(3));
        assert_eq!(*row.lookup(var(2)), rat(2));
        assert_eq!(*row.lookup(var(3)), rat(-1));
    }

    #[test]
    fn test_add_multiple_zero_scalar_is_noop() {
        let definition = ReducedRow::new(var(0), vec![(var(1), rat(1))]);
        let mut row = ReducedRow::new(var(3), vec![(var(1), rat(1))]);
        let before: Vec<ArithVar> = row.variables().collect();
        row.add_multiple(&definition, &rat(0));
        let after: Vec<ArithVar> = row.variables().collect();
        assert_eq!(before, after);
    }

    #[test]
    #[should_panic(expected = "not in row")]
    fn test_lookup_missing_panics() {
        let row = ReducedRow::new(var(1), vec![(var(0), rat(1))]);
        let _ = row.lookup(var(5));
    }
}
