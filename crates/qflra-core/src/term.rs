//! Hash-consed term store.
//!
//! The simplex engine never inspects the structure of the terms it is
//! handed; it only stores them as explanations and returns them inside
//! conflicts. The store exists so that drivers and tests can build the
//! constraint atoms they assert and assemble conflict conjunctions back
//! into a single node.
//!
//! Terms are interned: building the same term twice yields the same
//! [`TermId`], so handle equality is structural equality.

use num_rational::BigRational;
use rustc_hash::FxHashMap;
use std::fmt;

/// Opaque handle to a term in a [`TermStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(u32);

impl TermId {
    /// Index of this term in its store.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sort of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Boolean sort (atoms and connectives).
    Bool,
    /// Real sort (variables and rational constants).
    Real,
}

/// Structure of a stored term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermData {
    /// Named variable of the given sort.
    Var(String, Sort),
    /// Rational constant.
    Const(BigRational),
    /// `lhs <= rhs`.
    Le(TermId, TermId),
    /// `lhs < rhs`.
    Lt(TermId, TermId),
    /// `lhs >= rhs`.
    Ge(TermId, TermId),
    /// `lhs > rhs`.
    Gt(TermId, TermId),
    /// Boolean negation.
    Not(TermId),
    /// Conjunction. Children are kept in the order they were given.
    And(Vec<TermId>),
}

/// Hash-consing arena for terms.
#[derive(Debug, Default)]
pub struct TermStore {
    terms: Vec<TermData>,
    interned: FxHashMap<TermData, TermId>,
}

impl TermStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, data: TermData) -> TermId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let id = TermId(u32::try_from(self.terms.len()).expect("term store overflow"));
        self.terms.push(data.clone());
        self.interned.insert(data, id);
        id
    }

    /// Build a named variable.
    pub fn mk_var(&mut self, name: impl Into<String>, sort: Sort) -> TermId {
        self.intern(TermData::Var(name.into(), sort))
    }

    /// Build a rational constant.
    pub fn mk_const(&mut self, value: BigRational) -> TermId {
        self.intern(TermData::Const(value))
    }

    /// Build `lhs <= rhs`.
    pub fn mk_le(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.intern(TermData::Le(lhs, rhs))
    }

    /// Build `lhs < rhs`.
    pub fn mk_lt(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.intern(TermData::Lt(lhs, rhs))
    }

    /// Build `lhs >= rhs`.
    pub fn mk_ge(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.intern(TermData::Ge(lhs, rhs))
    }

    /// Build `lhs > rhs`.
    pub fn mk_gt(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.intern(TermData::Gt(lhs, rhs))
    }

    /// Build the negation of `term`.
    pub fn mk_not(&mut self, term: TermId) -> TermId {
        self.intern(TermData::Not(term))
    }

    /// Build a conjunction of `children`, preserving their order.
    pub fn mk_and(&mut self, children: Vec<TermId>) -> TermId {
        self.intern(TermData::And(children))
    }

    /// Structure of a stored term.
    #[must_use]
    pub fn data(&self, id: TermId) -> &TermData {
        &self.terms[id.index()]
    }

    /// Number of direct children of a term.
    #[must_use]
    pub fn num_children(&self, id: TermId) -> usize {
        match self.data(id) {
            TermData::Var(..) | TermData::Const(_) => 0,
            TermData::Not(_) => 1,
            TermData::Le(..) | TermData::Lt(..) | TermData::Ge(..) | TermData::Gt(..) => 2,
            TermData::And(children) => children.len(),
        }
    }

    /// Number of terms in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no terms have been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Display adaptor for a term.
    #[must_use]
    pub fn display(&self, id: TermId) -> TermDisplay<'_> {
        TermDisplay { store: self, id }
    }
}

/// Borrowed pretty-printer for a single term.
pub struct TermDisplay<'a> {
    store: &'a TermStore,
    id: TermId,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sub = |id| self.store.display(id);
        match self.store.data(self.id) {
            TermData::Var(name, _) => write!(f, "{name}"),
            TermData::Const(value) => write!(f, "{value}"),
            TermData::Le(lhs, rhs) => write!(f, "({} <= {})", sub(*lhs), sub(*rhs)),
            TermData::Lt(lhs, rhs) => write!(f, "({} < {})", sub(*lhs), sub(*rhs)),
            TermData::Ge(lhs, rhs) => write!(f, "({} >= {})", sub(*lhs), sub(*rhs)),
            TermData::Gt(lhs, rhs) => write!(f, "({} > {})", sub(*lhs), sub(*rhs)),
            TermData::Not(inner) => write!(f, "(not {})", sub(*inner)),
            TermData::And(children) => {
                write!(f, "(and")?;
                for &child in children {
                    write!(f, " {}", sub(child))?;
                }
                write!(f, ")")
            }
        }
    }
}
