//! Bound-driven dual simplex decision procedure for linear rational
//! arithmetic.
//!
//! This crate implements the simplex core of a DPLL(T)-style arithmetic
//! theory solver, following the dual simplex method of Dutertre & de Moura
//! ("A Fast Linear-Arithmetic Solver for DPLL(T)", CAV 2006). The solver
//! maintains a tableau of linear equalities
//!
//! ```text
//! x_b = Σ a_bj · x_j    (one row per basic variable x_b)
//! ```
//!
//! together with a candidate assignment, and decides whether a set of
//! asserted lower/upper bounds on variables is jointly satisfiable. Strict
//! bounds are encoded with [`DeltaRational`] values `q + k·δ`, where `δ` is
//! a symbolic positive infinitesimal.
//!
//! ## Algorithm Overview
//!
//! Bound assertions ([`SimplexSolver::assert_lower`] and friends) either
//! detect an immediate conflict against the opposite bound, or install the
//! bound and repair non-basic assignments directly. Basic variables that
//! end up outside their bounds are queued; at check time
//! [`SimplexSolver::update_inconsistent_vars`] drains the queues by
//! pivoting until either every basic variable satisfies its bounds or a
//! violating row admits no slack variable, in which case the bounds read
//! off that row form an unsatisfiable conjunction ([`Conflict`]).
//!
//! Pivot selection is staged: a Griggio-style heuristic pass chases the
//! largest bound violation first and breaks slack ties toward sparse
//! columns, bounded by one iteration per variable; if that budget runs out,
//! the solver falls back to Bland's smallest-index rule, which cannot
//! cycle.
//!
//! Arithmetic is exact throughout (`BigRational`); there is no floating
//! point anywhere in the engine.
//!
//! [`Conflict`]: qflra_core::Conflict

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod delta;
mod engine;
mod model;
mod queue;
mod row;
mod stats;
mod tableau;

pub use config::{OptionError, SimplexConfig};
pub use delta::DeltaRational;
pub use engine::SimplexSolver;
pub use model::PartialModel;
pub use queue::{BlandQueue, GriggioEntry, GriggioQueue};
pub use row::ReducedRow;
pub use stats::SimplexStats;
pub use tableau::{BasicManager, Tableau};

use std::fmt;

/// Dense identifier of an arithmetic variable.
///
/// Ids are assigned consecutively by [`SimplexSolver::new_variable`];
/// every per-variable table in the solver is indexed by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArithVar(u32);

impl ArithVar {
    /// Wrap a raw id.
    #[must_use]
    pub fn new(id: u32) -> Self {
        ArithVar(id)
    }

    /// Index of this variable into dense per-variable tables.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArithVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
