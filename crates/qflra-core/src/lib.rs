//! Core types shared between the qflra decision procedure and its drivers.
//!
//! This crate carries the collaborator surface the simplex engine consumes:
//! a hash-consed term store ([`TermStore`]) producing opaque [`TermId`]
//! handles, and the conflict-explanation types ([`Conflict`],
//! [`ConflictSink`]) through which the engine reports unsatisfiability to
//! the SAT layer.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod conflict;
mod term;

pub use conflict::{Conflict, ConflictBuffer, ConflictSink};
pub use term::{Sort, TermData, TermId, TermStore};
