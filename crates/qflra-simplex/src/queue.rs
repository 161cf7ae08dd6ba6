//! Work queues over possibly inconsistent basic variables.
//!
//! Two queues drive the main loop. The Griggio-stage queue is a max-heap
//! keyed by the magnitude of the bound violation, chasing the worst
//! offender first; the Bland-stage queue is a min-heap by variable id,
//! whose smallest-index discipline guarantees termination. Entries are
//! allowed to go stale (the variable may have been pivoted out of the
//! basis or repaired in the meantime); callers resolve staleness by
//! popping and skipping dead entries.

use crate::delta::DeltaRational;
use crate::ArithVar;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Entry of the [`GriggioQueue`]: a basic variable together with the
/// magnitude of its bound violation at the time it was enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GriggioEntry {
    /// The possibly inconsistent basic variable.
    pub var: ArithVar,
    /// `l - β` (below the lower bound) or `β - u` (above the upper bound)
    /// at enqueue time. Always positive.
    pub violation: DeltaRational,
}

impl PartialOrd for GriggioEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GriggioEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Larger violations first; ties go to the smaller variable id so
        // heap order is deterministic.
        self.violation
            .cmp(&other.violation)
            .then_with(|| other.var.cmp(&self.var))
    }
}

/// Max-heap of basic variables by violation magnitude.
#[derive(Debug, Default)]
pub struct GriggioQueue {
    heap: BinaryHeap<GriggioEntry>,
}

impl GriggioQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `var` with the given violation magnitude.
    pub fn push(&mut self, var: ArithVar, violation: DeltaRational) {
        self.heap.push(GriggioEntry { var, violation });
    }

    /// The entry with the largest violation, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&GriggioEntry> {
        self.heap.peek()
    }

    /// Remove and return the entry with the largest violation.
    pub fn pop(&mut self) -> Option<GriggioEntry> {
        self.heap.pop()
    }

    /// Number of entries (stale ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when no entries are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Discard all entries.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

/// Min-heap of basic variables by id.
#[derive(Debug, Default)]
pub struct BlandQueue {
    heap: BinaryHeap<Reverse<ArithVar>>,
}

impl BlandQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `var`.
    pub fn push(&mut self, var: ArithVar) {
        self.heap.push(Reverse(var));
    }

    /// The smallest queued variable id, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<ArithVar> {
        self.heap.peek().map(|entry| entry.0)
    }

    /// Remove and return the smallest queued variable id.
    pub fn pop(&mut self) -> Option<ArithVar> {
        self.heap.pop().map(|entry| entry.0)
    }

    /// Number of entries (stale ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when no entries are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Discard all entries.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
