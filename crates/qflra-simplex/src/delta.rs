//! Delta-rationals: exact rationals extended with an infinitesimal.
//!
//! A [`DeltaRational`] is a pair `q + k·δ` where `q` and `k` are exact
//! rationals and `δ` is a symbolic positive infinitesimal. Strict bounds
//! reduce to non-strict ones in this extension: `x > c` becomes
//! `x >= c + δ` and `x < c` becomes `x <= c - δ`. Comparison is
//! lexicographic on `(q, k)`, which is exactly the order induced by
//! evaluating `δ` at a sufficiently small positive rational.

use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// An exact value of the form `q + k·δ`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaRational {
    /// Non-infinitesimal part `q`.
    q: BigRational,
    /// Coefficient `k` of the infinitesimal `δ`.
    k: BigRational,
}

impl DeltaRational {
    /// Build `q + k·δ`.
    #[must_use]
    pub fn new(q: BigRational, k: BigRational) -> Self {
        DeltaRational { q, k }
    }

    /// Build the plain rational `q` (no infinitesimal part).
    #[must_use]
    pub fn from_rational(q: BigRational) -> Self {
        DeltaRational {
            q,
            k: BigRational::zero(),
        }
    }

    /// Build the integer value `n`.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self::from_rational(BigRational::from_integer(n.into()))
    }

    /// The value `q + δ`, the least delta-rational strictly above `q`
    /// representable with a unit infinitesimal. Encodes the strict lower
    /// bound `x > q`.
    #[must_use]
    pub fn just_above(q: BigRational) -> Self {
        DeltaRational {
            q,
            k: BigRational::one(),
        }
    }

    /// The value `q - δ`. Encodes the strict upper bound `x < q`.
    #[must_use]
    pub fn just_below(q: BigRational) -> Self {
        DeltaRational {
            q,
            k: -BigRational::one(),
        }
    }

    /// Non-infinitesimal part `q`.
    #[must_use]
    pub fn real_part(&self) -> &BigRational {
        &self.q
    }

    /// Infinitesimal coefficient `k`.
    #[must_use]
    pub fn delta_part(&self) -> &BigRational {
        &self.k
    }
}

impl Default for DeltaRational {
    fn default() -> Self {
        DeltaRational {
            q: BigRational::zero(),
            k: BigRational::zero(),
        }
    }
}

impl Zero for DeltaRational {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.q.is_zero() && self.k.is_zero()
    }
}

impl PartialOrd for DeltaRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeltaRational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.q.cmp(&other.q).then_with(|| self.k.cmp(&other.k))
    }
}

impl Add for DeltaRational {
    type Output = DeltaRational;

    fn add(self, rhs: DeltaRational) -> DeltaRational {
        DeltaRational {
            q: self.q + rhs.q,
            k: self.k + rhs.k,
        }
    }
}

impl Add<&DeltaRational> for &DeltaRational {
    type Output = DeltaRational;

    fn add(self, rhs: &DeltaRational) -> DeltaRational {
        DeltaRational {
            q: &self.q + &rhs.q,
            k: &self.k + &rhs.k,
        }
    }
}

impl Sub for DeltaRational {
    type Output = DeltaRational;

    fn sub(self, rhs: DeltaRational) -> DeltaRational {
        DeltaRational {
            q: self.q - rhs.q,
            k: self.k - rhs.k,
        }
    }
}

impl Sub<&DeltaRational> for &DeltaRational {
    type Output = DeltaRational;

    fn sub(self, rhs: &DeltaRational) -> DeltaRational {
        DeltaRational {
            q: &self.q - &rhs.q,
            k: &self.k - &rhs.k,
        }
    }
}

impl Neg for DeltaRational {
    type Output = DeltaRational;

    fn neg(self) -> DeltaRational {
        DeltaRational {
            q: -self.q,
            k: -self.k,
        }
    }
}

impl Neg for &DeltaRational {
    type Output = DeltaRational;

    fn neg(self) -> DeltaRational {
        DeltaRational {
            q: -&self.q,
            k: -&self.k,
        }
    }
}

/// Scalar multiplication by a rational.
impl Mul<&BigRational> for &DeltaRational {
    type Output = DeltaRational;

    fn mul(self, rhs: &BigRational) -> DeltaRational {
        DeltaRational {
            q: &self.q * rhs,
            k: &self.k * rhs,
        }
    }
}

impl fmt::Display for DeltaRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.k.is_zero() {
            write!(f, "{}", self.q)
        } else if self.k.is_negative() {
            write!(f, "{} - {}·δ", self.q, -&self.k)
        } else {
            write!(f, "{} + {}·δ", self.q, self.k)
        }
    }
}
