//! Quadratic extension F_p^2 = F_p[i]/(i^2 + 1) for primes p = 3 mod 4.
//!
//! Elements are kept in canonical component form `c0 + c1*i` with both
//! components reduced. The modulus travels with every operation rather
//! than with the element, since the prime is only fixed at setup time.

use crate::{fields::fp, Error, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fp2 {
    pub c0: BigUint,
    pub c1: BigUint,
}

impl Fp2 {
    pub fn new(c0: BigUint, c1: BigUint) -> Self {
        Fp2 { c0, c1 }
    }

    /// Lift of a base-field element.
    pub fn from_base(c0: BigUint) -> Self {
        Fp2 {
            c0,
            c1: BigUint::zero(),
        }
    }

    pub fn zero() -> Self {
        Fp2 {
            c0: BigUint::zero(),
            c1: BigUint::zero(),
        }
    }

    pub fn one() -> Self {
        Fp2 {
            c0: BigUint::one(),
            c1: BigUint::zero(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.c0.is_one() && self.c1.is_zero()
    }

    pub fn add(&self, other: &Self, p: &BigUint) -> Self {
        Fp2 {
            c0: (&self.c0 + &other.c0) % p,
            c1: (&self.c1 + &other.c1) % p,
        }
    }

    pub fn sub(&self, other: &Self, p: &BigUint) -> Self {
        Fp2 {
            c0: fp::sub(&self.c0, &other.c0, p),
            c1: fp::sub(&self.c1, &other.c1, p),
        }
    }

    pub fn neg(&self, p: &BigUint) -> Self {
        Fp2 {
            c0: fp::neg(&self.c0, p),
            c1: fp::neg(&self.c1, p),
        }
    }

    /// Schoolbook product `(ac - bd) + (ad + bc)i`.
    pub fn mul(&self, other: &Self, p: &BigUint) -> Self {
        let ac = &self.c0 * &other.c0;
        let bd = &self.c1 * &other.c1;
        let ad = &self.c0 * &other.c1;
        let bc = &self.c1 * &other.c0;
        Fp2 {
            c0: fp::sub(&(ac % p), &(bd % p), p),
            c1: (ad + bc) % p,
        }
    }

    pub fn square(&self, p: &BigUint) -> Self {
        self.mul(self, p)
    }

    /// Product with a base-field scalar.
    pub fn scale(&self, k: &BigUint, p: &BigUint) -> Self {
        Fp2 {
            c0: (&self.c0 * k) % p,
            c1: (&self.c1 * k) % p,
        }
    }

    /// `(a - bi) / (a^2 + b^2)`; fails when the norm vanishes.
    pub fn inverse(&self, p: &BigUint) -> Result<Self> {
        let norm = (&self.c0 * &self.c0 + &self.c1 * &self.c1) % p;
        if norm.is_zero() {
            return Err(Error::NonInvertible);
        }
        let norm_inv = fp::inverse(&norm, p)?;
        Ok(Fp2 {
            c0: (&self.c0 * &norm_inv) % p,
            c1: (&fp::neg(&self.c1, p) * &norm_inv) % p,
        })
    }

    /// Square-and-multiply exponentiation, most significant bit first.
    pub fn pow(&self, exponent: &BigUint, p: &BigUint) -> Self {
        if exponent.is_zero() {
            return Fp2::one();
        }
        let mut result = self.clone();
        for i in (0..exponent.bits() - 1).rev() {
            result = result.square(p);
            if exponent.bit(i) {
                result = result.mul(self, p);
            }
        }
        result
    }

    /// The p-power Frobenius, which on F_p^2 is conjugation.
    pub fn conjugate(&self, p: &BigUint) -> Self {
        Fp2 {
            c0: self.c0.clone() % p,
            c1: fp::neg(&self.c1, p),
        }
    }
}
