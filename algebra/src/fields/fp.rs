//! Modular arithmetic over runtime prime moduli.
//!
//! Every function takes the modulus explicitly and returns fully reduced
//! residues in `[0, p)`. The square- and cube-root routines exploit the
//! congruence conditions the supersingular setting guarantees:
//! p = 3 mod 4 and p = 2 mod 3.

use crate::{Error, Result};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

/// Additive negation, `(-a) mod p`.
pub fn neg(a: &BigUint, p: &BigUint) -> BigUint {
    let a = a % p;
    if a.is_zero() {
        a
    } else {
        p - a
    }
}

/// `(a - b) mod p` without leaving the non-negative range.
pub fn sub(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    ((a % p) + neg(b, p)) % p
}

/// Multiplicative inverse by the extended Euclidean algorithm.
///
/// Fails with [`Error::NonInvertible`] when `gcd(a, p) != 1`, which for a
/// prime modulus means `a = 0 mod p`.
pub fn inverse(a: &BigUint, p: &BigUint) -> Result<BigUint> {
    let (g, x, _) = extended_gcd(
        BigInt::from_biguint(Sign::Plus, a % p),
        BigInt::from_biguint(Sign::Plus, p.clone()),
    );
    if !g.is_one() {
        return Err(Error::NonInvertible);
    }
    let p_int = BigInt::from_biguint(Sign::Plus, p.clone());
    let x = ((x % &p_int) + &p_int) % &p_int;
    Ok(x.to_biguint().expect("residue is non-negative"))
}

fn extended_gcd(a: BigInt, b: BigInt) -> (BigInt, BigInt, BigInt) {
    if a.is_zero() {
        (b, BigInt::zero(), BigInt::one())
    } else {
        let (g, x, y) = extended_gcd(&b % &a, a.clone());
        (g, y - (&b / &a) * &x, x)
    }
}

/// Legendre symbol by Euler's criterion: 1 for residues, -1 for
/// non-residues, 0 for `a = 0 mod p`.
pub fn legendre(a: &BigUint, p: &BigUint) -> i8 {
    if (a % p).is_zero() {
        return 0;
    }
    let e = (p - 1u32) >> 1;
    if a.modpow(&e, p).is_one() {
        1
    } else {
        -1
    }
}

/// Square root for p = 3 mod 4, computed as `a^((p+1)/4)`.
///
/// Returns `None` when `a` is a non-residue.
pub fn sqrt(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let a = a % p;
    if a.is_zero() {
        return Some(a);
    }
    let e = (p + 1u32) >> 2;
    let root = a.modpow(&e, p);
    if (&root * &root) % p == a {
        Some(root)
    } else {
        None
    }
}

/// Cube root for p = 2 mod 3, where cubing is a bijection: `a^((2p-1)/3)`.
pub fn cube_root(a: &BigUint, p: &BigUint) -> BigUint {
    let e = ((p << 1) - 1u32) / 3u32;
    a.modpow(&e, p)
}
