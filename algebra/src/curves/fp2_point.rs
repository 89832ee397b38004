//! Points of E(F_p^2) reached through the distortion map.
//!
//! The pairing's second argument must be linearly independent from the
//! first; for y^2 = x^3 + 1 with p = 2 mod 3 the endomorphism
//! (x, y) -> (zeta * x, y) provides exactly that, where zeta is a
//! primitive cube root of unity living in F_p^2 but not F_p.

use crate::curves::AffinePoint;
use crate::fields::{fp, Fp2};
use crate::{Error, Result};
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fp2Point {
    pub x: Fp2,
    pub y: Fp2,
    pub infinity: bool,
}

impl Fp2Point {
    pub fn zero() -> Self {
        Fp2Point {
            x: Fp2::zero(),
            y: Fp2::zero(),
            infinity: true,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.infinity
    }

    /// Image of a base-field point under the distortion map.
    ///
    /// Fails when sqrt(3) does not exist mod p, i.e. when the modulus is
    /// not of the 11 mod 12 shape the Type-1 construction requires.
    pub fn distortion_of(point: &AffinePoint, p: &BigUint) -> Result<Self> {
        if point.infinity {
            return Ok(Self::zero());
        }
        let zeta = cube_root_of_unity(p)?;
        Ok(Fp2Point {
            x: zeta.scale(&point.x, p),
            y: Fp2::from_base(point.y.clone() % p),
            infinity: false,
        })
    }
}

/// zeta = (-1 + sqrt(-3)) / 2 with sqrt(-3) = sqrt(3) * i.
fn cube_root_of_unity(p: &BigUint) -> Result<Fp2> {
    let three = BigUint::from(3u32);
    let sqrt3 = fp::sqrt(&three, p).ok_or(Error::PairingDegenerate)?;
    let half = fp::inverse(&BigUint::from(2u32), p)?;
    Ok(Fp2 {
        c0: (fp::neg(&BigUint::one(), p) * &half) % p,
        c1: (sqrt3 * &half) % p,
    })
}
