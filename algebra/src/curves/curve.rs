//! Short Weierstrass curves y^2 = x^3 + ax + b over a runtime prime field.

use crate::curves::AffinePoint;
use crate::fields::fp;
use crate::{Error, Result};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EllipticCurve {
    pub a: BigUint,
    pub b: BigUint,
    pub p: BigUint,
}

impl EllipticCurve {
    pub fn new(a: BigUint, b: BigUint, p: BigUint) -> Self {
        EllipticCurve { a, b, p }
    }

    /// The supersingular curve y^2 = x^3 + 1 used by the Type-1 pairing
    /// construction. Requires p = 11 mod 12 to admit the distortion map
    /// and the i^2 = -1 extension.
    pub fn supersingular(p: BigUint) -> Self {
        EllipticCurve {
            a: BigUint::zero(),
            b: BigUint::one(),
            p,
        }
    }

    /// Right-hand side x^3 + ax + b.
    pub fn rhs(&self, x: &BigUint) -> BigUint {
        let x = x % &self.p;
        (&x * &x * &x + &self.a * &x + &self.b) % &self.p
    }

    pub fn contains(&self, point: &AffinePoint) -> bool {
        if point.infinity {
            return true;
        }
        (&point.y * &point.y) % &self.p == self.rhs(&point.x)
    }

    /// The point `(x, sqrt(x^3 + ax + b))` when the right-hand side is a
    /// square.
    pub fn lift_x(&self, x: &BigUint) -> Option<AffinePoint> {
        fp::sqrt(&self.rhs(x), &self.p).map(|y| AffinePoint::new(x % &self.p, y))
    }

    /// Uniform curve point by rejection sampling on x, at most `limit`
    /// draws.
    pub fn random_point<R: Rng>(&self, limit: usize, rng: &mut R) -> Result<AffinePoint> {
        for _ in 0..limit {
            let x = rng.gen_biguint_below(&self.p);
            if let Some(point) = self.lift_x(&x) {
                return Ok(point);
            }
        }
        Err(Error::PointGeneration(limit))
    }
}
