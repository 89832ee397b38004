//! The reduced Tate pairing for Type-1 (supersingular, embedding degree 2)
//! curves.
//!
//! Both arguments come from the order-q subgroup of E(F_p); the second is
//! pushed through the distortion map into E(F_p^2) before Miller's
//! algorithm runs, which makes the pairing symmetric and non-degenerate on
//! the diagonal. The Miller loop walks the bits of q from the second most
//! significant down, accumulating tangent/chord divisor evaluations over
//! vertical denominators, and the final exponentiation lifts the raw loop
//! value to the unique q-th root-of-unity coset representative:
//!
//! ```text
//! f^((p^2 - 1)/q) = (f^(p - 1))^((p + 1)/q),
//! ```
//!
//! where the easy part f^(p - 1) is conjugate(f) * f^(-1) by the Frobenius
//! and (p + 1)/q = 12r is exact for p = 12rq - 1.

use crate::curves::{AffinePoint, EllipticCurve, Fp2Point};
use crate::fields::{fp, Fp2};
use crate::{Error, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TatePairing {
    pub curve: EllipticCurve,
    /// Prime order of the pairing subgroup; divides p + 1.
    pub order: BigUint,
}

impl TatePairing {
    pub fn new(curve: EllipticCurve, order: BigUint) -> Self {
        TatePairing { curve, order }
    }

    /// e(a, phi(b)) for a, b in the order-q subgroup of E(F_p).
    pub fn compute(&self, a: &AffinePoint, b: &AffinePoint) -> Result<Fp2> {
        if a.is_zero() || b.is_zero() {
            return Ok(Fp2::one());
        }
        let image = Fp2Point::distortion_of(b, &self.curve.p)?;
        let f = self.miller_loop(a, &image)?;
        self.final_exponentiation(&f)
    }

    fn miller_loop(&self, point: &AffinePoint, eval_at: &Fp2Point) -> Result<Fp2> {
        let p = &self.curve.p;
        let mut t = point.clone();
        let mut f = Fp2::one();

        for i in (0..self.order.bits() - 1).rev() {
            // doubling step: f <- f^2 * g_{T,T}(Q) / v_{2T}(Q)
            f = f.square(p);
            let tangent = self.tangent(&t, eval_at)?;
            t = t.double(&self.curve);
            f = f.mul(&tangent, p);
            f = self.divide_by_vertical(&f, &t, eval_at)?;

            if self.order.bit(i) {
                // addition step: f <- f * g_{T,P}(Q) / v_{T+P}(Q)
                let chord = self.line(&t, point, eval_at)?;
                t = t.add(point, &self.curve);
                f = f.mul(&chord, p);
                f = self.divide_by_vertical(&f, &t, eval_at)?;
            }
        }

        // a point of exact order q lands at infinity here
        if !t.is_zero() {
            return Err(Error::PairingDegenerate);
        }
        Ok(f)
    }

    /// The vertical-line divisor never contributes at infinity.
    fn divide_by_vertical(&self, f: &Fp2, at: &AffinePoint, eval_at: &Fp2Point) -> Result<Fp2> {
        if at.is_zero() {
            return Ok(f.clone());
        }
        let v = self.vertical(at, eval_at);
        let inv = v.inverse(&self.curve.p).map_err(|_| Error::PairingDegenerate)?;
        Ok(f.mul(&inv, &self.curve.p))
    }

    /// Divisor of the vertical line through `a`, evaluated at `b`.
    pub fn vertical(&self, a: &AffinePoint, b: &Fp2Point) -> Fp2 {
        let p = &self.curve.p;
        b.x.sub(&Fp2::from_base(a.x.clone()), p)
    }

    /// Divisor of the tangent at `a`, evaluated at `b`.
    pub fn tangent(&self, a: &AffinePoint, b: &Fp2Point) -> Result<Fp2> {
        if a.is_zero() || a.y.is_zero() {
            return Err(Error::PairingDegenerate);
        }
        let p = &self.curve.p;
        let num = (&a.x * &a.x * 3u32 + &self.curve.a) % p;
        let den = (&a.y * 2u32) % p;
        let slope = (num * fp::inverse(&den, p).map_err(|_| Error::PairingDegenerate)?) % p;
        Ok(self.eval_with_slope(a, &slope, b))
    }

    /// Divisor of the line through `a` and `a2`, evaluated at `b`.
    ///
    /// Collapses to the tangent when the points coincide and to the
    /// vertical when they are mutual negatives.
    pub fn line(&self, a: &AffinePoint, a2: &AffinePoint, b: &Fp2Point) -> Result<Fp2> {
        if a.is_zero() || a2.is_zero() {
            return Err(Error::PairingDegenerate);
        }
        let p = &self.curve.p;
        if a == a2 {
            return self.tangent(a, b);
        }
        if a.x == a2.x {
            return Ok(self.vertical(a, b));
        }
        let num = fp::sub(&a2.y, &a.y, p);
        let den = fp::sub(&a2.x, &a.x, p);
        let slope = (num * fp::inverse(&den, p).map_err(|_| Error::PairingDegenerate)?) % p;
        Ok(self.eval_with_slope(a, &slope, b))
    }

    /// b.y - a.y - m * (b.x - a.x), lifted to F_p^2.
    fn eval_with_slope(&self, a: &AffinePoint, slope: &BigUint, b: &Fp2Point) -> Fp2 {
        let p = &self.curve.p;
        let dx = b.x.sub(&Fp2::from_base(a.x.clone()), p);
        let dy = b.y.sub(&Fp2::from_base(a.y.clone()), p);
        dy.sub(&dx.scale(slope, p), p)
    }

    /// f^((p^2 - 1)/q), split into the Frobenius easy part and the exact
    /// (p + 1)/q tail.
    fn final_exponentiation(&self, f: &Fp2) -> Result<Fp2> {
        let p = &self.curve.p;
        if f.is_zero() {
            return Err(Error::PairingDegenerate);
        }
        let inv = f.inverse(p).map_err(|_| Error::PairingDegenerate)?;
        let easy = f.conjugate(p).mul(&inv, p);
        let tail = (p + 1u32) / &self.order;
        Ok(easy.pow(&tail, p))
    }
}

#[cfg(test)]
mod tests;
