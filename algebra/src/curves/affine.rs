//! Affine points and the textbook group law.
//!
//! Scalar multiplication uses a width-4 window NAF over precomputed odd
//! multiples, so the doubling/addition schedule depends only on the
//! scalar's length and NAF digit positions rather than on its raw bits.

use crate::curves::EllipticCurve;
use crate::fields::fp;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffinePoint {
    pub x: BigUint,
    pub y: BigUint,
    pub infinity: bool,
}

impl AffinePoint {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        AffinePoint {
            x,
            y,
            infinity: false,
        }
    }

    /// The point at infinity, with zeroed coordinates so equality stays
    /// structural.
    pub fn zero() -> Self {
        AffinePoint {
            x: BigUint::zero(),
            y: BigUint::zero(),
            infinity: true,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.infinity
    }

    pub fn neg(&self, curve: &EllipticCurve) -> Self {
        if self.infinity {
            return Self::zero();
        }
        AffinePoint::new(self.x.clone(), fp::neg(&self.y, &curve.p))
    }

    pub fn add(&self, other: &Self, curve: &EllipticCurve) -> Self {
        if self.infinity {
            return other.clone();
        }
        if other.infinity {
            return self.clone();
        }
        let p = &curve.p;
        if self.x == other.x {
            if (&self.y + &other.y) % p == BigUint::zero() {
                return Self::zero();
            }
            return self.double(curve);
        }
        // chord slope (y2 - y1)/(x2 - x1); the denominator is nonzero on
        // this branch
        let num = fp::sub(&other.y, &self.y, p);
        let den = fp::sub(&other.x, &self.x, p);
        let slope = (num * fp::inverse(&den, p).unwrap()) % p;
        self.apply_slope(&slope, &other.x, curve)
    }

    pub fn double(&self, curve: &EllipticCurve) -> Self {
        if self.infinity {
            return Self::zero();
        }
        let p = &curve.p;
        if self.y.is_zero() {
            return Self::zero();
        }
        // tangent slope (3x^2 + a)/(2y)
        let num = (&self.x * &self.x * 3u32 + &curve.a) % p;
        let den = (&self.y * 2u32) % p;
        let slope = (num * fp::inverse(&den, p).unwrap()) % p;
        let x = self.x.clone();
        self.apply_slope(&slope, &x, curve)
    }

    fn apply_slope(&self, slope: &BigUint, x2: &BigUint, curve: &EllipticCurve) -> Self {
        let p = &curve.p;
        let x3 = fp::sub(&fp::sub(&((slope * slope) % p), &self.x, p), x2, p);
        let y3 = fp::sub(&((slope * fp::sub(&self.x, &x3, p)) % p), &self.y, p);
        AffinePoint::new(x3, y3)
    }

    /// Scalar multiplication by width-4 window NAF.
    pub fn mul(&self, scalar: &BigUint, curve: &EllipticCurve) -> Self {
        if self.infinity || scalar.is_zero() {
            return Self::zero();
        }
        // odd multiples P, 3P, 5P, 7P
        let twice = self.double(curve);
        let mut table = Vec::with_capacity(4);
        table.push(self.clone());
        for i in 1..4 {
            let next = table[i - 1].add(&twice, curve);
            table.push(next);
        }

        let digits = wnaf4(scalar);
        let mut acc = Self::zero();
        for &digit in digits.iter().rev() {
            acc = acc.double(curve);
            if digit > 0 {
                acc = acc.add(&table[(digit as usize - 1) / 2], curve);
            } else if digit < 0 {
                let entry = &table[((-digit) as usize - 1) / 2];
                acc = acc.add(&entry.neg(curve), curve);
            }
        }
        acc
    }
}

/// Width-4 non-adjacent form, least significant digit first; digits lie in
/// {0, +-1, +-3, +-5, +-7}.
fn wnaf4(scalar: &BigUint) -> Vec<i8> {
    let mut k = scalar.clone();
    let mut digits = Vec::with_capacity(scalar.bits() as usize + 1);
    let window = BigUint::from(16u32);
    while !k.is_zero() {
        if k.bit(0) {
            let m = (&k % &window).to_u8().expect("residue below 16") as i8;
            let digit = if m >= 8 { m - 16 } else { m };
            if digit > 0 {
                k -= BigUint::from(digit as u8);
            } else {
                k += BigUint::from((-digit) as u8);
            }
            digits.push(digit);
        } else {
            digits.push(0);
        }
        k >>= 1;
    }
    digits
}

#[cfg(test)]
pub(crate) fn mul_double_and_add(
    point: &AffinePoint,
    scalar: &BigUint,
    curve: &EllipticCurve,
) -> AffinePoint {
    let mut acc = AffinePoint::zero();
    if scalar.is_zero() {
        return acc;
    }
    for i in (0..scalar.bits()).rev() {
        acc = acc.double(curve);
        if scalar.bit(i) {
            acc = acc.add(point, curve);
        }
    }
    acc
}
