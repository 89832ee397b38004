use crate::curves::{AffinePoint, EllipticCurve};
use crate::pairing::TatePairing;
use crate::Error;
use num_bigint::BigUint;

fn big(n: u64) -> BigUint {
    BigUint::from(n)
}

/// A Type-1 configuration p = 12rq - 1 small enough to enumerate.
fn toy_pairing(p: u64, q: u64, cofactor: u64) -> (TatePairing, AffinePoint) {
    let curve = EllipticCurve::supersingular(big(p));
    let mut generator = None;
    for x in 0u64.. {
        if let Some(point) = curve.lift_x(&big(x)) {
            let candidate = point.mul(&big(cofactor), &curve);
            if !candidate.is_zero() {
                generator = Some(candidate);
                break;
            }
        }
    }
    let generator = generator.expect("cofactor clearing finds a generator");
    assert!(generator.mul(&big(q), &curve).is_zero());
    (TatePairing::new(curve, big(q)), generator)
}

#[test]
fn non_degenerate_on_the_diagonal() {
    for &(p, q, h) in &[(59u64, 5u64, 12u64), (311, 13, 24)] {
        let (pairing, g) = toy_pairing(p, q, h);
        let e = pairing.compute(&g, &g).unwrap();
        assert!(!e.is_one(), "e(g, g) must generate mu_q");
        assert!(e.pow(&big(q), &pairing.curve.p).is_one());
    }
}

#[test]
fn bilinear_in_both_arguments() {
    for &(p, q, h) in &[(59u64, 5u64, 12u64), (311, 13, 24)] {
        let (pairing, g) = toy_pairing(p, q, h);
        let base = pairing.compute(&g, &g).unwrap();
        for a in 1..q.min(8) {
            for b in 1..q.min(8) {
                let left = pairing
                    .compute(
                        &g.mul(&big(a), &pairing.curve),
                        &g.mul(&big(b), &pairing.curve),
                    )
                    .unwrap();
                let right = base.pow(&big(a * b % q), &pairing.curve.p);
                assert_eq!(left, right, "a={} b={}", a, b);
            }
        }
    }
}

#[test]
fn symmetric_under_argument_swap() {
    let (pairing, g) = toy_pairing(311, 13, 24);
    let a = g.mul(&big(3), &pairing.curve);
    let b = g.mul(&big(7), &pairing.curve);
    assert_eq!(
        pairing.compute(&a, &b).unwrap(),
        pairing.compute(&b, &a).unwrap()
    );
}

#[test]
fn infinity_pairs_to_one() {
    let (pairing, g) = toy_pairing(59, 5, 12);
    let zero = AffinePoint::zero();
    assert!(pairing.compute(&zero, &g).unwrap().is_one());
    assert!(pairing.compute(&g, &zero).unwrap().is_one());
}

#[test]
fn wrong_order_input_is_rejected() {
    let (pairing, _) = toy_pairing(59, 5, 12);
    // a point of order dividing 12, outside the order-5 subgroup
    let mut outsider = None;
    for x in 0u64..59 {
        if let Some(point) = pairing.curve.lift_x(&big(x)) {
            let small = point.mul(&big(5), &pairing.curve);
            let cleared = small.mul(&big(5), &pairing.curve);
            if !small.is_zero() && small.mul(&big(12), &pairing.curve).is_zero() && !cleared.is_zero()
            {
                outsider = Some(small);
                break;
            }
        }
    }
    let outsider = outsider.expect("the 12-torsion is non-trivial");
    assert_eq!(
        pairing.compute(&outsider, &outsider),
        Err(Error::PairingDegenerate)
    );
}
